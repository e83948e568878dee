// src/target/mod.rs

//! Bars-and-stripes target distributions.
//!
//! A bars-and-stripes pattern is an `nrows x ncols` binary grid in which every
//! row is a copy of the same bit-string (stripes) or every column is a copy of
//! the same bit-string (bars). The full pattern set is a standard benchmark for
//! generative models: a Born machine over `nrows * ncols` qubits is trained to
//! put its probability mass uniformly on these patterns.
//!
//! Patterns are flattened row-major ("zigzag" qubit labelling), so cell
//! `(r, c)` becomes qubit `r * ncols + c`.

use crate::core::{BitstringDistribution, QcbmError, Result};
use itertools::Itertools;
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

/// Strategy used to map grid cells onto qubits when building a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    /// Row-major flattening of the grid.
    #[default]
    Zigzag,
}

impl FromStr for Method {
    type Err = QcbmError;

    fn from_str(tag: &str) -> Result<Self> {
        match tag {
            "zigzag" => Ok(Method::Zigzag),
            other => Err(QcbmError::UnsupportedMethod { method: other.to_string() }),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Zigzag => write!(f, "zigzag"),
        }
    }
}

fn check_dimensions(nrows: usize, ncols: usize) -> Result<()> {
    if nrows < 1 || ncols < 1 {
        return Err(QcbmError::InvalidDimension { nrows, ncols });
    }
    Ok(())
}

/// `2^n` as a `usize`, or `DimensionOverflow` if it does not fit.
fn num_bitstrings(n: usize) -> Result<usize> {
    u32::try_from(n)
        .ok()
        .and_then(|shift| 1usize.checked_shl(shift))
        .ok_or_else(|| QcbmError::DimensionOverflow {
            message: format!("2^{} candidate patterns do not fit in usize", n),
        })
}

/// All bit-strings of length `n`, in lexicographic order.
fn bitstrings(n: usize) -> impl Iterator<Item = Vec<u8>> {
    std::iter::repeat(0u8..=1).take(n).multi_cartesian_product()
}

/// Enumerates every bars-and-stripes pattern of an `nrows x ncols` grid.
///
/// Stripes come from repeating each length-`ncols` bit-string over all rows,
/// bars from repeating each length-`nrows` bit-string over all columns. The
/// all-blank and all-filled grids belong to both families and are kept once.
///
/// # Returns
/// * The deduplicated patterns, each of length `nrows * ncols`, sorted
///   lexicographically.
/// * `Err(QcbmError::InvalidDimension)` if either dimension is zero.
/// * `Err(QcbmError::DimensionOverflow)` if the grid is too large to enumerate.
pub fn bars_and_stripes_zigzag(nrows: usize, ncols: usize) -> Result<Vec<Vec<u8>>> {
    check_dimensions(nrows, ncols)?;
    let num_qubits = nrows.checked_mul(ncols).ok_or_else(|| QcbmError::DimensionOverflow {
        message: format!("grid {}x{} has too many cells", nrows, ncols),
    })?;
    num_bitstrings(ncols)?;
    num_bitstrings(nrows)?;

    let mut patterns: BTreeSet<Vec<u8>> = BTreeSet::new();

    // Stripes: every row equals h
    for h in bitstrings(ncols) {
        let pattern: Vec<u8> = h.iter().copied().cycle().take(num_qubits).collect();
        patterns.insert(pattern);
    }

    // Bars: every column equals h
    for h in bitstrings(nrows) {
        let pattern: Vec<u8> = h
            .iter()
            .flat_map(|&bit| std::iter::repeat(bit).take(ncols))
            .collect();
        patterns.insert(pattern);
    }

    trace!("enumerated {} bars and stripes patterns for a {}x{} grid", patterns.len(), nrows, ncols);
    Ok(patterns.into_iter().collect())
}

/// Binomial coefficient with checked arithmetic.
fn binomial(n: u64, k: u64) -> Option<u64> {
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..k {
        // Exact at every step: result * (n - i) is divisible by (i + 1)
        result = result.checked_mul(u128::from(n - i))? / u128::from(i + 1);
    }
    u64::try_from(result).ok()
}

/// Counts the bars-and-stripes patterns of an `nrows x ncols` grid without
/// enumerating them.
///
/// The count is `2 + Σ_{d ∈ {nrows, ncols}} Σ_{r=1}^{d-1} C(d, r)`: the blank
/// and filled grids, plus every non-trivial choice of which rows (or columns)
/// are switched on.
pub fn count_structured_binary_patterns(nrows: usize, ncols: usize) -> Result<u64> {
    check_dimensions(nrows, ncols)?;
    let overflow = || QcbmError::DimensionOverflow {
        message: format!("pattern count for a {}x{} grid does not fit in u64", nrows, ncols),
    };

    // Always have all blank and all filled
    let mut num_patterns: u64 = 2;
    for dimension in [nrows as u64, ncols as u64] {
        for num_choices in 1..dimension {
            let choices = binomial(dimension, num_choices).ok_or_else(overflow)?;
            num_patterns = num_patterns.checked_add(choices).ok_or_else(overflow)?;
        }
    }
    Ok(num_patterns)
}

/// Builds a bars-and-stripes target distribution.
///
/// A uniformly random subset of `max(1, floor(total * percentage))` patterns is
/// kept, each with weight `1.0`. Randomness comes only from `rng`.
///
/// # Arguments
/// * `nrows`, `ncols` - Grid dimensions, both at least 1.
/// * `percentage` - Fraction of the full pattern set to retain, in `(0, 1]`.
/// * `method` - Qubit labelling strategy.
/// * `rng` - Source of randomness for subset selection.
///
/// # Returns
/// * A non-empty `BitstringDistribution` over `nrows * ncols` qubits.
/// * `Err` on invalid dimensions or percentage; nothing is produced in that case.
pub fn generate_structured_binary_target<R>(
    nrows: usize,
    ncols: usize,
    percentage: f64,
    method: Method,
    rng: &mut R,
) -> Result<BitstringDistribution>
where
    R: Rng + ?Sized,
{
    if !(percentage > 0.0 && percentage <= 1.0) {
        return Err(QcbmError::InvalidPercentage { percentage });
    }

    let data = match method {
        Method::Zigzag => bars_and_stripes_zigzag(nrows, ncols)?,
    };

    let num_desired_patterns = ((data.len() as f64 * percentage).floor() as usize).max(1);
    let selected = rand::seq::index::sample(rng, data.len(), num_desired_patterns);

    let distribution_dict: HashMap<String, f64> = selected
        .into_iter()
        .map(|index| {
            let bitstring: String = data[index].iter().map(|&bit| char::from(b'0' + bit)).collect();
            (bitstring, 1.0)
        })
        .collect();

    debug!(
        "built {} target with {}/{} bars and stripes patterns on a {}x{} grid",
        method,
        distribution_dict.len(),
        data.len(),
        nrows,
        ncols
    );
    BitstringDistribution::new(distribution_dict)
}

/// Same as [`generate_structured_binary_target`], drawing from a `StdRng`
/// seeded with `seed`, or from the thread-local generator when `seed` is
/// `None`.
pub fn generate_structured_binary_target_seeded(
    nrows: usize,
    ncols: usize,
    percentage: f64,
    method: Method,
    seed: Option<u64>,
) -> Result<BitstringDistribution> {
    match seed {
        Some(seed) => {
            let mut rng = StdRng::seed_from_u64(seed);
            generate_structured_binary_target(nrows, ncols, percentage, method, &mut rng)
        }
        None => generate_structured_binary_target(nrows, ncols, percentage, method, &mut rand::thread_rng()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(pattern: &[u8]) -> String {
        pattern.iter().map(|b| b.to_string()).collect()
    }

    #[test]
    fn test_zigzag_2x2() -> Result<()> {
        let patterns: Vec<String> = bars_and_stripes_zigzag(2, 2)?.iter().map(|p| grid(p)).collect();
        assert_eq!(patterns, vec!["0000", "0011", "0101", "1010", "1100", "1111"]);
        Ok(())
    }

    #[test]
    fn test_zigzag_2x3_orientation() -> Result<()> {
        let patterns: Vec<String> = bars_and_stripes_zigzag(2, 3)?.iter().map(|p| grid(p)).collect();
        // Row h = 011 repeated on both rows
        assert!(patterns.contains(&"011011".to_string()));
        // Column h = 01: top row blank, bottom row filled
        assert!(patterns.contains(&"000111".to_string()));
        // Not a bars and stripes pattern
        assert!(!patterns.contains(&"011000".to_string()));
        assert_eq!(patterns.len(), 10);
        Ok(())
    }

    #[test]
    fn test_single_cell_grid() -> Result<()> {
        assert_eq!(bars_and_stripes_zigzag(1, 1)?, vec![vec![0], vec![1]]);
        assert_eq!(count_structured_binary_patterns(1, 1)?, 2);
        Ok(())
    }

    #[test]
    fn test_binomial() {
        assert_eq!(binomial(5, 2), Some(10));
        assert_eq!(binomial(6, 0), Some(1));
        assert_eq!(binomial(6, 6), Some(1));
        assert_eq!(binomial(64, 32), Some(1_832_624_140_942_590_534));
    }

    #[test]
    fn test_count_rejects_zero_dimensions() {
        assert!(matches!(
            count_structured_binary_patterns(0, 3),
            Err(QcbmError::InvalidDimension { nrows: 0, ncols: 3 })
        ));
        assert!(matches!(bars_and_stripes_zigzag(2, 0), Err(QcbmError::InvalidDimension { .. })));
    }

    #[test]
    fn test_count_overflow() {
        assert!(matches!(
            count_structured_binary_patterns(64, 2),
            Err(QcbmError::DimensionOverflow { .. })
        ));
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("zigzag".parse::<Method>().ok(), Some(Method::Zigzag));
        assert_eq!(Method::default().to_string(), "zigzag");
        assert!(matches!(
            "snake".parse::<Method>(),
            Err(QcbmError::UnsupportedMethod { method }) if method == "snake"
        ));
    }

    #[test]
    fn test_invalid_percentage() {
        for percentage in [0.0, -0.5, 1.5, f64::NAN] {
            let mut rng = StdRng::seed_from_u64(0);
            let result = generate_structured_binary_target(2, 2, percentage, Method::Zigzag, &mut rng);
            assert!(matches!(result, Err(QcbmError::InvalidPercentage { .. })), "percentage {}", percentage);
        }
    }
}
