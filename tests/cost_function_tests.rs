// tests/cost_function_tests.rs

use qcbm::{
    Ansatz, Backend, BitstringDistribution, DistanceMeasureParameters, GradientType,
    QcbmCostFunction, QcbmCostFunctionBuilder, QcbmError, TotalVariationDistance,
};
use std::collections::HashMap;

const TEST_TOLERANCE: f64 = 1e-12;

fn dist(entries: &[(&str, f64)]) -> BitstringDistribution {
    BitstringDistribution::new(entries.iter().map(|(k, v)| (k.to_string(), *v)).collect())
        .expect("test distribution must be valid")
}

/// Ansatz that ignores its parameters and always yields the same circuit token.
struct FixedAnsatz;

impl Ansatz for FixedAnsatz {
    type Circuit = &'static str;

    fn executable_circuit(&self, _params: &[f64]) -> Result<&'static str, QcbmError> {
        Ok("bell")
    }
}

/// Backend that looks circuit tokens up in a table.
struct LookupBackend {
    table: HashMap<&'static str, BitstringDistribution>,
}

impl Backend<&'static str> for LookupBackend {
    fn bitstring_distribution(&mut self, circuit: &&'static str) -> Result<BitstringDistribution, QcbmError> {
        self.table.get(circuit).cloned().ok_or_else(|| QcbmError::BackendError {
            message: format!("unknown circuit {}", circuit),
        })
    }
}

/// Ansatz whose circuit is the single-qubit probability of measuring `1`.
struct RotationAnsatz;

impl Ansatz for RotationAnsatz {
    type Circuit = f64;

    fn executable_circuit(&self, params: &[f64]) -> Result<f64, QcbmError> {
        Ok(params.iter().sum::<f64>().clamp(0.0, 1.0))
    }
}

struct ExactBackend;

impl Backend<f64> for ExactBackend {
    fn bitstring_distribution(&mut self, circuit: &f64) -> Result<BitstringDistribution, QcbmError> {
        BitstringDistribution::from_probabilities(&[1.0 - circuit, *circuit])
    }
}

#[test]
fn test_evaluate_total_variation_by_hand() -> Result<(), QcbmError> {
    let backend = LookupBackend {
        table: [("bell", dist(&[("00", 0.5), ("11", 0.5)]))].into_iter().collect(),
    };
    let mut cost = QcbmCostFunction::new(
        FixedAnsatz,
        backend,
        TotalVariationDistance,
        DistanceMeasureParameters::new(),
        dist(&[("00", 1.0)]),
    );

    let value = cost.evaluate(&[])?;
    assert!((value.value - 0.5).abs() < TEST_TOLERANCE, "got {}", value);
    assert_eq!(value.precision, None);
    Ok(())
}

#[test]
fn test_history_is_ordered() -> Result<(), QcbmError> {
    let mut cost = QcbmCostFunction::new(
        RotationAnsatz,
        ExactBackend,
        TotalVariationDistance,
        DistanceMeasureParameters::new(),
        dist(&[("0", 1.0)]),
    );
    assert!(cost.saves_evaluation_history());
    assert_eq!(cost.gradient_type(), GradientType::FiniteDifference);

    let inputs = [vec![0.1], vec![0.2, 0.2], vec![0.7]];
    let expected = [0.1, 0.4, 0.7];
    for params in &inputs {
        cost.evaluate(params)?;
    }

    let history = cost.evaluations_history();
    assert_eq!(history.len(), 3);
    for (i, record) in history.iter().enumerate() {
        assert_eq!(record.params, inputs[i]);
        assert!((record.value - expected[i]).abs() < 1e-9, "Record {} value {}", i, record.value);
        let p1 = record.bitstring_distribution.get("1").copied().unwrap_or_default();
        assert!((p1 - expected[i]).abs() < 1e-9);
    }
    Ok(())
}

#[test]
fn test_history_disabled_stays_empty() -> Result<(), QcbmError> {
    let mut cost = QcbmCostFunctionBuilder::new()
        .ansatz(RotationAnsatz)
        .backend(ExactBackend)
        .distance_measure(TotalVariationDistance)
        .target_distribution(dist(&[("0", 1.0)]))
        .save_evaluation_history(false)
        .build()?;

    for step in 0..5 {
        cost.evaluate(&[step as f64 * 0.1])?;
        assert!(cost.evaluations_history().is_empty());
    }
    assert!(!cost.saves_evaluation_history());
    Ok(())
}

#[test]
fn test_history_params_are_owned_copies() -> Result<(), QcbmError> {
    let mut cost = QcbmCostFunction::new(
        RotationAnsatz,
        ExactBackend,
        TotalVariationDistance,
        DistanceMeasureParameters::new(),
        dist(&[("0", 1.0)]),
    );
    let mut params = vec![0.3];
    cost.evaluate(&params)?;
    params[0] = 0.9;
    assert_eq!(cost.evaluations_history()[0].params, vec![0.3]);
    Ok(())
}

#[test]
fn test_backend_error_passes_through() {
    let mut cost = QcbmCostFunction::new(
        FixedAnsatz,
        LookupBackend { table: HashMap::new() },
        TotalVariationDistance,
        DistanceMeasureParameters::new(),
        dist(&[("00", 1.0)]),
    );
    let err = cost.evaluate(&[1.0]).unwrap_err();
    match err {
        QcbmError::BackendError { message } => assert_eq!(message, "unknown circuit bell"),
        other => panic!("Unexpected error {:?}", other),
    }
    assert!(cost.evaluations_history().is_empty());
}

#[test]
fn test_distance_error_passes_through() {
    let failing = |_: &BitstringDistribution,
                   _: &BitstringDistribution,
                   _: &DistanceMeasureParameters|
     -> Result<f64, QcbmError> {
        Err(QcbmError::DistanceError { message: "no".to_string() })
    };
    let mut cost = QcbmCostFunction::new(
        RotationAnsatz,
        ExactBackend,
        failing,
        DistanceMeasureParameters::new(),
        dist(&[("0", 1.0)]),
    );
    assert!(matches!(cost.evaluate(&[0.5]), Err(QcbmError::DistanceError { .. })));
}

#[test]
fn test_qubit_mismatch_is_reported() {
    let mut cost = QcbmCostFunction::new(
        RotationAnsatz,
        ExactBackend,
        TotalVariationDistance,
        DistanceMeasureParameters::new(),
        dist(&[("00", 1.0)]),
    );
    assert!(matches!(
        cost.evaluate(&[0.5]),
        Err(QcbmError::DistributionMismatch { target_qubits: Some(2), measured_qubits: Some(1) })
    ));
}
