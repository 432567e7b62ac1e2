//! Process capability and defect-probability analysis.
//!
//! Runs after X-bar-R calibration: the within-subgroup sigma is estimated
//! as `R-bar / d2`, capability indices compare the process spread and
//! centering against the engineering specification, and the probability
//! blocks model the output as normal to report expected nonconformance.
//!
//! # Pipeline
//!
//! [`analyze`] chains the steps in order: sigma estimate, then
//! [`capability_indices`], then [`short_term_probability`] and
//! [`long_term_probability`], then the optional
//! [`threshold_probability`]. A missing or zero `d2` and a zero sigma are
//! fatal to this analysis only; they never invalidate the calibrated
//! limits themselves.
//!
//! # References
//!
//! - Montgomery (2019), *Introduction to Statistical Quality Control*, 8th ed.
//! - Kane (1986), "Process Capability Indices", *J. Quality Technology* 18(1).

mod indices;
mod probability;

pub use indices::{capability_indices, CapabilityIndices};
pub use probability::{
    long_term_probability, short_term_probability, threshold_probability, LongTermProbability,
    ShortTermProbability, ThresholdProbability,
};

use serde::Serialize;

use crate::constants::ConstantsTable;
use crate::data::Specification;
use crate::error::SpcError;
use crate::spc::XbarRLimits;

/// The specification bounds an analysis was run against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpecBounds {
    /// Upper specification limit.
    #[serde(rename = "LSE")]
    pub upper: f64,
    /// Lower specification limit.
    #[serde(rename = "LIE")]
    pub lower: f64,
}

/// The complete capability analysis of one calibrated process.
///
/// Created once per analysis run and never mutated; serializes to the
/// persisted capability-block shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapabilityResult {
    /// Sigma estimated from the calibrated chart (`R-bar / d2`).
    #[serde(rename = "sigma_estimado")]
    pub sigma: f64,
    /// The specification bounds used.
    #[serde(rename = "especificacoes")]
    pub bounds: SpecBounds,
    /// Cp, Cpk and the one-sided components.
    #[serde(flatten)]
    pub indices: CapabilityIndices,
    /// Nonconformance at the calibrated mean.
    #[serde(rename = "probabilidade_curto_prazo_st")]
    pub short_term: ShortTermProbability,
    /// Nonconformance after the 1.5-sigma mean shift.
    #[serde(rename = "probabilidade_longo_prazo_lt")]
    pub long_term: LongTermProbability,
    /// Short-term reliability, `1 - F` = the ST success probability.
    #[serde(rename = "confiabilidade_st_1_menos_F")]
    pub reliability: f64,
    /// Exceedance of the arbitrary reference value, when one was supplied.
    #[serde(rename = "probabilidade_arbitraria", skip_serializing_if = "Option::is_none")]
    pub arbitrary: Option<ThresholdProbability>,
}

/// Run the full capability and probability analysis for a calibrated
/// X-bar-R process.
///
/// The arbitrary-threshold block is computed only when the specification
/// carries a parseable reference value; an absent or unparsable value is
/// skipped silently.
///
/// # Errors
///
/// The `d2` lookup errors of [`ConstantsTable::d2`], and
/// [`SpcError::DegenerateSigma`] when `R-bar / d2` is zero (all
/// calibration subgroups had zero range).
///
/// # Examples
///
/// ```
/// use cep_analytics::capability::analyze;
/// use cep_analytics::constants::ConstantsTable;
/// use cep_analytics::data::{Specification, Subgroup};
/// use cep_analytics::spc::calibrate_xbar_r;
///
/// let subgroups = vec![
///     Subgroup { sample: "1".into(), mean: 49.5, range: 2.0 },
///     Subgroup { sample: "2".into(), mean: 50.5, range: 2.6 },
/// ];
/// let table = ConstantsTable::astm_e2587();
/// let limits = calibrate_xbar_r(&subgroups, 5, &table).unwrap();
/// let spec = Specification { upper: 55.0, lower: 45.0, arbitrary_threshold: None };
///
/// let result = analyze(&limits, &table, &spec).unwrap();
/// assert!((result.sigma - 2.3 / 2.326).abs() < 1e-9);
/// assert!(result.indices.cpk > 1.0);
/// ```
pub fn analyze(
    limits: &XbarRLimits,
    table: &ConstantsTable,
    spec: &Specification,
) -> Result<CapabilityResult, SpcError> {
    let d2 = table.d2(limits.subgroup_size)?;
    let sigma = limits.mean_range / d2;
    if sigma <= 0.0 || !sigma.is_finite() {
        return Err(SpcError::DegenerateSigma {
            n: limits.subgroup_size,
        });
    }

    let mu = limits.grand_mean;
    let indices = capability_indices(mu, sigma, spec.upper, spec.lower);
    let short_term = short_term_probability(mu, sigma, spec.upper, spec.lower);
    let long_term = long_term_probability(mu, sigma, spec.upper, spec.lower, indices.cpk);
    let arbitrary = spec
        .threshold()
        .map(|x0| threshold_probability(mu, sigma, x0));

    Ok(CapabilityResult {
        sigma,
        bounds: SpecBounds {
            upper: spec.upper,
            lower: spec.lower,
        },
        reliability: short_term.success,
        indices,
        short_term,
        long_term,
        arbitrary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Subgroup, ThresholdValue};
    use crate::spc::calibrate_xbar_r;

    fn limits_with(mean_range: f64, n: usize) -> XbarRLimits {
        let subgroups = vec![
            Subgroup {
                sample: "1".to_string(),
                mean: 50.0,
                range: mean_range,
            },
        ];
        calibrate_xbar_r(&subgroups, n, &ConstantsTable::astm_e2587()).unwrap()
    }

    fn spec(threshold: Option<ThresholdValue>) -> Specification {
        Specification {
            upper: 55.0,
            lower: 45.0,
            arbitrary_threshold: threshold,
        }
    }

    /// n=5 (d2 = 2.326), R-bar = 2.326: sigma is exactly 1, so the
    /// whole chain reduces to the textbook centered case.
    #[test]
    fn full_chain_with_unit_sigma() {
        let result = analyze(&limits_with(2.326, 5), &ConstantsTable::astm_e2587(), &spec(None))
            .unwrap();

        assert!((result.sigma - 1.0).abs() < 1e-12);
        assert!((result.indices.cp - 10.0 / 6.0).abs() < 1e-12);
        assert!((result.indices.cpk - 5.0 / 3.0).abs() < 1e-12);
        assert!((result.long_term.z_level - 5.0).abs() < 1e-12);
        assert!((result.reliability - result.short_term.success).abs() < f64::EPSILON);
        assert!(result.arbitrary.is_none());
    }

    #[test]
    fn missing_d2_fails_the_analysis() {
        let table = ConstantsTable::astm_e2587();
        let limits = XbarRLimits {
            subgroup_size: 42,
            ..limits_with(2.0, 5)
        };
        let result = analyze(&limits, &table, &spec(None));
        assert_eq!(result, Err(SpcError::ConstantsMissing { n: 42 }));
    }

    #[test]
    fn negative_d2_is_a_typed_error_not_a_panic() {
        // A sign-flipped d2 deserializes fine from the constants JSON;
        // the analysis must fail with the constants error before any
        // probability step can see a negative sigma.
        let table = ConstantsTable::from_entries([(
            5,
            crate::constants::ConstantsEntry {
                a2: Some(0.577),
                d3: Some(0.0),
                d4: Some(2.114),
                d2: Some(-2.326),
            },
        )]);
        let result = analyze(&limits_with(2.326, 5), &table, &spec(None));
        assert_eq!(result, Err(SpcError::InvalidD2 { n: 5 }));
    }

    #[test]
    fn zero_mean_range_is_degenerate() {
        let result = analyze(&limits_with(0.0, 5), &ConstantsTable::astm_e2587(), &spec(None));
        assert_eq!(result, Err(SpcError::DegenerateSigma { n: 5 }));
    }

    #[test]
    fn numeric_threshold_adds_the_arbitrary_block() {
        let result = analyze(
            &limits_with(2.326, 5),
            &ConstantsTable::astm_e2587(),
            &spec(Some(ThresholdValue::Number(52.0))),
        )
        .unwrap();
        let arb = result.arbitrary.unwrap();
        assert!((arb.reference - 52.0).abs() < f64::EPSILON);
        assert!(arb.above > 0.0 && arb.above < 0.5);
    }

    #[test]
    fn unparsable_threshold_is_skipped_silently() {
        let result = analyze(
            &limits_with(2.326, 5),
            &ConstantsTable::astm_e2587(),
            &spec(Some(ThresholdValue::Text("n/a".to_string()))),
        )
        .unwrap();
        assert!(result.arbitrary.is_none());
    }

    #[test]
    fn serializes_to_persisted_shape() {
        let result = analyze(
            &limits_with(2.326, 5),
            &ConstantsTable::astm_e2587(),
            &spec(Some(ThresholdValue::Number(52.0))),
        )
        .unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert!(json["sigma_estimado"].is_f64());
        assert!((json["especificacoes"]["LSE"].as_f64().unwrap() - 55.0).abs() < 1e-12);
        assert!(json["Cp"].is_f64());
        assert!(json["Cpk"].is_f64());
        assert!(json["probabilidade_curto_prazo_st"]["prob_sucesso"].is_f64());
        assert!(json["probabilidade_longo_prazo_lt"]["media_deslocada_lt"].is_f64());
        assert!(json["confiabilidade_st_1_menos_F"].is_f64());
        assert!(json["probabilidade_arbitraria"]["valor_referencia"].is_f64());
    }

    #[test]
    fn absent_threshold_omits_the_key() {
        let result = analyze(&limits_with(2.326, 5), &ConstantsTable::astm_e2587(), &spec(None))
            .unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("probabilidade_arbitraria").is_none());
    }
}
