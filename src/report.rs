//! Composed output record: calibrated limits plus optional capability.
//!
//! The surrounding system persists one record per calibrated process; when
//! a capability analysis ran, its block is nested inside that record under
//! a fixed key. Composition never mutates the limits or the analysis.

use serde::Serialize;

use crate::capability::CapabilityResult;
use crate::spc::XbarRLimits;

/// A calibrated X-bar-R record ready to persist, with the capability
/// analysis nested when one was run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XbarRReport {
    /// The calibrated limits, serialized at the top level of the record.
    #[serde(flatten)]
    pub limits: XbarRLimits,
    /// The capability block, when the analysis ran.
    #[serde(rename = "analise_capacidade", skip_serializing_if = "Option::is_none")]
    pub capability: Option<CapabilityResult>,
}

impl XbarRReport {
    /// A report with limits only.
    pub fn new(limits: XbarRLimits) -> Self {
        Self {
            limits,
            capability: None,
        }
    }

    /// A report carrying both the limits and a capability analysis.
    pub fn with_capability(limits: XbarRLimits, capability: CapabilityResult) -> Self {
        Self {
            limits,
            capability: Some(capability),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::analyze;
    use crate::constants::ConstantsTable;
    use crate::data::{Specification, Subgroup};
    use crate::spc::calibrate_xbar_r;

    fn calibrated() -> XbarRLimits {
        let subgroups = vec![
            Subgroup {
                sample: "1".to_string(),
                mean: 49.0,
                range: 2.0,
            },
            Subgroup {
                sample: "2".to_string(),
                mean: 51.0,
                range: 2.6,
            },
        ];
        calibrate_xbar_r(&subgroups, 5, &ConstantsTable::astm_e2587()).unwrap()
    }

    #[test]
    fn limits_only_report_omits_the_capability_key() {
        let report = XbarRReport::new(calibrated());
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["tipo_grafico"], "X-R");
        assert!(json["limites_X_barra"]["LSC"].is_f64());
        assert!(json.get("analise_capacidade").is_none());
    }

    #[test]
    fn capability_nests_under_the_fixed_key() {
        let limits = calibrated();
        let spec = Specification {
            upper: 55.0,
            lower: 45.0,
            arbitrary_threshold: None,
        };
        let capability = analyze(&limits, &ConstantsTable::astm_e2587(), &spec).unwrap();
        let report = XbarRReport::with_capability(limits, capability);
        let json = serde_json::to_value(&report).unwrap();

        assert!(json["analise_capacidade"]["sigma_estimado"].is_f64());
        assert!(json["analise_capacidade"]["Cpk"].is_f64());
        // The limits still serialize at the top level, untouched.
        assert!(json["X_barra_barra"].is_f64());
        assert!(json["limites_R"]["LM"].is_f64());
    }

    #[test]
    fn composition_does_not_mutate_the_limits() {
        let limits = calibrated();
        let report = XbarRReport::new(limits.clone());
        assert_eq!(report.limits, limits);
    }
}
