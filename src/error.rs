//! Error types for calibration, rule evaluation, and capability analysis.
//!
//! Every fallible operation in the crate reports failure locally through
//! [`SpcError`]; no component aborts a larger computation on behalf of its
//! caller. Independent analyses (P chart vs. U chart, baseline limits vs.
//! capability) fail independently.

use thiserror::Error;

/// Errors produced by the calibration and analysis routines.
///
/// The variants fall into three groups:
///
/// - **Configuration**: a required control-chart constant or specification
///   entry is missing or malformed.
/// - **Data**: calibration input is empty or malformed.
/// - **Numerical degeneracy**: a zero-variance input makes the sigma
///   estimate unusable where it is required downstream.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpcError {
    /// No constants entry exists for the requested subgroup size.
    #[error("control chart constants unavailable for subgroup size {n}")]
    ConstantsMissing {
        /// The subgroup size that was looked up.
        n: usize,
    },

    /// A constants entry exists for the size, but a required field is absent.
    #[error("control chart constant {name} unavailable for subgroup size {n}")]
    ConstantFieldMissing {
        /// The subgroup size that was looked up.
        n: usize,
        /// Name of the missing field (`A2`, `D3`, `D4`, or `d2`).
        name: &'static str,
    },

    /// The `d2` constant is present but not a positive number, making
    /// sigma estimation impossible.
    #[error("control chart constant d2 is not a positive number for subgroup size {n}")]
    InvalidD2 {
        /// The subgroup size that was looked up.
        n: usize,
    },

    /// A constants table key could not be parsed as a subgroup size.
    #[error("constants table key {key:?} is not a valid subgroup size")]
    InvalidConstantsKey {
        /// The offending map key.
        key: String,
    },

    /// A calibration input sequence was empty.
    #[error("calibration input is empty")]
    EmptyCalibration,

    /// A subgroup's measurement count differs from the run's subgroup size.
    #[error("subgroup {sample} has {found} measurements, expected {expected}")]
    RaggedSubgroup {
        /// Sample identifier of the offending subgroup.
        sample: String,
        /// Subgroup size established by the first record.
        expected: usize,
        /// Measurement count actually found.
        found: usize,
    },

    /// A subgroup contains a NaN or infinite measurement.
    #[error("subgroup {sample} contains a non-finite measurement")]
    NonFiniteMeasurement {
        /// Sample identifier of the offending subgroup.
        sample: String,
    },

    /// A defective count exceeds the inspected count for a lot.
    #[error("lot {lot}: defective count {defective} exceeds inspected count {inspected}")]
    DefectiveExceedsInspected {
        /// Lot identifier.
        lot: String,
        /// Defective count.
        defective: u64,
        /// Inspected count.
        inspected: u64,
    },

    /// The pooled total of inspected units is zero, so no center line exists.
    #[error("total inspected count is zero, cannot compute pooled center line")]
    ZeroTotalInspected,

    /// The estimated process sigma is zero; capability analysis cannot proceed.
    #[error("estimated sigma is zero for subgroup size {n}")]
    DegenerateSigma {
        /// The subgroup size the sigma estimate was derived for.
        n: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_errors_name_the_size() {
        let whole = SpcError::ConstantsMissing { n: 7 };
        assert!(whole.to_string().contains("size 7"));

        let field = SpcError::ConstantFieldMissing { n: 7, name: "D4" };
        assert!(field.to_string().contains("D4"));
        assert!(field.to_string().contains("size 7"));
    }

    #[test]
    fn whole_entry_and_partial_entry_are_distinct() {
        assert_ne!(
            SpcError::ConstantsMissing { n: 5 },
            SpcError::ConstantFieldMissing { n: 5, name: "A2" }
        );
    }

    #[test]
    fn ragged_subgroup_reports_both_counts() {
        let err = SpcError::RaggedSubgroup {
            sample: "12".to_string(),
            expected: 5,
            found: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains('5') && msg.contains('4'));
    }
}
