//! X-bar-R baseline calibration from subgroup statistics.
//!
//! Calibration derives one fixed set of control limits from a batch of
//! in-control subgroups:
//!
//! 1. Grand mean `X-double-bar = mean(X-bar)` and average range
//!    `R-bar = mean(R)` over the calibration subgroups.
//! 2. X-bar chart: CL = X-double-bar, UCL/LCL = CL +/- A2 * R-bar.
//! 3. R chart: CL = R-bar, UCL = D4 * R-bar, LCL = D3 * R-bar.
//!
//! X-bar limits are never clamped (a measurement mean may be negative);
//! the R lower limit is exactly 0 whenever D3 = 0.
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*,
//!   8th ed., Chapter 6: Control Charts for Variables.
//! - ASTM E2587 — Standard Practice for Use of Control Charts

use serde::Serialize;

use crate::constants::{ChartFactors, ConstantsTable};
use crate::data::Subgroup;
use crate::error::SpcError;

/// The kind of control chart a limits record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChartKind {
    /// Subgroup mean and range chart.
    #[serde(rename = "X-R")]
    XbarR,
    /// Proportion nonconforming chart.
    #[serde(rename = "P")]
    P,
    /// Defects-per-unit chart.
    #[serde(rename = "U")]
    U,
}

/// Upper control limit, center line, lower control limit of one sub-chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LimitTriple {
    /// Upper control limit (LSC).
    #[serde(rename = "LSC")]
    pub upper: f64,
    /// Center line (LM).
    #[serde(rename = "LM")]
    pub center: f64,
    /// Lower control limit (LIC).
    #[serde(rename = "LIC")]
    pub lower: f64,
}

/// Calibrated X-bar-R baseline limits.
///
/// Created once per calibration run and never mutated; serializes to the
/// persisted limits-record shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XbarRLimits {
    /// Chart kind tag (always [`ChartKind::XbarR`]).
    #[serde(rename = "tipo_grafico")]
    pub kind: ChartKind,
    /// Subgroup size the limits were calibrated for.
    #[serde(rename = "n_amostra")]
    pub subgroup_size: usize,
    /// Grand mean of subgroup means (X-double-bar).
    #[serde(rename = "X_barra_barra")]
    pub grand_mean: f64,
    /// Average subgroup range (R-bar).
    #[serde(rename = "R_barra")]
    pub mean_range: f64,
    /// The chart factors used for this calibration.
    #[serde(rename = "constantes_usadas")]
    pub factors: ChartFactors,
    /// X-bar chart limits.
    #[serde(rename = "limites_X_barra")]
    pub xbar: LimitTriple,
    /// R chart limits.
    #[serde(rename = "limites_R")]
    pub range: LimitTriple,
}

/// Calibrate X-bar-R control limits from subgroup statistics.
///
/// `subgroups` must all share the subgroup size `n`; enforcing that is the
/// job of [`crate::data::reduce_subgroups`], which detects `n` while
/// deriving the statistics.
///
/// # Errors
///
/// [`SpcError::EmptyCalibration`] for an empty sequence, and the constants
/// lookup errors of [`ConstantsTable::chart_factors`].
///
/// # Examples
///
/// ```
/// use cep_analytics::constants::ConstantsTable;
/// use cep_analytics::data::Subgroup;
/// use cep_analytics::spc::calibrate_xbar_r;
///
/// let subgroups = vec![
///     Subgroup { sample: "1".into(), mean: 49.0, range: 3.0 },
///     Subgroup { sample: "2".into(), mean: 51.0, range: 5.0 },
/// ];
/// let limits = calibrate_xbar_r(&subgroups, 5, &ConstantsTable::astm_e2587()).unwrap();
/// assert!((limits.grand_mean - 50.0).abs() < 1e-12);
/// assert!((limits.mean_range - 4.0).abs() < 1e-12);
/// ```
pub fn calibrate_xbar_r(
    subgroups: &[Subgroup],
    n: usize,
    table: &ConstantsTable,
) -> Result<XbarRLimits, SpcError> {
    if subgroups.is_empty() {
        return Err(SpcError::EmptyCalibration);
    }
    let factors = table.chart_factors(n)?;

    let count = subgroups.len() as f64;
    let grand_mean = subgroups.iter().map(|s| s.mean).sum::<f64>() / count;
    let mean_range = subgroups.iter().map(|s| s.range).sum::<f64>() / count;

    let half_width = factors.a2 * mean_range;
    let xbar = LimitTriple {
        upper: grand_mean + half_width,
        center: grand_mean,
        lower: grand_mean - half_width,
    };
    let range = LimitTriple {
        upper: factors.d4 * mean_range,
        center: mean_range,
        lower: factors.d3 * mean_range,
    };

    Ok(XbarRLimits {
        kind: ChartKind::XbarR,
        subgroup_size: n,
        grand_mean,
        mean_range,
        factors,
        xbar,
        range,
    })
}
