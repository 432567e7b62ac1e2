//! Attribute chart calibration: pooled P (proportion) and U (rate) baselines.
//!
//! Both charts share the pooled-center pattern: the center line is the
//! aggregate defect rate over all calibration records, and because the
//! sample size varies per record, control limits are a function of each
//! record's own `n` rather than a single fixed band:
//!
//! - P chart (binomial): `UCL/LCL_i = p-bar +/- 3 * sqrt(p-bar * (1 - p-bar) / n_i)`
//! - U chart (Poisson):  `UCL/LCL_i = u-bar +/- 3 * sqrt(u-bar / n_i)`
//!
//! The lower limit is clamped to 0 in both cases; a proportion or rate
//! cannot be negative. A record is out of limits when its own statistic
//! falls outside its own band.
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*,
//!   8th ed., Chapter 7: Control Charts for Attributes.

use serde::Serialize;

use crate::data::{DefectSample, DefectiveLot};
use crate::error::SpcError;
use crate::spc::variables::ChartKind;

/// A per-record point on an attribute chart, with its own variable limits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributePoint {
    /// Zero-based position in the calibration sequence.
    pub index: usize,
    /// Lot or sample identifier.
    pub id: String,
    /// The record's own proportion or rate.
    pub value: f64,
    /// Upper control limit for this record's sample size.
    pub ucl: f64,
    /// Pooled center line.
    pub cl: f64,
    /// Lower control limit for this record's sample size (never negative).
    pub lcl: f64,
    /// Whether the value falls outside this record's own limits.
    pub out_of_control: bool,
}

// ---------------------------------------------------------------------------
// P chart
// ---------------------------------------------------------------------------

/// Calibrated P chart baseline: pooled proportion and totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PChartLimits {
    /// Chart kind tag (always [`ChartKind::P`]).
    #[serde(rename = "tipo_grafico")]
    pub kind: ChartKind,
    /// Pooled proportion defective (p-bar), the center line.
    #[serde(rename = "p_barra")]
    pub center: f64,
    /// Total defective items across all calibration lots.
    #[serde(rename = "total_defeituosos")]
    pub total_defective: u64,
    /// Total inspected items across all calibration lots.
    #[serde(rename = "total_inspecionados")]
    pub total_inspected: u64,
}

impl PChartLimits {
    /// The variable control limits for a lot of `n` inspected items,
    /// as `(ucl, lcl)` with the lower limit clamped to 0.
    ///
    /// A zero-size lot has no sampling band; its limits collapse to the
    /// center line so the output stays finite.
    pub fn limits_for(&self, n: u64) -> (f64, f64) {
        if n == 0 {
            return (self.center, self.center);
        }
        let spread = 3.0 * (self.center * (1.0 - self.center) / n as f64).sqrt();
        ((self.center + spread), (self.center - spread).max(0.0))
    }

    /// Chart points for a sequence of lots, each flagged against its own
    /// variable limits.
    pub fn points(&self, lots: &[DefectiveLot]) -> Vec<AttributePoint> {
        lots.iter()
            .enumerate()
            .map(|(index, lot)| {
                let (ucl, lcl) = self.limits_for(lot.inspected);
                let value = lot.proportion();
                AttributePoint {
                    index,
                    id: lot.lot.clone(),
                    value,
                    ucl,
                    cl: self.center,
                    lcl,
                    out_of_control: value > ucl || value < lcl,
                }
            })
            .collect()
    }

    /// Whether every lot in the sequence falls within its own limits.
    pub fn is_in_control(&self, lots: &[DefectiveLot]) -> bool {
        self.points(lots).iter().all(|p| !p.out_of_control)
    }
}

/// Calibrate a P chart baseline from inspection lots.
///
/// `p-bar = sum(d) / sum(n)` over all lots.
///
/// # Errors
///
/// [`SpcError::EmptyCalibration`] for no lots,
/// [`SpcError::DefectiveExceedsInspected`] when a lot reports more
/// defectives than inspected items, and [`SpcError::ZeroTotalInspected`]
/// when the pooled inspected total is zero.
pub fn calibrate_p(lots: &[DefectiveLot]) -> Result<PChartLimits, SpcError> {
    if lots.is_empty() {
        return Err(SpcError::EmptyCalibration);
    }
    for lot in lots {
        if lot.defective > lot.inspected {
            return Err(SpcError::DefectiveExceedsInspected {
                lot: lot.lot.clone(),
                defective: lot.defective,
                inspected: lot.inspected,
            });
        }
    }

    let total_defective: u64 = lots.iter().map(|l| l.defective).sum();
    let total_inspected: u64 = lots.iter().map(|l| l.inspected).sum();
    if total_inspected == 0 {
        return Err(SpcError::ZeroTotalInspected);
    }

    Ok(PChartLimits {
        kind: ChartKind::P,
        center: total_defective as f64 / total_inspected as f64,
        total_defective,
        total_inspected,
    })
}

// ---------------------------------------------------------------------------
// U chart
// ---------------------------------------------------------------------------

/// Calibrated U chart baseline: pooled defect rate and totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UChartLimits {
    /// Chart kind tag (always [`ChartKind::U`]).
    #[serde(rename = "tipo_grafico")]
    pub kind: ChartKind,
    /// Pooled defects per unit (u-bar), the center line.
    #[serde(rename = "u_barra")]
    pub center: f64,
    /// Total defects across all calibration samples.
    #[serde(rename = "total_defeitos")]
    pub total_defects: u64,
    /// Total units across all calibration samples.
    #[serde(rename = "total_unidades")]
    pub total_units: u64,
}

impl UChartLimits {
    /// The variable control limits for a sample of `n` units, as
    /// `(ucl, lcl)` with the lower limit clamped to 0.
    ///
    /// A zero-size sample has no sampling band; its limits collapse to
    /// the center line so the output stays finite.
    pub fn limits_for(&self, n: u64) -> (f64, f64) {
        if n == 0 {
            return (self.center, self.center);
        }
        let spread = 3.0 * (self.center / n as f64).sqrt();
        ((self.center + spread), (self.center - spread).max(0.0))
    }

    /// Chart points for a sequence of samples, each flagged against its
    /// own variable limits.
    pub fn points(&self, samples: &[DefectSample]) -> Vec<AttributePoint> {
        samples
            .iter()
            .enumerate()
            .map(|(index, s)| {
                let (ucl, lcl) = self.limits_for(s.units);
                let value = s.rate();
                AttributePoint {
                    index,
                    id: s.sample.clone(),
                    value,
                    ucl,
                    cl: self.center,
                    lcl,
                    out_of_control: value > ucl || value < lcl,
                }
            })
            .collect()
    }

    /// Whether every sample in the sequence falls within its own limits.
    pub fn is_in_control(&self, samples: &[DefectSample]) -> bool {
        self.points(samples).iter().all(|p| !p.out_of_control)
    }
}

/// Calibrate a U chart baseline from inspection samples.
///
/// `u-bar = sum(c) / sum(n)` over all samples.
///
/// # Errors
///
/// [`SpcError::EmptyCalibration`] for no samples and
/// [`SpcError::ZeroTotalInspected`] when the pooled unit total is zero.
pub fn calibrate_u(samples: &[DefectSample]) -> Result<UChartLimits, SpcError> {
    if samples.is_empty() {
        return Err(SpcError::EmptyCalibration);
    }

    let total_defects: u64 = samples.iter().map(|s| s.defects).sum();
    let total_units: u64 = samples.iter().map(|s| s.units).sum();
    if total_units == 0 {
        return Err(SpcError::ZeroTotalInspected);
    }

    Ok(UChartLimits {
        kind: ChartKind::U,
        center: total_defects as f64 / total_units as f64,
        total_defects,
        total_units,
    })
}
