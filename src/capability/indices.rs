//! Process capability indices (Cp, Cpk, Cps, Cpi).
//!
//! Capability indices quantify how well a process output fits within
//! specification limits, using the within-subgroup sigma estimated from
//! the calibrated control chart (`sigma = R-bar / d2`).
//!
//! Degenerate spreads are handled with a sentinel rather than an error:
//! when `6 * sigma` (or `3 * sigma`) is not strictly positive, the
//! corresponding index is reported as 0.
//!
//! # References
//!
//! - Montgomery (2019), *Introduction to Statistical Quality Control*,
//!   8th ed., Chapter 8.
//! - Kane (1986), "Process Capability Indices", *Journal of Quality
//!   Technology* 18(1), pp. 41--52.

use serde::Serialize;

/// Computed capability indices for a two-sided specification.
///
/// | Index | Value | Interpretation |
/// |-------|-------|----------------|
/// | Cp    | >= 1.33 | Process spread fits the tolerance |
/// | Cpk   | >= 1.33 | Process is capable and centered |
///
/// Cps and Cpi are the one-sided components against the upper and lower
/// specification limits; Cpk is their minimum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CapabilityIndices {
    /// Cp = (LSE - LIE) / (6 * sigma); 0 when the spread is degenerate.
    #[serde(rename = "Cp")]
    pub cp: f64,
    /// Cpk = min(Cps, Cpi).
    #[serde(rename = "Cpk")]
    pub cpk: f64,
    /// Cps = (LSE - mu) / (3 * sigma); 0 when the spread is degenerate.
    #[serde(rename = "Cps")]
    pub cps: f64,
    /// Cpi = (mu - LIE) / (3 * sigma); 0 when the spread is degenerate.
    #[serde(rename = "Cpi")]
    pub cpi: f64,
}

/// Compute Cp, Cpk and the one-sided components from the process mean,
/// sigma estimate, and specification bounds.
///
/// # Examples
///
/// ```
/// use cep_analytics::capability::capability_indices;
///
/// let indices = capability_indices(50.0, 1.0, 55.0, 45.0);
/// assert!((indices.cp - 10.0 / 6.0).abs() < 1e-12);
/// assert!((indices.cpk - 5.0 / 3.0).abs() < 1e-12);
/// ```
pub fn capability_indices(mu: f64, sigma: f64, upper: f64, lower: f64) -> CapabilityIndices {
    let six_sigma = 6.0 * sigma;
    let cp = if six_sigma > 0.0 {
        (upper - lower) / six_sigma
    } else {
        0.0
    };

    let three_sigma = 3.0 * sigma;
    let (cps, cpi) = if three_sigma > 0.0 {
        ((upper - mu) / three_sigma, (mu - lower) / three_sigma)
    } else {
        (0.0, 0.0)
    };

    CapabilityIndices {
        cp,
        cpk: cps.min(cpi),
        cps,
        cpi,
    }
}
