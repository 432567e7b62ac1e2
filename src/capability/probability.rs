//! Nonconformance probabilities and sigma levels under the normal model.
//!
//! Given the process mean and the sigma estimated from the calibrated
//! chart, the process output is modeled as `X ~ N(mu, sigma^2)` and the
//! specification-violation probabilities follow from the normal CDF:
//!
//! - Short-term (ST): tail mass outside `[LIE, LSE]` at the calibrated
//!   mean, its PPM equivalent, and the Z-level `Phi^-1(success) + 1.5`.
//! - Long-term (LT): the same tails after shifting the mean by
//!   `1.5 * sigma` toward the tighter specification margin, with
//!   `Z_lt = 3 * Cpk`.
//! - Arbitrary threshold: the single upper-tail probability
//!   `P(X > x0)` for a caller-supplied reference value.
//!
//! Z-levels saturate at +/-8 when the success probability reaches 1 or 0
//! in double precision, where the normal quantile would diverge.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};

/// Short-term nonconformance block at the calibrated process mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShortTermProbability {
    /// P(LIE <= X <= LSE).
    #[serde(rename = "prob_sucesso")]
    pub success: f64,
    /// Total tail probability outside the specification.
    #[serde(rename = "prob_defeito_total")]
    pub defect_total: f64,
    /// Lower-tail probability P(X < LIE).
    #[serde(rename = "prob_defeito_abaixo_LIE")]
    pub defect_below_lower: f64,
    /// Upper-tail probability P(X > LSE).
    #[serde(rename = "prob_defeito_acima_LSE")]
    pub defect_above_upper: f64,
    /// Defects per million opportunities.
    #[serde(rename = "ppm_st")]
    pub ppm: f64,
    /// Sigma level: `Phi^-1(success) + 1.5`, saturated at +/-8.
    #[serde(rename = "Z_level_st")]
    pub z_level: f64,
}

/// Long-term nonconformance block after the 1.5-sigma mean shift.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LongTermProbability {
    /// The shifted mean the tails were evaluated at.
    #[serde(rename = "media_deslocada_lt")]
    pub shifted_mean: f64,
    /// P(LIE <= X <= LSE) at the shifted mean.
    #[serde(rename = "prob_sucesso_lt")]
    pub success: f64,
    /// Total tail probability at the shifted mean.
    #[serde(rename = "prob_defeito_total_lt")]
    pub defect_total: f64,
    /// Defects per million opportunities at the shifted mean.
    #[serde(rename = "ppm_lt")]
    pub ppm: f64,
    /// Sigma level: `3 * Cpk`.
    #[serde(rename = "Z_level_lt")]
    pub z_level: f64,
}

/// Upper-tail exceedance of a caller-supplied reference value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdProbability {
    /// The reference value `x0`.
    #[serde(rename = "valor_referencia")]
    pub reference: f64,
    /// P(X > x0).
    #[serde(rename = "prob_acima_desse_valor")]
    pub above: f64,
    /// P(X > x0) per million opportunities.
    #[serde(rename = "ppm_acima_desse_valor")]
    pub ppm: f64,
}

/// The standard-normal quantile of the success probability plus the
/// conventional 1.5-sigma allowance, saturated at +/-8 where the
/// quantile has no finite value.
fn z_level(success: f64) -> f64 {
    if success >= 1.0 {
        8.0
    } else if success <= 0.0 {
        -8.0
    } else {
        let standard = Normal::new(0.0, 1.0).expect("standard normal is valid");
        standard.inverse_cdf(success) + 1.5
    }
}

/// Lower and upper tail probabilities of `N(mu, sigma^2)` outside
/// `[lower, upper]`.
fn tail_probabilities(mu: f64, sigma: f64, upper: f64, lower: f64) -> (f64, f64) {
    let dist = Normal::new(mu, sigma).expect("sigma must be positive and finite");
    (dist.cdf(lower), 1.0 - dist.cdf(upper))
}

/// Short-term nonconformance probabilities at the calibrated mean.
///
/// # Panics
///
/// Panics if `sigma` is not strictly positive and finite.
pub fn short_term_probability(
    mu: f64,
    sigma: f64,
    upper: f64,
    lower: f64,
) -> ShortTermProbability {
    let (defect_below_lower, defect_above_upper) = tail_probabilities(mu, sigma, upper, lower);
    let defect_total = defect_below_lower + defect_above_upper;
    let success = 1.0 - defect_total;

    ShortTermProbability {
        success,
        defect_total,
        defect_below_lower,
        defect_above_upper,
        ppm: defect_total * 1_000_000.0,
        z_level: z_level(success),
    }
}

/// Long-term nonconformance probabilities after shifting the mean by
/// `1.5 * sigma` toward the tighter specification margin.
///
/// The shift goes downward when the upper margin `LSE - mu` is smaller
/// than the lower margin `mu - LIE`, upward otherwise (a centered mean
/// shifts upward). `cpk` feeds the long-term sigma level `3 * Cpk`.
///
/// # Panics
///
/// Panics if `sigma` is not strictly positive and finite.
pub fn long_term_probability(
    mu: f64,
    sigma: f64,
    upper: f64,
    lower: f64,
    cpk: f64,
) -> LongTermProbability {
    let shift = 1.5 * sigma;
    let shifted_mean = if (upper - mu) < (mu - lower) {
        mu - shift
    } else {
        mu + shift
    };

    let (defect_below_lower, defect_above_upper) =
        tail_probabilities(shifted_mean, sigma, upper, lower);
    let defect_total = defect_below_lower + defect_above_upper;

    LongTermProbability {
        shifted_mean,
        success: 1.0 - defect_total,
        defect_total,
        ppm: defect_total * 1_000_000.0,
        z_level: 3.0 * cpk,
    }
}

/// Probability of exceeding a single reference value, `P(X > x0)`.
///
/// # Panics
///
/// Panics if `sigma` is not strictly positive and finite.
pub fn threshold_probability(mu: f64, sigma: f64, reference: f64) -> ThresholdProbability {
    let dist = Normal::new(mu, sigma).expect("sigma must be positive and finite");
    let above = 1.0 - dist.cdf(reference);

    ThresholdProbability {
        reference,
        above,
        ppm: above * 1_000_000.0,
    }
}
