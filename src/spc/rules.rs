//! Western Electric (WECO) run rules over a calibrated X-bar chart.
//!
//! The engine consumes one ordered sequence of subgroup means — calibration
//! subgroups followed by monitoring subgroups — and evaluates four run
//! rules at every monitoring position. Calibration points never trigger
//! alerts, but they do participate in the sliding windows of the
//! window-based rules, so a shift that begins at the first monitoring
//! point is detected with full history.
//!
//! Each rule is evaluated fresh at each index over a pure sliding window;
//! no running counters are kept, and the same point may trigger the same
//! rule at several consecutive indices as the window advances.
//!
//! # References
//!
//! - Western Electric (1956). *Statistical Quality Control Handbook*.
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.

use serde::Serialize;

use crate::data::Subgroup;
use crate::spc::variables::LimitTriple;

/// The four Western Electric run rules, numbered as reported in alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum WecoRule {
    /// Rule 1: a single point beyond the 3-sigma control limits.
    BeyondLimits,
    /// Rule 2: 2 of the 3 most recent points beyond 2 sigma, same side.
    TwoOfThreeBeyond2Sigma,
    /// Rule 3: 4 of the 5 most recent points beyond 1 sigma, same side.
    FourOfFiveBeyond1Sigma,
    /// Rule 4: the 8 most recent points all strictly on one side of the
    /// center line.
    EightOneSide,
}

impl WecoRule {
    /// The conventional rule number (1..=4).
    pub fn number(self) -> u8 {
        match self {
            WecoRule::BeyondLimits => 1,
            WecoRule::TwoOfThreeBeyond2Sigma => 2,
            WecoRule::FourOfFiveBeyond1Sigma => 3,
            WecoRule::EightOneSide => 4,
        }
    }

    /// How many most-recent points the rule's window spans.
    fn window(self) -> usize {
        match self {
            WecoRule::BeyondLimits => 1,
            WecoRule::TwoOfThreeBeyond2Sigma => 3,
            WecoRule::FourOfFiveBeyond1Sigma => 5,
            WecoRule::EightOneSide => 8,
        }
    }
}

/// An out-of-control signal raised at one monitoring point.
///
/// Alerts are append-only observations: once emitted they are never
/// retracted or merged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    /// The rule that fired.
    pub rule: WecoRule,
    /// Sample identifier of the triggering point.
    pub sample: String,
    /// The triggering point's subgroup mean.
    pub value: f64,
    /// Human-readable description.
    pub message: String,
}

/// The 1-sigma and 2-sigma zone boundaries derived from X-bar limits.
///
/// Derived once before evaluation and used only by the rule engine; the
/// zone width is `(LSC - LM) / 3` per sigma.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneThresholds {
    /// Center line (LM).
    pub center: f64,
    /// Upper control limit (LM + 3 sigma).
    pub upper_3s: f64,
    /// Lower control limit (LM - 3 sigma).
    pub lower_3s: f64,
    /// LM + 2 sigma.
    pub upper_2s: f64,
    /// LM - 2 sigma.
    pub lower_2s: f64,
    /// LM + 1 sigma.
    pub upper_1s: f64,
    /// LM - 1 sigma.
    pub lower_1s: f64,
}

impl ZoneThresholds {
    /// Derive the zones from a calibrated X-bar limit triple.
    pub fn from_limits(xbar: &LimitTriple) -> Self {
        let sigma = (xbar.upper - xbar.center) / 3.0;
        Self {
            center: xbar.center,
            upper_3s: xbar.upper,
            lower_3s: xbar.lower,
            upper_2s: xbar.center + 2.0 * sigma,
            lower_2s: xbar.center - 2.0 * sigma,
            upper_1s: xbar.center + sigma,
            lower_1s: xbar.center - sigma,
        }
    }
}

/// Evaluate the four WECO rules over a combined calibration + monitoring
/// sequence.
///
/// `points` holds the calibration subgroups followed by the monitoring
/// subgroups; `monitor_start` is the index of the first monitoring point.
/// Only indices at or after `monitor_start` can trigger alerts, but
/// earlier points participate in the windows of rules 2-4. A rule whose
/// window does not fit at an index is skipped there — never an error.
///
/// Alerts are returned in discovery order: increasing index, then rule
/// number. A `monitor_start` at or past the end of `points` yields an
/// empty list (the no-monitoring-data case is expected and non-fatal).
pub fn evaluate_weco(
    points: &[Subgroup],
    xbar: &LimitTriple,
    monitor_start: usize,
) -> Vec<Alert> {
    let zones = ZoneThresholds::from_limits(xbar);
    let mut alerts = Vec::new();

    for i in monitor_start..points.len() {
        let point = &points[i];

        if point.mean > zones.upper_3s || point.mean < zones.lower_3s {
            alerts.push(alert(WecoRule::BeyondLimits, point, "point beyond control limits"));
        }

        if let Some(window) = trailing(points, i, WecoRule::TwoOfThreeBeyond2Sigma) {
            let above = window.iter().filter(|p| p.mean > zones.upper_2s).count();
            let below = window.iter().filter(|p| p.mean < zones.lower_2s).count();
            if above >= 2 || below >= 2 {
                alerts.push(alert(
                    WecoRule::TwoOfThreeBeyond2Sigma,
                    point,
                    "2 of 3 points beyond 2-sigma on the same side",
                ));
            }
        }

        if let Some(window) = trailing(points, i, WecoRule::FourOfFiveBeyond1Sigma) {
            let above = window.iter().filter(|p| p.mean > zones.upper_1s).count();
            let below = window.iter().filter(|p| p.mean < zones.lower_1s).count();
            if above >= 4 || below >= 4 {
                alerts.push(alert(
                    WecoRule::FourOfFiveBeyond1Sigma,
                    point,
                    "4 of 5 points beyond 1-sigma on the same side",
                ));
            }
        }

        if let Some(window) = trailing(points, i, WecoRule::EightOneSide) {
            // A point exactly on the center line breaks the run.
            let all_above = window.iter().all(|p| p.mean > zones.center);
            let all_below = window.iter().all(|p| p.mean < zones.center);
            if all_above || all_below {
                alerts.push(alert(
                    WecoRule::EightOneSide,
                    point,
                    "8 consecutive points on one side of the center line",
                ));
            }
        }
    }

    alerts
}

/// The `rule.window()` most recent points ending at `i`, or `None` when
/// not enough history exists.
fn trailing(points: &[Subgroup], i: usize, rule: WecoRule) -> Option<&[Subgroup]> {
    let span = rule.window();
    (i + 1 >= span).then(|| &points[i + 1 - span..=i])
}

fn alert(rule: WecoRule, point: &Subgroup, what: &str) -> Alert {
    Alert {
        rule,
        sample: point.sample.clone(),
        value: point.mean,
        message: format!(
            "sample {}: rule {} - {what} ({:.5})",
            point.sample,
            rule.number(),
            point.mean
        ),
    }
}
