//! Statistical Process Control (SPC) calibration and monitoring.
//!
//! Calibration derives fixed baseline limits from in-control data; the
//! rule engine then checks new monitoring data against those baselines.
//!
//! # Variables Charts
//!
//! - [`calibrate_xbar_r`] — X-bar and Range limits from subgroup statistics
//!
//! # Attributes Charts
//!
//! - [`calibrate_p`] — Proportion nonconforming (variable sample size)
//! - [`calibrate_u`] — Defects per unit (variable area of opportunity)
//!
//! # Run Rules
//!
//! - [`evaluate_weco`] — the 4 classic Western Electric rules over a
//!   combined calibration + monitoring sequence
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.
//! - Western Electric (1956). *Statistical Quality Control Handbook*.
//! - ASTM E2587 — Standard Practice for Use of Control Charts

mod attributes;
mod rules;
mod variables;

pub use attributes::{
    calibrate_p, calibrate_u, AttributePoint, PChartLimits, UChartLimits,
};
pub use rules::{evaluate_weco, Alert, WecoRule, ZoneThresholds};
pub use variables::{calibrate_xbar_r, ChartKind, LimitTriple, XbarRLimits};
