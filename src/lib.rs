//! # cep-analytics
//!
//! Statistical process control (SPC) calibration, run-rule monitoring, and
//! process capability analysis.
//!
//! The crate is the computational core of a quality-control system: it
//! turns in-control calibration data into fixed baseline limits, checks
//! monitoring data against those baselines with the Western Electric run
//! rules, and quantifies how well the process fits its engineering
//! specification. It performs no I/O; inputs and outputs are plain
//! records that (de)serialize to the persisted JSON shapes of the
//! surrounding system.
//!
//! ## Modules
//!
//! - [`constants`] — Control chart factor tables (A2, D3, D4, d2)
//! - [`data`] — Validated input records (subgroups, lots, specifications)
//! - [`spc`] — Limit calibration (X̄-R, P, U) and the WECO rule engine
//! - [`capability`] — Cp/Cpk indices and defect-probability analysis
//! - [`report`] — Composed limits + capability output records
//! - [`error`] — The crate error type
//!
//! ## Design Philosophy
//!
//! - **Calibrate once, monitor many**: limits are derived from a
//!   calibration batch and never adjusted by monitoring data
//! - **Values in, values out**: no file or console side effects; alerts
//!   are returned data, reporting is the caller's concern
//! - **Research-backed**: algorithms reference the standard SPC
//!   literature
//!
//! ## Example
//!
//! ```
//! use cep_analytics::constants::ConstantsTable;
//! use cep_analytics::data::{reduce_subgroups, SubgroupRecord};
//! use cep_analytics::spc::{calibrate_xbar_r, evaluate_weco};
//!
//! let records = vec![
//!     SubgroupRecord { sample: "1".into(), values: vec![49.0, 50.0, 51.0] },
//!     SubgroupRecord { sample: "2".into(), values: vec![48.5, 50.5, 50.0] },
//! ];
//! let (subgroups, n) = reduce_subgroups(&records)?;
//! let limits = calibrate_xbar_r(&subgroups, n, &ConstantsTable::astm_e2587())?;
//!
//! // Monitoring data would be appended after the calibration subgroups;
//! // here the whole sequence is calibration, so nothing is monitored.
//! let alerts = evaluate_weco(&subgroups, &limits.xbar, subgroups.len());
//! assert!(alerts.is_empty());
//! # Ok::<(), cep_analytics::error::SpcError>(())
//! ```

pub mod capability;
pub mod constants;
pub mod data;
pub mod error;
pub mod report;
pub mod spc;
