//! Validated input records for calibration and monitoring.
//!
//! The raw records mirror the persisted JSON the surrounding system
//! exchanges: variables subgroups carry a sample id and a fixed-length
//! measurement list, attribute records carry counts, and the specification
//! carries the engineering bounds. Derivation (subgroup mean and range,
//! proportions, rates) happens exactly once; the derived structs are never
//! mutated afterwards.

use serde::{Deserialize, Deserializer};

use crate::error::SpcError;

/// A raw variables record: sample identifier plus the measurements of one
/// subgroup. Calibration and monitoring files share this shape.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubgroupRecord {
    /// Sample identifier (persisted as either a JSON number or string).
    #[serde(rename = "Amostra", deserialize_with = "sample_id")]
    pub sample: String,
    /// Raw measurements; length must equal the run's subgroup size.
    #[serde(rename = "Dados")]
    pub values: Vec<f64>,
}

/// A subgroup summarized by its mean and range. Immutable once derived.
#[derive(Debug, Clone, PartialEq)]
pub struct Subgroup {
    /// Sample identifier carried over from the raw record.
    pub sample: String,
    /// Subgroup mean (X-bar).
    pub mean: f64,
    /// Subgroup range (max - min).
    pub range: f64,
}

impl Subgroup {
    /// Derive mean and range from a raw record.
    ///
    /// # Errors
    ///
    /// [`SpcError::EmptyCalibration`] for an empty measurement list and
    /// [`SpcError::NonFiniteMeasurement`] for NaN or infinite values.
    pub fn from_record(record: &SubgroupRecord) -> Result<Self, SpcError> {
        if record.values.is_empty() {
            return Err(SpcError::EmptyCalibration);
        }
        if !record.values.iter().all(|x| x.is_finite()) {
            return Err(SpcError::NonFiniteMeasurement {
                sample: record.sample.clone(),
            });
        }
        let sum: f64 = record.values.iter().sum();
        let mean = sum / record.values.len() as f64;
        let max = record.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = record.values.iter().copied().fold(f64::INFINITY, f64::min);
        Ok(Self {
            sample: record.sample.clone(),
            mean,
            range: max - min,
        })
    }
}

/// Derive all subgroups of a run and detect its subgroup size.
///
/// The size is taken from the first record; every later record must match
/// it exactly.
///
/// # Errors
///
/// [`SpcError::EmptyCalibration`] for an empty sequence,
/// [`SpcError::RaggedSubgroup`] for a length mismatch, and the per-record
/// errors of [`Subgroup::from_record`].
pub fn reduce_subgroups(records: &[SubgroupRecord]) -> Result<(Vec<Subgroup>, usize), SpcError> {
    let first = records.first().ok_or(SpcError::EmptyCalibration)?;
    let n = first.values.len();
    let mut subgroups = Vec::with_capacity(records.len());
    for record in records {
        if record.values.len() != n {
            return Err(SpcError::RaggedSubgroup {
                sample: record.sample.clone(),
                expected: n,
                found: record.values.len(),
            });
        }
        subgroups.push(Subgroup::from_record(record)?);
    }
    Ok((subgroups, n))
}

/// A P-chart calibration record: one inspection lot.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DefectiveLot {
    /// Lot identifier.
    #[serde(rename = "lote", deserialize_with = "sample_id")]
    pub lot: String,
    /// Number of items inspected in the lot.
    #[serde(rename = "n_inspecionados")]
    pub inspected: u64,
    /// Number of defective items found.
    #[serde(rename = "n_defeituosos")]
    pub defective: u64,
}

impl DefectiveLot {
    /// Proportion defective for this lot (`d / n`), or 0 for an empty lot.
    pub fn proportion(&self) -> f64 {
        if self.inspected == 0 {
            0.0
        } else {
            self.defective as f64 / self.inspected as f64
        }
    }
}

/// A U-chart calibration record: one inspection sample.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DefectSample {
    /// Sample identifier.
    #[serde(rename = "amostra", deserialize_with = "sample_id")]
    pub sample: String,
    /// Number of units inspected.
    #[serde(rename = "unidades_inspecionadas")]
    pub units: u64,
    /// Total defects counted across those units.
    #[serde(rename = "total_defeitos")]
    pub defects: u64,
}

impl DefectSample {
    /// Defects per unit for this sample (`c / n`), or 0 for an empty sample.
    pub fn rate(&self) -> f64 {
        if self.units == 0 {
            0.0
        } else {
            self.defects as f64 / self.units as f64
        }
    }
}

/// Engineering specification bounds for one process.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Specification {
    /// Upper specification limit (LSE).
    #[serde(rename = "LSE")]
    pub upper: f64,
    /// Lower specification limit (LIE).
    #[serde(rename = "LIE")]
    pub lower: f64,
    /// Optional reference value for an arbitrary exceedance probability.
    #[serde(rename = "valor_prob_arbitrario", default)]
    pub arbitrary_threshold: Option<ThresholdValue>,
}

impl Specification {
    /// The arbitrary threshold as a number, if present and parseable.
    ///
    /// An absent or unparsable value means the arbitrary-probability step
    /// is skipped; it is never an error.
    pub fn threshold(&self) -> Option<f64> {
        self.arbitrary_threshold.as_ref().and_then(ThresholdValue::as_f64)
    }
}

/// An arbitrary-threshold value as persisted: either a number or a string
/// that may or may not parse as one.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ThresholdValue {
    /// Persisted as a JSON number.
    Number(f64),
    /// Persisted as a JSON string.
    Text(String),
}

impl ThresholdValue {
    /// The numeric value, if this threshold represents one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ThresholdValue::Number(x) => Some(*x),
            ThresholdValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Accept sample identifiers persisted as either JSON numbers or strings.
fn sample_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Int(i64),
        Float(f64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Int(i) => i.to_string(),
        RawId::Float(f) => f.to_string(),
        RawId::Text(s) => s,
    })
}
