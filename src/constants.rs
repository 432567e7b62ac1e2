//! Control chart constant lookup, keyed by subgroup size.
//!
//! Variables chart limits are computed from tabulated factors (A2, D3, D4)
//! and sigma is estimated from the mean range via d2. The table is exact:
//! a process must use a subgroup size present in the table, and no
//! interpolation across sizes is performed.
//!
//! The built-in table covers n = 2..=10 with the published ASTM E2587
//! values; a table can also be deserialized from a JSON mapping of
//! subgroup-size strings to factor records.
//!
//! # References
//!
//! - ASTM E2587 — Standard Practice for Use of Control Charts
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::SpcError;

/// One raw constants record as persisted in the configuration JSON.
///
/// Fields are optional because a persisted entry may be partial; the typed
/// lookups on [`ConstantsTable`] reject partial entries rather than
/// substituting defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct ConstantsEntry {
    /// A2 factor: X-bar chart limit half-width per unit of R-bar.
    #[serde(rename = "A2")]
    pub a2: Option<f64>,
    /// D3 factor: R chart lower control limit per unit of R-bar.
    #[serde(rename = "D3")]
    pub d3: Option<f64>,
    /// D4 factor: R chart upper control limit per unit of R-bar.
    #[serde(rename = "D4")]
    pub d4: Option<f64>,
    /// d2 factor (mean of the range distribution): sigma-hat = R-bar / d2.
    pub d2: Option<f64>,
}

/// The variables-chart factors required to calibrate X-bar-R limits.
///
/// All three fields are required together: a partial constants entry is a
/// configuration error, never silently defaulted.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct ChartFactors {
    /// A2 factor for the X-bar chart.
    #[serde(rename = "A2")]
    pub a2: f64,
    /// D3 factor for the R chart lower limit.
    #[serde(rename = "D3")]
    pub d3: f64,
    /// D4 factor for the R chart upper limit.
    #[serde(rename = "D4")]
    pub d4: f64,
}

/// Lookup table of control chart constants keyed by subgroup size.
///
/// # Examples
///
/// ```
/// use cep_analytics::constants::ConstantsTable;
///
/// let table = ConstantsTable::astm_e2587();
/// let factors = table.chart_factors(5).unwrap();
/// assert!((factors.a2 - 0.577).abs() < 1e-12);
/// assert!((table.d2(5).unwrap() - 2.326).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "BTreeMap<String, ConstantsEntry>")]
pub struct ConstantsTable {
    entries: BTreeMap<usize, ConstantsEntry>,
}

impl ConstantsTable {
    /// Build a table from already-keyed entries.
    pub fn from_entries(entries: impl IntoIterator<Item = (usize, ConstantsEntry)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// The built-in ASTM E2587 factor table for subgroup sizes 2..=10.
    pub fn astm_e2587() -> Self {
        const A2: [f64; 9] = [1.880, 1.023, 0.729, 0.577, 0.483, 0.419, 0.373, 0.337, 0.308];
        const D3: [f64; 9] = [0.0, 0.0, 0.0, 0.0, 0.0, 0.076, 0.136, 0.184, 0.223];
        const D4: [f64; 9] = [3.267, 2.575, 2.282, 2.114, 2.004, 1.924, 1.864, 1.816, 1.777];
        const D2: [f64; 9] = [1.128, 1.693, 2.059, 2.326, 2.534, 2.704, 2.847, 2.970, 3.078];

        Self::from_entries((2..=10).map(|n| {
            let idx = n - 2;
            (
                n,
                ConstantsEntry {
                    a2: Some(A2[idx]),
                    d3: Some(D3[idx]),
                    d4: Some(D4[idx]),
                    d2: Some(D2[idx]),
                },
            )
        }))
    }

    /// The raw entry for a subgroup size, if present.
    pub fn entry(&self, n: usize) -> Option<&ConstantsEntry> {
        self.entries.get(&n)
    }

    /// The A2/D3/D4 factors for a subgroup size.
    ///
    /// # Errors
    ///
    /// [`SpcError::ConstantsMissing`] when no entry exists for `n`;
    /// [`SpcError::ConstantFieldMissing`] when the entry is partial.
    pub fn chart_factors(&self, n: usize) -> Result<ChartFactors, SpcError> {
        let entry = self.entries.get(&n).ok_or(SpcError::ConstantsMissing { n })?;
        Ok(ChartFactors {
            a2: require(entry.a2, n, "A2")?,
            d3: require(entry.d3, n, "D3")?,
            d4: require(entry.d4, n, "D4")?,
        })
    }

    /// The d2 factor for a subgroup size, guaranteed positive.
    ///
    /// # Errors
    ///
    /// [`SpcError::ConstantsMissing`] / [`SpcError::ConstantFieldMissing`]
    /// as for [`chart_factors`](Self::chart_factors), and
    /// [`SpcError::InvalidD2`] when the stored value is zero, negative,
    /// or not finite.
    pub fn d2(&self, n: usize) -> Result<f64, SpcError> {
        let entry = self.entries.get(&n).ok_or(SpcError::ConstantsMissing { n })?;
        let d2 = require(entry.d2, n, "d2")?;
        if !(d2 > 0.0) || !d2.is_finite() {
            return Err(SpcError::InvalidD2 { n });
        }
        Ok(d2)
    }
}

fn require(field: Option<f64>, n: usize, name: &'static str) -> Result<f64, SpcError> {
    field.ok_or(SpcError::ConstantFieldMissing { n, name })
}

impl TryFrom<BTreeMap<String, ConstantsEntry>> for ConstantsTable {
    type Error = SpcError;

    /// Parse the persisted JSON form, which keys entries by the subgroup
    /// size spelled as a string.
    fn try_from(raw: BTreeMap<String, ConstantsEntry>) -> Result<Self, Self::Error> {
        let mut entries = BTreeMap::new();
        for (key, entry) in raw {
            let n: usize = key
                .trim()
                .parse()
                .map_err(|_| SpcError::InvalidConstantsKey { key: key.clone() })?;
            entries.insert(n, entry);
        }
        Ok(Self { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn astm_table_known_values_n5() {
        let table = ConstantsTable::astm_e2587();
        let factors = table.chart_factors(5).expect("n=5 should be present");
        assert!((factors.a2 - 0.577).abs() < f64::EPSILON);
        assert!(factors.d3.abs() < f64::EPSILON);
        assert!((factors.d4 - 2.114).abs() < f64::EPSILON);
        assert!((table.d2(5).unwrap() - 2.326).abs() < f64::EPSILON);
    }

    #[test]
    fn astm_table_covers_2_through_10() {
        let table = ConstantsTable::astm_e2587();
        for n in 2..=10 {
            assert!(table.chart_factors(n).is_ok(), "missing factors for n={n}");
            assert!(table.d2(n).is_ok(), "missing d2 for n={n}");
        }
    }

    #[test]
    fn missing_size_is_constants_missing() {
        let table = ConstantsTable::astm_e2587();
        assert_eq!(
            table.chart_factors(25),
            Err(SpcError::ConstantsMissing { n: 25 })
        );
        assert_eq!(table.d2(1), Err(SpcError::ConstantsMissing { n: 1 }));
    }

    #[test]
    fn partial_entry_is_field_missing_not_default() {
        // A2 present but D4 absent must fail, never substitute a default.
        let table = ConstantsTable::from_entries([(
            5,
            ConstantsEntry {
                a2: Some(0.577),
                d3: Some(0.0),
                d4: None,
                d2: None,
            },
        )]);
        assert_eq!(
            table.chart_factors(5),
            Err(SpcError::ConstantFieldMissing { n: 5, name: "D4" })
        );
        assert_eq!(
            table.d2(5),
            Err(SpcError::ConstantFieldMissing { n: 5, name: "d2" })
        );
    }

    #[test]
    fn zero_d2_is_rejected() {
        let table = ConstantsTable::from_entries([(
            4,
            ConstantsEntry {
                a2: Some(0.729),
                d3: Some(0.0),
                d4: Some(2.282),
                d2: Some(0.0),
            },
        )]);
        assert_eq!(table.d2(4), Err(SpcError::InvalidD2 { n: 4 }));
    }

    #[test]
    fn negative_d2_is_rejected() {
        // A sign-flipped entry is deserializable from the JSON shape; the
        // lookup must reject it, never hand a negative sigma downstream.
        let table = ConstantsTable::from_entries([(
            5,
            ConstantsEntry {
                a2: Some(0.577),
                d3: Some(0.0),
                d4: Some(2.114),
                d2: Some(-2.326),
            },
        )]);
        assert_eq!(table.d2(5), Err(SpcError::InvalidD2 { n: 5 }));
    }

    #[test]
    fn lookup_is_deterministic() {
        let table = ConstantsTable::astm_e2587();
        let first = table.chart_factors(7).unwrap();
        let second = table.chart_factors(7).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn deserializes_from_string_keyed_json() {
        let json = r#"{
            "5": { "A2": 0.577, "D3": 0.0, "D4": 2.114, "d2": 2.326 },
            "2": { "A2": 1.880, "D3": 0.0, "D4": 3.267 }
        }"#;
        let table: ConstantsTable = serde_json::from_str(json).expect("valid table");
        assert!(table.chart_factors(5).is_ok());
        assert!(table.chart_factors(2).is_ok());
        // n=2 entry has no d2
        assert_eq!(
            table.d2(2),
            Err(SpcError::ConstantFieldMissing { n: 2, name: "d2" })
        );
    }

    #[test]
    fn non_numeric_key_fails_deserialization() {
        let json = r#"{ "five": { "A2": 0.577 } }"#;
        let result: Result<ConstantsTable, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
