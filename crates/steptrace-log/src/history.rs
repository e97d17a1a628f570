//! Projection of one payload key across all step attempts of a tree.

use crate::error::HistoryError;
use crate::ir::{PayloadValue, StepRecord, StepTree, time_level_key};
use crate::scalar::ScalarValue;
use serde::{Deserialize, Serialize};

/// Restrictions applied to the outermost records of a history query.
///
/// Ranges are inclusive on both ends. `status` matches when it is a substring
/// of the record's `status` field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryFilter {
    pub status: Option<String>,
    pub time_range: Option<(f64, f64)>,
    pub step_range: Option<(i64, i64)>,
}

impl HistoryFilter {
    fn admits(&self, step: i64, time: f64, record: &StepRecord) -> bool {
        if let Some((lo, hi)) = self.time_range
            && (time < lo || time > hi)
        {
            return false;
        }
        if let Some((lo, hi)) = self.step_range
            && (step < lo || step > hi)
        {
            return false;
        }
        match &self.status {
            Some(wanted) => record.status().is_some_and(|s| s.contains(wanted.as_str())),
            None => true,
        }
    }
}

/// Three parallel sequences describing how one key evolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub steps: Vec<i64>,
    pub times: Vec<f64>,
    pub values: Vec<ScalarValue>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (i64, f64, &ScalarValue)> {
        self.steps
            .iter()
            .zip(&self.times)
            .zip(&self.values)
            .map(|((s, t), v)| (*s, *t, v))
    }

    fn push(&mut self, step: i64, time: f64, value: ScalarValue) {
        self.steps.push(step);
        self.times.push(time);
        self.values.push(value);
    }

    fn append(&mut self, mut other: Series) {
        self.steps.append(&mut other.steps);
        self.times.append(&mut other.times);
        self.values.append(&mut other.values);
    }
}

/// Extracts the series of `key` from `tree`.
///
/// Records are visited in document order. Each record that passes `filter`
/// contributes one point. The fast steps under a record are then emitted
/// right after it, unfiltered, whether or not the record itself passed.
///
/// # Errors
///
/// Every visited record must carry an integer `step` and a numeric `t_n`.
/// Every record that passes `filter` must carry `key` as a single value.
pub fn get_history(
    tree: &StepTree,
    key: &str,
    filter: &HistoryFilter,
) -> Result<Series, HistoryError> {
    extract(tree.records(), key, filter)
}

fn extract(records: &[StepRecord], key: &str, filter: &HistoryFilter) -> Result<Series, HistoryError> {
    let mut series = Series::default();

    for (index, record) in records.iter().enumerate() {
        let step = required(record, "step", index)?
            .as_i64()
            .ok_or_else(|| invalid(record, "step"))?;
        let time = required(record, "t_n", index)?
            .as_f64()
            .ok_or_else(|| invalid(record, "t_n"))?;

        if filter.admits(step, time, record) {
            match record.payload.get(key) {
                Some(PayloadValue::Array(_)) => {
                    return Err(HistoryError::NotScalar { field: key.to_string() });
                }
                Some(value) => {
                    if let Some(scalar) = value.to_scalar() {
                        series.push(step, time, scalar);
                    }
                }
                None => {
                    return Err(HistoryError::MissingField {
                        field: key.to_string(),
                        index,
                    });
                }
            }
        }

        if let Some(children) = record.children.get(&time_level_key(record.depth + 1)) {
            series.append(extract(children, key, &HistoryFilter::default())?);
        }
    }

    Ok(series)
}

fn required(record: &StepRecord, field: &str, index: usize) -> Result<ScalarValue, HistoryError> {
    match record.payload.get(field) {
        None => Err(HistoryError::MissingField {
            field: field.to_string(),
            index,
        }),
        Some(value) => value.to_scalar().ok_or_else(|| invalid(record, field)),
    }
}

fn invalid(record: &StepRecord, field: &str) -> HistoryError {
    let value = match record.payload.get(field) {
        Some(PayloadValue::Text(s)) => s.clone(),
        Some(PayloadValue::Array(_)) => "<array>".to_string(),
        Some(PayloadValue::Flag) | None => String::new(),
    };
    HistoryError::InvalidField {
        field: field.to_string(),
        value,
    }
}

/// Builder over [`HistoryFilter`] for call sites that set a few options.
///
/// ```
/// use steptrace_log::{HistoryQuery, parse_str};
///
/// let tree = parse_str(
///     "[DEBUG][rank 0][CVODE::cvStep][begin-step-attempt] step = 1, t_n = 0.5, h = 0.1\n\
///      [DEBUG][rank 0][CVODE::cvStep][end-step-attempt] status = success",
/// )?;
/// let h = HistoryQuery::new().status("success").run(&tree, "h")?;
/// assert_eq!(h.times, vec![0.5]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct HistoryQuery {
    filter: HistoryFilter,
}

impl HistoryQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.filter.status = Some(status.into());
        self
    }

    pub fn time_range(mut self, min: f64, max: f64) -> Self {
        self.filter.time_range = Some((min, max));
        self
    }

    pub fn step_range(mut self, min: i64, max: i64) -> Self {
        self.filter.step_range = Some((min, max));
        self
    }

    pub fn filter(&self) -> &HistoryFilter {
        &self.filter
    }

    pub fn run(&self, tree: &StepTree, key: &str) -> Result<Series, HistoryError> {
        get_history(tree, key, &self.filter)
    }
}
