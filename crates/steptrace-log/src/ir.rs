use crate::scalar::{ScalarValue, convert};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label of the line that opens a step attempt.
pub const BEGIN_STEP_ATTEMPT: &str = "begin-step-attempt";
/// Label of the line whose payload completes a step attempt.
pub const END_STEP_ATTEMPT: &str = "end-step-attempt";
/// Label of the marker that opens a nested (fast) integration region.
pub const BEGIN_FAST_STEPS: &str = "begin-fast-steps";
/// Label of the marker that closes a nested (fast) integration region.
pub const END_FAST_STEPS: &str = "end-fast-steps";

/// Name of the child sequence holding records at nesting `depth`.
pub fn time_level_key(depth: usize) -> String {
    format!("time-level-{depth}")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PayloadValue {
    /// Key given without `=`.
    Flag,
    Text(String),
    Array(Vec<f64>),
}

impl PayloadValue {
    /// Typed view of a single-valued entry. Flags read as empty text; arrays
    /// have no scalar view.
    pub fn to_scalar(&self) -> Option<ScalarValue> {
        match self {
            PayloadValue::Flag => Some(ScalarValue::Text(String::new())),
            PayloadValue::Text(raw) => Some(convert(raw)),
            PayloadValue::Array(_) => None,
        }
    }
}

/// Key/value attributes of one log line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(BTreeMap<String, PayloadValue>);

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: PayloadValue) -> Option<PayloadValue> {
        self.0.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&PayloadValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn scalar(&self, key: &str) -> Option<ScalarValue> {
        self.get(key).and_then(PayloadValue::to_scalar)
    }

    pub fn array(&self, key: &str) -> Option<&[f64]> {
        match self.get(key) {
            Some(PayloadValue::Array(values)) => Some(values.as_slice()),
            _ => None,
        }
    }

    /// Key-wise overwrite/insert of `other` into `self`. Array values are
    /// replaced wholesale, never concatenated.
    pub fn merge(&mut self, other: Payload) {
        self.0.extend(other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PayloadValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, PayloadValue)> for Payload {
    fn from_iter<T: IntoIterator<Item = (String, PayloadValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One recognised `[level][rank N][scope][label] payload` line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRecord {
    #[serde(rename = "loglvl")]
    pub level: String,
    /// The numeral after `rank`. An integer unless it overflows `i64`.
    pub rank: ScalarValue,
    pub scope: String,
    pub label: String,
    pub payload: Payload,
}

/// One step attempt, possibly owning the fast steps taken inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    #[serde(rename = "loglvl")]
    pub level: String,
    /// The numeral after `rank`. An integer unless it overflows `i64`.
    pub rank: ScalarValue,
    pub scope: String,
    pub label: String,
    pub payload: Payload,
    /// Nesting depth; 0 is the outermost integrator.
    #[serde(rename = "level")]
    pub depth: usize,
    /// Nested sequences keyed by [`time_level_key`].
    #[serde(flatten)]
    pub children: BTreeMap<String, Vec<StepRecord>>,
}

impl StepRecord {
    pub fn from_line(line: LineRecord, depth: usize) -> Self {
        Self {
            level: line.level,
            rank: line.rank,
            scope: line.scope,
            label: line.label,
            payload: line.payload,
            depth,
            children: BTreeMap::new(),
        }
    }

    pub fn step(&self) -> Option<i64> {
        self.payload.scalar("step").and_then(|v| v.as_i64())
    }

    pub fn time(&self) -> Option<f64> {
        self.payload.scalar("t_n").and_then(|v| v.as_f64())
    }

    pub fn status(&self) -> Option<&str> {
        match self.payload.get("status") {
            Some(PayloadValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Step attempts of the inner integrator run inside this one.
    pub fn fast_steps(&self) -> Option<&[StepRecord]> {
        self.children
            .get(&time_level_key(self.depth + 1))
            .map(Vec::as_slice)
    }

    /// This record and all its descendants, parents before children.
    pub fn walk(&self) -> Walk<'_> {
        Walk { pending: vec![self] }
    }
}

/// Document-order traversal over a record subtree. See [`StepRecord::walk`].
pub struct Walk<'a> {
    pending: Vec<&'a StepRecord>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a StepRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.pending.pop()?;
        for seq in record.children.values().rev() {
            self.pending.extend(seq.iter().rev());
        }
        Some(record)
    }
}

/// The outermost sequence of step attempts of one log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepTree(Vec<StepRecord>);

impl StepTree {
    pub fn new(records: Vec<StepRecord>) -> Self {
        Self(records)
    }

    pub fn records(&self) -> &[StepRecord] {
        &self.0
    }

    pub fn into_records(self) -> Vec<StepRecord> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StepRecord> {
        self.0.iter()
    }

    /// Every record at every depth, in document order.
    pub fn walk(&self) -> impl Iterator<Item = &StepRecord> {
        self.0.iter().flat_map(StepRecord::walk)
    }

    pub fn total_attempts(&self) -> usize {
        self.walk().count()
    }

    /// Deepest nesting level present, or `None` for an empty tree.
    pub fn max_depth(&self) -> Option<usize> {
        self.walk().map(|r| r.depth).max()
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl<'a> IntoIterator for &'a StepTree {
    type Item = &'a StepRecord;
    type IntoIter = std::slice::Iter<'a, StepRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
