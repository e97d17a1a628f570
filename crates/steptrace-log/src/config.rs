use serde::{Deserialize, Serialize};

/// Suffix that marks a payload key as carrying a one-value-per-line array.
pub const DEFAULT_ARRAY_INDICATOR: &str = "(:)";

/// Scope CVODE uses for its step-attempt lines.
pub const CVODE_STEP_SCOPE: &str = "CVODE::cvStep";

/// Knobs for [`StepLogParser`](crate::StepLogParser).
///
/// Every field has a default, so a partial JSON document is a valid config:
///
/// ```
/// use steptrace_log::ParserConfig;
///
/// let config = ParserConfig::from_json(r#"{ "step_scope": "ARKODE::arkStep" }"#)?;
/// assert_eq!(config.array_indicator, "(:)");
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub array_indicator: String,
    /// Keep only step-attempt lines emitted from this scope. Nesting markers
    /// are honoured whatever their scope. Unset, nothing is filtered, which is
    /// how the Python log helpers behave even when handed a scope.
    pub step_scope: Option<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            array_indicator: DEFAULT_ARRAY_INDICATOR.to_string(),
            step_scope: None,
        }
    }
}

impl ParserConfig {
    pub fn for_scope(scope: impl Into<String>) -> Self {
        Self {
            step_scope: Some(scope.into()),
            ..Self::default()
        }
    }

    /// Restricts step attempts to CVODE's `cvStep` scope. This is stricter than
    /// the Python `cvode_debug_file_to_list` helper, which ignores its scope.
    pub fn cvode() -> Self {
        Self::for_scope(CVODE_STEP_SCOPE)
    }

    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    pub(crate) fn keeps_scope(&self, scope: &str) -> bool {
        self.step_scope.as_deref().is_none_or(|s| s == scope)
    }
}
