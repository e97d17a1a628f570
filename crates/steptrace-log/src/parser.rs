use crate::config::ParserConfig;
use crate::error::ParseError;
use crate::ir::{
    BEGIN_FAST_STEPS, BEGIN_STEP_ATTEMPT, END_FAST_STEPS, END_STEP_ATTEMPT, StepRecord, StepTree,
    time_level_key,
};
use crate::line::parse_line;

/// Builds a [`StepTree`] from the lines of a step log.
///
/// The whole input must be available up front: array payloads end at the next
/// header line, so the parser needs lookahead.
#[derive(Debug, Clone, Default)]
pub struct StepLogParser {
    config: ParserConfig,
}

impl StepLogParser {
    /// Creates a parser with the default [`ParserConfig`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Splits `input` into lines and builds the tree.
    pub fn parse(&self, input: &str) -> Result<StepTree, ParseError> {
        let lines: Vec<&str> = input.lines().collect();
        self.build_tree(&lines)
    }

    /// Assembles step attempts into a tree mirroring the fast-step nesting.
    ///
    /// # Errors
    ///
    /// Fails on non-numeric array values and on nesting markers or end lines
    /// that have nothing to attach to.
    pub fn build_tree<S: AsRef<str>>(&self, lines: &[S]) -> Result<StepTree, ParseError> {
        let mut root: Vec<StepRecord> = Vec::new();
        // Index of the owning record in each enclosing sequence, outermost first.
        // Its length is the current nesting depth.
        let mut open: Vec<usize> = Vec::new();

        for (index, line) in lines.iter().enumerate() {
            let line = line.as_ref().trim_end();
            let Some(record) = parse_line(line, index, lines, &self.config.array_indicator)? else {
                continue;
            };
            let depth = open.len();

            match record.label.as_str() {
                BEGIN_FAST_STEPS => {
                    let seq = active_sequence(&mut root, &open);
                    let Some(parent) = seq.len().checked_sub(1) else {
                        log::warn!("line {}: fast steps opened before any step attempt", index + 1);
                        return Err(ParseError::FastStepsWithoutParent { line: index + 1 });
                    };
                    seq[parent]
                        .children
                        .entry(time_level_key(depth + 1))
                        .or_default();
                    open.push(parent);
                    log::debug!("line {}: entering fast steps at depth {}", index + 1, depth + 1);
                }
                END_FAST_STEPS => {
                    if open.pop().is_none() {
                        log::warn!("line {}: unbalanced end-fast-steps", index + 1);
                        return Err(ParseError::UnbalancedFastSteps { line: index + 1 });
                    }
                    log::debug!("line {}: leaving fast steps, back to depth {}", index + 1, depth - 1);
                }
                BEGIN_STEP_ATTEMPT => {
                    if self.config.keeps_scope(&record.scope) {
                        active_sequence(&mut root, &open).push(StepRecord::from_line(record, depth));
                    }
                }
                END_STEP_ATTEMPT => {
                    if self.config.keeps_scope(&record.scope) {
                        let Some(last) = active_sequence(&mut root, &open).last_mut() else {
                            log::warn!("line {}: end-step-attempt without a begin", index + 1);
                            return Err(ParseError::EndWithoutBegin { line: index + 1 });
                        };
                        last.payload.merge(record.payload);
                    }
                }
                other => {
                    log::trace!("line {}: ignoring label `{}`", index + 1, other);
                }
            }
        }

        if !open.is_empty() {
            log::debug!("input ended with {} fast-step region(s) still open", open.len());
        }

        Ok(StepTree::new(root))
    }
}

/// Follows `open` down from the root to the sequence new records go into.
fn active_sequence<'a>(root: &'a mut Vec<StepRecord>, open: &[usize]) -> &'a mut Vec<StepRecord> {
    let mut seq = root;
    for (level, &parent) in open.iter().enumerate() {
        seq = seq[parent]
            .children
            .entry(time_level_key(level + 1))
            .or_default();
    }
    seq
}

/// [`StepLogParser::build_tree`] with the default configuration.
pub fn build_tree<S: AsRef<str>>(lines: &[S]) -> Result<StepTree, ParseError> {
    StepLogParser::new().build_tree(lines)
}

/// [`StepLogParser::parse`] with the default configuration.
pub fn parse_str(input: &str) -> Result<StepTree, ParseError> {
    StepLogParser::new().parse(input)
}
