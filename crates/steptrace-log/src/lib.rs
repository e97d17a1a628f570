//! # Step Log Parser
//!
//! Parser and query engine for the debug logs written by time-integration
//! libraries, where every step attempt is bracketed by `begin-step-attempt` /
//! `end-step-attempt` lines.
//!
//! ## Overview
//!
//! A log line looks like
//!
//! ```text
//! [DEBUG][rank 0][CVODE::cvStep][begin-step-attempt] step = 0, h = 1e-06, q = 1, t_n = 0
//! ```
//!
//! and vector payloads continue over the following lines, one value per line,
//! until the next line that starts with `[`:
//!
//! ```text
//! [DEBUG][rank 0][CVODE::cvStep][predictor] zn_0(:) =
//! 1.0000000000000000e+00
//! 0.0000000000000000e+00
//! ```
//!
//! Multirate integrators run an inner integrator inside each outer step and
//! mark that region with `begin-fast-steps` / `end-fast-steps`. The parser
//! turns those regions into nested child sequences, so the result is a tree:
//!
//! ```text
//! StepTree
//! ├── StepRecord (depth 0)
//! │   └── time-level-1
//! │       ├── StepRecord (depth 1)
//! │       └── StepRecord (depth 1)
//! └── StepRecord (depth 0)
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! lines ──► line::parse_line ──► StepLogParser::build_tree ──► StepTree
//!              │                                                 │
//!              └─ payload::parse_payload (array lookahead)        ▼
//!                                                    history::get_history ──► Series
//! ```
//!
//! The full input is needed before parsing starts; array regions have no
//! closing delimiter, so the payload parser looks ahead.
//!
//! ## Example
//!
//! ```
//! use steptrace_log::{HistoryFilter, ScalarValue, get_history, parse_str};
//!
//! let log = "\
//! [DEBUG][rank 0][CVODE::cvStep][begin-step-attempt] step = 0, h = 1e-06, q = 1, t_n = 0
//! [DEBUG][rank 0][CVODE::cvStep][end-step-attempt] status = success, dsm = 0.1
//! [DEBUG][rank 0][CVODE::cvStep][begin-step-attempt] step = 1, h = 1e-05, q = 1, t_n = 1e-06
//! [DEBUG][rank 0][CVODE::cvStep][end-step-attempt] status = failed error test, dsm = 2.3
//! ";
//! let tree = parse_str(log)?;
//! assert_eq!(tree.len(), 2);
//!
//! let filter = HistoryFilter { status: Some("success".into()), ..Default::default() };
//! let h = get_history(&tree, "h", &filter)?;
//! assert_eq!(h.values, vec![ScalarValue::Float(1e-6)]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## JSON
//!
//! All IR types implement `serde::Serialize`. Header fields serialize as
//! `loglvl`, `rank`, `scope`, `label`; the nesting depth as `level`; child
//! sequences under their `time-level-N` key. See [`SCHEMA_VERSION`].

pub mod config;
pub mod error;
pub mod history;
/// Parsed line and step records.
pub mod ir;
pub mod line;
pub mod parser;
pub mod payload;
pub mod scalar;


pub use config::ParserConfig;
pub use error::{HistoryError, ParseError};
pub use history::{HistoryFilter, HistoryQuery, Series, get_history};
pub use ir::{LineRecord, Payload, PayloadValue, StepRecord, StepTree};
pub use parser::{StepLogParser, build_tree, parse_str};
pub use scalar::{ScalarValue, convert};

/// Version of the JSON shape produced by serializing a [`StepTree`].
///
/// - MAJOR: fields removed or renamed
/// - MINOR: new optional fields
/// - PATCH: parsing fixes, no shape change
pub const SCHEMA_VERSION: &str = "1.0.0";
