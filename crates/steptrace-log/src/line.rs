use crate::error::ParseError;
use crate::ir::LineRecord;
use crate::payload::parse_payload;
use crate::scalar::convert;
use once_cell::sync::Lazy;
use regex::Regex;

// [level][rank N][scope][label]payload
static HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[(\w+)\]\[rank (\d+)\]\[([^\]]*)\]\[([^\]]*)\](.*)")
        .expect("header pattern is valid")
});

/// Parses one line of a step log.
///
/// Returns `Ok(None)` for lines without a record header: array continuation
/// lines, blank lines and unrelated output all land here.
pub fn parse_line<S: AsRef<str>>(
    line: &str,
    line_index: usize,
    all_lines: &[S],
    array_indicator: &str,
) -> Result<Option<LineRecord>, ParseError> {
    let Some(caps) = HEADER.captures(line) else {
        return Ok(None);
    };

    let payload = parse_payload(&caps[5], line_index, all_lines, array_indicator)?;

    Ok(Some(LineRecord {
        level: caps[1].to_string(),
        rank: convert(&caps[2]),
        scope: caps[3].to_string(),
        label: caps[4].to_string(),
        payload,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::PayloadValue;
    use crate::scalar::ScalarValue;

    fn parse_single(line: &str) -> Option<LineRecord> {
        parse_line(line, 0, &[line], "(:)").unwrap()
    }

    #[test]
    fn test_header_fields() {
        let record = parse_single(
            "[DEBUG][rank 3][CVODE::cvStep][begin-step-attempt] step = 0, h = 1e-06, q = 1, t_n = 0",
        )
        .unwrap();
        assert_eq!(record.level, "DEBUG");
        assert_eq!(record.rank, ScalarValue::Int(3));
        assert_eq!(record.scope, "CVODE::cvStep");
        assert_eq!(record.label, "begin-step-attempt");
        assert_eq!(record.payload.len(), 4);
        assert_eq!(record.payload.get("t_n"), Some(&PayloadValue::Text("0".into())));
    }

    #[test]
    fn test_header_without_payload() {
        let record = parse_single("[INFO][rank 0][ARKODE::mriStep_TakeStep][begin-fast-steps]").unwrap();
        assert_eq!(record.label, "begin-fast-steps");
        assert!(record.payload.is_empty());
    }

    #[test]
    fn test_non_header_lines() {
        assert!(parse_single("").is_none());
        assert!(parse_single("1.2345e-01").is_none());
        assert!(parse_single("[DEBUG][CVODE][label] missing rank").is_none());
        assert!(parse_single("[DEBUG][rank x][s][l] bad rank").is_none());
    }

    #[test]
    fn test_rank_overflow_keeps_record() {
        let record = parse_single("[DEBUG][rank 99999999999999999999][s][l] a = 1").unwrap();
        assert_eq!(record.rank, ScalarValue::Float(1e20));
        assert_eq!(record.label, "l");
    }

    #[test]
    fn test_array_lookahead_from_line() {
        let lines = ["[DEBUG][rank 0][s][l] ycur(:) =", "1", "2", "[DEBUG][rank 0][s][l] x = 1"];
        let record = parse_line(lines[0], 0, &lines, "(:)").unwrap().unwrap();
        assert_eq!(record.payload.array("ycur"), Some(&[1.0, 2.0][..]));
    }
}
