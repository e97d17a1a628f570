use crate::error::ParseError;
use crate::ir::{Payload, PayloadValue};
use crate::scalar::convert;

/// Parses the `key = value, flag, arr(:)` tail of a log line.
///
/// Keys containing `array_indicator` take their values from the lines after
/// `line_index`, one number per line, up to the next line that starts with
/// `[`. The indicator is stripped from the stored key. Blank lines inside an
/// array region are ignored.
///
/// ```
/// use steptrace_log::payload::parse_payload;
///
/// let lines = ["[DEBUG][rank 0][s][l] y(:)", "1.0", "2.0", "[DEBUG][rank 0][s][l] z = 3"];
/// let payload = parse_payload(" y(:)", 0, &lines, "(:)")?;
/// assert_eq!(payload.array("y"), Some(&[1.0, 2.0][..]));
/// # Ok::<(), steptrace_log::ParseError>(())
/// ```
pub fn parse_payload<S: AsRef<str>>(
    text: &str,
    line_index: usize,
    all_lines: &[S],
    array_indicator: &str,
) -> Result<Payload, ParseError> {
    let mut payload = Payload::new();

    for segment in text.split(',') {
        let (raw_key, raw_value) = match segment.split_once('=') {
            Some((k, v)) => (k.trim(), Some(v.trim())),
            None => (segment.trim(), None),
        };
        if raw_key.is_empty() && raw_value.is_none() {
            continue;
        }

        if !array_indicator.is_empty() && raw_key.contains(array_indicator) {
            let key = raw_key.replace(array_indicator, "");
            let values = read_array(line_index, all_lines)?;
            payload.insert(key.trim(), PayloadValue::Array(values));
            continue;
        }

        let value = match raw_value {
            Some(v) => PayloadValue::Text(v.to_string()),
            None => PayloadValue::Flag,
        };
        payload.insert(raw_key, value);
    }

    Ok(payload)
}

/// Collects the numeric lines following `line_index`.
///
/// Blank lines are skipped and do not end the region. The Python log helpers
/// convert every line with `np.double`, so a blank line there fails the parse.
fn read_array<S: AsRef<str>>(line_index: usize, all_lines: &[S]) -> Result<Vec<f64>, ParseError> {
    let mut values = Vec::new();
    for (offset, line) in all_lines.iter().skip(line_index + 1).enumerate() {
        let line = line.as_ref();
        if line.starts_with('[') {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        match convert(line).as_f64() {
            Some(v) => values.push(v),
            None => {
                return Err(ParseError::InvalidArrayValue {
                    line: line_index + offset + 2,
                    text: line.trim().to_string(),
                });
            }
        }
    }
    Ok(values)
}
