// src/comms/payload.rs

//! Strict decoder for sensor payloads.
//!
//! Sensors publish a flat mapping with at least `l` (location) and `t`
//! (temperature). Two encodings are seen in the field:
//!
//! - JSON: `{"l": "Berlin", "t": 21.6}`
//! - Python-style literal with single quotes: `{'l': 'Berlin', 't': '21.6'}`
//!
//! Anything else is rejected with `PayloadError::MalformedPayload`. Extra keys
//! are ignored.

use serde::Deserialize;
use thiserror::Error;

use crate::pipeline::RawReading;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("malformed payload: {reason}")]
    MalformedPayload { reason: String },
}

impl PayloadError {
    fn malformed(reason: impl Into<String>) -> Self {
        PayloadError::MalformedPayload { reason: reason.into() }
    }
}

#[derive(Debug, Deserialize)]
struct WireReading {
    l: Option<String>,
    t: Option<WireTemperature>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireTemperature {
    Number(f64),
    Text(String),
}

pub fn decode(payload: &[u8]) -> Result<RawReading, PayloadError> {
    let text = std::str::from_utf8(payload)
        .map_err(|_| PayloadError::malformed("payload is not valid UTF-8"))?;

    let wire: WireReading = match serde_json::from_str(text) {
        Ok(wire) => wire,
        Err(json_err) => {
            if !text.contains('\'') {
                return Err(PayloadError::malformed(json_err.to_string()));
            }
            serde_json::from_str(&single_quotes_to_json(text))
                .map_err(|e| PayloadError::malformed(e.to_string()))?
        }
    };

    let city = wire.l.ok_or_else(|| PayloadError::malformed("missing key `l`"))?;
    let temperature = match wire.t.ok_or_else(|| PayloadError::malformed("missing key `t`"))? {
        WireTemperature::Number(n) => n,
        WireTemperature::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| PayloadError::malformed(format!("`t` is not numeric: {s:?}")))?,
    };
    if !temperature.is_finite() {
        return Err(PayloadError::malformed(format!("`t` is not finite: {temperature}")));
    }

    Ok(RawReading { city, temperature })
}

/// Rewrite single-quoted string literals as JSON strings. Double-quoted
/// literals pass through untouched. Unterminated literals are left broken so
/// the JSON parser rejects them.
fn single_quotes_to_json(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                out.push('"');
                while let Some(c) = chars.next() {
                    match c {
                        '\'' => {
                            out.push('"');
                            break;
                        }
                        '\\' => match chars.next() {
                            Some('\'') => out.push('\''),
                            Some(n) => {
                                out.push('\\');
                                out.push(n);
                            }
                            None => out.push('\\'),
                        },
                        '"' => out.push_str("\\\""),
                        other => out.push(other),
                    }
                }
            }
            '"' => {
                out.push('"');
                while let Some(c) = chars.next() {
                    out.push(c);
                    match c {
                        '\\' => {
                            if let Some(n) = chars.next() {
                                out.push(n);
                            }
                        }
                        '"' => break,
                        _ => {}
                    }
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(err: PayloadError) -> String {
        let PayloadError::MalformedPayload { reason } = err;
        reason
    }

    #[test]
    fn python_literal_from_firmware() {
        let r = decode(b"{'l': 'Berlin', 't': '21.6'}").unwrap();
        assert_eq!(r, RawReading { city: "Berlin".into(), temperature: 21.6 });
    }

    #[test]
    fn json_with_numeric_t() {
        let r = decode(br#"{"l": "Lima", "t": -2, "h": 40}"#).unwrap();
        assert_eq!(r.city, "Lima");
        assert_eq!(r.temperature, -2.0);
    }

    #[test]
    fn apostrophe_inside_double_quoted_city() {
        let r = decode(br#"{'l': "St. John's", 't': 3.5}"#).unwrap();
        assert_eq!(r.city, "St. John's");
    }

    #[test]
    fn missing_t_is_named() {
        let err = decode(b"{'l': 'Berlin'}").unwrap_err();
        assert_eq!(reason(err), "missing key `t`");
    }

    #[test]
    fn missing_l_is_named() {
        let err = decode(br#"{"t": "4"}"#).unwrap_err();
        assert_eq!(reason(err), "missing key `l`");
    }

    #[test]
    fn garbage_is_rejected() {
        let cases: [&[u8]; 5] = [b"hello", b"[1, 2]", b"{'l': 'x', 't': 'warm'}", b"{'l': 'x", &[0xff, 0xfe]];
        for bad in cases {
            assert!(
                matches!(decode(bad), Err(PayloadError::MalformedPayload { .. })),
                "accepted {:?}",
                String::from_utf8_lossy(bad)
            );
        }
    }

    #[test]
    fn non_finite_text_is_rejected() {
        assert!(decode(b"{'l': 'x', 't': 'nan'}").is_err());
        assert!(decode(b"{'l': 'x', 't': 'inf'}").is_err());
    }
}
