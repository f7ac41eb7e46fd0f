//! Pointer samples collected during capture.
//!
//! Coordinates are normalized to `[0.0, 1.0]` of the capture surface and
//! `time` is seconds since capture start. The JSON shape (`x`, `y`, `time`)
//! is what the processing service expects as `cursor_data`.

use serde::{Deserialize, Serialize};

/// A normalized pointer position at a capture-relative time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
    pub time: f64,
}

impl PointerSample {
    pub fn new(x: f64, y: f64, time: f64) -> Self {
        Self { x, y, time }
    }
}

/// Parse a JSON array of samples.
pub fn parse_samples(json: &str) -> Result<Vec<PointerSample>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Serialize samples as a JSON array.
pub fn serialize_samples(samples: &[PointerSample]) -> Result<String, serde_json::Error> {
    serde_json::to_string(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_format_matches_service_contract() {
        let json = serialize_samples(&[PointerSample::new(0.5, 0.25, 1.5)]).unwrap();
        assert_eq!(json, r#"[{"x":0.5,"y":0.25,"time":1.5}]"#);
    }

    #[test]
    fn test_parse_samples() {
        let parsed = parse_samples(r#"[{"x":0.1,"y":0.2,"time":0.0},{"x":0.3,"y":0.4,"time":0.5}]"#)
            .unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1], PointerSample::new(0.3, 0.4, 0.5));
    }
}
