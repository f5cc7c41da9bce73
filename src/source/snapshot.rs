//! The circular tick buffer as exposed by the monitored server.
//!
//! The server keeps the durations of its most recent ticks in a fixed
//! 100-slot array, overwriting slots round-robin. A [`CircularSnapshot`] is
//! one read of that array. Its length is fixed by the type, so code that
//! holds a snapshot never has to re-check it.

use std::ops::Index;

use serde::Deserialize;

use crate::error::FetchError;

/// Number of slots in the server's tick ring buffer.
pub const RING_SIZE: usize = 100;

/// One read of the 100-slot tick duration buffer, in nanoseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircularSnapshot {
    slots: Box<[u64; RING_SIZE]>,
}

impl CircularSnapshot {
    /// Build a snapshot from a fixed-size array.
    pub fn new(slots: [u64; RING_SIZE]) -> Self {
        Self {
            slots: Box::new(slots),
        }
    }

    /// Build a snapshot from untrusted values.
    ///
    /// Anything other than exactly [`RING_SIZE`] values is a parse error.
    pub fn from_values(values: Vec<u64>) -> Result<Self, FetchError> {
        let len = values.len();
        let slots: Box<[u64; RING_SIZE]> = values
            .into_boxed_slice()
            .try_into()
            .map_err(|_| {
                FetchError::Parse(format!(
                    "expected {} tick durations, got {}",
                    RING_SIZE, len
                ))
            })?;
        Ok(Self { slots })
    }

    /// Returns the raw slot values in index order.
    pub fn as_slice(&self) -> &[u64] {
        &self.slots[..]
    }
}

impl Index<usize> for CircularSnapshot {
    type Output = u64;

    fn index(&self, index: usize) -> &u64 {
        &self.slots[index]
    }
}

/// Response envelope returned by a Jolokia `read` request.
///
/// Jolokia reports most failures inside a 200 response, with `status` and
/// `error` set and no `value`.
#[derive(Debug, Deserialize)]
pub(crate) struct ReadResponse {
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ReadResponse {
    /// Parse a raw response body into a snapshot.
    pub(crate) fn parse(body: &[u8]) -> Result<CircularSnapshot, FetchError> {
        let response: ReadResponse = serde_json::from_slice(body)
            .map_err(|e| FetchError::Parse(format!("invalid JSON: {}", e)))?;
        response.into_snapshot()
    }

    fn into_snapshot(self) -> Result<CircularSnapshot, FetchError> {
        let value = match self.value {
            Some(value) => value,
            None => {
                let reason = match (self.status, self.error) {
                    (_, Some(error)) => error,
                    (Some(status), None) => format!("status {}", status),
                    (None, None) => "no error reported".to_string(),
                };
                return Err(FetchError::Parse(format!(
                    "response has no `value` field ({})",
                    reason
                )));
            }
        };

        let values: Vec<u64> = serde_json::from_value(value)
            .map_err(|e| FetchError::Parse(format!("`value` is not a list of durations: {}", e)))?;
        CircularSnapshot::from_values(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_with(values: &[u64]) -> Vec<u8> {
        serde_json::to_vec(&serde_json::json!({
            "request": { "type": "read" },
            "value": values,
            "status": 200,
            "timestamp": 1700000000
        }))
        .unwrap()
    }

    #[test]
    fn test_from_values_requires_full_ring() {
        assert!(CircularSnapshot::from_values(vec![1; RING_SIZE]).is_ok());

        let err = CircularSnapshot::from_values(vec![1; 99]).unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
        assert!(err.to_string().contains("got 99"));

        assert!(CircularSnapshot::from_values(vec![1; 101]).is_err());
        assert!(CircularSnapshot::from_values(Vec::new()).is_err());
    }

    #[test]
    fn test_parse_read_response() {
        let values: Vec<u64> = (0..RING_SIZE as u64).map(|i| 50_000_000 + i).collect();
        let snapshot = ReadResponse::parse(&body_with(&values)).unwrap();
        assert_eq!(snapshot.as_slice(), &values[..]);
        assert_eq!(snapshot[99], 50_000_099);
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        let err = ReadResponse::parse(b"<html>nope</html>").unwrap_err();
        assert!(err.to_string().contains("invalid JSON"));
    }

    #[test]
    fn test_parse_rejects_missing_value() {
        let body = br#"{"status":404,"error":"javax.management.InstanceNotFoundException"}"#;
        let err = ReadResponse::parse(body).unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
        assert!(err.to_string().contains("InstanceNotFoundException"));
    }

    #[test]
    fn test_parse_rejects_short_value() {
        let err = ReadResponse::parse(&body_with(&[1, 2, 3])).unwrap_err();
        assert!(err.to_string().contains("got 3"));
    }

    #[test]
    fn test_parse_rejects_non_integer_values() {
        let body = br#"{"value":"not a list","status":200}"#;
        assert!(matches!(
            ReadResponse::parse(body),
            Err(FetchError::Parse(_))
        ));

        let body = br#"{"value":[-1],"status":200}"#;
        assert!(ReadResponse::parse(body).is_err());
    }
}
