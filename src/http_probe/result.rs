use serde::{Deserialize, Serialize};

/// Outcome of a single probe against one of the target endpoints.
///
/// Produced once per request and never mutated afterwards. A probe that got
/// no response at all carries `status_code` 0 and an `error` description
/// instead of body measurements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub request_id: u32,
    pub status_code: u16,
    /// Seconds from just before the request until the body was fully
    /// consumed, or until the failure point.
    pub elapsed_time: f64,
    pub success: bool,
    /// Number of chunks the body was drained in; stream probes only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunks_received: Option<u32>,
    /// Character count of the decoded body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_length: Option<usize>,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
