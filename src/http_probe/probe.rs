use std::time::Instant;

use chrono::Local;
use reqwest::Client;

use super::describe_error;
use super::result::ProbeResult;

/// Drain granularity for the streaming probe, in bytes.
pub const STREAM_CHUNK_SIZE: usize = 1024;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn local_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Probes the call endpoint with one buffered GET.
///
/// Elapsed time spans from just before the request until the full body has
/// been received. Transport failures never propagate; they come back as a
/// failed result with status 0 and a description of the cause.
pub async fn probe_call(client: &Client, url: &str, request_id: u32) -> ProbeResult {
    let start = Instant::now();

    match fetch_buffered(client, url).await {
        Ok((status, body)) => {
            let elapsed = start.elapsed().as_secs_f64();
            let success = status == 200;
            ProbeResult {
                request_id,
                status_code: status,
                elapsed_time: elapsed,
                success,
                chunks_received: None,
                response_length: Some(body.chars().count()),
                timestamp: local_timestamp(),
                error: (!success).then(|| format!("HTTP {status}")),
            }
        }
        Err(err) => failed_result(request_id, start, &err),
    }
}

/// Probes the stream endpoint, draining the body incrementally.
///
/// The body is consumed in [`STREAM_CHUNK_SIZE`]-byte units (a trailing
/// partial unit counts as one chunk), so elapsed time covers the full
/// drain rather than just the response head.
pub async fn probe_stream(client: &Client, url: &str, request_id: u32) -> ProbeResult {
    let start = Instant::now();

    match fetch_streamed(client, url).await {
        Ok((status, chunks_received, body)) => {
            let elapsed = start.elapsed().as_secs_f64();
            let success = status == 200;
            ProbeResult {
                request_id,
                status_code: status,
                elapsed_time: elapsed,
                success,
                chunks_received: Some(chunks_received),
                response_length: Some(body.chars().count()),
                timestamp: local_timestamp(),
                error: (!success).then(|| format!("HTTP {status}")),
            }
        }
        Err(err) => failed_result(request_id, start, &err),
    }
}

async fn fetch_buffered(client: &Client, url: &str) -> Result<(u16, String), reqwest::Error> {
    let response = client.get(url).send().await?;
    let status = response.status().as_u16();
    let body = response.text().await?;
    Ok((status, body))
}

async fn fetch_streamed(client: &Client, url: &str) -> Result<(u16, u32, String), reqwest::Error> {
    let mut response = client.get(url).send().await?;
    let status = response.status().as_u16();

    let mut chunks_received = 0u32;
    let mut body: Vec<u8> = Vec::new();
    // Bytes received but not yet attributed to a full-size chunk. Network
    // reads arrive at arbitrary sizes, so they are re-sliced into
    // STREAM_CHUNK_SIZE units to keep the chunk count deterministic.
    let mut pending = 0usize;

    while let Some(chunk) = response.chunk().await? {
        body.extend_from_slice(&chunk);
        pending += chunk.len();
        while pending >= STREAM_CHUNK_SIZE {
            chunks_received += 1;
            pending -= STREAM_CHUNK_SIZE;
        }
    }
    if pending > 0 {
        chunks_received += 1;
    }

    let text = String::from_utf8_lossy(&body).into_owned();
    Ok((status, chunks_received, text))
}

fn failed_result(request_id: u32, start: Instant, err: &reqwest::Error) -> ProbeResult {
    ProbeResult {
        request_id,
        status_code: 0,
        elapsed_time: start.elapsed().as_secs_f64(),
        success: false,
        chunks_received: None,
        response_length: None,
        timestamp: local_timestamp(),
        error: Some(describe_error(err)),
    }
}
