//! Batch execution: a bounded pool of workers draining probes against one
//! endpoint, plus the idle-wait countdown between rounds.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Local;
use reqwest::Client;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::sleep;
use url::Url;

use crate::export;
use crate::http_probe::prelude::*;
use crate::stats;

/// Accumulated probe outcomes, keyed by endpoint name. Within one batch
/// the order is completion order, not submission order.
pub type ResultSet = BTreeMap<String, Vec<ProbeResult>>;

const PROBE_TIMEOUT: Duration = Duration::from_secs(30);
const PROGRESS_EVERY: usize = 10;
const COUNTDOWN_STEP_SECS: u64 = 30;
/// Width of the endpoint label in progress lines ("stream" is the widest).
const LABEL_WIDTH: usize = 6;

fn to_fixed_width(input: &str, width: usize) -> String {
    use unicode_truncate::UnicodeTruncateStr;

    let (truncated, _) = input.unicode_truncate(width);
    format!("{:<width$}", truncated, width = width)
}

pub struct LoadTester {
    client: Client,
    call_url: String,
    stream_url: String,
    results: ResultSet,
}

impl LoadTester {
    /// Builds a tester for the given base URL.
    ///
    /// The client is created once and shared across all batches, so its
    /// connection pool survives the idle gap between rounds — the reuse
    /// path the second round exists to exercise.
    pub fn new(base_url: &str) -> Self {
        let base = Url::parse(base_url).expect("Invalid base URL");
        let call_url = base.join(Endpoint::Call.path()).expect("Invalid call URL");
        let stream_url = base.join(Endpoint::Stream.path()).expect("Invalid stream URL");

        let client = Client::builder()
            .timeout(PROBE_TIMEOUT)
            .user_agent("loadprobe/0.1")
            .build()
            .expect("Failed to create client");

        LoadTester {
            client,
            call_url: call_url.to_string(),
            stream_url: stream_url.to_string(),
            results: ResultSet::new(),
        }
    }

    /// Everything recorded so far, across all finished batches.
    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    fn url_for(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::Call => &self.call_url,
            Endpoint::Stream => &self.stream_url,
        }
    }

    /// Runs one batch of `num_requests` probes with at most
    /// `concurrent_workers` in flight.
    ///
    /// Progress is printed after every tenth completion and after the
    /// last one. The batch is appended to the result set under the
    /// endpoint's name, so a later round extends rather than replaces an
    /// earlier one, and the completion-ordered sequence is returned.
    pub async fn run_load_test(
        &mut self,
        endpoint: Endpoint,
        num_requests: usize,
        concurrent_workers: usize,
    ) -> Vec<ProbeResult> {
        let name = endpoint.name();

        println!("\n{}", "=".repeat(80));
        println!("Testing the /{name} endpoint");
        println!("Total requests: {num_requests}, concurrency: {concurrent_workers}");
        println!("Started at: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
        println!("{}\n", "=".repeat(80));

        let start = Instant::now();
        let semaphore = Arc::new(Semaphore::new(concurrent_workers));
        let mut tasks = JoinSet::new();

        for i in 0..num_requests {
            let client = self.client.clone();
            let url = self.url_for(endpoint).to_string();
            let semaphore = Arc::clone(&semaphore);
            let request_id = (i + 1) as u32;

            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.expect("semaphore closed");
                match endpoint {
                    Endpoint::Call => probe_call(&client, &url, request_id).await,
                    Endpoint::Stream => probe_stream(&client, &url, request_id).await,
                }
            });
        }

        let label = to_fixed_width(name, LABEL_WIDTH);
        let mut results: Vec<ProbeResult> = Vec::with_capacity(num_requests);
        let mut success_count = 0usize;

        while let Some(joined) = tasks.join_next().await {
            let result = joined.expect("probe task panicked");
            if result.success {
                success_count += 1;
            }
            results.push(result);

            let completed = results.len();
            if completed % PROGRESS_EVERY == 0 || completed == num_requests {
                println!(
                    "[{label}] Progress: {completed}/{num_requests} | ✅ {success_count} | ❌ {}",
                    completed - success_count
                );
            }
        }

        let total_time = start.elapsed().as_secs_f64();

        self.results
            .entry(name.to_string())
            .or_default()
            .extend(results.iter().cloned());

        stats::print_statistics(name, &results, total_time);

        results
    }

    /// Writes everything accumulated so far to `path`, replacing any
    /// previous file.
    pub fn save_results(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        export::save_results(&self.results, path)
    }
}

/// Sleeps for `total`, printing the remaining time every 30 seconds so an
/// operator can tell the process is still alive. Nothing else runs while
/// the wait is in progress.
pub async fn idle_wait(total: Duration) {
    let mut remaining = total.as_secs();
    while remaining > 0 {
        println!("Remaining wait time: {}", format_remaining(remaining));
        let step = remaining.min(COUNTDOWN_STEP_SECS);
        sleep(Duration::from_secs(step)).await;
        remaining -= step;
    }

    println!(
        "\nIdle wait complete at: {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
}

fn format_remaining(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_time_renders_as_minutes_and_seconds() {
        assert_eq!(format_remaining(600), "10:00");
        assert_eq!(format_remaining(570), "09:30");
        assert_eq!(format_remaining(30), "00:30");
        assert_eq!(format_remaining(7), "00:07");
    }

    #[test]
    fn labels_are_padded_to_a_fixed_width() {
        assert_eq!(to_fixed_width("call", LABEL_WIDTH), "call  ");
        assert_eq!(to_fixed_width("stream", LABEL_WIDTH), "stream");
        assert_eq!(to_fixed_width("overlong", LABEL_WIDTH), "overlo");
    }

    #[test]
    fn endpoint_urls_are_derived_from_the_base_url() {
        let tester = LoadTester::new("http://localhost:10000");
        assert_eq!(tester.url_for(Endpoint::Call), "http://localhost:10000/cfg/call");
        assert_eq!(
            tester.url_for(Endpoint::Stream),
            "http://localhost:10000/cfg/stream"
        );
    }
}
