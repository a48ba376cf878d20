/// Parameters for one full harness run.
#[derive(Debug, Clone)]
pub struct TestConfig {
    /// Base URL of the system under test; the two endpoint paths are
    /// joined onto it.
    pub base_url: String,
    /// Requests issued per endpoint per round.
    pub num_requests: usize,
    /// Worker limit per batch.
    pub concurrent_workers: usize,
    /// Idle gap between the two rounds, in minutes.
    pub wait_minutes: u64,
    /// Where the accumulated results are written after round two.
    pub results_file: String,
}

pub const DEFAULT_BASE_URL: &str = "http://localhost:10000";
pub const DEFAULT_RESULTS_FILE: &str = "load_test_results.json";

pub const NUM_REQUESTS: usize = 100;
pub const CONCURRENT_WORKERS: usize = 20;
pub const WAIT_MINUTES: u64 = 10;

impl Default for TestConfig {
    fn default() -> Self {
        TestConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            num_requests: NUM_REQUESTS,
            concurrent_workers: CONCURRENT_WORKERS,
            wait_minutes: WAIT_MINUTES,
            results_file: DEFAULT_RESULTS_FILE.to_string(),
        }
    }
}
