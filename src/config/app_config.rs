use std::env;

use super::model::{DEFAULT_BASE_URL, DEFAULT_RESULTS_FILE, TestConfig};

/// Load the harness configuration from environment variables.
///
/// Only the target base URL and the results file location are overridable
/// (`BASE_URL`, `RESULTS_FILE`); request volume, concurrency and the idle
/// gap are fixed parameters of the test plan.
pub fn load_config() -> TestConfig {
    let base_url = env::var("BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    let results_file =
        env::var("RESULTS_FILE").unwrap_or_else(|_| DEFAULT_RESULTS_FILE.to_string());

    log::info!("Targeting {base_url}, writing results to {results_file}");

    TestConfig {
        base_url,
        results_file,
        ..TestConfig::default()
    }
}
