use std::path::Path;
use std::time::Duration;

use chrono::Local;
use tokio::time::sleep;

use loadprobe::config::app_config::load_config;
use loadprobe::config::model::TestConfig;
use loadprobe::http_probe::prelude::*;
use loadprobe::runner::{LoadTester, idle_wait};

/// Pause between the call test and the stream test within one round.
const INTER_TEST_PAUSE: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = load_config();

    println!("\n{}", "*".repeat(80));
    println!("HTTP client load test: /cfg/call and /cfg/stream");
    println!("{}\n", "*".repeat(80));

    let mut tester = LoadTester::new(&config.base_url);

    println!("\n{}", "=".repeat(80));
    println!("Round 1 starting");
    println!("{}", "=".repeat(80));

    run_round(&mut tester, &config).await;

    announce_idle_gap(config.wait_minutes);
    idle_wait(Duration::from_secs(config.wait_minutes * 60)).await;

    println!("\n{}", "=".repeat(80));
    println!("Round 2 starting (connection reuse after the idle gap)");
    println!("{}", "=".repeat(80));

    run_round(&mut tester, &config).await;

    tester
        .save_results(Path::new(&config.results_file))
        .expect("Failed to write results file");

    println!("\n{}", "=".repeat(80));
    println!("All tests complete ✅");
    println!("{}\n", "=".repeat(80));

    print_interpretation_hints();
}

/// One full round: call test, short pause, stream test.
async fn run_round(tester: &mut LoadTester, config: &TestConfig) {
    tester
        .run_load_test(Endpoint::Call, config.num_requests, config.concurrent_workers)
        .await;

    sleep(INTER_TEST_PAUSE).await;

    tester
        .run_load_test(Endpoint::Stream, config.num_requests, config.concurrent_workers)
        .await;
}

fn announce_idle_gap(wait_minutes: u64) {
    println!("\n{}", "#".repeat(80));
    println!("Waiting {wait_minutes} minutes before the second round...");
    println!("This checks whether pooled connections fail after a long period without calls");
    println!(
        "Wait started at: {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    println!("{}\n", "#".repeat(80));
}

fn print_interpretation_hints() {
    println!("\nSummary:");
    println!("A spike in second-round failures usually points to one of:");
    println!("1. The server closing idle pooled connections");
    println!("2. A maximum idle time shorter than the wait period");
    println!("3. The client pool not evicting expired connections");
    println!("\nWorth checking in the client under test:");
    println!("- The connection provider's maximum idle time");
    println!("- The response timeout configuration");
    println!("- The pool's connection health checks\n");
}
