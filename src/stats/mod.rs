//! Aggregate statistics over a completed batch of probe results.

use crate::http_probe::result::ProbeResult;

/// Latency aggregates over the successful probes of one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct LatencySummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; `None` with fewer than two samples.
    pub std_dev: Option<f64>,
    pub p50: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
}

/// Summarizes a set of elapsed times, or `None` when there are none.
pub fn summarize(times: &[f64]) -> Option<LatencySummary> {
    if times.is_empty() {
        return None;
    }

    let mut sorted = times.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).expect("non-finite elapsed time"));

    let mean = sorted.iter().sum::<f64>() / sorted.len() as f64;

    Some(LatencySummary {
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        mean,
        median: median(&sorted),
        std_dev: std_dev(&sorted, mean),
        p50: percentile(&sorted, 0.5),
        p90: percentile(&sorted, 0.9),
        p95: percentile(&sorted, 0.95),
        p99: percentile(&sorted, 0.99),
    })
}

/// Value at the `floor(len × fraction)` index of an ascending-sorted
/// slice. Biased for small samples, but kept as the harness's reporting
/// convention; no interpolation.
fn percentile(sorted: &[f64], fraction: f64) -> f64 {
    sorted[(sorted.len() as f64 * fraction) as usize]
}

fn median(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

fn std_dev(samples: &[f64], mean: f64) -> Option<f64> {
    if samples.len() < 2 {
        return None;
    }
    let n = samples.len() as f64;
    let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt())
}

/// Distinct error descriptions among the failed probes, in first-seen
/// order, with occurrence counts.
pub fn error_frequencies(results: &[ProbeResult]) -> Vec<(String, usize)> {
    let mut frequencies: Vec<(String, usize)> = Vec::new();
    for result in results.iter().filter(|r| !r.success) {
        let error = result.error.as_deref().unwrap_or("Unknown");
        match frequencies.iter_mut().find(|(e, _)| e == error) {
            Some((_, count)) => *count += 1,
            None => frequencies.push((error.to_string(), 1)),
        }
    }
    frequencies
}

/// Prints the report block for one finished batch.
///
/// An empty batch prints a note and nothing else; the latency and
/// percentile sections only appear when at least one probe succeeded, and
/// the failure table only when at least one failed.
pub fn print_statistics(endpoint_name: &str, results: &[ProbeResult], total_time: f64) {
    println!("\n{}", "=".repeat(80));
    println!("/{endpoint_name} endpoint results");
    println!("{}", "=".repeat(80));

    if results.is_empty() {
        log::warn!("No results recorded for /{endpoint_name}");
        println!("\nNo requests were executed.\n");
        return;
    }

    let success_times: Vec<f64> = results
        .iter()
        .filter(|r| r.success)
        .map(|r| r.elapsed_time)
        .collect();
    let success_count = success_times.len();
    let failed_count = results.len() - success_count;
    let total = results.len() as f64;

    println!("\nOverall:");
    println!("  Total requests: {}", results.len());
    println!(
        "  Successful: {success_count} ({:.2}%)",
        success_count as f64 / total * 100.0
    );
    println!(
        "  Failed: {failed_count} ({:.2}%)",
        failed_count as f64 / total * 100.0
    );
    println!("  Total time: {total_time:.2}s");
    println!("  Average QPS: {:.2}", total / total_time);

    if let Some(summary) = summarize(&success_times) {
        println!("\nLatency (successful requests):");
        println!("  Min: {:.3}s", summary.min);
        println!("  Max: {:.3}s", summary.max);
        println!("  Mean: {:.3}s", summary.mean);
        println!("  Median: {:.3}s", summary.median);
        if let Some(std_dev) = summary.std_dev {
            println!("  Std dev: {std_dev:.3}s");
        }

        println!("\nPercentiles:");
        println!("  P50: {:.3}s", summary.p50);
        println!("  P90: {:.3}s", summary.p90);
        println!("  P95: {:.3}s", summary.p95);
        println!("  P99: {:.3}s", summary.p99);
    }

    let failures = error_frequencies(results);
    if !failures.is_empty() {
        println!("\nFailures:");
        for (error, count) in &failures {
            println!("  {error}: {count}");
        }
    }

    println!("\n{}\n", "=".repeat(80));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(success: bool, elapsed: f64, error: Option<&str>) -> ProbeResult {
        ProbeResult {
            request_id: 1,
            status_code: if success { 200 } else { 0 },
            elapsed_time: elapsed,
            success,
            chunks_received: None,
            response_length: success.then_some(0),
            timestamp: "2025-01-01 00:00:00".to_string(),
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn percentiles_use_the_floor_index_convention() {
        let times = [0.1, 0.2, 0.3, 0.4, 0.5];
        let summary = summarize(&times).unwrap();
        // floor(5 × 0.5) = 2, floor(5 × 0.9) = 4
        assert_eq!(summary.p50, 0.3);
        assert_eq!(summary.p90, 0.5);
        assert_eq!(summary.p95, 0.5);
        assert_eq!(summary.p99, 0.5);
    }

    #[test]
    fn summary_over_unsorted_input() {
        let times = [0.5, 0.1, 0.3];
        let summary = summarize(&times).unwrap();
        assert_eq!(summary.min, 0.1);
        assert_eq!(summary.max, 0.5);
        assert!((summary.mean - 0.3).abs() < 1e-12);
        assert_eq!(summary.median, 0.3);
    }

    #[test]
    fn median_averages_the_middle_pair_for_even_counts() {
        let summary = summarize(&[0.1, 0.2, 0.3, 0.4]).unwrap();
        assert!((summary.median - 0.25).abs() < 1e-12);
    }

    #[test]
    fn std_dev_is_the_sample_deviation() {
        let summary = summarize(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        // variance over n-1: ((−1.5)² + (−0.5)² + 0.5² + 1.5²) / 3
        let expected = (5.0f64 / 3.0).sqrt();
        assert!((summary.std_dev.unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn single_sample_has_no_std_dev() {
        let summary = summarize(&[0.7]).unwrap();
        assert_eq!(summary.std_dev, None);
        assert_eq!(summary.median, 0.7);
        assert_eq!(summary.p99, 0.7);
    }

    #[test]
    fn empty_input_yields_no_summary() {
        assert_eq!(summarize(&[]), None);
    }

    #[test]
    fn error_table_keeps_first_seen_order_and_counts() {
        let results = vec![
            result(false, 0.1, Some("HTTP 503")),
            result(true, 0.1, None),
            result(false, 0.2, Some("connection refused")),
            result(false, 0.3, Some("HTTP 503")),
        ];
        assert_eq!(
            error_frequencies(&results),
            vec![
                ("HTTP 503".to_string(), 2),
                ("connection refused".to_string(), 1),
            ]
        );
    }

    #[test]
    fn all_successes_yield_an_empty_error_table() {
        let results = vec![result(true, 0.1, None), result(true, 0.2, None)];
        assert!(error_frequencies(&results).is_empty());
    }

    #[test]
    fn printing_an_empty_batch_does_not_panic() {
        print_statistics("call", &[], 0.0);
    }

    #[test]
    fn printing_an_all_failed_batch_skips_the_latency_block() {
        // No successes: summarize() gets an empty slice and the percentile
        // indexing is never reached.
        let results = vec![
            result(false, 0.1, Some("connection refused")),
            result(false, 0.2, Some("connection refused")),
        ];
        print_statistics("call", &results, 0.5);
    }
}
