//! Run simulated flaky flow benchmarks and print the session report
//!
//! Usage: cargo run -p bench-runner --example run_benchmark -- [config.toml] [out.json]

use anyhow::Result;
use bench_runner::{
    BenchmarkRunResult, BenchmarkRunner, Config, OutputFormat, Reporter, RunReport, TimerSample,
};
use std::cell::Cell;
use std::env;
use std::time::Duration;

const FLOWS: &[&str] = &["token-send", "account-switching", "nft-list-scrolling"];

/// Deterministic jitter so repeated runs print comparable numbers.
fn jitter(attempt: u32, spread: f64) -> f64 {
    let x = (attempt.wrapping_mul(2_654_435_761) >> 16) % 1000;
    (x as f64 / 1000.0 - 0.5) * spread
}

async fn token_send(attempt: u32) -> BenchmarkRunResult {
    tokio::time::sleep(Duration::from_millis(5)).await;

    // Every seventh attempt loses the confirmation button.
    if attempt % 7 == 0 {
        return BenchmarkRunResult::partial_failure(
            vec![TimerSample::new("openSendPage", 180.0)],
            "confirm button not found",
        );
    }

    let mut timers = vec![
        TimerSample::new("openSendPage", 180.0 + jitter(attempt, 20.0)),
        TimerSample::new("selectAsset", 95.0 + jitter(attempt + 1, 10.0)),
        TimerSample::new("confirmTransaction", 420.0 + jitter(attempt + 2, 60.0)),
    ];
    // Occasional GC pause
    if attempt % 11 == 0 {
        timers[2].duration *= 4.0;
    }
    BenchmarkRunResult::success(timers)
}

async fn account_switching(attempt: u32) -> BenchmarkRunResult {
    tokio::time::sleep(Duration::from_millis(3)).await;

    BenchmarkRunResult::success(vec![
        TimerSample::new("openAccountMenu", 120.0 + jitter(attempt, 15.0)),
        TimerSample::new("switchAccount", 450.0 + jitter(attempt + 3, 40.0)),
    ])
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let config = match args.get(1) {
        Some(path) => {
            println!("Loading config from: {}", path);
            Config::from_file(path)?
        }
        None => {
            let mut config = Config::default();
            config.runner.retry_delay = Duration::from_millis(50);
            config
        }
    };

    println!("Iterations: {}", config.runner.iterations);
    println!("Retries:    {}", config.runner.retries);
    println!();

    let runner = BenchmarkRunner::with_config(config.runner_config());
    let iterations = config.runner.iterations;
    let retries = config.runner.retries;
    let mut report = RunReport::start();

    for &flow in FLOWS {
        let attempts = Cell::new(0u32);
        let next_attempt = || {
            let attempt = attempts.get() + 1;
            attempts.set(attempt);
            attempt
        };

        let summary = match flow {
            "token-send" => {
                runner
                    .run(flow, || token_send(next_attempt()), iterations, retries)
                    .await?
            }
            "account-switching" => {
                runner
                    .run(flow, || account_switching(next_attempt()), iterations, retries)
                    .await?
            }
            unknown => {
                report.skip(unknown, format!("Unknown flow: {}", unknown));
                continue;
            }
        };
        report.record(summary);
    }
    report.finish();

    Reporter::new(OutputFormat::Console).report_run(&report)?;

    if let Some(out) = args.get(2) {
        Reporter::new(OutputFormat::JsonPretty).write_run_to_file(&report, out)?;
        println!("Wrote JSON report to {}", out);
    }

    std::process::exit(report.exit_code());
}
