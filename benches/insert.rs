use sqlitelog::config::LoggerConfig;
use sqlitelog::{Severity, SqliteLogger};
use std::time::{Duration, Instant};

fn run_benchmark(name: &str, records: usize, runs: usize) -> Duration {
    println!("\n{:=<60}", "=");
    println!("Benchmark: {name} ({records} records)");
    println!("{:=<60}", "=");

    let mut times = Vec::new();
    for run in 1..=runs {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut config =
            LoggerConfig::with_path(dir.path().join("bench.db").to_str().expect("utf-8 path"));
        config.minimum_level = "trace".to_string();
        let logger = SqliteLogger::open(&config).expect("Failed to open logger");

        let start = Instant::now();
        for i in 0..records {
            logger
                .log(Severity::Info, [format!("record {i}")])
                .expect("insert failed");
        }
        let elapsed = start.elapsed();
        println!("  Run {run}/{runs}: {:.3}s", elapsed.as_secs_f64());
        times.push(elapsed);
    }

    let total: Duration = times.iter().sum();
    let avg = total / u32::try_from(runs).unwrap_or(1);
    println!(
        "  Average: {:.3}s ({:.0} records/sec)",
        avg.as_secs_f64(),
        records as f64 / avg.as_secs_f64()
    );
    avg
}

fn main() {
    run_benchmark("synchronous inserts", 1_000, 3);
    run_benchmark("synchronous inserts", 5_000, 1);
}
