//! Example: Retry Tuning
//!
//! Demonstrates: The polling engine behind every page predicate, its
//! timeout-as-verdict contract, and process-wide default tuning.
//!
//! Run with: `cargo run --example retry_tuning`
//!
//! Toyota Way: Heijunka (Level Loading) - Consistent polling intervals

use esperar::prelude::*;
use std::time::Duration;

fn main() -> EsperarResult<()> {
    // Surface the engine's debug lines; try RUST_LOG=esperar=trace for
    // per-probe output.
    tracing_subscriber::fmt()
        .with_env_filter("esperar=debug")
        .compact()
        .init();

    println!("=== Esperar Retry Tuning Example ===\n");

    // 1. Probe that settles on the third attempt
    println!("1. Probe settles on the third attempt...");
    let policy = RetryPolicy::new(Duration::from_millis(500)).with_interval(Duration::from_millis(20));
    let mut calls = 0;
    let verdict = retry_with(policy, || {
        calls += 1;
        Ok(calls >= 3)
    })?;
    println!("   verdict {verdict} after {calls} probes");

    // 2. An exhausted budget is a verdict, never an error
    println!("\n2. Probe that never settles...");
    let tight = RetryPolicy::new(Duration::from_millis(80)).with_interval(Duration::from_millis(20));
    let mut attempts = 0;
    let verdict = retry_with(tight, || {
        attempts += 1;
        Ok(false)
    })?;
    println!("   verdict {verdict} after {attempts} probes (budget spent, no Err)");

    // 3. Zero timeout still probes exactly once
    println!("\n3. Single-shot policy...");
    let mut shots = 0;
    let verdict = retry_with(RetryPolicy::single_shot(), || {
        shots += 1;
        Ok(false)
    })?;
    println!("   verdict {verdict} after {shots} probe");

    // 4. Process-wide defaults feed the bare `retry` entry point
    println!("\n4. Process-wide defaults...");
    let stock = current_policy();
    println!(
        "   stock policy: timeout {:?}, interval {:?}",
        stock.timeout, stock.interval
    );
    configure_defaults(RetryPolicy::fast());
    let tuned = current_policy();
    println!(
        "   tuned policy: timeout {:?}, interval {:?}",
        tuned.timeout, tuned.interval
    );
    let verdict = retry(|| Ok(true))?;
    println!("   retry under tuned defaults -> {verdict}");
    reset_defaults();
    println!(
        "   after reset: timeout {:?}",
        current_policy().timeout
    );

    // 5. Probe errors abort the loop immediately
    println!("\n5. Probe that breaks...");
    let mut probes = 0;
    let outcome = retry_with(RetryPolicy::fast(), || {
        probes += 1;
        if probes == 2 {
            Err(EsperarError::transport("connection reset"))
        } else {
            Ok(false)
        }
    });
    match outcome {
        Ok(v) => println!("   unexpected verdict: {v}"),
        Err(e) => println!("   aborted on probe {probes}: {e}"),
    }

    println!("\n✅ Retry tuning example completed!");
    Ok(())
}
