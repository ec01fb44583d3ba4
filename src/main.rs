mod benchmarks;
mod client;
mod config;
mod error;
mod gate;
mod report;
mod stats;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use benchmarks::{parse_state, selectable_states, BenchmarkTable};
use client::{LeadClient, LeadPayload};
use config::{Cli, Command};
use gate::{GateDecision, GateState};
use report::Comparison;
use stats::TierPolicy;
use utils::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match &cli.command {
        Command::Compare {
            state,
            code,
            rate,
            email,
            policy,
        } => {
            let request = CompareRequest {
                state,
                code,
                rate,
                email: email.as_deref(),
                policy: *policy,
            };
            let comparison = compare(&cli, &request).await?;
            comparison.render();
        }
        Command::Codes => {
            let table = load_table(&cli)?;
            for (code, bench) in table.codes() {
                log_info(code, &bench.description);
            }
        }
        Command::States => {
            for (code, name) in selectable_states() {
                println!("{:>20}: {}", code.bold(), name);
            }
        }
        Command::Reset => {
            GateState::reset(&cli.state_file)
                .with_context(|| format!("failed to reset {}", cli.state_file.display()))?;
            info!("Stored email and analysis count cleared.");
        }
    }

    Ok(())
}

struct CompareRequest<'a> {
    state: &'a str,
    code: &'a str,
    rate: &'a str,
    email: Option<&'a str>,
    policy: TierPolicy,
}

fn load_table(cli: &Cli) -> Result<BenchmarkTable> {
    BenchmarkTable::load(&cli.data)
        .with_context(|| format!("failed to load benchmark table from {}", cli.data.display()))
}

/// Validates the request, applies the email gate and builds the comparison. The analysis
/// counter only moves once a comparison has been produced.
async fn compare(cli: &Cli, request: &CompareRequest<'_>) -> Result<Comparison> {
    let table = load_table(cli)?;
    let state = parse_state(request.state)?;
    let rate = parse_rate(request.rate)?;
    let lookup = table.lookup(request.code, state)?;

    let mut gate = GateState::load(&cli.state_file)
        .with_context(|| format!("failed to read {}", cli.state_file.display()))?;

    if let GateDecision::Capture(email) = gate.check(request.email)? {
        let lead = LeadPayload::new(
            &email,
            state,
            request.code.trim(),
            &sanitize_rate(request.rate),
            gate.analysis_count,
        );
        gate.record_email(email);
        gate.save(&cli.state_file)?;

        let client = LeadClient::new(cli.webhook_url.clone())?;
        client.forward(&lead).await;
    }

    let comparison = Comparison::build(state, request.code, rate, lookup, request.policy);

    let count = gate.record_analysis();
    gate.save(&cli.state_file)?;
    debug!(count, "Analysis recorded.");

    Ok(comparison)
}
