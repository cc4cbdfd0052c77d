// Copyright 2025 RISC Zero, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::path::{Path, PathBuf};

use alloy::{
    primitives::Address,
    providers::ProviderBuilder,
    rpc::client::RpcClient,
    transports::layers::RetryBackoffLayer,
};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pos_rewards::{
    merge_reports, ChainLedger, LedgerClient, PeriodPreset, ProtocolConstants, Report,
    ReportBuilder, ReportConfig, ReportOptions, Snapshot, DEFAULT_PERIODS, DEFAULT_PERIOD_BLOCKS,
};
use url::Url;

/// Arguments for the rewards reporter.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct ReporterArgs {
    #[clap(subcommand)]
    command: Command,

    /// Whether to log in JSON format.
    #[clap(long, env, default_value_t = false, global = true)]
    log_json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a per-period rewards report.
    Report(ReportArgs),
    /// Merge two reports built on different networks.
    Merge(MergeArgs),
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Snapshot with guardian details and delegator reward histories.
    #[clap(long, env = "REPORT_SNAPSHOT")]
    snapshot: PathBuf,

    /// URL of the Ethereum RPC endpoint. Block data is read from the snapshot when unset.
    #[clap(short, long, env)]
    rpc_url: Option<Url>,

    /// Named period length: quarterly, monthly or weekly.
    #[clap(long, conflicts_with = "period_in_blocks")]
    preset: Option<PeriodPreset>,

    /// Period length in blocks.
    #[clap(long, env)]
    period_in_blocks: Option<u64>,

    /// Number of periods to report.
    #[clap(long, env, default_value_t = DEFAULT_PERIODS)]
    periods: usize,

    /// Drop the partial period from the report.
    #[clap(long, env, default_value_t = false)]
    show_only_full_periods: bool,

    /// Comma separated guardians to leave out (defaults to the protocol's own guardians).
    #[clap(long, env, value_delimiter = ',')]
    exclude_guardians: Option<Vec<Address>>,

    /// First block with rewards (if not set, uses the Ethereum mainnet value).
    #[clap(long, env)]
    start_of_rewards_block: Option<u64>,

    /// Write the report to this file instead of stdout.
    #[clap(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct MergeArgs {
    /// Report whose period layout is kept.
    first: PathBuf,

    second: PathBuf,

    /// Write the merged report to this file instead of stdout.
    #[clap(short, long)]
    output: Option<PathBuf>,
}

impl ReportArgs {
    fn options(&self) -> ReportOptions {
        let period_in_blocks = match (self.preset, self.period_in_blocks) {
            (Some(preset), _) => preset.blocks(),
            (None, Some(blocks)) => blocks,
            (None, None) => DEFAULT_PERIOD_BLOCKS,
        };
        ReportOptions {
            period_in_blocks,
            periods: self.periods,
            show_only_full_periods: self.show_only_full_periods,
            exclude_guardians: self.exclude_guardians.clone(),
        }
    }

    fn config(&self) -> ReportConfig {
        let mut constants = ProtocolConstants::ethereum();
        if let Some(block) = self.start_of_rewards_block {
            constants.start_of_rewards_block = block;
        }
        ReportConfig { constants, ..Default::default() }
    }
}

async fn build_report<L: LedgerClient>(
    snapshot: Snapshot,
    ledger: L,
    args: &ReportArgs,
) -> Result<Report> {
    let builder = ReportBuilder::new(snapshot, ledger, args.config());
    let report = builder.build_report(&args.options()).await?;
    Ok(report)
}

async fn report(args: &ReportArgs) -> Result<Report> {
    let snapshot = Snapshot::load(&args.snapshot)?;

    match &args.rpc_url {
        Some(rpc_url) => {
            tracing::info!("Reading blocks from {rpc_url}");
            let provider = ProviderBuilder::new().connect_client(
                RpcClient::builder()
                    .layer(RetryBackoffLayer::new(3, 1000, 200))
                    .http(rpc_url.clone()),
            );
            build_report(snapshot.clone(), ChainLedger::new(provider, snapshot), args).await
        }
        None => build_report(snapshot.clone(), snapshot, args).await,
    }
}

fn merge(args: &MergeArgs) -> Result<Report> {
    let first = read_report(&args.first)?;
    let second = read_report(&args.second)?;
    Ok(merge_reports(first, second))
}

fn read_report(path: &Path) -> Result<Report> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read report {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse report {}", path.display()))
}

fn write_report(report: &Report, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("failed to write report {}", path.display()))?;
            tracing::info!("Report written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = ReporterArgs::parse();

    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
        .from_env_lossy();

    if args.log_json {
        tracing_subscriber::fmt()
            .with_ansi(false)
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_ansi(false)
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    match &args.command {
        Command::Report(report_args) => {
            let report = report(report_args).await?;
            write_report(&report, report_args.output.as_deref())
        }
        Command::Merge(merge_args) => {
            let report = merge(merge_args)?;
            write_report(&report, merge_args.output.as_deref())
        }
    }
}
