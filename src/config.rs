use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::stats::TierPolicy;

#[derive(Debug, Parser)]
#[command(name = "ratebench", about = "Compare a billed rate against state benchmarks")]
pub struct Cli {
    /// Benchmark table produced by the data preparation step (JSON).
    #[arg(long, global = true, env = "RATEBENCH_DATA", default_value = "data/aba-data.json")]
    pub data: PathBuf,

    /// Where the analysis count and captured email are kept between runs.
    #[arg(
        long,
        global = true,
        env = "RATEBENCH_STATE_FILE",
        default_value = ".ratebench/state.json"
    )]
    pub state_file: PathBuf,

    /// Webhook that receives captured leads. Leads are not forwarded when unset.
    #[arg(long, global = true, env = "RATEBENCH_WEBHOOK_URL")]
    pub webhook_url: Option<String>,

    /// Log filter, e.g. `info` or `ratebench=debug`.
    #[arg(long, global = true, env = "RATEBENCH_LOG", default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show where a rate falls for a code and state.
    Compare {
        #[arg(long)]
        state: String,

        #[arg(long)]
        code: String,

        /// Rate you currently bill, in dollars.
        #[arg(long)]
        rate: String,

        /// Email to keep using the tool after the first comparison.
        #[arg(long)]
        email: Option<String>,

        #[arg(long, value_enum, default_value_t = TierPolicy::default())]
        policy: TierPolicy,
    },

    /// List billing codes in the benchmark table.
    Codes,

    /// List selectable states.
    States,

    /// Forget the stored email and analysis count.
    Reset,
}
