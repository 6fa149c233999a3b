use clap::{Parser, Subcommand};

/// `dailycall` - a morning phone call that reads you your inbox.
#[derive(Parser, Debug)]
#[command(name = "dailycall")]
#[command(version)]
#[command(about = "Summarize unread email and deliver it as a phone call.", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the daily job: summarize, synthesize, store and call
    Run {
        /// Do everything except placing the call
        #[arg(long)]
        dry_run: bool,
    },

    /// Fetch and summarize only; print the summary as JSON
    Summarize,
}
