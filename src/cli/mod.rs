//! Command-line interface for rfqhub.

use clap::{Parser, Subcommand};

/// rfqhub - RFQ marketplace service
/// Buyers post requests for quote, vendors bid, everyone searches
#[derive(Parser)]
#[command(name = "rfqhub")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP API until interrupted
    #[command(alias = "daemon", alias = "-d", alias = "--daemon")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Apply database migrations and exit
    Migrate,

    /// Delete logged search queries older than the retention window
    PruneQueries {
        /// Override `trends.query_log_retention_days`
        #[arg(long)]
        days: Option<i64>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_subcommands() {
        let cli = Cli::try_parse_from(["rfqhub", "serve"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Serve));

        let cli = Cli::try_parse_from(["rfqhub", "prune-queries", "--days", "30"]).unwrap();
        assert_eq!(cli.command, Some(Commands::PruneQueries { days: Some(30) }));

        let cli = Cli::try_parse_from(["rfqhub"]).unwrap();
        assert_eq!(cli.command, None);
    }
}
