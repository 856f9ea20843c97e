//! Bucketwatch CLI
//!
//! Replay captured notification batches through the decoder, print the
//! static stack naming, or run the package probe from a workstation.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use bucketwatch_core::BucketwatchConfig;
use bucketwatch_handler::telemetry;
use clap::{Parser, Subcommand, ValueEnum};
use commands::CommandContext;

#[derive(Parser)]
#[command(name = "bucketwatch")]
#[command(author = "Bucketwatch Team")]
#[command(version = bucketwatch_core::VERSION)]
#[command(about = "Object change notification tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "BUCKETWATCH_LOG_LEVEL")]
    log_level: Option<String>,

    /// Render unclassified operations as "UNKNOWN OPERATION"
    #[arg(long, global = true)]
    quoted_unknown: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a captured notification batch (file or stdin)
    Decode {
        /// Delivery channel the batch came from
        #[arg(short, long, value_enum, default_value_t = Channel::Sns)]
        source: Channel,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Batch file; reads stdin when omitted
        file: Option<PathBuf>,
    },

    /// Print the resource names of both pipelines
    Names {
        /// Override the configured stack suffix
        #[arg(long)]
        suffix: Option<String>,

        /// Show where a delivered event name (e.g. ObjectCreated:Put) is routed
        #[arg(long)]
        event: Option<String>,
    },

    /// Fetch a page and print its title
    Probe {
        /// Override the configured probe URL
        #[arg(long)]
        url: Option<String>,
    },
}

/// Delivery channel
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Channel {
    Sns,
    Sqs,
}

/// Output format for decoded entries
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = if let Some(path) = &cli.config {
        BucketwatchConfig::from_file(path)?
    } else {
        BucketwatchConfig::from_env()
    };

    // Override with CLI args
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if cli.quoted_unknown {
        config.logging.quoted_unknown = true;
    }
    config.logging.format = "pretty".to_string();
    config.validate()?;

    telemetry::init(&config.logging);

    let ctx = CommandContext { config };

    match cli.command {
        Commands::Decode {
            source,
            format,
            file,
        } => commands::decode::execute(&ctx, source, format, file.as_deref()),
        Commands::Names { suffix, event } => {
            commands::names::execute(&ctx, suffix, event.as_deref())
        }
        Commands::Probe { url } => commands::probe::execute(&ctx, url).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_args() {
        let cli = Cli::try_parse_from(["bucketwatch", "decode", "--source", "sqs", "--format", "json", "batch.json"])
            .unwrap();

        match cli.command {
            Commands::Decode { source, format, file } => {
                assert_eq!(source, Channel::Sqs);
                assert_eq!(format, OutputFormat::Json);
                assert_eq!(file, Some(PathBuf::from("batch.json")));
            }
            _ => panic!("expected decode"),
        }
    }

    #[test]
    fn test_decode_defaults() {
        let cli = Cli::try_parse_from(["bucketwatch", "decode", "-f", "text"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Decode {
                source: Channel::Sns,
                format: OutputFormat::Text,
                file: None
            }
        ));
    }

    #[test]
    fn test_names_event_arg() {
        let cli = Cli::try_parse_from(["bucketwatch", "names", "--event", "ObjectCreated:Put"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Names { suffix: None, event: Some(ref e) } if e == "ObjectCreated:Put"
        ));
    }
}
