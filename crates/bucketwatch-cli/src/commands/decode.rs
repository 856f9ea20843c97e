//! decode command - replay a captured batch through the decoder

use super::CommandContext;
use crate::{Channel, OutputFormat};
use anyhow::{Context, Result};
use bucketwatch_core::types::{SnsBatch, SqsBatch};
use bucketwatch_handler::{ChangeEntry, MemorySink, NotificationDecoder};
use colored::Colorize;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

pub fn execute(
    ctx: &CommandContext,
    source: Channel,
    format: OutputFormat,
    file: Option<&Path>,
) -> Result<()> {
    let input = read_input(file)?;
    let (entries, outcome) = decode(source, &input)?;

    let quoted_unknown = ctx.config.logging.quoted_unknown;
    for entry in &entries {
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string(entry)?),
            OutputFormat::Text => println!("{}\n", entry.render(quoted_unknown)),
        }
    }

    outcome.with_context(|| format!("Decoding stopped after {} entries", entries.len()))?;

    if format == OutputFormat::Text {
        eprintln!("{} {} entries", "Decoded".green(), entries.len());
    }

    Ok(())
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read batch file: {:?}", path)),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read batch from stdin")?;
            Ok(input)
        }
    }
}

/// Decode `input` and return what was emitted, along with the decoder outcome.
/// A batch that is not even a valid outer document fails immediately.
fn decode(
    source: Channel,
    input: &str,
) -> Result<(Vec<ChangeEntry>, bucketwatch_core::Result<()>)> {
    let sink = Arc::new(MemorySink::new());
    let decoder = NotificationDecoder::new(sink.clone());

    let outcome = match source {
        Channel::Sns => {
            let batch: SnsBatch =
                serde_json::from_str(input).context("Failed to parse SNS batch")?;
            decoder.process(&batch.records)
        }
        Channel::Sqs => {
            let batch: SqsBatch =
                serde_json::from_str(input).context("Failed to parse SQS batch")?;
            decoder.process(&batch.records)
        }
    };

    Ok((sink.take(), outcome))
}
