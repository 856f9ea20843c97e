//! probe command - fetch a page title the way the handlers do

use super::CommandContext;
use anyhow::{Context, Result};
use bucketwatch_handler::PackageProbe;
use colored::Colorize;

pub async fn execute(ctx: &CommandContext, url: Option<String>) -> Result<()> {
    let mut config = ctx.config.probe.clone();
    if let Some(url) = url {
        config.url = url;
    }

    let probe = PackageProbe::new(&config)?;
    let title = probe
        .run()
        .await
        .with_context(|| format!("Probe against {} failed", probe.url()))?;

    println!("{} {}", "title:".bold(), title);
    Ok(())
}
