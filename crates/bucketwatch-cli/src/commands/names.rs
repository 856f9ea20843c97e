//! names command - print the static stack naming

use super::CommandContext;
use anyhow::{anyhow, Result};
use bucketwatch_core::config::NamingConfig;
use bucketwatch_core::types::StackLayout;

pub fn execute(ctx: &CommandContext, suffix: Option<String>, event: Option<&str>) -> Result<()> {
    let mut naming = ctx.config.naming.clone();
    if let Some(suffix) = suffix {
        naming = NamingConfig {
            stack_suffix: suffix,
        };
    }
    naming.validate()?;

    let layout = StackLayout::new(&naming);

    match event {
        Some(event_name) => {
            let route = layout
                .route(event_name)
                .ok_or_else(|| anyhow!("Unknown event name: {}", event_name))?;
            println!("{}", serde_json::to_string_pretty(&route)?);
        }
        None => println!("{}", serde_json::to_string_pretty(&layout)?),
    }

    Ok(())
}
