//! CLI command implementations

pub mod decode;
pub mod names;
pub mod probe;

use bucketwatch_core::BucketwatchConfig;

/// Context passed to all commands
pub struct CommandContext {
    pub config: BucketwatchConfig,
}
