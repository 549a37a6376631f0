use cadence_core::config::ExpansionConfig;
use cadence_core::error::CoreError;

use crate::error::RfcResult;

/// Tuning knobs for an occurrence stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpansionOptions {
    /// Base periods generated per refill.
    pub batch_size: u32,
    /// Consecutive empty refills after which the stream ends.
    /// `None` retries forever.
    pub max_empty_batches: Option<u32>,
}

impl ExpansionOptions {
    pub const DEFAULT_BATCH_SIZE: u32 = 30;

    /// ## Summary
    /// Converts the `[expansion]` configuration section.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidInput` when `batch_size` is zero.
    pub fn from_config(config: &ExpansionConfig) -> RfcResult<Self> {
        if config.batch_size == 0 {
            return Err(CoreError::InvalidInput(
                "expansion.batch_size must be at least 1".to_string(),
            )
            .into());
        }
        Ok(Self {
            batch_size: config.batch_size,
            max_empty_batches: config.max_empty_batches,
        })
    }
}

impl Default for ExpansionOptions {
    fn default() -> Self {
        Self {
            batch_size: Self::DEFAULT_BATCH_SIZE,
            max_empty_batches: None,
        }
    }
}
