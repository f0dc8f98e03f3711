use serde::Deserialize;

use crate::pool::{DEFAULT_BUFFER_CAPACITY, DEFAULT_MAX_RETAINED_CAPACITY, DEFAULT_POOL_SIZE};

/// Converter settings. Every field has a default, so an empty table is valid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConverterConfig {
    /// Output protocol name (e.g., "raw").
    pub protocol: String,
    /// Encoding within the protocol (e.g., "custom").
    pub encoding: String,
    /// Idle buffers kept in the converter's pool.
    pub pool_size: usize,
    /// Initial capacity of a freshly allocated stream buffer, bytes.
    pub buffer_capacity: usize,
    /// Buffers grown past this are not returned to the pool (0 = no limit).
    pub max_retained_capacity: usize,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            protocol: "raw".into(),
            encoding: "custom".into(),
            pool_size: DEFAULT_POOL_SIZE,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            max_retained_capacity: DEFAULT_MAX_RETAINED_CAPACITY,
        }
    }
}
