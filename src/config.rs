//! Channel configuration types

use serde::{Deserialize, Serialize};

use crate::error::{Result, SeineError};

/// Default maximum bytes a channel may hold at once (32 MiB)
pub const DEFAULT_CAPACITY: usize = 32 * 1024 * 1024;

/// Default scatter-gather block size (1 KiB)
pub const DEFAULT_BLOCK_SIZE: usize = 1024;

/// Default number of block slots per scatter-gather group
pub const DEFAULT_GROUP_WIDTH: usize = 1024;

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendKind {
    /// Contiguous fixed-capacity circular buffer
    Ring,
    /// Fixed-size blocks grouped in fixed-width groups, grown on demand
    /// and reclaimed in bulk once fully drained
    ScatterGather,
}

impl Default for BackendKind {
    fn default() -> Self {
        Self::Ring
    }
}

impl BackendKind {
    /// Get a human-readable name for the backend kind
    pub fn name(&self) -> &'static str {
        match self {
            BackendKind::Ring => "ring",
            BackendKind::ScatterGather => "scatter-gather",
        }
    }
}

/// Configuration for creating a byte channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Maximum bytes the backend may hold at once
    pub capacity: usize,
    /// Storage backend kind
    pub backend: BackendKind,
    /// Block size in bytes (scatter-gather only)
    pub block_size: usize,
    /// Number of block slots per group (scatter-gather only)
    pub group_width: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            backend: BackendKind::default(),
            block_size: DEFAULT_BLOCK_SIZE,
            group_width: DEFAULT_GROUP_WIDTH,
        }
    }
}

impl ChannelConfig {
    /// Create a configuration with the given capacity and default backend
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }

    /// Create a ring-backed channel configuration
    pub fn ring(capacity: usize) -> Self {
        Self {
            capacity,
            backend: BackendKind::Ring,
            ..Default::default()
        }
    }

    /// Create a scatter-gather-backed channel configuration
    pub fn scatter_gather(capacity: usize, block_size: usize, group_width: usize) -> Self {
        Self {
            capacity,
            backend: BackendKind::ScatterGather,
            block_size,
            group_width,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(SeineError::invalid_parameter(
                "capacity",
                "capacity must be greater than 0",
            ));
        }

        if self.backend == BackendKind::ScatterGather {
            if self.block_size == 0 {
                return Err(SeineError::invalid_parameter(
                    "block_size",
                    "block size must be greater than 0",
                ));
            }
            if self.group_width == 0 {
                return Err(SeineError::invalid_parameter(
                    "group_width",
                    "group width must be greater than 0",
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ChannelConfig::default();
        assert_eq!(config.capacity, DEFAULT_CAPACITY);
        assert_eq!(config.backend, BackendKind::Ring);
        assert_eq!(config.block_size, DEFAULT_BLOCK_SIZE);
        assert_eq!(config.group_width, DEFAULT_GROUP_WIDTH);
        config.validate().unwrap();
    }

    #[test]
    fn test_constructors() {
        let config = ChannelConfig::ring(64);
        assert_eq!(config.capacity, 64);
        assert_eq!(config.backend, BackendKind::Ring);

        let config = ChannelConfig::scatter_gather(4096, 128, 8);
        assert_eq!(config.backend, BackendKind::ScatterGather);
        assert_eq!(config.block_size, 128);
        assert_eq!(config.group_width, 8);
        config.validate().unwrap();
    }

    #[test]
    fn test_validation_rejects_zero_capacity() {
        let config = ChannelConfig::ring(0);
        assert!(matches!(
            config.validate(),
            Err(SeineError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_validation_rejects_zero_scatter_geometry() {
        let config = ChannelConfig::scatter_gather(4096, 0, 8);
        assert!(config.validate().is_err());

        let config = ChannelConfig::scatter_gather(4096, 128, 0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_geometry_ignored_for_ring() {
        // Ring channels do not use the scatter geometry fields.
        let config = ChannelConfig {
            capacity: 16,
            backend: BackendKind::Ring,
            block_size: 0,
            group_width: 0,
        };
        config.validate().unwrap();
    }

    #[test]
    fn test_backend_names() {
        assert_eq!(BackendKind::Ring.name(), "ring");
        assert_eq!(BackendKind::ScatterGather.name(), "scatter-gather");
    }
}
