//! Inspector configuration.

use peek_core::{MemoryLayout, PointerWidth, TextFilter};
use thiserror::Error;

/// Invalid [`InspectorConfig`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Only 4- and 8-byte pointers are supported.
    #[error("unsupported pointer size {0} (expected 4 or 8)")]
    UnsupportedPointerSize(usize),

    /// The initial filter has text but no usable terms.
    #[error("filter '{0}' contains only separators")]
    EmptyFilter(String),
}

/// Initial state for a new inspector.
///
/// Validated once by [`ObjectInspector::new`](crate::ObjectInspector::new).
/// Runtime changes go through [`Settings`](crate::Settings) instead.
#[derive(Clone, Debug)]
pub struct InspectorConfig {
    /// Whether edits are enabled when the inspector opens.
    ///
    /// Default: `false`.
    pub editable: bool,

    /// Whether integers are shown in hexadecimal.
    ///
    /// Default: `false`.
    pub hex_display: bool,

    /// Initial filter query.
    ///
    /// Default: empty. Must not consist only of separators.
    pub filter: String,

    /// Pointer size of the inspected process, in bytes.
    ///
    /// Default: 8. Must be 4 or 8.
    pub pointer_size: usize,
}

impl InspectorConfig {
    /// Default pointer size.
    pub const DEFAULT_POINTER_SIZE: usize = 8;

    /// Check every field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout()?;
        if TextFilter::new(self.filter.as_str()).is_degenerate() {
            return Err(ConfigError::EmptyFilter(self.filter.clone()));
        }
        Ok(())
    }

    /// Memory layout derived from the pointer size.
    pub fn layout(&self) -> Result<MemoryLayout, ConfigError> {
        PointerWidth::from_bytes(self.pointer_size)
            .map(MemoryLayout::new)
            .ok_or(ConfigError::UnsupportedPointerSize(self.pointer_size))
    }
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            editable: false,
            hex_display: false,
            filter: String::new(),
            pointer_size: Self::DEFAULT_POINTER_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = InspectorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.layout().unwrap().array_header_size(), 16);
    }

    #[test]
    fn rejects_odd_pointer_size() {
        let config = InspectorConfig {
            pointer_size: 6,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::UnsupportedPointerSize(6)));
    }

    #[test]
    fn rejects_separator_only_filter() {
        let config = InspectorConfig {
            filter: " ,, ".into(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyFilter(_))));
    }

    #[test]
    fn thirty_two_bit_layout() {
        let config = InspectorConfig {
            pointer_size: 4,
            ..Default::default()
        };
        assert_eq!(config.layout().unwrap().array_header_size(), 12);
    }
}
