//! Per-inspector runtime settings and the force-expand signal.

use peek_core::TextFilter;

use crate::config::InspectorConfig;

/// Top-down signal to open or close every tree node.
///
/// Emitted for exactly one cycle when the filter switches between
/// active and inactive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ForceExpand {
    /// Leave nodes as the user left them.
    #[default]
    None,
    /// Force every node open.
    Open,
    /// Force every node closed.
    Close,
}

impl ForceExpand {
    /// The forced open state for a tree node, if any.
    pub fn as_force(self) -> Option<bool> {
        match self {
            Self::None => None,
            Self::Open => Some(true),
            Self::Close => Some(false),
        }
    }

    /// Signal for a filter that was `was_active` last cycle and is
    /// `is_active` now.
    pub fn from_transition(was_active: bool, is_active: bool) -> Self {
        match (was_active, is_active) {
            (false, true) => Self::Open,
            (true, false) => Self::Close,
            _ => Self::None,
        }
    }
}

/// Mutable settings of one inspector window.
#[derive(Clone, Debug, Default)]
pub struct Settings {
    /// Gate on every commit path.
    pub editable: bool,
    /// Integer formatting only.
    pub hex_display: bool,
    /// Current filter query.
    pub filter: TextFilter,
    /// Whether the filter was active on the previous cycle.
    pub filter_active_last_cycle: bool,
}

impl Settings {
    /// Settings seeded from a validated config.
    pub fn from_config(config: &InspectorConfig) -> Self {
        Self {
            editable: config.editable,
            hex_display: config.hex_display,
            filter: TextFilter::new(config.filter.as_str()),
            filter_active_last_cycle: false,
        }
    }

    /// Compute this cycle's force-expand signal and remember the
    /// filter state for the next one.
    pub fn advance_filter_state(&mut self) -> ForceExpand {
        let active = self.filter.is_active();
        let signal = ForceExpand::from_transition(self.filter_active_last_cycle, active);
        self.filter_active_last_cycle = active;
        signal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_fires_once() {
        let mut settings = Settings::default();
        assert_eq!(settings.advance_filter_state(), ForceExpand::None);

        settings.filter.set("hp");
        assert_eq!(settings.advance_filter_state(), ForceExpand::Open);
        assert_eq!(settings.advance_filter_state(), ForceExpand::None);

        settings.filter.set("");
        assert_eq!(settings.advance_filter_state(), ForceExpand::Close);
        assert_eq!(settings.advance_filter_state(), ForceExpand::None);
    }

    #[test]
    fn editing_the_query_is_not_a_transition() {
        let mut settings = Settings::default();
        settings.filter.set("a");
        settings.advance_filter_state();
        settings.filter.set("ab");
        assert_eq!(settings.advance_filter_state(), ForceExpand::None);
    }

    #[test]
    fn seeded_from_config() {
        let config = InspectorConfig {
            editable: true,
            filter: "x".into(),
            ..Default::default()
        };
        let settings = Settings::from_config(&config);
        assert!(settings.editable);
        assert!(settings.filter.is_active());
        assert!(!settings.filter_active_last_cycle);
    }
}
