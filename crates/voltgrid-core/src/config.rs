//! Session configuration and validation.
//!
//! The host (menu screen, mission loader) fills a [`SessionConfig`] and
//! validates it before creating a session, independent of any UI
//! framework.

use serde::{Deserialize, Serialize};

/// Largest allowed board edge. Boards stay small enough that a full graph
/// rebuild on every edit is instant.
pub const MAX_BOARD_EDGE: u32 = 512;

/// Logic tick rate bounds, in ticks per second.
pub const MIN_TICK_HZ: f32 = 1.0;
pub const MAX_TICK_HZ: f32 = 240.0;

/// Host-editable session parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Board width in solder points.
    pub board_width: u32,
    /// Board height in solder points.
    pub board_height: u32,
    /// Logic ticks per second. Frame updates run at the render rate,
    /// independent of this.
    pub tick_hz: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            board_width: 64,
            board_height: 48,
            tick_hz: 30.0,
        }
    }
}

/// A configuration validation error.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Zero-area board.
    BoardEmpty,
    /// Board exceeds [`MAX_BOARD_EDGE`] on some edge.
    BoardTooLarge { width: u32, height: u32 },
    /// Tick rate outside `MIN_TICK_HZ..=MAX_TICK_HZ`.
    TickRateOutOfRange(f32),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::BoardEmpty => write!(f, "board must have a nonzero area"),
            ConfigError::BoardTooLarge { width, height } => write!(
                f,
                "board {}×{} exceeds the {}-point edge limit",
                width, height, MAX_BOARD_EDGE
            ),
            ConfigError::TickRateOutOfRange(hz) => write!(
                f,
                "tick rate {} outside {}..={} Hz",
                hz, MIN_TICK_HZ, MAX_TICK_HZ
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Validate a config, returning every problem found.
pub fn validate_config(config: &SessionConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();
    if config.board_width == 0 || config.board_height == 0 {
        errors.push(ConfigError::BoardEmpty);
    }
    if config.board_width > MAX_BOARD_EDGE || config.board_height > MAX_BOARD_EDGE {
        errors.push(ConfigError::BoardTooLarge {
            width: config.board_width,
            height: config.board_height,
        });
    }
    if !(MIN_TICK_HZ..=MAX_TICK_HZ).contains(&config.tick_hz) {
        errors.push(ConfigError::TickRateOutOfRange(config.tick_hz));
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&SessionConfig::default()).is_empty());
    }

    #[test]
    fn test_empty_board_rejected() {
        let config = SessionConfig {
            board_width: 0,
            ..Default::default()
        };
        assert_eq!(validate_config(&config), vec![ConfigError::BoardEmpty]);
    }

    #[test]
    fn test_oversized_board_rejected() {
        let config = SessionConfig {
            board_width: MAX_BOARD_EDGE + 1,
            ..Default::default()
        };
        assert!(matches!(
            validate_config(&config).as_slice(),
            [ConfigError::BoardTooLarge { .. }]
        ));
    }

    #[test]
    fn test_tick_rate_bounds() {
        let config = SessionConfig {
            tick_hz: 0.0,
            ..Default::default()
        };
        assert_eq!(
            validate_config(&config),
            vec![ConfigError::TickRateOutOfRange(0.0)]
        );
    }
}
