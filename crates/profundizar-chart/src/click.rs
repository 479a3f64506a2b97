//! Single/double click arbitration for drill navigation.
//!
//! A hit while idle opens a decision window; further hits inside the window
//! only bump a counter — they neither reset the deadline nor replace the
//! remembered cell. When the deadline passes, one click means drill down and
//! two or more mean drill up. Exactly one window is live per chart.

use crate::flatten::CellId;
use std::time::{Duration, Instant};

/// Configuration for click arbitration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickConfig {
    /// How long after the first hit the single/double decision falls.
    pub window: Duration,
}

impl Default for ClickConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_millis(300),
        }
    }
}

/// Direction of a resolved drill request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillDirection {
    /// Into the hit cell's subtree.
    Down,
    /// Back toward the tree's top.
    Up,
}

/// A resolved navigation request against a captured cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrillIntent {
    /// Down for a single click, Up for a double click.
    pub direction: DrillDirection,
    /// The cell remembered from the first hit of the window.
    pub cell: CellId,
    /// Grid generation captured at the first hit. Consumers drop the
    /// intent when the grid has been rebuilt since.
    pub generation: u64,
}

#[derive(Debug, Clone, Copy)]
enum State {
    Idle,
    Pending {
        cell: CellId,
        generation: u64,
        deadline: Instant,
        clicks: u32,
    },
}

/// Timer-driven state machine distinguishing single from double clicks.
///
/// The host drives time explicitly: feed hits through
/// [`press`](Self::press) and call [`poll`](Self::poll) periodically (for
/// example from a frame timer) to resolve expired windows.
#[derive(Debug)]
pub struct ClickArbiter {
    config: ClickConfig,
    state: State,
}

impl ClickArbiter {
    /// Create an arbiter with the default 300 ms window.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ClickConfig::default())
    }

    /// Create an arbiter with a custom configuration.
    #[must_use]
    pub const fn with_config(config: ClickConfig) -> Self {
        Self {
            config,
            state: State::Idle,
        }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &ClickConfig {
        &self.config
    }

    /// Register a pointer hit on a cell at time `now`.
    pub fn press(&mut self, cell: CellId, generation: u64, now: Instant) {
        match &mut self.state {
            State::Idle => {
                self.state = State::Pending {
                    cell,
                    generation,
                    deadline: now + self.config.window,
                    clicks: 1,
                };
            }
            // Any further hit counts, regardless of which cell it landed on.
            State::Pending { clicks, .. } => *clicks = clicks.saturating_add(1),
        }
    }

    /// Resolve the window if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<DrillIntent> {
        if let State::Pending {
            cell,
            generation,
            deadline,
            clicks,
        } = self.state
        {
            if now >= deadline {
                self.state = State::Idle;
                let direction = if clicks >= 2 {
                    DrillDirection::Up
                } else {
                    DrillDirection::Down
                };
                return Some(DrillIntent {
                    direction,
                    cell,
                    generation,
                });
            }
        }
        None
    }

    /// Discard any pending window.
    pub fn cancel(&mut self) {
        self.state = State::Idle;
    }

    /// Whether a decision window is currently open.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.state, State::Pending { .. })
    }
}

impl Default for ClickArbiter {
    fn default() -> Self {
        Self::new()
    }
}
