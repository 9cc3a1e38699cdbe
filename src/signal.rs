//! Ternary signal model.
//!
//! A [`Level`] is one of UNDEFINED, LOW or HIGH. The ordering
//! `Undefined < Low < High` is what node resolution uses to merge drivers.
//! A [`Signal`] wraps a level and may be locked to model a fixed power rail.

use std::fmt;
use std::str::FromStr;

use crate::error::{IcError, Result};

/// Logic level carried by a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Level {
    /// No voltage (floating or not yet resolved)
    #[default]
    Undefined,
    /// Low voltage
    Low,
    /// High voltage
    High,
}

impl Level {
    /// Numeric value: -1, 0 or 1.
    pub fn value(self) -> i8 {
        match self {
            Level::Undefined => -1,
            Level::Low => 0,
            Level::High => 1,
        }
    }

    /// Whether this level is LOW or HIGH.
    pub fn is_defined(self) -> bool {
        self != Level::Undefined
    }
}

impl From<bool> for Level {
    fn from(bit: bool) -> Self {
        if bit {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl TryFrom<i32> for Level {
    type Error = IcError;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            -1 => Ok(Level::Undefined),
            0 => Ok(Level::Low),
            1 => Ok(Level::High),
            other => Err(IcError::invalid_signal(other)),
        }
    }
}

impl FromStr for Level {
    type Err = IcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "high" | "h" => Ok(Level::High),
            "0" | "low" | "l" => Ok(Level::Low),
            "-1" | "x" | "undefined" => Ok(Level::Undefined),
            _ => Err(IcError::invalid_signal(s)),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Undefined => write!(f, "-"),
            Level::Low => write!(f, "0"),
            Level::High => write!(f, "1"),
        }
    }
}

/// Potential difference between two levels.
///
/// False if either side is undefined, otherwise true iff they differ.
pub fn potential_difference(a: Level, b: Level) -> bool {
    a.is_defined() && b.is_defined() && a != b
}

/// A signal slot: a level plus a lock flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Signal {
    level: Level,
    locked: bool,
}

/// The HIGH power rail.
pub const HIGH_RAIL: Signal = Signal::locked(Level::High);

/// The LOW power rail (ground).
pub const LOW_RAIL: Signal = Signal::locked(Level::Low);

impl Signal {
    /// Create a mutable signal.
    pub const fn new(level: Level) -> Self {
        Self {
            level,
            locked: false,
        }
    }

    /// Create a signal that can never change.
    pub const fn locked(level: Level) -> Self {
        Self {
            level,
            locked: true,
        }
    }

    /// Current level.
    pub fn level(&self) -> Level {
        self.level
    }

    /// Whether the signal is locked.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Lock the signal. Irreversible.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    /// Set a new level.
    pub fn set(&mut self, level: Level) -> Result<()> {
        if self.locked {
            return Err(IcError::LockedSignal);
        }
        self.level = level;
        Ok(())
    }

    /// Set a new level from its numeric value (-1, 0 or 1).
    pub fn set_value(&mut self, value: i32) -> Result<()> {
        let level = Level::try_from(value)?;
        self.set(level)
    }
}
