//! Launch modes.
//!
//! A [`LaunchMode`] is a core mode (standard, single-top, single-instance)
//! optionally combined with the [`LaunchMode::CLEAR_TOP`] flag:
//!
//! ```
//! use actstack_core::{CoreMode, LaunchMode};
//!
//! let mode = LaunchMode::SINGLE_INSTANCE | LaunchMode::CLEAR_TOP;
//! assert_eq!(mode.core(), CoreMode::SingleInstance);
//! assert!(mode.clear_top());
//! ```

use std::{fmt, ops::BitOr};

/// Launch policy bitmask.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct LaunchMode(u32);

impl LaunchMode {
    /// Always create a new frame.
    pub const STANDARD: Self = Self(1);
    /// Reuse the top frame if it has the same kind. Without a dedicated top
    /// check this resolves like [`Self::STANDARD`].
    pub const SINGLE_TOP: Self = Self(2);
    /// Reuse any live frame of the same kind, moving it to the top.
    pub const SINGLE_INSTANCE: Self = Self(3);
    /// Bits holding the core mode.
    pub const MODE_MASK: u32 = 1023;
    /// Finish every frame above a reused frame instead of moving it.
    pub const CLEAR_TOP: Self = Self(1024);

    /// Build from raw bits.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw bits.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Core mode with flags masked off. Unknown values resolve to
    /// [`CoreMode::Standard`].
    pub fn core(self) -> CoreMode {
        match self.0 & Self::MODE_MASK {
            2 => CoreMode::SingleTop,
            3 => CoreMode::SingleInstance,
            _ => CoreMode::Standard,
        }
    }

    /// Whether [`Self::CLEAR_TOP`] is set.
    pub fn clear_top(self) -> bool {
        self.0 & Self::CLEAR_TOP.0 != 0
    }
}

impl Default for LaunchMode {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl BitOr for LaunchMode {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Debug for LaunchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.core())?;
        if self.clear_top() {
            f.write_str("|ClearTop")?;
        }
        Ok(())
    }
}

/// Core launch mode, the masked part of a [`LaunchMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoreMode {
    /// Create a new frame.
    Standard,
    /// Single-top.
    SingleTop,
    /// Reuse an existing frame of the same kind.
    SingleInstance,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_values() {
        assert_eq!(LaunchMode::STANDARD.bits(), 1);
        assert_eq!(LaunchMode::SINGLE_TOP.bits(), 2);
        assert_eq!(LaunchMode::SINGLE_INSTANCE.bits(), 3);
        assert_eq!(LaunchMode::CLEAR_TOP.bits(), 1024);
    }

    #[test]
    fn clear_top_does_not_change_core() {
        let mode = LaunchMode::SINGLE_INSTANCE | LaunchMode::CLEAR_TOP;
        assert_eq!(mode.core(), CoreMode::SingleInstance);
        assert!(mode.clear_top());
        assert!(!LaunchMode::SINGLE_INSTANCE.clear_top());
    }

    #[test]
    fn unknown_core_is_standard() {
        assert_eq!(LaunchMode::from_bits(0).core(), CoreMode::Standard);
        assert_eq!(LaunchMode::from_bits(77).core(), CoreMode::Standard);
        assert_eq!(LaunchMode::CLEAR_TOP.core(), CoreMode::Standard);
    }

    #[test]
    fn debug_shows_flag() {
        let mode = LaunchMode::SINGLE_TOP | LaunchMode::CLEAR_TOP;
        assert_eq!(format!("{mode:?}"), "SingleTop|ClearTop");
        assert_eq!(format!("{:?}", LaunchMode::default()), "Standard");
    }
}
