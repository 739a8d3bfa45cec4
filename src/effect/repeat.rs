/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/

//! Repeat policy for effects.

use serde::{Deserialize, Serialize};

/// How many times an armed effect fires before it stops.
///
/// The integer form used by [`Repeat::from_count`] follows the classic
/// convention: negative means forever, `0` and `1` mean a single shot, and
/// `n > 1` means exactly `n` shots.
///
/// # Examples
///
/// ```
/// use effect_sequencer::Repeat;
///
/// assert_eq!(Repeat::from_count(-1), Repeat::Forever);
/// assert_eq!(Repeat::from_count(0), Repeat::Once);
/// assert_eq!(Repeat::from_count(3), Repeat::Times(3));
///
/// let mut repeat = Repeat::Times(3);
/// assert!(repeat.advance());
/// assert!(repeat.advance());
/// assert!(!repeat.advance());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Repeat {
    /// Fire once, then stop.
    #[default]
    Once,
    /// Fire this many times, then stop. `Times(0)` and `Times(1)` act as [`Repeat::Once`].
    Times(u32),
    /// Fire until explicitly stopped.
    Forever,
}

impl Repeat {
    /// Converts a signed repeat count.
    #[must_use]
    pub fn from_count(count: i32) -> Self {
        match count {
            c if c < 0 => Repeat::Forever,
            0 | 1 => Repeat::Once,
            c => Repeat::Times(c.unsigned_abs()),
        }
    }

    /// Records one shot and reports whether the effect should re-arm.
    pub fn advance(&mut self) -> bool {
        match *self {
            Repeat::Forever => true,
            Repeat::Times(n) if n > 1 => {
                *self = Repeat::Times(n - 1);
                true
            }
            Repeat::Times(_) | Repeat::Once => false,
        }
    }

    /// Shots left including the next one, or `None` when unbounded.
    #[must_use]
    pub fn remaining(&self) -> Option<u32> {
        match *self {
            Repeat::Forever => None,
            Repeat::Once => Some(1),
            Repeat::Times(n) => Some(n.max(1)),
        }
    }
}

impl From<i32> for Repeat {
    fn from(count: i32) -> Self {
        Repeat::from_count(count)
    }
}
