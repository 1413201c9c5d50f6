//! Self-expiring values
//!
//! Transient feedback (score flash, solution text, pulse) is held in an
//! [`Expiring`] slot. Setting a new value replaces the old one together with
//! its deadline, so expiries never stack and a stale clear can never hit a
//! newer value.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct Expiring<T> {
    lifetime: Duration,
    pending: Option<(T, Duration)>,
}

impl<T> Expiring<T> {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            lifetime,
            pending: None,
        }
    }

    /// Show `value` for a full lifetime, superseding anything pending
    pub fn set(&mut self, value: T) {
        self.pending = Some((value, self.lifetime));
    }

    pub fn get(&self) -> Option<&T> {
        self.pending.as_ref().map(|(value, _)| value)
    }

    /// Time left before the current value clears
    pub fn remaining(&self) -> Option<Duration> {
        self.pending.as_ref().map(|(_, remaining)| *remaining)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the value and its deadline
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Count down by `elapsed`, returning the value if it expired
    pub fn advance(&mut self, elapsed: Duration) -> Option<T> {
        let (_, remaining) = self.pending.as_mut()?;
        match remaining.checked_sub(elapsed) {
            Some(left) if !left.is_zero() => {
                *remaining = left;
                None
            }
            _ => self.pending.take().map(|(value, _)| value),
        }
    }
}
