//! Time-slice accounting for cooperative dispatches

use std::time::Instant;

/// Percentage of a dispatch quantum that exhausts it
pub const FULL_SLICE_PERCENT: u32 = 100;

/// Scheduler side of a cooperative dispatch.
///
/// A job records timestamps around each burst of work, converts the elapsed
/// time into a percentage of the dispatch quantum and reports it through
/// [`Timeslice::consume`]. The return value tells the job whether to hand
/// control back now.
pub trait Timeslice {
    /// Timestamp source used to measure bursts
    fn now(&self) -> Instant;

    /// Report `percent` (1..=100) of the quantum used by the last burst.
    ///
    /// Returns `true` when the job should yield.
    fn consume(&mut self, percent: u32) -> bool;
}

/// Budget for a single dispatch window.
///
/// The window is exhausted once the reported percentages add up to
/// [`FULL_SLICE_PERCENT`].
#[derive(Debug, Clone, Default)]
pub struct DispatchBudget {
    consumed: u32,
}

impl DispatchBudget {
    /// Start a fresh dispatch window
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Percentage consumed so far in this window
    #[must_use]
    pub fn consumed(&self) -> u32 {
        self.consumed
    }

    /// Whether the window has been used up
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.consumed >= FULL_SLICE_PERCENT
    }
}

impl Timeslice for DispatchBudget {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn consume(&mut self, percent: u32) -> bool {
        self.consumed = self
            .consumed
            .saturating_add(percent.clamp(1, FULL_SLICE_PERCENT));
        self.is_exhausted()
    }
}

/// A timeslice that never asks the job to yield.
///
/// Used to run a job to completion on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbounded;

impl Unbounded {
    /// Create an unbounded timeslice
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Timeslice for Unbounded {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn consume(&mut self, _percent: u32) -> bool {
        false
    }
}
