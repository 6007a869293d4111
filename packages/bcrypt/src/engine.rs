//! Adaptive, interruptible key schedule
//!
//! The expensive part of bcrypt is the loop
//!
//! ```text
//! repeat 2^log_rounds times:
//!     state := Expand(state, key)
//!     state := Expand(state, salt)
//! ```
//!
//! which can run for far longer than a cooperative scheduler should be
//! blocked. [`KeySchedule::step`] runs it in bursts of at most
//! `max_per_slice` rounds, timing each burst against a 1000 µs quantum and
//! asking the [`Timeslice`] whether to yield. When it yields, `max_per_slice`
//! is re-tuned from the work done in this dispatch so the next dispatch lands
//! close to one quantum. Slicing never changes the result: rounds run strictly
//! in order on state owned by this value alone.

use crate::cipher::{Blowfish, KeyExpansion};
use crate::erase::SecretBytes;
use crate::finalize::FinalizeInputs;
use crate::params::{HashParameters, HashSetting};
use crate::salt::Salt;
use crate::Result;
use async_task::Timeslice;
use std::time::Duration;
use tracing::{debug, trace};

/// Length of one scheduling quantum in microseconds
pub const QUANTUM_MICROS: u128 = 1_000;

/// Rounds attempted by the first burst of a new key schedule
pub const DEFAULT_MAX_PER_SLICE: u32 = 25;

/// Result of one dispatch of the key schedule
pub enum Step<C: KeyExpansion = Blowfish> {
    /// Rounds remain; dispatch this state again later
    Continue(KeySchedule<C>),
    /// All rounds are done; the inputs for the final encryption
    Advance(FinalizeInputs<C>),
}

/// Key schedule suspended between dispatches.
///
/// Owns the cipher state, salt and key exclusively. Dropping it abandons the
/// computation and zeroes all three.
pub struct KeySchedule<C: KeyExpansion = Blowfish> {
    state: Box<C>,
    salt: Box<Salt>,
    key: SecretBytes,
    params: HashParameters,
    max_per_slice: u32,
    current_index: u32,
}

impl<C: KeyExpansion> KeySchedule<C> {
    /// Build the key and run the salted expansion. No rounds are run yet.
    ///
    /// # Errors
    ///
    /// Returns `BcryptError::AllocationFailure` if the key buffer cannot be
    /// reserved; the cipher state is not created in that case.
    pub fn start(password: &[u8], setting: HashSetting, initial_max_per_slice: u32) -> Result<Self> {
        let HashSetting { params, salt } = setting;
        let key = params.key_bytes(password)?;

        let mut state = Box::new(C::init_state());
        state.expand_with_salt(salt.as_bytes(), &key);

        debug!(
            minor = %params.minor(),
            log_rounds = params.log_rounds(),
            "bcrypt key schedule started"
        );

        Ok(Self {
            state,
            salt,
            key,
            params,
            max_per_slice: initial_max_per_slice.max(1),
            current_index: 0,
        })
    }

    /// Parameters this schedule runs under
    #[must_use]
    pub fn params(&self) -> HashParameters {
        self.params
    }

    /// Rounds completed so far
    #[must_use]
    pub fn current_index(&self) -> u32 {
        self.current_index
    }

    /// Total rounds to run
    #[must_use]
    pub fn rounds(&self) -> u32 {
        self.params.rounds()
    }

    /// Burst size the next dispatch starts with
    #[must_use]
    pub fn max_per_slice(&self) -> u32 {
        self.max_per_slice
    }

    /// Run one dispatch.
    ///
    /// Bursts of `max_per_slice` rounds are timed and reported to `slice`
    /// until either all rounds are done or `slice` asks for a yield.
    pub fn step<T: Timeslice>(mut self, slice: &mut T) -> Step<C> {
        let rounds = self.rounds();
        let dispatch_start = self.current_index;
        let mut total_percent = 0u64;
        let mut end = self.slice_end(self.current_index);

        loop {
            let started = slice.now();
            self.advance_to(end);
            if self.current_index == rounds {
                debug!(rounds, "bcrypt key schedule complete");
                return Step::Advance(self.into_finalize());
            }
            let elapsed = slice.now().saturating_duration_since(started);

            let percent = calc_percent(&mut total_percent, elapsed);
            if slice.consume(percent) {
                self.max_per_slice =
                    adjust_max_per_slice(total_percent, self.current_index - dispatch_start);
                trace!(
                    current_index = self.current_index,
                    rounds,
                    max_per_slice = self.max_per_slice,
                    total_percent,
                    "bcrypt key schedule suspended"
                );
                return Step::Continue(self);
            }

            end = self.slice_end(end);
        }
    }

    fn slice_end(&self, from: u32) -> u32 {
        from.saturating_add(self.max_per_slice).min(self.rounds())
    }

    /// Run rounds until `current_index` reaches `end` (capped at `rounds`)
    pub(crate) fn advance_to(&mut self, end: u32) {
        let end = end.min(self.rounds());
        while self.current_index < end {
            self.state.expand(&self.key);
            self.state.expand(self.salt.as_bytes());
            self.current_index += 1;
        }
    }

    pub(crate) fn into_finalize(self) -> FinalizeInputs<C> {
        let Self {
            state, salt, params, ..
        } = self;
        FinalizeInputs::new(state, salt, params)
    }
}

/// Convert a burst's duration into a percentage of the quantum.
///
/// The raw percentage is added to `total`; the returned value is clamped to
/// 1..=100 for reporting to the scheduler.
#[must_use]
pub fn calc_percent(total: &mut u64, elapsed: Duration) -> u32 {
    let percent = u64::try_from(elapsed.as_micros() * 100 / QUANTUM_MICROS).unwrap_or(u64::MAX);
    *total = total.saturating_add(percent);
    u32::try_from(percent.clamp(1, 100)).unwrap_or(100)
}

/// Burst size for the next dispatch, given the percentage of the quantum
/// used in this dispatch and the rounds it completed.
///
/// With `m = total_percent / 100`: under one quantum keep `completed`; between
/// one and two quanta shrink `completed` by the overshoot; beyond that divide
/// by `m`. The result never drops below 1.
#[must_use]
pub fn adjust_max_per_slice(total_percent: u64, completed: u32) -> u32 {
    let completed = u64::from(completed);
    let next = match total_percent / 100 {
        0 => completed,
        1 => completed - completed * (total_percent - 100) / 100,
        m => completed / m,
    };
    u32::try_from(next).unwrap_or(u32::MAX).max(1)
}
