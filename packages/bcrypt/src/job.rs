//! The hash request as a resumable state machine
//!
//! `Init` is [`BcryptJob::start`]: parsing, validation and the salted
//! expansion. The job then moves through `Expanding` and `Finalizing`, one
//! dispatch at a time, and completes with the hash (`Done`). Validation errors
//! can only surface from `start`; once expanding, the job is infallible.

use crate::cipher::{Blowfish, KeyExpansion};
use crate::config::BcryptConfig;
use crate::engine::{KeySchedule, Step, DEFAULT_MAX_PER_SLICE};
use crate::finalize::FinalizeInputs;
use crate::hash_result::BcryptHash;
use crate::params::HashSetting;
use crate::Result;
use async_task::{Resumable, Resume, Timeslice};
use tracing::debug;

/// A bcrypt hash request in flight
pub enum BcryptJob<C: KeyExpansion = Blowfish> {
    /// Running the round loop
    Expanding(KeySchedule<C>),
    /// Rounds done; the next dispatch encrypts the magic string
    Finalizing(FinalizeInputs<C>),
}

impl<C: KeyExpansion> BcryptJob<C> {
    /// Validate `setting` and start a job for `password`.
    ///
    /// `setting` may be a salt string or a full hash; only its identifier and
    /// first 22 salt symbols are used.
    ///
    /// # Errors
    ///
    /// Returns an invalid-argument class error for a malformed setting, or
    /// `BcryptError::AllocationFailure` if the key buffer cannot be reserved.
    pub fn start(password: &[u8], setting: &str) -> Result<Self> {
        Self::start_with_slice(password, setting, DEFAULT_MAX_PER_SLICE)
    }

    /// Like [`BcryptJob::start`], using the slice size from `config`
    ///
    /// # Errors
    ///
    /// Same as [`BcryptJob::start`].
    pub fn start_with_config(password: &[u8], setting: &str, config: &BcryptConfig) -> Result<Self> {
        Self::start_with_slice(password, setting, config.initial_max_per_slice)
    }

    /// Start a job from an already validated setting
    ///
    /// # Errors
    ///
    /// Returns `BcryptError::AllocationFailure` if the key buffer cannot be reserved.
    pub fn from_setting(
        password: &[u8],
        setting: HashSetting,
        initial_max_per_slice: u32,
    ) -> Result<Self> {
        KeySchedule::start(password, setting, initial_max_per_slice).map(Self::Expanding)
    }

    fn start_with_slice(password: &[u8], setting: &str, initial_max_per_slice: u32) -> Result<Self> {
        let setting = HashSetting::parse(setting).inspect_err(|e| {
            debug!(error = %e, "bcrypt setting rejected");
        })?;
        Self::from_setting(password, setting, initial_max_per_slice)
    }

    /// Whether the round loop has finished
    #[must_use]
    pub fn is_finalizing(&self) -> bool {
        matches!(self, Self::Finalizing(_))
    }
}

impl<C: KeyExpansion> Resumable for BcryptJob<C> {
    type Output = BcryptHash;

    fn resume<T: Timeslice>(self, slice: &mut T) -> Resume<Self, BcryptHash> {
        match self {
            Self::Expanding(schedule) => match schedule.step(slice) {
                Step::Continue(schedule) => Resume::Yield(Self::Expanding(schedule)),
                Step::Advance(inputs) => Resume::Yield(Self::Finalizing(inputs)),
            },
            Self::Finalizing(inputs) => Resume::Complete(inputs.finalize()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_task::{DispatchBudget, Unbounded};

    const SETTING: &str = "$2b$04$......................";

    #[test]
    fn finalizing_is_its_own_dispatch() {
        let job: BcryptJob = BcryptJob::start(b"abc", SETTING).expect("valid setting");
        let Resume::Yield(job) = job.resume(&mut Unbounded::new()) else {
            panic!("expansion hands over to finalization");
        };
        assert!(job.is_finalizing());
        let Resume::Complete(hash) = job.resume(&mut Unbounded::new()) else {
            panic!("finalization completes");
        };
        assert_eq!(
            hash.as_str(),
            "$2b$04$......................ini1L2hXWkegMV822DC6vks..mWmZHK"
        );
    }

    #[test]
    fn budgeted_and_unbounded_runs_agree() {
        let config = BcryptConfig {
            initial_max_per_slice: 1,
            ..BcryptConfig::default()
        };
        let mut job: BcryptJob =
            BcryptJob::start_with_config(b"U*U", "$2a$05$CCCCCCCCCCCCCCCCCCCCC.", &config)
                .expect("valid setting");
        let hash = loop {
            match job.resume(&mut DispatchBudget::new()) {
                Resume::Yield(next) => job = next,
                Resume::Complete(hash) => break hash,
            }
        };
        assert_eq!(
            hash.as_str(),
            "$2a$05$CCCCCCCCCCCCCCCCCCCCC.E5YPO9kmyuRGyh0XouQYb4YMJKvyOeW"
        );

        let again: BcryptJob =
            BcryptJob::start(b"U*U", "$2a$05$CCCCCCCCCCCCCCCCCCCCC.").expect("valid setting");
        assert_eq!(again.run_to_completion(), hash);
    }

    #[test]
    fn rejects_before_expanding() {
        let err = BcryptJob::<Blowfish>::start(b"abc", "$2b$03$......................")
            .err()
            .expect("cost 3 is rejected");
        assert!(err.is_invalid_argument());
    }
}
