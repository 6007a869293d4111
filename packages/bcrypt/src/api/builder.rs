//! Bcrypt builder following the cryypt builder pattern
//!
//! Usage: `Bcrypt::new().with_cost(HashCost::Strong).compute(password).await`

use crate::job::BcryptJob;
use crate::params::{clamp_log_rounds, HashParameters, HashSetting, Minor};
use crate::salt::Salt;
use crate::{AsyncBcryptResult, BcryptConfig, BcryptHash, Result};
use async_task::{AsyncExecutor, AsyncTask, AsyncTaskBuilder, Resumable};
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::debug;

/// Bcrypt hashing builder
#[derive(Debug, Clone, Default)]
pub struct Bcrypt {
    config: BcryptConfig,
    timeout: Option<Duration>,
}

impl Bcrypt {
    /// Create a builder with the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder from a loaded configuration
    #[must_use]
    pub fn from_config(config: BcryptConfig) -> Self {
        Self {
            config,
            timeout: None,
        }
    }

    /// Set the cost, as a [`HashCost`](super::HashCost) preset or a raw
    /// exponent; clamped to 4..=31 when hashing
    #[must_use]
    pub fn with_cost(mut self, cost: impl Into<u32>) -> Self {
        self.config.cost = cost.into();
        self
    }

    /// Set the minor version of new hashes
    #[must_use]
    pub fn with_minor(mut self, minor: Minor) -> Self {
        self.config.minor = minor;
        self
    }

    /// Set how many rounds the first burst attempts
    #[must_use]
    pub fn with_initial_slice(mut self, rounds: u32) -> Self {
        self.config.initial_max_per_slice = rounds;
        self
    }

    /// Abandon async hashing that runs longer than `duration`
    #[must_use]
    pub fn with_timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Current configuration
    #[must_use]
    pub fn config(&self) -> &BcryptConfig {
        &self.config
    }

    fn job_for_salt(&self, password: &[u8], salt: Box<Salt>) -> Result<BcryptJob> {
        let params = HashParameters::new(self.config.minor, clamp_log_rounds(self.config.cost))?;
        BcryptJob::from_setting(
            password,
            HashSetting { params, salt },
            self.config.initial_max_per_slice,
        )
    }

    /// Hash on the calling thread under a fresh random salt
    ///
    /// # Errors
    ///
    /// Returns `BcryptError::AllocationFailure` if the key buffer cannot be reserved.
    pub fn hash(&self, password: impl AsRef<[u8]>) -> Result<BcryptHash> {
        Ok(self
            .job_for_salt(password.as_ref(), Salt::random_boxed())?
            .run_to_completion())
    }

    /// Hash on the calling thread under `salt`
    ///
    /// # Errors
    ///
    /// Returns `BcryptError::AllocationFailure` if the key buffer cannot be reserved.
    pub fn hash_with_salt(&self, password: impl AsRef<[u8]>, salt: Salt) -> Result<BcryptHash> {
        Ok(self
            .job_for_salt(password.as_ref(), Box::new(salt))?
            .run_to_completion())
    }

    /// Hash cooperatively on the tokio runtime under a fresh random salt
    ///
    /// The key schedule runs in short self-tuning bursts with a yield to the
    /// runtime between them. Must be called from within a tokio runtime.
    #[must_use]
    pub fn compute(&self, password: impl AsRef<[u8]>) -> AsyncBcryptResult {
        self.compute_boxed(password.as_ref(), Salt::random_boxed())
    }

    /// Hash cooperatively on the tokio runtime under `salt`
    #[must_use]
    pub fn compute_with_salt(&self, password: impl AsRef<[u8]>, salt: Salt) -> AsyncBcryptResult {
        self.compute_boxed(password.as_ref(), Box::new(salt))
    }

    fn compute_boxed(&self, password: &[u8], salt: Box<Salt>) -> AsyncBcryptResult {
        match self.job_for_salt(password, salt) {
            Ok(job) => self.spawn(job, Ok),
            Err(e) => AsyncBcryptResult::error(e),
        }
    }

    /// Check `password` against a stored hash cooperatively on the tokio runtime
    ///
    /// Resolves to an invalid-argument class error if `hash` is malformed.
    #[must_use]
    pub fn verify(&self, password: impl AsRef<[u8]>, hash: &str) -> AsyncBcryptResult<bool> {
        let stored = match BcryptHash::parse(hash) {
            Ok(stored) => stored,
            Err(e) => return AsyncBcryptResult::error(e),
        };
        let job = match BcryptJob::start_with_config(
            password.as_ref(),
            stored.setting(),
            &self.config,
        ) {
            Ok(job) => job,
            Err(e) => return AsyncBcryptResult::error(e),
        };
        self.spawn(job, move |computed| {
            let matches = computed.ct_matches(stored.as_str());
            debug!(matches, log_rounds = stored.log_rounds(), "bcrypt verify");
            Ok(matches)
        })
    }

    /// Hash under a fresh random salt on a shared executor, which bounds how
    /// many hashes run at once
    ///
    /// # Errors
    ///
    /// Returns `BcryptError::Task` if the executor is closed or its task
    /// timeout elapses.
    pub async fn compute_on(
        &self,
        executor: &AsyncExecutor,
        password: impl AsRef<[u8]>,
    ) -> Result<BcryptHash> {
        let job = self.job_for_salt(password.as_ref(), Salt::random_boxed())?;
        Ok(executor.execute_task(AsyncTask::new(job)).await?)
    }

    fn spawn<T, F>(&self, job: BcryptJob, finish: F) -> AsyncBcryptResult<T>
    where
        T: Send + 'static,
        F: FnOnce(BcryptHash) -> Result<T> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let mut runner = AsyncTaskBuilder::new();
        if let Some(duration) = self.timeout {
            runner = runner.with_timeout(duration);
        }

        tokio::spawn(async move {
            let result = match runner.run(job).await {
                Ok(hash) => finish(hash),
                Err(e) => Err(e.into()),
            };
            let _ = tx.send(result);
        });

        AsyncBcryptResult::new(rx)
    }
}
