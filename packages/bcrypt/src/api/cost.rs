//! Cost presets with production-safe defaults

/// Bcrypt cost exponent; every step doubles the work
///
/// # Security Considerations
///
/// - For password storage use at least `Default` (2^12 rounds)
/// - `Minimum` and `Fast` exist for tests and development
/// - Re-evaluate the preset as hardware gets faster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashCost {
    /// 2^4 rounds, the smallest the format accepts
    ///
    /// Tests only
    Minimum = 4,

    /// 2^8 rounds
    ///
    /// Development only
    Fast = 8,

    /// 2^10 rounds
    ///
    /// Low-value passwords
    Moderate = 10,

    /// 2^12 rounds
    ///
    /// Suitable for most production use cases
    #[default]
    Default = 12,

    /// 2^14 rounds
    ///
    /// High-value passwords
    Strong = 14,

    /// 2^16 rounds
    ///
    /// Causes noticeable delays at login
    Maximum = 16,
}

impl HashCost {
    /// The cost exponent
    #[must_use]
    pub fn log_rounds(&self) -> u32 {
        match self {
            Self::Minimum => 4,
            Self::Fast => 8,
            Self::Moderate => 10,
            Self::Default => 12,
            Self::Strong => 14,
            Self::Maximum => 16,
        }
    }

    /// Expansion rounds, `2^log_rounds`
    #[must_use]
    pub fn rounds(&self) -> u32 {
        1 << self.log_rounds()
    }

    /// Check if this is suitable for password storage
    #[must_use]
    pub fn is_password_safe(&self) -> bool {
        self.log_rounds() >= 12
    }

    /// Get a description of the security level
    #[must_use]
    pub fn security_level(&self) -> &'static str {
        match self {
            Self::Minimum => "Tests only",
            Self::Fast => "Development only",
            Self::Moderate => "Low security",
            Self::Default => "Production ready",
            Self::Strong => "High security",
            Self::Maximum => "Maximum security",
        }
    }
}

impl From<HashCost> for u32 {
    fn from(cost: HashCost) -> Self {
        cost.log_rounds()
    }
}
