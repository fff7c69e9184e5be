//! Difficulty and time estimates for a base64 prefix search.

/// Number of symbols in the standard base64 alphabet.
pub const ALPHABET_SIZE: u32 = 64;

/// Smallest rate used when projecting time, so a stalled pool never divides by zero.
pub const MIN_ATTEMPTS_PER_SECOND: f64 = 1e-9;

/// Errors raised while validating a prefix.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error(
        "Prefix must contain only BASE64 characters: A-Z a-z 0-9 + / (found {ch:?} at position {position})"
    )]
    InvalidCharacter { ch: char, position: usize },

    #[error("Prefix cannot be empty")]
    EmptyPrefix,

    #[error("Prefix cannot be longer than {max} characters (got {len})")]
    PrefixTooLong { len: usize, max: usize },
}

/// Expected work for a given prefix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub prefix_len: usize,
    /// `64^len`, saturated at `u128::MAX`.
    pub expected_attempts: u128,
    pub probability_per_attempt: f64,
}

/// Expected wall-clock time at a measured throughput.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeEstimate {
    pub expected_attempts: u128,
    /// The rate actually used, after clamping.
    pub attempts_per_second: f64,
    pub expected_seconds: f64,
}

/// Returns true if `c` belongs to the standard base64 alphabet (padding excluded).
#[inline]
pub fn is_base64_symbol(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '+' || c == '/'
}

/// Computes the expected number of attempts to hit `prefix`.
///
/// Every character must be a base64 symbol. The empty prefix is accepted and
/// matches every candidate.
pub fn estimate_vanity(prefix: &str) -> Result<Estimate, ValidationError> {
    if let Some((position, ch)) = prefix.chars().enumerate().find(|&(_, c)| !is_base64_symbol(c)) {
        return Err(ValidationError::InvalidCharacter { ch, position });
    }

    let prefix_len = prefix.len();
    let exponent = u32::try_from(prefix_len).unwrap_or(u32::MAX);
    let expected_attempts = u128::from(ALPHABET_SIZE).saturating_pow(exponent);

    Ok(Estimate {
        prefix_len,
        expected_attempts,
        probability_per_attempt: 1.0 / expected_attempts as f64,
    })
}

/// Projects how long a search for `prefix` takes at `attempts_per_second`.
///
/// Zero, negative or non-finite rates are clamped to [`MIN_ATTEMPTS_PER_SECOND`].
pub fn estimate_time(prefix: &str, attempts_per_second: f64) -> Result<TimeEstimate, ValidationError> {
    let estimate = estimate_vanity(prefix)?;
    Ok(estimate.time_at(attempts_per_second))
}

impl Estimate {
    /// Same as [`estimate_time`] without re-validating the prefix.
    pub fn time_at(&self, attempts_per_second: f64) -> TimeEstimate {
        let rate = if attempts_per_second.is_finite() {
            attempts_per_second.max(MIN_ATTEMPTS_PER_SECOND)
        } else {
            MIN_ATTEMPTS_PER_SECOND
        };

        TimeEstimate {
            expected_attempts: self.expected_attempts,
            attempts_per_second: rate,
            expected_seconds: self.expected_attempts as f64 / rate,
        }
    }

    /// Returns a human-readable difficulty class.
    pub fn difficulty_description(&self) -> &'static str {
        match self.expected_attempts {
            0..=1_000 => "Very Easy (< 1 second)",
            1_001..=1_000_000 => "Easy (seconds)",
            1_000_001..=100_000_000 => "Medium (minutes)",
            100_000_001..=100_000_000_000 => "Hard (hours)",
            _ => "Very Hard (days or more)",
        }
    }
}
