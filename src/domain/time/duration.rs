//! Duration value object

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use crate::domain::error::DurationParseError;

/// How long a posted notification waits for a click or dismiss (7 seconds)
pub const DEFAULT_GRACE_PERIOD_SECS: u64 = 7;

/// Value object for grace periods and send delays.
/// Always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration {
    milliseconds: u64,
}

impl Duration {
    pub const fn from_millis(ms: u64) -> Self {
        Self { milliseconds: ms }
    }

    pub const fn from_secs(secs: u64) -> Self {
        Self {
            milliseconds: secs * 1000,
        }
    }

    /// Grace period used when nothing is configured
    pub const fn default_grace_period() -> Self {
        Self::from_secs(DEFAULT_GRACE_PERIOD_SECS)
    }

    pub const fn as_secs(&self) -> u64 {
        self.milliseconds / 1000
    }

    pub const fn as_std(&self) -> StdDuration {
        StdDuration::from_millis(self.milliseconds)
    }

    /// Convert for date arithmetic, saturating on absurdly long spans
    pub fn as_chrono(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(i64::try_from(self.milliseconds).unwrap_or(i64::MAX))
    }
}

impl FromStr for Duration {
    type Err = DurationParseError;

    /// Parse strings like "7s", "1m", "2m30s", "1h", "1h15m".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_lowercase();
        let err = || DurationParseError { input: s.to_string() };

        let mut total_secs: u64 = 0;
        let mut current_num = String::new();
        // Units must appear in descending order, each at most once
        let mut last_unit_rank = u8::MAX;

        for ch in input.chars() {
            if ch.is_ascii_digit() {
                current_num.push(ch);
                continue;
            }

            let (rank, factor) = match ch {
                'h' => (2, 3600),
                'm' => (1, 60),
                's' => (0, 1),
                _ => return Err(err()),
            };

            if current_num.is_empty() || rank >= last_unit_rank {
                return Err(err());
            }

            let value: u64 = current_num.parse().map_err(|_| err())?;
            total_secs = value
                .checked_mul(factor)
                .and_then(|v| total_secs.checked_add(v))
                .ok_or_else(err)?;
            current_num.clear();
            last_unit_rank = rank;
        }

        if !current_num.is_empty() || last_unit_rank == u8::MAX || total_secs == 0 {
            return Err(err());
        }

        let milliseconds = total_secs.checked_mul(1000).ok_or_else(err)?;
        Ok(Self { milliseconds })
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_secs = self.as_secs();
        let hours = total_secs / 3600;
        let minutes = (total_secs % 3600) / 60;
        let seconds = total_secs % 60;

        if hours > 0 {
            write!(f, "{}h", hours)?;
        }
        if minutes > 0 {
            write!(f, "{}m", minutes)?;
        }
        if seconds > 0 || total_secs == 0 {
            write!(f, "{}s", seconds)?;
        }
        Ok(())
    }
}

impl Default for Duration {
    fn default() -> Self {
        Self::default_grace_period()
    }
}
