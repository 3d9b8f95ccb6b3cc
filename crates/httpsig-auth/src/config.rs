//! Verifier configuration.
//!
//! Configuration is driven by environment variables, with defaults that
//! accept every supported algorithm and a five-minute clock skew.

use chrono::TimeDelta;
use tracing::warn;

use crate::algorithm::Algorithm;

/// Default tolerance between a covered `date` header and the verifier clock.
pub const DEFAULT_CLOCK_SKEW_SECS: u64 = 300;

/// Policy applied while parsing a signed request.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VerifierConfig {
    /// Maximum distance in seconds between the covered `date` and now.
    pub clock_skew_secs: u64,
    /// Headers every signature must cover (lowercase).
    pub required_headers: Vec<String>,
    /// Algorithms to accept. Empty means every supported algorithm.
    pub allowed_algorithms: Vec<Algorithm>,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            clock_skew_secs: DEFAULT_CLOCK_SKEW_SECS,
            required_headers: Vec::new(),
            allowed_algorithms: Vec::new(),
        }
    }
}

impl VerifierConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Format |
    /// |---|---|
    /// | `HTTPSIG_CLOCK_SKEW` | seconds |
    /// | `HTTPSIG_REQUIRED_HEADERS` | header names, comma or space separated |
    /// | `HTTPSIG_ALGORITHMS` | comma-separated algorithm names |
    ///
    /// Unparsable values are logged and the default is kept.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("HTTPSIG_CLOCK_SKEW") {
            match v.trim().parse() {
                Ok(secs) => config.clock_skew_secs = secs,
                Err(_) => warn!(value = %v, "Ignoring invalid HTTPSIG_CLOCK_SKEW"),
            }
        }
        if let Some(v) = lookup("HTTPSIG_REQUIRED_HEADERS") {
            config.required_headers = split_list(&v)
                .map(str::to_ascii_lowercase)
                .collect();
        }
        if let Some(v) = lookup("HTTPSIG_ALGORITHMS") {
            let parsed = split_list(&v)
                .map(str::parse)
                .collect::<Result<Vec<Algorithm>, _>>();
            match parsed {
                Ok(algorithms) => config.allowed_algorithms = algorithms,
                Err(e) => warn!(value = %v, error = %e, "Ignoring invalid HTTPSIG_ALGORITHMS"),
            }
        }

        config
    }

    /// Clock skew as a [`TimeDelta`].
    #[must_use]
    pub fn clock_skew(&self) -> TimeDelta {
        i64::try_from(self.clock_skew_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX)
    }

    /// Whether `algorithm` passes the allow-list.
    #[must_use]
    pub fn is_algorithm_allowed(&self, algorithm: Algorithm) -> bool {
        self.allowed_algorithms.is_empty() || self.allowed_algorithms.contains(&algorithm)
    }
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(|c: char| c == ',' || c.is_ascii_whitespace())
        .filter(|s| !s.is_empty())
}
