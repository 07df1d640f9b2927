/// Configures the soft retry, per-attempt timeout and diagnostics bounds.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RequestOptions {
    /// Fixed delay before each retry, in milliseconds.
    pub retry_delay_ms: u64,
    /// Status codes that trigger a retry even when a body was returned.
    pub retry_on_statuses: Vec<u16>,
    /// Total attempts including the first. Values below 1 act as 1.
    pub max_attempts: usize,
    /// Per-attempt timeout in milliseconds. `0` disables the timeout.
    pub timeout_ms: u64,
    /// Maximum number of characters of raw body kept on failures.
    pub preview_chars: usize,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            retry_delay_ms: 800,
            retry_on_statuses: vec![502, 503, 504],
            max_attempts: 2,
            timeout_ms: 12_000,
            preview_chars: 500,
        }
    }
}

impl RequestOptions {
    /// Options that never retry.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub(crate) fn attempt_budget(&self) -> usize {
        self.max_attempts.max(1)
    }

    pub(crate) fn retries_on_status(&self, status: u16) -> bool {
        self.retry_on_statuses.contains(&status)
    }

    /// Builds options from the defaults overlaid with environment variables.
    ///
    /// Reads (all optional):
    /// - `EDGE_RETRY_DELAY_MS`
    /// - `EDGE_MAX_ATTEMPTS`
    /// - `EDGE_RETRY_STATUSES` — comma separated, e.g. `502,503,504`
    /// - `EDGE_TIMEOUT_MS`
    ///
    /// Returns an error naming the variable when a value does not parse.
    ///
    /// **Not available on `wasm32` targets.**
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> std::result::Result<Self, String> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn from_lookup<F>(lookup: F) -> std::result::Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        if let Some(raw) = lookup("EDGE_RETRY_DELAY_MS") {
            opts.retry_delay_ms = parse_var("EDGE_RETRY_DELAY_MS", &raw)?;
        }
        if let Some(raw) = lookup("EDGE_MAX_ATTEMPTS") {
            opts.max_attempts = parse_var("EDGE_MAX_ATTEMPTS", &raw)?;
        }
        if let Some(raw) = lookup("EDGE_TIMEOUT_MS") {
            opts.timeout_ms = parse_var("EDGE_TIMEOUT_MS", &raw)?;
        }
        if let Some(raw) = lookup("EDGE_RETRY_STATUSES") {
            opts.retry_on_statuses = raw
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(|part| parse_var("EDGE_RETRY_STATUSES", part))
                .collect::<std::result::Result<Vec<u16>, String>>()?;
        }

        Ok(opts)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_var<T: std::str::FromStr>(name: &str, raw: &str) -> std::result::Result<T, String>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|err| format!("invalid {name} value '{raw}': {err}"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::RequestOptions;

    #[test]
    fn defaults_allow_one_retry_on_gateway_statuses() {
        let opts = RequestOptions::default();
        assert_eq!(opts.max_attempts, 2);
        assert_eq!(opts.retry_on_statuses, vec![502, 503, 504]);
        assert_eq!(opts.retry_delay_ms, 800);
        assert!(opts.retries_on_status(504));
        assert!(!opts.retries_on_status(500));
    }

    #[test]
    fn zero_attempts_still_makes_one_call() {
        let opts = RequestOptions {
            max_attempts: 0,
            ..RequestOptions::default()
        };
        assert_eq!(opts.attempt_budget(), 1);
        assert_eq!(RequestOptions::no_retry().attempt_budget(), 1);
    }

    #[test]
    fn env_overrides_are_applied() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("EDGE_RETRY_DELAY_MS", "900"),
            ("EDGE_MAX_ATTEMPTS", "4"),
            ("EDGE_RETRY_STATUSES", "502, 504,"),
        ]);
        let opts = RequestOptions::from_lookup(|name| vars.get(name).map(|v| v.to_string()))
            .expect("env options must parse");

        assert_eq!(opts.retry_delay_ms, 900);
        assert_eq!(opts.max_attempts, 4);
        assert_eq!(opts.retry_on_statuses, vec![502, 504]);
        assert_eq!(opts.timeout_ms, RequestOptions::default().timeout_ms);
    }

    #[test]
    fn env_rejects_unparsable_values() {
        let err = RequestOptions::from_lookup(|name| {
            (name == "EDGE_MAX_ATTEMPTS").then(|| "two".to_owned())
        })
        .expect_err("must fail");
        assert!(err.contains("EDGE_MAX_ATTEMPTS"));
    }
}
