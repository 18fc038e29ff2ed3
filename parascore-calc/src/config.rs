//! Calculation pool configuration
//!
//! Defines which model hosts the pool dispatches to and how many reports
//! each host may process at the same time.

use std::time::Duration;

/// Calculation pool configuration
///
/// The worker set is built once from this value: for every host in
/// `model_hosts`, in order, `workers_per_host` workers are created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculationConfig {
    /// Scoring endpoints of the model hosts (e.g., "http://model-1:8000/predict")
    pub model_hosts: Vec<String>,

    /// Number of workers, and so of concurrent reports, per host
    pub workers_per_host: usize,

    /// Optional cap on a single scoring request
    ///
    /// `None` waits for the host indefinitely. A hung host then holds its
    /// worker until the process restarts.
    pub request_timeout: Option<Duration>,
}

impl CalculationConfig {
    /// Creates a configuration with one worker per host and no timeout
    pub fn new(model_hosts: Vec<String>) -> Self {
        Self {
            model_hosts,
            workers_per_host: 1,
            request_timeout: None,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - MODEL_HOSTS (required, comma-separated URLs)
    /// - WORKERS_BY_MODEL (optional, default: 1)
    /// - MODEL_REQUEST_TIMEOUT (optional, seconds, default: no timeout)
    pub fn from_env() -> anyhow::Result<Self> {
        let hosts = std::env::var("MODEL_HOSTS")
            .map_err(|_| anyhow::anyhow!("MODEL_HOSTS environment variable not set"))?;

        let workers_per_host = match std::env::var("WORKERS_BY_MODEL") {
            Ok(value) => value
                .parse::<usize>()
                .map_err(|_| anyhow::anyhow!("WORKERS_BY_MODEL must be a number, got {:?}", value))?,
            Err(_) => 1,
        };

        let request_timeout = match std::env::var("MODEL_REQUEST_TIMEOUT") {
            Ok(value) => Some(parse_timeout(&value)?),
            Err(_) => None,
        };

        Ok(Self {
            model_hosts: parse_hosts(&hosts),
            workers_per_host,
            request_timeout,
        })
    }

    /// Sets the number of workers per host
    pub fn with_workers_per_host(mut self, workers_per_host: usize) -> Self {
        self.workers_per_host = workers_per_host;
        self
    }

    /// Sets a timeout on every scoring request
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Total number of workers the pool will own
    pub fn total_workers(&self) -> usize {
        self.model_hosts.len() * self.workers_per_host
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.model_hosts.is_empty() {
            anyhow::bail!("at least one model host is required");
        }

        for host in &self.model_hosts {
            if !host.starts_with("http://") && !host.starts_with("https://") {
                anyhow::bail!("model host {:?} must start with http:// or https://", host);
            }
        }

        if self.workers_per_host == 0 {
            anyhow::bail!("workers_per_host must be greater than 0");
        }

        if self.request_timeout == Some(Duration::ZERO) {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        Ok(())
    }
}

/// Parses a timeout given in whole seconds
fn parse_timeout(value: &str) -> anyhow::Result<Duration> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| {
            anyhow::anyhow!(
                "MODEL_REQUEST_TIMEOUT must be a number of seconds, got {:?}",
                value
            )
        })
}

fn parse_hosts(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|host| !host.is_empty())
        .map(String::from)
        .collect()
}
