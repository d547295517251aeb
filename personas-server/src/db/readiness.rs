//! Startup readiness probe
//!
//! Polls the pool until the database accepts connections. Constant
//! interval, no attempt ceiling: the server is useless without its
//! database, so the loop runs until it succeeds. Container orchestration
//! is expected to start MySQL "eventually"; everything before that is a
//! normal startup condition, not an error.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::MySqlPool;

/// Fixed delay between probe attempts.
pub const PROBE_INTERVAL: Duration = Duration::from_secs(5);

/// Where the probe gets its connections from.
///
/// The only implementation that matters in production is `MySqlPool`;
/// tests substitute sources that fail a scripted number of times.
#[async_trait]
pub trait ConnectionSource {
    /// Acquire a connection and immediately release it.
    async fn try_acquire(&self) -> Result<(), sqlx::Error>;
}

#[async_trait]
impl ConnectionSource for MySqlPool {
    async fn try_acquire(&self) -> Result<(), sqlx::Error> {
        // The PoolConnection returns to the pool on drop.
        self.acquire().await.map(drop)
    }
}

/// Probe lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeState {
    /// Still waiting for the first successful acquisition
    Probing,
    /// The database has accepted at least one connection
    Ready,
}

/// Readiness probe over an arbitrary connection source.
#[derive(Debug)]
pub struct ReadinessProbe<S> {
    source: S,
    interval: Duration,
    state: ProbeState,
}

impl<S: ConnectionSource> ReadinessProbe<S> {
    pub fn new(source: S) -> Self {
        Self::with_interval(source, PROBE_INTERVAL)
    }

    pub fn with_interval(source: S, interval: Duration) -> Self {
        Self {
            source,
            interval,
            state: ProbeState::Probing,
        }
    }

    pub fn state(&self) -> ProbeState {
        self.state
    }

    /// Run the probe loop until the source hands out a connection.
    ///
    /// Returns the number of failed attempts before success. There is no
    /// cancellation path by design.
    pub async fn wait_until_ready(&mut self) -> u64 {
        let mut failed_attempts: u64 = 0;

        loop {
            match self.source.try_acquire().await {
                Ok(()) => {
                    self.state = ProbeState::Ready;
                    tracing::info!(failed_attempts, "Database is ready");
                    return failed_attempts;
                }
                Err(err) => {
                    failed_attempts += 1;
                    tracing::warn!(
                        attempt = failed_attempts,
                        error = %err,
                        "Waiting for database..."
                    );
                    tokio::time::sleep(self.interval).await;
                }
            }
        }
    }
}

/// Block until the pool can hand out a connection.
pub async fn wait_for_database(pool: &MySqlPool) -> u64 {
    ReadinessProbe::new(pool.clone()).wait_until_ready().await
}
