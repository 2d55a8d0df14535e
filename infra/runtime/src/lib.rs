//! # Runtime
//!
//! Named [Tokio](https://tokio.rs) runtime profiles for the folio binaries.
//!
//! * **server**: multi-threaded, one worker per core (or `FOLIO_WORKER_THREADS`), larger stacks.
//! * **cli**: current-thread scheduler for short-lived commands.
//!
//! ```rust,ignore
//! #[folio_runtime::main(server)]
//! async fn main() -> anyhow::Result<()> {
//!     Ok(())
//! }
//! ```

pub use anyhow::Result;
pub use folio_derive::main;

use anyhow::Context;
use std::thread::available_parallelism;
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

/// Environment variable overriding the worker count of multi-threaded profiles.
pub const WORKER_THREADS_ENV: &str = "FOLIO_WORKER_THREADS";

const FALLBACK_WORKERS: usize = 4;
const MAX_WORKERS: usize = 512;
const MIN_STACK_SIZE: usize = 1024 * 1024;
const MAX_STACK_SIZE: usize = 16 * 1024 * 1024;

/// Scheduler flavor of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheduler {
    CurrentThread,
    MultiThread { workers: usize },
}

/// A complete description of how to build a Tokio runtime.
#[derive(Debug, Clone)]
pub struct RuntimeProfile {
    pub scheduler: Scheduler,
    pub thread_name: String,
    pub stack_size: usize,
    pub keep_alive: Duration,
    pub event_interval: u32,
}

impl Default for RuntimeProfile {
    fn default() -> Self {
        Self {
            scheduler: Scheduler::MultiThread { workers: detect_workers() },
            thread_name: "folio-worker".to_owned(),
            stack_size: 2 * 1024 * 1024,
            keep_alive: Duration::from_secs(60),
            event_interval: 61,
        }
    }
}

impl RuntimeProfile {
    /// Profile for the HTTP server.
    #[must_use]
    pub fn server() -> Self {
        Self {
            thread_name: "folio-http".to_owned(),
            stack_size: 4 * 1024 * 1024,
            keep_alive: Duration::from_secs(300),
            ..Self::default()
        }
    }

    /// Profile for command line tools.
    #[must_use]
    pub fn cli() -> Self {
        Self {
            scheduler: Scheduler::CurrentThread,
            thread_name: "folio-cli".to_owned(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.scheduler = Scheduler::MultiThread { workers: workers.clamp(1, MAX_WORKERS) };
        self
    }

    #[must_use]
    pub fn with_stack_size(mut self, size: usize) -> Self {
        self.stack_size = size.clamp(MIN_STACK_SIZE, MAX_STACK_SIZE);
        self
    }

    #[must_use]
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.trim().is_empty() {
            self.thread_name = name;
        }
        self
    }
}

/// Builds a runtime from a profile with all drivers (I/O, time) enabled.
///
/// # Errors
/// Returns an error when the operating system refuses to create the runtime threads.
pub fn build_runtime(profile: &RuntimeProfile) -> Result<Runtime> {
    debug!(?profile, "Building tokio runtime");

    let mut builder = match profile.scheduler {
        Scheduler::CurrentThread => Builder::new_current_thread(),
        Scheduler::MultiThread { workers } => {
            let mut builder = Builder::new_multi_thread();
            builder.worker_threads(workers.clamp(1, MAX_WORKERS));
            builder
        },
    };

    builder
        .thread_name(&profile.thread_name)
        .thread_stack_size(profile.stack_size.clamp(MIN_STACK_SIZE, MAX_STACK_SIZE))
        .thread_keep_alive(profile.keep_alive)
        .event_interval(profile.event_interval)
        .enable_all()
        .build()
        .context("Failed to initialize tokio runtime")
}

fn detect_workers() -> usize {
    std::env::var(WORKER_THREADS_ENV)
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|&n| (1..=MAX_WORKERS).contains(&n))
        .unwrap_or_else(|| {
            available_parallelism().map(std::num::NonZero::get).unwrap_or(FALLBACK_WORKERS)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_clamping() {
        let profile = RuntimeProfile::default().with_workers(0);
        assert_eq!(profile.scheduler, Scheduler::MultiThread { workers: 1 });

        let profile = RuntimeProfile::default().with_workers(10_000);
        assert_eq!(profile.scheduler, Scheduler::MultiThread { workers: MAX_WORKERS });
    }

    #[test]
    fn test_stack_size_clamping() {
        assert_eq!(RuntimeProfile::default().with_stack_size(1).stack_size, MIN_STACK_SIZE);
        assert_eq!(RuntimeProfile::default().with_stack_size(usize::MAX).stack_size, MAX_STACK_SIZE);
    }

    #[test]
    fn test_blank_thread_name_is_ignored() {
        let profile = RuntimeProfile::server().with_thread_name("  ");
        assert_eq!(profile.thread_name, "folio-http");
    }

    #[test]
    fn test_cli_profile_runs_futures() {
        let runtime = build_runtime(&RuntimeProfile::cli()).expect("runtime");
        let value = runtime.block_on(async { 21 * 2 });
        assert_eq!(value, 42);
    }
}
