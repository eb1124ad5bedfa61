//! Runtime configuration for the governor.

/// Stack size for worker threads. Matches the main-thread budget that
/// `sizer_stack` grows into for deeply nested trees.
pub(crate) const WORKER_STACK_SIZE: usize = 32 * 1024 * 1024;

/// Configuration for one governor run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GovernorConfig {
    /// Govern nested units on a worker pool.
    pub parallel: bool,
    /// Worker threads (0 = rayon default, one per logical CPU).
    pub num_threads: usize,
}

impl Default for GovernorConfig {
    fn default() -> Self {
        GovernorConfig {
            parallel: true,
            num_threads: 0,
        }
    }
}

impl GovernorConfig {
    /// Everything on the calling thread.
    pub fn sequential() -> Self {
        GovernorConfig {
            parallel: false,
            num_threads: 0,
        }
    }
}
