pub mod client;
pub mod fetch;

pub use client::{rate_limit_wait, GitHubClient, RateLimitInfo, Sleeper, TokioSleeper, DEFAULT_API_URL};
pub use fetch::{fetch_all, BATCH_SIZE};
