//! # GraphRAG MCP Rate Limiter
//!
//! A minimum-interval limiter for calls to a shared external dependency
//! (an evaluation/scoring API that rejects bursts). Every call passes through
//! [`RateLimiter::call`], which holds an async lock for the whole
//! wait-then-call sequence, so calls through one limiter are totally ordered
//! and no two of them start less than the configured interval apart.
//!
//! ```rust,no_run
//! use graphrag_mcp_ratelimit::RateLimiter;
//!
//! # async fn score(x: u32) -> u32 { x }
//! # async fn demo() {
//! let limiter = RateLimiter::global();
//! let scored = limiter.call(|| score(7)).await;
//! # }
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all
)]
#![deny(unsafe_code)]

pub mod clock;
pub mod limiter;

pub use clock::{Clock, TokioClock};
pub use limiter::{DEFAULT_MIN_INTERVAL, RateLimiter, RateLimiterConfig};
