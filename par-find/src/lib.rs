//! # par-find
//!
//! Find every position of a value in a large `i32` array, optionally giving
//! up once "enough" matches are known.
//!
//! Provides:
//! - [`scalar_search`] / [`vector_search`] – single-threaded scans over a
//!   strided range, element-by-element or [`VECTOR_WIDTH`] lanes at a time.
//! - [`parallel_search`] / [`Searcher`] – splits the range over a fixed pool
//!   of worker threads. With a threshold `k`, a watchdog thread polls the
//!   workers' match counts and cancels them once more than `k` are in; the
//!   surplus is trimmed when the per-worker results are merged.
//!
//! ## Usage
//!
//! ```rust
//! use par_find::{Strategy, parallel_search, vector_search};
//!
//! let array = [5, 2, 5, 5, 1, 5];
//! assert_eq!(vector_search(&array, 0, 5, 8, 5).unwrap(), vec![0, 2, 3, 5]);
//!
//! let result = parallel_search(&array, 0, 5, 1, 5, Some(10), Strategy::Scalar).unwrap();
//! assert_eq!(result.count, 4);
//! assert_eq!(result.indices, vec![0, 2, 3, 5]);
//! ```
//!
//! The lane comparison is picked at compile time: AVX2 or SSE2 on x86_64,
//! NEON on AArch64, a portable loop elsewhere.

mod arch;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod matcher;
pub mod segment;
pub mod watchdog;
pub mod worker;

pub use dispatch::{
    DEFAULT_POLL_INTERVAL, DEFAULT_WORKERS, MAX_WORKERS, SearchResult, Searcher, Strategy,
    parallel_search, threshold_from_signed,
};
pub use error::{InvalidStep, Result, SearchError};
pub use matcher::{Matcher, Progress, Scalar, Unwatched, Vectorized, scalar_search, vector_search};
pub use segment::{Segment, plan_segments};

/// Number of elements one wide comparison tests.
pub const VECTOR_WIDTH: usize = 8;

/// Indices of matching elements, ascending.
pub type MatchSet = Vec<usize>;
