//! # scour
//!
//! Bounded-concurrency async filesystem traversal — depth-aware,
//! hook-driven, embeddable.
//!
//! scour walks directory trees on tokio. It owns the work queue
//! ([`queue::TaskQueue`]), the traversal engine ([`Inspector`]), the hook
//! contracts, the error type, and the builder API. It does **not** own
//! output formatting, glob syntax, or ignore-file semantics — those
//! belong to the caller, composed through hooks.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), scour::ScourError> {
//! let inspector = scour::inspector()
//!     .concurrency(32)
//!     .include_hidden(true)
//!     .build()?;
//!
//! for entry in inspector.search("./projects").await? {
//!     println!("{} ({} bytes)", entry.relative.display(), entry.size);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Hooks
//!
//! Four optional hooks shape a search: `exclude` prunes subtrees,
//! `filter` gates results, `map` transforms them (re-typing the search),
//! and `recover` absorbs failures. Closures cover the common cases:
//!
//! ```rust,no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), scour::ScourError> {
//! use std::path::{Path, PathBuf};
//!
//! use scour::{EntryInfo, ScourError};
//!
//! let sizes: Vec<(PathBuf, u64)> = scour::inspector()
//!     .exclude(|info: &EntryInfo| info.base == "target")
//!     .filter(|info: &EntryInfo| info.size > 1024)
//!     .map(|info: EntryInfo| (info.relative, info.size))
//!     .recover(|error: &ScourError, location: &Path| {
//!         eprintln!("skipping {}: {error}", location.display());
//!     })
//!     .build()?
//!     .search(".")
//!     .await?;
//! # drop(sizes);
//! # Ok(())
//! # }
//! ```
//!
//! Implement [`ExcludeHook`], [`FilterHook`], [`MapHook`], or
//! [`RecoverHook`] directly when a hook needs to be async, fallible, or
//! selective about which failures it absorbs.
//!
//! # The queue underneath
//!
//! Traversal runs on [`queue::TaskQueue`], a generic bounded-concurrency
//! work queue whose processors can submit follow-up work — each listed
//! directory feeds its children back in. The queue is public and stands
//! on its own for non-filesystem fan-out workloads.

#![forbid(unsafe_code)]

pub mod filters;
pub mod queue;

mod builder;
mod engine;
mod entry;
mod error;
mod limit;
mod traits;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use builder::{EntryType, InspectorBuilder};
pub use engine::Inspector;
pub use entry::{EntryInfo, PathDescriptor};
pub use error::ScourError;
pub use limit::Limit;
pub use traits::{ExcludeHook, FilterHook, MapHook, RecoverHook};

// ── Entry point ───────────────────────────────────────────────────────────────

/// Create a new [`InspectorBuilder`] to configure a search.
///
/// # Example
///
/// ```rust,no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), scour::ScourError> {
/// use scour::EntryType;
///
/// let everything = scour::inspector()
///     .entry_type(EntryType::All)
///     .include_hidden(true)
///     .build()?
///     .search("/var/log")
///     .await?;
///
/// println!("{} entries", everything.len());
/// # Ok(())
/// # }
/// ```
pub fn inspector() -> InspectorBuilder {
    InspectorBuilder::default()
}
