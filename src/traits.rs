use std::path::Path;

use async_trait::async_trait;

use crate::entry::EntryInfo;
use crate::error::ScourError;

/// Decides whether a directory's contents should be enumerated.
///
/// Consulted for directories only, before their children are listed. An
/// excluded directory is dropped outright: nothing below it is visited and
/// the directory itself does not become a result.
///
/// # Thread Safety
///
/// `Send + Sync` are required — hooks are shared across worker tasks and
/// called concurrently on different entries.
///
/// # Error Handling
///
/// A hook error fails the entry it was called for; the failure then runs
/// through the recover hook like any other per-entry failure.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use scour::{EntryInfo, ExcludeHook, ScourError};
///
/// struct SkipVcs;
///
/// #[async_trait]
/// impl ExcludeHook for SkipVcs {
///     async fn exclude(&self, info: &EntryInfo) -> Result<bool, ScourError> {
///         Ok(info.base == ".git" || info.base == ".svn")
///     }
/// }
/// ```
///
/// Plain closures taking `&EntryInfo` and returning `bool` already
/// implement this trait; reach for a manual impl when the decision is
/// async or fallible.
#[async_trait]
pub trait ExcludeHook: Send + Sync {
    /// Returns `true` to drop this directory and its entire subtree.
    async fn exclude(&self, info: &EntryInfo) -> Result<bool, ScourError>;
}

#[async_trait]
impl<F> ExcludeHook for F
where
    F: Fn(&EntryInfo) -> bool + Send + Sync,
{
    async fn exclude(&self, info: &EntryInfo) -> Result<bool, ScourError> {
        Ok(self(info))
    }
}

/// Decides whether an entry becomes a result.
///
/// Runs after the hidden, type, and depth gates, immediately before the
/// map step. Returning `false` drops the entry from the results without
/// affecting traversal — children of a filtered directory are still
/// visited.
///
/// # Thread Safety
///
/// `Send + Sync` are required — hooks are shared across worker tasks and
/// called concurrently on different entries.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use scour::{EntryInfo, FilterHook, ScourError};
///
/// /// Keep files larger than a threshold.
/// struct MinSize(u64);
///
/// #[async_trait]
/// impl FilterHook for MinSize {
///     async fn filter(&self, info: &EntryInfo) -> Result<bool, ScourError> {
///         Ok(info.size >= self.0)
///     }
/// }
/// ```
///
/// Plain closures taking `&EntryInfo` and returning `bool` already
/// implement this trait.
#[async_trait]
pub trait FilterHook: Send + Sync {
    /// Returns `true` if this entry should be included in results.
    async fn filter(&self, info: &EntryInfo) -> Result<bool, ScourError>;
}

#[async_trait]
impl<F> FilterHook for F
where
    F: Fn(&EntryInfo) -> bool + Send + Sync,
{
    async fn filter(&self, info: &EntryInfo) -> Result<bool, ScourError> {
        Ok(self(info))
    }
}

/// Transforms entries into the search's output type.
///
/// Setting a map hook on the builder re-types the whole search: an
/// `Inspector<M::Out>` collects whatever the hook produces. Without one,
/// results are the [`EntryInfo`] snapshots themselves.
///
/// Plain closures taking `EntryInfo` by value already implement this
/// trait:
///
/// ```rust,no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), scour::ScourError> {
/// use std::path::PathBuf;
/// use scour::EntryInfo;
///
/// let paths: Vec<PathBuf> = scour::inspector()
///     .map(|info: EntryInfo| info.absolute)
///     .build()?
///     .search(".")
///     .await?;
/// # drop(paths);
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait MapHook: Send + Sync {
    /// What the hook produces.
    type Out: Send + 'static;

    /// Transform one entry. The snapshot is consumed — this is the last
    /// step of entry processing.
    async fn map(&self, info: EntryInfo) -> Result<Self::Out, ScourError>;
}

#[async_trait]
impl<F, T> MapHook for F
where
    F: Fn(EntryInfo) -> T + Send + Sync,
    T: Send + 'static,
{
    type Out = T;

    async fn map(&self, info: EntryInfo) -> Result<T, ScourError> {
        Ok(self(info))
    }
}

/// The default map: hand the snapshot through untouched.
pub(crate) struct IdentityMap;

#[async_trait]
impl MapHook for IdentityMap {
    type Out = EntryInfo;

    async fn map(&self, info: EntryInfo) -> Result<EntryInfo, ScourError> {
        Ok(info)
    }
}

/// Decides whether a failure aborts the search.
///
/// Invoked with the error and the failed entry's relative path — or an
/// empty path when resolving the search root itself failed. Returning
/// `Ok` absorbs the failure and the traversal continues (an absorbed root
/// failure yields an empty result set). Returning `Err` escalates: the
/// search fails with the hook's error, pending work is dropped, and
/// entries already being processed finish without effect.
///
/// Plain closures taking `(&ScourError, &Path)` implement this trait and
/// absorb every failure; implement it manually to stay selective.
///
/// # Example
///
/// ```rust
/// use std::path::Path;
///
/// use async_trait::async_trait;
/// use scour::{RecoverHook, ScourError};
///
/// /// Absorb permission errors, escalate everything else.
/// struct SkipDenied;
///
/// #[async_trait]
/// impl RecoverHook for SkipDenied {
///     async fn recover(&self, error: &ScourError, location: &Path) -> Result<(), ScourError> {
///         match error {
///             ScourError::Io { source, .. }
///                 if source.kind() == std::io::ErrorKind::PermissionDenied =>
///             {
///                 eprintln!("skipped {}", location.display());
///                 Ok(())
///             }
///             other => Err(ScourError::Hook(other.to_string())),
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait RecoverHook: Send + Sync {
    /// Absorb (`Ok`) or escalate (`Err`) one failure.
    async fn recover(&self, error: &ScourError, location: &Path) -> Result<(), ScourError>;
}

#[async_trait]
impl<F> RecoverHook for F
where
    F: Fn(&ScourError, &Path) + Send + Sync,
{
    async fn recover(&self, error: &ScourError, location: &Path) -> Result<(), ScourError> {
        self(error, location);
        Ok(())
    }
}
