use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tracing::debug;

use crate::builder::EntryType;
use crate::entry::{self, EntryInfo, PathDescriptor};
use crate::error::ScourError;
use crate::limit::Limit;
use crate::queue::{Processor, QueueHandle, Recover, TaskQueue};
use crate::traits::{ExcludeHook, FilterHook, MapHook, RecoverHook};

// ---------------------------------------------------------------------------
// WalkConfig
// ---------------------------------------------------------------------------

/// Traversal parameters passed from the builder to the engine.
///
/// `pub(crate)` — not part of the public API. Callers configure these
/// via the builder methods (`.concurrency()`, `.max_depth()`, ...).
pub(crate) struct WalkConfig {
    pub concurrency:    Limit,
    pub max_depth:      Limit,
    pub min_depth:      Limit,
    pub entry_type:     EntryType,
    pub include_hidden: bool,
}

// ---------------------------------------------------------------------------
// Engine options
// ---------------------------------------------------------------------------

/// Internal options passed from the builder to the inspector.
pub(crate) struct EngineOptions<T> {
    pub config:  WalkConfig,
    pub exclude: Option<Arc<dyn ExcludeHook>>,
    pub filter:  Option<Arc<dyn FilterHook>>,
    pub map:     Arc<dyn MapHook<Out = T>>,
    pub recover: Option<Arc<dyn RecoverHook>>,
}

// ---------------------------------------------------------------------------
// Inspector
// ---------------------------------------------------------------------------

/// A configured filesystem search, ready to run against any root.
///
/// Built via [`inspector()`](crate::inspector) and reusable for any
/// number of searches, concurrently if desired — the inspector is cheap
/// to clone and holds no per-search state.
///
/// The output type defaults to [`EntryInfo`]; installing a map hook on
/// the builder changes it to whatever the hook produces.
///
/// # Example
///
/// ```rust,no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), scour::ScourError> {
/// let inspector = scour::inspector().max_depth(2).build()?;
/// let entries = inspector.search("./src").await?;
/// for entry in &entries {
///     println!("{}", entry.relative.display());
/// }
/// # Ok(())
/// # }
/// ```
pub struct Inspector<T = EntryInfo> {
    options: Arc<EngineOptions<T>>,
}

impl<T> Clone for Inspector<T> {
    fn clone(&self) -> Self {
        Self { options: Arc::clone(&self.options) }
    }
}

impl<T> fmt::Debug for Inspector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = &self.options.config;
        f.debug_struct("Inspector")
            .field("concurrency", &config.concurrency)
            .field("max_depth", &config.max_depth)
            .field("min_depth", &config.min_depth)
            .field("entry_type", &config.entry_type)
            .field("include_hidden", &config.include_hidden)
            .finish_non_exhaustive()
    }
}

impl<T> Inspector<T>
where
    T: Send + 'static,
{
    pub(crate) fn new(options: EngineOptions<T>) -> Self {
        Self { options: Arc::new(options) }
    }

    /// Walks `root` and collects every entry that passes the configured
    /// gates, in no particular order.
    ///
    /// A file root is described and reported directly (its relative path
    /// is empty); a directory root is walked to the configured depth.
    ///
    /// # Errors
    ///
    /// Fails when the root cannot be resolved, when any entry fails to
    /// stat or list, or when a hook errors — unless a recover hook
    /// absorbs the failure. An absorbed root failure yields an empty
    /// result set; the recover hook sees the empty path for it.
    pub async fn search(&self, root: impl AsRef<Path>) -> Result<Vec<T>, ScourError> {
        let root = root.as_ref();
        let descriptor = match resolve_root(root).await {
            Ok(descriptor) => descriptor,
            Err(error) => {
                return match &self.options.recover {
                    Some(hook) => {
                        hook.recover(&error, Path::new("")).await?;
                        Ok(Vec::new())
                    }
                    None => Err(error),
                };
            }
        };
        debug!(root = %descriptor.absolute.display(), "starting search");

        let results = Arc::new(Mutex::new(Vec::new()));
        let walker = Walker {
            options: Arc::clone(&self.options),
            results: Arc::clone(&results),
        };

        let concurrency = self.options.config.concurrency;
        let queue = match &self.options.recover {
            Some(hook) => TaskQueue::with_recover(
                concurrency,
                walker,
                HookRecover { hook: Arc::clone(hook) },
            ),
            None => TaskQueue::new(concurrency, walker),
        };

        queue.submit(WalkItem { descriptor, depth: 0 });
        queue.complete().await?;

        let collected = {
            let mut guard = results.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut *guard)
        };
        debug!(results = collected.len(), "search complete");
        Ok(collected)
    }
}

/// Anchors `root` lexically against the working directory, then stats it.
///
/// Dot components collapse textually — `a/../b` resolves against `a`'s
/// parent as written, never against a symlink target.
async fn resolve_root(root: &Path) -> Result<PathDescriptor, ScourError> {
    let absolute = std::path::absolute(root).map_err(|source| ScourError::Io {
        path: root.to_path_buf(),
        source,
    })?;
    PathDescriptor::from_root(&collapse_dots(&absolute)).await
}

/// Lexical `.`/`..` collapse. Popping past the filesystem root is a
/// no-op, so `/..` stays `/`.
fn collapse_dots(path: &Path) -> PathBuf {
    let mut collapsed = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                collapsed.pop();
            }
            _ => collapsed.push(component),
        }
    }
    collapsed
}

// ---------------------------------------------------------------------------
// Walker
// ---------------------------------------------------------------------------

/// One unit of traversal work: an entry and the depth it was found at.
pub(crate) struct WalkItem {
    pub descriptor: PathDescriptor,
    pub depth:      usize,
}

/// The queue processor that performs the walk.
///
/// Shared by every worker; per-search state is limited to the results
/// vector.
struct Walker<T> {
    options: Arc<EngineOptions<T>>,
    results: Arc<Mutex<Vec<T>>>,
}

#[async_trait]
impl<T> Processor<WalkItem> for Walker<T>
where
    T: Send + 'static,
{
    async fn process(&self, item: &WalkItem, queue: &QueueHandle<WalkItem>) -> Result<(), ScourError> {
        let config = &self.options.config;
        let descriptor = &item.descriptor;

        let info = EntryInfo::describe(descriptor).await?;

        // Hiddenness gates the subtree, not just the entry.
        if info.hidden && !config.include_hidden {
            return Ok(());
        }

        // The stat-derived flag, so a symlink to a directory is walked
        // like the directory it points at.
        if info.is_directory {
            if config.max_depth > item.depth {
                if let Some(exclude) = &self.options.exclude {
                    if exclude.exclude(&info).await? {
                        return Ok(());
                    }
                }
                for child in entry::list_children(descriptor).await? {
                    queue.submit(WalkItem { descriptor: child, depth: item.depth + 1 });
                }
            }
            if config.entry_type == EntryType::Files {
                return Ok(());
            }
        } else if config.entry_type == EntryType::Folders {
            return Ok(());
        }

        // Shallow entries are traversed but not reported.
        if config.min_depth > item.depth {
            return Ok(());
        }

        if let Some(filter) = &self.options.filter {
            if !filter.filter(&info).await? {
                return Ok(());
            }
        }

        let mapped = self.options.map.map(info).await?;
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(mapped);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// HookRecover
// ---------------------------------------------------------------------------

/// Adapts the public [`RecoverHook`] to the queue's [`Recover`] seam,
/// reporting failed entries by their relative path.
struct HookRecover {
    hook: Arc<dyn RecoverHook>,
}

#[async_trait]
impl Recover<WalkItem> for HookRecover {
    async fn recover(&self, error: ScourError, item: &WalkItem) -> Result<(), ScourError> {
        self.hook.recover(&error, &item.descriptor.relative).await
    }
}
