use std::sync::Arc;

use crate::engine::{EngineOptions, Inspector, WalkConfig};
use crate::entry::EntryInfo;
use crate::error::ScourError;
use crate::limit::Limit;
use crate::traits::{ExcludeHook, FilterHook, IdentityMap, MapHook, RecoverHook};

// ---------------------------------------------------------------------------
// EntryType
// ---------------------------------------------------------------------------

/// Which kinds of entries a search reports.
///
/// Selection is about *results* only — directories are always traversed
/// (subject to depth and hidden gates), whichever variant is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryType {
    /// Report files only. The default.
    #[default]
    Files,
    /// Report directories only.
    Folders,
    /// Report both files and directories.
    All,
}

// ---------------------------------------------------------------------------
// InspectorBuilder
// ---------------------------------------------------------------------------

/// Entry point for configuring a filesystem search.
///
/// Created via [`scour::inspector()`](crate::inspector). Configure with
/// chained builder methods, then call [`build()`](InspectorBuilder::build)
/// to validate the configuration and obtain a reusable [`Inspector`].
///
/// # Example
///
/// ```rust,no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), scour::ScourError> {
/// use scour::EntryType;
///
/// let inspector = scour::inspector()
///     .concurrency(16)
///     .max_depth(4)
///     .entry_type(EntryType::All)
///     .include_hidden(true)
///     .build()?;
///
/// let entries = inspector.search(".").await?;
/// println!("{} entries", entries.len());
/// # Ok(())
/// # }
/// ```
pub struct InspectorBuilder<T = EntryInfo> {
    concurrency:     Limit,
    max_depth:       Limit,
    min_depth:       Limit,
    entry_type:      Option<EntryType>,
    include_folders: Option<bool>,
    include_hidden:  bool,
    exclude:         Option<Arc<dyn ExcludeHook>>,
    filter:          Option<Arc<dyn FilterHook>>,
    map:             Arc<dyn MapHook<Out = T>>,
    recover:         Option<Arc<dyn RecoverHook>>,
}

impl Default for InspectorBuilder<EntryInfo> {
    fn default() -> Self {
        Self {
            concurrency:     Limit::Finite(8),
            max_depth:       Limit::Unbounded,
            min_depth:       Limit::Finite(0),
            entry_type:      None,
            include_folders: None,
            include_hidden:  false,
            exclude:         None,
            filter:          None,
            map:             Arc::new(IdentityMap),
            recover:         None,
        }
    }
}

impl<T> InspectorBuilder<T> {
    // ── Traversal bounds ──────────────────────────────────────────────────

    /// How many entries may be processed at once. Defaults to `8`.
    ///
    /// Accepts a plain count or [`Limit::Unbounded`]. Zero is rejected by
    /// [`build()`](InspectorBuilder::build).
    pub fn concurrency(mut self, limit: impl Into<Limit>) -> Self {
        self.concurrency = limit.into();
        self
    }

    /// Deepest level to descend into. Unlimited by default.
    ///
    /// The root sits at depth `0`, so `1` visits the root and its
    /// immediate children. Zero is rejected by
    /// [`build()`](InspectorBuilder::build).
    pub fn max_depth(mut self, depth: impl Into<Limit>) -> Self {
        self.max_depth = depth.into();
        self
    }

    /// Shallowest level to report from. Defaults to `0` (everything).
    ///
    /// Entries above this depth are still traversed — their children can
    /// qualify — but are left out of the results.
    pub fn min_depth(mut self, depth: impl Into<Limit>) -> Self {
        self.min_depth = depth.into();
        self
    }

    // ── Entry selection ───────────────────────────────────────────────────

    /// Which kinds of entries to report. Defaults to [`EntryType::Files`].
    pub fn entry_type(mut self, entry_type: EntryType) -> Self {
        self.entry_type = Some(entry_type);
        self
    }

    /// Report directories alongside files.
    ///
    /// Earlier releases exposed folder inclusion as a flag; `true` now
    /// selects [`EntryType::All`]. Combining it with
    /// [`entry_type`](InspectorBuilder::entry_type) is rejected by
    /// [`build()`](InspectorBuilder::build).
    #[deprecated(note = "use `entry_type(EntryType::All)` instead")]
    pub fn include_folders(mut self, yes: bool) -> Self {
        self.include_folders = Some(yes);
        self
    }

    /// Report hidden entries and descend into hidden directories.
    ///
    /// Disabled by default: a dot-prefixed entry is skipped along with
    /// everything below it.
    pub fn include_hidden(mut self, yes: bool) -> Self {
        self.include_hidden = yes;
        self
    }

    // ── Hooks ─────────────────────────────────────────────────────────────

    /// Prune whole subtrees: an excluded directory is neither reported
    /// nor descended into.
    ///
    /// Plain closures taking `&EntryInfo` and returning `bool` work here;
    /// see [`ExcludeHook`] for async or fallible variants.
    pub fn exclude(mut self, hook: impl ExcludeHook + 'static) -> Self {
        self.exclude = Some(Arc::new(hook));
        self
    }

    /// Keep only entries the hook approves. Filtering affects results,
    /// never traversal.
    pub fn filter(mut self, hook: impl FilterHook + 'static) -> Self {
        self.filter = Some(Arc::new(hook));
        self
    }

    /// Transform each reported entry, changing the search's output type.
    ///
    /// Replaces any previously installed map hook.
    pub fn map<M>(self, hook: M) -> InspectorBuilder<M::Out>
    where
        M: MapHook + 'static,
    {
        InspectorBuilder {
            concurrency:     self.concurrency,
            max_depth:       self.max_depth,
            min_depth:       self.min_depth,
            entry_type:      self.entry_type,
            include_folders: self.include_folders,
            include_hidden:  self.include_hidden,
            exclude:         self.exclude,
            filter:          self.filter,
            map:             Arc::new(hook),
            recover:         self.recover,
        }
    }

    /// Intercept per-entry failures instead of aborting the search.
    ///
    /// Plain closures taking `(&ScourError, &Path)` absorb every failure;
    /// see [`RecoverHook`] to stay selective.
    pub fn recover(mut self, hook: impl RecoverHook + 'static) -> Self {
        self.recover = Some(Arc::new(hook));
        self
    }

    // ── Build ─────────────────────────────────────────────────────────────

    /// Validate the configuration and produce a reusable [`Inspector`].
    ///
    /// # Errors
    ///
    /// - [`ScourError::InvalidConcurrency`] for a zero concurrency bound.
    /// - [`ScourError::InvalidMaxDepth`] for a zero maximum depth.
    /// - [`ScourError::InvalidDepthRange`] when the minimum depth exceeds
    ///   the maximum.
    /// - [`ScourError::ClashingTypeArguments`] when both
    ///   [`entry_type`](InspectorBuilder::entry_type) and the legacy
    ///   folder flag were given.
    pub fn build(self) -> Result<Inspector<T>, ScourError>
    where
        T: Send + 'static,
    {
        if !self.concurrency.is_positive() {
            return Err(ScourError::InvalidConcurrency(self.concurrency));
        }
        if !self.max_depth.is_positive() {
            return Err(ScourError::InvalidMaxDepth(self.max_depth));
        }
        if self.min_depth > self.max_depth {
            return Err(ScourError::InvalidDepthRange);
        }
        let entry_type = match (self.entry_type, self.include_folders) {
            (Some(_), Some(_))   => return Err(ScourError::ClashingTypeArguments),
            (Some(chosen), None) => chosen,
            (None, Some(true))   => EntryType::All,
            (None, _)            => EntryType::default(),
        };

        Ok(Inspector::new(EngineOptions {
            config: WalkConfig {
                concurrency:    self.concurrency,
                max_depth:      self.max_depth,
                min_depth:      self.min_depth,
                entry_type,
                include_hidden: self.include_hidden,
            },
            exclude: self.exclude,
            filter:  self.filter,
            map:     self.map,
            recover: self.recover,
        }))
    }
}
