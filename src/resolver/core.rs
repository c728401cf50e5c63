use crate::bind::{bind, Bindable, KeySpace};
use crate::error::Result;
use crate::events::EventManager;
use crate::key::FlatMap;
use crate::resolver::snapshot::{Snapshot, OVERLAY_SOURCE};
use crate::section::ConfigSection;
use crate::source::ConfigSource;
use crate::sync::{MutexExt, RwLockExt};

use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

/// Layered configuration resolver.
///
/// The resolver holds an ordered list of [`ConfigSource`]s and resolves keys
/// against the union of their flat key spaces, later registrations winning on
/// collisions:
///
/// - **Register & build**: append sources, then merge them into an immutable
///   effective snapshot
/// - **Raw access**: case-insensitive string lookups by key path
/// - **Typed binding**: materialize a settings struct via [`Bindable`]
/// - **Sections**: prefix-scoped read-only projections
/// - **Live reload**: file-backed sources re-parse on external modification
///   (`watch` feature), swapping the snapshot atomically
///
/// # Example
///
/// ```rust
/// use conflux::{ConfigResolver, EnvSource, MemorySource};
///
/// let mut resolver = ConfigResolver::new();
/// resolver.register(MemorySource::new([("MySetting", "A")]));
/// resolver.register(EnvSource::new("APP_"));
/// resolver.build()?;
///
/// let value = resolver.get("MySetting");
/// # Ok::<(), conflux::Error>(())
/// ```
pub struct ConfigResolver {
    pub(crate) state: Arc<ResolverState>,

    /// Background watch subscription, torn down when the resolver is dropped
    #[cfg(feature = "watch")]
    watcher: Mutex<Option<crate::watch::FileWatcher>>,
}

impl std::fmt::Debug for ConfigResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigResolver").finish_non_exhaustive()
    }
}

/// Shared state, also reachable from the watch thread via a weak reference
pub(crate) struct ResolverState {
    /// Registered sources in resolution order
    pub(crate) sources: RwLock<Vec<Arc<dyn ConfigSource>>>,

    /// In-process overrides applied as the highest-priority source.
    /// This mutex also serializes snapshot swaps.
    pub(crate) overlay: Mutex<FlatMap>,

    /// Current effective snapshot (copy-on-write)
    pub(crate) snapshot: RwLock<Arc<Snapshot>>,

    /// Change listeners, notified after snapshot swaps
    pub(crate) events: EventManager,

    /// Whether an initial build has completed (listeners only see rebuilds)
    built: AtomicBool,
}

impl ResolverState {
    fn new() -> Self {
        Self {
            sources: RwLock::new(Vec::new()),
            overlay: Mutex::new(FlatMap::new()),
            snapshot: RwLock::new(Arc::new(Snapshot::default())),
            events: EventManager::new(),
            built: AtomicBool::new(false),
        }
    }

    /// Load every source in registration order and swap in the merged
    /// snapshot. On failure the previous snapshot stays active.
    pub(crate) fn rebuild(&self) -> Result<()> {
        // Hold the overlay lock across the whole merge so `set` writes and
        // snapshot swaps cannot interleave
        let overlay = self.overlay.lock_recovered();
        let sources = self.sources.read_recovered();

        let mut next = Snapshot::default();
        for source in sources.iter() {
            let bag = source.load().map_err(|e| e.in_source(source.name()))?;
            debug!("Merged {} key(s) from source '{}'", bag.len(), source.name());
            next.apply(&bag, source.name());
        }
        next.apply(&overlay, OVERLAY_SOURCE);

        let next = Arc::new(next);
        let previous = {
            let mut current = self.snapshot.write_recovered();
            std::mem::replace(&mut *current, Arc::clone(&next))
        };
        info!(
            "Resolved {} key(s) from {} source(s)",
            next.len(),
            sources.len()
        );
        drop(sources);
        drop(overlay);

        if self.built.swap(true, Ordering::AcqRel) {
            self.events.notify_diff(&previous, &next);
        }
        Ok(())
    }
}

impl ConfigResolver {
    /// Create an empty resolver with no sources
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(ResolverState::new()),
            #[cfg(feature = "watch")]
            watcher: Mutex::new(None),
        }
    }

    /// Create a builder for `ConfigResolver` with a fluent API.
    ///
    /// This is the recommended way to create a `ConfigResolver`.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use conflux::{ConfigResolver, JsonFileSource};
    ///
    /// let resolver = ConfigResolver::builder()
    ///     .with_json_source(JsonFileSource::new("appsettings.json").optional())
    ///     .with_env_prefix("APP_")
    ///     .build()?;
    /// # Ok::<(), conflux::Error>(())
    /// ```
    pub fn builder() -> crate::resolver::ConfigResolverBuilder {
        crate::resolver::ConfigResolverBuilder::new()
    }

    /// Append a source to the resolution order.
    ///
    /// Registration does not load the source; call [`build`](Self::build)
    /// afterwards. Sources registered later override earlier ones for
    /// overlapping keys.
    pub fn register(&mut self, source: impl ConfigSource + 'static) {
        self.state
            .sources
            .write_recovered()
            .push(Arc::new(source));
    }

    /// Load all sources and swap in a fresh effective snapshot.
    ///
    /// Building is idempotent: with unchanged source inputs, repeated builds
    /// produce identical snapshots. Readers observe either the previous or
    /// the new snapshot, never a partial merge.
    ///
    /// # Errors
    ///
    /// Fails with a load error identifying the offending source if any
    /// non-optional source cannot be read or parsed. The previous snapshot
    /// remains active in that case.
    pub fn build(&self) -> Result<()> {
        self.state.rebuild()?;

        #[cfg(feature = "watch")]
        self.ensure_watcher()?;

        Ok(())
    }

    /// Case-insensitive exact lookup in the current snapshot
    pub fn get(&self, key: &str) -> Option<String> {
        self.state
            .snapshot
            .read_recovered()
            .get(key)
            .map(str::to_string)
    }

    /// Write an in-process override that behaves as the highest-priority
    /// source.
    ///
    /// The value survives rebuilds and is never persisted to any backing
    /// store.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();

        let mut overlay = self.state.overlay.lock_recovered();
        overlay.insert(key.as_str(), value.as_str());

        let mut next = {
            let current = self.state.snapshot.read_recovered();
            (**current).clone()
        };
        next.put(&key, &value, OVERLAY_SOURCE);
        let next = Arc::new(next);
        let previous = {
            let mut current = self.state.snapshot.write_recovered();
            std::mem::replace(&mut *current, Arc::clone(&next))
        };
        drop(overlay);

        let old = previous.get(&key);
        if old != Some(value.as_str()) {
            self.state.events.notify(&key, old, Some(value.as_str()));
        }
    }

    /// Read-only projection of this resolver scoped to a key prefix
    pub fn section(&self, prefix: impl Into<String>) -> ConfigSection<'_> {
        ConfigSection::new(self, prefix.into())
    }

    /// Bind the effective key space onto a settings shape.
    ///
    /// Absent or malformed data degrades to the shape's defaults; binding
    /// never fails outright.
    pub fn bind<T: Bindable>(&self) -> T {
        bind(self)
    }

    /// All keys of the current snapshot, with original spelling
    pub fn keys(&self) -> Vec<String> {
        self.state
            .snapshot
            .read_recovered()
            .keys()
            .map(str::to_string)
            .collect()
    }

    /// Current effective snapshot
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.state.snapshot.read_recovered())
    }

    /// Event manager for registering change listeners.
    ///
    /// Listeners fire after snapshot swaps caused by rebuilds, file reloads
    /// and [`set`](Self::set) calls; the initial [`build`](Self::build) does
    /// not notify.
    ///
    /// # Example
    ///
    /// ```rust
    /// # let resolver = conflux::ConfigResolver::new();
    /// resolver.events().watch_key("MySetting", |key, _old, new| {
    ///     println!("{key} changed to {new:?}");
    /// });
    /// ```
    pub fn events(&self) -> &EventManager {
        &self.state.events
    }

    /// Start the background file watcher if any registered source asked for
    /// change-driven reload
    #[cfg(feature = "watch")]
    fn ensure_watcher(&self) -> Result<()> {
        let mut watcher = self.watcher.lock_recovered();
        if watcher.is_some() {
            return Ok(());
        }
        let paths: Vec<std::path::PathBuf> = self
            .state
            .sources
            .read_recovered()
            .iter()
            .filter_map(|s| s.watch_path().map(std::path::Path::to_path_buf))
            .collect();
        if paths.is_empty() {
            return Ok(());
        }
        *watcher = Some(crate::watch::FileWatcher::spawn(
            Arc::downgrade(&self.state),
            paths,
        )?);
        Ok(())
    }
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl KeySpace for ConfigResolver {
    fn value_of(&self, key: &str) -> Option<String> {
        self.get(key)
    }
}
