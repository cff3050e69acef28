use std::cell::RefCell;
use std::rc::Rc;
use std::str::FromStr;

use crate::app::domain::{FontFamily, PreferenceState, ResolvedTheme, StoreConfig, ThemeMode};
use crate::app::infrastructure::error::PreferenceError;
use crate::app::infrastructure::scheme::{SubscriptionId, SystemSchemeSource};
use crate::app::infrastructure::storage::PreferenceStorage;
use crate::ui::root::RootAttributeSink;

/// Read and write access to appearance preferences, as handed to UI
/// components below the application root.
pub trait Preferences {
    fn state(&self) -> PreferenceState;

    /// Whether `ThemeMode::System` is an available choice
    fn system_enabled(&self) -> bool;

    fn set_theme(&self, mode: ThemeMode);

    fn set_font_family(&self, font: FontFamily);

    fn mode(&self) -> ThemeMode {
        self.state().mode
    }

    fn resolved_theme(&self) -> ResolvedTheme {
        self.state().resolved_theme()
    }

    fn font(&self) -> FontFamily {
        self.state().font
    }

    fn system_scheme(&self) -> ResolvedTheme {
        self.state().system_scheme
    }

    fn is_loaded(&self) -> bool {
        self.state().loaded
    }
}

struct StoreState {
    config: StoreConfig,
    state: PreferenceState,
    applied_theme: Option<ResolvedTheme>,
    applied_font: Option<FontFamily>,
    /// Chosen in this session before load; initialization keeps it
    theme_chosen: bool,
    font_chosen: bool,
}

impl StoreState {
    /// What the root is missing relative to the current state.
    fn pending(&self) -> (Option<ResolvedTheme>, Option<FontFamily>) {
        if !self.state.loaded {
            return (None, None);
        }
        let theme = self.state.resolved_theme();
        let font = self.state.font;
        (
            (self.applied_theme != Some(theme)).then_some(theme),
            (self.applied_font != Some(font)).then_some(font),
        )
    }
}

/// State and collaborators live in separate cells, so a collaborator may
/// read (or even change) preferences while the store is calling it.
struct StoreShared {
    state: RefCell<StoreState>,
    storage: RefCell<Box<dyn PreferenceStorage>>,
    sink: RefCell<Box<dyn RootAttributeSink>>,
}

impl StoreShared {
    fn read_persisted<T>(&self, key: &str) -> Option<T>
    where
        T: FromStr<Err = PreferenceError>,
    {
        let result = match self.storage.try_borrow() {
            Ok(storage) => storage.get(key),
            Err(_) => {
                tracing::warn!(key, "storage busy; using default");
                return None;
            }
        };
        let raw = match result {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read preference; using default");
                return None;
            }
        };
        match raw.parse() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(key, error = %e, "ignoring persisted preference");
                None
            }
        }
    }

    fn persist(&self, key: &str, value: &str) {
        let result = match self.storage.try_borrow_mut() {
            Ok(mut storage) => storage.set(key, value),
            Err(_) => Err(PreferenceError::StorageUnavailable(
                "storage is busy".to_string(),
            )),
        };
        if let Err(e) = result {
            tracing::warn!(key, value, error = %e, "failed to persist preference");
        }
    }

    /// Bring the root up to date with the state. Does nothing until loaded.
    ///
    /// A call made from inside the sink returns at once; the outer call
    /// keeps looping until nothing is pending.
    fn flush(&self) {
        let Ok(mut sink) = self.sink.try_borrow_mut() else {
            return;
        };
        loop {
            let (theme, font) = self.state.borrow().pending();
            if theme.is_none() && font.is_none() {
                return;
            }
            if let Some(theme) = theme {
                sink.apply_theme_class(theme);
                sink.set_meta_color(theme.meta_color());
                self.state.borrow_mut().applied_theme = Some(theme);
            }
            if let Some(font) = font {
                sink.apply_font_class(font);
                self.state.borrow_mut().applied_font = Some(font);
            }
        }
    }

    fn on_system_scheme(&self, scheme: ResolvedTheme) {
        self.state.borrow_mut().state.system_scheme = scheme;
        self.flush();
    }
}

/// Owns theme mode, font family and the sampled OS scheme for one
/// application session.
///
/// Construct one at the application root and pass it down as
/// `&dyn Preferences`. Dropping the store releases its OS subscription.
pub struct PreferenceStore {
    shared: Rc<StoreShared>,
    source: Rc<dyn SystemSchemeSource>,
    subscription: Option<SubscriptionId>,
}

impl PreferenceStore {
    /// Create an uninitialized store and subscribe to OS scheme changes.
    ///
    /// Nothing is read from storage or written to the root until
    /// [`initialize`](Self::initialize) runs.
    pub fn new(
        config: StoreConfig,
        storage: impl PreferenceStorage + 'static,
        sink: impl RootAttributeSink + 'static,
        source: Rc<dyn SystemSchemeSource>,
    ) -> Self {
        let state = PreferenceState::new(config.initial_theme(), config.default_font);
        let enable_system = config.enable_system;
        let shared = Rc::new(StoreShared {
            state: RefCell::new(StoreState {
                config,
                state,
                applied_theme: None,
                applied_font: None,
                theme_chosen: false,
                font_chosen: false,
            }),
            storage: RefCell::new(Box::new(storage)),
            sink: RefCell::new(Box::new(sink)),
        });

        let subscription = if enable_system {
            let weak = Rc::downgrade(&shared);
            let id = source.subscribe(Rc::new(move |scheme: ResolvedTheme| {
                if let Some(shared) = weak.upgrade() {
                    shared.on_system_scheme(scheme);
                }
            }));
            if id.is_none() {
                tracing::debug!("system scheme source offers no live updates");
            }
            id
        } else {
            None
        };

        Self {
            shared,
            source,
            subscription,
        }
    }

    /// Create and initialize in one step.
    pub fn mount(
        config: StoreConfig,
        storage: impl PreferenceStorage + 'static,
        sink: impl RootAttributeSink + 'static,
        source: Rc<dyn SystemSchemeSource>,
    ) -> Self {
        let store = Self::new(config, storage, sink, source);
        store.initialize();
        store
    }

    /// Sample the OS scheme, restore persisted choices and mark the store
    /// loaded. Runs once; later calls do nothing.
    ///
    /// A dimension already chosen in this session is not overwritten by
    /// its persisted value, even if persisting that choice failed.
    pub fn initialize(&self) {
        let (theme_key, font_key, theme_chosen, font_chosen) = {
            let store = self.shared.state.borrow();
            if store.state.loaded {
                return;
            }
            (
                store.config.theme_storage_key.clone(),
                store.config.font_storage_key.clone(),
                store.theme_chosen,
                store.font_chosen,
            )
        };

        let system_scheme = match self.source.prefers_dark() {
            Some(prefers_dark) => ResolvedTheme::from_prefers_dark(prefers_dark),
            None => {
                tracing::debug!("no system colour scheme signal; assuming light");
                ResolvedTheme::Light
            }
        };
        let persisted_mode = if theme_chosen {
            None
        } else {
            self.shared.read_persisted::<ThemeMode>(&theme_key)
        };
        let persisted_font = if font_chosen {
            None
        } else {
            self.shared.read_persisted::<FontFamily>(&font_key)
        };

        {
            let mut store = self.shared.state.borrow_mut();
            store.state.system_scheme = system_scheme;
            if let Some(mode) = persisted_mode {
                if store.config.accepts(mode) {
                    store.state.mode = mode;
                }
            }
            if let Some(font) = persisted_font {
                store.state.font = font;
            }
            store.state.loaded = true;
            tracing::debug!(
                mode = %store.state.mode,
                font = %store.state.font,
                system = %store.state.system_scheme,
                "preferences loaded"
            );
        }
        self.shared.flush();
    }

    /// Advance to the next theme mode and return it.
    pub fn cycle_theme(&self) -> ThemeMode {
        let next = self.mode().next(self.system_enabled());
        self.set_theme(next);
        next
    }

    /// Advance to the next font family and return it.
    pub fn cycle_font(&self) -> FontFamily {
        let next = self.font().next();
        self.set_font_family(next);
        next
    }

    pub fn config(&self) -> StoreConfig {
        self.shared.state.borrow().config.clone()
    }

    /// Whether the store currently holds a live OS subscription
    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Tear the store down, releasing its OS subscription.
    pub fn unmount(self) {}
}

impl Preferences for PreferenceStore {
    fn state(&self) -> PreferenceState {
        self.shared.state.borrow().state
    }

    fn system_enabled(&self) -> bool {
        self.shared.state.borrow().config.enable_system
    }

    fn set_theme(&self, mode: ThemeMode) {
        let key = {
            let mut store = self.shared.state.borrow_mut();
            if !store.config.accepts(mode) {
                tracing::warn!(%mode, "system theme is disabled; ignoring");
                return;
            }
            store.state.mode = mode;
            if !store.state.loaded {
                store.theme_chosen = true;
            }
            store.config.theme_storage_key.clone()
        };
        self.shared.persist(&key, mode.as_str());
        self.shared.flush();
    }

    fn set_font_family(&self, font: FontFamily) {
        let key = {
            let mut store = self.shared.state.borrow_mut();
            store.state.font = font;
            if !store.state.loaded {
                store.font_chosen = true;
            }
            store.config.font_storage_key.clone()
        };
        self.shared.persist(&key, font.as_str());
        self.shared.flush();
    }
}

impl Drop for PreferenceStore {
    fn drop(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.source.unsubscribe(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::domain::{FONT_STORAGE_KEY, THEME_STORAGE_KEY, ThemeAttribute};
    use crate::app::infrastructure::error::Result;
    use crate::app::infrastructure::scheme::{DetachedSchemeSource, ManualSchemeSource};
    use crate::app::infrastructure::storage::MemoryStorage;
    use crate::ui::root::{DocumentRoot, THEME_COLOR_META};
    use crate::ui::toggles::{ThemeToggle, ToggleView};
    use std::rc::Weak;

    type SharedStorage = Rc<RefCell<MemoryStorage>>;
    type SharedRoot = Rc<RefCell<DocumentRoot>>;

    struct Harness {
        store: PreferenceStore,
        storage: SharedStorage,
        root: SharedRoot,
        source: Rc<ManualSchemeSource>,
    }

    fn harness(config: StoreConfig, storage: MemoryStorage, prefers_dark: bool) -> Harness {
        let storage = Rc::new(RefCell::new(storage));
        let root = DocumentRoot::shared(config.attribute.clone());
        let source = Rc::new(ManualSchemeSource::new(prefers_dark));
        let store = PreferenceStore::mount(config, storage.clone(), root.clone(), source.clone());
        Harness {
            store,
            storage,
            root,
            source,
        }
    }

    enum Event {
        Theme(ThemeMode),
        System(bool),
    }

    fn stored(storage: &SharedStorage, key: &str) -> Option<String> {
        storage.borrow().get(key).unwrap()
    }

    /// Reads fine, refuses every write.
    struct ReadOnlyStorage(MemoryStorage);

    impl PreferenceStorage for ReadOnlyStorage {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.0.get(key)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(PreferenceError::StorageUnavailable("quota exceeded".to_string()))
        }
    }

    struct BrokenStorage;

    impl PreferenceStorage for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(PreferenceError::StorageUnavailable("disabled".to_string()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(PreferenceError::StorageUnavailable("disabled".to_string()))
        }
    }

    type StoreSlot = Rc<RefCell<Weak<PreferenceStore>>>;

    /// Forwards to a `DocumentRoot` and calls back into the store from
    /// inside `apply_theme_class`, the way a toolkit redraw would.
    struct ReentrantSink {
        slot: StoreSlot,
        root: SharedRoot,
        reads: Rc<RefCell<Vec<PreferenceState>>>,
        on_theme: Box<dyn Fn(&PreferenceStore)>,
    }

    impl RootAttributeSink for ReentrantSink {
        fn apply_theme_class(&mut self, theme: ResolvedTheme) {
            self.root.borrow_mut().apply_theme_class(theme);
            let store = self.slot.borrow().upgrade();
            if let Some(store) = store {
                self.reads.borrow_mut().push(store.state());
                (self.on_theme)(&store);
            }
        }

        fn apply_font_class(&mut self, font: FontFamily) {
            self.root.borrow_mut().apply_font_class(font);
        }

        fn set_meta_color(&mut self, color: &str) {
            self.root.borrow_mut().set_meta_color(color);
        }
    }

    fn reentrant_store(
        source: Rc<ManualSchemeSource>,
        on_theme: impl Fn(&PreferenceStore) + 'static,
    ) -> (Rc<PreferenceStore>, SharedRoot, Rc<RefCell<Vec<PreferenceState>>>) {
        let slot: StoreSlot = Rc::new(RefCell::new(Weak::new()));
        let root = DocumentRoot::shared(ThemeAttribute::Class);
        let reads = Rc::new(RefCell::new(Vec::new()));
        let sink = ReentrantSink {
            slot: slot.clone(),
            root: root.clone(),
            reads: reads.clone(),
            on_theme: Box::new(on_theme),
        };
        let store = Rc::new(PreferenceStore::new(
            StoreConfig::default(),
            MemoryStorage::new(),
            sink,
            source,
        ));
        *slot.borrow_mut() = Rc::downgrade(&store);
        store.initialize();
        (store, root, reads)
    }

    #[test]
    fn test_sink_may_read_preferences() {
        let source = Rc::new(ManualSchemeSource::new(false));
        let (store, root, reads) = reentrant_store(source.clone(), |store| {
            assert!(matches!(ThemeToggle::view(store), ToggleView::Button { .. }));
        });

        store.set_theme(ThemeMode::Dark);
        source.set_prefers_dark(true);
        store.set_theme(ThemeMode::Light);

        let reads = reads.borrow();
        assert_eq!(reads.len(), 3);
        assert!(reads.iter().all(|state| state.loaded));
        assert_eq!(reads[1].mode, ThemeMode::Dark);
        assert_eq!(reads[2].mode, ThemeMode::Light);
        assert_eq!(root.borrow().theme_marks(), vec![ResolvedTheme::Light]);
    }

    #[test]
    fn test_sink_may_change_preferences() {
        let source = Rc::new(ManualSchemeSource::new(false));
        let pushed = source.clone();
        let (store, root, _reads) = reentrant_store(source.clone(), move |store| {
            if store.font() != FontFamily::Telex {
                store.set_font_family(FontFamily::Telex);
                pushed.set_prefers_dark(true);
            }
        });

        assert_eq!(store.font(), FontFamily::Telex);
        assert_eq!(store.resolved_theme(), ResolvedTheme::Dark);
        let root = root.borrow();
        assert_eq!(root.theme_marks(), vec![ResolvedTheme::Dark]);
        assert_eq!(root.font_marks(), vec![FontFamily::Telex]);
        assert_eq!(root.meta_content(THEME_COLOR_META), Some("#0a0a0a"));
        assert_eq!(root.meta_count(THEME_COLOR_META), 1);
    }

    #[test]
    fn test_choice_before_load_survives_failed_write() {
        let storage = MemoryStorage::new()
            .with_entry(THEME_STORAGE_KEY, "light")
            .with_entry(FONT_STORAGE_KEY, "roboto");
        let store = PreferenceStore::new(
            StoreConfig::default(),
            ReadOnlyStorage(storage),
            DocumentRoot::default(),
            Rc::new(ManualSchemeSource::new(false)),
        );

        store.set_theme(ThemeMode::Dark);
        store.initialize();

        assert_eq!(store.mode(), ThemeMode::Dark);
        assert_eq!(store.font(), FontFamily::Roboto);
    }

    #[test]
    fn test_restores_every_valid_persisted_mode() {
        for &mode in ThemeMode::all() {
            let storage = MemoryStorage::new().with_entry(THEME_STORAGE_KEY, mode.as_str());
            let h = harness(StoreConfig::default(), storage, false);
            assert_eq!(h.store.mode(), mode);
        }
    }

    #[test]
    fn test_corrupt_persisted_values_fall_back_to_defaults() {
        let config = StoreConfig {
            default_theme: ThemeMode::Dark,
            default_font: FontFamily::Telex,
            ..Default::default()
        };
        for corrupt in ["", "Dark", "sepia", "{\"mode\":\"dark\"}"] {
            let storage = MemoryStorage::new()
                .with_entry(THEME_STORAGE_KEY, corrupt)
                .with_entry(FONT_STORAGE_KEY, corrupt);
            let h = harness(config.clone(), storage, false);
            assert_eq!(h.store.mode(), ThemeMode::Dark);
            assert_eq!(h.store.font(), FontFamily::Telex);
        }
    }

    #[test]
    fn test_resolved_theme_all_combinations() {
        for &prefers_dark in &[false, true] {
            let h = harness(StoreConfig::default(), MemoryStorage::new(), prefers_dark);
            let system = ResolvedTheme::from_prefers_dark(prefers_dark);
            for &mode in ThemeMode::all() {
                h.store.set_theme(mode);
                let expected = if mode == ThemeMode::System {
                    system
                } else {
                    mode.resolve(ResolvedTheme::Light)
                };
                assert_eq!(h.store.resolved_theme(), expected);
                assert_eq!(h.store.system_scheme(), system);
            }
        }
    }

    #[test]
    fn test_set_theme_persists_and_resolves() {
        let h = harness(StoreConfig::default(), MemoryStorage::new(), true);
        for &mode in ThemeMode::all() {
            h.store.set_theme(mode);
            assert_eq!(stored(&h.storage, THEME_STORAGE_KEY).as_deref(), Some(mode.as_str()));
            assert_eq!(h.store.resolved_theme(), mode.resolve(ResolvedTheme::Dark));
        }
    }

    #[test]
    fn test_theme_mark_cardinality_stays_one() {
        let h = harness(StoreConfig::default(), MemoryStorage::new(), false);
        let events = [
            Event::Theme(ThemeMode::Dark),
            Event::System(true),
            Event::Theme(ThemeMode::System),
            Event::System(false),
            Event::System(false),
            Event::Theme(ThemeMode::Light),
            Event::System(true),
        ];
        assert_eq!(h.root.borrow().theme_marks().len(), 1);
        for event in events {
            match event {
                Event::Theme(mode) => h.store.set_theme(mode),
                Event::System(prefers_dark) => h.source.set_prefers_dark(prefers_dark),
            }
            let marks = h.root.borrow().theme_marks();
            assert_eq!(marks, vec![h.store.resolved_theme()]);
            assert_eq!(h.root.borrow().meta_count(THEME_COLOR_META), 1);
        }
    }

    #[test]
    fn test_font_cycle_returns_to_start() {
        let h = harness(StoreConfig::default(), MemoryStorage::new(), false);
        let start = h.store.font();
        let mut visited = Vec::new();
        for _ in 0..FontFamily::all().len() {
            visited.push(h.store.cycle_font());
            assert_eq!(h.root.borrow().font_marks(), vec![h.store.font()]);
        }
        assert_eq!(*visited.last().unwrap(), start);
        let mut distinct = visited.clone();
        distinct.sort_by_key(|f| f.as_str());
        distinct.dedup();
        assert_eq!(distinct.len(), FontFamily::all().len());
    }

    #[test]
    fn test_default_config_follows_dark_system() {
        let h = harness(StoreConfig::default(), MemoryStorage::new(), true);
        assert_eq!(h.store.mode(), ThemeMode::System);
        assert_eq!(h.store.system_scheme(), ResolvedTheme::Dark);
        assert_eq!(h.store.resolved_theme(), ResolvedTheme::Dark);
        assert!(h.root.borrow().has_class("dark"));
        assert_eq!(h.root.borrow().meta_content(THEME_COLOR_META), Some("#0a0a0a"));

        h.store.set_theme(ThemeMode::Light);
        assert_eq!(h.store.resolved_theme(), ResolvedTheme::Light);
        assert!(h.root.borrow().has_class("light"));
        assert!(!h.root.borrow().has_class("dark"));
        assert_eq!(stored(&h.storage, THEME_STORAGE_KEY).as_deref(), Some("light"));
    }

    #[test]
    fn test_persisted_font_and_theme_applied_together() {
        let storage = MemoryStorage::new()
            .with_entry(FONT_STORAGE_KEY, "roboto")
            .with_entry(THEME_STORAGE_KEY, "dark");
        let h = harness(StoreConfig::default(), storage, false);
        assert_eq!(h.store.font(), FontFamily::Roboto);
        assert_eq!(h.store.mode(), ThemeMode::Dark);
        assert_eq!(h.store.resolved_theme(), ResolvedTheme::Dark);

        let root = h.root.borrow();
        assert!(root.has_class("dark"));
        assert_eq!(root.font_marks(), vec![FontFamily::Roboto]);
        assert!(root.body_has_class("font-roboto"));
    }

    #[test]
    fn test_no_side_effects_before_initialize() {
        let storage = Rc::new(RefCell::new(MemoryStorage::new()));
        let root = DocumentRoot::shared(ThemeAttribute::Class);
        let source = Rc::new(ManualSchemeSource::new(false));
        let store = PreferenceStore::new(
            StoreConfig::default(),
            storage.clone(),
            root.clone(),
            source.clone(),
        );

        assert!(!store.is_loaded());
        store.set_theme(ThemeMode::Dark);
        store.set_font_family(FontFamily::Exo2);
        source.set_prefers_dark(true);

        assert_eq!(store.system_scheme(), ResolvedTheme::Dark);
        assert_eq!(store.resolved_theme(), ResolvedTheme::Dark);
        assert!(root.borrow().theme_marks().is_empty());
        assert!(root.borrow().font_marks().is_empty());
        assert_eq!(root.borrow().meta_count(THEME_COLOR_META), 0);

        // Writes made before load are what initialization restores.
        store.initialize();
        assert!(store.is_loaded());
        assert_eq!(store.mode(), ThemeMode::Dark);
        assert_eq!(store.font(), FontFamily::Exo2);
        assert_eq!(root.borrow().theme_marks(), vec![ResolvedTheme::Dark]);
        assert_eq!(root.borrow().font_marks(), vec![FontFamily::Exo2]);
    }

    #[test]
    fn test_initialize_runs_once() {
        let h = harness(StoreConfig::default(), MemoryStorage::new(), false);
        h.store.set_theme(ThemeMode::Dark);
        h.storage
            .borrow_mut()
            .set(THEME_STORAGE_KEY, "light")
            .unwrap();
        h.store.initialize();
        assert_eq!(h.store.mode(), ThemeMode::Dark);
    }

    #[test]
    fn test_system_change_followed_only_in_system_mode() {
        let h = harness(StoreConfig::default(), MemoryStorage::new(), false);
        h.source.set_prefers_dark(true);
        assert!(h.root.borrow().has_class("dark"));

        h.store.set_theme(ThemeMode::Light);
        h.source.set_prefers_dark(false);
        h.source.set_prefers_dark(true);
        assert_eq!(h.store.system_scheme(), ResolvedTheme::Dark);
        assert_eq!(h.root.borrow().theme_marks(), vec![ResolvedTheme::Light]);
    }

    #[test]
    fn test_write_failure_keeps_memory_state() {
        let root = DocumentRoot::shared(ThemeAttribute::Class);
        let store = PreferenceStore::mount(
            StoreConfig::default(),
            ReadOnlyStorage(MemoryStorage::new().with_entry(FONT_STORAGE_KEY, "telex")),
            root.clone(),
            Rc::new(ManualSchemeSource::new(false)),
        );
        assert_eq!(store.font(), FontFamily::Telex);

        store.set_theme(ThemeMode::Dark);
        store.set_font_family(FontFamily::Yantramanav);
        assert_eq!(store.mode(), ThemeMode::Dark);
        assert_eq!(store.font(), FontFamily::Yantramanav);
        assert!(root.borrow().has_class("font-yantramanav"));
    }

    #[test]
    fn test_read_failure_uses_defaults() {
        let store = PreferenceStore::mount(
            StoreConfig::default(),
            BrokenStorage,
            DocumentRoot::default(),
            Rc::new(ManualSchemeSource::new(true)),
        );
        assert!(store.is_loaded());
        assert_eq!(store.mode(), ThemeMode::System);
        assert_eq!(store.font(), FontFamily::GeistSans);
    }

    #[test]
    fn test_missing_signal_degrades_to_light() {
        let root = DocumentRoot::shared(ThemeAttribute::Class);
        let store = PreferenceStore::mount(
            StoreConfig::default(),
            MemoryStorage::new(),
            root.clone(),
            Rc::new(DetachedSchemeSource),
        );
        assert!(store.is_loaded());
        assert!(!store.is_subscribed());
        assert_eq!(store.system_scheme(), ResolvedTheme::Light);
        assert!(root.borrow().has_class("light"));
    }

    #[test]
    fn test_drop_releases_subscription() {
        let source = Rc::new(ManualSchemeSource::new(false));
        for _ in 0..3 {
            let store = PreferenceStore::mount(
                StoreConfig::default(),
                MemoryStorage::new(),
                DocumentRoot::default(),
                source.clone(),
            );
            assert_eq!(source.subscriber_count(), 1);
            store.unmount();
        }
        assert_eq!(source.subscriber_count(), 0);
        source.set_prefers_dark(true);
    }

    #[test]
    fn test_system_disabled_policy() {
        let config = StoreConfig {
            enable_system: false,
            ..Default::default()
        };
        let storage = MemoryStorage::new().with_entry(THEME_STORAGE_KEY, "system");
        let h = harness(config, storage, true);

        assert!(!h.store.is_subscribed());
        assert_eq!(h.source.subscriber_count(), 0);
        assert_eq!(h.store.mode(), ThemeMode::Light);

        h.store.set_theme(ThemeMode::Dark);
        h.store.set_theme(ThemeMode::System);
        assert_eq!(h.store.mode(), ThemeMode::Dark);
        assert_eq!(stored(&h.storage, THEME_STORAGE_KEY).as_deref(), Some("dark"));

        assert_eq!(h.store.cycle_theme(), ThemeMode::Light);
        assert_eq!(h.store.cycle_theme(), ThemeMode::Dark);
    }

    #[test]
    fn test_custom_storage_keys_and_attribute() {
        let config = StoreConfig {
            theme_storage_key: "cfo-theme".to_string(),
            font_storage_key: "cfo-font".to_string(),
            attribute: ThemeAttribute::Named("data-theme".to_string()),
            ..Default::default()
        };
        let storage = MemoryStorage::new().with_entry("cfo-theme", "dark");
        let h = harness(config, storage, false);

        assert_eq!(h.store.mode(), ThemeMode::Dark);
        assert_eq!(h.root.borrow().attribute("data-theme"), Some("dark"));

        h.store.set_font_family(FontFamily::Telex);
        assert_eq!(stored(&h.storage, "cfo-font").as_deref(), Some("telex"));
        assert_eq!(stored(&h.storage, FONT_STORAGE_KEY), None);
    }
}
