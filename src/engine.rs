//! The annotation engine: glossary store, readiness gate, cache and host in one place.
//!
//! Operations that touch the host are gated. Issued before the glossary is ready they are
//! deferred and replayed, in call order, once a refresh completes. Operations that hand back a
//! value (annotating a string, building views) cannot wait and fail with [`Error::NotReady`].

use tracing::{debug, error, info, warn};

use crate::Set;
use crate::annotate::{Annotator, Occurrences};
use crate::cache::{Cache, cache_key};
use crate::config::{Config, ConfigUpdate};
use crate::dispatch::{ClickDispatcher, ClickTarget};
use crate::download::RemoteSource;
use crate::error::{Error, Result};
use crate::gate::{Gate, GateState};
use crate::glossary::GlossaryStore;
use crate::host::{Host, Placement, Selector};
use crate::models::{EntryId, GlossaryEntry, NewEntry};
use crate::scanner::find_entry_ids;
use crate::views;

/// A deferred operation.
pub type Task<H> = Box<dyn FnOnce(&mut Enlighten<H>) -> Result<()>>;

/// Outcome of a gated operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch<T> {
    Ran(T),
    /// Deferred until the glossary is ready.
    Queued,
}

/// What happened to the deferred operations when the gate opened.
#[derive(Debug, Default)]
pub struct Replay {
    pub ran: usize,
    pub failed: Vec<Error>,
    /// The refresh failed and the engine runs on cached words.
    pub stale: bool,
}

pub struct Enlighten<H> {
    config: Config,
    store: GlossaryStore,
    exclude: Set<EntryId>,
    gate: Gate<Task<H>>,
    cache: Box<dyn Cache>,
    dispatcher: ClickDispatcher,
    host: H,
}

impl<H: Host + 'static> Enlighten<H> {
    /// Load any cached glossary. With `use_local_cache` a non-empty cache makes the engine
    /// ready before the first refresh.
    pub fn new(config: Config, cache: impl Cache + 'static, host: H) -> Self {
        let exclude = config.exclude.iter().copied().collect();
        let mut app = Self {
            config,
            store: GlossaryStore::default(),
            exclude,
            gate: Gate::default(),
            cache: Box::new(cache),
            dispatcher: ClickDispatcher::default(),
            host,
        };
        app.load_cache();
        app
    }

    fn load_cache(&mut self) {
        let key = cache_key(self.config.language);
        let Some(json) = self.cache.get(&key) else {
            debug!("No cached glossary under {key}");
            return;
        };

        let loaded = serde_json::from_str::<Vec<GlossaryEntry>>(&json)
            .map_err(Error::from)
            .and_then(|words| self.store.replace_words(words));
        match loaded {
            Ok(()) => info!("Loaded {} cached words from {key}", self.store.words().len()),
            Err(err) => warn!("Ignoring cached glossary {key}: {err}"),
        }

        if self.config.use_local_cache && !self.store.words().is_empty() {
            self.gate.open();
            debug!("Trusting cached glossary, engine is ready");
        }
    }

    fn write_cache(&mut self) {
        let key = cache_key(self.config.language);
        let written = serde_json::to_string(self.store.words())
            .map_err(Error::from)
            .and_then(|json| self.cache.set(&key, &json));
        match written {
            Ok(()) => debug!("Cached {} words under {key}", self.store.words().len()),
            Err(err) => warn!("Could not cache glossary under {key}: {err}"),
        }
    }

    /// Fetch the glossary for the configured language and complete the refresh with it.
    pub fn refresh(&mut self, source: &dyn RemoteSource) -> Result<Replay> {
        let url = self.config.resolved_source_url();
        debug!("Refreshing glossary from {url}");
        let fetched = source.fetch(&url);
        self.complete_refresh(fetched)
    }

    /// Install freshly fetched words (or handle the fetch failure) and open the gate.
    ///
    /// A failure keeps serving cached words when there are any. With nothing to serve the
    /// gate fails and every deferred operation is dropped.
    pub fn complete_refresh(&mut self, fetched: Result<Vec<GlossaryEntry>>) -> Result<Replay> {
        let installed = fetched.and_then(|words| {
            if words.is_empty() {
                return Err(Error::EmptyGlossary);
            }
            self.store.replace_words(words)
        });

        match installed {
            Ok(()) => {
                info!("Glossary refreshed with {} words", self.store.words().len());
                self.write_cache();
                Ok(self.replay(false))
            }
            Err(err) if !self.store.words().is_empty() => {
                warn!("Glossary refresh failed, keeping cached words: {err}");
                Ok(self.replay(true))
            }
            Err(err) => {
                let dropped = self.gate.fail().len();
                error!("Glossary unavailable, dropped {dropped} deferred operations: {err}");
                Err(Error::Unavailable {
                    dropped,
                    source: Box::new(err),
                })
            }
        }
    }

    fn replay(&mut self, stale: bool) -> Replay {
        let deferred = self.gate.open();
        let mut replay = Replay {
            stale,
            ..Default::default()
        };
        if !deferred.is_empty() {
            debug!("Replaying {} deferred operations", deferred.len());
        }
        for task in deferred {
            match task(self) {
                Ok(()) => replay.ran += 1,
                Err(err) => {
                    warn!("Deferred operation failed: {err}");
                    replay.failed.push(err);
                }
            }
        }
        replay
    }

    fn gated<T: 'static>(
        &mut self,
        task: impl FnOnce(&mut Self) -> Result<T> + 'static,
    ) -> Result<Dispatch<T>> {
        if self.gate.is_open() {
            return task(self).map(Dispatch::Ran);
        }
        let deferred: Task<H> = Box::new(move |app: &mut Self| task(app).map(|_| ()));
        self.gate.defer(deferred).map_err(|_| Error::NotReady)?;
        debug!("Glossary not ready, {} operations deferred", self.gate.pending());
        Ok(Dispatch::Queued)
    }

    /// Annotate the inner markup of `source` in place.
    pub fn parse_element(
        &mut self,
        source: &str,
        occurrences: Occurrences,
        target: ClickTarget,
    ) -> Result<Dispatch<()>> {
        let source = Selector::new(source);
        self.gated(move |app| {
            let html = app.host.read(&source)?;
            let annotated = app.annotate(&html, occurrences, &target)?;
            app.host.write(&source, annotated)
        })
    }

    /// Insert an index of the entries found in `source` (the whole glossary if `None`) into
    /// `target` (the source element if `None`).
    pub fn insert_index(
        &mut self,
        source: Option<&str>,
        target: Option<&str>,
        placement: Placement,
        linked: bool,
    ) -> Result<Dispatch<()>> {
        let (source, target) = resolve_selectors(source, target);
        self.gated(move |app| {
            let text = app.read_source(source.as_ref())?;
            let index = app.build_index(&text, linked)?;
            app.insert(target.as_ref(), placement, &index)
        })
    }

    /// Insert the explanations of the entries found in `source` into `target`, resolved like
    /// [`Self::insert_index`].
    pub fn insert_word_list(
        &mut self,
        source: Option<&str>,
        target: Option<&str>,
        placement: Placement,
    ) -> Result<Dispatch<()>> {
        let (source, target) = resolve_selectors(source, target);
        self.gated(move |app| {
            let text = app.read_source(source.as_ref())?;
            let list = app.build_glossary_list(&text)?;
            app.insert(target.as_ref(), placement, &list)
        })
    }

    /// Add a word that is not part of the fetched glossary. Survives refreshes.
    pub fn add_word(&mut self, word: NewEntry) -> Result<Dispatch<EntryId>> {
        self.gated(move |app| {
            let id = app.store.add_word(word)?;
            info!("Added word {id}");
            Ok(id)
        })
    }

    fn read_source(&self, source: Option<&Selector>) -> Result<String> {
        source.map_or_else(|| Ok(String::new()), |s| self.host.read(s))
    }

    fn insert(&mut self, target: Option<&Selector>, placement: Placement, markup: &str) -> Result<()> {
        let target = target.ok_or_else(|| Error::MissingElement(String::new()))?;
        let existing = match placement {
            Placement::Replace => String::new(),
            Placement::Append | Placement::Prepend => self.host.read(target)?,
        };
        self.host.write(target, placement.apply(&existing, markup))
    }

    fn ensure_ready(&self) -> Result<()> {
        if self.gate.is_open() {
            Ok(())
        } else {
            Err(Error::NotReady)
        }
    }

    fn annotator(&self) -> Result<Annotator<'_>> {
        Annotator::new(&self.store, &self.exclude, self.dispatcher.handle())
    }

    pub fn annotate(
        &self,
        text: &str,
        occurrences: Occurrences,
        target: &ClickTarget,
    ) -> Result<String> {
        self.ensure_ready()?;
        Ok(self.annotator()?.annotate(text, occurrences, target))
    }

    pub fn find_entry_ids(&self, text: &str) -> Result<Set<EntryId>> {
        self.ensure_ready()?;
        Ok(find_entry_ids(&self.store, text, &self.exclude))
    }

    pub fn build_index(&self, text: &str, linked: bool) -> Result<String> {
        self.ensure_ready()?;
        Ok(views::build_index(
            &self.store,
            text,
            &self.exclude,
            self.config.language,
            linked,
        ))
    }

    pub fn build_glossary_list(&self, text: &str) -> Result<String> {
        self.ensure_ready()?;
        Ok(views::build_glossary_list(
            &self.store,
            text,
            &self.exclude,
            self.config.language,
        ))
    }

    /// Route a click on a marker to the popup or to the named callback.
    pub fn click(&self, id: EntryId, name: &str) -> Result<()> {
        self.dispatcher.dispatch(&self.store, id, name)
    }
}

impl<H> Enlighten<H> {
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Change the language or the excluded ids. A new language takes effect with the next
    /// refresh.
    pub fn configure(&mut self, update: ConfigUpdate) {
        let language = self.config.language;
        self.config.apply(update);
        if self.config.language != language {
            debug!("Language changed {language} -> {}", self.config.language);
        }
        self.exclude = self.config.exclude.iter().copied().collect();
    }

    pub fn state(&self) -> GateState {
        self.gate.state()
    }

    pub fn is_ready(&self) -> bool {
        self.gate.is_open()
    }

    pub const fn store(&self) -> &GlossaryStore {
        &self.store
    }

    pub fn get_word(&self, id: EntryId) -> Option<&GlossaryEntry> {
        self.store.get(id)
    }

    pub fn cache(&self) -> &dyn Cache {
        self.cache.as_ref()
    }

    pub const fn dispatcher_mut(&mut self) -> &mut ClickDispatcher {
        &mut self.dispatcher
    }

    pub const fn host(&self) -> &H {
        &self.host
    }

    pub const fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }
}

fn resolve_selectors(source: Option<&str>, target: Option<&str>) -> (Option<Selector>, Option<Selector>) {
    let source = source.map(Selector::new);
    let target = target.map(Selector::new).or_else(|| source.clone());
    (source, target)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::cache::MemoryCache;
    use crate::download::StaticSource;
    use crate::glossary::tests::entry;
    use crate::host::MemoryHost;

    fn words() -> Vec<GlossaryEntry> {
        vec![
            entry(38, "Asexual", &["asexual"]),
            entry(54, "Gender", &["gender"]),
            entry(69, "Age", &["age"]),
        ]
    }

    fn cached(words: &[GlossaryEntry]) -> MemoryCache {
        let mut cache = MemoryCache::default();
        cache
            .set("enlighten_words_en", &serde_json::to_string(words).unwrap())
            .unwrap();
        cache
    }

    fn host() -> MemoryHost {
        MemoryHost::default()
            .with_element("text", "<p>Gender and age</p>")
            .with_element("index", "<h2>Index</h2>")
    }

    fn html(app: &Enlighten<MemoryHost>, id: &str) -> String {
        app.host().read(&Selector::new(id)).unwrap()
    }

    #[test]
    fn trusted_cache_is_ready() {
        let app = Enlighten::new(Config::default(), cached(&words()), host());
        assert!(app.is_ready());
        assert_eq!(app.get_word(54).unwrap().title, "Gender");
    }

    #[test]
    fn untrusted_cache_waits_for_refresh() {
        let config = Config {
            use_local_cache: false,
            ..Default::default()
        };
        let app = Enlighten::new(config, cached(&words()), host());
        assert!(!app.is_ready());
        // Words are loaded, just not trusted
        assert_eq!(app.store().words().len(), 3);
        assert!(matches!(app.annotate("age", Occurrences::All, &ClickTarget::Index), Err(Error::NotReady)));
    }

    #[test]
    fn corrupt_cache_is_ignored() {
        let mut cache = MemoryCache::default();
        cache.set("enlighten_words_en", "{not json").unwrap();
        let app = Enlighten::new(Config::default(), cache, host());
        assert!(!app.is_ready());
        assert!(app.store().words().is_empty());
    }

    #[test]
    fn deferred_operations_replay_in_order() {
        let mut app = Enlighten::new(Config::default(), MemoryCache::default(), host());
        assert_eq!(app.state(), GateState::Pending);

        let added = app
            .add_word(NewEntry::new("Intersex", &["intersex"], "About Intersex."))
            .unwrap();
        assert_eq!(added, Dispatch::Queued);
        app.host_mut()
            .write(&Selector::new("#text"), "<p>Intersex and gender</p>".to_string())
            .unwrap();
        let parsed = app
            .parse_element("#text", Occurrences::All, ClickTarget::Index)
            .unwrap();
        assert_eq!(parsed, Dispatch::Queued);
        assert_eq!(html(&app, "#text"), "<p>Intersex and gender</p>");

        let replay = app.refresh(&StaticSource(words())).unwrap();
        assert_eq!(replay.ran, 2);
        assert!(replay.failed.is_empty());
        assert!(!replay.stale);

        // The added word was in place before the element was parsed
        assert_eq!(
            html(&app, "#text"),
            "<p><a href='#ENLIGHT_WORD-1' class='enlighten-clickable'>Intersex</a> and \
             <a href='#ENLIGHT_WORD54' class='enlighten-clickable'>gender</a></p>"
        );
    }

    #[test]
    fn ready_operations_run_immediately() {
        let mut app = Enlighten::new(Config::default(), cached(&words()), host());
        let id = app
            .add_word(NewEntry::new("Intersex", &["intersex"], ""))
            .unwrap();
        assert_eq!(id, Dispatch::Ran(-1));

        let ran = app
            .insert_index(Some("#text"), Some("#index"), Placement::Append, true)
            .unwrap();
        assert_eq!(ran, Dispatch::Ran(()));
        assert_eq!(
            html(&app, "#index"),
            "<h2>Index</h2><div class=\"enlighten-index\">\n<ol>\n\
             <li><a href=\"#ENLIGHT_WORD69\">Age</a></li>\n\
             <li><a href=\"#ENLIGHT_WORD54\">Gender</a></li>\n\
             </ol>\n</div>\n"
        );
    }

    #[test]
    fn word_list_defaults_target_to_source() {
        let mut app = Enlighten::new(Config::default(), cached(&words()), host());
        app.insert_word_list(Some("#text"), None, Placement::Append)
            .unwrap();
        let html = html(&app, "#text");
        assert!(html.starts_with("<p>Gender and age</p><div class=\"enlighten-word-explainations\">"));
        assert!(html.contains("<h3>Age</h3>"));
        assert!(!html.contains("<h3>Asexual</h3>"));
    }

    #[test]
    fn whole_glossary_needs_a_target() {
        let mut app = Enlighten::new(Config::default(), cached(&words()), host());
        assert!(matches!(
            app.insert_index(None, None, Placement::Prepend, true),
            Err(Error::MissingElement(_))
        ));

        app.insert_index(None, Some("#index"), Placement::Replace, false)
            .unwrap();
        assert_eq!(html(&app, "#index").matches("<li>").count(), 3);
    }

    #[test]
    fn refresh_writes_cache() {
        let mut app = Enlighten::new(Config::default(), MemoryCache::default(), host());
        app.refresh(&StaticSource(words())).unwrap();
        let json = app.cache().get("enlighten_words_en").unwrap();
        let cached: Vec<GlossaryEntry> = serde_json::from_str(&json).unwrap();
        assert_eq!(cached, words());
    }

    #[test]
    fn failed_refresh_keeps_cached_words() {
        let config = Config {
            use_local_cache: false,
            ..Default::default()
        };
        let mut app = Enlighten::new(config, cached(&words()), host());
        app.parse_element("#text", Occurrences::First, ClickTarget::Index)
            .unwrap();

        let replay = app
            .complete_refresh(Err(Error::Network("offline".to_string())))
            .unwrap();
        assert!(replay.stale);
        assert_eq!(replay.ran, 1);
        assert!(app.is_ready());
        assert!(html(&app, "#text").contains("#ENLIGHT_WORD54"));
    }

    #[test]
    fn failed_refresh_without_cache_drops_queue() {
        let mut app = Enlighten::new(Config::default(), MemoryCache::default(), host());
        app.parse_element("#text", Occurrences::All, ClickTarget::Index)
            .unwrap();
        app.insert_index(None, Some("#index"), Placement::Prepend, true)
            .unwrap();

        let err = app
            .complete_refresh(Err(Error::Network("offline".to_string())))
            .unwrap_err();
        assert!(matches!(err, Error::Unavailable { dropped: 2, .. }));
        assert_eq!(app.state(), GateState::Failed);
        assert_eq!(html(&app, "#text"), "<p>Gender and age</p>");

        assert!(matches!(
            app.parse_element("#text", Occurrences::All, ClickTarget::Index),
            Err(Error::NotReady)
        ));

        // A later successful refresh recovers
        app.refresh(&StaticSource(words())).unwrap();
        assert!(app.is_ready());
    }

    #[test]
    fn empty_glossary_is_a_failure() {
        let mut app = Enlighten::new(Config::default(), MemoryCache::default(), host());
        let err = app.refresh(&StaticSource(Vec::new())).unwrap_err();
        match err {
            Error::Unavailable { dropped, source } => {
                assert_eq!(dropped, 0);
                assert!(matches!(*source, Error::EmptyGlossary));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn deferred_failure_is_reported() {
        let mut app = Enlighten::new(Config::default(), MemoryCache::default(), host());
        app.parse_element("#missing", Occurrences::All, ClickTarget::Index)
            .unwrap();
        app.parse_element("#text", Occurrences::All, ClickTarget::Index)
            .unwrap();
        let replay = app.refresh(&StaticSource(words())).unwrap();
        assert_eq!(replay.ran, 1);
        assert!(matches!(replay.failed.as_slice(), [Error::MissingElement(s)] if s == "#missing"));
    }

    #[test]
    fn configure_exclude() {
        let mut app = Enlighten::new(Config::default(), cached(&words()), host());
        app.configure(ConfigUpdate {
            exclude: Some(vec![54]),
            ..Default::default()
        });
        let ids = app.find_entry_ids("gender and age").unwrap();
        assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![69]);
    }

    #[test]
    fn click_reaches_popup() {
        let mut app = Enlighten::new(Config::default(), cached(&words()), host());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        app.dispatcher_mut()
            .set_popup(move |id, title, _| sink.borrow_mut().push((id, title.to_string())));

        let marked = app
            .annotate("age", Occurrences::All, &ClickTarget::Popup)
            .unwrap();
        assert_eq!(
            marked,
            "<a onClick='enlightenPopup(69,\"_defaultPopup\")' class='enlighten-clickable'>age</a>"
        );

        app.click(69, "_defaultPopup").unwrap();
        assert_eq!(*seen.borrow(), vec![(69, "Age".to_string())]);
        assert!(matches!(app.click(1, "_defaultPopup"), Err(Error::UnknownEntry(1))));
    }
}
