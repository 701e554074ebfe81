//! Metadata fetcher: fills display targets with project version and
//! download information.
//!
//! ### Resolution order per target
//! 1. No slug: render the unknown placeholder and stop.
//! 2. Fresh cache entry: render it, no network.
//! 3. Otherwise render the loading state and retrieve the summary and the
//!    version list, in that order.
//! 4. On success, cache and render the result, then load the icon behind a
//!    transient indicator.
//! 5. On failure, render the cached entry marked stale, or the placeholder.
//!
//! ### Pacing
//! Targets are resolved one at a time. A short pause follows every cache
//! hit and a longer one follows every network-driven render. Failures are
//! never retried.

pub mod icon;
pub mod render;
pub mod source;
pub mod target;

pub use icon::{HttpIconLoader, IconLoader, IconOutcome};
pub use render::{DisplayState, Renderer, ViewModel, format_count, status_line};
pub use source::{MetadataSource, ProjectMetadata, fetch_metadata};
pub use target::{Target, slug_from_link};

use amble_core::{CacheEntry, Clock, KeyValueStore, MetadataCache, SystemClock};
use std::sync::Arc;
use std::time::Duration;

/// Fixed pauses between targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub after_cache_hit: Duration,
    pub after_network: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self { after_cache_hit: Duration::from_millis(60), after_network: Duration::from_millis(120) }
    }
}

impl Pacing {
    /// No pauses at all.
    pub fn none() -> Self {
        Self { after_cache_hit: Duration::ZERO, after_network: Duration::ZERO }
    }

    fn after(&self, resolution: Resolution) -> Duration {
        match resolution {
            Resolution::Unresolved => Duration::ZERO,
            Resolution::CacheHit => self.after_cache_hit,
            Resolution::Fetched | Resolution::StaleFallback | Resolution::Failed => self.after_network,
        }
    }
}

/// How a target ended up being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// No slug could be determined.
    Unresolved,
    /// Served from a fresh cache entry.
    CacheHit,
    /// Retrieved from the source and cached.
    Fetched,
    /// Retrieval failed; a stale entry was shown.
    StaleFallback,
    /// Retrieval failed and nothing was cached.
    Failed,
}

/// Resolves targets against a cache and a remote source.
pub struct MetadataFetcher<Src, S, L> {
    source: Src,
    icons: L,
    cache: MetadataCache<S>,
    clock: Arc<dyn Clock>,
    pacing: Pacing,
}

impl<Src, S, L> MetadataFetcher<Src, S, L>
where
    Src: MetadataSource,
    S: KeyValueStore,
    L: IconLoader,
{
    pub fn new(source: Src, icons: L, cache: MetadataCache<S>) -> Self {
        Self { source, icons, cache, clock: Arc::new(SystemClock), pacing: Pacing::default() }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn cache(&self) -> &MetadataCache<S> {
        &self.cache
    }

    /// Resolve and render a single target. Never fails; see [`Resolution`].
    pub async fn resolve<R>(&mut self, target: &Target, renderer: &mut R) -> Resolution
    where
        R: Renderer + ?Sized,
    {
        let Some(slug) = target.resolve_slug() else {
            tracing::debug!(?target, "no slug for target");
            renderer.render(target, &ViewModel::unknown());
            return Resolution::Unresolved;
        };

        if let Some(entry) = self.cache.fresh(&slug, self.clock.now()) {
            tracing::debug!(slug, "metadata cache hit");
            renderer.render(target, &ViewModel::ready(&entry.version_label, entry.download_count));
            if let Some(icon) = &entry.icon_reference {
                renderer.set_icon(target, icon);
            }
            return Resolution::CacheHit;
        }

        renderer.render(target, &ViewModel::loading());

        match fetch_metadata(&self.source, &slug).await {
            Ok(meta) => {
                let entry = CacheEntry::new(
                    slug.as_str(),
                    meta.version_label.as_str(),
                    Some(meta.downloads),
                    meta.icon.clone(),
                    self.clock.now(),
                );
                if let Err(e) = self.cache.insert(entry).await {
                    tracing::warn!(slug, error = %e, "failed to persist metadata cache");
                }

                renderer.render(target, &ViewModel::ready(&meta.version_label, Some(meta.downloads)));
                if let Some(icon) = &meta.icon {
                    self.load_icon(target, icon, renderer).await;
                }
                Resolution::Fetched
            }
            Err(e) => {
                tracing::warn!(slug, error = %e, "failed to fetch project metadata");
                match self.cache.get(&slug) {
                    Some(entry) => {
                        renderer.render(target, &ViewModel::stale(&entry.version_label, entry.download_count));
                        if let Some(icon) = &entry.icon_reference {
                            renderer.set_icon(target, icon);
                        }
                        Resolution::StaleFallback
                    }
                    None => {
                        renderer.render(target, &ViewModel::unknown());
                        Resolution::Failed
                    }
                }
            }
        }
    }

    async fn load_icon<R>(&self, target: &Target, icon: &str, renderer: &mut R)
    where
        R: Renderer + ?Sized,
    {
        renderer.set_loading_indicator(target, true);
        let outcome = self.icons.load(icon).await;
        if outcome == IconOutcome::Loaded {
            renderer.set_icon(target, icon);
        } else {
            tracing::debug!(icon, "icon failed to load, keeping fallback");
        }
        renderer.set_loading_indicator(target, false);
    }

    /// Resolve every target in order, pausing between them.
    pub async fn resolve_all<R>(&mut self, targets: &[Target], renderer: &mut R) -> Vec<Resolution>
    where
        R: Renderer + ?Sized,
    {
        let mut resolutions = Vec::with_capacity(targets.len());
        for target in targets {
            let resolution = self.resolve(target, renderer).await;
            resolutions.push(resolution);

            let pause = self.pacing.after(resolution);
            if !pause.is_zero() {
                tokio::time::sleep(pause).await;
            }
        }
        resolutions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modrinth::{ModrinthError, Project, Version};
    use amble_core::metadata::{CACHE_KEY, DEFAULT_TTL};
    use amble_core::{ManualClock, MemoryStore};
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeSource {
        projects: HashMap<String, Result<Project, ModrinthError>>,
        versions: HashMap<String, Result<Vec<Version>, ModrinthError>>,
        project_calls: AtomicUsize,
        version_calls: AtomicUsize,
    }

    impl FakeSource {
        fn with_project(mut self, slug: &str, json: &str) -> Self {
            self.projects.insert(slug.into(), Ok(serde_json::from_str(json).unwrap()));
            self
        }

        fn with_versions(mut self, slug: &str, json: &str) -> Self {
            self.versions.insert(slug.into(), Ok(serde_json::from_str(json).unwrap()));
            self
        }

        fn failing_project(mut self, slug: &str) -> Self {
            self.projects.insert(slug.into(), Err(ModrinthError::HttpError { status: 503 }));
            self
        }

        fn calls(&self) -> usize {
            self.project_calls.load(Ordering::SeqCst) + self.version_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MetadataSource for FakeSource {
        async fn project(&self, slug: &str) -> Result<Project, ModrinthError> {
            self.project_calls.fetch_add(1, Ordering::SeqCst);
            self.projects.get(slug).cloned().unwrap_or_else(|| Err(ModrinthError::NotFound(slug.into())))
        }

        async fn versions(&self, slug: &str) -> Result<Vec<Version>, ModrinthError> {
            self.version_calls.fetch_add(1, Ordering::SeqCst);
            self.versions.get(slug).cloned().unwrap_or_else(|| Err(ModrinthError::Timeout))
        }
    }

    struct FakeIcons {
        outcome: IconOutcome,
        requested: Mutex<Vec<String>>,
    }

    impl FakeIcons {
        fn new(outcome: IconOutcome) -> Self {
            Self { outcome, requested: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl IconLoader for FakeIcons {
        async fn load(&self, uri: &str) -> IconOutcome {
            self.requested.lock().unwrap().push(uri.to_string());
            self.outcome
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Render(DisplayState, String),
        Icon(String),
        Indicator(bool),
    }

    #[derive(Default)]
    struct RecordingRenderer {
        events: Vec<Event>,
    }

    impl RecordingRenderer {
        fn last_text(&self) -> Option<&str> {
            self.events.iter().rev().find_map(|e| match e {
                Event::Render(_, text) => Some(text.as_str()),
                _ => None,
            })
        }

        fn last_state(&self) -> Option<DisplayState> {
            self.events.iter().rev().find_map(|e| match e {
                Event::Render(state, _) => Some(*state),
                _ => None,
            })
        }

        fn icons(&self) -> Vec<&str> {
            self.events
                .iter()
                .filter_map(|e| match e {
                    Event::Icon(uri) => Some(uri.as_str()),
                    _ => None,
                })
                .collect()
        }

        fn indicators(&self) -> Vec<bool> {
            self.events
                .iter()
                .filter_map(|e| match e {
                    Event::Indicator(visible) => Some(*visible),
                    _ => None,
                })
                .collect()
        }
    }

    impl Renderer for RecordingRenderer {
        fn render(&mut self, _target: &Target, view: &ViewModel) {
            self.events.push(Event::Render(view.state, view.text.clone()));
        }

        fn set_icon(&mut self, _target: &Target, uri: &str) {
            self.events.push(Event::Icon(uri.to_string()));
        }

        fn set_loading_indicator(&mut self, _target: &Target, visible: bool) {
            self.events.push(Event::Indicator(visible));
        }
    }

    const SAMPLE_PROJECT: &str = r#"{"downloads": 42, "icon_url": "x.png"}"#;
    const SAMPLE_VERSIONS: &str = r#"[{"version_number": "1.0.0", "date_published": "2024-01-01"}]"#;

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z").unwrap().with_timezone(&Utc)
    }

    async fn fetcher_with(
        source: FakeSource, icons: FakeIcons, store: MemoryStore,
    ) -> (MetadataFetcher<FakeSource, MemoryStore, FakeIcons>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(t0()));
        let cache = MetadataCache::load(store, DEFAULT_TTL).await;
        let fetcher = MetadataFetcher::new(source, icons, cache)
            .with_clock(clock.clone())
            .with_pacing(Pacing::none());
        (fetcher, clock)
    }

    async fn seeded_store(slug: &str, entry: CacheEntry) -> MemoryStore {
        let store = MemoryStore::new();
        let blob = serde_json::to_string(&HashMap::from([(slug.to_string(), entry)])).unwrap();
        store.set(CACHE_KEY, &blob).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_end_to_end_sample_mod() {
        let source = FakeSource::default()
            .with_project("sample-mod", SAMPLE_PROJECT)
            .with_versions("sample-mod", SAMPLE_VERSIONS);
        let (mut fetcher, _) = fetcher_with(source, FakeIcons::new(IconOutcome::Loaded), MemoryStore::new()).await;
        let mut renderer = RecordingRenderer::default();

        let resolution = fetcher.resolve(&Target::from_slug("sample-mod"), &mut renderer).await;

        assert_eq!(resolution, Resolution::Fetched);
        assert_eq!(
            renderer.events,
            vec![
                Event::Render(DisplayState::Loading, "Loading…".into()),
                Event::Render(DisplayState::Ready, "Version: 1.0.0 • Downloads: 42".into()),
                Event::Indicator(true),
                Event::Icon("x.png".into()),
                Event::Indicator(false),
            ]
        );
    }

    #[tokio::test]
    async fn test_fresh_entry_skips_network() {
        let entry = CacheEntry::new("ait", "2.1.0", Some(1_234_567), Some("ait.png".into()), t0());
        let store = seeded_store("ait", entry).await;
        let (mut fetcher, clock) = fetcher_with(FakeSource::default(), FakeIcons::new(IconOutcome::Loaded), store).await;
        clock.advance(chrono::Duration::hours(11));
        let mut renderer = RecordingRenderer::default();

        let resolution = fetcher.resolve(&Target::from_slug("ait"), &mut renderer).await;

        assert_eq!(resolution, Resolution::CacheHit);
        assert_eq!(fetcher.source.calls(), 0);
        assert_eq!(renderer.last_text(), Some("Version: 2.1.0 • Downloads: 1,234,567"));
        assert_eq!(renderer.icons(), vec!["ait.png"]);
        assert!(renderer.indicators().is_empty());
        assert!(fetcher.icons.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_miss_creates_one_entry_with_call_time() {
        let source = FakeSource::default()
            .with_project("sample-mod", SAMPLE_PROJECT)
            .with_versions("sample-mod", SAMPLE_VERSIONS);
        let store = MemoryStore::new();
        let (mut fetcher, _) = fetcher_with(source, FakeIcons::new(IconOutcome::Loaded), store.clone()).await;

        fetcher.resolve(&Target::from_slug("sample-mod"), &mut RecordingRenderer::default()).await;

        assert_eq!(fetcher.cache().len(), 1);
        let entry = fetcher.cache().get("sample-mod").unwrap();
        assert_eq!(entry.version_label, "1.0.0");
        assert_eq!(entry.download_count, Some(42));
        assert_eq!(entry.icon_reference.as_deref(), Some("x.png"));
        assert_eq!(entry.fetched_at(), Some(t0()));

        let persisted = MetadataCache::load(store, DEFAULT_TTL).await;
        assert_eq!(persisted.get("sample-mod"), Some(entry));
    }

    #[tokio::test]
    async fn test_second_resolve_is_cache_hit() {
        let source = FakeSource::default()
            .with_project("sample-mod", SAMPLE_PROJECT)
            .with_versions("sample-mod", SAMPLE_VERSIONS);
        let (mut fetcher, _) = fetcher_with(source, FakeIcons::new(IconOutcome::Loaded), MemoryStore::new()).await;
        let target = Target::from_slug("sample-mod");

        let first = fetcher.resolve(&target, &mut RecordingRenderer::default()).await;
        let second = fetcher.resolve(&target, &mut RecordingRenderer::default()).await;

        assert_eq!((first, second), (Resolution::Fetched, Resolution::CacheHit));
        assert_eq!(fetcher.source.project_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_stale_entry() {
        let entry = CacheEntry::new("ait", "1.9.0", Some(1500), Some("old.png".into()), t0());
        let store = seeded_store("ait", entry).await;
        let source = FakeSource::default().failing_project("ait");
        let (mut fetcher, clock) = fetcher_with(source, FakeIcons::new(IconOutcome::Loaded), store).await;
        clock.advance(chrono::Duration::hours(13));
        let mut renderer = RecordingRenderer::default();

        let resolution = fetcher.resolve(&Target::from_slug("ait"), &mut renderer).await;

        assert_eq!(resolution, Resolution::StaleFallback);
        assert_eq!(renderer.last_state(), Some(DisplayState::Stale));
        assert_eq!(renderer.last_text(), Some("Version: 1.9.0 • Downloads: 1,500 (stale)"));
        assert_eq!(renderer.icons(), vec!["old.png"]);
        assert!(renderer.indicators().is_empty());
        assert_eq!(fetcher.cache().get("ait").unwrap().fetched_at(), Some(t0()));
    }

    #[tokio::test]
    async fn test_failure_without_entry_renders_placeholder() {
        let source = FakeSource::default().failing_project("ghost");
        let (mut fetcher, _) = fetcher_with(source, FakeIcons::new(IconOutcome::Loaded), MemoryStore::new()).await;
        let mut renderer = RecordingRenderer::default();

        let resolution = fetcher.resolve(&Target::from_slug("ghost"), &mut renderer).await;

        assert_eq!(resolution, Resolution::Failed);
        assert_eq!(renderer.last_state(), Some(DisplayState::Unknown));
        assert_eq!(renderer.last_text(), Some("Version: — • Downloads: —"));
        assert!(fetcher.cache().is_empty());
    }

    #[tokio::test]
    async fn test_unresolvable_target_never_hits_network() {
        let (mut fetcher, _) =
            fetcher_with(FakeSource::default(), FakeIcons::new(IconOutcome::Loaded), MemoryStore::new()).await;
        let mut renderer = RecordingRenderer::default();

        let target = Target::from_link("https://modrinth.com/");
        let resolution = fetcher.resolve(&target, &mut renderer).await;

        assert_eq!(resolution, Resolution::Unresolved);
        assert_eq!(renderer.events, vec![Event::Render(DisplayState::Unknown, "Version: — • Downloads: —".into())]);
        assert_eq!(fetcher.source.calls(), 0);
    }

    #[tokio::test]
    async fn test_version_list_failure_uses_embedded_versions() {
        let source = FakeSource::default().with_project("ait", r#"{"downloads": 7, "versions": ["EMBEDDED1"]}"#);
        let (mut fetcher, _) = fetcher_with(source, FakeIcons::new(IconOutcome::Loaded), MemoryStore::new()).await;
        let mut renderer = RecordingRenderer::default();

        let resolution = fetcher.resolve(&Target::from_slug("ait"), &mut renderer).await;

        assert_eq!(resolution, Resolution::Fetched);
        assert_eq!(renderer.last_text(), Some("Version: EMBEDDED1 • Downloads: 7"));
    }

    #[tokio::test]
    async fn test_version_list_failure_without_embedded_is_unknown() {
        let source = FakeSource::default().with_project("ait", r#"{"downloads": 7}"#);
        let (mut fetcher, _) = fetcher_with(source, FakeIcons::new(IconOutcome::Loaded), MemoryStore::new()).await;
        let mut renderer = RecordingRenderer::default();

        fetcher.resolve(&Target::from_slug("ait"), &mut renderer).await;

        assert_eq!(renderer.last_text(), Some("Version: — • Downloads: 7"));
        assert!(renderer.icons().is_empty());
        assert!(renderer.indicators().is_empty());
    }

    #[tokio::test]
    async fn test_newest_version_selected() {
        let source = FakeSource::default().with_project("ait", r#"{"downloads": 1}"#).with_versions(
            "ait",
            r#"[
                {"version_number": "a", "date_published": "2023-01-01"},
                {"version_number": "b", "date_published": "2024-06-01"},
                {"version_number": "c", "date_published": "2023-12-31"}
            ]"#,
        );
        let (mut fetcher, _) = fetcher_with(source, FakeIcons::new(IconOutcome::Loaded), MemoryStore::new()).await;

        fetcher.resolve(&Target::from_slug("ait"), &mut RecordingRenderer::default()).await;

        assert_eq!(fetcher.cache().get("ait").unwrap().version_label, "b");
    }

    #[tokio::test]
    async fn test_malformed_summary_prefers_stale_entry() {
        let entry = CacheEntry::new("ait", "1.0", Some(10), None, t0());
        let store = seeded_store("ait", entry).await;
        let source = FakeSource::default()
            .with_project("ait", r#"{"icon_url": "new.png"}"#)
            .with_versions("ait", SAMPLE_VERSIONS);
        let (mut fetcher, clock) = fetcher_with(source, FakeIcons::new(IconOutcome::Loaded), store).await;
        clock.advance(chrono::Duration::days(2));
        let mut renderer = RecordingRenderer::default();

        let resolution = fetcher.resolve(&Target::from_slug("ait"), &mut renderer).await;

        assert_eq!(resolution, Resolution::StaleFallback);
        assert_eq!(renderer.last_text(), Some("Version: 1.0 • Downloads: 10 (stale)"));
    }

    #[tokio::test]
    async fn test_icon_failure_keeps_fallback_and_clears_indicator() {
        let source = FakeSource::default()
            .with_project("sample-mod", SAMPLE_PROJECT)
            .with_versions("sample-mod", SAMPLE_VERSIONS);
        let (mut fetcher, _) = fetcher_with(source, FakeIcons::new(IconOutcome::Failed), MemoryStore::new()).await;
        let mut renderer = RecordingRenderer::default();

        let resolution = fetcher.resolve(&Target::from_slug("sample-mod"), &mut renderer).await;

        assert_eq!(resolution, Resolution::Fetched);
        assert!(renderer.icons().is_empty());
        assert_eq!(renderer.indicators(), vec![true, false]);
        assert_eq!(fetcher.icons.requested.lock().unwrap().as_slice(), ["x.png".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolve_all_is_sequential_and_paced() {
        let entry = CacheEntry::new("cached", "1.0", Some(1), None, t0());
        let store = seeded_store("cached", entry).await;
        let source = FakeSource::default()
            .with_project("sample-mod", SAMPLE_PROJECT)
            .with_versions("sample-mod", SAMPLE_VERSIONS)
            .failing_project("broken");
        let (fetcher, _) = fetcher_with(source, FakeIcons::new(IconOutcome::Loaded), store).await;
        let mut fetcher = fetcher.with_pacing(Pacing::default());
        let mut renderer = RecordingRenderer::default();

        let targets = vec![
            Target::from_slug("cached"),
            Target::default(),
            Target::from_slug("sample-mod"),
            Target::from_slug("broken"),
        ];

        let start = tokio::time::Instant::now();
        let resolutions = fetcher.resolve_all(&targets, &mut renderer).await;

        assert_eq!(
            resolutions,
            vec![Resolution::CacheHit, Resolution::Unresolved, Resolution::Fetched, Resolution::Failed]
        );
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(60 + 120 + 120), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_millis(310), "elapsed {elapsed:?}");
    }
}
