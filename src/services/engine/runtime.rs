//! Thread-backed runtime around [`EngineCore`]: owns the fast tick loop,
//! start/stop lifecycle, and the shared locale selector.
//!
//! Fetches run on short-lived helper threads and deliver their result over a
//! channel, so a slow or hanging fetch delays nothing: the tick loop keeps
//! rendering from the current snapshot, and the result is applied (or a
//! failure recorded) only from the loop thread. When the engine is torn down
//! the receiving end disappears with it, so a fetch completing after teardown
//! is discarded instead of writing into a dead store.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};
use std::time::Duration as StdDuration;

use anyhow::{Context, Result};
use chrono::Local;

use crate::models::context::DisplayContext;
use crate::models::locale::Locale;
use crate::models::schedule::ScheduleFeed;
use crate::models::settings::EngineSettings;
use crate::services::schedule::fetcher::{FetchError, ScheduleFetcher};

use super::core::EngineCore;
use super::CountdownRenderer;

type FetchResult = Result<ScheduleFeed, FetchError>;

/// Locale selector shared between the engine thread and whoever owns the
/// language toggle. Lock-free; a switch takes effect on the next tick.
#[derive(Debug, Clone)]
pub struct SharedLocale(Arc<AtomicU8>);

impl SharedLocale {
    pub fn new(locale: Locale) -> Self {
        Self(Arc::new(AtomicU8::new(Self::encode(locale))))
    }

    pub fn get(&self) -> Locale {
        Self::decode(self.0.load(Ordering::Relaxed))
    }

    pub fn set(&self, locale: Locale) {
        self.0.store(Self::encode(locale), Ordering::Relaxed);
    }

    fn encode(locale: Locale) -> u8 {
        match locale {
            Locale::Ar => 0,
            Locale::Bn => 1,
        }
    }

    fn decode(value: u8) -> Locale {
        match value {
            1 => Locale::Bn,
            _ => Locale::Ar,
        }
    }
}

/// Owns the engine loop thread. All countdown state lives on that single
/// thread; the only cross-thread pieces are the stop flag, the locale
/// selector (both atomic) and the fetch-result channel.
pub struct CountdownEngine {
    settings: EngineSettings,
    contexts: Vec<DisplayContext>,
    fetcher: Arc<dyn ScheduleFetcher>,
    renderer: Arc<dyn CountdownRenderer>,
    locale: SharedLocale,
    stop_flag: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl CountdownEngine {
    pub fn new(
        settings: EngineSettings,
        contexts: Vec<DisplayContext>,
        fetcher: Arc<dyn ScheduleFetcher>,
        renderer: Arc<dyn CountdownRenderer>,
    ) -> Self {
        let locale = SharedLocale::new(settings.language);
        Self {
            settings,
            contexts,
            fetcher,
            renderer,
            locale,
            stop_flag: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    /// Handle for the language toggle; cloneable and usable from any thread.
    pub fn locale(&self) -> SharedLocale {
        self.locale.clone()
    }

    pub fn set_locale(&self, locale: Locale) {
        self.locale.set(locale);
    }

    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Spawn the engine loop. Idempotent: starting a running engine is a
    /// no-op rather than a second loop.
    pub fn start(&mut self) -> Result<()> {
        if self.is_running() {
            log::debug!("Countdown engine already running, start is a no-op");
            return Ok(());
        }

        self.stop_flag.store(false, Ordering::SeqCst);

        let tick_interval = self.settings.tick_interval();
        let mut core = EngineCore::new(self.contexts.clone(), self.settings.refresh_interval());
        let fetcher = Arc::clone(&self.fetcher);
        let renderer = Arc::clone(&self.renderer);
        let locale = self.locale.clone();
        let stop_flag = Arc::clone(&self.stop_flag);

        let handle = thread::Builder::new()
            .name("countdown-engine".to_string())
            .spawn(move || {
                log::info!("Countdown engine started");
                let (result_tx, result_rx) = mpsc::channel();
                let mut fetch_in_flight = false;

                while !stop_flag.load(Ordering::SeqCst) {
                    let now = Local::now();

                    // Apply any completed fetches. Replacement happens here,
                    // on the loop thread, as one atomic assignment.
                    while let Ok(result) = result_rx.try_recv() {
                        core.apply_fetch(result, now);
                        fetch_in_flight = false;
                    }

                    if !fetch_in_flight && core.refresh_due(now) {
                        fetch_in_flight = launch_fetch(&fetcher, &result_tx);
                    }

                    core.tick_at(now, renderer.as_ref(), locale.get());
                    sleep_with_stop(tick_interval, &stop_flag);
                }
                log::info!("Countdown engine stopped");
            })
            .context("Failed to spawn countdown engine thread")?;

        self.worker = Some(handle);
        Ok(())
    }

    /// Cancel the loop and wait for the thread to exit. Safe to call on a
    /// stopped engine. An in-flight fetch finishes on its own thread, bounded
    /// by the fetch timeout, and its result goes nowhere.
    pub fn stop(&mut self) {
        self.stop_flag.store(true, Ordering::SeqCst);
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                log::error!("Countdown engine thread panicked");
            }
        }
    }

    /// Block until the engine loop exits (it only does so via `stop`, so this
    /// effectively parks a daemon-style caller).
    pub fn join(&mut self) {
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                log::error!("Countdown engine thread panicked");
            }
        }
    }
}

impl Drop for CountdownEngine {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Run one fetch on a helper thread, reporting back over the channel.
/// Returns whether the fetch actually launched.
fn launch_fetch(fetcher: &Arc<dyn ScheduleFetcher>, result_tx: &mpsc::Sender<FetchResult>) -> bool {
    let fetcher = Arc::clone(fetcher);
    let result_tx = result_tx.clone();
    let spawned = thread::Builder::new()
        .name("schedule-fetch".to_string())
        .spawn(move || {
            // The send fails harmlessly if the engine was torn down meanwhile.
            let _ = result_tx.send(fetcher.fetch());
        });

    match spawned {
        Ok(_) => true,
        Err(err) => {
            log::error!("Failed to spawn schedule fetch thread: {}", err);
            false
        }
    }
}

/// Sleep in short slices so a stop request is honored promptly instead of
/// after a full tick period.
fn sleep_with_stop(total: StdDuration, stop_flag: &AtomicBool) {
    const SLICE: StdDuration = StdDuration::from_millis(50);
    let mut remaining = total;
    while !remaining.is_zero() && !stop_flag.load(Ordering::SeqCst) {
        let step = remaining.min(SLICE);
        thread::sleep(step);
        remaining -= step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schedule::ScheduleFeed;
    use crate::services::engine::RenderUpdate;
    use crate::services::schedule::fetcher::FetchError;
    use std::sync::atomic::AtomicUsize;

    /// Counts render calls; enough to observe that the loop is ticking.
    struct CountingRenderer {
        calls: AtomicUsize,
    }

    impl CountingRenderer {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl CountdownRenderer for CountingRenderer {
        fn render(&self, _context: &DisplayContext, _update: &RenderUpdate, _locale: Locale) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct EmptyFeedFetcher;

    impl ScheduleFetcher for EmptyFeedFetcher {
        fn fetch(&self) -> Result<ScheduleFeed, FetchError> {
            Ok(ScheduleFeed::default())
        }
    }

    fn fast_settings() -> EngineSettings {
        EngineSettings {
            feed_url: "https://farm.example/notifications.json".into(),
            tick_interval_ms: 10,
            ..EngineSettings::default()
        }
    }

    #[test]
    fn start_ticks_and_stop_terminates() {
        let renderer = CountingRenderer::new();
        let mut engine = CountdownEngine::new(
            fast_settings(),
            vec![DisplayContext::dashboard()],
            Arc::new(EmptyFeedFetcher),
            Arc::clone(&renderer) as Arc<dyn CountdownRenderer>,
        );

        engine.start().unwrap();
        assert!(engine.is_running());

        thread::sleep(StdDuration::from_millis(100));
        engine.stop();
        assert!(!engine.is_running());

        let rendered = renderer.calls.load(Ordering::SeqCst);
        assert!(rendered > 0, "engine never rendered (calls = {rendered})");

        // No further renders after stop.
        thread::sleep(StdDuration::from_millis(50));
        assert_eq!(renderer.calls.load(Ordering::SeqCst), rendered);
    }

    #[test]
    fn second_start_is_a_no_op() {
        let renderer = CountingRenderer::new();
        let mut engine = CountdownEngine::new(
            fast_settings(),
            vec![DisplayContext::dashboard()],
            Arc::new(EmptyFeedFetcher),
            Arc::clone(&renderer) as Arc<dyn CountdownRenderer>,
        );

        engine.start().unwrap();
        engine.start().unwrap();
        assert!(engine.is_running());
        engine.stop();
    }

    #[test]
    fn engine_can_restart_after_stop() {
        let renderer = CountingRenderer::new();
        let mut engine = CountdownEngine::new(
            fast_settings(),
            vec![DisplayContext::dashboard()],
            Arc::new(EmptyFeedFetcher),
            Arc::clone(&renderer) as Arc<dyn CountdownRenderer>,
        );

        engine.start().unwrap();
        engine.stop();
        let after_first_run = renderer.calls.load(Ordering::SeqCst);

        engine.start().unwrap();
        thread::sleep(StdDuration::from_millis(50));
        engine.stop();
        assert!(renderer.calls.load(Ordering::SeqCst) > after_first_run);
    }

    /// A fetcher that hangs until told to finish, proving the tick loop does
    /// not sit behind the fetch.
    struct BlockingFetcher {
        release: Arc<AtomicBool>,
    }

    impl ScheduleFetcher for BlockingFetcher {
        fn fetch(&self) -> Result<ScheduleFeed, FetchError> {
            while !self.release.load(Ordering::SeqCst) {
                thread::sleep(StdDuration::from_millis(5));
            }
            Ok(ScheduleFeed::default())
        }
    }

    #[test]
    fn stuck_fetch_does_not_block_rendering() {
        let release = Arc::new(AtomicBool::new(false));
        let renderer = CountingRenderer::new();
        let mut engine = CountdownEngine::new(
            fast_settings(),
            vec![DisplayContext::dashboard()],
            Arc::new(BlockingFetcher {
                release: Arc::clone(&release),
            }),
            Arc::clone(&renderer) as Arc<dyn CountdownRenderer>,
        );

        engine.start().unwrap();
        thread::sleep(StdDuration::from_millis(100));

        // The fetch has not returned, yet ticks kept rendering (Loading).
        assert!(renderer.calls.load(Ordering::SeqCst) >= 2);

        release.store(true, Ordering::SeqCst);
        engine.stop();
    }

    #[test]
    fn locale_switch_is_visible_across_handles() {
        let engine = CountdownEngine::new(
            fast_settings(),
            Vec::new(),
            Arc::new(EmptyFeedFetcher),
            CountingRenderer::new() as Arc<dyn CountdownRenderer>,
        );

        let handle = engine.locale();
        assert_eq!(handle.get(), Locale::Ar);
        engine.set_locale(Locale::Bn);
        assert_eq!(handle.get(), Locale::Bn);
    }
}
