//! Periodic sampler bound to a host lifetime
//!
//! A [`Sampler`] owns at most one background task. Once started, the task
//! waits one interval, asks its [`ValueSource`] for a reading and hands the
//! formatted reading to its [`Notifier`], over and over until stopped.
//! Stopping is cooperative: the wait is interrupted by the stop signal and
//! the state flag is checked again before every read, but a read that is
//! already running is allowed to finish.

use crate::notifier::SharedNotifier;
use crate::value_source::SharedValueSource;
use log::{debug, error, trace, warn};
use pulse_sens_types::{FailurePolicy, NotificationRequest, ReadError, Reading, SamplerConfig};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Lifecycle state of a [`Sampler`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SamplerState {
    /// Constructed, never started
    Idle = 0,
    /// Background task scheduled
    Running = 1,
    /// Stopped after running; may be started again
    Stopped = 2,
}

impl SamplerState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => SamplerState::Running,
            2 => SamplerState::Stopped,
            _ => SamplerState::Idle,
        }
    }
}

/// Errors returned when starting a sampler
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SamplerError {
    #[error("sampling interval must be greater than zero")]
    InvalidInterval,
    #[error("no tokio runtime available to run the sampler")]
    NoRuntime,
}

/// State visible to both the controlling side and the background task
struct Shared {
    state: AtomicU8,
    ticks: AtomicU64,
}

impl Shared {
    fn state(&self) -> SamplerState {
        SamplerState::from_u8(self.state.load(Ordering::SeqCst))
    }

    fn set_state(&self, state: SamplerState) {
        self.state.store(state as u8, Ordering::SeqCst);
    }
}

/// One scheduled background task and its stop signal
struct Run {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

/// Cancellable, indefinitely repeating sampling task
pub struct Sampler {
    shared: Arc<Shared>,
    run: Mutex<Option<Run>>,
    handle: Option<Handle>,
}

impl Sampler {
    /// Create an idle sampler that spawns onto the ambient tokio runtime when started
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Create an idle sampler that spawns onto the given runtime
    ///
    /// Use this when `start` is called from a thread that is not driven by tokio.
    pub fn with_handle(handle: Handle) -> Self {
        Self::build(Some(handle))
    }

    fn build(handle: Option<Handle>) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: AtomicU8::new(SamplerState::Idle as u8),
                ticks: AtomicU64::new(0),
            }),
            run: Mutex::new(None),
            handle,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> SamplerState {
        self.shared.state()
    }

    pub fn is_running(&self) -> bool {
        self.state() == SamplerState::Running
    }

    /// Number of readings delivered to a notifier since construction
    pub fn ticks(&self) -> u64 {
        self.shared.ticks.load(Ordering::SeqCst)
    }

    /// Start sampling every `interval` with default settings
    pub fn start_with_interval(
        &self,
        interval: Duration,
        source: SharedValueSource,
        sink: SharedNotifier,
    ) -> Result<SamplerState, SamplerError> {
        if interval.is_zero() {
            return Err(SamplerError::InvalidInterval);
        }
        let config = SamplerConfig::with_interval(interval);
        self.spawn_loop(interval, &config, source, sink)
    }

    /// Start sampling
    ///
    /// The first reading is taken one full interval after this call. Starting
    /// a running sampler is a no-op that returns the current state. On error
    /// the state is left unchanged.
    pub fn start(
        &self,
        config: &SamplerConfig,
        source: SharedValueSource,
        sink: SharedNotifier,
    ) -> Result<SamplerState, SamplerError> {
        let interval = config.interval();
        if interval.is_zero() {
            return Err(SamplerError::InvalidInterval);
        }
        self.spawn_loop(interval, config, source, sink)
    }

    /// Start sampling and return a guard that stops the sampler when dropped
    pub fn start_scoped(
        &self,
        config: &SamplerConfig,
        source: SharedValueSource,
        sink: SharedNotifier,
    ) -> Result<SamplerGuard<'_>, SamplerError> {
        self.start(config, source, sink)?;
        Ok(SamplerGuard { sampler: self })
    }

    /// Stop sampling
    ///
    /// Idempotent, and a no-op on a sampler that was never started. No new
    /// iteration is scheduled after this returns; the background task exits
    /// at its next suspension point.
    pub fn stop(&self) {
        if let Some(task) = self.halt() {
            // Detached: a read already in flight may still complete
            drop(task);
        }
    }

    /// Stop sampling and wait for the background task to finish
    pub async fn shutdown(&self) {
        if let Some(task) = self.halt() {
            if let Err(e) = task.await {
                error!("Sampler task failed during shutdown: {}", e);
            }
        }
    }

    fn spawn_loop(
        &self,
        interval: Duration,
        config: &SamplerConfig,
        source: SharedValueSource,
        sink: SharedNotifier,
    ) -> Result<SamplerState, SamplerError> {
        let mut run = self.lock_run();

        if self.shared.state() == SamplerState::Running {
            debug!("Sampler already running, ignoring start");
            return Ok(SamplerState::Running);
        }

        let handle = match &self.handle {
            Some(handle) => handle.clone(),
            None => Handle::try_current().map_err(|_| SamplerError::NoRuntime)?,
        };

        let (stop_tx, stop_rx) = watch::channel(false);
        let ctx = LoopContext {
            shared: self.shared.clone(),
            interval,
            label: config.label.clone(),
            read_timeout: config.read_timeout(),
            failure_policy: config.failure_policy,
            source,
            sink,
        };

        debug!(
            "Starting sampler for source '{}' every {:?}",
            ctx.source.metadata().id,
            interval
        );
        self.shared.set_state(SamplerState::Running);
        let task = handle.spawn(sample_loop(ctx, stop_rx));
        *run = Some(Run { stop_tx, task });

        Ok(SamplerState::Running)
    }

    /// Flip to Stopped, signal the task and hand back its join handle
    fn halt(&self) -> Option<JoinHandle<()>> {
        let mut run = self.lock_run();

        if self.shared.state() == SamplerState::Running {
            self.shared.set_state(SamplerState::Stopped);
            debug!("Sampler stopped");
        }

        let run = run.take()?;
        // The receiver may already be gone if the task exited on its own
        let _ = run.stop_tx.send(true);
        Some(run.task)
    }

    fn lock_run(&self) -> MutexGuard<'_, Option<Run>> {
        self.run.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Keeps a sampler running for the guard's lifetime
#[must_use = "dropping the guard stops the sampler immediately"]
pub struct SamplerGuard<'a> {
    sampler: &'a Sampler,
}

impl SamplerGuard<'_> {
    pub fn sampler(&self) -> &Sampler {
        self.sampler
    }
}

impl Drop for SamplerGuard<'_> {
    fn drop(&mut self) {
        self.sampler.stop();
    }
}

/// Everything the background task owns
struct LoopContext {
    shared: Arc<Shared>,
    interval: Duration,
    label: String,
    read_timeout: Option<Duration>,
    failure_policy: FailurePolicy,
    source: SharedValueSource,
    sink: SharedNotifier,
}

/// Result of one sampling tick
enum Tick {
    Sampled(Reading),
    Failed(ReadError),
    /// A previous timed-out read is still running
    Busy,
}

async fn sample_loop(ctx: LoopContext, mut stop_rx: watch::Receiver<bool>) {
    let source_id = ctx.source.metadata().id.clone();
    let mut consecutive_failures: u32 = 0;
    let mut abandoned: Option<JoinHandle<Result<Reading, ReadError>>> = None;

    loop {
        let wait = ctx.failure_policy.next_wait(ctx.interval, consecutive_failures);

        tokio::select! {
            biased;
            // Fires on the stop signal, or when the sampler is gone
            _ = stop_rx.changed() => break,
            _ = tokio::time::sleep(wait) => {}
        }

        if *stop_rx.borrow() || ctx.shared.state() != SamplerState::Running {
            break;
        }

        let tick = match ctx.read_timeout {
            None => read_inline(&ctx),
            Some(limit) => read_bounded(&ctx, limit, &mut abandoned).await,
        };

        match tick {
            Tick::Sampled(reading) => {
                consecutive_failures = 0;
                if dispatch(&ctx, reading) {
                    let ticks = ctx.shared.ticks.fetch_add(1, Ordering::SeqCst) + 1;
                    trace!("[{}] tick {}: {}", source_id, ticks, reading);
                } else {
                    warn!("[{}] notifier panicked, reading {} dropped", source_id, reading);
                }
            }
            Tick::Failed(e) => {
                consecutive_failures = consecutive_failures.saturating_add(1);
                warn!(
                    "[{}] skipping tick after failed read ({} in a row): {}",
                    source_id, consecutive_failures, e
                );
            }
            Tick::Busy => {
                debug!("[{}] previous read still in flight, skipping tick", source_id);
            }
        }
    }

    trace!("[{}] sampling loop exited", source_id);
}

/// Hand one reading to the notifier; false if the notifier panicked
fn dispatch(ctx: &LoopContext, reading: Reading) -> bool {
    let request = NotificationRequest::reading(&ctx.label, reading);
    panic::catch_unwind(AssertUnwindSafe(|| ctx.sink.notify(&request))).is_ok()
}

fn read_inline(ctx: &LoopContext) -> Tick {
    match panic::catch_unwind(AssertUnwindSafe(|| ctx.source.read())) {
        Ok(Ok(reading)) => Tick::Sampled(reading),
        Ok(Err(e)) => Tick::Failed(e),
        Err(_) => Tick::Failed(ReadError::Unavailable("source panicked".to_string())),
    }
}

/// Run the read on the blocking pool, giving up after `limit`
///
/// A timed-out read keeps running in the background; until it finishes,
/// further ticks are skipped instead of stacking more reads on top of it.
async fn read_bounded(
    ctx: &LoopContext,
    limit: Duration,
    abandoned: &mut Option<JoinHandle<Result<Reading, ReadError>>>,
) -> Tick {
    if let Some(previous) = abandoned.as_ref() {
        if !previous.is_finished() {
            return Tick::Busy;
        }
        // Stale result from an earlier tick, discarded
        *abandoned = None;
    }

    let source = ctx.source.clone();
    let mut job = tokio::task::spawn_blocking(move || source.read());

    match tokio::time::timeout(limit, &mut job).await {
        Ok(Ok(Ok(reading))) => Tick::Sampled(reading),
        Ok(Ok(Err(e))) => Tick::Failed(e),
        Ok(Err(join_err)) => Tick::Failed(ReadError::Unavailable(format!(
            "read task failed: {}",
            join_err
        ))),
        Err(_) => {
            *abandoned = Some(job);
            Tick::Failed(ReadError::TimedOut(limit))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::Notifier;
    use crate::value_source::{FnSource, SourceMetadata, ValueSource};
    use pulse_sens_types::Position;
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use tokio::time::{sleep, Instant};

    #[derive(Default)]
    struct RecordingNotifier {
        calls: Mutex<Vec<(String, Position, Instant)>>,
    }

    impl RecordingNotifier {
        fn messages(&self) -> Vec<(String, Position)> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|(m, p, _)| (m.clone(), *p))
                .collect()
        }

        fn count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl Notifier for RecordingNotifier {
        fn display(&self, message: &str, position: Position) {
            self.calls
                .lock()
                .unwrap()
                .push((message.to_string(), position, Instant::now()));
        }
    }

    /// Replays a fixed script of outcomes, then repeats the fallback forever
    struct ScriptedSource {
        metadata: SourceMetadata,
        script: Mutex<VecDeque<Result<Reading, ReadError>>>,
        fallback: Result<Reading, ReadError>,
        reads: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(
            script: Vec<Result<Reading, ReadError>>,
            fallback: Result<Reading, ReadError>,
        ) -> Arc<Self> {
            Arc::new(Self {
                metadata: SourceMetadata::new("scripted", "Scripted", "Test script"),
                script: Mutex::new(script.into()),
                fallback,
                reads: AtomicUsize::new(0),
            })
        }

        fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    impl ValueSource for ScriptedSource {
        fn metadata(&self) -> &SourceMetadata {
            &self.metadata
        }

        fn read(&self) -> Result<Reading, ReadError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| self.fallback.clone())
        }
    }

    fn pct(value: u8) -> Reading {
        Reading::new(value).unwrap()
    }

    fn unavailable() -> ReadError {
        ReadError::Unavailable("sensor offline".to_string())
    }

    fn constant(value: u8) -> SharedValueSource {
        Arc::new(FnSource::new("constant", move || Reading::new(value)))
    }

    fn battery(value: u8) -> (String, Position) {
        (format!("Battery level: {}%", value), Position::Top)
    }

    const SECOND: Duration = Duration::from_secs(1);

    #[tokio::test(start_paused = true)]
    async fn test_three_ticks_in_three_intervals() {
        let sampler = Sampler::new();
        let sink = Arc::new(RecordingNotifier::default());

        let state = sampler
            .start_with_interval(SECOND, constant(42), sink.clone())
            .unwrap();
        assert_eq!(state, SamplerState::Running);

        sleep(Duration::from_millis(3_500)).await;

        assert_eq!(sink.messages(), vec![battery(42), battery(42), battery(42)]);
        assert_eq!(sampler.ticks(), 3);
        assert!(sampler.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_sample_before_first_interval() {
        // Timer resolution is one millisecond
        for interval_ms in [2u64, 250, 60_000] {
            let interval = Duration::from_millis(interval_ms);
            let sampler = Sampler::new();
            let sink = Arc::new(RecordingNotifier::default());
            let started = Instant::now();

            sampler
                .start_with_interval(interval, constant(7), sink.clone())
                .unwrap();

            sleep(interval - Duration::from_millis(1)).await;
            assert_eq!(sink.count(), 0, "sampled early with interval {:?}", interval);

            sleep(interval).await;
            let calls = sink.calls.lock().unwrap();
            assert_eq!(calls.len(), 1);
            assert!(calls[0].2.duration_since(started) >= interval);
            drop(calls);

            sampler.stop();
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_displays_in_sample_order() {
        let sampler = Sampler::new();
        let sink = Arc::new(RecordingNotifier::default());
        let source = ScriptedSource::new(
            vec![Ok(pct(10)), Ok(pct(20)), Ok(pct(30))],
            Ok(pct(99)),
        );

        sampler
            .start_with_interval(SECOND, source.clone(), sink.clone())
            .unwrap();
        sleep(Duration::from_millis(4_500)).await;

        assert_eq!(
            sink.messages(),
            vec![battery(10), battery(20), battery(30), battery(99)]
        );
        let calls = sink.calls.lock().unwrap();
        assert!(calls.windows(2).all(|w| w[0].2 < w[1].2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_after_ticks_prevents_further_samples() {
        let sampler = Sampler::new();
        let sink = Arc::new(RecordingNotifier::default());

        sampler
            .start_with_interval(SECOND, constant(42), sink.clone())
            .unwrap();
        sleep(Duration::from_millis(2_500)).await;
        assert_eq!(sink.count(), 2);

        sampler.stop();
        assert_eq!(sampler.state(), SamplerState::Stopped);
        assert!(!sampler.is_running());

        sleep(Duration::from_secs(10)).await;
        assert_eq!(sink.count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_during_wait_exits_task_promptly() {
        let sampler = Sampler::new();
        let sink = Arc::new(RecordingNotifier::default());

        sampler
            .start_with_interval(Duration::from_secs(3_600), constant(42), sink.clone())
            .unwrap();
        sleep(Duration::from_secs(1)).await;

        let before = Instant::now();
        sampler.shutdown().await;
        assert!(before.elapsed() < SECOND);
        assert_eq!(sink.count(), 0);
        assert_eq!(sampler.state(), SamplerState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_while_running_is_noop() {
        let sampler = Sampler::new();
        let sink = Arc::new(RecordingNotifier::default());

        sampler
            .start_with_interval(SECOND, constant(42), sink.clone())
            .unwrap();
        let again = sampler
            .start_with_interval(SECOND, constant(42), sink.clone())
            .unwrap();
        assert_eq!(again, SamplerState::Running);

        sleep(Duration::from_millis(3_500)).await;
        assert_eq!(sink.count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_is_idempotent() {
        let sampler = Sampler::new();
        sampler.stop();
        sampler.stop();
        assert_eq!(sampler.state(), SamplerState::Idle);

        let sink = Arc::new(RecordingNotifier::default());
        sampler
            .start_with_interval(SECOND, constant(1), sink)
            .unwrap();
        sampler.stop();
        sampler.stop();
        sampler.shutdown().await;
        assert_eq!(sampler.state(), SamplerState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_after_stop() {
        let sampler = Sampler::new();
        let sink = Arc::new(RecordingNotifier::default());

        sampler
            .start_with_interval(SECOND, constant(1), sink.clone())
            .unwrap();
        sleep(Duration::from_millis(1_500)).await;
        sampler.shutdown().await;

        sampler
            .start_with_interval(SECOND, constant(2), sink.clone())
            .unwrap();
        sleep(Duration::from_millis(2_500)).await;

        assert_eq!(sink.messages(), vec![battery(1), battery(2), battery(2)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_errors_skip_tick_and_continue() {
        let sampler = Sampler::new();
        let sink = Arc::new(RecordingNotifier::default());
        let source = ScriptedSource::new(
            vec![Ok(pct(1)), Err(unavailable()), Err(unavailable()), Ok(pct(4))],
            Ok(pct(5)),
        );

        sampler
            .start_with_interval(SECOND, source.clone(), sink.clone())
            .unwrap();
        sleep(Duration::from_millis(5_500)).await;

        assert_eq!(source.reads(), 5);
        assert_eq!(sink.messages(), vec![battery(1), battery(4), battery(5)]);
        assert!(sampler.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicking_source_does_not_kill_loop() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let source: SharedValueSource = Arc::new(FnSource::new("flaky", move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                panic!("driver fault");
            }
            Reading::new(3)
        }));
        let sampler = Sampler::new();
        let sink = Arc::new(RecordingNotifier::default());

        sampler.start_with_interval(SECOND, source, sink.clone()).unwrap();
        sleep(Duration::from_millis(2_500)).await;

        assert_eq!(sink.messages(), vec![battery(3)]);
    }

    /// Panics on its first display, records every later one
    #[derive(Default)]
    struct PanicOnceNotifier {
        panicked: std::sync::atomic::AtomicBool,
        inner: RecordingNotifier,
    }

    impl Notifier for PanicOnceNotifier {
        fn display(&self, message: &str, position: Position) {
            if !self.panicked.swap(true, Ordering::SeqCst) {
                panic!("renderer fault");
            }
            self.inner.display(message, position);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicking_notifier_does_not_kill_loop() {
        let sampler = Sampler::new();
        let sink = Arc::new(PanicOnceNotifier::default());

        sampler
            .start_with_interval(SECOND, constant(42), sink.clone())
            .unwrap();
        sleep(Duration::from_millis(4_500)).await;

        assert!(sampler.is_running());
        assert_eq!(sink.inner.messages(), vec![battery(42), battery(42), battery(42)]);
        assert_eq!(sampler.ticks(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_policy_stretches_wait_after_failures() {
        let sampler = Sampler::new();
        let sink = Arc::new(RecordingNotifier::default());
        let source = ScriptedSource::new(
            vec![Err(unavailable()), Err(unavailable()), Err(unavailable())],
            Ok(pct(8)),
        );
        let config = SamplerConfig {
            interval_ms: 1_000,
            failure_policy: FailurePolicy::Backoff { max_interval_ms: 4_000 },
            ..SamplerConfig::default()
        };

        sampler.start(&config, source.clone(), sink.clone()).unwrap();

        // Reads at 1s, 3s, 7s fail; the next one lands at 11s
        sleep(Duration::from_millis(10_500)).await;
        assert_eq!(source.reads(), 3);
        assert_eq!(sink.count(), 0);

        sleep(Duration::from_secs(1)).await;
        assert_eq!(source.reads(), 4);
        assert_eq!(sink.messages(), vec![battery(8)]);

        // Success resets the wait to the base interval
        sleep(Duration::from_secs(1)).await;
        assert_eq!(sink.count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_label() {
        let sampler = Sampler::new();
        let sink = Arc::new(RecordingNotifier::default());
        let config = SamplerConfig {
            interval_ms: 500,
            label: "Cell charge".to_string(),
            ..SamplerConfig::default()
        };

        sampler.start(&config, constant(64), sink.clone()).unwrap();
        sleep(Duration::from_millis(750)).await;

        assert_eq!(
            sink.messages(),
            vec![("Cell charge: 64%".to_string(), Position::Top)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_rejected() {
        let sampler = Sampler::new();
        let sink = Arc::new(RecordingNotifier::default());

        let err = sampler
            .start_with_interval(Duration::ZERO, constant(1), sink.clone())
            .unwrap_err();
        assert_eq!(err, SamplerError::InvalidInterval);

        let config = SamplerConfig {
            interval_ms: 0,
            ..SamplerConfig::default()
        };
        assert_eq!(
            sampler.start(&config, constant(1), sink).unwrap_err(),
            SamplerError::InvalidInterval
        );
        assert_eq!(sampler.state(), SamplerState::Idle);
    }

    #[test]
    fn test_start_without_runtime_fails() {
        let sampler = Sampler::new();
        let sink = Arc::new(RecordingNotifier::default());

        let err = sampler
            .start_with_interval(SECOND, constant(1), sink)
            .unwrap_err();
        assert_eq!(err, SamplerError::NoRuntime);
        assert_eq!(sampler.state(), SamplerState::Idle);
    }

    #[test]
    fn test_start_with_explicit_handle_from_plain_thread() {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        let sampler = Sampler::with_handle(rt.handle().clone());
        let sink = Arc::new(RecordingNotifier::default());

        sampler
            .start_with_interval(Duration::from_millis(10), constant(5), sink.clone())
            .unwrap();
        std::thread::sleep(Duration::from_millis(200));
        sampler.stop();

        assert!(sink.count() >= 1);
        assert!(sink.messages().iter().all(|m| *m == battery(5)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_guard_stops_on_drop() {
        let sampler = Sampler::new();
        let sink = Arc::new(RecordingNotifier::default());
        let config = SamplerConfig::with_interval(SECOND);

        {
            let guard = sampler
                .start_scoped(&config, constant(42), sink.clone())
                .unwrap();
            assert!(guard.sampler().is_running());
            sleep(Duration::from_millis(1_500)).await;
        }

        assert_eq!(sampler.state(), SamplerState::Stopped);
        sleep(Duration::from_secs(5)).await;
        assert_eq!(sink.count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_sampler_ends_loop() {
        let sink = Arc::new(RecordingNotifier::default());
        let sampler = Sampler::new();

        sampler
            .start_with_interval(SECOND, constant(42), sink.clone())
            .unwrap();
        sleep(Duration::from_millis(1_500)).await;
        drop(sampler);

        sleep(Duration::from_secs(5)).await;
        assert_eq!(sink.count(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_read_timeout_skips_stalled_reads() {
        let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();
        let release_rx = Mutex::new(release_rx);
        let started = Arc::new(AtomicUsize::new(0));
        let started_in_source = started.clone();

        // First read blocks until released; later reads return immediately
        let source: SharedValueSource = Arc::new(FnSource::new("stalling", move || {
            started_in_source.fetch_add(1, Ordering::SeqCst);
            let _ = release_rx.lock().unwrap().recv();
            Reading::new(7)
        }));

        let sampler = Sampler::new();
        let sink = Arc::new(RecordingNotifier::default());
        let config = SamplerConfig {
            interval_ms: 20,
            read_timeout_ms: Some(20),
            ..SamplerConfig::default()
        };

        sampler.start(&config, source, sink.clone()).unwrap();
        sleep(Duration::from_millis(300)).await;

        assert_eq!(sink.count(), 0);
        assert_eq!(started.load(Ordering::SeqCst), 1);
        assert!(sampler.is_running());

        drop(release_tx);
        sleep(Duration::from_millis(300)).await;
        sampler.stop();

        assert!(sink.count() >= 1);
        assert!(sink.messages().iter().all(|m| *m == battery(7)));
    }
}
