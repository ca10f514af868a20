#![deny(unsafe_code)]
//! Frame loop driving an [`Engine`].
//!
//! [`FrameScheduler`] reads the clock and the [`InputMailbox`] once per frame,
//! steps the engine, and hands the result to a registered [`FrameSink`].
//! Everything runs on the caller's thread; only the mailbox and the
//! [`StopHandle`] are meant to be shared.

pub mod clock;
pub mod mailbox;
pub mod sink;
pub mod snapshot;

pub use clock::{FixedClock, FrameClock, SystemClock};
pub use mailbox::{InputMailbox, MailboxSnapshot};
pub use sink::{FrameSink, FrameStats, NullSink};

use morphfield_core::{Engine, SceneInputs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace};

/// Cooperative stop request, checked before every frame.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn request_stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Steps an engine once per frame and forwards each frame to a sink.
///
/// Lifecycle: [`start`](Self::start) registers a sink, [`tick`](Self::tick)
/// runs one frame, [`stop`](Self::stop) unregisters the sink and hands it
/// back. A stop requested through a [`StopHandle`] takes effect at the next
/// tick, which steps nothing.
pub struct FrameScheduler<E: Engine> {
    engine: E,
    clock: Box<dyn FrameClock>,
    mailbox: InputMailbox,
    stop: StopHandle,
    sink: Option<Box<dyn FrameSink>>,
    last_elapsed: f64,
    frames: u64,
}

impl<E: Engine> FrameScheduler<E> {
    pub fn new(engine: E, clock: Box<dyn FrameClock>) -> Self {
        Self {
            engine,
            clock,
            mailbox: InputMailbox::new(),
            stop: StopHandle::default(),
            sink: None,
            last_elapsed: 0.0,
            frames: 0,
        }
    }

    /// Handle for input collaborators. All clones feed this scheduler.
    pub fn mailbox(&self) -> InputMailbox {
        self.mailbox.clone()
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Registers `sink` and arms the loop. Replaces any previous sink.
    pub fn start(&mut self, sink: Box<dyn FrameSink>) {
        self.stop.reset();
        self.sink = Some(sink);
        self.last_elapsed = self.clock.elapsed();
        info!(frames = self.frames, "frame scheduler started");
    }

    /// Disarms the loop and releases the sink.
    ///
    /// Returns the sink that was registered, if any. Idempotent.
    pub fn stop(&mut self) -> Option<Box<dyn FrameSink>> {
        self.stop.request_stop();
        let sink = self.sink.take();
        if sink.is_some() {
            info!(frames = self.frames, "frame scheduler stopped");
        }
        sink
    }

    /// True between `start` and `stop` while no stop has been requested.
    pub fn is_running(&self) -> bool {
        self.sink.is_some() && !self.stop.is_stop_requested()
    }

    /// Runs one frame. Returns `false`, stepping nothing, once stopped.
    pub fn tick(&mut self) -> bool {
        if !self.is_running() {
            // A stop requested from another thread still has to release the sink.
            self.stop();
            return false;
        }

        let elapsed = self.clock.elapsed();
        let dt = (elapsed - self.last_elapsed).max(0.0) as f32;
        self.last_elapsed = elapsed;

        let inbox = self.mailbox.snapshot();
        if let Some(params) = inbox.params {
            debug!(shape = %params.shape, "applying new visual params");
            self.engine.set_params(params);
        }
        let inputs = SceneInputs::new(inbox.pointer, inbox.audio, elapsed);

        self.engine.step(dt, &inputs);
        if let Some(sink) = self.sink.as_mut() {
            sink.present(self.engine.frame(), self.engine.colors());
        }
        self.frames += 1;
        trace!(frame = self.frames, dt, "frame presented");
        true
    }

    /// Runs up to `frames` ticks as fast as possible. Returns how many ran.
    pub fn run_for(&mut self, frames: u64) -> u64 {
        let mut ran = 0;
        while ran < frames && self.tick() {
            ran += 1;
        }
        ran
    }

    /// Runs ticks no faster than one per `interval` until stopped or until
    /// `max_frames` have run. Returns how many ran.
    pub fn run_paced(&mut self, interval: Duration, max_frames: Option<u64>) -> u64 {
        let mut ran = 0;
        while max_frames.map_or(true, |max| ran < max) {
            let frame_start = Instant::now();
            if !self.tick() {
                break;
            }
            ran += 1;
            if let Some(rest) = interval.checked_sub(frame_start.elapsed()) {
                thread::sleep(rest);
            }
        }
        ran
    }

    /// Frames stepped over the scheduler's lifetime.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Stops the loop and returns the engine.
    pub fn into_engine(mut self) -> E {
        self.stop();
        self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use morphfield_core::{
        AudioEnergy, ParticleTransform, PointerPosition, Shape, Srgb, VisualParams,
    };
    use morphfield_particles::{SimConfig, Simulation};
    use serde_json::{json, Value};
    use std::sync::Mutex;

    /// Records every step it receives.
    #[derive(Default)]
    struct RecordingEngine {
        dts: Vec<f32>,
        inputs: Vec<SceneInputs>,
        params: VisualParams,
        frame: Vec<ParticleTransform>,
        colors: Vec<Srgb>,
    }

    impl Engine for RecordingEngine {
        fn step(&mut self, dt: f32, inputs: &SceneInputs) {
            self.dts.push(dt);
            self.inputs.push(*inputs);
        }
        fn set_params(&mut self, params: VisualParams) {
            self.params = params;
        }
        fn frame(&self) -> &[ParticleTransform] {
            &self.frame
        }
        fn colors(&self) -> &[Srgb] {
            &self.colors
        }
        fn params(&self) -> Value {
            json!({})
        }
        fn param_schema(&self) -> Value {
            json!({})
        }
    }

    fn recording(interval: f64) -> FrameScheduler<RecordingEngine> {
        FrameScheduler::new(
            RecordingEngine::default(),
            Box::new(FixedClock::new(interval)),
        )
    }

    #[test]
    fn tick_before_start_steps_nothing() {
        let mut s = recording(0.1);
        assert!(!s.is_running());
        assert!(!s.tick());
        assert!(s.engine().dts.is_empty());
    }

    #[test]
    fn dt_comes_from_consecutive_clock_readings() {
        let mut s = recording(0.25);
        s.start(Box::new(NullSink));
        assert_eq!(s.run_for(3), 3);
        assert_eq!(s.engine().dts, vec![0.25, 0.25, 0.25]);
        let times: Vec<f64> = s.engine().inputs.iter().map(|i| i.elapsed_time).collect();
        assert_eq!(times, vec![0.25, 0.5, 0.75]);
    }

    #[test]
    fn stop_prevents_further_steps_and_returns_sink() {
        let mut s = recording(0.1);
        s.start(Box::new(NullSink));
        s.run_for(2);
        assert!(s.stop().is_some());
        assert!(s.stop().is_none());
        assert!(!s.tick());
        assert_eq!(s.engine().dts.len(), 2);
    }

    #[test]
    fn stop_handle_halts_run_for_and_releases_sink() {
        let mut s = recording(0.1);
        let presented = Arc::new(Mutex::new(0u32));
        let counter = Arc::clone(&presented);
        let handle = s.stop_handle();
        s.start(Box::new(move |_: &[ParticleTransform], _: &[Srgb]| {
            let mut n = counter.lock().unwrap();
            *n += 1;
            if *n == 5 {
                handle.request_stop();
            }
        }));
        assert_eq!(s.run_for(100), 5);
        assert!(!s.is_running());
        // The sink (and its captured counter clone) has been dropped.
        assert_eq!(Arc::strong_count(&presented), 1);
        assert_eq!(*presented.lock().unwrap(), 5);
    }

    #[test]
    fn restart_after_stop_resumes_stepping() {
        let mut s = recording(0.1);
        s.start(Box::new(NullSink));
        s.run_for(1);
        s.stop();
        s.start(Box::new(NullSink));
        assert_eq!(s.run_for(2), 2);
        assert_eq!(s.frames(), 3);
    }

    #[test]
    fn mailbox_is_read_once_per_frame() {
        let mut s = recording(0.1);
        let mailbox = s.mailbox();
        s.start(Box::new(NullSink));

        mailbox.set_pointer(PointerPosition::detected(0.1, 0.2));
        mailbox.set_pointer(PointerPosition::detected(-0.5, 0.5));
        mailbox.set_audio(AudioEnergy::new(0.7, 0.1));
        let mut params = VisualParams::default();
        params.shape = Shape::Star;
        mailbox.set_params(params);
        s.tick();

        let first = s.engine().inputs[0];
        assert_eq!(first.pointer, PointerPosition::detected(-0.5, 0.5));
        assert_eq!(first.audio_energy, AudioEnergy::new(0.7, 0.1));
        assert_eq!(s.engine().params.shape, Shape::Star);

        s.engine_mut().params.shape = Shape::Cat;
        s.tick();
        // No new params were published, so nothing overwrote the engine's.
        assert_eq!(s.engine().params.shape, Shape::Cat);
        assert_eq!(s.engine().inputs[1].pointer, first.pointer);
    }

    #[test]
    fn run_paced_honours_max_frames() {
        let mut s = recording(0.0);
        s.start(Box::new(NullSink));
        assert_eq!(s.run_paced(Duration::from_millis(1), Some(3)), 3);
    }

    #[test]
    fn drives_a_real_simulation() {
        let sim = Simulation::new(64, 42, VisualParams::default(), SimConfig::default()).unwrap();
        let mut s = FrameScheduler::new(sim, Box::new(FixedClock::from_fps(60.0)));
        s.start(Box::new(FrameStats::default()));
        assert_eq!(s.run_for(30), 30);
        assert_eq!(s.engine().frames(), 30);
        let sim = s.into_engine();
        assert!(sim.frame().iter().all(ParticleTransform::is_finite));
    }
}
