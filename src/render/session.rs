use super::color::ColorState;
use super::noise::{NoiseBound, NoiseStream};
use super::terminal::TerminalSink;
use std::io;
use std::iter;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// The longest uninterrupted sleep between frames, so a cancel is noticed quickly.
const WAIT_SLICE: Duration = Duration::from_millis(20);

/// How many frames get rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Animate {
    /// No animation, behaves like [Animate::SingleFrame].
    #[default]
    Off,
    /// Render once.
    SingleFrame,
    /// Redraw until cancelled.
    Loop,
}

/// Settings for one render call.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub animate: Animate,
    /// Requested noise bound, validated when rendering starts.
    pub noise_bound: i64,
    pub frame_delay_micros: u64,
}

impl RenderConfig {
    pub fn frame_delay(&self) -> Duration {
        Duration::from_micros(self.frame_delay_micros)
    }
}

/// Where a [RenderSession] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    Idle,
    Rendering,
    SingleFrameDone,
    Looping,
}

/// Stops a looping render from another thread or a signal handler.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// The flag backing this token, for APIs that want to set it directly.
    pub fn flag(&self) -> Arc<AtomicBool> {
        self.0.clone()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Sleep for `duration` or until cancelled. Returns `false` if cancelled.
    pub fn wait(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        loop {
            if self.is_cancelled() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            thread::sleep((deadline - now).min(WAIT_SLICE));
        }
    }
}

/// What a render call produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub frames: u64,
    /// Colored positions written, terminators included.
    pub cells: u64,
}

/// Paints text buffers, keeping the color phase and noise position between frames.
#[derive(Debug)]
pub struct RenderSession {
    color: ColorState,
    noise: NoiseStream,
    state: RenderState,
}

impl RenderSession {
    pub fn new(color: ColorState, noise: NoiseStream) -> Self {
        Self { color, noise, state: RenderState::Idle }
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    pub fn color(&self) -> &ColorState {
        &self.color
    }

    /// Render `text` into `sink` as configured.
    ///
    /// A single frame returns once it's been written. A loop keeps going until `cancel` is
    /// triggered; the frame in progress is always finished, so output ends with a reset.
    /// The only possible error is the sink failing.
    pub fn render<S>(
        &mut self,
        config: &RenderConfig,
        text: &[u8],
        sink: &mut S,
        cancel: &CancelToken,
    ) -> io::Result<FrameStats>
    where
        S: TerminalSink + ?Sized,
    {
        let bound = NoiseBound::new(config.noise_bound);
        self.state = RenderState::Rendering;
        debug!("rendering {} bytes, animate={:?}, noise bound {}", text.len(), config.animate, bound.get());

        let mut stats = FrameStats::default();
        let result = match config.animate {
            Animate::Off | Animate::SingleFrame => self.render_once(text, bound, sink, &mut stats),
            Animate::Loop => self.render_loop(config.frame_delay(), text, bound, sink, cancel, &mut stats),
        };
        if result.is_err() {
            self.state = RenderState::Idle;
        }
        result.map(|_| stats)
    }

    fn render_once<S>(&mut self, text: &[u8], bound: NoiseBound, sink: &mut S, stats: &mut FrameStats) -> io::Result<()>
    where
        S: TerminalSink + ?Sized,
    {
        self.paint_frame(text, bound, sink, stats)?;
        sink.flush()?;
        self.state = RenderState::SingleFrameDone;
        Ok(())
    }

    fn render_loop<S>(
        &mut self,
        delay: Duration,
        text: &[u8],
        bound: NoiseBound,
        sink: &mut S,
        cancel: &CancelToken,
        stats: &mut FrameStats,
    ) -> io::Result<()>
    where
        S: TerminalSink + ?Sized,
    {
        self.state = RenderState::Looping;
        while !cancel.is_cancelled() {
            if stats.frames == 0 {
                sink.clear()?;
            } else {
                sink.home()?;
            }
            self.paint_frame(text, bound, sink, stats)?;
            sink.flush()?;
            trace!("frame {} done, phase {}", stats.frames, self.color.phase());
            if !cancel.wait(delay) {
                break;
            }
        }
        debug!("loop cancelled after {} frames", stats.frames);
        self.state = RenderState::Idle;
        Ok(())
    }

    /// One full pass over the buffer, plus the terminator position, followed by a reset.
    fn paint_frame<S>(&mut self, text: &[u8], bound: NoiseBound, sink: &mut S, stats: &mut FrameStats) -> io::Result<()>
    where
        S: TerminalSink + ?Sized,
    {
        for byte in text.iter().copied().map(Some).chain(iter::once(None)) {
            let color = self.color.current_color();
            self.color.advance(self.noise.next_step(bound));
            sink.set_truecolor(color)?;
            if let Some(byte) = byte {
                sink.put_byte(byte)?;
            }
            stats.cells += 1;
        }
        sink.reset()?;
        stats.frames += 1;
        Ok(())
    }
}

/// Render `text` with a fresh session built from `color` and `noise`.
pub fn render<S>(
    color: ColorState,
    config: &RenderConfig,
    noise: NoiseStream,
    text: &[u8],
    sink: &mut S,
    cancel: &CancelToken,
) -> io::Result<FrameStats>
where
    S: TerminalSink + ?Sized,
{
    RenderSession::new(color, noise).render(config, text, sink, cancel)
}
