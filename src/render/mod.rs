mod color;
mod entropy;
mod noise;
mod session;
mod terminal;

pub use color::{ColorError, ColorState, Rgb, sine_rgb};
pub use entropy::{EntropyError, EntropySource, FixedEntropy, OsEntropy, draw_seed, fallback_seed, seed_with_fallback};
pub use noise::{NoiseBound, NoiseStream, SEED_LEN, Seed, initial_phase, xorshift64};
pub use session::{Animate, CancelToken, FrameStats, RenderConfig, RenderSession, RenderState, render};
pub use terminal::{AnsiSink, Recorder, TerminalCall, TerminalSink};

#[cfg(test)]
pub(crate) use terminal::ClosedPipe;
