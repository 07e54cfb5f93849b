use crate::config::Config;
use crate::render::{
    Animate, CancelToken, ColorError, ColorState, EntropySource, FrameStats, NoiseStream, RenderConfig, TerminalSink,
    initial_phase, render, seed_with_fallback,
};
use clap::Parser;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_NOISE: i64 = 7;
const DEFAULT_DELAY_MS: u64 = 1000;

/// Paint text with drifting sine-wave colors.
#[derive(Clone, Debug, Parser)]
#[command(version, about, arg_required_else_help = true)]
pub struct Cli {
    /// Text message to colorize.
    #[arg(long, value_name = "MESSAGE", conflicts_with = "file")]
    pub text: Option<String>,

    /// Print a file's contents with mixed RGB colors.
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Wait this many milliseconds between animation frames [default: 1000].
    #[arg(long, value_name = "MILLISECONDS", conflicts_with = "sec")]
    pub ms: Option<u64>,

    /// Wait this many seconds between animation frames.
    #[arg(long, value_name = "SECONDS")]
    pub sec: Option<u64>,

    /// Keep redrawing the text until interrupted.
    #[arg(long)]
    pub anim: bool,

    /// The color frequency [default: 0.3].
    #[arg(long, value_name = "FREQUENCY", allow_negative_numbers = true)]
    pub freq: Option<f64>,

    /// The starting color phase [default: random in 0..255].
    #[arg(long, value_name = "PHASE", allow_negative_numbers = true)]
    pub seed: Option<f64>,

    /// How many characters a color stretches over [default: 8.0].
    #[arg(long, value_name = "SPREAD", allow_negative_numbers = true)]
    pub spread: Option<f64>,

    /// Upper bound of the random phase step per character, 0 to 256 [default: 7].
    #[arg(long, value_name = "LIMIT", allow_negative_numbers = true)]
    pub noise: Option<i64>,

    /// Make the terminal cursor visible when done.
    #[arg(long)]
    pub showcur: bool,

    /// Make the terminal cursor hidden when done.
    #[arg(long)]
    pub hidecur: bool,

    /// The path to the configuration file.
    #[arg(long, value_name = "PATH", env = "WAVECAT_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Where the text to paint comes from.
#[derive(Clone, Debug, PartialEq)]
pub enum TextSource {
    Literal(String),
    File(PathBuf),
}

impl TextSource {
    /// Read the whole buffer.
    pub fn load(&self) -> Result<Vec<u8>, CliError> {
        match self {
            Self::Literal(text) => Ok(text.as_bytes().to_vec()),
            Self::File(path) => fs::read(path).map_err(|e| CliError::ReadFile(path.clone(), e)),
        }
    }
}

/// Everything needed to run, with command line, config file and defaults merged.
#[derive(Clone, Debug)]
pub struct Settings {
    /// The text to render, if any. Cursor toggles still apply without one.
    pub source: Option<TextSource>,
    pub color: ColorState,
    pub render: RenderConfig,
    pub show_cursor: bool,
    pub hide_cursor: bool,
}

impl Cli {
    /// Merge the arguments with `config` and built in defaults.
    ///
    /// `entropy` is only touched when no starting phase was given.
    pub fn resolve(&self, config: &Config, entropy: &mut dyn EntropySource) -> Result<Settings, CliError> {
        let frequency = self.freq.or(config.frequency).unwrap_or(ColorState::DEFAULT_FREQUENCY);
        let spread = self.spread.or(config.spread).unwrap_or(ColorState::DEFAULT_SPREAD);
        // Reject bad parameters before any entropy is drawn.
        ColorState::new(frequency, 0.0, spread)?;
        let phase = match self.seed {
            Some(phase) => phase,
            None => initial_phase(&seed_with_fallback(entropy)),
        };
        let color = ColorState::new(frequency, phase, spread).map_err(|e| match e {
            ColorError::NotFinite("phase", value) => ColorError::NotFinite("seed", value),
            other => other,
        })?;

        let source = match (&self.text, &self.file) {
            (Some(_), Some(_)) => return Err(CliError::ConflictingSources),
            (Some(text), None) => Some(TextSource::Literal(text.clone())),
            (None, Some(path)) => Some(TextSource::File(path.clone())),
            (None, None) => None,
        };

        let render = RenderConfig {
            animate: if self.anim { Animate::Loop } else { Animate::Off },
            noise_bound: self.noise.or(config.noise).unwrap_or(DEFAULT_NOISE),
            frame_delay_micros: self.frame_delay_micros(config)?,
        };
        Ok(Settings {
            source,
            color,
            render,
            show_cursor: self.showcur,
            hide_cursor: self.hidecur,
        })
    }

    fn frame_delay_micros(&self, config: &Config) -> Result<u64, CliError> {
        match (self.ms, self.sec) {
            (Some(_), Some(_)) => Err(CliError::ConflictingDelays),
            (Some(ms), None) => Ok(ms.saturating_mul(1_000)),
            (None, Some(sec)) => Ok(sec.saturating_mul(1_000_000)),
            (None, None) => Ok(config.delay_ms.unwrap_or(DEFAULT_DELAY_MS).saturating_mul(1_000)),
        }
    }
}

/// Write everything `settings` asks for into `sink`: the painted text if there is any,
/// then the cursor toggles, show before hide.
///
/// A reader that goes away while we're writing isn't an error; whatever was already
/// rendered is lost and the result is empty stats.
pub fn write_output<S>(
    settings: &Settings,
    text: Option<&[u8]>,
    entropy: &mut dyn EntropySource,
    sink: &mut S,
    cancel: &CancelToken,
) -> io::Result<FrameStats>
where
    S: TerminalSink + ?Sized,
{
    match emit(settings, text, entropy, sink, cancel) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            debug!("output closed");
            Ok(FrameStats::default())
        }
        other => other,
    }
}

fn emit<S>(
    settings: &Settings,
    text: Option<&[u8]>,
    entropy: &mut dyn EntropySource,
    sink: &mut S,
    cancel: &CancelToken,
) -> io::Result<FrameStats>
where
    S: TerminalSink + ?Sized,
{
    let stats = match text {
        Some(text) => {
            let noise = NoiseStream::new(seed_with_fallback(entropy));
            let stats = render(settings.color.clone(), &settings.render, noise, text, sink, cancel)?;
            debug!("rendered {} frames, {} cells", stats.frames, stats.cells);
            stats
        }
        None => FrameStats::default(),
    };
    if settings.show_cursor {
        sink.show_cursor()?;
    }
    if settings.hide_cursor {
        sink.hide_cursor()?;
    }
    sink.flush()?;
    Ok(stats)
}

/// An invalid combination of arguments.
#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("passing both text and file isn't allowed")]
    ConflictingSources,

    #[error("passing both sec and ms isn't allowed")]
    ConflictingDelays,

    #[error(transparent)]
    Color(#[from] ColorError),

    #[error("reading {0}: {1}")]
    ReadFile(PathBuf, io::Error),
}
