//! Prints the same sample line once per noise bound so the drift patterns can be compared.
//!
//! Usage: `wavecat-sweep [TEXT]`

use std::io::{self, BufWriter, Write};
use wavecat::render::{
    Animate, AnsiSink, CancelToken, ColorState, NoiseBound, NoiseStream, OsEntropy, RenderConfig, RenderSession,
    seed_with_fallback,
};

const BOUNDS: &[i64] = &[0, 1, 3, 5, 7, 16, 64, 256];
const SAMPLE: &str = "the quick brown fox jumps over the lazy dog";

fn main() -> anyhow::Result<()> {
    let text = std::env::args().nth(1).unwrap_or_else(|| SAMPLE.to_string());
    let seed = seed_with_fallback(&mut OsEntropy::new());

    let stdout = io::stdout();
    let mut sink = AnsiSink::new(BufWriter::new(stdout.lock()));

    eprintln!("seed bytes: {seed:?}");
    for bound in BOUNDS {
        let config = RenderConfig { animate: Animate::SingleFrame, noise_bound: *bound, frame_delay_micros: 0 };
        let color = ColorState::new(ColorState::DEFAULT_FREQUENCY, 0.0, ColorState::DEFAULT_SPREAD)?;
        let mut session = RenderSession::new(color, NoiseStream::new(seed));

        write!(sink.writer_mut(), "{:>4} ", NoiseBound::new(*bound).get())?;
        let stats = session.render(&config, text.as_bytes(), &mut sink, &CancelToken::new())?;
        writeln!(sink.writer_mut(), " phase {:.1} after {} cells", session.color().phase(), stats.cells)?;
    }
    sink.into_inner().flush()?;
    Ok(())
}
