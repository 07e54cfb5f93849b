use super::noise::{Seed, SEED_LEN};
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// Somewhere to draw seed bytes from.
pub trait EntropySource {
    fn fill(&mut self, buffer: &mut [u8]) -> Result<(), EntropyError>;
}

/// The operating system's random device.
#[derive(Debug, Clone)]
pub struct OsEntropy {
    path: PathBuf,
}

impl OsEntropy {
    pub fn new() -> Self {
        Self { path: PathBuf::from("/dev/urandom") }
    }

    /// Read from a different device. Mostly useful to exercise the fallback path.
    pub fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl Default for OsEntropy {
    fn default() -> Self {
        Self::new()
    }
}

impl EntropySource for OsEntropy {
    fn fill(&mut self, buffer: &mut [u8]) -> Result<(), EntropyError> {
        let mut device = File::open(&self.path).map_err(|e| EntropyError::Unavailable(self.path.clone(), e))?;
        device.read_exact(buffer).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => EntropyError::ShortRead(self.path.clone()),
            _ => EntropyError::Unavailable(self.path.clone(), e),
        })
    }
}

/// A source that replays the same bytes forever.
#[derive(Debug, Clone)]
pub struct FixedEntropy(pub Vec<u8>);

impl EntropySource for FixedEntropy {
    fn fill(&mut self, buffer: &mut [u8]) -> Result<(), EntropyError> {
        if self.0.is_empty() {
            return Err(EntropyError::Exhausted);
        }
        for (target, byte) in buffer.iter_mut().zip(self.0.iter().cycle()) {
            *target = *byte;
        }
        Ok(())
    }
}

/// Errors that can occur when drawing entropy
#[derive(thiserror::Error, Debug)]
pub enum EntropyError {
    #[error("cannot read random device {0}: {1}")]
    Unavailable(PathBuf, io::Error),

    #[error("random device {0} ended early")]
    ShortRead(PathBuf),

    #[error("entropy source has no bytes")]
    Exhausted,
}

/// Draw a seed from `source`.
pub fn draw_seed(source: &mut dyn EntropySource) -> Result<Seed, EntropyError> {
    let mut seed = [0; SEED_LEN];
    source.fill(&mut seed)?;
    Ok(seed)
}

/// Draw a seed from `source`, degrading to a time based generator if that fails.
pub fn seed_with_fallback(source: &mut dyn EntropySource) -> Seed {
    match draw_seed(source) {
        Ok(seed) => seed,
        Err(e) => {
            let nanos = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_nanos() as u64).unwrap_or_default();
            warn!("{e}; falling back to a non secure time based seed");
            fallback_seed(nanos)
        }
    }
}

/// The seed used when no entropy source is available.
pub fn fallback_seed(time_seed: u64) -> Seed {
    debug!("seeding from time value {time_seed}");
    let mut rng = fastrand::Rng::with_seed(time_seed);
    let mut seed = [0; SEED_LEN];
    rng.fill(&mut seed);
    seed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_source_cycles() {
        let mut source = FixedEntropy(vec![1, 2, 3]);
        assert_eq!(draw_seed(&mut source).unwrap(), [1, 2, 3, 1, 2, 3, 1, 2, 3, 1]);
    }

    #[test]
    fn empty_fixed_source_fails() {
        let mut source = FixedEntropy(vec![]);
        assert!(matches!(draw_seed(&mut source), Err(EntropyError::Exhausted)));
    }

    #[test]
    fn missing_device() {
        let mut source = OsEntropy::with_path("/definitely/not/a/random/device");
        assert!(matches!(draw_seed(&mut source), Err(EntropyError::Unavailable(..))));
    }

    #[test]
    fn short_device() {
        let file = tempfile::NamedTempFile::new().expect("temp file");
        std::fs::write(file.path(), [1, 2, 3]).expect("write");
        let mut source = OsEntropy::with_path(file.path());
        assert!(matches!(draw_seed(&mut source), Err(EntropyError::ShortRead(_))));
    }

    #[test]
    fn fixed_source_needs_no_fallback() {
        let mut source = FixedEntropy(vec![9]);
        assert_eq!(seed_with_fallback(&mut source), [9; SEED_LEN]);
    }

    #[test]
    fn fallback_is_deterministic() {
        assert_eq!(fallback_seed(42), fallback_seed(42));
        assert_ne!(fallback_seed(42), fallback_seed(43));
    }

    #[test]
    fn failing_source_still_seeds() {
        let mut source = FixedEntropy(vec![]);
        let _ = seed_with_fallback(&mut source);
    }

    #[cfg(unix)]
    #[test]
    fn os_device() {
        let mut source = OsEntropy::new();
        assert!(draw_seed(&mut source).is_ok());
    }
}
