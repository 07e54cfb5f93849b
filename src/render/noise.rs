use tracing::warn;

/// Number of entropy bytes a noise stream cycles through.
pub const SEED_LEN: usize = 10;

/// Raw seed bytes for a [NoiseStream].
pub type Seed = [u8; SEED_LEN];

/// One round of the 64 bit xorshift mix.
pub fn xorshift64(seed: u64) -> u64 {
    let mut x = seed;
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    x
}

/// Derive a starting phase in `[0, 255)` from a seed.
pub fn initial_phase(seed: &Seed) -> f64 {
    (xorshift64(u64::from(seed[0])) % 255) as f64
}

/// The exclusive upper bound for each noise step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoiseBound(u16);

impl NoiseBound {
    pub const MAX: u16 = 256;
    pub const FALLBACK: u16 = 5;

    /// Validate a requested bound, falling back to [NoiseBound::FALLBACK] when outside `[0, 256]`.
    pub fn new(requested: i64) -> Self {
        match u16::try_from(requested) {
            Ok(bound) if bound <= Self::MAX => Self(bound),
            _ => {
                warn!("noise bound {requested} outside [0, {}], using {}", Self::MAX, Self::FALLBACK);
                Self(Self::FALLBACK)
            }
        }
    }

    pub fn get(self) -> u16 {
        self.0
    }

    /// Reduce a mixed value to a step. A zero bound never moves the phase.
    pub fn reduce(self, value: u64) -> u64 {
        match self.0 {
            0 => 0,
            bound => value % u64::from(bound),
        }
    }
}

/// A cyclic stream of phase steps built from a fixed set of seed bytes.
///
/// Every visit to a slot re-mixes the stored seed byte, so the stream repeats every
/// [SEED_LEN] steps.
#[derive(Debug, Clone)]
pub struct NoiseStream {
    seed: Seed,
    cursor: usize,
}

impl NoiseStream {
    pub fn new(seed: Seed) -> Self {
        Self { seed, cursor: 0 }
    }

    /// The next step, in `[0, bound)`.
    pub fn next_step(&mut self, bound: NoiseBound) -> u64 {
        let byte = self.seed[self.cursor];
        self.cursor = (self.cursor + 1) % SEED_LEN;
        bound.reduce(xorshift64(u64::from(byte)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const SEED: Seed = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1082269761)]
    #[case(2, 2164539522)]
    #[case(255, 273777155902)]
    fn mix(#[case] input: u64, #[case] expected: u64) {
        assert_eq!(xorshift64(input), expected);
    }

    #[rstest]
    #[case::lowest(0, 0)]
    #[case::highest(256, 256)]
    #[case::typical(7, 7)]
    #[case::negative(-1, 5)]
    #[case::too_large(257, 5)]
    #[case::huge(i64::MAX, 5)]
    fn bound_validation(#[case] requested: i64, #[case] expected: u16) {
        assert_eq!(NoiseBound::new(requested).get(), expected);
    }

    #[test]
    fn steps_stay_below_bound() {
        for bound in [1, 2, 5, 7, 100, 256] {
            let mut stream = NoiseStream::new([0xff, 0x80, 0x7f, 0x01, 0x00, 0x42, 0x99, 0x13, 0xab, 0xcd]);
            for _ in 0..100 {
                assert!(stream.next_step(NoiseBound::new(bound)) < bound as u64);
            }
        }
    }

    #[test]
    fn zero_bound_never_steps() {
        let mut stream = NoiseStream::new(SEED);
        for _ in 0..25 {
            assert_eq!(stream.next_step(NoiseBound::new(0)), 0);
        }
    }

    #[test]
    fn stream_cycles_through_seed() {
        let mut stream = NoiseStream::new(SEED);
        let bound = NoiseBound::new(256);
        let first: Vec<_> = (0..SEED_LEN).map(|_| stream.next_step(bound)).collect();
        let second: Vec<_> = (0..SEED_LEN).map(|_| stream.next_step(bound)).collect();
        assert_eq!(first, second);

        let expected: Vec<_> = SEED.iter().map(|byte| xorshift64(u64::from(*byte)) % 256).collect();
        assert_eq!(first, expected);
    }

    #[test]
    fn phase_from_seed() {
        assert_eq!(initial_phase(&[0; SEED_LEN]), 0.0);
        assert_eq!(initial_phase(&SEED), (1082269761 % 255) as f64);
        for byte in 0..=u8::MAX {
            let mut seed = SEED;
            seed[0] = byte;
            assert!(initial_phase(&seed) < 255.0);
        }
    }
}
