use std::f64::consts::PI;

/// A 24 bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// The parameters driving the sine color model.
///
/// `frequency` and `spread` are fixed for a run, `phase` moves forward as
/// characters are painted and carries over between frames.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorState {
    frequency: f64,
    phase: f64,
    spread: f64,
}

impl ColorState {
    pub const DEFAULT_FREQUENCY: f64 = 0.3;
    pub const DEFAULT_SPREAD: f64 = 8.0;

    /// Create a new color state. All values must be finite and `spread` non zero.
    pub fn new(frequency: f64, phase: f64, spread: f64) -> Result<Self, ColorError> {
        for (name, value) in [("frequency", frequency), ("phase", phase), ("spread", spread)] {
            if !value.is_finite() {
                return Err(ColorError::NotFinite(name, value));
            }
        }
        if spread == 0.0 {
            return Err(ColorError::ZeroSpread);
        }
        Ok(Self { frequency, phase, spread })
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn spread(&self) -> f64 {
        self.spread
    }

    /// The position on the sine wave for the current phase.
    pub fn wave_position(&self) -> f64 {
        self.frequency * self.phase / self.spread
    }

    /// The color for the current phase.
    pub fn current_color(&self) -> Rgb {
        sine_rgb(self.wave_position())
    }

    /// Move the phase forward by `step`.
    pub fn advance(&mut self, step: u64) {
        self.phase += step as f64;
    }
}

/// Invalid color model parameters.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ColorError {
    #[error("spread can't be zero")]
    ZeroSpread,

    #[error("{0} must be a finite number, got {1}")]
    NotFinite(&'static str, f64),
}

/// Map a position on the wave to a color using three sine waves 120 degrees apart.
///
/// Channels are truncated, not rounded: `sin(x) * 127 + 128` always lands in `[1, 255]`.
pub fn sine_rgb(position: f64) -> Rgb {
    Rgb::new(channel(position), channel(position + PI * 2.0 / 3.0), channel(position + PI * 4.0 / 3.0))
}

fn channel(position: f64) -> u8 {
    (position.sin() * 127.0 + 128.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn zero_phase() {
        assert_eq!(sine_rgb(0.0), Rgb::new(128, 237, 18));
    }

    #[rstest]
    #[case::quarter(PI / 2.0, Rgb::new(255, 64, 64))]
    #[case::half(PI, Rgb::new(128, 18, 237))]
    #[case::three_quarters(PI * 1.5, Rgb::new(1, 191, 191))]
    fn known_positions(#[case] position: f64, #[case] expected: Rgb) {
        assert_eq!(sine_rgb(position), expected);
    }

    #[test]
    fn channels_stay_in_range() {
        for step in 0..10_000 {
            let position = step as f64 * 0.01 - 50.0;
            let color = sine_rgb(position);
            for channel in [color.r, color.g, color.b] {
                assert!(channel >= 1, "channel {channel} at {position}");
            }
        }
    }

    #[test]
    fn pure_function() {
        for position in [0.0, 0.1, 1.5, -3.2, 1e6] {
            assert_eq!(sine_rgb(position), sine_rgb(position));
        }
    }

    #[test]
    fn wave_position_uses_all_parameters() {
        let state = ColorState::new(0.3, 16.0, 8.0).unwrap();
        assert!((state.wave_position() - 0.6).abs() < 1e-12);
        assert_eq!(state.current_color(), sine_rgb(0.6));
    }

    #[test]
    fn advance_moves_phase() {
        let mut state = ColorState::new(0.3, 1.5, 8.0).unwrap();
        state.advance(0);
        assert_eq!(state.phase(), 1.5);
        state.advance(4);
        assert_eq!(state.phase(), 5.5);
    }

    #[rstest]
    #[case::zero_spread(0.3, 0.0, 0.0, ColorError::ZeroSpread)]
    #[case::negative_zero_spread(0.3, 0.0, -0.0, ColorError::ZeroSpread)]
    #[case::infinite_frequency(f64::INFINITY, 0.0, 8.0, ColorError::NotFinite("frequency", f64::INFINITY))]
    #[case::infinite_phase(0.3, f64::NEG_INFINITY, 8.0, ColorError::NotFinite("phase", f64::NEG_INFINITY))]
    fn invalid_parameters(#[case] frequency: f64, #[case] phase: f64, #[case] spread: f64, #[case] expected: ColorError) {
        assert_eq!(ColorState::new(frequency, phase, spread), Err(expected));
    }

    #[test]
    fn nan_spread_rejected() {
        assert!(matches!(ColorState::new(0.3, 0.0, f64::NAN), Err(ColorError::NotFinite("spread", _))));
    }

    #[test]
    fn accessors() {
        let state = ColorState::new(0.5, 2.0, 4.0).unwrap();
        assert_eq!((state.frequency(), state.phase(), state.spread()), (0.5, 2.0, 4.0));
    }
}
