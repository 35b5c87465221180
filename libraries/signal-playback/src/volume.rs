//! Listener volume
//!
//! Linear gain in `[0.0, 1.0]`, handed to the backend unchanged. The backend
//! owns any perceptual curve.

/// Default listener volume
pub const DEFAULT_VOLUME: f32 = 0.8;

/// Volume level clamped to `[0.0, 1.0]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume(f32);

impl Volume {
    /// Create a volume, clamping out-of-range input
    ///
    /// NaN maps to silence.
    pub fn new(level: f32) -> Self {
        if level.is_nan() {
            Self(0.0)
        } else {
            Self(level.clamp(0.0, 1.0))
        }
    }

    /// Current level
    pub fn level(self) -> f32 {
        self.0
    }

    /// Whether the level is zero
    pub fn is_silent(self) -> bool {
        self.0 == 0.0
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(DEFAULT_VOLUME)
    }
}

impl From<f32> for Volume {
    fn from(level: f32) -> Self {
        Self::new(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_volume() {
        assert_eq!(Volume::default().level(), 0.8);
    }

    #[test]
    fn clamps_to_unit_range() {
        assert_eq!(Volume::new(1.5).level(), 1.0);
        assert_eq!(Volume::new(-0.2).level(), 0.0);
        assert_eq!(Volume::new(0.35).level(), 0.35);
    }

    #[test]
    fn nan_is_silence() {
        assert!(Volume::new(f32::NAN).is_silent());
    }

    #[test]
    fn infinities_clamp() {
        assert_eq!(Volume::new(f32::INFINITY).level(), 1.0);
        assert_eq!(Volume::new(f32::NEG_INFINITY).level(), 0.0);
    }
}
