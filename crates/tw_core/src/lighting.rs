//! Two-valued scene lighting toggles: ambient time of day and overlay dimming.

use glam::Vec4;

pub const DAY_AMBIENT: Vec4 = Vec4::new(0.7, 0.7, 0.7, 1.0);
pub const NIGHT_AMBIENT: Vec4 = Vec4::new(0.1, 0.1, 0.1, 1.0);

/// Ambient light preset selector. Never interpolated.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeOfDay {
    #[default]
    Day,
    Night,
}

impl TimeOfDay {
    pub fn label(self) -> &'static str {
        match self {
            Self::Day => "Day",
            Self::Night => "Night",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Day => Self::Night,
            Self::Night => Self::Day,
        }
    }

    /// RGBA multiplier applied uniformly to every scene quad.
    pub fn ambient(self) -> Vec4 {
        match self {
            Self::Day => DAY_AMBIENT,
            Self::Night => NIGHT_AMBIENT,
        }
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Opacity of the full-viewport black overlay. Exactly two levels exist.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayLevel {
    /// 50% black.
    #[default]
    Dimmed,
    /// Fully transparent.
    Clear,
}

impl OverlayLevel {
    pub fn opacity(self) -> f32 {
        match self {
            Self::Dimmed => 0.5,
            Self::Clear => 0.0,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Dimmed => Self::Clear,
            Self::Clear => Self::Dimmed,
        }
    }

    /// Solid RGBA8 pixel for the overlay texture. Alpha is `opacity * 255`, truncated.
    pub fn pixel(self) -> [u8; 4] {
        [0, 0, 0, (self.opacity() * 255.0) as u8]
    }
}

impl std::fmt::Display for OverlayLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}", self.opacity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_daytime_with_dimmed_overlay() {
        assert_eq!(TimeOfDay::default(), TimeOfDay::Day);
        assert_eq!(OverlayLevel::default(), OverlayLevel::Dimmed);
        assert_eq!(TimeOfDay::default().ambient(), DAY_AMBIENT);
        assert_eq!(OverlayLevel::default().opacity(), 0.5);
    }

    #[test]
    fn next_cycles_through_time_of_day() {
        assert_eq!(TimeOfDay::Day.next(), TimeOfDay::Night);
        assert_eq!(TimeOfDay::Night.next(), TimeOfDay::Day);
    }

    #[test]
    fn ambient_presets_are_fixed() {
        assert_eq!(TimeOfDay::Day.ambient().to_array(), [0.7, 0.7, 0.7, 1.0]);
        assert_eq!(TimeOfDay::Night.ambient().to_array(), [0.1, 0.1, 0.1, 1.0]);
    }

    #[test]
    fn overlay_opacity_is_always_one_of_two_levels() {
        let mut level = OverlayLevel::default();
        for _ in 0..7 {
            level = level.next();
            let opacity = level.opacity();
            assert!(opacity == 0.0 || opacity == 0.5);
        }
        // Odd number of flips from Dimmed lands on Clear.
        assert_eq!(level, OverlayLevel::Clear);
    }

    #[test]
    fn overlay_pixel_is_black_with_scaled_alpha() {
        assert_eq!(OverlayLevel::Dimmed.pixel(), [0, 0, 0, 127]);
        assert_eq!(OverlayLevel::Clear.pixel(), [0, 0, 0, 0]);
    }

    #[test]
    fn display_matches_label() {
        for t in [TimeOfDay::Day, TimeOfDay::Night] {
            assert_eq!(format!("{}", t), t.label());
        }
        assert_eq!(format!("{}", OverlayLevel::Dimmed), "0.5");
        assert_eq!(format!("{}", OverlayLevel::Clear), "0.0");
    }
}
