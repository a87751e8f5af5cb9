//! Per-frame layer motion.
//!
//! Two kinds of motion exist:
//!   - the cloud drifts linearly to the right by `cloud` units per frame and
//!     wraps in [0, 1);
//!   - boat, tree and water oscillate as `amplitude * sin(t * speed)` where `t`
//!     is absolute elapsed seconds. Offsets are recomputed from scratch every
//!     frame, so a speed change never integrates into a drift.
//!
//! Scalars are f64 so the cloud's per-frame accumulation stays exact enough
//! over long runs; vertex code narrows to f32.

use serde::Deserialize;

pub const WOBBLE_AMPLITUDE: f64 = 0.008;

pub const CLOUD_SPEED_MAX: f64 = 0.0001;
pub const WOBBLE_SPEED_MAX: f64 = 2.0;

/// Positions this close below 1.0 count as having reached the wrap point.
const WRAP_EPSILON: f64 = 1e-9;

/// User-adjustable speeds, bound to the GUI sliders.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpeedSettings {
    /// Cloud drift per frame, in viewport widths.
    pub cloud: f64,
    pub boat: f64,
    pub tree: f64,
    pub water: f64,
}

impl Default for SpeedSettings {
    fn default() -> Self {
        Self {
            cloud: 0.00005,
            boat: 1.0,
            tree: 1.0,
            water: 1.0,
        }
    }
}

impl SpeedSettings {
    /// Clamp every speed into its slider range. Used for values that did not
    /// come through a slider (manifest overrides).
    pub fn clamped(self) -> Self {
        Self {
            cloud: self.cloud.clamp(0.0, CLOUD_SPEED_MAX),
            boat: self.boat.clamp(0.0, WOBBLE_SPEED_MAX),
            tree: self.tree.clamp(0.0, WOBBLE_SPEED_MAX),
            water: self.water.clamp(0.0, WOBBLE_SPEED_MAX),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayerMotion {
    /// Horizontal cloud offset, always in [0, 1).
    pub cloud_position: f64,
    pub boat_offset_y: f64,
    pub tree_offset_x: f64,
    pub water_offset_x: f64,
}

impl LayerMotion {
    pub fn update(&mut self, elapsed_secs: f64, speeds: &SpeedSettings) {
        self.cloud_position = advance_cloud(self.cloud_position, speeds.cloud);
        self.boat_offset_y = oscillate(WOBBLE_AMPLITUDE, elapsed_secs, speeds.boat);
        self.tree_offset_x = oscillate(WOBBLE_AMPLITUDE, elapsed_secs, speeds.tree);
        self.water_offset_x = oscillate(WOBBLE_AMPLITUDE, elapsed_secs, speeds.water);
    }
}

pub fn oscillate(amplitude: f64, elapsed_secs: f64, speed: f64) -> f64 {
    amplitude * (elapsed_secs * speed).sin()
}

pub fn advance_cloud(position: f64, speed: f64) -> f64 {
    let next = (position + speed).rem_euclid(1.0);
    // Summation error leaves 20000 * 0.00005 a hair short of 1.0.
    if next >= 1.0 - WRAP_EPSILON {
        0.0
    } else {
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_motion_is_zero() {
        let mut motion = LayerMotion::default();
        assert_eq!(motion.cloud_position, 0.0);

        let speeds = SpeedSettings {
            cloud: 0.0,
            ..SpeedSettings::default()
        };
        motion.update(0.0, &speeds);
        assert_eq!(motion, LayerMotion::default());
    }

    #[test]
    fn oscillation_matches_sine_and_stays_in_amplitude() {
        for &t in &[0.0, 0.3, 1.0, 2.5, 100.0, 12345.678] {
            for &s in &[0.0, 0.5, 1.0, 2.0] {
                let value = oscillate(WOBBLE_AMPLITUDE, t, s);
                assert!((value - WOBBLE_AMPLITUDE * (t * s).sin()).abs() < 1e-15);
                assert!(value.abs() <= WOBBLE_AMPLITUDE);
            }
        }
    }

    #[test]
    fn oscillation_peaks_at_quarter_period() {
        let t = std::f64::consts::FRAC_PI_2;
        assert!((oscillate(WOBBLE_AMPLITUDE, t, 1.0) - WOBBLE_AMPLITUDE).abs() < 1e-15);
        assert!((oscillate(WOBBLE_AMPLITUDE, 3.0 * t, 1.0) + WOBBLE_AMPLITUDE).abs() < 1e-15);
    }

    #[test]
    fn cloud_after_n_frames_is_product_mod_one() {
        let mut position = 0.0;
        for _ in 0..1234 {
            position = advance_cloud(position, 0.00005);
        }
        assert!((position - (1234.0 * 0.00005f64) % 1.0).abs() < 1e-9);
    }

    #[test]
    fn cloud_wraps_exactly_once_after_twenty_thousand_frames() {
        let mut motion = LayerMotion::default();
        let speeds = SpeedSettings::default();
        let mut wraps = 0;
        for frame in 0..20_000 {
            let before = motion.cloud_position;
            motion.update(frame as f64 / 60.0, &speeds);
            if motion.cloud_position < before {
                wraps += 1;
            }
            assert!((0.0..1.0).contains(&motion.cloud_position));
        }
        assert!(motion.cloud_position < 1e-9);
        assert_eq!(wraps, 1);
    }

    #[test]
    fn cloud_snaps_to_zero_just_below_the_wrap_point() {
        assert_eq!(advance_cloud(0.99995, 0.00005 - 1e-13), 0.0);
        assert_eq!(advance_cloud(-1e-17, 0.0), 0.0);
        assert!(advance_cloud(0.9999, 0.00005) > 0.999);
    }

    #[test]
    fn cloud_position_stays_in_unit_interval_for_large_speed() {
        let mut position = 0.0;
        for _ in 0..10_000 {
            position = advance_cloud(position, 0.37);
            assert!((0.0..1.0).contains(&position));
        }
    }

    #[test]
    fn speed_change_affects_next_update_directly() {
        let mut motion = LayerMotion::default();
        let mut speeds = SpeedSettings::default();
        motion.update(1.0, &speeds);
        let before = motion.boat_offset_y;

        speeds.boat = 2.0;
        motion.update(1.0, &speeds);
        assert!((motion.boat_offset_y - oscillate(WOBBLE_AMPLITUDE, 1.0, 2.0)).abs() < 1e-15);
        assert!((motion.boat_offset_y - before).abs() > 1e-6);
    }

    #[test]
    fn default_speeds() {
        let speeds = SpeedSettings::default();
        assert_eq!(speeds.cloud, 0.00005);
        assert_eq!((speeds.boat, speeds.tree, speeds.water), (1.0, 1.0, 1.0));
    }

    #[test]
    fn clamped_limits_to_slider_ranges() {
        let speeds = SpeedSettings {
            cloud: 1.0,
            boat: -3.0,
            tree: 5.0,
            water: 0.5,
        }
        .clamped();
        assert_eq!(speeds.cloud, CLOUD_SPEED_MAX);
        assert_eq!(speeds.boat, 0.0);
        assert_eq!(speeds.tree, WOBBLE_SPEED_MAX);
        assert_eq!(speeds.water, 0.5);
    }

    #[test]
    fn speed_settings_deserialize_with_defaults() {
        let speeds: SpeedSettings = serde_json::from_str(r#"{ "boat": 1.5 }"#).unwrap();
        assert_eq!(speeds.boat, 1.5);
        assert_eq!(speeds.cloud, SpeedSettings::default().cloud);
    }
}
