//! Per-frame scene state and its update step.
//!
//! `SceneState` owns every scalar the loop reads or writes: layer motion, the
//! GUI-bound speeds and the two lighting toggles. The render side reads it by
//! shared reference after `update` has run.

use glam::Vec4;

use crate::input::{InputState, Key};
use crate::lighting::{OverlayLevel, TimeOfDay};
use crate::motion::{LayerMotion, SpeedSettings};

#[derive(Debug, Clone, Default)]
pub struct SceneState {
    pub motion: LayerMotion,
    pub speeds: SpeedSettings,
    pub time_of_day: TimeOfDay,
    pub overlay: OverlayLevel,
}

/// What changed during one `update`, for the caller to act on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameChanges {
    pub time_of_day_toggled: bool,
    /// The overlay texture must be regenerated at `SceneState::overlay`.
    pub overlay_toggled: bool,
}

impl SceneState {
    pub fn new(speeds: SpeedSettings) -> Self {
        Self {
            speeds,
            ..Self::default()
        }
    }

    pub fn ambient(&self) -> Vec4 {
        self.time_of_day.ambient()
    }

    pub fn update(&mut self, input: &InputState, elapsed_secs: f64) -> FrameChanges {
        let mut changes = FrameChanges::default();

        if input.is_just_pressed(Key::Space) {
            self.time_of_day = self.time_of_day.next();
            changes.time_of_day_toggled = true;
            log::info!("Time of day: {}", self.time_of_day);
        }
        if input.is_just_pressed(Key::N) {
            self.overlay = self.overlay.next();
            changes.overlay_toggled = true;
            log::info!("Overlay opacity: {}", self.overlay);
        }

        self.motion.update(elapsed_secs, &self.speeds);
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lighting::{DAY_AMBIENT, NIGHT_AMBIENT};

    /// Drive one frame: the caller applies key events, then update, then end_frame.
    fn frame(state: &mut SceneState, input: &mut InputState, t: f64) -> FrameChanges {
        let changes = state.update(input, t);
        input.end_frame();
        changes
    }

    #[test]
    fn initial_frame_matches_startup_scenario() {
        let mut state = SceneState::new(SpeedSettings::default());
        let mut input = InputState::new();
        assert_eq!(state.motion.cloud_position, 0.0);
        let changes = frame(&mut state, &mut input, 0.0);

        assert_eq!(changes, FrameChanges::default());
        assert_eq!(state.motion.boat_offset_y, 0.0);
        assert_eq!(state.motion.tree_offset_x, 0.0);
        assert_eq!(state.motion.water_offset_x, 0.0);
        assert_eq!(state.ambient(), DAY_AMBIENT);
        assert_eq!(state.overlay.opacity(), 0.5);
    }

    #[test]
    fn holding_space_switches_to_night_exactly_once() {
        let mut state = SceneState::default();
        let mut input = InputState::new();

        input.key_down(Key::Space);
        let first = frame(&mut state, &mut input, 0.0);
        assert!(first.time_of_day_toggled);
        assert_eq!(state.ambient(), NIGHT_AMBIENT);

        for i in 1..120 {
            // Auto-repeat keeps sending Pressed while held.
            input.key_down(Key::Space);
            let changes = frame(&mut state, &mut input, i as f64 / 60.0);
            assert!(!changes.time_of_day_toggled);
        }
        assert_eq!(state.time_of_day, TimeOfDay::Night);
    }

    #[test]
    fn each_discrete_space_press_flips_once() {
        let mut state = SceneState::default();
        let mut input = InputState::new();
        let mut flips = 0;
        for _ in 0..5 {
            input.key_down(Key::Space);
            for _ in 0..3 {
                flips += frame(&mut state, &mut input, 0.0).time_of_day_toggled as u32;
            }
            input.key_up(Key::Space);
            flips += frame(&mut state, &mut input, 0.0).time_of_day_toggled as u32;
        }
        assert_eq!(flips, 5);
        assert_eq!(state.time_of_day, TimeOfDay::Night);
    }

    #[test]
    fn overlay_flips_once_per_press_and_stays_two_valued() {
        let mut state = SceneState::default();
        let mut input = InputState::new();
        let mut regenerations = 0;
        for press in 0..4 {
            input.key_down(Key::N);
            for _ in 0..10 {
                let changes = frame(&mut state, &mut input, 0.0);
                regenerations += changes.overlay_toggled as u32;
                let opacity = state.overlay.opacity();
                assert!(opacity == 0.0 || opacity == 0.5);
            }
            input.key_up(Key::N);
            frame(&mut state, &mut input, 0.0);
            assert_eq!(regenerations, press + 1);
        }
        assert_eq!(state.overlay, OverlayLevel::Dimmed);
    }

    #[test]
    fn both_toggles_in_same_frame_are_independent() {
        let mut state = SceneState::default();
        let mut input = InputState::new();
        input.key_down(Key::Space);
        input.key_down(Key::N);
        let changes = frame(&mut state, &mut input, 0.0);
        assert!(changes.time_of_day_toggled && changes.overlay_toggled);
        assert_eq!(state.time_of_day, TimeOfDay::Night);
        assert_eq!(state.overlay, OverlayLevel::Clear);
    }

    #[test]
    fn slider_change_applies_on_next_frame() {
        let mut state = SceneState::default();
        let mut input = InputState::new();
        frame(&mut state, &mut input, 2.0);
        state.speeds.water = 0.0;
        frame(&mut state, &mut input, 2.0);
        assert_eq!(state.motion.water_offset_x, 0.0);
        assert!(state.motion.tree_offset_x != 0.0);
    }
}
