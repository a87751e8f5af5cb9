//! "Speed Controls" panel rendered via egui on top of the layered scene.
//!
//! Integration pattern: egui requires a three-phase render split because
//! `egui_wgpu::Renderer::render()` needs a `RenderPass<'static>`, while
//! `begin_render_pass` borrows the encoder. The phases are:
//!
//!   1. `prepare()` -- run egui UI logic, produce tessellated primitives
//!   2. `upload()`  -- upload textures and update GPU buffers (borrows encoder mutably)
//!   3. `paint()`   -- render into a new render pass with `forget_lifetime()`
//!   4. `cleanup()` -- free textures egui no longer references
//!
//! Sliders write straight into `SpeedSettings`; the scene reads the new values
//! on its next update.

use tw_core::motion::{SpeedSettings, CLOUD_SPEED_MAX, WOBBLE_SPEED_MAX};
use tw_core::time::SceneClock;
use winit::window::Window;

pub const PANEL_TITLE: &str = "Speed Controls";

#[derive(Debug, Clone, Default)]
pub struct PanelStatus {
    /// e.g. "Day"
    pub time_of_day_label: String,
    /// e.g. "0.5"
    pub overlay_label: String,
    /// e.g. "Audio: playing"
    pub audio_label: String,
}

pub struct SpeedPanel {
    pub egui_ctx: egui::Context,
    pub egui_winit_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
}

impl SpeedPanel {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &Window,
    ) -> Self {
        let egui_ctx = egui::Context::default();
        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self {
            egui_ctx,
            egui_winit_state,
            egui_renderer,
        }
    }

    /// Returns true when egui consumed the event (e.g. a focused slider took a key).
    pub fn handle_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        let response = self.egui_winit_state.on_window_event(window, event);
        response.consumed
    }

    pub fn prepare(
        &mut self,
        window: &Window,
        clock: &SceneClock,
        speeds: &mut SpeedSettings,
        status: &PanelStatus,
    ) -> (Vec<egui::ClippedPrimitive>, egui::TexturesDelta) {
        let raw_input = self.egui_winit_state.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            show_panel(ctx, clock, speeds, status);
        });

        self.egui_winit_state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        (primitives, full_output.textures_delta)
    }

    /// Upload textures and update buffers. Call before creating the egui render pass.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        primitives: &[egui::ClippedPrimitive],
        textures_delta: &egui::TexturesDelta,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, primitives, screen_descriptor);
    }

    /// Render into an existing render pass. Call after `upload()`.
    pub fn paint(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.egui_renderer
            .render(render_pass, primitives, screen_descriptor);
    }

    /// Free textures that egui no longer needs. Call after rendering.
    pub fn cleanup(&mut self, textures_delta: &egui::TexturesDelta) {
        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

fn show_panel(
    ctx: &egui::Context,
    clock: &SceneClock,
    speeds: &mut SpeedSettings,
    status: &PanelStatus,
) {
    egui::Window::new(PANEL_TITLE)
        .default_pos([10.0, 10.0])
        .resizable(false)
        .show(ctx, |ui| {
            speed_sliders(ui, speeds);

            ui.separator();
            ui.label(format!("FPS: {:.1}", clock.smoothed_fps));
            ui.label(format!("Frame time: {:.2} ms", clock.smoothed_frame_time_ms));
            ui.label(format!("Time of day: {} (Space)", status.time_of_day_label));
            ui.label(format!("Overlay opacity: {} (N)", status.overlay_label));
            ui.label(&status.audio_label);
        });
}

fn speed_sliders(ui: &mut egui::Ui, speeds: &mut SpeedSettings) {
    ui.add(
        egui::Slider::new(&mut speeds.cloud, 0.0..=CLOUD_SPEED_MAX)
            .text("Cloud Speed")
            .max_decimals(6),
    );
    ui.add(egui::Slider::new(&mut speeds.boat, 0.0..=WOBBLE_SPEED_MAX).text("Boat Speed"));
    ui.add(egui::Slider::new(&mut speeds.tree, 0.0..=WOBBLE_SPEED_MAX).text("Tree Speed"));
    ui.add(egui::Slider::new(&mut speeds.water, 0.0..=WOBBLE_SPEED_MAX).text("Water Speed"));
}
