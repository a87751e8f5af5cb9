//! Tidewater -- layered animation scene, main loop and application entry point.
//!
//! Architecture: winit drives the event loop via `ApplicationHandler` in `Poll`
//! mode. Key events only update `InputState`; everything else happens inside
//! `RedrawRequested`:
//!
//!   1. `SceneClock::begin_frame()` -- sample elapsed time since startup
//!   2. `SceneState::update()` -- consume key edges, advance layer motion
//!   3. regenerate the overlay texture / lighting uniform if a toggle flipped
//!   4. rebuild the six-quad mesh and draw it back to front
//!   5. run the egui speed panel (sliders write into the scene's speeds) and
//!      composite it on top
//!
//! Setup is all-or-nothing: any missing asset or GPU failure aborts before the
//! first frame and the process exits non-zero.

mod assets;
mod layers;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use assets::{read_asset, resolve_manifest, SceneManifest, MANIFEST_PATH};
use layers::{layer_quads, Layer};
use tw_audio::{AmbientSound, SoundClip, DEFAULT_VOLUME};
use tw_core::input::{InputState, Key};
use tw_core::scene::SceneState;
use tw_core::time::SceneClock;
use tw_devtools::{PanelStatus, SpeedPanel};
use tw_platform::window::PlatformConfig;
use tw_render::{GpuContext, LightingUniform, QuadMesh, SpritePipeline, SpriteVertex, Texture};

const CLEAR_COLOR: wgpu::Color = wgpu::Color::BLACK;

struct LayerTexture {
    texture: Texture,
    bind_group: wgpu::BindGroup,
}

/// All mutable scene state lives here. Constructed in `ApplicationHandler::resumed`
/// once the window exists; dropped on exit, which releases every GPU and audio
/// resource it owns.
struct SceneRuntime {
    window: Arc<Window>,
    gpu: GpuContext,
    clock: SceneClock,
    input: InputState,
    scene: SceneState,
    sprite_pipeline: SpritePipeline,
    speed_panel: SpeedPanel,
    sound: AmbientSound,

    /// Indexed by `Layer::slot()`.
    textures: Vec<LayerTexture>,

    // --- Per-frame GPU mesh state -----------------------------------------------
    // Six quads, rebuilt on the CPU every frame and streamed into fixed-size buffers.
    mesh: QuadMesh,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    lighting_buffer: wgpu::Buffer,
    lighting_bind_group: wgpu::BindGroup,
}

impl SceneRuntime {
    fn new(window: Arc<Window>, manifest: &SceneManifest) -> Result<Self, String> {
        let gpu = GpuContext::new(window.clone())?;
        let sprite_pipeline = SpritePipeline::new(&gpu.device, gpu.surface_format);
        let scene = SceneState::new(manifest.speeds);

        let mut textures = Vec::with_capacity(Layer::DRAW_ORDER.len());
        for layer in Layer::DRAW_ORDER {
            let texture = match layer.image_path(manifest) {
                Some(path) => load_layer_texture(&gpu, &sprite_pipeline, layer, path)?,
                None => create_overlay_texture(&gpu, &sprite_pipeline, &scene),
            };
            textures.push(texture);
        }

        let clip = SoundClip::load(Path::new(&manifest.sound))?;
        let sound = AmbientSound::new(clip, DEFAULT_VOLUME);

        let speed_panel = SpeedPanel::new(&gpu.device, gpu.surface_format, &window);

        let lighting_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Lighting Uniform Buffer"),
                contents: bytemuck::cast_slice(&[LightingUniform::from_ambient(scene.ambient())]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let lighting_bind_group =
            sprite_pipeline.create_lighting_bind_group(&gpu.device, &lighting_buffer);

        let quad_count = Layer::DRAW_ORDER.len();
        let vertex_buffer = create_vertex_buffer(&gpu.device, quad_count * 4);
        let index_buffer = create_index_buffer(&gpu.device, quad_count * 6);

        let mut runtime = Self {
            window,
            gpu,
            // Time origin is seeded last so asset loading does not count as scene time.
            clock: SceneClock::start(),
            input: InputState::new(),
            scene,
            sprite_pipeline,
            speed_panel,
            sound,
            textures,
            mesh: QuadMesh::with_capacity(quad_count),
            vertex_buffer,
            index_buffer,
            lighting_buffer,
            lighting_bind_group,
        };
        runtime.rebuild_mesh();
        log::info!(
            "Scene ready: {} layers, {:.2} MB of layer textures",
            runtime.textures.len(),
            runtime.texture_memory_mb()
        );
        Ok(runtime)
    }

    fn texture_memory_mb(&self) -> f32 {
        let bytes: usize = self
            .textures
            .iter()
            .map(|t| (t.texture.size.0 as usize) * (t.texture.size.1 as usize) * 4)
            .sum();
        bytes as f32 / (1024.0 * 1024.0)
    }

    /// Replace the overlay texture with one at the scene's current opacity.
    fn regenerate_overlay(&mut self) {
        let overlay = create_overlay_texture(&self.gpu, &self.sprite_pipeline, &self.scene);
        self.textures[Layer::Overlay.slot()] = overlay;
    }

    fn write_lighting(&self) {
        let uniform = LightingUniform::from_ambient(self.scene.ambient());
        self.gpu
            .queue
            .write_buffer(&self.lighting_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    fn rebuild_mesh(&mut self) {
        self.mesh.clear();
        for quad in layer_quads(&self.scene.motion) {
            self.mesh.add_quad(quad);
        }
        self.gpu
            .queue
            .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&self.mesh.vertices));
        self.gpu
            .queue
            .write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&self.mesh.indices));
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.clock.begin_frame();

        if self.input.is_just_pressed(Key::Escape) {
            log::info!("Escape pressed, exiting.");
            event_loop.exit();
            return;
        }

        // Update phase.
        let changes = self.scene.update(&self.input, self.clock.elapsed_secs);
        self.input.end_frame();
        if changes.overlay_toggled {
            self.regenerate_overlay();
        }
        if changes.time_of_day_toggled {
            self.write_lighting();
        }
        self.sound.keep_playing();
        self.rebuild_mesh();

        // Draw phase.
        let Some((output, view)) = self.gpu.begin_frame() else {
            return;
        };

        let status = PanelStatus {
            time_of_day_label: self.scene.time_of_day.label().to_string(),
            overlay_label: self.scene.overlay.to_string(),
            audio_label: self.sound.status().label().to_string(),
        };
        let (egui_primitives, egui_textures_delta) = self.speed_panel.prepare(
            &self.window,
            &self.clock,
            &mut self.scene.speeds,
            &status,
        );
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.gpu.config.width, self.gpu.config.height],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            render_pass.set_pipeline(&self.sprite_pipeline.render_pipeline);
            render_pass.set_bind_group(0, &self.lighting_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

            for draw in &self.mesh.draw_calls {
                if let Some(layer) = self.textures.get(draw.texture_slot) {
                    render_pass.set_bind_group(1, &layer.bind_group, &[]);
                    render_pass.draw_indexed(
                        draw.index_start..(draw.index_start + draw.index_count),
                        0,
                        0..1,
                    );
                }
            }
        }

        self.speed_panel.upload(
            &self.gpu.device,
            &self.gpu.queue,
            &mut encoder,
            &egui_primitives,
            &egui_textures_delta,
            &screen_descriptor,
        );

        {
            let mut egui_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();

            self.speed_panel
                .paint(&mut egui_pass, &egui_primitives, &screen_descriptor);
        }

        self.speed_panel.cleanup(&egui_textures_delta);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }

    fn shutdown(&mut self) {
        self.sound.stop();
        log::info!(
            "Shutting down after {} frames ({:.1}s)",
            self.clock.frame_count,
            self.clock.elapsed_secs
        );
    }
}

struct App {
    config: PlatformConfig,
    manifest: SceneManifest,
    state: Option<SceneRuntime>,
    startup_error: Option<String>,
}

impl App {
    fn new(manifest: SceneManifest) -> Self {
        Self {
            config: PlatformConfig::default(),
            manifest,
            state: None,
            startup_error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: String) {
        log::error!("Startup failed: {err}");
        self.startup_error = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() || self.startup_error.is_some() {
            return;
        }
        let window = match tw_platform::window::create_window(event_loop, &self.config) {
            Ok(window) => window,
            Err(err) => return self.fail(event_loop, err),
        };
        match SceneRuntime::new(window, &self.manifest) {
            Ok(state) => self.state = Some(state),
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        let egui_consumed = state
            .speed_panel
            .handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.gpu.resize(w, h);
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(scene_key) = map_key(key_code) {
                        // Releases always go through so a key never sticks as held.
                        match event.state {
                            ElementState::Pressed if !egui_consumed => {
                                state.input.key_down(scene_key)
                            }
                            ElementState::Pressed => {}
                            ElementState::Released => state.input.key_up(scene_key),
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                let inner = state.window.inner_size();
                if inner.width == 0 || inner.height == 0 {
                    return;
                }
                state.redraw(event_loop);
            }

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(mut state) = self.state.take() {
            state.shutdown();
        }
    }
}

fn load_layer_texture(
    gpu: &GpuContext,
    pipeline: &SpritePipeline,
    layer: Layer,
    asset_path: &str,
) -> Result<LayerTexture, String> {
    let bytes = read_asset("texture", Path::new(asset_path))?;
    let texture = Texture::from_bytes(&gpu.device, &gpu.queue, &bytes, asset_path)?;
    log::info!(
        "Loaded {} texture '{}' ({}x{})",
        layer.label(),
        asset_path,
        texture.size.0,
        texture.size.1
    );
    let bind_group = pipeline.create_texture_bind_group(&gpu.device, &texture);
    Ok(LayerTexture {
        texture,
        bind_group,
    })
}

fn create_overlay_texture(
    gpu: &GpuContext,
    pipeline: &SpritePipeline,
    scene: &SceneState,
) -> LayerTexture {
    let texture = Texture::solid(
        &gpu.device,
        &gpu.queue,
        scene.overlay.pixel(),
        "overlay",
    );
    let bind_group = pipeline.create_texture_bind_group(&gpu.device, &texture);
    LayerTexture {
        texture,
        bind_group,
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<SpriteVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Scene Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Scene Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::Space => Some(Key::Space),
        KeyCode::KeyN => Some(Key::N),
        KeyCode::Escape => Some(Key::Escape),
        _ => None,
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Tidewater starting...");

    let manifest = match resolve_manifest(Path::new(MANIFEST_PATH)) {
        Ok(manifest) => manifest,
        Err(err) => {
            log::error!("Startup failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            log::error!("Failed to create event loop: {err}");
            return ExitCode::FAILURE;
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(manifest);
    if let Err(err) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {err}");
        return ExitCode::FAILURE;
    }

    if app.startup_error.is_some() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
