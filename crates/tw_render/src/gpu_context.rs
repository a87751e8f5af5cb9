use std::sync::Arc;
use winit::window::Window;

/// Frames the CPU may queue ahead of presentation. Key toggles show up on the
/// very next frame, so keep the queue short.
const MAX_FRAME_LATENCY: u32 = 1;

/// Window surface plus the device and queue that draw into it.
pub struct GpuContext {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub surface_format: wgpu::TextureFormat,
}

impl GpuContext {
    /// Backends come from `WGPU_BACKEND` when set, otherwise every primary backend.
    pub fn new(window: Arc<Window>) -> Result<Self, String> {
        let inner = window.inner_size();
        let backends = wgpu::Backends::from_env().unwrap_or(wgpu::Backends::PRIMARY);
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| format!("Failed to create window surface: {e}"))?;

        // Six textured quads per frame: an integrated GPU is plenty.
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| format!("No GPU adapter ({backends:?}) can present to this window"))?;

        let info = adapter.get_info();
        log::info!("GPU adapter: {} ({:?})", info.name, info.backend);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Tidewater Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults()
                    .using_resolution(adapter.limits()),
                ..Default::default()
            },
            None,
        ))
        .map_err(|e| format!("Failed to open GPU device on '{}': {e}", info.name))?;

        let config = surface_config(
            &surface.get_capabilities(&adapter),
            inner.width,
            inner.height,
        )?;
        surface.configure(&device, &config);
        log::info!(
            "Surface {}x{} {:?}, {:?}",
            config.width,
            config.height,
            config.format,
            config.present_mode
        );

        Ok(Self {
            surface,
            device,
            queue,
            surface_format: config.format,
            config,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// The window is fixed-size, but a DPI change still delivers a new size.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 || (width, height) == self.size() {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Acquire the next swapchain image. `None` means skip this frame.
    pub fn begin_frame(&self) -> Option<(wgpu::SurfaceTexture, wgpu::TextureView)> {
        let output = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return None;
            }
            Err(wgpu::SurfaceError::Timeout) => return None,
            Err(e) => {
                log::warn!("Skipping frame: {e}");
                return None;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        Some((output, view))
    }
}

/// Surface settings for the scene: an sRGB format to match the sRGB layer
/// textures, vsync pacing since cloud drift advances once per frame, and an
/// opaque window.
fn surface_config(
    caps: &wgpu::SurfaceCapabilities,
    width: u32,
    height: u32,
) -> Result<wgpu::SurfaceConfiguration, String> {
    let format = pick_surface_format(&caps.formats)
        .ok_or_else(|| "Surface reports no supported texture formats".to_string())?;
    Ok(wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: width.max(1),
        height: height.max(1),
        present_mode: pick_present_mode(&caps.present_modes),
        alpha_mode: pick_alpha_mode(&caps.alpha_modes),
        view_formats: vec![],
        desired_maximum_frame_latency: MAX_FRAME_LATENCY,
    })
}

fn pick_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|f| f.is_srgb())
        .or_else(|| formats.first().copied())
}

fn pick_present_mode(modes: &[wgpu::PresentMode]) -> wgpu::PresentMode {
    [wgpu::PresentMode::Fifo, wgpu::PresentMode::FifoRelaxed]
        .into_iter()
        .find(|mode| modes.contains(mode))
        .unwrap_or(wgpu::PresentMode::AutoVsync)
}

fn pick_alpha_mode(modes: &[wgpu::CompositeAlphaMode]) -> wgpu::CompositeAlphaMode {
    if modes.contains(&wgpu::CompositeAlphaMode::Opaque) {
        wgpu::CompositeAlphaMode::Opaque
    } else {
        modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::{CompositeAlphaMode, PresentMode, TextureFormat};

    fn caps(
        formats: Vec<TextureFormat>,
        present_modes: Vec<PresentMode>,
        alpha_modes: Vec<CompositeAlphaMode>,
    ) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats,
            present_modes,
            alpha_modes,
            usages: wgpu::TextureUsages::RENDER_ATTACHMENT,
        }
    }

    #[test]
    fn prefers_srgb_format_over_earlier_linear_one() {
        let formats = [TextureFormat::Bgra8Unorm, TextureFormat::Bgra8UnormSrgb];
        assert_eq!(
            pick_surface_format(&formats),
            Some(TextureFormat::Bgra8UnormSrgb)
        );
    }

    #[test]
    fn falls_back_to_first_format_without_srgb() {
        let formats = [TextureFormat::Rgba16Float, TextureFormat::Bgra8Unorm];
        assert_eq!(pick_surface_format(&formats), Some(TextureFormat::Rgba16Float));
        assert_eq!(pick_surface_format(&[]), None);
    }

    #[test]
    fn present_mode_is_vsynced() {
        assert_eq!(
            pick_present_mode(&[PresentMode::Immediate, PresentMode::Mailbox, PresentMode::Fifo]),
            PresentMode::Fifo
        );
        assert_eq!(
            pick_present_mode(&[PresentMode::Immediate, PresentMode::FifoRelaxed]),
            PresentMode::FifoRelaxed
        );
        assert_eq!(pick_present_mode(&[PresentMode::Immediate]), PresentMode::AutoVsync);
    }

    #[test]
    fn alpha_mode_prefers_opaque() {
        assert_eq!(
            pick_alpha_mode(&[CompositeAlphaMode::PreMultiplied, CompositeAlphaMode::Opaque]),
            CompositeAlphaMode::Opaque
        );
        assert_eq!(
            pick_alpha_mode(&[CompositeAlphaMode::PostMultiplied]),
            CompositeAlphaMode::PostMultiplied
        );
        assert_eq!(pick_alpha_mode(&[]), CompositeAlphaMode::Auto);
    }

    #[test]
    fn surface_config_clamps_zero_size_and_rejects_empty_formats() {
        let config = surface_config(
            &caps(
                vec![TextureFormat::Bgra8UnormSrgb],
                vec![PresentMode::Fifo],
                vec![CompositeAlphaMode::Opaque],
            ),
            0,
            800,
        )
        .unwrap();
        assert_eq!((config.width, config.height), (1, 800));
        assert_eq!(config.desired_maximum_frame_latency, MAX_FRAME_LATENCY);

        let err = surface_config(&caps(vec![], vec![], vec![]), 1000, 800).unwrap_err();
        assert!(err.contains("no supported texture formats"));
    }
}
