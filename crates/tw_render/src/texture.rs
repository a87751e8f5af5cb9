/// An RGBA8 sRGB texture with its view and a linear-filtering sampler.
///
/// Row 0 of the uploaded pixels is the top of the image, which is also
/// `v = 0` in wgpu's texture space. No flip is needed to draw images upright.
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub size: (u32, u32),
}

impl Texture {
    /// Decode an encoded image (PNG) and upload it.
    pub fn from_bytes(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bytes: &[u8],
        label: &str,
    ) -> Result<Self, String> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| format!("Failed to decode image '{label}': {e}"))?
            .to_rgba8();
        let (width, height) = image.dimensions();
        check_texture_size(label, width, height, device.limits().max_texture_dimension_2d)?;
        Ok(Self::from_rgba8(device, queue, &image, width, height, label))
    }

    pub fn from_rgba8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        rgba: &[u8],
        width: u32,
        height: u32,
        label: &str,
    ) -> Self {
        debug_assert_eq!(rgba.len(), (width * height * 4) as usize);
        let extent = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            extent,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
            size: (width, height),
        }
    }

    /// A 1x1 texture of a single colour, stretched by the sampler to any quad.
    pub fn solid(device: &wgpu::Device, queue: &wgpu::Queue, rgba: [u8; 4], label: &str) -> Self {
        Self::from_rgba8(device, queue, &rgba, 1, 1, label)
    }
}

/// Reject images the device cannot hold before wgpu validation panics on them.
fn check_texture_size(label: &str, width: u32, height: u32, max: u32) -> Result<(), String> {
    if width > max || height > max {
        return Err(format!(
            "Texture '{label}' is {width}x{height}, exceeds GPU limit {max}"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_at_limit_is_accepted() {
        assert!(check_texture_size("background2.png", 8192, 8192, 8192).is_ok());
        assert!(check_texture_size("cloud2.png", 1000, 800, 2048).is_ok());
    }

    #[test]
    fn oversized_image_names_file_and_limit() {
        let err = check_texture_size("water3.png", 8193, 600, 8192).unwrap_err();
        assert_eq!(err, "Texture 'water3.png' is 8193x600, exceeds GPU limit 8192");

        let err = check_texture_size("tree2.png", 512, 4096, 2048).unwrap_err();
        assert!(err.contains("512x4096"));
    }
}
