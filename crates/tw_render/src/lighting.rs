use glam::Vec4;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingUniform {
    pub ambient: [f32; 4],
}

impl LightingUniform {
    pub fn from_ambient(ambient: Vec4) -> Self {
        Self {
            ambient: ambient.to_array(),
        }
    }
}
