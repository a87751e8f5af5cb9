//! The six scene layers, their draw order and where each one sits this frame.

use glam::Vec2;

use tw_core::motion::LayerMotion;
use tw_render::QuadSpec;

use crate::assets::SceneManifest;

/// Vertical band the cloud strip occupies, in NDC.
const CLOUD_BAND: (f32, f32) = (0.2, 0.7);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Background,
    Cloud,
    Tree,
    Water,
    Boat,
    Overlay,
}

impl Layer {
    /// Back-to-front draw order. The index of a layer here is its texture slot.
    pub const DRAW_ORDER: [Layer; 6] = [
        Layer::Background,
        Layer::Cloud,
        Layer::Tree,
        Layer::Water,
        Layer::Boat,
        Layer::Overlay,
    ];

    pub fn slot(self) -> usize {
        match self {
            Self::Background => 0,
            Self::Cloud => 1,
            Self::Tree => 2,
            Self::Water => 3,
            Self::Boat => 4,
            Self::Overlay => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Cloud => "cloud",
            Self::Tree => "tree",
            Self::Water => "water",
            Self::Boat => "boat",
            Self::Overlay => "overlay",
        }
    }

    /// Image file for image-backed layers. The overlay is generated in memory.
    pub fn image_path(self, manifest: &SceneManifest) -> Option<&str> {
        match self {
            Self::Background => Some(manifest.background.as_str()),
            Self::Cloud => Some(manifest.cloud.as_str()),
            Self::Tree => Some(manifest.tree.as_str()),
            Self::Water => Some(manifest.water.as_str()),
            Self::Boat => Some(manifest.boat.as_str()),
            Self::Overlay => None,
        }
    }

    /// NDC rectangle for this layer given the current motion.
    pub fn rect(self, motion: &LayerMotion) -> (Vec2, Vec2) {
        match self {
            Self::Background | Self::Overlay => (Vec2::splat(-1.0), Vec2::splat(1.0)),
            Self::Cloud => {
                let x = motion.cloud_position as f32;
                (
                    Vec2::new(x - 1.0, CLOUD_BAND.0),
                    Vec2::new(x, CLOUD_BAND.1),
                )
            }
            Self::Tree => shifted_x(motion.tree_offset_x as f32),
            Self::Water => shifted_x(motion.water_offset_x as f32),
            Self::Boat => {
                let y = motion.boat_offset_y as f32;
                (Vec2::new(-1.0, -1.0 + y), Vec2::new(1.0, 1.0 + y))
            }
        }
    }
}

fn shifted_x(x: f32) -> (Vec2, Vec2) {
    (Vec2::new(-1.0 + x, -1.0), Vec2::new(1.0 + x, 1.0))
}

/// Quads for every layer, back to front.
pub fn layer_quads(motion: &LayerMotion) -> impl Iterator<Item = QuadSpec> + '_ {
    Layer::DRAW_ORDER.into_iter().map(move |layer| {
        let (min, max) = layer.rect(motion);
        QuadSpec {
            texture_slot: layer.slot(),
            min,
            max,
            color: [1.0; 4],
        }
    })
}
