pub mod ambient;

pub use ambient::{AmbientSound, AudioStatus, SoundClip, DEFAULT_VOLUME};
