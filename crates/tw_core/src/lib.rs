pub mod input;
pub mod lighting;
pub mod motion;
pub mod scene;
pub mod time;
