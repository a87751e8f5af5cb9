pub mod speed_panel;

pub use speed_panel::{PanelStatus, SpeedPanel};
