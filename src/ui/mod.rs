pub mod canvas;
pub mod mode;
pub mod notice;
pub mod panel;
pub mod viewport;

pub use mode::{Interaction, Mode, Panel};
pub use notice::{NoticeLevel, Notices};
pub use viewport::Viewport;
