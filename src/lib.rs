pub mod core;
pub mod gui;
pub mod host;
pub mod video;
