pub mod app;
pub mod thumbnails;


pub use app::*;
