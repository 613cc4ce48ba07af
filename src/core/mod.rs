pub mod commands;
pub mod config;
pub mod counter;
pub mod date_key;
pub mod error;
pub mod gallery;
pub mod session;


pub use config::*;
pub use counter::*;
pub use error::*;
pub use gallery::*;
pub use session::*;
