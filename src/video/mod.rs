pub mod crop;
pub mod processor;

pub use crop::*;
pub use processor::*;
