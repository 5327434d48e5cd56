mod timer;
mod frame_builder;

pub use timer::*;
pub use frame_builder::*;
