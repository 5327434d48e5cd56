mod point;
mod rect;

pub use point::*;
pub use rect::*;
