#[cfg(feature = "reference-force")]
mod reference_force;

#[cfg(feature = "reference-force")]
pub use reference_force::*;
