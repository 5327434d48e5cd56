#[cfg(feature = "scenario")]
mod initial_conditions;

#[cfg(feature = "scenario")]
pub use initial_conditions::*;
