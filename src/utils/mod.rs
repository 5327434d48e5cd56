pub mod constants;
pub mod constants_config;
pub mod errors;
pub mod math_helpers;

pub use constants::*;
pub use constants_config::*;
pub use errors::*;
pub use math_helpers::*;
