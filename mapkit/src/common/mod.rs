mod constants;
mod type_utils;

pub use constants::*;
pub use type_utils::*;
