pub mod casing;
pub mod check;
pub mod constants;

pub use casing::*;
pub use check::*;
pub use constants::*;
