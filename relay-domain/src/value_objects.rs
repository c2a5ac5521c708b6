// Domain value objects
pub mod identifiers;

pub use identifiers::*;
