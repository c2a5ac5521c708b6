// Domain entities
pub mod event;
pub mod model;

pub use event::*;
pub use model::*;
