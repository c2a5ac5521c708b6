pub mod ops_handlers;
pub mod webhook_handlers;
pub mod ws_handlers;

pub use ops_handlers::*;
pub use webhook_handlers::*;
pub use ws_handlers::*;
