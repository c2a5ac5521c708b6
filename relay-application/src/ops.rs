pub mod connection;
pub mod connection_lifecycle;
pub mod connection_registry;

pub use connection::Connection;
pub use connection_lifecycle::{run_connection, CloseReason, InboundFrame};
pub use connection_registry::ConnectionRegistry;
