pub mod codec;
pub mod connection;
pub mod listener;

pub use connection::handle_connection;
pub use listener::{serve, serve_listener};
