pub mod connection;
pub mod endpoint;
pub mod registry;
