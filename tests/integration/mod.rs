//! Integration tests with mock HTTP server

pub mod gated_transport;
pub mod mock_server;
pub mod refresh;
