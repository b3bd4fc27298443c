//! WebSocket module for exchange connection management

mod client;
mod manager;

pub use client::WebSocketClient;
pub use manager::{WebSocketManager, DEFAULT_CONNECT_TIMEOUT, DEFAULT_RECV_TIMEOUT};
