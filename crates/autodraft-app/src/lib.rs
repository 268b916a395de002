// Auto-draft server: configuration, client protocol, WebSocket transport and
// the request loop on top of `autodraft-core`.

pub mod app;
pub mod config;
pub mod protocol;
pub mod ws_server;
