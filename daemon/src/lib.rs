//! HTTP front end of the eight ball service.
//!
//! `http_server` exposes `/magic8ball/ask` in a single-question (GET) and a
//! batch (POST) form on top of the responder and dispatcher from
//! `eightball-core`.

pub mod http_server;

pub use http_server::{router, run_server, AppState, ASK_PATH};
