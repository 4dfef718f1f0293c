//! HTTP server module for the request gate.

mod server;
mod service;

pub use server::HttpServer;
pub use service::{build_router, FORWARDED_FOR_HEADER};
