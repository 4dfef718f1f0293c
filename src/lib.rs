//! Subnetgate - Per-Subnet HTTP Rate Limiter
//!
//! This crate implements an HTTP request gate that limits traffic per IPv4
//! subnet. Requests are grouped by a configurable, byte-aligned address
//! prefix; each subnet's counter expires lazily via a sliding idle-timeout
//! rather than a clock-aligned window.

pub mod config;
pub mod error;
pub mod http;
pub mod ratelimit;
