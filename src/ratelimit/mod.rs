//! Rate limiting logic and state management.

mod limiter;
mod subnet;

pub use limiter::{LimiterConfig, RateLimiter};
pub use subnet::{extract_subnet, SubnetKey};
