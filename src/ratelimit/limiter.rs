//! Core rate limiter implementation.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::error::{Result, SubnetgateError};

use super::subnet::{extract_subnet, SubnetKey};

/// Validated limiter settings, immutable after construction.
#[derive(Debug, Clone)]
pub struct LimiterConfig {
    /// Bits of the address used to form the subnet key (byte-aligned)
    pub prefix_size_bits: u32,
    /// Maximum requests per subnet within one cooldown window
    pub limit: u64,
    /// Sliding idle-timeout after which a subnet's counter is stale
    pub cooldown: Duration,
}

impl LimiterConfig {
    /// Validate and build a limiter configuration.
    ///
    /// Fails fast so the limiter can never exist in a partially-configured
    /// state: the prefix must be byte-aligned and within the 32-bit IPv4
    /// address width, the limit positive, the cooldown non-zero.
    pub fn new(prefix_size_bits: u32, limit: u64, cooldown: Duration) -> Result<Self> {
        if prefix_size_bits == 0 || prefix_size_bits > 32 {
            return Err(SubnetgateError::Config(format!(
                "prefix size must be between 8 and 32 bits, got {}",
                prefix_size_bits
            )));
        }
        if prefix_size_bits % 8 != 0 {
            return Err(SubnetgateError::Config(format!(
                "prefix size must be byte-aligned, got {} bits",
                prefix_size_bits
            )));
        }
        if limit == 0 {
            return Err(SubnetgateError::Config(
                "request limit must be positive".to_string(),
            ));
        }
        if cooldown.is_zero() {
            return Err(SubnetgateError::Config(
                "cooldown must be non-zero".to_string(),
            ));
        }

        Ok(Self {
            prefix_size_bits,
            limit,
            cooldown,
        })
    }
}

/// Per-subnet counter state.
///
/// Kept as a single composite record so the count and its timestamp can
/// never fall out of sync.
#[derive(Debug, Clone, Copy)]
struct SubnetState {
    /// Requests seen since the subnet was first tracked or last went stale
    count: u64,
    /// When the most recent increment happened
    last_hit: Instant,
}

/// The core rate limiter that tracks request counts per subnet.
///
/// Expiry is lazy: a stale entry is not purged in the background, it is
/// normalized the next time `increment` touches it. `is_limited` treats a
/// stale entry as expired without clearing it, which keeps the read path
/// free of writes. This struct is thread-safe and can be shared across
/// multiple tasks.
pub struct RateLimiter {
    /// Counter state indexed by subnet key
    subnets: RwLock<HashMap<SubnetKey, SubnetState>>,
    config: LimiterConfig,
}

impl RateLimiter {
    /// Create a new rate limiter with the given configuration.
    pub fn new(config: LimiterConfig) -> Self {
        Self {
            subnets: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Record one request from `address` against its subnet.
    ///
    /// Takes the write lock for the whole read-check-then-write sequence, so
    /// concurrent increments against the same subnet never lose updates.
    pub fn increment(&self, address: &str) -> Result<()> {
        let key = extract_subnet(address, self.config.prefix_size_bits)?;
        let now = Instant::now();

        let mut subnets = self.subnets.write();
        let state = subnets.entry(key.clone()).or_insert_with(|| {
            debug!(subnet = %key, "Tracking new subnet");
            SubnetState {
                count: 0,
                last_hit: now,
            }
        });

        // Reset-on-touch: a counter idle past the cooldown restarts from zero.
        if now.duration_since(state.last_hit) > self.config.cooldown {
            trace!(subnet = %key, stale_count = state.count, "Counter stale, resetting");
            state.count = 0;
        }

        state.count += 1;
        state.last_hit = now;

        trace!(subnet = %key, count = state.count, "Incremented subnet counter");
        Ok(())
    }

    /// Check whether requests from `address` should be rejected.
    ///
    /// Read-only: a stale entry reads as not limited but is left in place
    /// for the next `increment` to normalize.
    pub fn is_limited(&self, address: &str) -> Result<bool> {
        let key = extract_subnet(address, self.config.prefix_size_bits)?;

        let subnets = self.subnets.read();
        let Some(state) = subnets.get(&key) else {
            return Ok(false);
        };

        if state.last_hit.elapsed() > self.config.cooldown {
            return Ok(false);
        }

        Ok(state.count >= self.config.limit)
    }

    /// Remove all state for an already-derived subnet key.
    ///
    /// The caller supplies the key directly rather than an address. Resetting
    /// an untracked key is a no-op.
    pub fn reset(&self, subnet_key: &str) {
        let key = SubnetKey::from_raw(subnet_key);

        let mut subnets = self.subnets.write();
        if subnets.remove(&key).is_some() {
            debug!(subnet = %key, "Subnet counter reset");
        }
    }

    /// Get the current count for a subnet key.
    ///
    /// Returns `None` if the subnet is not tracked. Stale entries report
    /// their last written count; only `increment` normalizes them.
    pub fn subnet_count(&self, subnet_key: &str) -> Option<u64> {
        let key = SubnetKey::from_raw(subnet_key);
        let subnets = self.subnets.read();
        subnets.get(&key).map(|s| s.count)
    }

    /// Get the number of tracked subnets.
    pub fn tracked_subnets(&self) -> usize {
        let subnets = self.subnets.read();
        subnets.len()
    }
}
