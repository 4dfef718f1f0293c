//! Configuration management for Subnetgate.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

use crate::error::{Result, SubnetgateError};
use crate::ratelimit::LimiterConfig;

/// Main configuration for the Subnetgate service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubnetgateConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limiting: RateLimitingConfig,
}

impl Default for SubnetgateConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            rate_limiting: RateLimitingConfig::default(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen address
    #[serde(default = "default_http_addr")]
    pub http_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: default_http_addr(),
        }
    }
}

fn default_http_addr() -> SocketAddr {
    "0.0.0.0:8080".parse().unwrap()
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitingConfig {
    /// Bits of the client address used to group requests into subnets
    #[serde(default = "default_prefix_size_bits")]
    pub prefix_size_bits: u32,

    /// Maximum requests per subnet within one cooldown window
    #[serde(default = "default_limit")]
    pub limit: u64,

    /// Cooldown (sliding idle-timeout) in milliseconds
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
}

impl Default for RateLimitingConfig {
    fn default() -> Self {
        Self {
            prefix_size_bits: default_prefix_size_bits(),
            limit: default_limit(),
            cooldown_ms: default_cooldown_ms(),
        }
    }
}

fn default_prefix_size_bits() -> u32 {
    24
}

fn default_limit() -> u64 {
    100
}

fn default_cooldown_ms() -> u64 {
    1000
}

impl SubnetgateConfig {
    /// Load configuration from a file path.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: SubnetgateConfig =
            serde_yaml::from_str(&contents).map_err(|e| SubnetgateError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Apply environment variable overrides on top of this configuration.
    ///
    /// Recognized variables: `LISTEN_ADDR`, `PREFIX_SIZE`, `RATE_LIMIT`,
    /// `COOLDOWN_MS`. A variable that is set but unparsable is a
    /// configuration error rather than a silent fallback.
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(addr) = std::env::var("LISTEN_ADDR") {
            self.server.http_addr = addr
                .parse()
                .map_err(|_| SubnetgateError::Config(format!("invalid LISTEN_ADDR: {}", addr)))?;
        }
        if let Ok(bits) = std::env::var("PREFIX_SIZE") {
            self.rate_limiting.prefix_size_bits = bits
                .parse()
                .map_err(|_| SubnetgateError::Config(format!("invalid PREFIX_SIZE: {}", bits)))?;
        }
        if let Ok(limit) = std::env::var("RATE_LIMIT") {
            self.rate_limiting.limit = limit
                .parse()
                .map_err(|_| SubnetgateError::Config(format!("invalid RATE_LIMIT: {}", limit)))?;
        }
        if let Ok(cooldown) = std::env::var("COOLDOWN_MS") {
            self.rate_limiting.cooldown_ms = cooldown.parse().map_err(|_| {
                SubnetgateError::Config(format!("invalid COOLDOWN_MS: {}", cooldown))
            })?;
        }
        Ok(self)
    }

    /// Build the validated limiter configuration from these settings.
    pub fn limiter_config(&self) -> Result<LimiterConfig> {
        LimiterConfig::new(
            self.rate_limiting.prefix_size_bits,
            self.rate_limiting.limit,
            Duration::from_millis(self.rate_limiting.cooldown_ms),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SubnetgateConfig::default();
        assert_eq!(config.server.http_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.rate_limiting.prefix_size_bits, 24);
        assert_eq!(config.rate_limiting.limit, 100);
        assert_eq!(config.rate_limiting.cooldown_ms, 1000);
    }

    #[test]
    fn test_default_config_validates() {
        let config = SubnetgateConfig::default();
        let limiter = config.limiter_config().unwrap();
        assert_eq!(limiter.prefix_size_bits, 24);
        assert_eq!(limiter.limit, 100);
        assert_eq!(limiter.cooldown, Duration::from_secs(1));
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "rate_limiting:\n  limit: 50\n";
        let config: SubnetgateConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.rate_limiting.limit, 50);
        assert_eq!(config.rate_limiting.prefix_size_bits, 24);
        assert_eq!(config.server.http_addr, "0.0.0.0:8080".parse().unwrap());
    }

    #[test]
    fn test_invalid_prefix_fails_validation() {
        let mut config = SubnetgateConfig::default();
        config.rate_limiting.prefix_size_bits = 20;
        assert!(config.limiter_config().is_err());
    }
}
