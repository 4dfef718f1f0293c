//! Subnet key derivation from client addresses.

use crate::error::{Result, SubnetgateError};

/// A key that identifies the subnet an address belongs to.
///
/// Two addresses sharing the configured-length prefix map to the same key.
/// The key is the leading dotted-quad components joined back with `.`,
/// so a /24 prefix turns `123.45.67.89` into `123.45.67`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubnetKey(String);

impl SubnetKey {
    /// Wrap an already-derived key, as supplied by administrative callers.
    pub fn from_raw(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubnetKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Derive the subnet key for `address` using a byte-aligned prefix size.
///
/// The prefix size is given in bits and must be a multiple of 8; callers are
/// expected to have validated it at configuration time. An address with fewer
/// dotted components than the prefix requires is rejected with
/// [`SubnetgateError::InvalidAddress`] rather than silently truncated.
pub fn extract_subnet(address: &str, prefix_size_bits: u32) -> Result<SubnetKey> {
    let prefix_size_bytes = (prefix_size_bits / 8) as usize;

    let parts: Vec<&str> = address.split('.').collect();
    if parts.len() < prefix_size_bytes {
        return Err(SubnetgateError::InvalidAddress(format!(
            "address {:?} has {} components, prefix /{} requires {}",
            address,
            parts.len(),
            prefix_size_bits,
            prefix_size_bytes
        )));
    }

    Ok(SubnetKey(parts[..prefix_size_bytes].join(".")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_subnet_24_bits() {
        let key = extract_subnet("123.45.67.89", 24).unwrap();
        assert_eq!(key.as_str(), "123.45.67");
    }

    #[test]
    fn test_addresses_in_same_subnet_share_key() {
        let a = extract_subnet("123.45.67.89", 24).unwrap();
        let b = extract_subnet("123.45.67.1", 24).unwrap();
        let c = extract_subnet("123.45.67.111", 24).unwrap();

        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_addresses_in_different_subnets_differ() {
        let a = extract_subnet("123.45.67.89", 24).unwrap();
        let b = extract_subnet("123.45.68.89", 24).unwrap();

        assert_ne!(a, b);
    }

    #[test]
    fn test_extract_subnet_full_width() {
        let key = extract_subnet("10.0.0.1", 32).unwrap();
        assert_eq!(key.as_str(), "10.0.0.1");
    }

    #[test]
    fn test_extract_subnet_short_prefixes() {
        assert_eq!(extract_subnet("10.1.2.3", 8).unwrap().as_str(), "10");
        assert_eq!(extract_subnet("10.1.2.3", 16).unwrap().as_str(), "10.1");
    }

    #[test]
    fn test_extract_subnet_too_few_components() {
        let err = extract_subnet("123.45", 24).unwrap_err();
        assert!(matches!(err, SubnetgateError::InvalidAddress(_)));
    }

    #[test]
    fn test_extract_subnet_empty_address() {
        let err = extract_subnet("", 24).unwrap_err();
        assert!(matches!(err, SubnetgateError::InvalidAddress(_)));
    }

    #[test]
    fn test_subnet_key_display() {
        let key = extract_subnet("192.168.1.50", 24).unwrap();
        assert_eq!(key.to_string(), "192.168.1");
    }
}
