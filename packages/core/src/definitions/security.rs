use derive_try_from_primitive::TryFromPrimitive;
use enum_iterator::Sequence;
use std::fmt::Display;

/// The security keys a node can be granted during S2 bootstrapping.
/// The discriminant is the key's bit in the granted/requested-keys bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Sequence, TryFromPrimitive)]
#[repr(u8)]
pub enum SecurityKey {
    S2Unauthenticated = 0x01,
    S2Authenticated = 0x02,
    S2AccessControl = 0x04,
    S0 = 0x80,
}

impl SecurityKey {
    /// Expands a granted/requested-keys bitmask into the set of keys, highest first
    pub fn keys_from_bitmask(mask: u8) -> Vec<Self> {
        enum_iterator::all::<Self>()
            .filter(|key| mask & (*key as u8) != 0)
            .collect()
    }

    /// Collapses a set of keys into the wire bitmask
    pub fn keys_to_bitmask(keys: &[Self]) -> u8 {
        keys.iter().fold(0, |acc, key| acc | (*key as u8))
    }

    /// The keys, strongest first, used to determine the highest granted key
    pub fn by_strength() -> [Self; 4] {
        [
            Self::S2AccessControl,
            Self::S2Authenticated,
            Self::S2Unauthenticated,
            Self::S0,
        ]
    }
}

impl Display for SecurityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::S2Unauthenticated => write!(f, "S2 Unauthenticated"),
            Self::S2Authenticated => write!(f, "S2 Authenticated"),
            Self::S2AccessControl => write!(f, "S2 Access Control"),
            Self::S0 => write!(f, "S0 Legacy"),
        }
    }
}

/// Why an S2 key exchange failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum KexFailType {
    None = 0x00,
    KeyFailure = 0x01,
    SchemeFailure = 0x02,
    CurveFailure = 0x03,
    DecryptFailure = 0x05,
    UserCancel = 0x06,
    AuthenticationFailure = 0x07,
    KeyGetFailure = 0x08,
    KeyVerifyFailure = 0x09,
    KeyReportFailure = 0x0a,
}

crate::impl_maybe_known_codec!(KexFailType);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_bitmask_roundtrip() {
        let keys = vec![SecurityKey::S2Unauthenticated, SecurityKey::S2Authenticated];
        let mask = SecurityKey::keys_to_bitmask(&keys);
        assert_eq!(mask, 0x03);
        assert_eq!(SecurityKey::keys_from_bitmask(mask), keys);
    }

    #[test]
    fn test_s0_bit() {
        assert_eq!(
            SecurityKey::keys_from_bitmask(0x80),
            vec![SecurityKey::S0]
        );
    }
}
