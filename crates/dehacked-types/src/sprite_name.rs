use std::fmt;

use serde::Serialize;

/// A four-character sprite prefix such as `TROO` or `SHEL`.
///
/// Names are stored upper-cased so comparisons are case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub struct SpriteName([u8; 4]);

impl SpriteName {
    /// Build a name from the first four bytes of `raw`; shorter input is
    /// padded with NULs.
    pub fn from_bytes(raw: &[u8]) -> Self {
        let mut name = [0u8; 4];
        for (dst, src) in name.iter_mut().zip(raw.iter()) {
            *dst = src.to_ascii_uppercase();
        }
        SpriteName(name)
    }

    pub fn new(name: &str) -> Self {
        Self::from_bytes(name.as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    pub fn eq_bytes(&self, raw: &[u8]) -> bool {
        raw.len() == 4 && *self == Self::from_bytes(raw)
    }
}

impl fmt::Display for SpriteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in self.0.iter().take_while(|&&b| b != 0) {
            write!(f, "{}", b as char)?;
        }
        Ok(())
    }
}
