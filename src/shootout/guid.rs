use std::fmt;
use std::hash::{Hash, Hasher};

use rand::RngCore;
use uuid::{Builder, Uuid, Variant};

/// A 128-bit random identifier, used as the shootout's cache key.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Guid(Uuid);

impl Guid {
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }

    /// Generates a random (version 4, RFC 4122 variant) identifier.
    pub fn new_v4<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 16];
        rng.fill_bytes(&mut bytes);
        Self(Builder::from_random_bytes(bytes).into_uuid())
    }

    pub fn version(&self) -> usize {
        self.0.get_version_num()
    }

    pub fn is_rfc4122(&self) -> bool {
        self.0.get_variant() == Variant::RFC4122
    }
}

impl From<Uuid> for Guid {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

// `Uuid`'s own `Hash` goes through the slice impl and prepends a length.
// Only the raw bytes are fed to the hasher.
impl Hash for Guid {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write(self.as_bytes());
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Guid({})", self.0)
    }
}
