//! Identity newtypes shared by every layer.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// The connection handle a player acts through.
///
/// The gateway hands one out per accepted connection; the engine only
/// compares them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub u64);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C-{}", self.0)
    }
}

/// A room code, e.g. `"K7QX2M"`. This is what players type to join.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    const ALPHABET: &'static [u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

    /// Generates a random code of `len` characters. Ambiguous characters
    /// (`0`/`O`, `1`/`I`) are left out so codes can be read aloud.
    pub fn random(len: usize) -> Self {
        let mut rng = rand::rng();
        let code = (0..len)
            .map(|_| {
                let i = rng.random_range(0..Self::ALPHABET.len());
                Self::ALPHABET[i] as char
            })
            .collect();
        Self(code)
    }

    /// Normalizes a user-typed code (trim + uppercase).
    pub fn parse(code: &str) -> Self {
        Self(code.trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
