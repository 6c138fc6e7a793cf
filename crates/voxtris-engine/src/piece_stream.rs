use std::{fmt, marker::PhantomData, str::FromStr};

use rand::{Rng, SeedableRng as _, distr::StandardUniform, prelude::Distribution};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Seed for one session's piece sequence.
///
/// Displays and parses as 32 hex digits, so a sequence seen in a log line
/// can be replayed from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("piece seed must be 32 hex digits")]
pub struct ParsePieceSeedError;

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn into_bytes(self) -> [u8; 16] {
        self.0
    }
}

impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        PieceSeed(rng.random())
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl FromStr for PieceSeed {
    type Err = ParsePieceSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 || !s.is_ascii() {
            return Err(ParsePieceSeedError);
        }
        let mut bytes = [0; 16];
        for (byte, pair) in bytes.iter_mut().zip(s.as_bytes().chunks(2)) {
            let pair = str::from_utf8(pair).map_err(|_| ParsePieceSeedError)?;
            *byte = u8::from_str_radix(pair, 16).map_err(|_| ParsePieceSeedError)?;
        }
        Ok(Self(bytes))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Session-owned piece generator: a seeded PCG stream drawing kinds
/// uniformly and independently.
///
/// Each game session owns exactly one stream; two sessions built from the
/// same seed see the same kind sequence.
#[derive(Debug, Clone)]
pub struct PieceStream<K> {
    rng: Pcg32,
    _kind: PhantomData<fn() -> K>,
}

impl<K> PieceStream<K>
where
    StandardUniform: Distribution<K>,
{
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.into_bytes()),
            _kind: PhantomData,
        }
    }

    /// Draws the next piece kind.
    pub fn next_kind(&mut self) -> K {
        self.rng.random()
    }
}
