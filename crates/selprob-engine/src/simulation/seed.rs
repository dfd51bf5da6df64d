use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Seed for deterministic simulation.
///
/// A 128-bit (16-byte) seed for the [`Pcg32`] generator driving the samplers. The same seed,
/// configuration and trial count always reproduce the same histogram, which makes reports
/// repeatable and tests deterministic.
///
/// Seeds are written as 32 hexadecimal digits, both in JSON and on the command line.
///
/// # Example
///
/// ```
/// use rand::Rng as _;
/// use selprob_engine::SimulationSeed;
///
/// let seed: SimulationSeed = rand::rng().random();
/// let parsed: SimulationSeed = seed.to_string().parse().unwrap();
/// assert_eq!(seed, parsed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SimulationSeed([u8; 16]);

/// Malformed seed text.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed '{input}': {reason}")]
pub struct ParseSeedError {
    input: String,
    reason: String,
}

impl SimulationSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }

    /// The generator for a single-threaded simulation.
    #[must_use]
    pub fn rng(self) -> Pcg32 {
        Pcg32::from_seed(self.0)
    }

    /// An independent generator for worker `index` of a parallel simulation.
    ///
    /// The seed supplies the PCG state; the worker index selects the stream, so workers never
    /// share a sequence.
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn worker_rng(self, index: usize) -> Pcg32 {
        let num = u128::from_be_bytes(self.0);
        let state = (num >> 64) as u64;
        let stream = (num as u64).wrapping_add(index as u64);
        Pcg32::new(state, stream)
    }
}

impl fmt::Display for SimulationSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for SimulationSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason: String| ParseSeedError {
            input: s.to_owned(),
            reason,
        };
        if s.len() != 32 {
            return Err(err(format!("expected 32 characters, got {}", s.len())));
        }
        let num = u128::from_str_radix(s, 16).map_err(|e| err(e.to_string()))?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for SimulationSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SimulationSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `SimulationSeed` values with `rng.random()`.
impl Distribution<SimulationSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SimulationSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        SimulationSeed(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEQUENTIAL: [u8; 16] = [
        0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54, 0x32,
        0x10,
    ];

    mod serialization {
        use super::*;

        #[test]
        fn test_known_value_sequential_bytes() {
            let seed = SimulationSeed::from_bytes(SEQUENTIAL);
            let serialized = serde_json::to_string(&seed).unwrap();
            assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");
            let deserialized: SimulationSeed = serde_json::from_str(&serialized).unwrap();
            assert_eq!(deserialized, seed);
        }

        #[test]
        fn test_known_value_all_zeros() {
            let seed = SimulationSeed::from_bytes([0; 16]);
            assert_eq!(seed.to_string(), "0".repeat(32));
        }

        #[test]
        fn test_accepts_uppercase_hex() {
            let seed: SimulationSeed = "0123456789ABCDEFFEDCBA9876543210".parse().unwrap();
            assert_eq!(seed.to_bytes(), SEQUENTIAL);
        }

        #[test]
        fn test_roundtrip_random_seed() {
            let seed: SimulationSeed = rand::rng().random();
            let json = serde_json::to_string(&seed).unwrap();
            assert_eq!(serde_json::from_str::<SimulationSeed>(&json).unwrap(), seed);
        }

        #[test]
        fn test_errors() {
            for input in [
                "",
                "0123456789abcdef0123456789abcde",
                "0123456789abcdef0123456789abcdef0",
                "ghijklmnopqrstuvwxyzghijklmnopqr",
            ] {
                let err = input.parse::<SimulationSeed>().unwrap_err();
                assert!(err.to_string().contains("invalid hex"), "{input}");
                let json = format!("\"{input}\"");
                assert!(serde_json::from_str::<SimulationSeed>(&json).is_err());
            }
        }
    }

    mod generators {
        use rand::RngCore as _;

        use super::*;

        #[test]
        fn test_same_seed_same_sequence() {
            let seed = SimulationSeed::from_bytes(SEQUENTIAL);
            let mut a = seed.rng();
            let mut b = seed.rng();
            for _ in 0..20 {
                assert_eq!(a.next_u32(), b.next_u32());
            }
        }

        #[test]
        fn test_workers_get_distinct_streams() {
            let seed = SimulationSeed::from_bytes(SEQUENTIAL);
            let first = (0..4)
                .map(|i| seed.worker_rng(i).next_u64())
                .collect::<Vec<_>>();
            for i in 0..first.len() {
                for j in i + 1..first.len() {
                    assert_ne!(first[i], first[j]);
                }
            }
            assert_eq!(seed.worker_rng(2).next_u64(), first[2]);
        }
    }
}
