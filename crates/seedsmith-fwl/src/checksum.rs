//! Seed checksum strategies.
//!
//! Descriptors written by different producer versions protect the seed with
//! different 32-bit hashes. Each hash is a [`SeedChecksum`] strategy; the
//! patcher either uses the one it is told to or tries every
//! [`ChecksumAlgorithm`] until one of them is found next to the seed.

use std::fmt;
use std::str::FromStr;

use seedsmith_common::hash;

/// A checksum over the raw bytes of a seed string.
pub trait SeedChecksum {
    /// Short identifier used in reports.
    fn name(&self) -> &'static str;

    /// Compute the checksum of `seed`.
    fn compute(&self, seed: &[u8]) -> i32;
}

/// Double-accumulator djb2 hash ("stable hash code").
#[derive(Debug, Clone, Copy, Default)]
pub struct StableChecksum;

impl SeedChecksum for StableChecksum {
    fn name(&self) -> &'static str {
        "stable"
    }

    fn compute(&self, seed: &[u8]) -> i32 {
        hash::stable_hash(seed)
    }
}

/// Multiply-by-31 polynomial hash.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolynomialChecksum;

impl SeedChecksum for PolynomialChecksum {
    fn name(&self) -> &'static str {
        "polynomial"
    }

    fn compute(&self, seed: &[u8]) -> i32 {
        hash::polynomial_hash(seed)
    }
}

/// The built-in checksum strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ChecksumAlgorithm {
    /// See [`StableChecksum`].
    Stable,
    /// See [`PolynomialChecksum`].
    Polynomial,
}

impl ChecksumAlgorithm {
    /// Every built-in algorithm, in detection order.
    pub const ALL: [Self; 2] = [Self::Stable, Self::Polynomial];

    /// The strategy implementing this algorithm.
    pub fn strategy(self) -> &'static dyn SeedChecksum {
        match self {
            Self::Stable => &StableChecksum,
            Self::Polynomial => &PolynomialChecksum,
        }
    }
}

impl SeedChecksum for ChecksumAlgorithm {
    fn name(&self) -> &'static str {
        self.strategy().name()
    }

    fn compute(&self, seed: &[u8]) -> i32 {
        self.strategy().compute(seed)
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which checksum algorithm(s) the patcher may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlgorithmSelection {
    /// Try every algorithm in [`ChecksumAlgorithm::ALL`] order.
    #[default]
    Auto,
    /// Use exactly this algorithm.
    Only(ChecksumAlgorithm),
}

impl AlgorithmSelection {
    /// Algorithms to try, in order.
    pub fn candidates(&self) -> &[ChecksumAlgorithm] {
        match self {
            Self::Auto => &ChecksumAlgorithm::ALL,
            Self::Only(algorithm) => std::slice::from_ref(algorithm),
        }
    }
}

impl fmt::Display for AlgorithmSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Only(algorithm) => fmt::Display::fmt(algorithm, f),
        }
    }
}

impl FromStr for AlgorithmSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "stable" => Ok(Self::Only(ChecksumAlgorithm::Stable)),
            "polynomial" => Ok(Self::Only(ChecksumAlgorithm::Polynomial)),
            other => Err(format!(
                "unknown checksum algorithm '{other}' (expected auto, stable or polynomial)"
            )),
        }
    }
}
