//! Product versions and the half-open ranges schema entries apply to.

use std::fmt;
use std::str::FromStr;

use crate::error::VersionError;

/// A `major.minor.patch` product version.
///
/// Pre-release and build suffixes (`8.9.0-SNAPSHOT`, `8.9.0+build.7`) are
/// accepted and ignored for ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProductVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl ProductVersion {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self { major, minor, patch }
    }
}

impl FromStr for ProductVersion {
    type Err = VersionError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let core = trimmed
            .split(['-', '+'])
            .next()
            .unwrap_or_default();

        let mut parts = core.split('.');
        let mut component = |name: &'static str| -> Result<u64, VersionError> {
            let part = parts.next().ok_or_else(|| VersionError::Missing {
                raw: raw.to_string(),
                component: name,
            })?;
            part.parse::<u64>().map_err(|_| VersionError::NotNumeric {
                raw: raw.to_string(),
                component: name,
            })
        };

        let major = component("major")?;
        let minor = component("minor")?;
        let patch = component("patch")?;

        if parts.next().is_some() {
            return Err(VersionError::TooManyComponents { raw: raw.to_string() });
        }

        Ok(Self { major, minor, patch })
    }
}

impl fmt::Display for ProductVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl serde::Serialize for ProductVersion {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for ProductVersion {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// `[min, max)`; `max: None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionRange {
    pub min: ProductVersion,
    pub max: Option<ProductVersion>,
}

impl VersionRange {
    pub fn contains(&self, version: &ProductVersion) -> bool {
        *version >= self.min && self.max.is_none_or(|max| *version < max)
    }

    pub fn overlaps(&self, other: &VersionRange) -> bool {
        let self_starts_before_other_ends = other.max.is_none_or(|max| self.min < max);
        let other_starts_before_self_ends = self.max.is_none_or(|max| other.min < max);
        self_starts_before_other_ends && other_starts_before_self_ends
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "[{}, {})", self.min, max),
            None => write!(f, "[{}, ∞)", self.min),
        }
    }
}
