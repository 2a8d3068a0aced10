use std::fmt;
use std::str::FromStr;

use semver::{Prerelease, Version, VersionReq};

use crate::capability::error::VersionError;

/// Parse a module-reported version string.
///
/// Third-party modules rarely publish strict semver, so this accepts a
/// leading `v`, two-component versions (`2.11` -> `2.11.0`), and a
/// trailing qualifier such as `-SNAPSHOT`.
pub fn parse_module_version(raw: &str) -> Result<Version, VersionError> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix(['v', 'V']).unwrap_or(trimmed);
    let (core, rest) = match trimmed.find(['-', '+']) {
        Some(idx) => trimmed.split_at(idx),
        None => (trimmed, ""),
    };
    let components = core.split('.').count();
    let padded = match components {
        1 => format!("{}.0.0{}", core, rest),
        2 => format!("{}.0{}", core, rest),
        _ => trimmed.to_string(),
    };
    Version::parse(&padded).map_err(|e| VersionError::Invalid {
        input: raw.to_string(),
        message: e.to_string(),
    })
}

/// Inclusive `[min, max]` window from configuration. Either side may be open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionBounds {
    min: Option<Version>,
    max: Option<Version>,
}

impl VersionBounds {
    /// Bounds that accept every version
    pub fn any() -> Self {
        Self::default()
    }

    pub fn new(min: Option<Version>, max: Option<Version>) -> Result<Self, VersionError> {
        if let (Some(lo), Some(hi)) = (&min, &max) {
            if lo > hi {
                return Err(VersionError::InvertedBounds { min: lo.to_string(), max: hi.to_string() });
            }
        }
        Ok(Self { min, max })
    }

    /// Build bounds from optional version strings, as found in configuration.
    pub fn parse(min: Option<&str>, max: Option<&str>) -> Result<Self, VersionError> {
        let min = min.map(parse_module_version).transpose()?;
        let max = max.map(parse_module_version).transpose()?;
        Self::new(min, max)
    }

    pub fn min(&self) -> Option<&Version> {
        self.min.as_ref()
    }

    pub fn max(&self) -> Option<&Version> {
        self.max.as_ref()
    }

    pub fn contains(&self, version: &Version) -> bool {
        self.min.as_ref().is_none_or(|lo| version >= lo) && self.max.as_ref().is_none_or(|hi| version <= hi)
    }
}

impl fmt::Display for VersionBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.min, &self.max) {
            (None, None) => write!(f, "any"),
            (Some(lo), None) => write!(f, ">={}", lo),
            (None, Some(hi)) => write!(f, "<={}", hi),
            (Some(lo), Some(hi)) => write!(f, ">={}, <={}", lo, hi),
        }
    }
}

/// Represents a version requirement range using semver constraints.
///
/// Live adapters pin the module versions they were written against with
/// one of these. Pre-release qualifiers on the module version are ignored
/// when matching, so `4.0.0-SNAPSHOT` satisfies `^4`.
#[derive(Debug, Clone)]
pub struct VersionRange {
    /// The original constraint string (e.g., "^1.2.3", ">=2.0")
    constraint: String,
    /// The parsed semver requirement
    req: VersionReq,
}

impl VersionRange {
    /// Creates a new version range from a constraint string.
    pub fn from_constraint(constraint: &str) -> Result<Self, VersionError> {
        let req = VersionReq::parse(constraint).map_err(|e| VersionError::InvalidConstraint {
            input: constraint.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { constraint: constraint.to_string(), req })
    }

    pub fn includes(&self, version: &Version) -> bool {
        if version.pre.is_empty() {
            return self.req.matches(version);
        }
        let mut release = version.clone();
        release.pre = Prerelease::EMPTY;
        self.req.matches(&release)
    }

    /// Returns the original constraint string.
    pub fn constraint_string(&self) -> &str {
        &self.constraint
    }
}

/// Implement Display to show the original constraint string.
impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.constraint)
    }
}

/// Allow parsing directly from a string slice.
impl FromStr for VersionRange {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VersionRange::from_constraint(s)
    }
}
