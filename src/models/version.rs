use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Historical releases that are valid even though they fall outside the
/// generic release-numbering rules.
const VERSION_WHITELIST: [&str; 9] = [
    "0.7.0", "0.7.1", "1.0.1", "1.3.1", "1.3.2", "1.4.1", "1.5.1", "1.6.1", "4.0.1",
];

/// Patch components allowed for release versions outside the 0.9.x beta line.
const ALLOWED_PATCH: [u32; 7] = [0, 50, 51, 52, 53, 54, 55];

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+)\.(\d+)\.(\d+)$").expect("Invalid version regex"))
}

/// A client release version (`major.minor.patch`).
///
/// Ordering is lexicographic over the three components, which is what the
/// config validation uses to require `old_ver < new_ver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GameVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl GameVersion {
    /// Parse a strict `x.y.z` version string. Returns `None` for anything
    /// that is not three dot-separated decimal components.
    pub fn parse(ver: &str) -> Option<Self> {
        let caps = version_regex().captures(ver)?;
        Some(Self {
            major: caps[1].parse().ok()?,
            minor: caps[2].parse().ok()?,
            patch: caps[3].parse().ok()?,
        })
    }

    /// Validate a version string against the known release-numbering rules,
    /// appending human-readable problems to `errors`.
    ///
    /// Returns the parsed version even when rule violations were recorded,
    /// so the caller can still report ordering problems in the same pass.
    pub fn validate_release(ver: &str, errors: &mut Vec<String>) -> Option<Self> {
        let Some(parsed) = Self::parse(ver) else {
            errors.push(format!("Invalid version format '{ver}'. Use format like 5.6.0"));
            return None;
        };

        if VERSION_WHITELIST.contains(&ver) {
            return Some(parsed);
        }

        let GameVersion { major, minor, patch } = parsed;

        match major {
            0 => {
                if minor == 9 {
                    if patch > 20 {
                        errors.push(format!("Invalid version '{ver}' not allowed."));
                    }
                } else if minor != 7 {
                    errors.push(format!("Invalid version '{ver}' not allowed."));
                }
            }
            1 => {
                if minor > 6 {
                    errors.push(format!("Invalid version '{ver}' not allowed."));
                }
            }
            _ => {
                if minor > 8 {
                    errors.push(format!("Invalid version '{ver}' not allowed."));
                }
            }
        }

        if !(major == 0 && minor == 9) && !ALLOWED_PATCH.contains(&patch) {
            errors.push(format!("Invalid version '{ver}' not allowed."));
        }

        Some(parsed)
    }
}

impl fmt::Display for GameVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Lenient "version is at least x.y.z" check used by the ignore rules.
///
/// Deliberately fails open: a version string that does not have three
/// parsable numeric components is treated as satisfying the threshold.
/// Voice-over packs are excluded unless the version is provably below
/// the cutoff.
pub fn version_at_least(ver: &str, major: u32, minor: u32, patch: u32) -> bool {
    let mut parts = ver.split('.');
    let (Some(a), Some(b), Some(c), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return true;
    };

    let (Ok(va), Ok(vb), Ok(vc)) = (a.parse::<u32>(), b.parse::<u32>(), c.parse::<u32>()) else {
        return true;
    };

    (va, vb, vc) >= (major, minor, patch)
}
