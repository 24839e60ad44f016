//! Four-component numeric versions and the comparison rule shared by every
//! consumer in the engine (normal policy path and mandatory override alike).

use std::fmt;

/// Number of components a version is normalized to.
const COMPONENT_COUNT: usize = 4;

/// One position in a normalized version, most significant first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fragment {
    Major,
    Minor,
    Patch,
    Revision,
}

impl Fragment {
    /// All fragments ordered from most to least significant
    pub const ALL: [Fragment; COMPONENT_COUNT] = [
        Fragment::Major,
        Fragment::Minor,
        Fragment::Patch,
        Fragment::Revision,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Fragment::Major => "major",
            Fragment::Minor => "minor",
            Fragment::Patch => "patch",
            Fragment::Revision => "revision",
        }
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A version normalized to exactly `[major, minor, patch, revision]`.
///
/// Parsing never fails: missing components are zero-padded, components past the
/// fourth are dropped and non-numeric components read as zero.
///
/// - "1.2" -> [1, 2, 0, 0]
/// - "1.2.3.4.5" -> [1, 2, 3, 4]
/// - "a.b" -> [0, 0, 0, 0]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SemanticVersion {
    components: [u64; COMPONENT_COUNT],
}

impl SemanticVersion {
    pub fn new(major: u64, minor: u64, patch: u64, revision: u64) -> Self {
        Self {
            components: [major, minor, patch, revision],
        }
    }

    pub fn parse(version: &str) -> Self {
        let mut components = [0; COMPONENT_COUNT];
        for (slot, token) in components.iter_mut().zip(version.trim().split('.')) {
            *slot = token.trim().parse().unwrap_or(0);
        }
        Self { components }
    }

    pub fn components(&self) -> [u64; COMPONENT_COUNT] {
        self.components
    }

    pub fn get(&self, fragment: Fragment) -> u64 {
        self.components[fragment as usize]
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [major, minor, patch, revision] = self.components;
        write!(f, "{}.{}.{}.{}", major, minor, patch, revision)
    }
}

impl From<&str> for SemanticVersion {
    fn from(version: &str) -> Self {
        Self::parse(version)
    }
}

/// Outcome of comparing an installed version against a remote one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionDelta {
    /// Remote is newer; `Fragment` is the most significant differing component
    Newer(Fragment),
    Same,
    /// Remote is older than what is installed
    Older,
}

impl VersionDelta {
    pub fn is_newer(&self) -> bool {
        matches!(self, VersionDelta::Newer(_))
    }

    pub fn fragment(&self) -> Option<Fragment> {
        match self {
            VersionDelta::Newer(fragment) => Some(*fragment),
            _ => None,
        }
    }
}

/// Compare `installed` against `remote`, most significant component first.
///
/// The first differing component decides the result.
pub fn compare(installed: &SemanticVersion, remote: &SemanticVersion) -> VersionDelta {
    for fragment in Fragment::ALL {
        let (ours, theirs) = (installed.get(fragment), remote.get(fragment));
        if theirs > ours {
            return VersionDelta::Newer(fragment);
        }
        if theirs < ours {
            return VersionDelta::Older;
        }
    }
    VersionDelta::Same
}

/// String convenience over [`compare`]
pub fn compare_versions(installed: &str, remote: &str) -> VersionDelta {
    compare(
        &SemanticVersion::parse(installed),
        &SemanticVersion::parse(remote),
    )
}
