use std::fmt;
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};


/// A version identifier as the world-data engine reports it.
///
/// Java worlds are usually identified by a dotted release number like 1.20.1,
/// stored here as a sequence. Some formats use a single data version integer instead.
#[cfg_attr(feature = "derive_serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "derive_serde", serde(untagged))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VersionNumber {
    Sequence(Vec<u32>),
    Scalar(u32),
}

impl VersionNumber {
    /// Parse a dotted or bare decimal version.
    ///
    /// Empty components are skipped, so "1..2" is parsed the same as "1.2"; a string made
    /// only of dots has no components and returns `None`. Every remaining component must be
    /// made of ASCII digits and fit in a `u32`. A string without any dot must be a plain
    /// integer and becomes a scalar, so "18" and "18." are different versions.
    pub fn parse(version: &str) -> Option<Self> {
        if version.contains('.') {
            let components = version
                .split('.')
                .filter(|component| !component.is_empty())
                .map(parse_component)
                .collect::<Option<Vec<u32>>>()?;

            if components.is_empty() {
                None
            } else {
                Some(Self::Sequence(components))
            }
        } else {
            parse_component(version).map(Self::Scalar)
        }
    }

    #[inline]
    pub fn numeric(major: u32, minor: u32, patch: u32) -> Self {
        Self::Sequence(vec![major, minor, patch])
    }
}

fn parse_component(component: &str) -> Option<u32> {
    // `from_str_radix` alone would accept a leading `+`.
    if !component.is_empty() && component.bytes().all(|byte| byte.is_ascii_digit()) {
        u32::from_str_radix(component, 10).ok()
    } else {
        None
    }
}

impl PartialOrd for VersionNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Sequence(v), Self::Sequence(other_v)) => Some(v.cmp(other_v)),
            (Self::Scalar(v),   Self::Scalar(other_v))   => Some(v.cmp(other_v)),
            _ => None,
        }
    }
}

impl Display for VersionNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequence(components) => {
                let mut components = components.iter();
                if let Some(first) = components.next() {
                    write!(f, "{first}")?;
                }
                for component in components {
                    write!(f, ".{component}")?;
                }
                Ok(())
            }
            Self::Scalar(version) => Display::fmt(version, f),
        }
    }
}

impl From<u32> for VersionNumber {
    #[inline]
    fn from(value: u32) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<u32>> for VersionNumber {
    #[inline]
    fn from(value: Vec<u32>) -> Self {
        Self::Sequence(value)
    }
}

impl<const N: usize> From<[u32; N]> for VersionNumber {
    #[inline]
    fn from(value: [u32; N]) -> Self {
        Self::Sequence(value.to_vec())
    }
}

impl From<(u32, u32, u32)> for VersionNumber {
    #[inline]
    fn from(value: (u32, u32, u32)) -> Self {
        Self::numeric(value.0, value.1, value.2)
    }
}

/// Which version a conversion should write.
///
/// `Latest` takes the place of a magic "latest" string, so that a real version can never
/// be mistaken for it.
#[cfg_attr(feature = "derive_serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub enum RequestedVersion {
    /// Use the newest version the target format supports.
    #[default]
    Latest,
    Exact(VersionNumber),
    /// Text that named a version but could not be parsed. Kept so that it can be reported,
    /// or rejected by callers that opt into strict handling.
    Unparsed(String),
}

impl RequestedVersion {
    /// Labels that users may type (or pick from a list) to mean "no particular version".
    pub const LATEST_LABELS: [&'static str; 2] = ["latest", "最新"];

    /// Interpret optional user input. Absent, blank, and "latest" input is `Latest`.
    pub fn parse(input: Option<&str>) -> Self {
        let Some(input) = input.map(str::trim) else {
            return Self::Latest;
        };

        let is_latest_label = Self::LATEST_LABELS
            .iter()
            .any(|label| label.eq_ignore_ascii_case(input));

        if input.is_empty() || is_latest_label {
            Self::Latest
        } else if let Some(version) = VersionNumber::parse(input) {
            Self::Exact(version)
        } else {
            Self::Unparsed(input.to_owned())
        }
    }

    /// Whether the caller asked for anything other than the latest version, even if what
    /// they asked for could not be parsed.
    #[inline]
    pub fn is_explicit(&self) -> bool {
        !matches!(self, Self::Latest)
    }

    #[inline]
    pub fn exact(&self) -> Option<&VersionNumber> {
        if let Self::Exact(version) = self {
            Some(version)
        } else {
            None
        }
    }
}

impl From<VersionNumber> for RequestedVersion {
    #[inline]
    fn from(version: VersionNumber) -> Self {
        Self::Exact(version)
    }
}

impl From<&str> for RequestedVersion {
    #[inline]
    fn from(input: &str) -> Self {
        Self::parse(Some(input))
    }
}

impl Display for RequestedVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest          => f.write_str("latest"),
            Self::Exact(version)  => Display::fmt(version, f),
            Self::Unparsed(input) => f.write_str(input),
        }
    }
}
