use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use thiserror::Error;


/// The encoding family of a world save.
#[cfg_attr(feature = "derive_serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "derive_serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Anvil region files, as written by Minecraft: Java Edition.
    Java,
    /// A LevelDB key-value store, as written by Minecraft: Bedrock Edition.
    Bedrock,
}

impl Platform {
    pub const ALL: [Self; 2] = [Self::Java, Self::Bedrock];

    /// The string tag the world-data engine uses for this platform.
    #[inline]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Java    => "java",
            Self::Bedrock => "bedrock",
        }
    }

    /// Parse a platform tag reported by the engine or typed by a user.
    ///
    /// Surrounding whitespace and letter case are ignored.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        Self::ALL
            .into_iter()
            .find(|platform| platform.tag().eq_ignore_ascii_case(tag))
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Platform {
    type Err = UnsupportedPlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| UnsupportedPlatformError(s.to_owned()))
    }
}

/// A platform tag other than `java` or `bedrock` was given.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported target platform: {0:?}")]
pub struct UnsupportedPlatformError(pub String);

/// The requested (source, target) platform pair of a conversion.
///
/// Only the target platform affects how a conversion runs; the actual source
/// platform is detected from the opened world.
#[cfg_attr(feature = "derive_serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "derive_serde", serde(rename_all = "kebab-case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    BedrockToJava,
    JavaToBedrock,
    JavaToJava,
    BedrockToBedrock,
}

impl Direction {
    pub const ALL: [Self; 4] = [
        Self::BedrockToJava,
        Self::JavaToBedrock,
        Self::JavaToJava,
        Self::BedrockToBedrock,
    ];

    #[inline]
    pub fn target_platform(self) -> Platform {
        match self {
            Self::BedrockToJava | Self::JavaToJava       => Platform::Java,
            Self::JavaToBedrock | Self::BedrockToBedrock => Platform::Bedrock,
        }
    }

    #[inline]
    pub fn source_platform(self) -> Platform {
        match self {
            Self::JavaToBedrock | Self::JavaToJava       => Platform::Java,
            Self::BedrockToJava | Self::BedrockToBedrock => Platform::Bedrock,
        }
    }

    #[inline]
    pub fn tag(self) -> &'static str {
        match self {
            Self::BedrockToJava    => "bedrock-to-java",
            Self::JavaToBedrock    => "java-to-bedrock",
            Self::JavaToJava       => "java-to-java",
            Self::BedrockToBedrock => "bedrock-to-bedrock",
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Direction {
    type Err = UnknownDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|direction| direction.tag().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownDirectionError(s.to_owned()))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown conversion direction: {0:?}")]
pub struct UnknownDirectionError(pub String);
