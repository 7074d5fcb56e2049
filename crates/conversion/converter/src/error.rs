use std::{fmt, io};
use std::borrow::Cow;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use thiserror::Error;

use mcconvert_datatypes::{Platform, UnsupportedPlatformError};


/// Problems with the paths or options of a request, detected before anything is opened.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("input path does not exist: {}", .0.display())]
    InputMissing(PathBuf),
    #[error("input path must be a world folder: {}", .0.display())]
    InputNotDirectory(PathBuf),
    #[error("input path has no folder name to reuse for its output: {}", .0.display())]
    InputWithoutName(PathBuf),
    #[error("output path must be a folder: {}", .0.display())]
    OutputNotDirectory(PathBuf),
    #[error("output folder is not empty, choose an empty folder: {}", .0.display())]
    OutputNotEmpty(PathBuf),
    #[error("output folder must not be inside the input world: {}", .0.display())]
    OutputInsideInput(PathBuf),
    #[error("requested version {0:?} is not a version number")]
    UnparsableVersion(String),
    // Error message should be a present participle, e.g. "trying to [do something]"
    #[error("error while {0}: {1}")]
    Io(Cow<'static, str>, io::Error),
}

/// Neither the engine's list of supported versions nor the target container's declared
/// maximum version could provide a version to write.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("could not determine a version to write for the {platform} platform")]
pub struct UnresolvableVersionError {
    pub platform: Platform,
}

/// Everything that can stop a conversion.
///
/// The `Display` output is a short message; [`ConversionError::details`] has the long form
/// diagnostic, where there is one.
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    UnsupportedPlatform(#[from] UnsupportedPlatformError),
    #[error(transparent)]
    UnresolvableVersion(#[from] UnresolvableVersionError),
    #[error("could not read the input world: {0}")]
    EngineOpen(anyhow::Error),
    #[error("could not create the target world: {0}")]
    ContainerCreation(anyhow::Error),
    #[error("conversion failed: {0}")]
    Transcode(anyhow::Error),
    #[error("the input world does not support saving")]
    SaveUnsupported,
    #[error("error while copying {}: {error}", .path.display())]
    Copy {
        path:  PathBuf,
        error: io::Error,
    },
    #[error("the world-data engine panicked: {0}")]
    EnginePanic(String),
    #[error("error while {0}: {1}")]
    Io(Cow<'static, str>, io::Error),
    #[error("batch conversion finished, but {} of {total} worlds failed", .failures.len())]
    PartialBatchFailure {
        failures: Vec<BatchFailure>,
        total:    usize,
    },
}

impl ConversionError {
    /// The long form diagnostic of this error: the full cause chain of an engine error,
    /// or one line per failed world of a batch.
    pub fn details(&self) -> Option<String> {
        match self {
            Self::EngineOpen(err) | Self::ContainerCreation(err) | Self::Transcode(err) => {
                Some(format!("{err:?}"))
            }
            Self::Copy { error, .. } | Self::Io(_, error) => Some(format!("{error:?}")),
            Self::Validation(ValidationError::Io(_, err)) => Some(format!("{err:?}")),
            Self::PartialBatchFailure { failures, .. } => Some(
                failures
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            Self::Validation(_)
            | Self::UnsupportedPlatform(_)
            | Self::UnresolvableVersion(_)
            | Self::SaveUnsupported
            | Self::EnginePanic(_) => None,
        }
    }
}

/// One world of a batch that could not be converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    /// The input path, as it was given.
    pub input:   PathBuf,
    pub message: String,
}

impl Display for BatchFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.input.display(), self.message)
    }
}
