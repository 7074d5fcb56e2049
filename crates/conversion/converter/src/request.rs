use std::path::{Path, PathBuf};

use mcconvert_datatypes::{Direction, Platform, RequestedVersion};


/// Everything needed to convert one world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    source:            PathBuf,
    destination:       PathBuf,
    direction:         Direction,
    requested_version: RequestedVersion,
    force_repair:      bool,
}

impl ConversionRequest {
    /// Request a conversion to the latest version, which is skipped in favor of a copy
    /// if the world is already on the target platform.
    pub fn new<S, D>(source: S, destination: D, direction: Direction) -> Self
    where
        S: Into<PathBuf>,
        D: Into<PathBuf>,
    {
        Self {
            source:            source.into(),
            destination:       destination.into(),
            direction,
            requested_version: RequestedVersion::Latest,
            force_repair:      false,
        }
    }

    #[must_use]
    pub fn with_version<V: Into<RequestedVersion>>(mut self, version: V) -> Self {
        self.requested_version = version.into();
        self
    }

    /// Re-encode the world through the engine even if no conversion is otherwise needed.
    #[must_use]
    pub fn with_force_repair(mut self, force_repair: bool) -> Self {
        self.force_repair = force_repair;
        self
    }

    #[inline]
    pub fn source(&self) -> &Path {
        &self.source
    }

    #[inline]
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    pub fn target_platform(&self) -> Platform {
        self.direction.target_platform()
    }

    #[inline]
    pub fn requested_version(&self) -> &RequestedVersion {
        &self.requested_version
    }

    #[inline]
    pub fn force_repair(&self) -> bool {
        self.force_repair
    }
}

/// Everything needed to convert several worlds into one output folder.
///
/// Each world is written to a folder of the output root named after the world's folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    sources:           Vec<PathBuf>,
    output_root:       PathBuf,
    direction:         Direction,
    requested_version: RequestedVersion,
    force_repair:      bool,
}

impl BatchRequest {
    pub fn new<I, P, R>(sources: I, output_root: R, direction: Direction) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
        R: Into<PathBuf>,
    {
        Self {
            sources:           sources.into_iter().map(Into::into).collect(),
            output_root:       output_root.into(),
            direction,
            requested_version: RequestedVersion::Latest,
            force_repair:      false,
        }
    }

    #[must_use]
    pub fn with_version<V: Into<RequestedVersion>>(mut self, version: V) -> Self {
        self.requested_version = version.into();
        self
    }

    #[must_use]
    pub fn with_force_repair(mut self, force_repair: bool) -> Self {
        self.force_repair = force_repair;
        self
    }

    #[inline]
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    #[inline]
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    pub fn requested_version(&self) -> &RequestedVersion {
        &self.requested_version
    }

    #[inline]
    pub fn force_repair(&self) -> bool {
        self.force_repair
    }

    /// The single-world request for one item of this batch.
    pub(crate) fn item_request(&self, source: PathBuf, destination: PathBuf) -> ConversionRequest {
        ConversionRequest {
            source,
            destination,
            direction:         self.direction,
            requested_version: self.requested_version.clone(),
            force_repair:      self.force_repair,
        }
    }
}
