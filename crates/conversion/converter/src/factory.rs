use std::fmt::{self, Debug, Formatter};
use std::path::Path;

use mcconvert_datatypes::{Platform, VersionNumber};
use mcconvert_engine::{ContainerFormat, TargetContainer, WorldEngine};

use crate::ConversionError;


/// Construct a container for `platform` at `destination` and create it at `version`,
/// overwriting whatever is there.
///
/// If creation fails, the constructed container is closed before the error is returned.
///
/// This is for callers that already know the version. Resolving a requested version
/// needs the constructed container, so conversions call [`TargetHandle::construct`],
/// [`resolve_for_container`](crate::resolve_for_container) and
/// [`TargetHandle::create_and_open`] in turn instead.
pub fn open_target(
    engine:      &dyn WorldEngine,
    platform:    Platform,
    destination: &Path,
    version:     &VersionNumber,
) -> Result<TargetHandle, ConversionError> {
    let mut target = TargetHandle::construct(engine, platform, destination)?;
    target.create_and_open(platform, version)?;
    Ok(target)
}

/// Exclusive ownership of a target container.
///
/// The container is closed exactly once: either by [`TargetHandle::release`], or when the
/// handle is dropped on an error path. Failures to close on drop are only logged.
pub struct TargetHandle {
    container: Box<dyn TargetContainer>,
    format:    ContainerFormat,
    released:  bool,
}

impl TargetHandle {
    /// Construct (but do not create) the container whose format matches `platform`.
    pub fn construct(
        engine:      &dyn WorldEngine,
        platform:    Platform,
        destination: &Path,
    ) -> Result<Self, ConversionError> {
        let format = ContainerFormat::for_platform(platform);
        let container = engine
            .new_container(format, destination)
            .map_err(ConversionError::ContainerCreation)?;

        Ok(Self {
            container,
            format,
            released: false,
        })
    }

    /// Create the container on disk at `version`, replacing anything already there.
    pub fn create_and_open(
        &mut self,
        platform: Platform,
        version:  &VersionNumber,
    ) -> Result<(), ConversionError> {
        self.container
            .create_and_open(platform, version, true)
            .map_err(ConversionError::ContainerCreation)
    }

    /// The container's own name for its format, for logs.
    #[inline]
    pub fn label(&self) -> &str {
        self.container.format_name()
    }

    #[inline]
    pub fn format(&self) -> ContainerFormat {
        self.format
    }

    #[inline]
    pub fn container(&self) -> &dyn TargetContainer {
        self.container.as_ref()
    }

    #[inline]
    pub fn container_mut(&mut self) -> &mut dyn TargetContainer {
        self.container.as_mut()
    }

    /// Close the container, returning any error from doing so.
    pub fn release(mut self) -> anyhow::Result<()> {
        self.released = true;
        self.container.close()
    }

    /// Close the container, logging (and otherwise ignoring) any error from doing so.
    pub fn release_quietly(self) {
        let format = self.format;
        if let Err(err) = self.release() {
            log::warn!("ignoring error while closing a {format} container: {err:?}");
        }
    }
}

impl Drop for TargetHandle {
    fn drop(&mut self) {
        if !self.released {
            self.released = true;
            if let Err(err) = self.container.close() {
                log::warn!("ignoring error while closing a {} container: {err:?}", self.format);
            }
        }
    }
}

impl Debug for TargetHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetHandle")
            .field("format", &self.format)
            .field("label", &self.label())
            .field("released", &self.released)
            .finish_non_exhaustive()
    }
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::test_engine::{FakeEngine, Stage};
    use super::*;

    #[test]
    fn platform_selects_format() {
        let engine = FakeEngine::new();
        let dir = tempfile::tempdir().unwrap();

        let java = TargetHandle::construct(&engine, Platform::Java, dir.path()).unwrap();
        assert_eq!(java.format(), ContainerFormat::Anvil);
        assert_eq!(java.label(), "FakeAnvilFormat");

        let bedrock = TargetHandle::construct(&engine, Platform::Bedrock, dir.path()).unwrap();
        assert_eq!(bedrock.format(), ContainerFormat::LevelDb);
        assert_eq!(bedrock.label(), "FakeLevelDbFormat");
    }

    #[test]
    fn open_target_creates_with_overwrite() {
        let engine = FakeEngine::new();
        let counters = Arc::clone(&engine.counters);
        let dir = tempfile::tempdir().unwrap();
        let version = VersionNumber::from([1, 20, 1]);

        let target = open_target(&engine, Platform::Java, dir.path(), &version).unwrap();
        assert_eq!(counters.creations(), vec![(Platform::Java, version, true)]);

        target.release().unwrap();
        assert_eq!(counters.container_closes(), 1);
    }

    #[test]
    fn failed_creation_releases_once() {
        let engine = FakeEngine::new().failing_at(Stage::Create);
        let counters = Arc::clone(&engine.counters);
        let dir = tempfile::tempdir().unwrap();

        let err = open_target(&engine, Platform::Bedrock, dir.path(), &VersionNumber::Scalar(1))
            .unwrap_err();
        assert!(matches!(err, ConversionError::ContainerCreation(_)), "{err}");
        assert!(err.details().is_some(), "engine diagnostics should be kept");
        assert_eq!(counters.container_closes(), 1);
    }

    #[test]
    fn dropping_releases_once() {
        let engine = FakeEngine::new();
        let counters = Arc::clone(&engine.counters);
        let dir = tempfile::tempdir().unwrap();

        let target = TargetHandle::construct(&engine, Platform::Java, dir.path()).unwrap();
        drop(target);
        assert_eq!(counters.container_closes(), 1);

        let target = TargetHandle::construct(&engine, Platform::Java, dir.path()).unwrap();
        target.release_quietly();
        assert_eq!(counters.container_closes(), 2);
    }
}
