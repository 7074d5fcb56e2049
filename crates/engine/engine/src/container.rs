use mcconvert_datatypes::{Platform, VersionNumber};


/// A writable destination world, at one platform and version once opened.
pub trait TargetContainer {
    /// Used to display what kind of container this is, e.g. in logs.
    fn format_name(&self) -> &str;

    /// Every version this container can write for `platform`, oldest first.
    fn version_numbers(&self, platform: Platform) -> anyhow::Result<Vec<VersionNumber>>;

    /// The newest version the container declares support for, as a platform tag
    /// and a version, if it declares one.
    fn max_world_version(&self) -> Option<(String, VersionNumber)>;

    /// Create the world on disk and open it for writing.
    ///
    /// When `overwrite` is set, existing content at the container's path may be replaced.
    fn create_and_open(
        &mut self,
        platform:  Platform,
        version:   &VersionNumber,
        overwrite: bool,
    ) -> anyhow::Result<()>;

    /// Flush and close the container. Closing twice should be harmless.
    fn close(&mut self) -> anyhow::Result<()>;
}
