use mcconvert_datatypes::{Platform, RequestedVersion, VersionNumber};
use mcconvert_engine::TargetContainer;

use crate::UnresolvableVersionError;


/// Pick the concrete version to write for `target`.
///
/// An exact request is used as-is. Otherwise the newest entry of `supported_versions`
/// (which lists versions oldest first) is chosen; if that lookup fails or is empty, the
/// version of `fallback_max_version` is used.
///
/// Requests that could not be parsed are treated the same as asking for the latest
/// version. Callers that want such requests rejected must check for
/// [`RequestedVersion::Unparsed`] themselves.
pub fn resolve_version<F>(
    target:               Platform,
    requested:            &RequestedVersion,
    supported_versions:   F,
    fallback_max_version: Option<(String, VersionNumber)>,
) -> Result<VersionNumber, UnresolvableVersionError>
where
    F: FnOnce(Platform) -> anyhow::Result<Vec<VersionNumber>>,
{
    match requested {
        RequestedVersion::Exact(version) => return Ok(version.clone()),
        RequestedVersion::Unparsed(input) => {
            log::warn!("{input:?} is not a version number, using the latest {target} version");
        }
        RequestedVersion::Latest => {}
    }

    match supported_versions(target) {
        Ok(mut versions) => {
            if let Some(newest) = versions.pop() {
                return Ok(newest);
            }
            log::debug!("the engine lists no {target} versions, using the declared maximum");
        }
        Err(err) => {
            log::debug!("could not list {target} versions ({err}), using the declared maximum");
        }
    }

    fallback_max_version
        .map(|(_platform, version)| version)
        .ok_or(UnresolvableVersionError { platform: target })
}

/// [`resolve_version`], using what `container` reports about itself.
pub fn resolve_for_container(
    target:    Platform,
    requested: &RequestedVersion,
    container: &dyn TargetContainer,
) -> Result<VersionNumber, UnresolvableVersionError> {
    resolve_version(
        target,
        requested,
        |platform| container.version_numbers(platform),
        container.max_world_version(),
    )
}
