use std::borrow::Cow;

use mcconvert_datatypes::Platform;
use mcconvert_engine::WorldEngine;

use crate::{ConversionError, TargetHandle};
use crate::pipeline::catch_engine_panic;


/// Query the versions `engine` can write for the platform tagged `platform`, using a
/// container in a scratch folder that is removed afterwards.
///
/// A `limit` of `None` or `Some(0)` keeps every version. A panic inside the engine is
/// returned as [`ConversionError::EnginePanic`].
pub(crate) fn list_target_versions(
    engine:   &dyn WorldEngine,
    platform: &str,
    limit:    Option<usize>,
) -> Result<Vec<String>, ConversionError> {
    let platform: Platform = platform.parse()?;

    let scratch = tempfile::tempdir()
        .map_err(|err| ConversionError::Io(Cow::Borrowed("creating a scratch folder"), err))?;

    let mut versions = catch_engine_panic(|| {
        let target = TargetHandle::construct(engine, platform, scratch.path())?;
        let versions = target
            .container()
            .version_numbers(platform)
            .unwrap_or_else(|err| {
                log::debug!("{} has no version list for {platform}: {err:?}", target.label());
                Vec::new()
            });
        target.release_quietly();
        Ok(versions)
    })?;

    if let Some(limit) = limit.filter(|&limit| limit > 0) {
        let excess = versions.len().saturating_sub(limit);
        versions.drain(..excess);
    }

    Ok(versions.iter().map(ToString::to_string).collect())
}
