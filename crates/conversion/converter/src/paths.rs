use std::{env, fs, io};
use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

use crate::ValidationError;


/// Expand a leading `~` and make `path` absolute.
///
/// The longest part of the path that exists is canonicalized, so that a missing path
/// compares correctly against canonical ones.
pub(crate) fn normalize(path: &Path) -> Result<PathBuf, ValidationError> {
    let absolute = std::path::absolute(expand_home(path))
        .map_err(|err| ValidationError::Io(Cow::Borrowed("normalizing a path"), err))?;

    for ancestor in absolute.ancestors() {
        let missing = absolute.strip_prefix(ancestor);
        if let (Ok(canonical), Ok(missing)) = (fs::canonicalize(ancestor), missing) {
            return Ok(canonical.join(missing));
        }
    }

    Ok(absolute)
}

fn expand_home(path: &Path) -> PathBuf {
    let mut components = path.components();

    let starts_with_tilde = matches!(
        components.next(),
        Some(Component::Normal(first)) if first == "~"
    );
    if !starts_with_tilde {
        return path.to_owned();
    }

    match env::var_os("HOME").or_else(|| env::var_os("USERPROFILE")) {
        Some(home) => Path::new(&home).join(components.as_path()),
        None       => path.to_owned(),
    }
}

/// The input must be an existing folder.
pub(crate) fn check_source(source: &Path) -> Result<(), ValidationError> {
    match fs::metadata(source) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(ValidationError::InputNotDirectory(source.to_owned())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            Err(ValidationError::InputMissing(source.to_owned()))
        }
        Err(err) => Err(ValidationError::Io(Cow::Borrowed("reading the input path"), err)),
    }
}

/// The output must not be the input or lie inside it, or copying the input would walk
/// into its own copy. Both paths must already be normalized.
pub(crate) fn check_not_nested(source: &Path, destination: &Path) -> Result<(), ValidationError> {
    if destination.starts_with(source) {
        Err(ValidationError::OutputInsideInput(destination.to_owned()))
    } else {
        Ok(())
    }
}

/// The output must be an empty folder; a missing one is created.
pub(crate) fn prepare_destination(destination: &Path) -> Result<(), ValidationError> {
    match fs::metadata(destination) {
        Ok(metadata) if metadata.is_dir() => {
            let mut entries = fs::read_dir(destination).map_err(|err| {
                ValidationError::Io(Cow::Borrowed("listing the output folder"), err)
            })?;

            if entries.next().is_some() {
                Err(ValidationError::OutputNotEmpty(destination.to_owned()))
            } else {
                Ok(())
            }
        }
        Ok(_) => Err(ValidationError::OutputNotDirectory(destination.to_owned())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(destination).map_err(|err| {
                ValidationError::Io(Cow::Borrowed("creating the output folder"), err)
            })
        }
        Err(err) => Err(ValidationError::Io(Cow::Borrowed("reading the output path"), err)),
    }
}
