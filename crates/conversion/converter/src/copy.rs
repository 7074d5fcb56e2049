use std::{fs, io};
use std::fs::File;
use std::path::Path;

use walkdir::WalkDir;

use crate::ConversionError;


/// Copy everything inside `source` into the existing folder `destination`,
/// keeping the permissions and modification time of each file and folder,
/// `destination` included.
///
/// Symlinks are followed, so their targets are copied. Returns the number of files copied.
pub(crate) fn copy_world_tree(source: &Path, destination: &Path) -> Result<u64, ConversionError> {
    let mut files = 0;
    // Parents come before their children, in walk order.
    let mut folders = vec![(source.to_owned(), destination.to_owned())];

    for entry in WalkDir::new(source).min_depth(1).follow_links(true) {
        let entry = entry.map_err(|err| ConversionError::Copy {
            path:  err.path().unwrap_or(source).to_owned(),
            error: err.into(),
        })?;

        let add_context = |error: io::Error| ConversionError::Copy {
            path: entry.path().to_owned(),
            error,
        };

        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|err| add_context(io::Error::other(err)))?;
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(add_context)?;
            folders.push((entry.path().to_owned(), target));
        } else {
            copy_file(entry.path(), &target).map_err(add_context)?;
            files += 1;
        }
    }

    // Deepest first, so that finishing a child does not touch its parent's times.
    for (from, to) in folders.iter().rev() {
        copy_folder_metadata(from, to).map_err(|error| ConversionError::Copy {
            path: from.clone(),
            error,
        })?;
    }

    Ok(files)
}

fn copy_folder_metadata(from: &Path, to: &Path) -> io::Result<()> {
    let metadata = fs::metadata(from)?;

    if let Ok(modified) = metadata.modified() {
        open_folder(to)?.set_modified(modified)?;
    }

    fs::set_permissions(to, metadata.permissions())
}

#[cfg(not(windows))]
fn open_folder(path: &Path) -> io::Result<File> {
    File::open(path)
}

#[cfg(windows)]
fn open_folder(path: &Path) -> io::Result<File> {
    use std::os::windows::fs::OpenOptionsExt as _;

    // Folders can only be opened with `FILE_FLAG_BACKUP_SEMANTICS`.
    const FILE_FLAG_BACKUP_SEMANTICS: u32 = 0x0200_0000;
    File::options()
        .write(true)
        .custom_flags(FILE_FLAG_BACKUP_SEMANTICS)
        .open(path)
}

fn copy_file(from: &Path, to: &Path) -> io::Result<()> {
    let metadata = fs::metadata(from)?;

    let mut reader = File::open(from)?;
    let mut writer = File::create(to)?;
    io::copy(&mut reader, &mut writer)?;

    // Times are set before permissions, in case the copy is read-only.
    if let Ok(modified) = metadata.modified() {
        writer.set_modified(modified)?;
    }
    drop(writer);

    fs::set_permissions(to, metadata.permissions())
}
