use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use log::info;

use crate::detail::{OrderDetailRecord, HEADER};
use crate::error::GenError;

/// Writes the header row followed by one row per record. The header is written even when
/// there are no records.
///
/// # Errors
/// Errors when the underlying writer fails
pub fn write_order_details<'a>(
    writer: impl io::Write,
    records: impl IntoIterator<Item = &'a OrderDetailRecord>,
) -> Result<(), GenError> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);
    writer.write_record(HEADER)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes into a sibling `.tmp` file first and moves it over `path` once complete, so a
/// failed run leaves any previous file untouched.
///
/// # Errors
/// Errors when the file cannot be created, written or renamed
pub fn write_order_details_to_path(
    path: impl AsRef<Path>,
    records: &[OrderDetailRecord],
) -> Result<(), GenError> {
    let path = path.as_ref();
    let tmp = path.with_extension("csv.tmp");
    let res = File::create(&tmp)
        .map_err(GenError::from)
        .and_then(|file| write_order_details(BufWriter::new(file), records));
    if let Err(e) = res {
        fs::remove_file(&tmp).ok();
        return Err(e);
    }
    fs::rename(&tmp, path)?;
    info!("Wrote {} order details to {}", records.len(), path.display());
    Ok(())
}

/// `order_details.csv` -> `order_details_old.csv`
#[must_use]
pub fn backup_path(target: &Path) -> PathBuf {
    let stem = target
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match target.extension() {
        Some(ext) => format!("{}_old.{}", stem, ext.to_string_lossy()),
        None => format!("{}_old", stem),
    };
    target.with_file_name(name)
}

/// Resolves `path` through its parent directory, so `data/x.csv` and `./data/x.csv` compare
/// equal even before `x.csv` exists.
fn resolve(path: &Path) -> PathBuf {
    if let Ok(path) = path.canonicalize() {
        return path;
    }
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    match (parent.canonicalize(), path.file_name()) {
        (Ok(parent), Some(name)) => parent.join(name),
        _ => path.to_path_buf(),
    }
}

/// Checks that writing `regenerated` and then replacing `target` with it cannot clobber the
/// current order details or their backup.
///
/// # Errors
/// Errors with [`GenError::Configuration`] when `regenerated` is `target` or its backup
pub fn ensure_replaceable(
    regenerated: impl AsRef<Path>,
    target: impl AsRef<Path>,
) -> Result<(), GenError> {
    let regenerated = resolve(regenerated.as_ref());
    let target = target.as_ref();
    if regenerated == resolve(target) {
        return Err(GenError::Configuration(format!(
            "regenerated file and replaced file are both {}",
            target.display()
        )));
    }
    let backup = backup_path(target);
    if regenerated == resolve(&backup) {
        return Err(GenError::Configuration(format!(
            "regenerated file {} would be overwritten by the backup of {}",
            backup.display(),
            target.display()
        )));
    }
    Ok(())
}

/// Moves `target` aside to its [`backup_path`] (when it exists) and puts `regenerated` in
/// its place. Returns the backup path if a backup was made.
///
/// # Errors
/// Errors as [`ensure_replaceable`], when `regenerated` is missing or when either rename fails
pub fn replace_with_backup(
    regenerated: impl AsRef<Path>,
    target: impl AsRef<Path>,
) -> Result<Option<PathBuf>, GenError> {
    let regenerated = regenerated.as_ref();
    let target = target.as_ref();
    ensure_replaceable(regenerated, target)?;
    if !regenerated.is_file() {
        return Err(GenError::InputNotFound {
            path: regenerated.to_path_buf(),
            source: io::Error::from(io::ErrorKind::NotFound),
        });
    }

    let backup = if target.exists() {
        let backup = backup_path(target);
        fs::rename(target, &backup)?;
        info!("Moved {} to {}", target.display(), backup.display());
        Some(backup)
    } else {
        None
    };
    fs::rename(regenerated, target)?;
    info!("Moved {} to {}", regenerated.display(), target.display());
    Ok(backup)
}
