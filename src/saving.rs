use crate::store::Export;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Write an export payload into `dir` under its download file name.
///
/// The file is written through a temporary sibling and renamed into place,
/// so a failed save never leaves a truncated report behind.
pub fn save_export(export: &Export, dir: impl AsRef<Path>) -> std::io::Result<PathBuf> {
    save_export_as(export, dir.as_ref().join(export.file_name))
}

/// Write an export payload to an explicit path
pub fn save_export_as(export: &Export, path: impl AsRef<Path>) -> std::io::Result<PathBuf> {
    let path = path.as_ref().to_path_buf();
    let tmp = match path.extension() {
        Some(ext) => path.with_extension(format!("{}.part", ext.to_string_lossy())),
        None => path.with_extension("part"),
    };

    let result = (|| {
        let file = File::create(&tmp)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&export.bytes)?;
        writer.flush()?;
        fs::rename(&tmp, &path)
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&tmp);
        log::error!("failed to save {}: {e}", path.display());
        return Err(e);
    }

    log::info!("saved {} ({} bytes)", path.display(), export.bytes.len());
    Ok(path)
}
