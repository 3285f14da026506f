use std::fs::File;
use std::io;
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::{file_name_of, io_error, ExportError};

/// Packs `file` into a new deflated ZIP at `archive`, stored under its bare
/// file name. An existing archive is overwritten.
///
/// # Errors
///
/// Returns [`ExportError`] naming both paths when either cannot be read or
/// written.
pub fn create_zip_archive(archive: &Path, file: &Path) -> Result<(), ExportError> {
    let zip_err = |source| ExportError::Zip {
        archive: archive.to_path_buf(),
        file: file.to_path_buf(),
        source,
    };

    let entry_name = file_name_of(file)?;
    let mut source = File::open(file).map_err(io_error(file))?;
    let target = File::create(archive).map_err(io_error(archive))?;

    let mut zip = ZipWriter::new(target);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    zip.start_file(entry_name.as_str(), options).map_err(zip_err)?;
    io::copy(&mut source, &mut zip).map_err(io_error(archive))?;
    zip.finish().map_err(zip_err)?;

    tracing::info!(
        archive = %archive.display(),
        file = %entry_name,
        "archive created"
    );
    Ok(())
}
