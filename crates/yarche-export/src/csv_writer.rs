use std::fs::File;
use std::path::Path;

use csv::{Writer, WriterBuilder};
use yarche_core::{CategoryTree, ProductField, ProductSnapshot};

use crate::ExportError;

const DELIMITER: u8 = b';';

fn open_writer(path: &Path) -> Result<Writer<File>, ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        crate::ensure_output_dir(parent)?;
    }
    WriterBuilder::new()
        .delimiter(DELIMITER)
        .from_path(path)
        .map_err(|source| ExportError::Csv {
            path: path.to_path_buf(),
            source,
        })
}

/// Writes the category export with header `id;parent_id;name;url;parent_url`.
///
/// # Errors
///
/// Returns [`ExportError`] naming `path` when the file cannot be written.
pub fn write_categories_csv(path: &Path, tree: &CategoryTree) -> Result<(), ExportError> {
    let csv_err = |source| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = open_writer(path)?;
    if tree.is_empty() {
        writer
            .write_record(["id", "parent_id", "name", "url", "parent_url"])
            .map_err(csv_err)?;
    }
    for node in tree {
        writer.serialize(node).map_err(csv_err)?;
    }
    writer.flush().map_err(crate::io_error(path))?;

    tracing::info!(path = %path.display(), categories = tree.len(), "category CSV written");
    Ok(())
}

/// Writes one header row of `schema` plus one row per record, in snapshot
/// order. Unset and blank fields become empty cells.
///
/// # Errors
///
/// Returns [`ExportError`] naming `path` when the file cannot be written.
pub fn write_products_csv(
    path: &Path,
    schema: &[ProductField],
    snapshot: &ProductSnapshot,
) -> Result<(), ExportError> {
    let csv_err = |source| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = open_writer(path)?;
    writer
        .write_record(schema.iter().map(|field| field.as_str()))
        .map_err(csv_err)?;
    for (_, record) in snapshot.iter() {
        writer.write_record(record.row(schema)).map_err(csv_err)?;
    }
    writer.flush().map_err(crate::io_error(path))?;

    tracing::info!(path = %path.display(), products = snapshot.len(), "product CSV written");
    Ok(())
}
