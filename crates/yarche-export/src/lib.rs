//! File outputs of a scrape run: semicolon-delimited CSV exports, their ZIP
//! archives, and mail delivery of the archives.

mod archive;
mod csv_writer;
mod mailer;
mod naming;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use archive::create_zip_archive;
pub use csv_writer::{write_categories_csv, write_products_csv};
pub use mailer::{build_archive_message, send_archive};
pub use naming::{archive_name_for, categories_csv_name, mail_subject, products_csv_name};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to create output directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write CSV file {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to add {} to archive {}: {source}", .file.display(), .archive.display())]
    Zip {
        archive: PathBuf,
        file: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("path has no file name: {}", .0.display())]
    MissingFileName(PathBuf),

    #[error("invalid mail address \"{address}\": {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("failed to build mail for archive {}: {source}", .archive.display())]
    Message {
        archive: PathBuf,
        #[source]
        source: lettre::error::Error,
    },

    #[error("failed to send archive {} to {recipient}: {source}", .archive.display())]
    Smtp {
        archive: PathBuf,
        recipient: String,
        #[source]
        source: lettre::transport::smtp::Error,
    },
}

/// Creates `dir` and its parents when missing.
///
/// # Errors
///
/// Returns [`ExportError::CreateDir`] when the directory cannot be created.
pub fn ensure_output_dir(dir: &Path) -> Result<(), ExportError> {
    std::fs::create_dir_all(dir).map_err(|source| ExportError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ExportError + '_ {
    move |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn file_name_of(path: &Path) -> Result<String, ExportError> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| ExportError::MissingFileName(path.to_path_buf()))
}
