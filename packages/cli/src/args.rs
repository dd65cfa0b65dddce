//! Validation of the documents named on the command line.

use std::path::{Path, PathBuf};

use statement_ledger_pdf::DocumentFormat;

/// Command-line input that cannot be processed.
#[derive(Debug, thiserror::Error)]
pub enum ArgsError {
    #[error("Card digits must be four digits, got {0:?}")]
    CardDigits(String),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("File not found: {0}")]
    MissingFile(PathBuf),

    #[error("Not a PDF or token dump: {0}")]
    UnsupportedFile(PathBuf),

    #[error("No statements to process")]
    NoDocuments,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Checks that `digits` are the four printed digits of a card number.
///
/// # Errors
///
/// Returns [`ArgsError::CardDigits`] otherwise.
pub fn check_card_digits(digits: &str) -> Result<(), ArgsError> {
    if digits.len() == 4 && digits.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ArgsError::CardDigits(digits.to_owned()))
    }
}

/// Resolves the statements to process.
///
/// A folder contributes its supported files (non-recursive, sorted by
/// path). Explicit files are kept in the order given.
///
/// # Errors
///
/// Returns an [`ArgsError`] if the folder is not a directory, a file is
/// missing or unsupported, or nothing is left to process.
pub fn expand_documents(
    folder: Option<&Path>,
    files: &[PathBuf],
) -> Result<Vec<PathBuf>, ArgsError> {
    let documents = match folder {
        Some(folder) => folder_documents(folder)?,
        None => {
            for file in files {
                if !file.is_file() {
                    return Err(ArgsError::MissingFile(file.clone()));
                }
                if DocumentFormat::from_path(file).is_none() {
                    return Err(ArgsError::UnsupportedFile(file.clone()));
                }
            }
            files.to_vec()
        }
    };

    if documents.is_empty() {
        return Err(ArgsError::NoDocuments);
    }

    Ok(documents)
}

fn folder_documents(folder: &Path) -> Result<Vec<PathBuf>, ArgsError> {
    if !folder.is_dir() {
        return Err(ArgsError::NotADirectory(folder.to_path_buf()));
    }

    let mut documents = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let path = entry?.path();
        if path.is_file() && DocumentFormat::from_path(&path).is_some() {
            documents.push(path);
        }
    }
    documents.sort();

    log::debug!("Found {} statements in {}", documents.len(), folder.display());

    Ok(documents)
}
