use std::fs;
use std::path::{Path, PathBuf};

use crate::editing::YarnDocument;

/// File extension of Yarn documents.
pub const YARN_EXTENSION: &str = "yarn";

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid yarn directory: {0}")]
    InvalidDir(String),
}

/// Read a Yarn document and return its text unchanged
pub fn read_yarn_file(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(IoError::Io)
}

/// Read and parse a Yarn document
pub fn load_document(path: &Path) -> Result<YarnDocument, IoError> {
    let text = read_yarn_file(path)?;
    let document = YarnDocument::from_text(&text);
    log::info!(
        "loaded {} node(s) from {}",
        document.nodes().len(),
        path.display()
    );
    Ok(document)
}

/// Write document text, creating parent directories as needed
pub fn write_yarn_file(path: &Path, content: &str) -> Result<(), IoError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }

    fs::write(path, content).map_err(IoError::Io)
}

/// Find all `.yarn` files below `root`, sorted by path
pub fn scan_yarn_files(root: &Path) -> Result<Vec<PathBuf>, IoError> {
    if !root.is_dir() {
        return Err(IoError::InvalidDir(format!(
            "{} is not a directory",
            root.display()
        )));
    }

    let mut files = Vec::new();
    scan_directory_recursive(root, &mut files)?;
    files.sort();
    Ok(files)
}

fn scan_directory_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), IoError> {
    let entries = fs::read_dir(dir).map_err(IoError::Io)?;

    for entry in entries {
        let entry = entry.map_err(IoError::Io)?;
        let path = entry.path();

        if path.is_dir() {
            scan_directory_recursive(&path, files)?;
        } else if let Some(ext) = path.extension()
            && ext == YARN_EXTENSION
        {
            files.push(path);
        }
    }

    Ok(())
}
