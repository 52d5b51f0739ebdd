#![deny(clippy::all, clippy::pedantic)]

use std::fs;
use std::path::{Path, PathBuf};

use school_blog::domain::posts::CoverUpload;

use crate::client::CliError;

pub fn read_value(val: Option<String>, file: Option<PathBuf>) -> Result<String, CliError> {
    if let Some(path) = file {
        read_file_string(&path)
    } else if let Some(v) = val {
        Ok(v)
    } else {
        Err(CliError::InvalidInput("value required".into()))
    }
}

/// Password from a file (trailing newline stripped) or the environment.
pub fn read_secret(file: Option<PathBuf>, env: Option<String>) -> Result<String, CliError> {
    let secret = match file {
        Some(path) => read_file_string(&path)?
            .trim_end_matches(['\r', '\n'])
            .to_string(),
        None => env.ok_or(CliError::MissingPassword)?,
    };
    if secret.is_empty() {
        return Err(CliError::MissingPassword);
    }
    Ok(secret)
}

pub fn read_cover(path: &Path) -> Result<CoverUpload, CliError> {
    let bytes = fs::read(path).map_err(|source| input_error(path, source))?;
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("cover.jpg")
        .to_string();
    let content_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    Ok(CoverUpload {
        file_name,
        content_type,
        bytes,
    })
}

fn read_file_string(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| input_error(path, source))
}

fn input_error(path: &Path, source: std::io::Error) -> CliError {
    CliError::InputFile {
        path: path.display().to_string(),
        source,
    }
}
