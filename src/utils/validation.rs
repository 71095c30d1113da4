use crate::utils::error::{CombineError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: &str, reason: &str) -> CombineError {
    CombineError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(invalid(field_name, path, "Path cannot be empty"));
    }

    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains null bytes"));
    }

    Ok(())
}

/// An extension is the bare suffix after the dot, e.g. `txt`.
pub fn validate_extension(field_name: &str, extension: &str) -> Result<()> {
    if extension.trim().is_empty() {
        return Err(invalid(field_name, extension, "Value cannot be empty or whitespace-only"));
    }

    if extension.starts_with('.') {
        return Err(invalid(field_name, extension, "Give the extension without the leading dot"));
    }

    if extension.contains(['/', '\\', '\0']) {
        return Err(invalid(field_name, extension, "Extension cannot contain path separators"));
    }

    Ok(())
}

/// The output must name a file, not a directory.
pub fn validate_file_name(field_name: &str, name: &str) -> Result<()> {
    validate_path(field_name, name)?;

    if name.ends_with('/') || name.ends_with('\\') {
        return Err(invalid(field_name, name, "Output must be a file name, not a directory"));
    }

    match std::path::Path::new(name).file_name() {
        Some(_) => Ok(()),
        None => Err(invalid(field_name, name, "Output must be a file name, not a directory")),
    }
}
