use crate::utils::error::{CombineError, Result};
use std::io::Write;
use std::path::{Component, Path, PathBuf};

/// Strips `.<extension>` from a file name. Returns `None` when the name
/// does not carry that extension. Matching is case-sensitive.
pub fn derive_label<'a>(file_name: &'a str, extension: &str) -> Option<&'a str> {
    file_name.strip_suffix(extension)?.strip_suffix('.')
}

/// Lines of `content` split on `\n`. A trailing newline does not open an
/// extra empty line; a last line without newline still counts.
pub fn lines(content: &[u8]) -> impl Iterator<Item = &[u8]> {
    let body = match content {
        [] => None,
        c => Some(c.strip_suffix(b"\n").unwrap_or(c)),
    };
    body.into_iter().flat_map(|b| b.split(|&byte| byte == b'\n'))
}

/// Every line after the header.
pub fn data_lines(content: &[u8]) -> impl Iterator<Item = &[u8]> {
    lines(content).skip(1)
}

/// Writer for `label,line` records: no quoting, `\n` terminated.
pub fn record_writer<W: Write>(inner: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(inner)
}

pub fn append_records<W: Write>(
    writer: &mut csv::Writer<W>,
    label: &str,
    content: &[u8],
) -> Result<usize> {
    let mut written = 0;
    for line in data_lines(content) {
        writer.write_record([label.as_bytes(), line])?;
        written += 1;
    }
    Ok(written)
}

pub fn finish<W: Write>(writer: csv::Writer<W>) -> Result<W> {
    writer
        .into_inner()
        .map_err(|e| CombineError::IoError(e.into_error()))
}

/// Lexical normal form: `.` components dropped, `..` folded into the
/// preceding component. Symlinks are not resolved.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
