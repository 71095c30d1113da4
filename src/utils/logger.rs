use crate::utils::error::{CombineError, Result};
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn cli_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("csv_combine=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("csv_combine=info"))
    }
}

/// Opens `path` for appending, creating it and its parent directories.
pub fn open_log_file(path: &Path) -> Result<Arc<File>> {
    let log_error = |source| CombineError::LogFileError {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(log_error)?;
        }
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(log_error)?;
    Ok(Arc::new(file))
}

/// Plain-text, timestamped debug log kept across runs. It ignores
/// `RUST_LOG` so the file stays complete when the console is quiet.
fn file_layer(log_file: Option<&Path>) -> Result<Option<BoxedLayer>> {
    let Some(path) = log_file else {
        return Ok(None);
    };

    let layer = fmt::layer()
        .with_writer(open_log_file(path)?)
        .with_ansi(false)
        .with_target(false)
        .with_filter(EnvFilter::new("csv_combine=debug"))
        .boxed();
    Ok(Some(layer))
}

/// Human-readable logs on stderr; stdout is reserved for the run summary.
pub fn init_cli_logger(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .with_filter(cli_filter(verbose))
        .boxed();

    let mut layers = vec![console];
    layers.extend(file_layer(log_file)?);
    tracing_subscriber::registry().with(layers).init();
    Ok(())
}

pub fn init_json_logger(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .json()
        .with_filter(cli_filter(verbose))
        .boxed();

    let mut layers = vec![console];
    layers.extend(file_layer(log_file)?);
    tracing_subscriber::registry().with(layers).init();
    Ok(())
}
