//! Dataset writers
//!
//! Both formats carry the same flattened rows (see [`DatasetRow`]). The
//! `beta_i` column only appears when agents have their own disutility weight.
//! Outcome columns are left empty for agents flagged unresolved.

use std::io::Write;
use std::path::Path;

use laborsim_core::model::{Dataset, DatasetRow};

use crate::error::DataError;
use crate::util::atomic_write_bytes;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl OutputFormat {
    /// Guess the format from a file extension
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("csv") {
            Some(OutputFormat::Csv)
        } else if ext.eq_ignore_ascii_case("json") {
            Some(OutputFormat::Json)
        } else {
            None
        }
    }
}

pub fn render(dataset: &Dataset, format: OutputFormat) -> Result<Vec<u8>, DataError> {
    match format {
        OutputFormat::Csv => render_csv(dataset),
        OutputFormat::Json => render_json(dataset),
    }
}

fn render_csv(dataset: &Dataset) -> Result<Vec<u8>, DataError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in dataset.rows() {
        writer
            .serialize(&row)
            .map_err(|e| DataError::Serialize(format!("Failed to write CSV row: {}", e)))?;
    }
    writer
        .into_inner()
        .map_err(|e| DataError::Serialize(format!("Failed to flush CSV: {}", e)))
}

fn render_json(dataset: &Dataset) -> Result<Vec<u8>, DataError> {
    let rows: Vec<DatasetRow> = dataset.rows().collect();
    serde_json::to_vec_pretty(&rows)
        .map_err(|e| DataError::Serialize(format!("Failed to serialize JSON: {}", e)))
}

/// Write the dataset to `path` atomically, or to stdout when `path` is `None`
pub fn write_dataset(
    dataset: &Dataset,
    path: Option<&Path>,
    format: OutputFormat,
) -> Result<(), DataError> {
    let bytes = render(dataset, format)?;

    match path {
        Some(path) => {
            atomic_write_bytes(path, &bytes).map_err(|e| {
                DataError::Io(format!("Failed to write {}: {}", path.display(), e))
            })?;
            tracing::info!(
                "wrote {} rows ({:?}) to {}",
                dataset.num_rows(),
                format,
                path.display()
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&bytes)
                .and_then(|()| stdout.flush())
                .map_err(|e| DataError::Io(format!("Failed to write to stdout: {}", e)))?;
        }
    }
    Ok(())
}
