use crate::core::{ConfigProvider, Measurement, Result, Storage};
use crate::utils::error::RomError;
use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const BUNDLE_NAME: &str = "measurements.zip";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Tsv,
    Json,
}

impl ExportFormat {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "tsv" => Ok(ExportFormat::Tsv),
            "json" => Ok(ExportFormat::Json),
            other => Err(RomError::InvalidConfigValueError {
                field: "export_formats".to_string(),
                value: other.to_string(),
                reason: "Valid formats: csv, tsv, json".to_string(),
            }),
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "measurements.csv",
            ExportFormat::Tsv => "measurements.tsv",
            ExportFormat::Json => "measurements.json",
        }
    }
}

/// Export row, with spreadsheet-style headers and the clinical label text.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Surname")]
    surname: &'a str,
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Test")]
    test: &'a str,
    #[serde(rename = "Full ROM")]
    full_rom: Option<f64>,
    #[serde(rename = "Left")]
    left: f64,
    #[serde(rename = "Right")]
    right: f64,
    #[serde(rename = "Result")]
    result: &'static str,
}

impl<'a> From<&'a Measurement> for ExportRow<'a> {
    fn from(m: &'a Measurement) -> Self {
        Self {
            name: &m.name,
            surname: &m.surname,
            date: m.date,
            test: &m.test,
            full_rom: m.full_rom,
            left: m.left,
            right: m.right,
            result: m.result.description(),
        }
    }
}

fn delimited(rows: &[Measurement], delimiter: u8) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());
    for m in rows {
        writer.serialize(ExportRow::from(m))?;
    }
    writer
        .into_inner()
        .map_err(|e| RomError::IoError(e.into_error()))
}

pub fn render(rows: &[Measurement], format: ExportFormat) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Csv => delimited(rows, b','),
        ExportFormat::Tsv => delimited(rows, b'\t'),
        ExportFormat::Json => {
            let export: Vec<ExportRow<'_>> = rows.iter().map(ExportRow::from).collect();
            Ok(serde_json::to_vec_pretty(&export)?)
        }
    }
}

/// Writes measurement exports through a storage rooted at the export directory.
pub struct Exporter<S: Storage> {
    storage: S,
    formats: Vec<ExportFormat>,
    bundle: bool,
}

impl<S: Storage> Exporter<S> {
    pub fn new<C: ConfigProvider>(storage: S, config: &C) -> Result<Self> {
        let formats = config
            .export_formats()
            .iter()
            .map(|f| ExportFormat::parse(f))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            storage,
            formats,
            bundle: config.bundle_exports(),
        })
    }

    /// Returns the locations written.
    pub async fn export(&self, rows: &[Measurement]) -> Result<Vec<String>> {
        tracing::debug!(
            "Exporting {} measurements as {:?} (bundle: {})",
            rows.len(),
            self.formats,
            self.bundle
        );

        if self.bundle {
            let zip_data = {
                let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
                for format in &self.formats {
                    zip.start_file::<_, ()>(format.file_name(), FileOptions::default())?;
                    zip.write_all(&render(rows, *format)?)?;
                }
                zip.finish()?.into_inner()
            };
            self.storage.write_file(BUNDLE_NAME, &zip_data).await?;
            let location = self.storage.locate(BUNDLE_NAME);
            tracing::info!("Wrote export bundle {}", location);
            return Ok(vec![location]);
        }

        let mut written = Vec::with_capacity(self.formats.len());
        for format in &self.formats {
            let data = render(rows, *format)?;
            self.storage.write_file(format.file_name(), &data).await?;
            let location = self.storage.locate(format.file_name());
            tracing::info!("Wrote export {}", location);
            written.push(location);
        }
        Ok(written)
    }
}
