use crate::core::validator::InstrumentValidator;
use crate::core::{BatchResult, Clock, ConfigProvider, InstrumentRecord, Pipeline, Storage};
use crate::domain::model::{InstrumentDefect, PaymentInstrument, ReportRow};
use crate::utils::error::{CheckError, Result};
use serde::Deserialize;
use std::path::Path;

pub const REPORT_CSV: &str = "report.csv";
pub const REPORT_JSON: &str = "report.json";

const REPORT_HEADER: [&str; 6] = ["id", "method", "valid", "network", "last4", "defects"];

/// 批次輸入的一列；所有欄位皆可省略
#[derive(Debug, Deserialize)]
struct CsvRow {
    id: Option<String>,
    method: Option<String>,
    vpa: Option<String>,
    card_number: Option<String>,
    expiry_month: Option<String>,
    expiry_year: Option<String>,
    cvv: Option<String>,
}

impl CsvRow {
    fn into_instrument(self) -> Option<PaymentInstrument> {
        match self.method.as_deref().map(|m| m.trim().to_ascii_lowercase()).as_deref() {
            Some("upi") => Some(PaymentInstrument::Upi { vpa: self.vpa }),
            Some("card") => Some(PaymentInstrument::Card {
                card_number: self.card_number,
                expiry_month: self.expiry_month,
                expiry_year: self.expiry_year,
                cvv: self.cvv,
            }),
            _ => None,
        }
    }
}

/// Reads instruments from a CSV file, checks them, and writes redacted reports.
pub struct BatchPipeline<S: Storage, P: ConfigProvider, C: Clock> {
    storage: S,
    config: P,
    validator: InstrumentValidator<C>,
}

impl<S: Storage, P: ConfigProvider, C: Clock> BatchPipeline<S, P, C> {
    pub fn new(storage: S, config: P, validator: InstrumentValidator<C>) -> Self {
        Self {
            storage,
            config,
            validator,
        }
    }

    fn output_file(&self, name: &str) -> String {
        Path::new(self.config.output_path())
            .join(name)
            .to_string_lossy()
            .into_owned()
    }

    fn render_csv(rows: &[ReportRow]) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(REPORT_HEADER)?;

        for row in rows {
            let defects = row
                .defects
                .iter()
                .map(|d| d.as_str())
                .collect::<Vec<_>>()
                .join(";");
            writer.write_record([
                row.id.as_str(),
                row.method.as_str(),
                if row.valid { "true" } else { "false" },
                row.network.map(|n| n.as_str()).unwrap_or_default(),
                row.last4.as_deref().unwrap_or_default(),
                defects.as_str(),
            ])?;
        }

        writer
            .into_inner()
            .map_err(|e| CheckError::IoError(e.into_error()))
    }
}

impl<S: Storage, P: ConfigProvider, C: Clock> Pipeline for BatchPipeline<S, P, C> {
    fn extract(&self) -> Result<Vec<InstrumentRecord>> {
        let input_path = self.config.input_path();
        tracing::debug!("Reading instruments from: {}", input_path);

        let data = self.storage.read_file(input_path)?;
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.config.delimiter())
            .flexible(true)
            .from_reader(data.as_slice());

        let mut records = Vec::new();
        for (index, row) in reader.deserialize::<CsvRow>().enumerate() {
            let fallback_id = format!("row-{}", index + 1);
            match row {
                Ok(row) => {
                    let id = row
                        .id
                        .clone()
                        .filter(|id| !id.trim().is_empty())
                        .unwrap_or(fallback_id);
                    records.push(InstrumentRecord {
                        id,
                        instrument: row.into_instrument(),
                    });
                }
                Err(_) => {
                    // 錯誤訊息可能帶有欄位內容，不寫入日誌
                    tracing::warn!("Row {} could not be parsed, marking as malformed", index + 1);
                    records.push(InstrumentRecord {
                        id: fallback_id,
                        instrument: None,
                    });
                }
            }
        }

        Ok(records)
    }

    fn transform(&self, records: Vec<InstrumentRecord>) -> Result<BatchResult> {
        let rows = records
            .into_iter()
            .map(|record| match record.instrument {
                Some(instrument) => {
                    let report = self.validator.check(&instrument);
                    tracing::debug!(
                        "Checked {} ({}): valid={}, last4={}",
                        record.id,
                        report.method,
                        report.is_valid(),
                        report.last4.as_deref().unwrap_or("-")
                    );
                    ReportRow::from_report(record.id, report)
                }
                None => ReportRow {
                    id: record.id,
                    method: "unknown".to_string(),
                    valid: false,
                    network: None,
                    last4: None,
                    defects: vec![InstrumentDefect::MalformedRow],
                },
            })
            .collect();

        Ok(BatchResult { rows })
    }

    fn load(&self, result: &BatchResult) -> Result<Vec<String>> {
        let mut written = Vec::new();

        for format in self.config.output_formats() {
            let (path, data) = match format.as_str() {
                "csv" => (self.output_file(REPORT_CSV), Self::render_csv(&result.rows)?),
                "json" => (
                    self.output_file(REPORT_JSON),
                    serde_json::to_vec_pretty(&result.rows)?,
                ),
                other => {
                    return Err(CheckError::ProcessingError {
                        message: format!("Unsupported output format: {}", other),
                    })
                }
            };

            tracing::debug!("Writing {} report ({} bytes) to {}", format, data.len(), path);
            self.storage.write_file(&path, &data)?;
            written.push(path);
        }

        Ok(written)
    }
}
