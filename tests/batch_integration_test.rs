use instrument_check::core::Pipeline;
use instrument_check::{
    BatchConfig, BatchEngine, BatchPipeline, FixedClock, InstrumentValidator, LocalStorage,
    YearMonth,
};
use std::path::Path;
use tempfile::TempDir;

const INSTRUMENTS: &str = "\
id,method,vpa,card_number,expiry_month,expiry_year,cvv
txn_1,card,,4111-1111-1111-1111,12,2027,123
txn_2,card,,340000000000009,01,25,1234
txn_3,upi,merchant.01@okbank,,,,
txn_4,upi,name@bank.upi,,,,
txn_5,card,,5500 0000 0000 0004,06,25,12
";

fn write_job(dir: &Path, formats: &str, delimiter: Option<&str>) -> BatchConfig {
    let input = dir.join("instruments.csv");
    let output = dir.join("reports");
    let delimiter_line = delimiter
        .map(|d| format!("delimiter = \"{}\"\n", d))
        .unwrap_or_default();

    let toml_content = format!(
        r#"
[job]
name = "integration"

[input]
path = "{}"
{}
[output]
path = "{}"
formats = [{}]

[expiry]
reference_month = "2025-06"
"#,
        input.display(),
        delimiter_line,
        output.display(),
        formats
    );

    let config_path = dir.join("job.toml");
    std::fs::write(&config_path, toml_content).unwrap();
    BatchConfig::from_file(&config_path).unwrap()
}

fn validator_for(config: &BatchConfig) -> InstrumentValidator<FixedClock> {
    let reference = config.reference_month().unwrap().unwrap();
    InstrumentValidator::new(FixedClock(reference))
}

#[test]
fn test_end_to_end_batch_to_csv_and_json() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("instruments.csv"), INSTRUMENTS).unwrap();

    let config = write_job(temp_dir.path(), r#""csv", "json""#, None);
    let validator = validator_for(&config);
    assert_eq!(
        config.reference_month().unwrap(),
        YearMonth::new(2025, 6)
    );

    let pipeline = BatchPipeline::new(LocalStorage::new(String::new()), config, validator);
    let summary = BatchEngine::new(pipeline).run().unwrap();

    assert_eq!(summary.total, 5);
    assert_eq!(summary.valid, 2);
    assert_eq!(summary.invalid, 3);
    assert_eq!(summary.outputs.len(), 2);

    let csv_report =
        std::fs::read_to_string(temp_dir.path().join("reports").join("report.csv")).unwrap();
    let lines: Vec<&str> = csv_report.lines().collect();
    assert_eq!(lines[0], "id,method,valid,network,last4,defects");
    assert_eq!(lines[1], "txn_1,card,true,visa,1111,");
    assert_eq!(lines[2], "txn_2,card,false,amex,0009,invalid_expiry");
    assert_eq!(lines[3], "txn_3,upi,true,,,");
    assert_eq!(lines[4], "txn_4,upi,false,,,invalid_vpa");
    assert_eq!(lines[5], "txn_5,card,false,mastercard,0004,invalid_cvv");

    let json_report =
        std::fs::read_to_string(temp_dir.path().join("reports").join("report.json")).unwrap();
    let rows: serde_json::Value = serde_json::from_str(&json_report).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 5);
    assert_eq!(rows[1]["defects"][0], "invalid_expiry");
    assert_eq!(rows[2]["network"], serde_json::Value::Null);

    // reports never carry full numbers or addresses
    for secret in ["4111-1111-1111-1111", "340000000000009", "merchant.01@okbank", "1234"] {
        assert!(!csv_report.contains(secret));
        assert!(!json_report.contains(secret));
    }
}

#[test]
fn test_semicolon_delimited_input() {
    let temp_dir = TempDir::new().unwrap();
    let input = INSTRUMENTS.replace(',', ";");
    std::fs::write(temp_dir.path().join("instruments.csv"), input).unwrap();

    let config = write_job(temp_dir.path(), r#""json""#, Some(";"));
    let validator = validator_for(&config);
    let pipeline = BatchPipeline::new(LocalStorage::new(String::new()), config, validator);

    let records = pipeline.extract().unwrap();
    assert_eq!(records.len(), 5);
    assert!(records.iter().all(|r| r.instrument.is_some()));
}

#[test]
fn test_missing_input_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_job(temp_dir.path(), r#""csv""#, None);
    let validator = validator_for(&config);
    let pipeline = BatchPipeline::new(LocalStorage::new(String::new()), config, validator);

    let err = BatchEngine::new(pipeline).run().unwrap_err();
    assert_eq!(
        err.severity(),
        instrument_check::utils::error::ErrorSeverity::Critical
    );
}
