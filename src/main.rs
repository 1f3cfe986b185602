use clap::Parser;
use instrument_check::domain::ports::Clock;
use instrument_check::utils::error::{CheckError, ErrorSeverity};
use instrument_check::utils::{logger, validation::Validate};
use instrument_check::{
    BatchConfig, BatchEngine, BatchPipeline, CliConfig, Command, FixedClock, InstrumentValidator,
    LocalStorage, PaymentInstrument, SystemClock, YearMonth,
};

fn main() {
    let config = CliConfig::parse();

    let result = match &config.command {
        Command::Batch { config: path, dry_run } => run_batch(&config, path, *dry_run),
        _ => {
            init_logger(&config, None, false);
            run_single(&config)
        }
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ instrument-check failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        std::process::exit(exit_code(e.severity()));
    }
}

fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn init_logger(config: &CliConfig, level: Option<&str>, json_from_file: bool) {
    if config.json_logs || json_from_file {
        logger::init_json_logger(if config.verbose { Some("debug") } else { level });
    } else {
        logger::init_cli_logger(config.verbose);
    }
}

/// CLI 參數優先，其次是設定檔，最後才使用系統時鐘
fn select_clock(cli: Option<YearMonth>, file: Option<YearMonth>) -> Box<dyn Clock> {
    match cli.or(file) {
        Some(reference) => {
            tracing::info!("🕒 Expiry checks pinned to {}", reference);
            Box::new(FixedClock(reference))
        }
        None => Box::new(SystemClock),
    }
}

fn run_single(config: &CliConfig) -> Result<(), CheckError> {
    config.validate()?;

    let clock = select_clock(config.reference_month, None);
    let validator = InstrumentValidator::new(&*clock);

    let output = match &config.command {
        Command::Vpa { vpa } => serde_json::json!({ "valid": validator.is_valid_vpa(vpa) }),
        Command::Network { number } => {
            serde_json::json!({ "network": validator.detect_card_network(number) })
        }
        Command::Last4 { number } => serde_json::json!({ "last4": validator.card_last4(number) }),
        Command::Card {
            number,
            month,
            year,
            cvv,
        } => {
            let network = validator.detect_card_network(number);
            let mut output = serde_json::json!({
                "valid_number": validator.is_valid_card_number(number),
                "network": network,
                "last4": validator.card_last4(number),
            });
            if let (Some(month), Some(year)) = (month, year) {
                output["valid_expiry"] = validator.is_valid_expiry(month, year).into();
            }
            if let Some(cvv) = cvv {
                output["valid_cvv"] = validator.is_valid_cvv(cvv, network).into();
            }
            if let (Some(month), Some(year), Some(cvv)) = (month, year, cvv) {
                let report = validator.check(&PaymentInstrument::Card {
                    card_number: Some(number.clone()),
                    expiry_month: Some(month.clone()),
                    expiry_year: Some(year.clone()),
                    cvv: Some(cvv.clone()),
                });
                output["valid"] = report.is_valid().into();
                output["defects"] = serde_json::to_value(&report.defects)?;
            }
            output
        }
        Command::Batch { .. } => unreachable!("batch is dispatched separately"),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run_batch(cli: &CliConfig, path: &str, dry_run: bool) -> Result<(), CheckError> {
    // 先載入設定檔，日誌格式可能由設定檔決定
    let batch_config = match BatchConfig::from_file(path) {
        Ok(batch_config) => batch_config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", path, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    init_logger(cli, batch_config.log_level(), batch_config.json_logs());
    tracing::info!("🚀 Starting batch job '{}'", batch_config.job.name);
    tracing::info!("📁 Loaded configuration from: {}", path);

    cli.validate()?;
    batch_config.validate()?;
    tracing::info!("✅ Configuration loaded and validated successfully");

    if dry_run {
        tracing::info!("🔍 DRY RUN MODE - No reports will be written");
        println!("Job:     {}", batch_config.job.name);
        println!("Input:   {}", batch_config.input.path);
        println!("Output:  {}", batch_config.output.path);
        println!("Formats: {}", batch_config.output.formats.join(", "));
        return Ok(());
    }

    let clock = select_clock(cli.reference_month, batch_config.reference_month()?);
    let validator = InstrumentValidator::new(&*clock);
    let storage = LocalStorage::new(".".to_string());
    let pipeline = BatchPipeline::new(storage, batch_config, validator);

    let summary = BatchEngine::new(pipeline).run()?;
    tracing::info!("✅ Batch completed: {}/{} valid", summary.valid, summary.total);
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
