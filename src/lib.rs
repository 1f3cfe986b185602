pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use config::{cli::LocalStorage, toml_config::BatchConfig};
pub use core::{engine::BatchEngine, pipeline::BatchPipeline};
pub use core::validator::{
    card_last4, detect_card_network, is_valid_card_number, is_valid_cvv, is_valid_expiry,
    is_valid_expiry_at, is_valid_vpa, normalize_card_number, InstrumentValidator,
};
pub use domain::model::{
    CardNetwork, InstrumentDefect, InstrumentReport, PaymentInstrument, YearMonth,
};
pub use domain::ports::{Clock, FixedClock, SystemClock};
pub use utils::error::{CheckError, Result};
