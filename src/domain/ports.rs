use crate::domain::model::{BatchResult, InstrumentRecord, YearMonth};
use crate::utils::error::Result;
use chrono::Datelike;

/// Source of "now" for expiry checks.
pub trait Clock: Send + Sync {
    fn current_year_month(&self) -> YearMonth;
}

/// Reads the local wall clock on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_year_month(&self) -> YearMonth {
        let today = chrono::Local::now().date_naive();
        YearMonth {
            year: i64::from(today.year()),
            month: today.month(),
        }
    }
}

/// Always reports the same month. Used to pin expiry checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub YearMonth);

impl Clock for FixedClock {
    fn current_year_month(&self) -> YearMonth {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn current_year_month(&self) -> YearMonth {
        (**self).current_year_month()
    }
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn delimiter(&self) -> u8;
    fn output_formats(&self) -> &[String];
}

pub trait Pipeline {
    fn extract(&self) -> Result<Vec<InstrumentRecord>>;
    fn transform(&self, records: Vec<InstrumentRecord>) -> Result<BatchResult>;
    fn load(&self, result: &BatchResult) -> Result<Vec<String>>;
}
