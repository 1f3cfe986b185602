use serde::{Deserialize, Serialize};
use std::fmt;

/// Card network tag produced by prefix classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardNetwork {
    Visa,
    Mastercard,
    Amex,
    Rupay,
    Unknown,
}

impl CardNetwork {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardNetwork::Visa => "visa",
            CardNetwork::Mastercard => "mastercard",
            CardNetwork::Amex => "amex",
            CardNetwork::Rupay => "rupay",
            CardNetwork::Unknown => "unknown",
        }
    }

    /// 由字串標籤轉換，無法辨識的標籤一律視為 `Unknown` (大小寫敏感)
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "visa" => CardNetwork::Visa,
            "mastercard" => CardNetwork::Mastercard,
            "amex" => CardNetwork::Amex,
            "rupay" => CardNetwork::Rupay,
            _ => CardNetwork::Unknown,
        }
    }
}

impl fmt::Display for CardNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A calendar month, ordered by year then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i64,
    pub month: u32,
}

impl YearMonth {
    /// Returns `None` when the month is outside 1..=12.
    pub fn new(year: i64, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// 解析 `YYYY-MM` 格式 (例如 `2025-06`)
    pub fn parse(value: &str) -> Option<Self> {
        let (year, month) = value.trim().split_once('-')?;
        if year.len() != 4 || month.len() != 2 {
            return None;
        }
        if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
            return None;
        }
        Self::new(year.parse().ok()?, month.parse().ok()?)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Instrument payload as submitted by a checkout form.
///
/// Missing fields are treated the same as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum PaymentInstrument {
    Upi {
        #[serde(default)]
        vpa: Option<String>,
    },
    Card {
        #[serde(default)]
        card_number: Option<String>,
        #[serde(default)]
        expiry_month: Option<String>,
        #[serde(default)]
        expiry_year: Option<String>,
        #[serde(default)]
        cvv: Option<String>,
    },
}

impl PaymentInstrument {
    pub fn method(&self) -> &'static str {
        match self {
            PaymentInstrument::Upi { .. } => "upi",
            PaymentInstrument::Card { .. } => "card",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentDefect {
    InvalidVpa,
    InvalidCardNumber,
    UnknownNetwork,
    InvalidExpiry,
    InvalidCvv,
    MalformedRow,
}

impl InstrumentDefect {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstrumentDefect::InvalidVpa => "invalid_vpa",
            InstrumentDefect::InvalidCardNumber => "invalid_card_number",
            InstrumentDefect::UnknownNetwork => "unknown_network",
            InstrumentDefect::InvalidExpiry => "invalid_expiry",
            InstrumentDefect::InvalidCvv => "invalid_cvv",
            InstrumentDefect::MalformedRow => "malformed_row",
        }
    }
}

/// Redacted outcome of checking one instrument. Holds no full PAN, CVV or VPA.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentReport {
    pub method: String,
    pub network: Option<CardNetwork>,
    pub last4: Option<String>,
    pub defects: Vec<InstrumentDefect>,
}

impl InstrumentReport {
    pub fn is_valid(&self) -> bool {
        self.defects.is_empty()
    }
}

/// One input row of a batch. `instrument` is `None` when the row could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentRecord {
    pub id: String,
    pub instrument: Option<PaymentInstrument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub id: String,
    pub method: String,
    pub valid: bool,
    pub network: Option<CardNetwork>,
    pub last4: Option<String>,
    pub defects: Vec<InstrumentDefect>,
}

impl ReportRow {
    pub fn from_report(id: String, report: InstrumentReport) -> Self {
        Self {
            id,
            valid: report.is_valid(),
            method: report.method,
            network: report.network,
            last4: report.last4,
            defects: report.defects,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchResult {
    pub rows: Vec<ReportRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub outputs: Vec<String>,
}
