//! Payment instrument validation.
//!
//! Every check degrades to a negative answer (`false`, `CardNetwork::Unknown`
//! or `None`) on malformed input. Nothing here logs or stores instrument data.

use crate::core::network;
use crate::domain::model::{
    CardNetwork, InstrumentDefect, InstrumentReport, PaymentInstrument, YearMonth,
};
use crate::domain::ports::{Clock, SystemClock};
use once_cell::sync::Lazy;
use regex::Regex;

const MIN_CARD_DIGITS: usize = 13;
const MAX_CARD_DIGITS: usize = 19;

// 可表示的年份範圍
const MIN_YEAR: i64 = -999_999_999;
const MAX_YEAR: i64 = 999_999_999;

static VPA_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\A[A-Za-z0-9._-]{2,256}@[A-Za-z]{2,64}\z").expect("VPA pattern is valid")
});

fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\u{0B}' | '\u{0C}' | '\r' | '-')
}

/// Removes whitespace and hyphens from a card number.
pub fn normalize_card_number(card_number: &str) -> String {
    card_number.chars().filter(|&c| !is_separator(c)).collect()
}

fn all_ascii_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Checks UPI virtual payment address syntax: `local@handle`.
pub fn is_valid_vpa(vpa: &str) -> bool {
    // trim control characters and spaces only
    let trimmed = vpa.trim_matches(|c: char| c <= ' ');
    if trimmed.is_empty() {
        return false;
    }
    VPA_PATTERN.is_match(trimmed)
}

/// Length check (13–19 digits) followed by the Luhn mod-10 checksum.
pub fn is_valid_card_number(card_number: &str) -> bool {
    let cleaned = normalize_card_number(card_number);

    if !all_ascii_digits(&cleaned) {
        return false;
    }

    if cleaned.len() < MIN_CARD_DIGITS || cleaned.len() > MAX_CARD_DIGITS {
        return false;
    }

    luhn_checksum(&cleaned) % 10 == 0
}

fn luhn_checksum(digits: &str) -> u32 {
    digits
        .bytes()
        .rev()
        .map(|b| u32::from(b - b'0'))
        .enumerate()
        .map(|(i, d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum()
}

/// Classifies the issuing network from the number's prefix.
///
/// Does not check length or checksum; pair with [`is_valid_card_number`].
pub fn detect_card_network(card_number: &str) -> CardNetwork {
    network::classify(&normalize_card_number(card_number))
}

/// Expiry check against a fixed reference month.
///
/// Two-digit years (anything below 100) are read as 20xx. A card is still
/// valid during its expiry month.
pub fn is_valid_expiry_at(month: &str, year: &str, reference: YearMonth) -> bool {
    let (Ok(month), Ok(year)) = (month.parse::<i32>(), year.parse::<i32>()) else {
        return false;
    };

    if !(1..=12).contains(&month) {
        return false;
    }

    let mut year = i64::from(year);
    if year < 100 {
        year += 2000;
    }
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return false;
    }

    let Some(expiry) = YearMonth::new(year, month as u32) else {
        return false;
    };
    expiry >= reference
}

pub fn is_valid_expiry<C: Clock>(month: &str, year: &str, clock: &C) -> bool {
    is_valid_expiry_at(month, year, clock.current_year_month())
}

/// Last four digits for display. Shorter numbers come back whole, so input
/// made only of separators yields an empty string rather than `None`.
pub fn card_last4(card_number: &str) -> Option<String> {
    if card_number.is_empty() {
        return None;
    }
    let cleaned = normalize_card_number(card_number);

    let count = cleaned.chars().count();
    if count < 4 {
        return Some(cleaned);
    }
    Some(cleaned.chars().skip(count - 4).collect())
}

/// Amex CVVs are 4 digits, every other network uses 3.
pub fn is_valid_cvv(cvv: &str, network: CardNetwork) -> bool {
    if !all_ascii_digits(cvv) {
        return false;
    }

    match network {
        CardNetwork::Amex => cvv.len() == 4,
        _ => cvv.len() == 3,
    }
}

/// Validator bound to a clock, plus the combined per-instrument check.
#[derive(Debug, Clone, Default)]
pub struct InstrumentValidator<C: Clock = SystemClock> {
    clock: C,
}

impl<C: Clock> InstrumentValidator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    pub fn is_valid_vpa(&self, vpa: &str) -> bool {
        is_valid_vpa(vpa)
    }

    pub fn is_valid_card_number(&self, card_number: &str) -> bool {
        is_valid_card_number(card_number)
    }

    pub fn detect_card_network(&self, card_number: &str) -> CardNetwork {
        detect_card_network(card_number)
    }

    pub fn is_valid_expiry(&self, month: &str, year: &str) -> bool {
        is_valid_expiry(month, year, &self.clock)
    }

    pub fn card_last4(&self, card_number: &str) -> Option<String> {
        card_last4(card_number)
    }

    pub fn is_valid_cvv(&self, cvv: &str, network: CardNetwork) -> bool {
        is_valid_cvv(cvv, network)
    }

    /// Runs every applicable check and collects all defects found.
    pub fn check(&self, instrument: &PaymentInstrument) -> InstrumentReport {
        match instrument {
            PaymentInstrument::Upi { vpa } => {
                let mut defects = Vec::new();
                if !self.is_valid_vpa(vpa.as_deref().unwrap_or_default()) {
                    defects.push(InstrumentDefect::InvalidVpa);
                }
                InstrumentReport {
                    method: instrument.method().to_string(),
                    network: None,
                    last4: None,
                    defects,
                }
            }
            PaymentInstrument::Card {
                card_number,
                expiry_month,
                expiry_year,
                cvv,
            } => {
                let number = card_number.as_deref().unwrap_or_default();
                let network = self.detect_card_network(number);
                let mut defects = Vec::new();

                if !self.is_valid_card_number(number) {
                    defects.push(InstrumentDefect::InvalidCardNumber);
                } else if network == CardNetwork::Unknown {
                    defects.push(InstrumentDefect::UnknownNetwork);
                }

                if !self.is_valid_expiry(
                    expiry_month.as_deref().unwrap_or_default(),
                    expiry_year.as_deref().unwrap_or_default(),
                ) {
                    defects.push(InstrumentDefect::InvalidExpiry);
                }

                if !self.is_valid_cvv(cvv.as_deref().unwrap_or_default(), network) {
                    defects.push(InstrumentDefect::InvalidCvv);
                }

                InstrumentReport {
                    method: instrument.method().to_string(),
                    network: Some(network),
                    last4: self.card_last4(number),
                    defects,
                }
            }
        }
    }
}
