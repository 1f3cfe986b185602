//! Card network classification by issuer prefix.
//!
//! Rules are checked top to bottom and the first matching prefix wins, so a
//! number starting with `4` is always Visa even if a later rule would match.

use crate::domain::model::CardNetwork;

// 不會被正規化移除的換行字元 (NEL, LS, PS)
const LINE_TERMINATORS: [char; 3] = ['\u{85}', '\u{2028}', '\u{2029}'];

struct NetworkRule {
    network: CardNetwork,
    prefixes: &'static [&'static str],
    /// When false, the rest of the number must stay on one line.
    any_tail: bool,
}

const NETWORK_RULES: &[NetworkRule] = &[
    NetworkRule {
        network: CardNetwork::Visa,
        prefixes: &["4"],
        any_tail: true,
    },
    NetworkRule {
        network: CardNetwork::Mastercard,
        prefixes: &["51", "52", "53", "54", "55", "22", "23", "24", "25", "26", "27"],
        any_tail: false,
    },
    NetworkRule {
        network: CardNetwork::Amex,
        prefixes: &["34", "37"],
        any_tail: false,
    },
    NetworkRule {
        network: CardNetwork::Rupay,
        prefixes: &["6", "81", "82", "508", "353", "356"],
        any_tail: false,
    },
];

impl NetworkRule {
    fn matches(&self, cleaned: &str) -> bool {
        self.prefixes.iter().any(|prefix| match cleaned.strip_prefix(prefix) {
            Some(tail) => self.any_tail || !tail.contains(&LINE_TERMINATORS[..]),
            None => false,
        })
    }
}

/// Classifies an already-normalized card number. Empty input is `Unknown`.
pub fn classify(cleaned: &str) -> CardNetwork {
    NETWORK_RULES
        .iter()
        .find(|rule| rule.matches(cleaned))
        .map(|rule| rule.network)
        .unwrap_or(CardNetwork::Unknown)
}
