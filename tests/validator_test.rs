use instrument_check::{
    card_last4, detect_card_network, is_valid_card_number, is_valid_cvv, is_valid_expiry,
    is_valid_expiry_at, is_valid_vpa, normalize_card_number, CardNetwork, Clock, FixedClock,
    InstrumentDefect, InstrumentValidator, PaymentInstrument, SystemClock, YearMonth,
};

const KNOWN_GOOD: [&str; 5] = [
    "4111111111111111",
    "5500000000000004",
    "340000000000009",
    "6011000000000004",
    "4012888888881881",
];

#[test]
fn test_well_known_numbers() {
    assert!(is_valid_card_number("4111111111111111"));
    assert!(!is_valid_card_number("4111111111111112"));

    assert_eq!(detect_card_network("4111111111111111"), CardNetwork::Visa);
    assert_eq!(detect_card_network("5500000000000004"), CardNetwork::Mastercard);
    assert_eq!(detect_card_network("340000000000009"), CardNetwork::Amex);
    assert_eq!(detect_card_network("6011000000000004"), CardNetwork::Rupay);
    assert_eq!(detect_card_network("1234567890123"), CardNetwork::Unknown);
}

#[test]
fn test_single_digit_typos_are_caught() {
    for number in KNOWN_GOOD {
        assert!(is_valid_card_number(number), "{} should pass", number);

        for position in 0..number.len() {
            let original = number.as_bytes()[position];
            for replacement in b'0'..=b'9' {
                if replacement == original {
                    continue;
                }
                let mut typo = number.as_bytes().to_vec();
                typo[position] = replacement;
                let typo = String::from_utf8(typo).unwrap();
                assert!(!is_valid_card_number(&typo), "{} should fail", typo);
            }
        }
    }
}

#[test]
fn test_luhn_misses_09_transposition() {
    // 9 doubles to 9, so swapping adjacent 0 and 9 keeps the checksum
    assert!(is_valid_card_number("4000000000000903"));
    assert!(is_valid_card_number("4000000000000093"));
}

#[test]
fn test_length_bounds() {
    // 13 and 19 digit numbers with valid check digits
    assert!(is_valid_card_number("4222222222222"));
    assert!(is_valid_card_number("4000000000000000006"));
    assert!(!is_valid_card_number("40000000000000000006"));
}

#[test]
fn test_vpa_examples() {
    assert!(is_valid_vpa("user.name_1@upi"));
    assert!(!is_valid_vpa("bad@@upi"));
    assert!(!is_valid_vpa(""));
    assert!(!is_valid_vpa(" "));
    assert!(!is_valid_vpa("name@bank.upi"));
}

#[test]
fn test_expiry_examples() {
    let now = YearMonth::new(2025, 6).unwrap();
    assert!(!is_valid_expiry_at("13", "25", now));
    assert!(!is_valid_expiry_at("01", "20", now));
    assert!(is_valid_expiry_at("12", "2099", now));
}

#[test]
fn test_expiry_current_month_with_system_clock() {
    let now = SystemClock.current_year_month();
    let month = now.month.to_string();
    let year = now.year.to_string();
    assert!(is_valid_expiry(&month, &year, &SystemClock));

    let two_digit_year = format!("{:02}", now.year % 100);
    assert!(is_valid_expiry(&month, &two_digit_year, &SystemClock));
}

#[test]
fn test_last4_examples() {
    assert_eq!(card_last4("4111 1111 1111 1111").as_deref(), Some("1111"));
    assert_eq!(card_last4("12").as_deref(), Some("12"));
    assert_eq!(card_last4(""), None);
    assert_eq!(card_last4(" - ").as_deref(), Some(""));
}

#[test]
fn test_cvv_examples() {
    assert!(is_valid_cvv("123", CardNetwork::Visa));
    assert!(!is_valid_cvv("123", CardNetwork::Amex));
    assert!(is_valid_cvv("1234", CardNetwork::Amex));
    assert!(!is_valid_cvv("12a", CardNetwork::Visa));
    assert!(is_valid_cvv("123", CardNetwork::from_tag("rupay")));
    assert!(is_valid_cvv("1234", CardNetwork::from_tag("amex")));
}

#[test]
fn test_normalization_is_idempotent() {
    for input in ["4111 1111 1111 1111", "4111-1111-1111-1111", " -4- ", "12"] {
        let once = normalize_card_number(input);
        let twice = normalize_card_number(&once);
        assert_eq!(once, twice);

        assert_eq!(is_valid_card_number(input), is_valid_card_number(&once));
        assert_eq!(detect_card_network(input), detect_card_network(&once));
        assert_eq!(card_last4(input), card_last4(&once));
    }
}

#[test]
fn test_validator_check_with_pinned_clock() {
    let validator = InstrumentValidator::new(FixedClock(YearMonth::new(2030, 1).unwrap()));

    let amex = PaymentInstrument::Card {
        card_number: Some("3400-000000-00009".to_string()),
        expiry_month: Some("01".to_string()),
        expiry_year: Some("30".to_string()),
        cvv: Some("1234".to_string()),
    };
    let report = validator.check(&amex);
    assert!(report.is_valid());
    assert_eq!(report.network, Some(CardNetwork::Amex));
    assert_eq!(report.last4.as_deref(), Some("0009"));

    let expired = PaymentInstrument::Card {
        card_number: Some("4111111111111111".to_string()),
        expiry_month: Some("12".to_string()),
        expiry_year: Some("29".to_string()),
        cvv: Some("123".to_string()),
    };
    assert_eq!(
        validator.check(&expired).defects,
        vec![InstrumentDefect::InvalidExpiry]
    );

    let empty = PaymentInstrument::Card {
        card_number: None,
        expiry_month: None,
        expiry_year: None,
        cvv: None,
    };
    let report = validator.check(&empty);
    assert_eq!(report.last4, None);
    assert_eq!(
        report.defects,
        vec![
            InstrumentDefect::InvalidCardNumber,
            InstrumentDefect::InvalidExpiry,
            InstrumentDefect::InvalidCvv,
        ]
    );
}

#[test]
fn test_validator_is_shareable_across_threads() {
    let validator = std::sync::Arc::new(InstrumentValidator::new(FixedClock(
        YearMonth::new(2025, 6).unwrap(),
    )));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let validator = validator.clone();
            std::thread::spawn(move || {
                KNOWN_GOOD
                    .iter()
                    .all(|number| validator.is_valid_card_number(number))
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
