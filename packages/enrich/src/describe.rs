//! Merchant details from a transaction description.
//!
//! Card statements print descriptions as `STORE NAME CITY PR`, where `PR` is
//! a two-letter province code. Online purchases (`@`), refunds, and
//! membership fees do not follow that shape, so their location is unknown.

use std::sync::LazyLock;

use regex::Regex;

/// Placeholder for a detail that cannot be derived.
pub const UNKNOWN: &str = "UNKNOWN";

/// Canadian province and territory codes.
pub const PROVINCES: [&str; 13] = [
    "AB", "BC", "MB", "NB", "NL", "NS", "NT", "NU", "ON", "PE", "QC", "SK", "YT",
];

static ASCII_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]+$").unwrap_or_else(|_| unreachable!()));

static STORE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^\d#,*/]+)").unwrap_or_else(|_| unreachable!()));

/// Location and store name derived from one description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merchant {
    pub province: String,
    pub city: String,
    pub store_name: String,
}

/// Derives merchant details from a trimmed description and its amount.
#[must_use]
pub fn describe(description: &str, amount: Option<f64>) -> Merchant {
    let description = description.trim();

    let has_at = description.contains('@');
    let is_refund = amount.is_some_and(|a| a < 0.0);
    let is_prime = description.contains("Prime Member");

    let province = if has_at || is_refund || is_prime {
        None
    } else {
        province_suffix(description)
    };

    let city = province.and_then(|_| {
        let words: Vec<&str> = description.split_whitespace().collect();
        words
            .len()
            .checked_sub(2)
            .map(|i| words[i])
            .filter(|word| ASCII_WORD_RE.is_match(word))
    });

    let store_name = if is_refund && !has_at {
        UNKNOWN.to_owned()
    } else {
        STORE_NAME_RE
            .captures(description)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().trim().to_owned())
            .unwrap_or_default()
    };

    Merchant {
        province: province.unwrap_or(UNKNOWN).to_owned(),
        city: city.unwrap_or(UNKNOWN).to_owned(),
        store_name,
    }
}

/// The description's last two characters, if they form a province code.
fn province_suffix(description: &str) -> Option<&'static str> {
    let tail: String = description
        .chars()
        .rev()
        .take(2)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    PROVINCES.iter().copied().find(|&code| code == tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_city_and_province() {
        let merchant = describe("WALMART TORONTO ON", Some(30.0));
        assert_eq!(
            merchant,
            Merchant {
                province: "ON".to_owned(),
                city: "TORONTO".to_owned(),
                store_name: "WALMART TORONTO ON".to_owned(),
            }
        );
    }

    #[test]
    fn store_name_stops_at_digits_and_symbols() {
        let merchant = describe("TIM HORTONS #2314 OTTAWA ON", Some(4.1));
        assert_eq!(merchant.store_name, "TIM HORTONS");
        assert_eq!(merchant.city, "OTTAWA");

        let merchant = describe("SQ *BAKERY MONTREAL QC", Some(9.0));
        assert_eq!(merchant.store_name, "SQ");
    }

    #[test]
    fn online_purchase_has_unknown_location() {
        let merchant = describe("@SOMETHING", Some(-10.0));
        assert_eq!(merchant.province, UNKNOWN);
        assert_eq!(merchant.city, UNKNOWN);
        assert_eq!(merchant.store_name, "@SOMETHING");

        let merchant = describe("SHOP@HOME VANCOUVER BC", Some(20.0));
        assert_eq!(merchant.province, UNKNOWN);
        assert_eq!(merchant.store_name, "SHOP@HOME VANCOUVER BC");
    }

    #[test]
    fn refunds_and_memberships_have_unknown_location() {
        let refund = describe("WALMART TORONTO ON", Some(-12.34));
        assert_eq!(refund.province, UNKNOWN);
        assert_eq!(refund.city, UNKNOWN);
        assert_eq!(refund.store_name, UNKNOWN);

        let prime = describe("Prime Member amazon.ca", Some(20.0));
        assert_eq!(prime.province, UNKNOWN);
        assert_eq!(prime.store_name, "Prime Member amazon.ca");
    }

    #[test]
    fn non_word_city_is_unknown() {
        let merchant = describe("PETRO-CANADA 905-555 ON", Some(50.0));
        assert_eq!(merchant.province, "ON");
        assert_eq!(merchant.city, UNKNOWN);

        let merchant = describe("ON", Some(1.0));
        assert_eq!(merchant.province, "ON");
        assert_eq!(merchant.city, UNKNOWN);
    }

    #[test]
    fn unknown_suffix_is_not_a_province() {
        let merchant = describe("NETFLIX.COM 866-579-7172 CA", Some(16.99));
        assert_eq!(merchant.province, UNKNOWN);
        assert_eq!(merchant.city, UNKNOWN);
        assert_eq!(merchant.store_name, "NETFLIX.COM");
    }
}
