//! Free-text address normalization for Indian addresses.

use regex::Regex;
use tracing::debug;

use crate::models::{HeaderField, HeaderFields, NormalizedAddress};

use super::patterns::{
    GSTIN_LABEL, MULTI_WHITESPACE, POSTAL_CODE, REGION_PATTERNS, REPEATED_COMMA, TRAILING_COMMA,
};

/// The three addresses printed on a purchase order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderAddresses {
    /// `BILLED TO ADDRESS`, used for invoicing.
    pub billed_to: NormalizedAddress,
    /// `SHIPPED TO ADDRESS`, used for delivery.
    pub shipped_to: NormalizedAddress,
    /// `SUPPLIER ADDRESS`, used for the delivery point.
    pub supplier: NormalizedAddress,
}

impl OrderAddresses {
    /// Normalize all three addresses from the scanned header fields.
    pub fn from_fields(fields: &HeaderFields) -> Self {
        let normalize_field = |field: HeaderField| {
            let raw = fields.text(field);
            normalize_address(raw.as_deref())
        };

        Self {
            billed_to: normalize_field(HeaderField::BilledToAddress),
            shipped_to: normalize_field(HeaderField::ShippedToAddress),
            supplier: normalize_field(HeaderField::SupplierAddress),
        }
    }
}

/// Split a raw address into cleaned text, PIN code and state.
///
/// The PIN code is the first six-digit token. The state is the first entry of
/// [`super::patterns::REGIONS`] that occurs as a whole word, so list order decides
/// between two states even when the later-listed one appears first in the text.
pub fn normalize_address(raw: Option<&str>) -> NormalizedAddress {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return NormalizedAddress::default();
    };

    let postal_code = POSTAL_CODE.find(raw).map(|m| m.as_str().to_string());

    let region = REGION_PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(raw));

    let mut text = raw.to_string();

    if let Some(code) = &postal_code {
        text = strip_from_first(&text, &POSTAL_CODE, |found| found == code.as_str());
    }

    if let Some((_, pattern)) = region {
        text = strip_from_first(&text, pattern, |_| true);
    }

    let address = clean_up(&text);
    let region = region.map(|(name, _)| name.to_string());

    debug!(
        "Normalized address: postal code {:?}, region {:?}",
        postal_code, region
    );

    NormalizedAddress {
        address,
        postal_code,
        region,
    }
}

/// Remove every accepted match from the first accepted one onward.
///
/// Text before the first accepted match is left untouched.
fn strip_from_first(text: &str, pattern: &Regex, accept: impl Fn(&str) -> bool) -> String {
    let Some(first) = pattern.find_iter(text).find(|m| accept(m.as_str())) else {
        return text.to_string();
    };

    let (head, tail) = text.split_at(first.start());
    let stripped = pattern.replace_all(tail, |caps: &regex::Captures| {
        if accept(&caps[0]) {
            String::new()
        } else {
            caps[0].to_string()
        }
    });

    format!("{}{}", head, stripped)
}

fn clean_up(text: &str) -> String {
    let cleaned = MULTI_WHITESPACE.replace_all(text, " ");
    let cleaned = cleaned.trim();
    let cleaned = REPEATED_COMMA.replace_all(cleaned, ",");
    let cleaned = cleaned.trim();
    let cleaned = TRAILING_COMMA.replace(cleaned, "");
    let cleaned = cleaned.trim();
    let cleaned = GSTIN_LABEL.replace_all(cleaned, "");
    cleaned.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Cell;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_full_address() {
        let result = normalize_address(Some(
            "123 MG Road, Bangalore, Karnataka 560001, GSTIN No: 29ABCDE1234F1Z5",
        ));

        assert_eq!(result.postal_code.as_deref(), Some("560001"));
        assert_eq!(result.region.as_deref(), Some("Karnataka"));
        assert_eq!(result.address, "123 MG Road, Bangalore, 29ABCDE1234F1Z5");
    }

    #[test]
    fn test_absent_and_empty() {
        assert_eq!(normalize_address(None), NormalizedAddress::default());
        assert_eq!(normalize_address(Some("")), NormalizedAddress::default());
    }

    #[test]
    fn test_idempotent_without_code_or_region() {
        let text = "12 Park Street, Kolkata";
        let result = normalize_address(Some(text));

        assert_eq!(result.address, text);
        assert_eq!(result.postal_code, None);
        assert_eq!(result.region, None);

        let again = normalize_address(Some(&result.address));
        assert_eq!(again, result);
    }

    #[test]
    fn test_region_list_order_beats_text_order() {
        // Kerala comes first in the text, but Goa is listed first.
        let result = normalize_address(Some("Kerala Bhawan, Panaji, Goa 403001"));

        assert_eq!(result.region.as_deref(), Some("Goa"));
        assert_eq!(result.address, "Kerala Bhawan, Panaji");
    }

    #[test]
    fn test_region_is_case_insensitive_and_whole_word() {
        let result = normalize_address(Some("Plot 4, Sector 5, GURUGRAM, HARYANA 122001"));
        assert_eq!(result.region.as_deref(), Some("Haryana"));
        assert_eq!(result.address, "Plot 4, Sector 5, GURUGRAM");

        let result = normalize_address(Some("Goanagar Colony"));
        assert_eq!(result.region, None);
    }

    #[test]
    fn test_only_six_digit_tokens_are_postal_codes() {
        let result = normalize_address(Some("Unit 1234567, Phase 2, 400001 Mumbai"));
        assert_eq!(result.postal_code.as_deref(), Some("400001"));
        assert_eq!(result.address, "Unit 1234567, Phase 2, Mumbai");
    }

    #[test]
    fn test_every_occurrence_from_first_is_removed() {
        let result = normalize_address(Some("Door 110001-A, Delhi 110001, 110001"));
        assert_eq!(result.postal_code.as_deref(), Some("110001"));
        assert_eq!(result.region.as_deref(), Some("Delhi"));
        assert_eq!(result.address, "Door -A");
    }

    #[test]
    fn test_cleanup_rules() {
        assert_eq!(clean_up("A,  ,, B ,"), "A, B");
        assert_eq!(clean_up("Warehouse 3, gstin no:  07AAACB1234C1Z9"), "Warehouse 3, 07AAACB1234C1Z9");
    }

    #[test]
    fn test_addresses_from_fields() {
        let mut fields = HeaderFields::new();
        fields.set(
            HeaderField::ShippedToAddress,
            Some(Cell::from("FC Warehouse, Bhiwandi, Maharashtra 421302")),
        );

        let addresses = OrderAddresses::from_fields(&fields);
        assert_eq!(addresses.shipped_to.region.as_deref(), Some("Maharashtra"));
        assert_eq!(addresses.shipped_to.postal_code.as_deref(), Some("421302"));
        assert_eq!(addresses.shipped_to.address, "FC Warehouse, Bhiwandi");
        assert!(addresses.billed_to.is_empty());
    }
}
