//! Fixed vocabulary and regex patterns of the purchase-order template.

use lazy_static::lazy_static;
use regex::Regex;

/// Cell text that ends the header region and starts the line-item table.
pub const BOUNDARY_MARKER: &str = "ORDER DETAILS";

/// Cell text that ends the product rows and starts the footer.
pub const TRUNCATION_MARKER: &str = "Important Notification";

/// Footer label followed by the total quantity.
pub const TOTAL_QUANTITY_MARKER: &str = "Total Quantity=";

/// Footer label followed by the total amount.
pub const TOTAL_AMOUNT_MARKER: &str = "Total=";

/// The only accepted order-date layout (DD-MM-YY).
pub const ORDER_DATE_FORMAT: &str = "%d-%m-%y";

/// States and union territories, in match-priority order.
pub const REGIONS: [&str; 36] = [
    "Andhra Pradesh",
    "Arunachal Pradesh",
    "Assam",
    "Bihar",
    "Chhattisgarh",
    "Goa",
    "Gujarat",
    "Haryana",
    "Himachal Pradesh",
    "Jharkhand",
    "Karnataka",
    "Kerala",
    "Madhya Pradesh",
    "Maharashtra",
    "Manipur",
    "Meghalaya",
    "Mizoram",
    "Nagaland",
    "Odisha",
    "Punjab",
    "Rajasthan",
    "Sikkim",
    "Tamil Nadu",
    "Telangana",
    "Tripura",
    "Uttar Pradesh",
    "Uttarakhand",
    "West Bengal",
    "Delhi",
    "Puducherry",
    "Jammu and Kashmir",
    "Ladakh",
    "Andaman and Nicobar Islands",
    "Chandigarh",
    "Dadra and Nagar Haveli and Daman and Diu",
    "Lakshadweep",
];

lazy_static! {
    // Six-digit PIN code
    pub static ref POSTAL_CODE: Regex = Regex::new(
        r"\b\d{6}\b"
    ).unwrap();

    // Whole-word, case-insensitive region matchers, same order as REGIONS
    pub static ref REGION_PATTERNS: Vec<(&'static str, Regex)> = REGIONS
        .iter()
        .map(|name| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(name));
            (*name, Regex::new(&pattern).unwrap())
        })
        .collect();

    // Address cleanup
    pub static ref MULTI_WHITESPACE: Regex = Regex::new(
        r"\s{2,}"
    ).unwrap();

    pub static ref REPEATED_COMMA: Regex = Regex::new(
        r",(?:\s*,)+"
    ).unwrap();

    pub static ref TRAILING_COMMA: Regex = Regex::new(
        r",\s*$"
    ).unwrap();

    pub static ref GSTIN_LABEL: Regex = Regex::new(
        r"(?i)\bGSTIN NO:\s*"
    ).unwrap();
}
