//! Heuristic field extraction from free-text replies.
//!
//! Each line is scanned case-insensitively for a field label. The first
//! label found on a line claims it, and the value is whatever follows the
//! first colon. A field is filled by the first line that claims it; later
//! lines for the same field are ignored even when the first value was empty.

use crate::resolve::RequestFields;
use regex::Regex;
use std::sync::LazyLock;

static QUANTITY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d[\d,]*)(?:\.(\d+))?\s*(billion|million)\b").expect("Invalid quantity regex")
});

/// One of the four extractable token fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Symbol,
    Supply,
    Owner,
}

impl Field {
    /// Label used in prompts and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Token Name",
            Field::Symbol => "Token Symbol",
            Field::Supply => "Total Supply",
            Field::Owner => "Owner Address",
        }
    }

    /// The field a lowercased line is about, in label priority order.
    fn classify(lower: &str) -> Option<Field> {
        if lower.contains("token name") {
            Some(Field::Name)
        } else if lower.contains("token symbol") {
            Some(Field::Symbol)
        } else if lower.contains("total supply") || lower.contains("initial supply") {
            Some(Field::Supply)
        } else if lower.contains("owner address") {
            Some(Field::Owner)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Fields recovered from a block of text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    pub name: String,
    pub symbol: String,
    /// Zero when absent or unparseable.
    pub initial_supply: u64,
    pub owner_address: String,
    claimed: Claimed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Claimed {
    name: bool,
    symbol: bool,
    supply: bool,
    owner: bool,
}

impl Claimed {
    /// Mark `field` as claimed; false if a previous line already claimed it.
    fn claim(&mut self, field: Field) -> bool {
        let flag = match field {
            Field::Name => &mut self.name,
            Field::Symbol => &mut self.symbol,
            Field::Supply => &mut self.supply,
            Field::Owner => &mut self.owner,
        };
        !std::mem::replace(flag, true)
    }
}

impl ExtractedFields {
    /// Required fields that are still empty, in label order.
    pub fn missing_fields(&self) -> Vec<Field> {
        let mut missing = Vec::new();
        if self.name.is_empty() {
            missing.push(Field::Name);
        }
        if self.symbol.is_empty() {
            missing.push(Field::Symbol);
        }
        if self.initial_supply == 0 {
            missing.push(Field::Supply);
        }
        missing
    }

    /// Whether name, symbol and supply are all present.
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Convert to request arguments, or `None` when a required field is missing.
    pub fn into_request_fields(self) -> Option<RequestFields> {
        if !self.is_complete() {
            return None;
        }
        Some(RequestFields {
            name: Some(self.name),
            symbol: Some(self.symbol),
            initial_supply: Some(self.initial_supply),
            owner_address: Some(self.owner_address).filter(|o| !o.is_empty()),
        })
    }
}

/// Scan `text` line by line for token fields.
pub fn extract_fields(text: &str) -> ExtractedFields {
    let mut fields = ExtractedFields::default();

    for line in text.lines() {
        let Some(field) = Field::classify(&line.to_lowercase()) else {
            continue;
        };
        if !fields.claimed.claim(field) {
            continue;
        }

        let value = line
            .split_once(':')
            .map(|(_, value)| value.trim())
            .unwrap_or("");

        match field {
            Field::Name => fields.name = value.to_string(),
            Field::Symbol => fields.symbol = value.to_string(),
            Field::Supply => fields.initial_supply = parse_supply(value).unwrap_or(0),
            Field::Owner => fields.owner_address = value.to_string(),
        }
    }

    fields
}

/// Parse a human-written supply such as `500000`, `1,000,000` or `2.5 million`.
///
/// A number directly followed by a quantity word is scaled by it; the first
/// such pair wins. A quantity word with no number in front counts as one unit
/// of it. Without a quantity word every non-digit is stripped.
pub fn parse_supply(text: &str) -> Option<u64> {
    let lower = text.to_lowercase();

    if let Some(caps) = QUANTITY_REGEX.captures(&lower) {
        let multiplier = quantity_multiplier(&caps[3]);
        return scale_quantity(&caps[1], caps.get(2).map(|m| m.as_str()), multiplier);
    }

    if lower.contains("billion") {
        Some(1_000_000_000)
    } else if lower.contains("million") {
        Some(1_000_000)
    } else {
        let digits: String = lower.chars().filter(|c| c.is_ascii_digit()).collect();
        digits.parse::<u64>().ok().filter(|n| *n > 0)
    }
}

fn quantity_multiplier(word: &str) -> u64 {
    if word == "billion" {
        1_000_000_000
    } else {
        1_000_000
    }
}

/// `whole.fraction * multiplier`, rejecting fractions finer than one token.
fn scale_quantity(whole: &str, fraction: Option<&str>, multiplier: u64) -> Option<u64> {
    let whole: u64 = whole.replace(',', "").parse().ok()?;
    let mut total = whole.checked_mul(multiplier)?;

    if let Some(digits) = fraction {
        let scale = 10u64.checked_pow(u32::try_from(digits.len()).ok()?)?;
        let numerator: u64 = digits.parse().ok()?;
        let scaled = numerator.checked_mul(multiplier)?;
        if scaled % scale != 0 {
            return None;
        }
        total = total.checked_add(scaled / scale)?;
    }

    Some(total).filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_all_four_fields() {
        let fields = extract_fields(
            "Token Name: Acme\nToken Symbol: ACM\nTotal Supply: 1 billion\nOwner Address: 0xabc",
        );

        assert_eq!(fields.name, "Acme");
        assert_eq!(fields.symbol, "ACM");
        assert_eq!(fields.initial_supply, 1_000_000_000);
        assert_eq!(fields.owner_address, "0xabc");
        assert!(fields.is_complete());
    }

    #[test]
    fn test_million_scales_leading_number() {
        let fields = extract_fields("Total Supply: 2 million");
        assert_eq!(fields.initial_supply, 2_000_000);
    }

    #[test]
    fn test_parse_supply_variants() {
        assert_eq!(parse_supply("1 billion"), Some(1_000_000_000));
        assert_eq!(parse_supply("million"), Some(1_000_000));
        assert_eq!(parse_supply("2.5 Million tokens"), Some(2_500_000));
        assert_eq!(parse_supply("1,000,000"), Some(1_000_000));
        assert_eq!(parse_supply("500000 MTK"), Some(500_000));
        assert_eq!(parse_supply("lots"), None);
        assert_eq!(parse_supply("0"), None);
        assert_eq!(parse_supply(""), None);
    }

    #[test]
    fn test_quantity_pairs_with_adjacent_number() {
        assert_eq!(parse_supply("100 million (0.1 billion)"), Some(100_000_000));
        assert_eq!(parse_supply("0.1 billion, i.e. 100 million"), Some(100_000_000));
        assert_eq!(parse_supply("3million"), Some(3_000_000));
    }

    #[test]
    fn test_stray_digits_do_not_scale_quantity_word() {
        assert_eq!(parse_supply("10^9, i.e. one billion"), Some(1_000_000_000));
        assert_eq!(parse_supply("phase 2: a million"), Some(1_000_000));
    }

    #[test]
    fn test_labels_are_case_insensitive() {
        let fields = extract_fields("TOKEN NAME: Shout\ntoken symbol: shh\ninitial supply: 42");
        assert_eq!(fields.name, "Shout");
        assert_eq!(fields.symbol, "shh");
        assert_eq!(fields.initial_supply, 42);
    }

    #[test]
    fn test_first_line_for_a_field_wins() {
        let fields = extract_fields("Token Name: First\nToken Name: Second");
        assert_eq!(fields.name, "First");
    }

    #[test]
    fn test_empty_first_value_is_not_revisited() {
        let fields = extract_fields("Token Symbol:\nToken Symbol: LATE");
        assert_eq!(fields.symbol, "");
        assert_eq!(fields.missing_fields(), vec![Field::Name, Field::Symbol, Field::Supply]);
    }

    #[test]
    fn test_line_without_colon_claims_with_empty_value() {
        let fields = extract_fields("the token name is Acme\nToken Name: Acme");
        assert_eq!(fields.name, "");
    }

    #[test]
    fn test_line_is_claimed_by_highest_priority_label() {
        // Mentions both the name and symbol labels; only the name is set.
        let fields = extract_fields("Token Name and Token Symbol: Combo");
        assert_eq!(fields.name, "Combo");
        assert_eq!(fields.symbol, "");
    }

    #[test]
    fn test_value_keeps_text_after_first_colon() {
        let fields = extract_fields("Token Name: Acme: Reloaded");
        assert_eq!(fields.name, "Acme: Reloaded");
    }

    #[test]
    fn test_missing_symbol_is_incomplete() {
        let fields = extract_fields("Token Name: Acme\nTotal Supply: 1000");
        assert_eq!(fields.missing_fields(), vec![Field::Symbol]);
        assert!(fields.into_request_fields().is_none());
    }

    #[test]
    fn test_into_request_fields_drops_empty_owner() {
        let request = extract_fields("Token Name: Acme\nToken Symbol: ACM\nTotal Supply: 10")
            .into_request_fields()
            .unwrap();

        assert_eq!(request.name.as_deref(), Some("Acme"));
        assert_eq!(request.initial_supply, Some(10));
        assert!(request.owner_address.is_none());
    }

    #[test]
    fn test_unrelated_lines_are_ignored() {
        let fields = extract_fields("Hello!\n\nPlease deploy soon.\n");
        assert_eq!(fields, ExtractedFields::default());
    }
}
