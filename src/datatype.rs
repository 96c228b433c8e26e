//! Value datatypes for string-encoded model values.
//!
//! Every value in the model tree is stored string-encoded so that schema
//! datatype changes never lose data; the datatype supplies parsing,
//! ordering, and numeric semantics on demand at validation time.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Date format used for string-encoded `Date` values.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// The scalar datatypes an enum attribute can declare.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueDatatype {
    String,
    Integer,
    Decimal,
    /// Decimal amount followed by a currency code, e.g. `"10.00 EUR"`.
    Money,
    Boolean,
    /// ISO date, e.g. `"2025-01-31"`.
    Date,
}

/// Raised when a persisted datatype token is not recognized.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown datatype token '{0}'")]
pub struct UnknownDatatypeError(pub String);

impl ValueDatatype {
    /// Stable token used in persisted XML.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueDatatype::String => "String",
            ValueDatatype::Integer => "Integer",
            ValueDatatype::Decimal => "Decimal",
            ValueDatatype::Money => "Money",
            ValueDatatype::Boolean => "Boolean",
            ValueDatatype::Date => "Date",
        }
    }

    /// True if `value` is a legal string encoding for this datatype.
    pub fn is_parsable(&self, value: &str) -> bool {
        match self {
            ValueDatatype::String => true,
            ValueDatatype::Integer => value.parse::<i64>().is_ok(),
            ValueDatatype::Decimal => value.parse::<Decimal>().is_ok(),
            ValueDatatype::Money => parse_money(value).is_some(),
            ValueDatatype::Boolean => value == "true" || value == "false",
            ValueDatatype::Date => NaiveDate::parse_from_str(value, DATE_FORMAT).is_ok(),
        }
    }

    /// Datatypes with additive numeric semantics (range steps apply).
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ValueDatatype::Integer | ValueDatatype::Decimal | ValueDatatype::Money
        )
    }

    /// Compare two encoded values. `None` if either side is unparsable or
    /// the values are incomparable (money in different currencies).
    pub fn compare(&self, a: &str, b: &str) -> Option<Ordering> {
        match self {
            ValueDatatype::String => Some(a.cmp(b)),
            ValueDatatype::Integer => {
                Some(a.parse::<i64>().ok()?.cmp(&b.parse::<i64>().ok()?))
            }
            ValueDatatype::Decimal => {
                Some(a.parse::<Decimal>().ok()?.cmp(&b.parse::<Decimal>().ok()?))
            }
            ValueDatatype::Money => {
                let (amount_a, currency_a) = parse_money(a)?;
                let (amount_b, currency_b) = parse_money(b)?;
                if currency_a != currency_b {
                    return None;
                }
                Some(amount_a.cmp(&amount_b))
            }
            ValueDatatype::Boolean => {
                let a = match a {
                    "true" => true,
                    "false" => false,
                    _ => return None,
                };
                let b = match b {
                    "true" => true,
                    "false" => false,
                    _ => return None,
                };
                Some(a.cmp(&b))
            }
            ValueDatatype::Date => {
                let a = NaiveDate::parse_from_str(a, DATE_FORMAT).ok()?;
                let b = NaiveDate::parse_from_str(b, DATE_FORMAT).ok()?;
                Some(a.cmp(&b))
            }
        }
    }

    /// True if the encoded values are equal under this datatype. Unparsable
    /// values fall back to plain string equality so stale data still
    /// deduplicates predictably.
    pub fn values_equal(&self, a: &str, b: &str) -> bool {
        match self.compare(a, b) {
            Some(ordering) => ordering == Ordering::Equal,
            None => a == b,
        }
    }

    /// Numeric projection used for range arithmetic. `None` for
    /// non-numeric datatypes and unparsable values. Money projects to its
    /// amount; currency agreement is the caller's concern via [`compare`].
    ///
    /// [`compare`]: ValueDatatype::compare
    pub fn as_decimal(&self, value: &str) -> Option<Decimal> {
        match self {
            ValueDatatype::Integer => Some(Decimal::from(value.parse::<i64>().ok()?)),
            ValueDatatype::Decimal => value.parse::<Decimal>().ok(),
            ValueDatatype::Money => Some(parse_money(value)?.0),
            _ => None,
        }
    }

    /// `a - b` as a decimal, `None` when the subtraction has no numeric
    /// meaning for this datatype (unparsable, non-numeric, or money in
    /// different currencies).
    pub fn difference(&self, a: &str, b: &str) -> Option<Decimal> {
        if *self == ValueDatatype::Money {
            let (amount_a, currency_a) = parse_money(a)?;
            let (amount_b, currency_b) = parse_money(b)?;
            if currency_a != currency_b {
                return None;
            }
            return amount_a.checked_sub(amount_b);
        }
        self.as_decimal(a)?.checked_sub(self.as_decimal(b)?)
    }
}

impl fmt::Display for ValueDatatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueDatatype {
    type Err = UnknownDatatypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "String" => Ok(ValueDatatype::String),
            "Integer" => Ok(ValueDatatype::Integer),
            "Decimal" => Ok(ValueDatatype::Decimal),
            "Money" => Ok(ValueDatatype::Money),
            "Boolean" => Ok(ValueDatatype::Boolean),
            "Date" => Ok(ValueDatatype::Date),
            other => Err(UnknownDatatypeError(other.to_string())),
        }
    }
}

/// Split `"10.00 EUR"` into amount and currency code.
fn parse_money(value: &str) -> Option<(Decimal, &str)> {
    let (amount, currency) = value.split_once(' ')?;
    let currency = currency.trim();
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
        return None;
    }
    Some((amount.parse::<Decimal>().ok()?, currency))
}

// =============================================================================
// Timed enumerations
// =============================================================================

/// One value of a timed enumeration together with its validity window.
/// Open ends (`None`) mean "since ever" / "forever".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedValue {
    pub id: String,
    pub valid_from: Option<NaiveDate>,
    pub valid_to: Option<NaiveDate>,
}

/// An enumeration datatype whose values carry validity windows, consumed by
/// the value-set filter. This is a lookup companion to [`ValueDatatype`],
/// not a scalar kind of its own.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedEnumeration {
    name: String,
    values: Vec<TimedValue>,
}

impl TimedEnumeration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[TimedValue] {
        &self.values
    }

    pub fn add_value(
        &mut self,
        id: impl Into<String>,
        valid_from: Option<NaiveDate>,
        valid_to: Option<NaiveDate>,
    ) {
        self.values.push(TimedValue {
            id: id.into(),
            valid_from,
            valid_to,
        });
    }

    pub fn find_value(&self, id: &str) -> Option<&TimedValue> {
        self.values.iter().find(|v| v.id == id)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_parsable() {
        assert!(ValueDatatype::Integer.is_parsable("42"));
        assert!(ValueDatatype::Integer.is_parsable("-7"));
        assert!(!ValueDatatype::Integer.is_parsable("4.2"));
        assert!(!ValueDatatype::Integer.is_parsable("abc"));
    }

    #[test]
    fn test_decimal_compare() {
        assert_eq!(
            ValueDatatype::Decimal.compare("1.50", "1.5"),
            Some(Ordering::Equal)
        );
        assert_eq!(
            ValueDatatype::Decimal.compare("2", "10"),
            Some(Ordering::Less)
        );
        // String comparison would say "2" > "10"; the datatype must not.
        assert_eq!(
            ValueDatatype::String.compare("2", "10"),
            Some(Ordering::Greater)
        );
    }

    #[test]
    fn test_money_currency_mismatch_incomparable() {
        assert_eq!(
            ValueDatatype::Money.compare("10.00 EUR", "12.00 EUR"),
            Some(Ordering::Less)
        );
        assert_eq!(ValueDatatype::Money.compare("10.00 EUR", "12.00 USD"), None);
        assert!(!ValueDatatype::Money.is_parsable("10.00"));
        assert!(!ValueDatatype::Money.is_parsable("10.00 euros"));
    }

    #[test]
    fn test_date_parse_and_compare() {
        assert!(ValueDatatype::Date.is_parsable("2025-01-31"));
        assert!(!ValueDatatype::Date.is_parsable("31.01.2025"));
        assert_eq!(
            ValueDatatype::Date.compare("2024-12-31", "2025-01-01"),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn test_difference() {
        assert_eq!(
            ValueDatatype::Integer.difference("10", "4"),
            Some(Decimal::from(6))
        );
        assert_eq!(
            ValueDatatype::Money.difference("10.50 EUR", "0.50 EUR"),
            Some(Decimal::from(10))
        );
        assert_eq!(ValueDatatype::Money.difference("10.50 EUR", "0.50 USD"), None);
        assert_eq!(ValueDatatype::String.difference("b", "a"), None);
    }

    #[test]
    fn test_values_equal_falls_back_to_string_equality() {
        assert!(ValueDatatype::Integer.values_equal("007", "7"));
        assert!(ValueDatatype::Integer.values_equal("junk", "junk"));
        assert!(!ValueDatatype::Integer.values_equal("junk", "other"));
    }

    #[test]
    fn test_datatype_token_round_trip() {
        for dt in [
            ValueDatatype::String,
            ValueDatatype::Integer,
            ValueDatatype::Decimal,
            ValueDatatype::Money,
            ValueDatatype::Boolean,
            ValueDatatype::Date,
        ] {
            assert_eq!(dt.as_str().parse::<ValueDatatype>().unwrap(), dt);
        }
        assert!("Percent".parse::<ValueDatatype>().is_err());
    }

    #[test]
    fn test_timed_enumeration_lookup() {
        let mut payment = TimedEnumeration::new("model.PaymentMode");
        payment.add_value(
            "annual",
            NaiveDate::from_ymd_opt(2020, 1, 1),
            None,
        );
        payment.add_value("monthly", None, NaiveDate::from_ymd_opt(2019, 12, 31));

        assert_eq!(payment.find_value("annual").unwrap().valid_to, None);
        assert!(payment.find_value("weekly").is_none());
    }
}
