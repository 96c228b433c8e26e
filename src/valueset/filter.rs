//! Temporal projection of enum value sets.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::datatype::{TimedEnumeration, TimedValue};
use crate::valueset::enum_set::EnumValueSet;

/// Inclusion policy for values whose validity only partly covers the
/// window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidityPolicy {
    /// Keep a value only when it is valid on every day of the window.
    WholeWindow,
    /// Keep a value when its validity touches the window at all.
    AnyOverlap,
}

/// Validity window, inclusive on both ends. `None` leaves an end open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityWindow {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl ValidityWindow {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    pub fn open() -> Self {
        Self::default()
    }
}

fn valid_whole_window(value: &TimedValue, window: &ValidityWindow) -> bool {
    let covers_start = match (value.valid_from, window.from) {
        (None, _) => true,
        (Some(valid_from), Some(from)) => valid_from <= from,
        (Some(_), None) => false,
    };
    let covers_end = match (value.valid_to, window.to) {
        (None, _) => true,
        (Some(valid_to), Some(to)) => valid_to >= to,
        (Some(_), None) => false,
    };
    covers_start && covers_end
}

fn overlaps_window(value: &TimedValue, window: &ValidityWindow) -> bool {
    let starts_in_time = match (value.valid_from, window.to) {
        (None, _) | (_, None) => true,
        (Some(valid_from), Some(to)) => valid_from <= to,
    };
    let ends_in_time = match (value.valid_to, window.from) {
        (None, _) | (_, None) => true,
        (Some(valid_to), Some(from)) => valid_to >= from,
    };
    starts_in_time && ends_in_time
}

/// Project `source` onto those of its values that `enumeration` knows and
/// that are valid in `window` under `policy`. A pure projection: order is
/// preserved, the source set stays untouched, ids the enumeration does not
/// know are dropped.
pub fn filter_valid_values(
    source: &EnumValueSet,
    enumeration: &TimedEnumeration,
    window: &ValidityWindow,
    policy: ValidityPolicy,
) -> EnumValueSet {
    let keep = |id: &str| {
        enumeration.find_value(id).is_some_and(|value| match policy {
            ValidityPolicy::WholeWindow => valid_whole_window(value, window),
            ValidityPolicy::AnyOverlap => overlaps_window(value, window),
        })
    };
    EnumValueSet::from_values(source.values().iter().filter(|v| keep(v.as_str())).cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn payment_modes() -> TimedEnumeration {
        let mut e = TimedEnumeration::new("model.PaymentMode");
        e.add_value("annual", Some(date(2020, 1, 1)), None);
        e.add_value("monthly", None, Some(date(2019, 12, 31)));
        e.add_value("weekly", Some(date(2020, 6, 1)), Some(date(2020, 6, 30)));
        e
    }

    #[test]
    fn test_whole_window_keeps_fully_covering_values() {
        let source = EnumValueSet::from_values(["annual", "monthly", "weekly"]);
        let window = ValidityWindow::between(date(2020, 1, 1), date(2020, 12, 31));

        let filtered = filter_valid_values(
            &source,
            &payment_modes(),
            &window,
            ValidityPolicy::WholeWindow,
        );
        assert_eq!(filtered.values(), ["annual"]);
        // Source is untouched.
        assert_eq!(source.values_count(), 3);
    }

    #[test]
    fn test_any_overlap_keeps_touching_values() {
        let source = EnumValueSet::from_values(["annual", "monthly", "weekly"]);
        let window = ValidityWindow::between(date(2020, 1, 1), date(2020, 12, 31));

        let filtered = filter_valid_values(
            &source,
            &payment_modes(),
            &window,
            ValidityPolicy::AnyOverlap,
        );
        // "monthly" ended before the window opened.
        assert_eq!(filtered.values(), ["annual", "weekly"]);
    }

    #[test]
    fn test_unknown_ids_are_dropped() {
        let source = EnumValueSet::from_values(["annual", "quarterly"]);
        let window = ValidityWindow::open();

        let filtered = filter_valid_values(
            &source,
            &payment_modes(),
            &window,
            ValidityPolicy::AnyOverlap,
        );
        assert_eq!(filtered.values(), ["annual"]);
    }

    #[test]
    fn test_open_window_whole_coverage_needs_open_validity() {
        let mut e = TimedEnumeration::new("model.Flag");
        e.add_value("always", None, None);
        e.add_value("sometimes", Some(date(2020, 1, 1)), None);
        let source = EnumValueSet::from_values(["always", "sometimes"]);

        let filtered = filter_valid_values(
            &source,
            &e,
            &ValidityWindow::open(),
            ValidityPolicy::WholeWindow,
        );
        assert_eq!(filtered.values(), ["always"]);
    }
}
