//! Value set behavior tests
//!
//! These tests verify that:
//! 1. Enum sets flag only later duplicate occurrences, parse-aware
//! 2. Ranges check bound order and step alignment over decimal arithmetic
//! 3. String length sets reject negative and unparsable limits
//! 4. Subset and containment dispatch across kinds, with abstract sets
//!    admitting any kind
//! 5. Validity-window filtering projects a set through a timed enumeration
//!
//! Run with: cargo test --test valueset_test

use chrono::NaiveDate;
use enum_model_core::{
    filter_valid_values, EnumValueSet, MessageList, MsgCode, RangeValueSet, StringLengthValueSet,
    TimedEnumeration, ValidityPolicy, ValidityWindow, ValueDatatype, ValueSet,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// =============================================================================
// ENUM SETS
// =============================================================================

/// ["A", "B", "A"]: the later occurrence is the duplicate, the first is clean.
#[test]
fn duplicate_flags_later_occurrence_only() {
    let set = EnumValueSet::from_values(["A", "B", "A"]);

    let mut list = MessageList::new();
    set.validate_value(2, ValueDatatype::String, "attr", &mut list)
        .unwrap();
    let message = list.message_by_code(MsgCode::DuplicateValue).unwrap();
    assert_eq!(message.invalid_object().unwrap().index, Some(2));

    let mut list = MessageList::new();
    set.validate_value(0, ValueDatatype::String, "attr", &mut list)
        .unwrap();
    assert!(list.is_empty(), "first occurrence stays clean");

    let mut list = MessageList::new();
    set.validate(ValueDatatype::String, "attr", &mut list);
    assert_eq!(list.messages_by_code(MsgCode::DuplicateValue).count(), 1);
}

/// Duplicates are judged by parsed value, not by spelling.
#[test]
fn duplicates_are_datatype_aware() {
    let set = EnumValueSet::from_values(["7", "007"]);

    let mut list = MessageList::new();
    set.validate(ValueDatatype::Integer, "attr", &mut list);
    assert!(list.contains_code(MsgCode::DuplicateValue));

    let mut list = MessageList::new();
    set.validate(ValueDatatype::String, "attr", &mut list);
    assert!(list.is_empty(), "as strings the spellings differ");
}

#[test]
fn unparsable_entry_is_flagged() {
    let set = EnumValueSet::from_values(["1", "two"]);
    let mut list = MessageList::new();
    set.validate(ValueDatatype::Integer, "attr", &mut list);

    let message = list.message_by_code(MsgCode::ValueNotParsable).unwrap();
    assert_eq!(message.invalid_object().unwrap().index, Some(1));
}

#[test]
fn out_of_bounds_validate_value_is_a_precondition_error() {
    let set = EnumValueSet::from_values(["A"]);
    let mut list = MessageList::new();
    let err = set.validate_value(5, ValueDatatype::String, "attr", &mut list);
    assert!(err.is_err());
    assert!(list.is_empty());
}

#[test]
fn containment_and_order_preserving_edits() {
    let mut set = EnumValueSet::from_values(["a", "b", "c"]);
    assert!(set.contains("b", ValueDatatype::String));
    assert!(!set.contains("d", ValueDatatype::String));

    // Boundary moves are no-ops reporting the unchanged position.
    assert_eq!(set.move_value(0, true).unwrap(), 0);
    assert_eq!(set.move_value(2, false).unwrap(), 2);
    assert_eq!(set.move_value(1, true).unwrap(), 0);
    assert_eq!(set.values(), ["b", "a", "c"]);

    assert_eq!(set.remove_values(&["a", "missing"]), 1);
    assert_eq!(set.values(), ["b", "c"]);
}

// =============================================================================
// RANGES
// =============================================================================

/// 0..10 with step 3 cannot land on the upper bound.
#[test]
fn span_not_divisible_by_step_is_flagged() {
    let range = RangeValueSet::bounded("0", "10").with_step("3");
    let mut list = MessageList::new();
    range.validate(ValueDatatype::Integer, "attr", &mut list);
    assert!(list.contains_code(MsgCode::StepRangeMismatch));

    let range = RangeValueSet::bounded("0", "9").with_step("3");
    let mut list = MessageList::new();
    range.validate(ValueDatatype::Integer, "attr", &mut list);
    assert!(list.is_empty(), "9 - 0 is a multiple of 3");
}

#[test]
fn inverted_bounds_are_flagged() {
    let range = RangeValueSet::bounded("10", "2");
    let mut list = MessageList::new();
    range.validate(ValueDatatype::Integer, "attr", &mut list);
    assert!(list.contains_code(MsgCode::LowerBoundGreaterUpperBound));
}

#[test]
fn unparsable_pieces_shadow_the_ordering_check() {
    let range = RangeValueSet::bounded("low", "2");
    let mut list = MessageList::new();
    range.validate(ValueDatatype::Integer, "attr", &mut list);
    assert!(list.contains_code(MsgCode::ValueNotParsable));
    assert!(!list.contains_code(MsgCode::LowerBoundGreaterUpperBound));
}

#[test]
fn step_containment_anchors_on_the_lower_bound() {
    let range = RangeValueSet::bounded("1", "10").with_step("3");
    assert!(range.contains_value("4", ValueDatatype::Integer));
    assert!(!range.contains_value("5", ValueDatatype::Integer));
    assert!(!range.contains_value("11", ValueDatatype::Integer));
    assert!(!range.contains_value("nope", ValueDatatype::Integer));
}

#[test]
fn decimal_ranges_use_exact_arithmetic() {
    let range = RangeValueSet::bounded("0.5", "2.0").with_step("0.5");
    let mut list = MessageList::new();
    range.validate(ValueDatatype::Decimal, "attr", &mut list);
    assert!(list.is_empty(), "1.5 splits into three exact steps");
    assert!(range.contains_value("1.0", ValueDatatype::Decimal));
    assert!(!range.contains_value("1.3", ValueDatatype::Decimal));
}

#[test]
fn open_ended_ranges_are_abstract() {
    let open = RangeValueSet::new(None, None, None);
    assert!(open.is_abstract_range());
    assert!(open.contains_value("123456", ValueDatatype::Integer));

    let lower_only = RangeValueSet::new(Some("0"), None, None);
    assert!(!lower_only.is_abstract_range());
    assert!(lower_only.contains_value("7", ValueDatatype::Integer));
    assert!(!lower_only.contains_value("-1", ValueDatatype::Integer));
}

// =============================================================================
// STRING LENGTH
// =============================================================================

#[test]
fn string_length_limits() {
    let set = StringLengthValueSet::new(Some("3"));
    assert!(set.contains_value("abc"));
    assert!(!set.contains_value("abcd"));

    let unbounded = StringLengthValueSet::new(None);
    assert!(unbounded.is_unbounded());
    assert!(unbounded.contains_value("anything at all"));

    let mut list = MessageList::new();
    StringLengthValueSet::new(Some("-2")).validate("attr", &mut list);
    assert!(list.contains_code(MsgCode::StringLengthNegative));

    let mut list = MessageList::new();
    StringLengthValueSet::new(Some("many")).validate("attr", &mut list);
    assert!(list.contains_code(MsgCode::StringLengthNotParsable));
}

// =============================================================================
// CROSS-KIND DISPATCH
// =============================================================================

#[test]
fn abstract_superset_admits_any_kind() {
    let values = ValueSet::Enum(EnumValueSet::from_values(["1", "2"]));
    let unrestricted = ValueSet::Unrestricted;
    let open_range = ValueSet::Range(RangeValueSet::new(None, None, None));

    assert!(values.is_subset_of(&unrestricted, ValueDatatype::Integer));
    assert!(values.is_subset_of(&open_range, ValueDatatype::Integer));
    assert!(unrestricted.is_abstract());
    assert!(open_range.is_abstract());
}

#[test]
fn concrete_subset_requires_matching_kind() {
    let values = ValueSet::Enum(EnumValueSet::from_values(["1", "2"]));
    let narrow = ValueSet::Enum(EnumValueSet::from_values(["1", "2", "3"]));
    let range = ValueSet::Range(RangeValueSet::bounded("0", "10"));

    assert!(values.is_subset_of(&narrow, ValueDatatype::Integer));
    assert!(
        !values.is_subset_of(&range, ValueDatatype::Integer),
        "a concrete range never admits an enum set"
    );
    assert!(!values.same_kind(&range));
}

#[test]
fn range_subset_checks_step_alignment() {
    let inner = RangeValueSet::bounded("0", "8").with_step("4");
    let outer = RangeValueSet::bounded("0", "16").with_step("2");
    assert!(inner.is_subset_of_range(&outer, ValueDatatype::Integer));

    let misaligned = RangeValueSet::bounded("1", "9").with_step("4");
    assert!(
        !misaligned.is_subset_of_range(&outer, ValueDatatype::Integer),
        "anchor 1 never lands on outer's grid"
    );
}

#[test]
fn value_set_validate_dispatches() {
    let mut list = MessageList::new();
    ValueSet::Unrestricted.validate(ValueDatatype::Integer, "attr", &mut list);
    assert!(list.is_empty());

    ValueSet::Range(RangeValueSet::bounded("5", "1")).validate(
        ValueDatatype::Integer,
        "attr",
        &mut list,
    );
    assert!(list.contains_code(MsgCode::LowerBoundGreaterUpperBound));
}

// =============================================================================
// VALIDITY-WINDOW FILTERING
// =============================================================================

fn payment_modes() -> TimedEnumeration {
    let mut e = TimedEnumeration::new("PaymentMode");
    e.add_value("annual", Some(date(2020, 1, 1)), None);
    e.add_value("monthly", None, Some(date(2019, 12, 31)));
    e.add_value("weekly", Some(date(2020, 6, 1)), Some(date(2020, 6, 30)));
    e
}

#[test]
fn whole_window_keeps_only_fully_covering_values() {
    let set = EnumValueSet::from_values(["annual", "monthly", "weekly", "unknown"]);
    let window = ValidityWindow::between(date(2020, 5, 1), date(2020, 7, 31));

    let filtered = filter_valid_values(
        &set,
        &payment_modes(),
        &window,
        ValidityPolicy::WholeWindow,
    );
    assert_eq!(filtered.values(), ["annual"], "unknown ids are dropped");
}

#[test]
fn any_overlap_keeps_partial_coverage() {
    let set = EnumValueSet::from_values(["annual", "monthly", "weekly"]);
    let window = ValidityWindow::between(date(2020, 5, 1), date(2020, 7, 31));

    let filtered = filter_valid_values(
        &set,
        &payment_modes(),
        &window,
        ValidityPolicy::AnyOverlap,
    );
    assert_eq!(filtered.values(), ["annual", "weekly"], "order is preserved");
}
