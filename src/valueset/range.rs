//! Bounded range with an optional step.
//!
//! Bounds and step stay string-encoded so a datatype change never loses
//! data; every numeric question is answered by the owning datatype at the
//! moment it is asked.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::datatype::ValueDatatype;
use crate::validation::{Message, MessageList, MsgCode, ObjectRef};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeValueSet {
    lower: Option<String>,
    upper: Option<String>,
    step: Option<String>,
}

impl RangeValueSet {
    pub fn new(lower: Option<&str>, upper: Option<&str>, step: Option<&str>) -> Self {
        Self {
            lower: lower.map(str::to_string),
            upper: upper.map(str::to_string),
            step: step.map(str::to_string),
        }
    }

    pub fn bounded(lower: &str, upper: &str) -> Self {
        Self::new(Some(lower), Some(upper), None)
    }

    pub fn with_step(mut self, step: &str) -> Self {
        self.step = Some(step.to_string());
        self
    }

    pub fn lower(&self) -> Option<&str> {
        self.lower.as_deref()
    }

    pub fn upper(&self) -> Option<&str> {
        self.upper.as_deref()
    }

    pub fn step(&self) -> Option<&str> {
        self.step.as_deref()
    }

    /// A range with neither bound pins down no values.
    pub fn is_abstract_range(&self) -> bool {
        self.lower.is_none() && self.upper.is_none()
    }

    /// Bound and step test under the owning datatype. A range whose pieces
    /// do not parse, or whose pieces are incomparable with the candidate
    /// (money across currencies), contains nothing.
    pub fn contains_value(&self, value: &str, datatype: ValueDatatype) -> bool {
        use std::cmp::Ordering;

        if !datatype.is_parsable(value) {
            return false;
        }
        if let Some(lower) = self.lower.as_deref() {
            match datatype.compare(value, lower) {
                Some(Ordering::Greater) | Some(Ordering::Equal) => {}
                _ => return false,
            }
        }
        if let Some(upper) = self.upper.as_deref() {
            match datatype.compare(value, upper) {
                Some(Ordering::Less) | Some(Ordering::Equal) => {}
                _ => return false,
            }
        }
        if datatype.is_numeric() {
            if let (Some(step), Some(lower)) = (self.step.as_deref(), self.lower.as_deref()) {
                let Some(step) = datatype.as_decimal(step) else {
                    return false;
                };
                let Some(distance) = datatype.difference(value, lower) else {
                    return false;
                };
                if !divides(distance, step) {
                    return false;
                }
            }
        }
        true
    }

    /// True when every value of this range is also in `other`: bounds lie
    /// within the other's bounds, and when the other steps, this range
    /// steps on a multiple of it starting from an aligned lower bound.
    pub fn is_subset_of_range(&self, other: &RangeValueSet, datatype: ValueDatatype) -> bool {
        use std::cmp::Ordering;

        if let Some(other_lower) = other.lower.as_deref() {
            let inside = self.lower.as_deref().is_some_and(|lower| {
                matches!(
                    datatype.compare(lower, other_lower),
                    Some(Ordering::Greater) | Some(Ordering::Equal)
                )
            });
            if !inside {
                return false;
            }
        }
        if let Some(other_upper) = other.upper.as_deref() {
            let inside = self.upper.as_deref().is_some_and(|upper| {
                matches!(
                    datatype.compare(upper, other_upper),
                    Some(Ordering::Less) | Some(Ordering::Equal)
                )
            });
            if !inside {
                return false;
            }
        }
        if datatype.is_numeric() {
            if let Some(other_step) = other.step.as_deref() {
                let Some(other_step) = datatype.as_decimal(other_step) else {
                    return false;
                };
                let step_compatible = self
                    .step
                    .as_deref()
                    .and_then(|s| datatype.as_decimal(s))
                    .is_some_and(|step| divides(step, other_step));
                if !step_compatible {
                    return false;
                }
                let anchors_aligned = match (self.lower.as_deref(), other.lower.as_deref()) {
                    (Some(lower), Some(other_lower)) => datatype
                        .difference(lower, other_lower)
                        .is_some_and(|offset| divides(offset, other_step)),
                    _ => false,
                };
                if !anchors_aligned {
                    return false;
                }
            }
        }
        true
    }

    /// Validate the range itself: every present piece must parse, the
    /// bounds must be ordered, and a step must walk from the lower bound
    /// exactly onto the upper bound.
    pub fn validate(&self, datatype: ValueDatatype, owner: &str, list: &mut MessageList) {
        let pieces = [
            ("lowerBound", self.lower.as_deref()),
            ("upperBound", self.upper.as_deref()),
            ("step", self.step.as_deref()),
        ];
        let mut all_parsable = true;
        for (property, piece) in pieces {
            let Some(piece) = piece else { continue };
            if !datatype.is_parsable(piece) {
                all_parsable = false;
                list.add(
                    Message::error(
                        MsgCode::ValueNotParsable,
                        format!("The {property} '{piece}' of '{owner}' is not a valid {datatype}"),
                    )
                    .with_object(ObjectRef::property(owner, property)),
                );
            }
        }
        if !all_parsable {
            return;
        }

        if let (Some(lower), Some(upper)) = (self.lower.as_deref(), self.upper.as_deref()) {
            if datatype.compare(lower, upper) == Some(std::cmp::Ordering::Greater) {
                list.add(
                    Message::error(
                        MsgCode::LowerBoundGreaterUpperBound,
                        format!(
                            "Lower bound '{lower}' of '{owner}' is greater than the upper bound '{upper}'"
                        ),
                    )
                    .with_object(ObjectRef::property(owner, "lowerBound")),
                );
                return;
            }
        }

        if !datatype.is_numeric() {
            return;
        }
        if let (Some(step), Some(span)) = (
            self.step.as_deref().and_then(|s| datatype.as_decimal(s)),
            match (self.lower.as_deref(), self.upper.as_deref()) {
                (Some(lower), Some(upper)) => datatype.difference(upper, lower),
                _ => None,
            },
        ) {
            if step.is_zero() {
                list.add(
                    Message::error(
                        MsgCode::StepRangeMismatch,
                        format!("The step of '{owner}' must not be zero"),
                    )
                    .with_object(ObjectRef::property(owner, "step")),
                );
            } else if !divides(span, step) {
                list.add(
                    Message::error(
                        MsgCode::StepRangeMismatch,
                        format!(
                            "The range of '{owner}' from '{}' to '{}' cannot be walked in steps of '{}'",
                            self.lower.as_deref().unwrap_or(""),
                            self.upper.as_deref().unwrap_or(""),
                            self.step.as_deref().unwrap_or("")
                        ),
                    )
                    .with_object(ObjectRef::property(owner, "step")),
                );
            }
        }
    }
}

/// `amount` is a whole number of `step`s. A zero step divides nothing.
fn divides(amount: Decimal, step: Decimal) -> bool {
    !step.is_zero() && (amount % step).is_zero()
}
