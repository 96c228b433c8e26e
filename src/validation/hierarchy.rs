//! Supertype chain validation: existence, abstractness and acyclicity.
//!
//! The direct supertype check works on plain names so that provisional
//! data, e.g. from a creation dialog, can be validated before any type
//! object exists.

use crate::error::ModelError;
use crate::model::enum_type::EnumType;
use crate::model::registry::TypeLookup;
use crate::validation::{Message, MessageList, MsgCode, ObjectRef};

/// Validate the direct supertype of `enum_type_name`. The two findings are
/// independent and terminal: an unresolvable supertype skips the
/// abstractness check, a resolvable concrete one is flagged as such.
pub fn validate_super_enum_type(
    list: &mut MessageList,
    enum_type_name: &str,
    super_name: &str,
    lookup: &dyn TypeLookup,
) -> Result<(), ModelError> {
    if super_name.trim().is_empty() {
        return Err(ModelError::InvalidArgument(
            "super enum type name must not be empty".into(),
        ));
    }
    let Some(super_type) = lookup.find_enum_type(super_name) else {
        list.add(
            Message::error(
                MsgCode::SupertypeDoesNotExist,
                format!(
                    "Super enum type '{super_name}' of enum type '{enum_type_name}' does not exist"
                ),
            )
            .with_object(ObjectRef::property(enum_type_name, "superEnumType")),
        );
        return Ok(());
    };
    if !super_type.is_abstract {
        list.add(
            Message::error(
                MsgCode::SupertypeIsNotAbstract,
                format!(
                    "Super enum type '{super_name}' of enum type '{enum_type_name}' is not abstract"
                ),
            )
            .with_object(ObjectRef::property(enum_type_name, "superEnumType")),
        );
    }
    Ok(())
}

/// Result of walking a supertype chain.
struct SupertypeCollection<'a> {
    ancestors: Vec<&'a EnumType>,
    cycle: bool,
}

/// Follow the supertype names upward, collecting every ancestor that
/// resolves. Stops with `cycle` set as soon as a qualified name repeats;
/// stops silently when a name does not resolve (the broken link surfaces
/// through that type's own validation).
fn collect_supertypes<'a>(
    start: &'a EnumType,
    lookup: &'a dyn TypeLookup,
) -> SupertypeCollection<'a> {
    let mut ancestors: Vec<&'a EnumType> = Vec::new();
    let mut seen: Vec<&str> = vec![start.qualified_name()];
    let mut next = start
        .super_enum_type
        .as_deref()
        .filter(|s| !s.trim().is_empty());

    while let Some(name) = next {
        if seen.contains(&name) {
            return SupertypeCollection {
                ancestors,
                cycle: true,
            };
        }
        let Some(ancestor) = lookup.find_enum_type(name) else {
            break;
        };
        seen.push(ancestor.qualified_name());
        ancestors.push(ancestor);
        next = ancestor
            .super_enum_type
            .as_deref()
            .filter(|s| !s.trim().is_empty());
    }
    SupertypeCollection {
        ancestors,
        cycle: false,
    }
}

/// Validate the whole supertype chain of `enum_type`.
///
/// A cycle yields exactly one message and suppresses all ancestor checks.
/// On an acyclic chain every resolved ancestor is validated on its own;
/// each ancestor with a missing or concrete supertype contributes one
/// aggregate "inconsistent hierarchy" message for the original type, never
/// the ancestor's raw findings.
pub fn validate_supertype_hierarchy(
    list: &mut MessageList,
    enum_type: &EnumType,
    lookup: &dyn TypeLookup,
) {
    let chain = collect_supertypes(enum_type, lookup);
    if chain.cycle {
        list.add(
            Message::error(
                MsgCode::CycleInTypeHierarchy,
                format!(
                    "Supertype hierarchy of enum type '{}' contains a cycle",
                    enum_type.qualified_name()
                ),
            )
            .with_object(ObjectRef::property(
                enum_type.qualified_name(),
                "superEnumType",
            )),
        );
        return;
    }

    for ancestor in chain.ancestors {
        let Some(super_name) = ancestor
            .super_enum_type
            .as_deref()
            .filter(|s| !s.trim().is_empty())
        else {
            continue;
        };
        let mut scratch = MessageList::new();
        // Guarded non-empty, so the precondition check cannot trip.
        if validate_super_enum_type(&mut scratch, ancestor.qualified_name(), super_name, lookup)
            .is_err()
        {
            continue;
        }
        if scratch.contains_code(MsgCode::SupertypeDoesNotExist)
            || scratch.contains_code(MsgCode::SupertypeIsNotAbstract)
        {
            list.add(
                Message::error(
                    MsgCode::InconsistentTypeHierarchy,
                    format!(
                        "Supertype hierarchy of enum type '{}' is inconsistent: enum type '{}' has an invalid supertype",
                        enum_type.qualified_name(),
                        ancestor.qualified_name()
                    ),
                )
                .with_object(ObjectRef::property(
                    enum_type.qualified_name(),
                    "superEnumType",
                )),
            );
        }
    }
}
