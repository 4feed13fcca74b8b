//! Port compatibility rules.
//!
//! Pure functions over direction and type pairs; nothing here touches the
//! registry. Widening is a single static table: to allow a new substitution,
//! add one [`WideningDef`] entry to [`WIDENING_REGISTRY`].
//!
//! # Scoring
//!
//! A compatible pair starts at 100. Each widened type along the generic tree
//! costs 10 and each non-nullable → nullable relaxation costs 5. Port scores
//! average the direction score (always 100 when it passes) and the type score.

use std::fmt;

use crate::domain::{
    entities::{Port, TypeReference},
    value_objects::{Direction, TypeCheckMode},
};

/// Maximum nesting depth of generic arguments that will be compared.
pub const MAX_TYPE_DEPTH: usize = 32;

const WIDENING_PENALTY: u8 = 10;
const NULLABLE_PENALTY: u8 = 5;

// ── Widening table ───────────────────────────────────────────────────────────

/// Describes which broader types a built-in type may flow into.
#[derive(Debug, Clone, Copy)]
pub struct WideningDef {
    pub from: &'static str,
    pub into: &'static [&'static str],
}

/// Single source of truth for implicit numeric widening.
pub static WIDENING_REGISTRY: &[WideningDef] = &[
    WideningDef {
        from: "int8",
        into: &["int16", "int32", "int64", "float32", "float64"],
    },
    WideningDef {
        from: "int16",
        into: &["int32", "int64", "float32", "float64"],
    },
    WideningDef {
        from: "int32",
        into: &["int64", "float64"],
    },
    WideningDef {
        from: "int64",
        into: &["float64"],
    },
    WideningDef {
        from: "uint8",
        into: &["uint16", "uint32", "uint64", "int16", "int32", "int64", "float32", "float64"],
    },
    WideningDef {
        from: "uint16",
        into: &["uint32", "uint64", "int32", "int64", "float32", "float64"],
    },
    WideningDef {
        from: "uint32",
        into: &["uint64", "int64", "float64"],
    },
    WideningDef {
        from: "uint64",
        into: &["float64"],
    },
    WideningDef {
        from: "float32",
        into: &["float64"],
    },
];

/// Whether a value of type `from` may be accepted where `to` is expected.
pub fn can_widen(from: &str, to: &str) -> bool {
    WIDENING_REGISTRY
        .iter()
        .find(|def| def.from == from)
        .is_some_and(|def| def.into.contains(&to))
}

// ── Results ──────────────────────────────────────────────────────────────────

/// Outcome of a compatibility check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatibilityResult {
    pub compatible: bool,
    /// Confidence 0..=100; 0 when incompatible.
    pub score: u8,
    pub reason: Option<String>,
    pub suggestions: Vec<String>,
    /// Non-fatal observations (widening, nullable relaxation).
    pub notes: Vec<String>,
}

impl CompatibilityResult {
    fn ok(score: u8) -> Self {
        Self {
            compatible: true,
            score,
            reason: None,
            suggestions: Vec::new(),
            notes: Vec::new(),
        }
    }

    fn fail(reason: impl Into<String>, suggestions: Vec<String>) -> Self {
        Self {
            compatible: false,
            score: 0,
            reason: Some(reason.into()),
            suggestions,
            notes: Vec::new(),
        }
    }
}

impl fmt::Display for CompatibilityResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.reason, self.compatible) {
            (_, true) => write!(f, "compatible (score {})", self.score),
            (Some(reason), false) => f.write_str(reason),
            (None, false) => f.write_str("incompatible"),
        }
    }
}

// ── Direction ────────────────────────────────────────────────────────────────

/// Check that data can flow from a `from` port into a `to` port.
pub fn check_direction_compatibility(from: Direction, to: Direction) -> CompatibilityResult {
    use Direction::{In, InOut, Out};

    match (from, to) {
        (Out, In) | (Out, InOut) | (InOut, In) | (InOut, InOut) => CompatibilityResult::ok(100),
        (In, In) => CompatibilityResult::fail(
            "both ports consume: an input cannot feed another input",
            vec![
                "Connect an output (or inout) port to this input instead".into(),
                "Swap the source for a port that produces data".into(),
            ],
        ),
        (Out, Out) => CompatibilityResult::fail(
            "both ports produce: an output cannot receive from another output",
            vec![
                "Connect this output to an input (or inout) port".into(),
                "Reverse the connection if the target is meant to be the source".into(),
            ],
        ),
        (In, Out) => CompatibilityResult::fail(
            "wrong way: connection runs from an input into an output",
            vec!["Reverse the connection: wire the output into the input".into()],
        ),
        (In, InOut) => CompatibilityResult::fail(
            "wrong way: an input port cannot act as a source",
            vec![
                "Use an output or inout port as the source".into(),
                "Reverse the connection if the inout port should feed the input".into(),
            ],
        ),
        (InOut, Out) => CompatibilityResult::fail(
            "wrong way: an output port cannot act as a target",
            vec![
                "Use an input or inout port as the target".into(),
                "Reverse the connection if the output should feed the inout port".into(),
            ],
        ),
    }
}

// ── Types ────────────────────────────────────────────────────────────────────

/// Check that a value of type `from` may flow into `to` under `mode`.
///
/// Generic arguments are compared positionally with an explicit work stack,
/// bounded by [`MAX_TYPE_DEPTH`].
pub fn check_type_compatibility(
    from: &TypeReference,
    to: &TypeReference,
    mode: TypeCheckMode,
) -> CompatibilityResult {
    let mut score: u8 = 100;
    let mut notes = Vec::new();
    let mut stack: Vec<(&TypeReference, &TypeReference, usize, String)> =
        vec![(from, to, 0, String::new())];

    while let Some((source, target, depth, path)) = stack.pop() {
        if depth > MAX_TYPE_DEPTH {
            return CompatibilityResult::fail(
                format!("type nesting too deep (more than {MAX_TYPE_DEPTH} generic levels)"),
                vec!["Flatten the generic structure of the port type".into()],
            );
        }

        let at = if path.is_empty() {
            String::new()
        } else {
            format!(" at generic {path}")
        };

        match mode {
            TypeCheckMode::Strict => {
                if source.symbol_id != target.symbol_id {
                    return CompatibilityResult::fail(
                        format!(
                            "type mismatch{at}: '{}' is not '{}' (strict mode)",
                            source.symbol_id, target.symbol_id
                        ),
                        vec![
                            format!("Change one side to '{}'", target.symbol_id),
                            "Use compatible mode to allow numeric widening".into(),
                        ],
                    );
                }
                if source.nullable != target.nullable {
                    return CompatibilityResult::fail(
                        format!("nullability differs{at} (strict mode)"),
                        vec![
                            "Make both types nullable or both non-nullable".into(),
                            "Use compatible mode to allow non-nullable into nullable".into(),
                        ],
                    );
                }
            }
            TypeCheckMode::Compatible => {
                if source.symbol_id != target.symbol_id {
                    if can_widen(source.type_name(), target.type_name()) {
                        score = score.saturating_sub(WIDENING_PENALTY);
                        notes.push(format!(
                            "'{}' widens to '{}'{at}",
                            source.type_name(),
                            target.type_name()
                        ));
                    } else {
                        return CompatibilityResult::fail(
                            format!(
                                "type mismatch{at}: '{}' cannot flow into '{}'",
                                source.symbol_id, target.symbol_id
                            ),
                            vec![
                                format!("Change the source port type to '{}'", target.symbol_id),
                                "Add a transform to the connection that converts the value".into(),
                            ],
                        );
                    }
                }
                match (source.nullable, target.nullable) {
                    (true, false) => {
                        return CompatibilityResult::fail(
                            format!(
                                "narrowing{at}: nullable '{}' cannot flow into non-nullable '{}'",
                                source, target
                            ),
                            vec![
                                "Mark the target port type as nullable".into(),
                                "Make the source port type non-nullable".into(),
                                "Add a transform that supplies a default for null values".into(),
                            ],
                        );
                    }
                    (false, true) => {
                        score = score.saturating_sub(NULLABLE_PENALTY);
                        notes.push(format!("non-nullable value flows into nullable type{at}"));
                    }
                    _ => {}
                }
            }
        }

        if source.generics.len() != target.generics.len() {
            return CompatibilityResult::fail(
                format!(
                    "generic argument count differs{at}: {} vs {}",
                    source.generics.len(),
                    target.generics.len()
                ),
                vec!["Both types must declare the same number of generic arguments".into()],
            );
        }

        for (i, (s, t)) in source.generics.iter().zip(&target.generics).enumerate().rev() {
            let child = if path.is_empty() {
                i.to_string()
            } else {
                format!("{path}.{i}")
            };
            stack.push((s, t, depth + 1, child));
        }
    }

    let mut result = CompatibilityResult::ok(score);
    result.notes = notes;
    result
}

// ── Ports ────────────────────────────────────────────────────────────────────

/// Direction check (fail-fast) followed by the type check; score is the mean.
pub fn check_port_compatibility(from: &Port, to: &Port, mode: TypeCheckMode) -> CompatibilityResult {
    let direction = check_direction_compatibility(from.direction, to.direction);
    if !direction.compatible {
        return direction;
    }

    let types = check_type_compatibility(&from.type_ref, &to.type_ref, mode);
    if !types.compatible {
        return types;
    }

    let score = ((u16::from(direction.score) + u16::from(types.score)) / 2) as u8;
    let mut result = CompatibilityResult::ok(score);
    result.notes = types.notes;
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(id: &str) -> TypeReference {
        TypeReference::new(id)
    }

    #[test]
    fn only_four_direction_pairs_are_valid() {
        use Direction::*;
        let all = [In, Out, InOut];
        let valid = [(Out, In), (Out, InOut), (InOut, In), (InOut, InOut)];
        for from in all {
            for to in all {
                let result = check_direction_compatibility(from, to);
                assert_eq!(result.compatible, valid.contains(&(from, to)), "{from}->{to}");
                if !result.compatible {
                    assert!(!result.suggestions.is_empty());
                }
            }
        }
    }

    #[test]
    fn in_to_in_reports_both_consume() {
        let result = check_direction_compatibility(Direction::In, Direction::In);
        assert!(result.reason.unwrap().contains("both ports consume"));
    }

    #[test]
    fn identical_types_score_full() {
        let result = check_type_compatibility(&t("string"), &t("string"), TypeCheckMode::Compatible);
        assert!(result.compatible);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn widening_scores_ninety() {
        let result = check_type_compatibility(&t("int32"), &t("int64"), TypeCheckMode::Compatible);
        assert!(result.compatible);
        assert_eq!(result.score, 90);

        let reverse = check_type_compatibility(&t("int64"), &t("int32"), TypeCheckMode::Compatible);
        assert!(!reverse.compatible);
    }

    #[test]
    fn widening_uses_type_name_of_full_ids() {
        let result = check_type_compatibility(
            &t("std/int8@1.0.0"),
            &t("std/float64@1.0.0"),
            TypeCheckMode::Compatible,
        );
        assert!(result.compatible);
    }

    #[test]
    fn strict_mode_rejects_widening_and_nullability_changes() {
        assert!(!check_type_compatibility(&t("int32"), &t("int64"), TypeCheckMode::Strict).compatible);
        assert!(
            !check_type_compatibility(&t("int32"), &t("int32").nullable(), TypeCheckMode::Strict)
                .compatible
        );
        assert!(check_type_compatibility(&t("int32"), &t("int32"), TypeCheckMode::Strict).compatible);
    }

    #[test]
    fn nullable_into_non_nullable_is_narrowing() {
        let result = check_type_compatibility(
            &t("string").nullable(),
            &t("string"),
            TypeCheckMode::Compatible,
        );
        assert!(!result.compatible);
        assert!(result.reason.unwrap().contains("narrowing"));
        assert!(!result.suggestions.is_empty());
    }

    #[test]
    fn non_nullable_into_nullable_costs_five() {
        let result = check_type_compatibility(
            &t("string"),
            &t("string").nullable(),
            TypeCheckMode::Compatible,
        );
        assert!(result.compatible);
        assert_eq!(result.score, 95);
    }

    #[test]
    fn generics_are_checked_positionally() {
        let from = t("map").with_generic(t("string")).with_generic(t("int32"));
        let to = t("map").with_generic(t("string")).with_generic(t("int64"));
        let result = check_type_compatibility(&from, &to, TypeCheckMode::Compatible);
        assert!(result.compatible);
        assert_eq!(result.score, 90);

        let swapped = t("map").with_generic(t("int64")).with_generic(t("string"));
        assert!(!check_type_compatibility(&from, &swapped, TypeCheckMode::Compatible).compatible);
    }

    #[test]
    fn generic_count_mismatch_fails() {
        let from = t("list").with_generic(t("int32"));
        let result = check_type_compatibility(&from, &t("list"), TypeCheckMode::Compatible);
        assert!(!result.compatible);
        assert!(result.reason.unwrap().contains("count"));
    }

    #[test]
    fn deep_nesting_is_bounded() {
        let mut deep = t("int32");
        for _ in 0..(MAX_TYPE_DEPTH + 2) {
            deep = t("list").with_generic(deep);
        }
        let result = check_type_compatibility(&deep, &deep, TypeCheckMode::Compatible);
        assert!(!result.compatible);
        assert!(result.reason.unwrap().contains("too deep"));
    }

    #[test]
    fn port_check_is_direction_first() {
        let a = Port::input("a", t("string"));
        let b = Port::input("b", t("bytes"));
        let result = check_port_compatibility(&a, &b, TypeCheckMode::Compatible);
        assert!(result.reason.unwrap().contains("consume"));
    }

    #[test]
    fn port_score_averages_direction_and_type() {
        let out = Port::output("out", t("int32"));
        let input = Port::input("in", t("int64"));
        assert_eq!(
            check_port_compatibility(&out, &input, TypeCheckMode::Compatible).score,
            95
        );

        let same = Port::input("in", t("int32"));
        assert_eq!(
            check_port_compatibility(&out, &same, TypeCheckMode::Compatible).score,
            100
        );
    }
}
