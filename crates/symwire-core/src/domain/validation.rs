use std::collections::{BTreeSet, HashSet};
use std::fmt;

use crate::domain::{
    containment::containment_cycle_members,
    entities::{Symbol, SymbolId},
    value_objects::Level,
};

/// Centralized symbol validation.
///
/// All structural rules live here, not scattered across entities. Rules
/// never fail the call: violations come back inside a [`ValidationReport`].
pub struct DomainValidator;

/// The rule a [`ValidationIssue`] was raised by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationRule {
    KindLevelMismatch,
    PrimitiveWithPorts,
    UnresolvedType,
    UnresolvedReference,
    ContainmentCycle,
    NoPorts,
    SelfExtension,
}

impl ValidationRule {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::KindLevelMismatch => "kind-level-mismatch",
            Self::PrimitiveWithPorts => "primitive-with-ports",
            Self::UnresolvedType => "unresolved-type",
            Self::UnresolvedReference => "unresolved-reference",
            Self::ContainmentCycle => "containment-cycle",
            Self::NoPorts => "no-ports",
            Self::SelfExtension => "self-extension",
        }
    }

    /// Warnings are reported but do not make a report invalid.
    pub const fn is_warning(&self) -> bool {
        matches!(self, Self::UnresolvedReference | Self::NoPorts)
    }
}

impl fmt::Display for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub symbol_id: SymbolId,
    pub rule: ValidationRule,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.symbol_id, self.rule, self.message)
    }
}

/// Outcome of validating one or more symbols.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn push(&mut self, symbol_id: &SymbolId, rule: ValidationRule, message: impl Into<String>) {
        let issue = ValidationIssue {
            symbol_id: symbol_id.clone(),
            rule,
            message: message.into(),
        };
        if rule.is_warning() {
            self.warnings.push(issue);
        } else {
            self.errors.push(issue);
        }
    }

    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

/// Registry-wide facts a single-symbol check needs.
#[derive(Debug, Clone)]
pub struct ValidationContext<'a> {
    known: HashSet<&'a str>,
    cycle_members: BTreeSet<SymbolId>,
}

impl<'a> ValidationContext<'a> {
    pub fn new(symbols: &'a [Symbol]) -> Self {
        Self {
            known: symbols.iter().map(|s| s.id().as_str()).collect(),
            cycle_members: containment_cycle_members(symbols),
        }
    }

    fn resolves(&self, id: &str) -> bool {
        self.known.contains(id)
    }
}

impl DomainValidator {
    pub fn validate_all(symbols: &[Symbol]) -> ValidationReport {
        let context = ValidationContext::new(symbols);
        let mut report = ValidationReport::default();
        for symbol in symbols {
            report.merge(Self::validate_symbol(symbol, &context));
        }
        report
    }

    pub fn validate_symbol(symbol: &Symbol, context: &ValidationContext<'_>) -> ValidationReport {
        let mut report = ValidationReport::default();
        let id = symbol.id();

        if symbol.kind.level() != symbol.level {
            report.push(
                id,
                ValidationRule::KindLevelMismatch,
                format!(
                    "kind '{}' belongs to {} but symbol is declared at {}",
                    symbol.kind,
                    symbol.kind.level(),
                    symbol.level
                ),
            );
        }

        if symbol.level == Level::Primitive && !symbol.ports.is_empty() {
            report.push(
                id,
                ValidationRule::PrimitiveWithPorts,
                format!("L0 symbols cannot declare ports ({} found)", symbol.ports.len()),
            );
        }

        if matches!(symbol.level, Level::Component | Level::Module | Level::Subsystem)
            && symbol.ports.is_empty()
        {
            report.push(
                id,
                ValidationRule::NoPorts,
                format!("{} declares no ports", symbol.level.description()),
            );
        }

        for port in &symbol.ports {
            for type_ref in port.type_ref.walk() {
                if !type_ref.is_builtin() && !context.resolves(&type_ref.symbol_id) {
                    report.push(
                        id,
                        ValidationRule::UnresolvedType,
                        format!(
                            "port '{}' references unknown type '{}'",
                            port.name, type_ref.symbol_id
                        ),
                    );
                }
            }
        }

        if symbol.extends.as_ref() == Some(id) {
            report.push(id, ValidationRule::SelfExtension, "symbol extends itself");
        }

        for (relation, target) in symbol.referenced_ids() {
            if !context.resolves(target.as_str()) {
                report.push(
                    id,
                    ValidationRule::UnresolvedReference,
                    format!("{relation} target '{target}' is not registered"),
                );
            }
        }

        if context.cycle_members.contains(id) {
            report.push(
                id,
                ValidationRule::ContainmentCycle,
                "symbol is part of a containment cycle",
            );
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::{Port, TypeReference},
        value_objects::SymbolKind,
        version::SemVer,
    };

    fn v1() -> SemVer {
        SemVer::new(1, 0, 0)
    }

    fn component(name: &str) -> Symbol {
        Symbol::builder("app", name, v1())
            .port(Port::input("in", TypeReference::new("string")))
            .build()
            .unwrap()
    }

    #[test]
    fn clean_registry_is_valid() {
        let report = DomainValidator::validate_all(&[component("A"), component("B")]);
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn kind_level_mismatch_is_an_error() {
        let symbol = Symbol::builder("app", "Odd", v1())
            .level(Level::Module)
            .kind(SymbolKind::Service)
            .port(Port::input("in", TypeReference::new("string")))
            .build()
            .unwrap();
        let report = DomainValidator::validate_all(&[symbol]);
        assert_eq!(report.errors[0].rule, ValidationRule::KindLevelMismatch);
    }

    #[test]
    fn primitive_with_ports_is_an_error() {
        let symbol = Symbol::builder("types", "Money", v1())
            .kind(SymbolKind::Record)
            .port(Port::input("x", TypeReference::new("int32")))
            .build()
            .unwrap();
        let report = DomainValidator::validate_all(&[symbol]);
        assert!(
            report
                .errors
                .iter()
                .any(|e| e.rule == ValidationRule::PrimitiveWithPorts)
        );
    }

    #[test]
    fn unresolved_types_are_found_in_generics() {
        let symbol = Symbol::builder("app", "Sink", v1())
            .port(Port::input(
                "items",
                TypeReference::new("list").with_generic(TypeReference::new("types/Order@1.0.0")),
            ))
            .build()
            .unwrap();
        let report = DomainValidator::validate_all(&[symbol]);
        let unresolved: Vec<_> = report
            .errors
            .iter()
            .filter(|e| e.rule == ValidationRule::UnresolvedType)
            .collect();
        assert_eq!(unresolved.len(), 1);
        assert!(unresolved[0].message.contains("types/Order@1.0.0"));
    }

    #[test]
    fn registered_type_resolves() {
        let order = Symbol::builder("types", "Order", v1())
            .kind(SymbolKind::Record)
            .build()
            .unwrap();
        let sink = Symbol::builder("app", "Sink", v1())
            .port(Port::input("order", TypeReference::new("types/Order@1.0.0")))
            .build()
            .unwrap();
        assert!(DomainValidator::validate_all(&[order, sink]).is_valid());
    }

    #[test]
    fn missing_relationship_target_is_a_warning() {
        let symbol = Symbol::builder("app", "Child", v1())
            .port(Port::input("in", TypeReference::new("string")))
            .extends(SymbolId::parse("app/Parent@1.0.0").unwrap())
            .build()
            .unwrap();
        let report = DomainValidator::validate_all(&[symbol]);
        assert!(report.is_valid());
        assert_eq!(report.warnings[0].rule, ValidationRule::UnresolvedReference);
    }

    #[test]
    fn self_extension_is_an_error() {
        let symbol = Symbol::builder("app", "Loop", v1())
            .port(Port::input("in", TypeReference::new("string")))
            .extends(SymbolId::parse("app/Loop@1.0.0").unwrap())
            .build()
            .unwrap();
        let report = DomainValidator::validate_all(&[symbol]);
        assert!(
            report
                .errors
                .iter()
                .any(|e| e.rule == ValidationRule::SelfExtension)
        );
    }

    #[test]
    fn containment_cycle_members_are_errors() {
        let a = Symbol::builder("sys", "A", v1())
            .level(Level::Module)
            .port(Port::input("in", TypeReference::new("string")))
            .contains(SymbolId::parse("sys/B@1.0.0").unwrap())
            .build()
            .unwrap();
        let b = Symbol::builder("sys", "B", v1())
            .level(Level::Module)
            .port(Port::input("in", TypeReference::new("string")))
            .contains(SymbolId::parse("sys/A@1.0.0").unwrap())
            .build()
            .unwrap();
        let report = DomainValidator::validate_all(&[a, b]);
        assert_eq!(
            report
                .errors
                .iter()
                .filter(|e| e.rule == ValidationRule::ContainmentCycle)
                .count(),
            2
        );
    }

    #[test]
    fn portless_component_is_a_warning() {
        let symbol = Symbol::builder("app", "Empty", v1()).build().unwrap();
        let report = DomainValidator::validate_all(&[symbol]);
        assert!(report.is_valid());
        assert_eq!(report.warnings[0].rule, ValidationRule::NoPorts);
    }
}
