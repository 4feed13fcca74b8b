// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for symwire.
//!
//! This module contains the pure model and its algorithms. All persistence,
//! filesystem and code emission concerns are handled via ports (traits)
//! defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Bounded traversal**: Every graph and type walk is iterative
//! - **Rich domain model**: Version math, compatibility and graph queries
//!   live here, not in services
//!
// Public API - what the world sees
pub mod compatibility;
pub mod containment;
pub mod entities;
pub mod error;
pub mod graph;
pub mod validation;
pub mod value_objects;
pub mod version;

// Re-exports for convenience
pub use compatibility::{
    CompatibilityResult, MAX_TYPE_DEPTH, check_direction_compatibility,
    check_port_compatibility, check_type_compatibility,
};
pub use containment::find_containment_cycles;
pub use entities::{
    BUILTIN_PRIMITIVES, CompositionRef, Connection, ConnectionId, ConnectionRequest,
    DependencyRef, Port, StatusInfo, Symbol, SymbolBuilder, SymbolChanges, SymbolId,
    TypeReference,
};
pub use error::DomainError;
pub use graph::{DependencyGraph, DirectNeighbours, GraphEdge, GraphNode, GraphStats};
pub use validation::{
    DomainValidator, ValidationContext, ValidationIssue, ValidationReport, ValidationRule,
};
pub use value_objects::{
    BumpType, Direction, InjectionKind, Level, Multiplicity, Origin, Status, SymbolKind,
    TypeCheckMode,
};
pub use version::{SemVer, VersionRange, bump_version, find_best_match, parse_constraint, satisfies};

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    // ========================================================================
    // Value Object Tests
    // ========================================================================

    #[test]
    fn direction_parses_aliases() {
        assert_eq!(Direction::from_str("in").unwrap(), Direction::In);
        assert_eq!(Direction::from_str("OUTPUT").unwrap(), Direction::Out);
        assert_eq!(Direction::from_str("inout").unwrap(), Direction::InOut);
        assert!(Direction::from_str("sideways").is_err());
    }

    #[test]
    fn level_round_trips_through_text() {
        for level in Level::ALL {
            assert_eq!(Level::from_str(level.as_str()).unwrap(), level);
        }
        assert!(Level::Primitive < Level::Contract);
    }

    #[test]
    fn every_kind_maps_back_to_its_default_level() {
        for level in Level::ALL {
            assert_eq!(SymbolKind::default_for(level).level(), level);
        }
        assert_eq!(SymbolKind::Adapter.level(), Level::Component);
        assert_eq!(SymbolKind::Enum.level(), Level::Primitive);
    }

    #[test]
    fn status_is_ordered_by_lifecycle() {
        assert!(Status::Declared < Status::Referenced);
        assert!(Status::Tested < Status::Executed);
        assert_eq!(Status::default(), Status::Declared);
    }

    #[test]
    fn unknown_values_name_the_field() {
        let err = SymbolKind::from_str("widget").unwrap_err();
        assert!(err.to_string().contains("kind"));
        assert!(!err.suggestions().is_empty());
    }

    // ========================================================================
    // Cross-module Tests
    // ========================================================================

    #[test]
    fn wired_symbols_build_an_ordered_graph() {
        let v = SemVer::new(1, 0, 0);
        let producer = Symbol::builder("app", "Producer", v)
            .port(Port::output("out", TypeReference::new("int32")))
            .build()
            .unwrap();
        let consumer = Symbol::builder("app", "Consumer", v)
            .port(Port::input("in", TypeReference::new("int64")))
            .build()
            .unwrap();

        let result = check_port_compatibility(
            producer.port("out").unwrap(),
            consumer.port("in").unwrap(),
            TypeCheckMode::Compatible,
        );
        assert!(result.compatible);

        let connection = Connection::from_request(ConnectionRequest::new(
            producer.id().clone(),
            "out",
            consumer.id().clone(),
            "in",
        ));
        let graph = DependencyGraph::build([&producer, &consumer], [&connection]);
        assert_eq!(
            graph.topological_order().unwrap(),
            &[producer.id().clone(), consumer.id().clone()]
        );
    }

    #[test]
    fn new_version_mints_new_identity() {
        let symbol = Symbol::builder("app", "Svc", SemVer::new(1, 2, 3))
            .build()
            .unwrap();
        let next = symbol.with_version(bump_version(symbol.version(), BumpType::Minor).unwrap());
        assert_eq!(next.id().as_str(), "app/Svc@1.3.0");
        assert_ne!(next.id(), symbol.id());
    }
}
