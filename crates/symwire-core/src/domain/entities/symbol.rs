//! Symbol aggregate: identity, ports, type references and declared
//! relationships.
//!
//! ## Identity
//!
//! A symbol is identified by `namespace/name@major.minor.patch`. The id is
//! derived from the three identity fields when the symbol is built and never
//! changes afterwards; a new version is a new symbol with a new id.
//!
//! ```text
//! acme/billing/Invoice@2.1.0
//! └────┬─────┘ └──┬──┘ └─┬─┘
//!  namespace     name  version
//! ```
//!
//! ## Relationships
//!
//! Relationship fields (`extends`, `implements`, `dependencies`,
//! `composes`, `aggregates`, `contains`) are *declared* data. They are never
//! derived from wiring and are walked by the registry accessors, not by the
//! dependency graph.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::domain::{
    error::DomainError,
    value_objects::{Direction, InjectionKind, Level, Multiplicity, Origin, Status, SymbolKind},
    version::SemVer,
};

// ── SymbolId ─────────────────────────────────────────────────────────────────

/// Globally unique symbol identity: `namespace/name@version`.
///
/// Invariant: always well-formed. Enforced at construction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolId(String);

impl SymbolId {
    /// Compose an id from its parts.
    pub fn new(namespace: &str, name: &str, version: &SemVer) -> Self {
        Self(format!("{namespace}/{name}@{version}"))
    }

    /// Parse and validate an id string.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let (namespace, name, version) = split_id(input)?;
        Ok(Self::new(namespace, name, &version))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn namespace(&self) -> &str {
        let (head, _) = self.0.rsplit_once('@').unwrap_or((&self.0, ""));
        head.rsplit_once('/').map_or("", |(ns, _)| ns)
    }

    pub fn name(&self) -> &str {
        let (head, _) = self.0.rsplit_once('@').unwrap_or((&self.0, ""));
        head.rsplit_once('/').map_or(head, |(_, name)| name)
    }

    pub fn version(&self) -> SemVer {
        self.0
            .rsplit_once('@')
            .and_then(|(_, v)| SemVer::parse(v).ok())
            .unwrap_or_default()
    }
}

fn split_id(input: &str) -> Result<(&str, &str, SemVer), DomainError> {
    let invalid = |reason: &str| DomainError::InvalidSymbolId {
        id: input.to_string(),
        reason: reason.to_string(),
    };

    let (head, version) = input
        .rsplit_once('@')
        .ok_or_else(|| invalid("missing '@version'"))?;
    let (namespace, name) = head
        .rsplit_once('/')
        .ok_or_else(|| invalid("missing 'namespace/' prefix"))?;

    if namespace.is_empty() || namespace.split('/').any(str::is_empty) {
        return Err(invalid("namespace segments cannot be empty"));
    }
    if name.is_empty() {
        return Err(invalid("name cannot be empty"));
    }
    if head.contains('@') || head.chars().any(char::is_whitespace) {
        return Err(invalid("namespace and name cannot contain '@' or whitespace"));
    }

    let version = SemVer::parse(version).map_err(|e| invalid(&e.to_string()))?;
    Ok((namespace, name, version))
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SymbolId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for SymbolId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ── TypeReference ────────────────────────────────────────────────────────────

/// Built-in type names accepted as bare type references. The last three are
/// generic containers.
pub const BUILTIN_PRIMITIVES: &[&str] = &[
    "int8", "int16", "int32", "int64", "uint8", "uint16", "uint32", "uint64", "float32",
    "float64", "bool", "string", "bytes", "void", "any", "list", "map", "set",
];

/// Reference to a type: either a registered symbol id or a built-in name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeReference {
    pub symbol_id: String,
    pub nullable: bool,
    pub generics: Vec<TypeReference>,
}

impl TypeReference {
    pub fn new(symbol_id: impl Into<String>) -> Self {
        Self {
            symbol_id: symbol_id.into(),
            nullable: false,
            generics: Vec::new(),
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn with_generic(mut self, generic: TypeReference) -> Self {
        self.generics.push(generic);
        self
    }

    /// The bare type name: the `name` segment of a full id, or the reference itself.
    pub fn type_name(&self) -> &str {
        let head = self
            .symbol_id
            .rsplit_once('@')
            .map_or(self.symbol_id.as_str(), |(h, _)| h);
        head.rsplit_once('/').map_or(head, |(_, name)| name)
    }

    pub fn is_builtin(&self) -> bool {
        BUILTIN_PRIMITIVES.contains(&self.symbol_id.as_str())
    }

    /// Iterate this reference and all nested generics, depth-first.
    pub fn walk(&self) -> impl Iterator<Item = &TypeReference> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(next.generics.iter().rev());
            Some(next)
        })
    }
}

impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol_id)?;
        if !self.generics.is_empty() {
            f.write_str("<")?;
            for (i, g) in self.generics.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{g}")?;
            }
            f.write_str(">")?;
        }
        if self.nullable {
            f.write_str("?")?;
        }
        Ok(())
    }
}

// ── Port ─────────────────────────────────────────────────────────────────────

/// A typed interaction point on a symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    pub name: String,
    pub direction: Direction,
    pub type_ref: TypeReference,
    pub required: bool,
    /// Whether more than one inbound connection is allowed.
    pub multiple: bool,
    pub description: Option<String>,
}

impl Port {
    pub fn new(name: impl Into<String>, direction: Direction, type_ref: TypeReference) -> Self {
        Self {
            name: name.into(),
            direction,
            type_ref,
            required: false,
            multiple: false,
            description: None,
        }
    }

    pub fn input(name: impl Into<String>, type_ref: TypeReference) -> Self {
        Self::new(name, Direction::In, type_ref)
    }

    pub fn output(name: impl Into<String>, type_ref: TypeReference) -> Self {
        Self::new(name, Direction::Out, type_ref)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

// ── Relationship references ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRef {
    pub target: SymbolId,
    pub injection: InjectionKind,
    pub optional: bool,
}

impl DependencyRef {
    pub fn new(target: SymbolId) -> Self {
        Self {
            target,
            injection: InjectionKind::default(),
            optional: false,
        }
    }
}

/// Target of a `composes` or `aggregates` relationship.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionRef {
    pub target: SymbolId,
    pub field: String,
    pub multiplicity: Multiplicity,
}

/// Provenance of the current status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    pub source: String,
    pub changed_at: DateTime<Utc>,
    pub note: Option<String>,
}

impl StatusInfo {
    pub fn fresh(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            changed_at: Utc::now(),
            note: None,
        }
    }
}

// ── Symbol ───────────────────────────────────────────────────────────────────

/// A versioned unit of architecture.
///
/// Identity fields are private and immutable; everything else is plain data
/// that services mutate through [`SymbolChanges`].
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    id: SymbolId,
    namespace: String,
    name: String,
    version: SemVer,

    pub level: Level,
    pub kind: SymbolKind,
    pub language: String,
    pub description: Option<String>,
    pub tags: Vec<String>,

    pub ports: Vec<Port>,

    pub extends: Option<SymbolId>,
    pub implements: Vec<SymbolId>,
    pub dependencies: Vec<DependencyRef>,
    pub composes: Vec<CompositionRef>,
    pub aggregates: Vec<CompositionRef>,
    pub contains: Vec<SymbolId>,

    pub status: Status,
    pub status_info: StatusInfo,
    pub origin: Origin,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Symbol {
    pub fn builder(
        namespace: impl Into<String>,
        name: impl Into<String>,
        version: SemVer,
    ) -> SymbolBuilder {
        SymbolBuilder::new(namespace, name, version)
    }

    pub fn id(&self) -> &SymbolId {
        &self.id
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> SemVer {
        self.version
    }

    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.name == name)
    }

    /// Ports that can receive data (`in` and `inout`).
    pub fn inputs(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter().filter(|p| p.direction.consumes())
    }

    /// Ports that can emit data (`out` and `inout`).
    pub fn outputs(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter().filter(|p| p.direction.produces())
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Case-insensitive substring match over name, namespace, id,
    /// description and tags.
    pub fn matches_text(&self, text: &str) -> bool {
        let needle = text.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self.namespace.to_lowercase().contains(&needle)
            || self.id.as_str().to_lowercase().contains(&needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
            || self.tags.iter().any(|t| t.to_lowercase().contains(&needle))
    }

    /// Every symbol id this symbol declares a relationship to.
    pub fn referenced_ids(&self) -> Vec<(&'static str, &SymbolId)> {
        let mut refs = Vec::new();
        if let Some(parent) = &self.extends {
            refs.push(("extends", parent));
        }
        refs.extend(self.implements.iter().map(|id| ("implements", id)));
        refs.extend(self.dependencies.iter().map(|d| ("dependencies", &d.target)));
        refs.extend(self.composes.iter().map(|c| ("composes", &c.target)));
        refs.extend(self.aggregates.iter().map(|c| ("aggregates", &c.target)));
        refs.extend(self.contains.iter().map(|id| ("contains", id)));
        refs
    }

    /// Copy of this symbol under a new version, with a freshly minted id.
    pub(crate) fn with_version(&self, version: SemVer) -> Self {
        let mut next = self.clone();
        next.version = version;
        next.id = SymbolId::new(&self.namespace, &self.name, &version);
        next
    }
}

// ── SymbolBuilder ────────────────────────────────────────────────────────────

/// Builder for [`Symbol`]. Validates identity and port uniqueness on `build`.
#[derive(Debug, Clone)]
pub struct SymbolBuilder {
    namespace: String,
    name: String,
    version: SemVer,
    id: Option<String>,
    level: Option<Level>,
    kind: Option<SymbolKind>,
    language: String,
    description: Option<String>,
    tags: Vec<String>,
    ports: Vec<Port>,
    extends: Option<SymbolId>,
    implements: Vec<SymbolId>,
    dependencies: Vec<DependencyRef>,
    composes: Vec<CompositionRef>,
    aggregates: Vec<CompositionRef>,
    contains: Vec<SymbolId>,
    status: Status,
    status_info: Option<StatusInfo>,
    origin: Origin,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl SymbolBuilder {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, version: SemVer) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            version,
            id: None,
            level: None,
            kind: None,
            language: "typescript".into(),
            description: None,
            tags: Vec::new(),
            ports: Vec::new(),
            extends: None,
            implements: Vec::new(),
            dependencies: Vec::new(),
            composes: Vec::new(),
            aggregates: Vec::new(),
            contains: Vec::new(),
            status: Status::Declared,
            status_info: None,
            origin: Origin::Manual,
            created_at: None,
            updated_at: None,
        }
    }

    /// Explicit id; must equal the derived one.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    pub fn kind(mut self, kind: SymbolKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn port(mut self, port: Port) -> Self {
        self.ports.push(port);
        self
    }

    pub fn ports(mut self, ports: impl IntoIterator<Item = Port>) -> Self {
        self.ports.extend(ports);
        self
    }

    pub fn extends(mut self, parent: SymbolId) -> Self {
        self.extends = Some(parent);
        self
    }

    pub fn implements(mut self, contract: SymbolId) -> Self {
        self.implements.push(contract);
        self
    }

    pub fn depends_on(mut self, dependency: DependencyRef) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn composes(mut self, part: CompositionRef) -> Self {
        self.composes.push(part);
        self
    }

    pub fn aggregates(mut self, part: CompositionRef) -> Self {
        self.aggregates.push(part);
        self
    }

    pub fn contains(mut self, child: SymbolId) -> Self {
        self.contains.push(child);
        self
    }

    pub fn status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn status_info(mut self, info: StatusInfo) -> Self {
        self.status_info = Some(info);
        self
    }

    pub fn origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    pub fn updated_at(mut self, at: DateTime<Utc>) -> Self {
        self.updated_at = Some(at);
        self
    }

    pub fn build(self) -> Result<Symbol, DomainError> {
        if self.namespace.trim().is_empty() {
            return Err(DomainError::MissingRequiredField { field: "namespace" });
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::MissingRequiredField { field: "name" });
        }

        // Round-trip through the parser so malformed namespaces/names are rejected.
        let derived = SymbolId::parse(&SymbolId::new(&self.namespace, &self.name, &self.version).0)?;
        if let Some(given) = self.id {
            if given != derived.as_str() {
                return Err(DomainError::IdentityMismatch {
                    given,
                    derived: derived.to_string(),
                });
            }
        }

        let mut seen = HashSet::new();
        for port in &self.ports {
            if port.name.trim().is_empty() {
                return Err(DomainError::MissingRequiredField { field: "port.name" });
            }
            if !seen.insert(port.name.as_str()) {
                return Err(DomainError::DuplicatePort {
                    symbol: derived.to_string(),
                    port: port.name.clone(),
                });
            }
        }

        let (level, kind) = match (self.level, self.kind) {
            (Some(level), Some(kind)) => (level, kind),
            (Some(level), None) => (level, SymbolKind::default_for(level)),
            (None, Some(kind)) => (kind.level(), kind),
            (None, None) => (Level::Component, SymbolKind::Component),
        };

        let now = Utc::now();
        let created_at = self.created_at.unwrap_or(now);
        Ok(Symbol {
            id: derived,
            namespace: self.namespace,
            name: self.name,
            version: self.version,
            level,
            kind,
            language: self.language,
            description: self.description,
            tags: self.tags,
            ports: self.ports,
            extends: self.extends,
            implements: self.implements,
            dependencies: self.dependencies,
            composes: self.composes,
            aggregates: self.aggregates,
            contains: self.contains,
            status: self.status,
            status_info: self
                .status_info
                .unwrap_or_else(|| StatusInfo::fresh("registry")),
            origin: self.origin,
            created_at,
            updated_at: self.updated_at.unwrap_or(created_at),
        })
    }
}

// ── SymbolChanges ────────────────────────────────────────────────────────────

/// Partial update of a symbol's mutable fields. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolChanges {
    pub level: Option<Level>,
    pub kind: Option<SymbolKind>,
    pub language: Option<String>,
    pub description: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub ports: Option<Vec<Port>>,
    pub extends: Option<Option<SymbolId>>,
    pub implements: Option<Vec<SymbolId>>,
    pub dependencies: Option<Vec<DependencyRef>>,
    pub composes: Option<Vec<CompositionRef>>,
    pub aggregates: Option<Vec<CompositionRef>>,
    pub contains: Option<Vec<SymbolId>>,
    pub status: Option<Status>,
    pub origin: Option<Origin>,
}

impl SymbolChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply onto `symbol`, rejecting duplicate port names.
    pub fn apply(self, symbol: &mut Symbol) -> Result<(), DomainError> {
        if let Some(ports) = &self.ports {
            let mut seen = HashSet::new();
            for port in ports {
                if !seen.insert(port.name.as_str()) {
                    return Err(DomainError::DuplicatePort {
                        symbol: symbol.id.to_string(),
                        port: port.name.clone(),
                    });
                }
            }
        }

        if let Some(level) = self.level {
            symbol.level = level;
        }
        if let Some(kind) = self.kind {
            symbol.kind = kind;
        }
        if let Some(language) = self.language {
            symbol.language = language;
        }
        if let Some(description) = self.description {
            symbol.description = description;
        }
        if let Some(tags) = self.tags {
            symbol.tags = tags;
        }
        if let Some(ports) = self.ports {
            symbol.ports = ports;
        }
        if let Some(extends) = self.extends {
            symbol.extends = extends;
        }
        if let Some(implements) = self.implements {
            symbol.implements = implements;
        }
        if let Some(dependencies) = self.dependencies {
            symbol.dependencies = dependencies;
        }
        if let Some(composes) = self.composes {
            symbol.composes = composes;
        }
        if let Some(aggregates) = self.aggregates {
            symbol.aggregates = aggregates;
        }
        if let Some(contains) = self.contains {
            symbol.contains = contains;
        }
        if let Some(status) = self.status {
            symbol.status = status;
        }
        if let Some(origin) = self.origin {
            symbol.origin = origin;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_round_trips_nested_namespaces() {
        let id = SymbolId::parse("acme/billing/Invoice@2.1.0").unwrap();
        assert_eq!(id.namespace(), "acme/billing");
        assert_eq!(id.name(), "Invoice");
        assert_eq!(id.version(), SemVer::new(2, 1, 0));
    }

    #[test]
    fn id_rejects_malformed_input() {
        assert!(SymbolId::parse("Invoice@1.0.0").is_err());
        assert!(SymbolId::parse("acme/Invoice").is_err());
        assert!(SymbolId::parse("acme//Invoice@1.0.0").is_err());
        assert!(SymbolId::parse("acme/@1.0.0").is_err());
        assert!(SymbolId::parse("acme/Invoice@1.0").is_err());
    }

    #[test]
    fn builder_derives_id() {
        let symbol = Symbol::builder("acme", "Parser", SemVer::new(1, 0, 0))
            .build()
            .unwrap();
        assert_eq!(symbol.id().as_str(), "acme/Parser@1.0.0");
        assert_eq!(symbol.level, Level::Component);
        assert_eq!(symbol.status, Status::Declared);
    }

    #[test]
    fn builder_infers_level_from_kind() {
        let symbol = Symbol::builder("acme", "Shape", SemVer::new(1, 0, 0))
            .kind(SymbolKind::Record)
            .build()
            .unwrap();
        assert_eq!(symbol.level, Level::Primitive);
    }

    #[test]
    fn builder_rejects_mismatched_explicit_id() {
        let result = Symbol::builder("acme", "Parser", SemVer::new(1, 0, 0))
            .id("acme/Lexer@1.0.0")
            .build();
        assert!(matches!(result, Err(DomainError::IdentityMismatch { .. })));
    }

    #[test]
    fn builder_rejects_duplicate_ports() {
        let result = Symbol::builder("acme", "Parser", SemVer::new(1, 0, 0))
            .port(Port::input("src", TypeReference::new("string")))
            .port(Port::output("src", TypeReference::new("string")))
            .build();
        assert!(matches!(result, Err(DomainError::DuplicatePort { .. })));
    }

    #[test]
    fn inout_ports_count_as_inputs_and_outputs() {
        let symbol = Symbol::builder("acme", "Cache", SemVer::new(1, 0, 0))
            .port(Port::new("slot", Direction::InOut, TypeReference::new("bytes")))
            .port(Port::input("key", TypeReference::new("string")))
            .build()
            .unwrap();
        assert_eq!(symbol.inputs().count(), 2);
        assert_eq!(symbol.outputs().count(), 1);
    }

    #[test]
    fn type_name_strips_namespace_and_version() {
        assert_eq!(TypeReference::new("std/int32@1.0.0").type_name(), "int32");
        assert_eq!(TypeReference::new("int32").type_name(), "int32");
        assert!(TypeReference::new("int32").is_builtin());
    }

    #[test]
    fn type_reference_display() {
        let t = TypeReference::new("list")
            .with_generic(TypeReference::new("int32").nullable())
            .nullable();
        assert_eq!(t.to_string(), "list<int32?>?");
        assert_eq!(t.walk().count(), 2);
    }

    #[test]
    fn changes_apply_only_given_fields() {
        let mut symbol = Symbol::builder("acme", "Parser", SemVer::new(1, 0, 0))
            .description("old")
            .tag("core")
            .build()
            .unwrap();
        SymbolChanges {
            description: Some(Some("new".into())),
            ..Default::default()
        }
        .apply(&mut symbol)
        .unwrap();
        assert_eq!(symbol.description.as_deref(), Some("new"));
        assert_eq!(symbol.tags, vec!["core".to_string()]);
    }
}
