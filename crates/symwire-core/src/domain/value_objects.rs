//! Domain value objects: Direction, Level, SymbolKind, Status, Origin and
//! the small enums used by relationships and versioning.
//!
//! # Design
//!
//! These are plain `Copy` value types with no identity.
//! This file's only job is to define the types, their string
//! representations, and their `FromStr` parsers. Rules that relate them
//! (which kind lives on which level, which directions may be wired) live in
//! `symbol.rs` and `compatibility.rs`.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Direction ────────────────────────────────────────────────────────────────

/// Flow direction of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
    InOut,
}

impl Direction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
            Self::InOut => "inout",
        }
    }

    /// Whether data can arrive through this port.
    pub const fn consumes(self) -> bool {
        matches!(self, Self::In | Self::InOut)
    }

    /// Whether data can leave through this port.
    pub const fn produces(self) -> bool {
        matches!(self, Self::Out | Self::InOut)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "in" | "input" => Ok(Self::In),
            "out" | "output" => Ok(Self::Out),
            "inout" | "in-out" | "bidirectional" => Ok(Self::InOut),
            other => Err(DomainError::UnknownValue {
                field: "direction",
                value: other.to_string(),
            }),
        }
    }
}

// ── Level ────────────────────────────────────────────────────────────────────

/// Abstraction tier, ordered from primitive type (L0) to interface contract (L4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Level {
    #[serde(rename = "L0")]
    Primitive,
    #[serde(rename = "L1")]
    Component,
    #[serde(rename = "L2")]
    Module,
    #[serde(rename = "L3")]
    Subsystem,
    #[serde(rename = "L4")]
    Contract,
}

impl Level {
    pub const ALL: [Level; 5] = [
        Self::Primitive,
        Self::Component,
        Self::Module,
        Self::Subsystem,
        Self::Contract,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Primitive => "L0",
            Self::Component => "L1",
            Self::Module => "L2",
            Self::Subsystem => "L3",
            Self::Contract => "L4",
        }
    }

    pub const fn ordinal(self) -> u8 {
        match self {
            Self::Primitive => 0,
            Self::Component => 1,
            Self::Module => 2,
            Self::Subsystem => 3,
            Self::Contract => 4,
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Primitive => "primitive type",
            Self::Component => "component",
            Self::Module => "module",
            Self::Subsystem => "subsystem",
            Self::Contract => "interface contract",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "l0" | "0" | "primitive" => Ok(Self::Primitive),
            "l1" | "1" | "component" => Ok(Self::Component),
            "l2" | "2" | "module" => Ok(Self::Module),
            "l3" | "3" | "subsystem" => Ok(Self::Subsystem),
            "l4" | "4" | "contract" | "interface" => Ok(Self::Contract),
            other => Err(DomainError::UnknownValue {
                field: "level",
                value: other.to_string(),
            }),
        }
    }
}

// ── SymbolKind ───────────────────────────────────────────────────────────────

/// Role of a symbol within its tier.
///
/// Every kind belongs to exactly one [`Level`]; see [`SymbolKind::level`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Primitive,
    Enum,
    Record,
    Component,
    Service,
    Adapter,
    Module,
    Subsystem,
    Interface,
    Contract,
}

impl SymbolKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Primitive => "primitive",
            Self::Enum => "enum",
            Self::Record => "record",
            Self::Component => "component",
            Self::Service => "service",
            Self::Adapter => "adapter",
            Self::Module => "module",
            Self::Subsystem => "subsystem",
            Self::Interface => "interface",
            Self::Contract => "contract",
        }
    }

    /// The tier this kind belongs to.
    pub const fn level(self) -> Level {
        match self {
            Self::Primitive | Self::Enum | Self::Record => Level::Primitive,
            Self::Component | Self::Service | Self::Adapter => Level::Component,
            Self::Module => Level::Module,
            Self::Subsystem => Level::Subsystem,
            Self::Interface | Self::Contract => Level::Contract,
        }
    }

    /// Default kind for a level when none is given.
    pub const fn default_for(level: Level) -> Self {
        match level {
            Level::Primitive => Self::Primitive,
            Level::Component => Self::Component,
            Level::Module => Self::Module,
            Level::Subsystem => Self::Subsystem,
            Level::Contract => Self::Interface,
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SymbolKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "primitive" | "type" => Ok(Self::Primitive),
            "enum" => Ok(Self::Enum),
            "record" | "struct" => Ok(Self::Record),
            "component" => Ok(Self::Component),
            "service" => Ok(Self::Service),
            "adapter" => Ok(Self::Adapter),
            "module" => Ok(Self::Module),
            "subsystem" => Ok(Self::Subsystem),
            "interface" => Ok(Self::Interface),
            "contract" => Ok(Self::Contract),
            other => Err(DomainError::UnknownValue {
                field: "kind",
                value: other.to_string(),
            }),
        }
    }
}

// ── Status / Origin ──────────────────────────────────────────────────────────

/// Lifecycle status, ordered declared → referenced → tested → executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Declared,
    Referenced,
    Tested,
    Executed,
}

impl Status {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Declared => "declared",
            Self::Referenced => "referenced",
            Self::Tested => "tested",
            Self::Executed => "executed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "declared" => Ok(Self::Declared),
            "referenced" => Ok(Self::Referenced),
            "tested" => Ok(Self::Tested),
            "executed" => Ok(Self::Executed),
            other => Err(DomainError::UnknownValue {
                field: "status",
                value: other.to_string(),
            }),
        }
    }
}

/// How a symbol came into the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    #[default]
    Manual,
    Generated,
}

impl Origin {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Generated => "generated",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Origin {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "manual" => Ok(Self::Manual),
            "generated" => Ok(Self::Generated),
            other => Err(DomainError::UnknownValue {
                field: "origin",
                value: other.to_string(),
            }),
        }
    }
}

// ── Relationship enums ───────────────────────────────────────────────────────

/// How a dependency is handed to the dependent symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InjectionKind {
    #[default]
    Constructor,
    Property,
    Method,
}

impl InjectionKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Constructor => "constructor",
            Self::Property => "property",
            Self::Method => "method",
        }
    }
}

impl FromStr for InjectionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "constructor" => Ok(Self::Constructor),
            "property" => Ok(Self::Property),
            "method" => Ok(Self::Method),
            other => Err(DomainError::UnknownValue {
                field: "injection",
                value: other.to_string(),
            }),
        }
    }
}

/// Cardinality of a composition/aggregation field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Multiplicity {
    #[default]
    #[serde(rename = "1")]
    One,
    #[serde(rename = "0..1")]
    Optional,
    #[serde(rename = "*")]
    Many,
}

impl Multiplicity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::One => "1",
            Self::Optional => "0..1",
            Self::Many => "*",
        }
    }
}

impl FromStr for Multiplicity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" | "one" => Ok(Self::One),
            "0..1" | "?" | "optional" => Ok(Self::Optional),
            "*" | "0..*" | "1..*" | "many" => Ok(Self::Many),
            other => Err(DomainError::UnknownValue {
                field: "multiplicity",
                value: other.to_string(),
            }),
        }
    }
}

// ── Versioning / checking modes ──────────────────────────────────────────────

/// Which component of a version to increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpType {
    Major,
    Minor,
    Patch,
}

impl FromStr for BumpType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "major" => Ok(Self::Major),
            "minor" => Ok(Self::Minor),
            "patch" => Ok(Self::Patch),
            other => Err(DomainError::UnknownValue {
                field: "bump type",
                value: other.to_string(),
            }),
        }
    }
}

/// Strictness of type compatibility checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeCheckMode {
    Strict,
    #[default]
    Compatible,
}

impl fmt::Display for TypeCheckMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => f.write_str("strict"),
            Self::Compatible => f.write_str("compatible"),
        }
    }
}

impl FromStr for TypeCheckMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "compatible" => Ok(Self::Compatible),
            other => Err(DomainError::UnknownValue {
                field: "type check mode",
                value: other.to_string(),
            }),
        }
    }
}
