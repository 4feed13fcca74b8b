//! Wire-level data transfer objects.
//!
//! Every DTO is camelCase, uses arrays instead of maps and carries
//! timestamps as RFC 3339 strings. Conversions to and from the domain are
//! written out per type; there is no generic reflection layer.
//!
//! Inbound conversions (`TryFrom<Dto>`) validate ids and versions and fail
//! with a [`DomainError`]. Outbound conversions (`From<&Domain>`) cannot fail.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    application::services::{
        BatchOutcome, BatchResult, ConnectionValidation, GenerationResult, ImportSummary,
        PortMatch, UnconnectedPort,
    },
    domain::{
        CompositionRef, Connection, ConnectionId, ConnectionRequest, DependencyGraph,
        DependencyRef, Direction, DirectNeighbours, DomainError, GraphStats, InjectionKind, Level,
        Multiplicity, Origin, Port, SemVer, Status, StatusInfo, Symbol, SymbolChanges, SymbolId,
        SymbolKind, TypeReference, ValidationIssue, ValidationReport,
    },
};

fn default_language() -> String {
    "typescript".into()
}

fn ids(list: &[SymbolId]) -> Vec<String> {
    list.iter().map(ToString::to_string).collect()
}

fn parse_ids(list: Vec<String>) -> Result<Vec<SymbolId>, DomainError> {
    list.iter().map(|s| SymbolId::parse(s)).collect()
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}

// ── Type references and ports ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeReferenceDto {
    pub symbol_id: String,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generics: Vec<TypeReferenceDto>,
}

impl From<&TypeReference> for TypeReferenceDto {
    fn from(t: &TypeReference) -> Self {
        Self {
            symbol_id: t.symbol_id.clone(),
            nullable: t.nullable,
            generics: t.generics.iter().map(Self::from).collect(),
        }
    }
}

impl From<TypeReferenceDto> for TypeReference {
    fn from(dto: TypeReferenceDto) -> Self {
        Self {
            symbol_id: dto.symbol_id,
            nullable: dto.nullable,
            generics: dto.generics.into_iter().map(Self::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortDto {
    pub name: String,
    pub direction: Direction,
    #[serde(rename = "type")]
    pub type_ref: TypeReferenceDto,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub multiple: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&Port> for PortDto {
    fn from(p: &Port) -> Self {
        Self {
            name: p.name.clone(),
            direction: p.direction,
            type_ref: TypeReferenceDto::from(&p.type_ref),
            required: p.required,
            multiple: p.multiple,
            description: p.description.clone(),
        }
    }
}

impl From<PortDto> for Port {
    fn from(dto: PortDto) -> Self {
        Self {
            name: dto.name,
            direction: dto.direction,
            type_ref: dto.type_ref.into(),
            required: dto.required,
            multiple: dto.multiple,
            description: dto.description,
        }
    }
}

// ── Relationship references ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyRefDto {
    pub target: String,
    #[serde(default)]
    pub injection: InjectionKind,
    #[serde(default)]
    pub optional: bool,
}

impl From<&DependencyRef> for DependencyRefDto {
    fn from(d: &DependencyRef) -> Self {
        Self {
            target: d.target.to_string(),
            injection: d.injection,
            optional: d.optional,
        }
    }
}

impl TryFrom<DependencyRefDto> for DependencyRef {
    type Error = DomainError;

    fn try_from(dto: DependencyRefDto) -> Result<Self, Self::Error> {
        Ok(Self {
            target: SymbolId::parse(&dto.target)?,
            injection: dto.injection,
            optional: dto.optional,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionRefDto {
    pub target: String,
    pub field: String,
    #[serde(default)]
    pub multiplicity: Multiplicity,
}

impl From<&CompositionRef> for CompositionRefDto {
    fn from(c: &CompositionRef) -> Self {
        Self {
            target: c.target.to_string(),
            field: c.field.clone(),
            multiplicity: c.multiplicity,
        }
    }
}

impl TryFrom<CompositionRefDto> for CompositionRef {
    type Error = DomainError;

    fn try_from(dto: CompositionRefDto) -> Result<Self, Self::Error> {
        Ok(Self {
            target: SymbolId::parse(&dto.target)?,
            field: dto.field,
            multiplicity: dto.multiplicity,
        })
    }
}

fn compositions(list: Vec<CompositionRefDto>) -> Result<Vec<CompositionRef>, DomainError> {
    list.into_iter().map(CompositionRef::try_from).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusInfoDto {
    pub source: String,
    pub changed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl From<&StatusInfo> for StatusInfoDto {
    fn from(s: &StatusInfo) -> Self {
        Self {
            source: s.source.clone(),
            changed_at: s.changed_at,
            note: s.note.clone(),
        }
    }
}

impl From<StatusInfoDto> for StatusInfo {
    fn from(dto: StatusInfoDto) -> Self {
        Self {
            source: dto.source,
            changed_at: dto.changed_at,
            note: dto.note,
        }
    }
}

// ── Symbol ───────────────────────────────────────────────────────────────────

/// A symbol on the wire.
///
/// On input only `namespace`, `name` and `version` are mandatory; `id`, when
/// given, must match the derived identity. `level`/`kind` default from each
/// other the same way [`crate::domain::SymbolBuilder`] does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub namespace: String,
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<SymbolKind>,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub ports: Vec<PortDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    #[serde(default)]
    pub implements: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<DependencyRefDto>,
    #[serde(default)]
    pub composes: Vec<CompositionRefDto>,
    #[serde(default)]
    pub aggregates: Vec<CompositionRefDto>,
    #[serde(default)]
    pub contains: Vec<String>,
    #[serde(default)]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_info: Option<StatusInfoDto>,
    #[serde(default)]
    pub origin: Origin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&Symbol> for SymbolDto {
    fn from(s: &Symbol) -> Self {
        Self {
            id: Some(s.id().to_string()),
            namespace: s.namespace().to_string(),
            name: s.name().to_string(),
            version: s.version().to_string(),
            level: Some(s.level),
            kind: Some(s.kind),
            language: s.language.clone(),
            description: s.description.clone(),
            tags: s.tags.clone(),
            ports: s.ports.iter().map(PortDto::from).collect(),
            extends: s.extends.as_ref().map(ToString::to_string),
            implements: ids(&s.implements),
            dependencies: s.dependencies.iter().map(DependencyRefDto::from).collect(),
            composes: s.composes.iter().map(CompositionRefDto::from).collect(),
            aggregates: s.aggregates.iter().map(CompositionRefDto::from).collect(),
            contains: ids(&s.contains),
            status: s.status,
            status_info: Some(StatusInfoDto::from(&s.status_info)),
            origin: s.origin,
            created_at: Some(s.created_at),
            updated_at: Some(s.updated_at),
        }
    }
}

impl TryFrom<SymbolDto> for Symbol {
    type Error = DomainError;

    fn try_from(dto: SymbolDto) -> Result<Self, Self::Error> {
        let version = SemVer::parse(&dto.version)?;
        let mut builder = Symbol::builder(dto.namespace, dto.name, version)
            .language(dto.language)
            .ports(dto.ports.into_iter().map(Port::from))
            .status(dto.status)
            .origin(dto.origin);

        if let Some(id) = dto.id {
            builder = builder.id(id);
        }
        if let Some(level) = dto.level {
            builder = builder.level(level);
        }
        if let Some(kind) = dto.kind {
            builder = builder.kind(kind);
        }
        if let Some(description) = dto.description {
            builder = builder.description(description);
        }
        for tag in dto.tags {
            builder = builder.tag(tag);
        }
        if let Some(parent) = dto.extends {
            builder = builder.extends(SymbolId::parse(&parent)?);
        }
        for contract in parse_ids(dto.implements)? {
            builder = builder.implements(contract);
        }
        for dependency in dto.dependencies {
            builder = builder.depends_on(dependency.try_into()?);
        }
        for part in compositions(dto.composes)? {
            builder = builder.composes(part);
        }
        for part in compositions(dto.aggregates)? {
            builder = builder.aggregates(part);
        }
        for child in parse_ids(dto.contains)? {
            builder = builder.contains(child);
        }
        if let Some(info) = dto.status_info {
            builder = builder.status_info(info.into());
        }
        if let Some(at) = dto.created_at {
            builder = builder.created_at(at);
        }
        if let Some(at) = dto.updated_at {
            builder = builder.updated_at(at);
        }
        builder.build()
    }
}

/// Partial update on the wire. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SymbolChangesDto {
    pub level: Option<Level>,
    pub kind: Option<SymbolKind>,
    pub language: Option<String>,
    pub description: Option<String>,
    /// Clear the description; wins over `description`.
    pub clear_description: bool,
    pub tags: Option<Vec<String>>,
    pub ports: Option<Vec<PortDto>>,
    pub extends: Option<String>,
    /// Clear the parent; wins over `extends`.
    pub clear_extends: bool,
    pub implements: Option<Vec<String>>,
    pub dependencies: Option<Vec<DependencyRefDto>>,
    pub composes: Option<Vec<CompositionRefDto>>,
    pub aggregates: Option<Vec<CompositionRefDto>>,
    pub contains: Option<Vec<String>>,
    pub status: Option<Status>,
    pub origin: Option<Origin>,
}

impl TryFrom<SymbolChangesDto> for SymbolChanges {
    type Error = DomainError;

    fn try_from(dto: SymbolChangesDto) -> Result<Self, Self::Error> {
        let description = if dto.clear_description {
            Some(None)
        } else {
            dto.description.map(Some)
        };
        let extends = if dto.clear_extends {
            Some(None)
        } else {
            dto.extends.map(|p| SymbolId::parse(&p)).transpose()?.map(Some)
        };

        Ok(Self {
            level: dto.level,
            kind: dto.kind,
            language: dto.language,
            description,
            tags: dto.tags,
            ports: dto
                .ports
                .map(|ports| ports.into_iter().map(Port::from).collect()),
            extends,
            implements: dto.implements.map(parse_ids).transpose()?,
            dependencies: dto
                .dependencies
                .map(|deps| deps.into_iter().map(DependencyRef::try_from).collect())
                .transpose()?,
            composes: dto.composes.map(compositions).transpose()?,
            aggregates: dto.aggregates.map(compositions).transpose()?,
            contains: dto.contains.map(parse_ids).transpose()?,
            status: dto.status,
            origin: dto.origin,
        })
    }
}

// ── Connections ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRequestDto {
    pub from_symbol_id: String,
    pub from_port: String,
    pub to_symbol_id: String,
    pub to_port: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,
}

impl TryFrom<ConnectionRequestDto> for ConnectionRequest {
    type Error = DomainError;

    fn try_from(dto: ConnectionRequestDto) -> Result<Self, Self::Error> {
        Ok(Self {
            from_symbol: SymbolId::parse(&dto.from_symbol_id)?,
            from_port: dto.from_port,
            to_symbol: SymbolId::parse(&dto.to_symbol_id)?,
            to_port: dto.to_port,
            transform: dto.transform,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDto {
    pub id: String,
    pub from_symbol_id: String,
    pub from_port: String,
    pub to_symbol_id: String,
    pub to_port: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Connection> for ConnectionDto {
    fn from(c: &Connection) -> Self {
        Self {
            id: c.id.to_string(),
            from_symbol_id: c.from_symbol.to_string(),
            from_port: c.from_port.clone(),
            to_symbol_id: c.to_symbol.to_string(),
            to_port: c.to_port.clone(),
            transform: c.transform.clone(),
            created_at: c.created_at,
        }
    }
}

/// Restores a persisted connection. Only stores should need this.
impl TryFrom<ConnectionDto> for Connection {
    type Error = DomainError;

    fn try_from(dto: ConnectionDto) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ConnectionId::from_string(dto.id),
            from_symbol: SymbolId::parse(&dto.from_symbol_id)?,
            from_port: dto.from_port,
            to_symbol: SymbolId::parse(&dto.to_symbol_id)?,
            to_port: dto.to_port,
            transform: dto.transform,
            created_at: dto.created_at,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionValidationDto {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub score: u8,
}

impl From<ConnectionValidation> for ConnectionValidationDto {
    fn from(v: ConnectionValidation) -> Self {
        Self {
            valid: v.valid,
            errors: v.errors,
            warnings: v.warnings,
            score: v.score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortMatchDto {
    pub port: String,
    pub score: u8,
    pub notes: Vec<String>,
}

impl From<PortMatch> for PortMatchDto {
    fn from(m: PortMatch) -> Self {
        Self {
            port: m.port,
            score: m.score,
            notes: m.notes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnconnectedPortDto {
    pub symbol_id: String,
    pub port: String,
}

impl From<UnconnectedPort> for UnconnectedPortDto {
    fn from(u: UnconnectedPort) -> Self {
        Self {
            symbol_id: u.symbol_id.to_string(),
            port: u.port,
        }
    }
}

// ── Graph ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNodeDto {
    pub id: String,
    pub namespace: String,
    pub name: String,
    pub level: Level,
    pub kind: SymbolKind,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdgeDto {
    pub connection_id: String,
    pub from: String,
    pub from_port: String,
    pub to: String,
    pub to_port: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphDto {
    pub nodes: Vec<GraphNodeDto>,
    pub edges: Vec<GraphEdgeDto>,
    pub cycles: Vec<Vec<String>>,
    /// `null` when the graph is cyclic.
    pub topological_order: Option<Vec<String>>,
}

impl From<&DependencyGraph> for GraphDto {
    fn from(graph: &DependencyGraph) -> Self {
        Self {
            nodes: graph
                .nodes()
                .map(|n| GraphNodeDto {
                    id: n.id.to_string(),
                    namespace: n.namespace.clone(),
                    name: n.name.clone(),
                    level: n.level,
                    kind: n.kind,
                    inputs: n.inputs.clone(),
                    outputs: n.outputs.clone(),
                })
                .collect(),
            edges: graph
                .edges()
                .map(|e| GraphEdgeDto {
                    connection_id: e.connection_id.to_string(),
                    from: e.from.to_string(),
                    from_port: e.from_port.clone(),
                    to: e.to.to_string(),
                    to_port: e.to_port.clone(),
                })
                .collect(),
            cycles: graph.cycles().iter().map(|c| ids(c)).collect(),
            topological_order: graph.topological_order().map(ids),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectNeighboursDto {
    pub upstream: Vec<String>,
    pub downstream: Vec<String>,
}

impl From<DirectNeighbours> for DirectNeighboursDto {
    fn from(d: DirectNeighbours) -> Self {
        Self {
            upstream: ids(&d.upstream),
            downstream: ids(&d.downstream),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStatsDto {
    pub node_count: usize,
    pub edge_count: usize,
    pub cycle_count: usize,
    pub root_count: usize,
    pub leaf_count: usize,
    pub component_count: usize,
    pub max_depth: usize,
    pub is_acyclic: bool,
}

impl From<GraphStats> for GraphStatsDto {
    fn from(s: GraphStats) -> Self {
        Self {
            node_count: s.node_count,
            edge_count: s.edge_count,
            cycle_count: s.cycle_count,
            root_count: s.root_count,
            leaf_count: s.leaf_count,
            component_count: s.component_count,
            max_depth: s.max_depth,
            is_acyclic: s.is_acyclic,
        }
    }
}

/// Helper for id lists coming back from graph and registry queries.
pub fn id_list(list: &[SymbolId]) -> Vec<String> {
    ids(list)
}

// ── Validation ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssueDto {
    pub symbol_id: String,
    pub rule: String,
    pub message: String,
}

impl From<&ValidationIssue> for ValidationIssueDto {
    fn from(i: &ValidationIssue) -> Self {
        Self {
            symbol_id: i.symbol_id.to_string(),
            rule: i.rule.as_str().to_string(),
            message: i.message.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReportDto {
    pub valid: bool,
    pub errors: Vec<ValidationIssueDto>,
    pub warnings: Vec<ValidationIssueDto>,
}

impl From<&ValidationReport> for ValidationReportDto {
    fn from(r: &ValidationReport) -> Self {
        Self {
            valid: r.is_valid(),
            errors: r.errors.iter().map(ValidationIssueDto::from).collect(),
            warnings: r.warnings.iter().map(ValidationIssueDto::from).collect(),
        }
    }
}

// ── Bulk import ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportErrorDto {
    pub id: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummaryDto {
    pub imported: usize,
    pub skipped: usize,
    pub failed: usize,
    pub errors: Vec<ImportErrorDto>,
}

impl From<ImportSummary> for ImportSummaryDto {
    fn from(s: ImportSummary) -> Self {
        Self {
            imported: s.imported,
            skipped: s.skipped,
            failed: s.failed,
            errors: s
                .errors
                .into_iter()
                .map(|e| ImportErrorDto {
                    id: e.id,
                    message: e.message,
                })
                .collect(),
        }
    }
}

// ── Generation ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResultDto {
    pub symbol_id: String,
    pub language: String,
    pub base_path: String,
    pub user_path: String,
    pub content_hash: String,
    pub base_action: String,
    pub user_action: String,
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_content: Option<String>,
}

impl GenerationResultDto {
    /// Same as the `From` conversion but keeps both file bodies.
    pub fn with_content(result: GenerationResult) -> Self {
        let mut dto = Self::from(&result);
        dto.base_content = Some(result.base_content);
        dto.user_content = Some(result.user_content);
        dto
    }
}

impl From<&GenerationResult> for GenerationResultDto {
    fn from(r: &GenerationResult) -> Self {
        Self {
            symbol_id: r.symbol_id.to_string(),
            language: r.language.clone(),
            base_path: display_path(&r.base_path),
            user_path: display_path(&r.user_path),
            content_hash: r.content_hash.clone(),
            base_action: r.base.as_str().to_string(),
            user_action: r.user.as_str().to_string(),
            generated_at: r.generated_at,
            base_content: None,
            user_content: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemDto {
    pub symbol_id: String,
    /// `generated`, `skipped` or `failed`.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<GenerationResultDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResultDto {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub items: Vec<BatchItemDto>,
}

impl From<&BatchResult> for BatchResultDto {
    fn from(b: &BatchResult) -> Self {
        Self {
            total: b.total,
            succeeded: b.succeeded,
            failed: b.failed,
            skipped: b.skipped,
            items: b
                .items
                .iter()
                .map(|item| {
                    let (status, message, result) = match &item.outcome {
                        BatchOutcome::Generated(r) => {
                            ("generated", None, Some(GenerationResultDto::from(r.as_ref())))
                        }
                        BatchOutcome::Skipped { reason } => ("skipped", Some(reason.clone()), None),
                        BatchOutcome::Failed { error } => ("failed", Some(error.clone()), None),
                    };
                    BatchItemDto {
                        symbol_id: item.symbol_id.clone(),
                        status: status.to_string(),
                        message,
                        result,
                    }
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Symbol {
        Symbol::builder("shop", "Cart", SemVer::new(1, 2, 0))
            .kind(SymbolKind::Service)
            .description("Shopping cart")
            .tag("core")
            .port(Port::input("items", TypeReference::new("list").with_generic(TypeReference::new("string"))).required())
            .port(Port::output("total", TypeReference::new("float64").nullable()))
            .depends_on(DependencyRef::new(SymbolId::parse("shop/Pricing@1.0.0").unwrap()))
            .build()
            .unwrap()
    }

    #[test]
    fn symbol_json_is_camel_case_with_rfc3339_dates() {
        let json = serde_json::to_value(SymbolDto::from(&sample())).unwrap();
        assert_eq!(json["id"], "shop/Cart@1.2.0");
        assert_eq!(json["level"], "L1");
        assert_eq!(json["ports"][0]["type"]["generics"][0]["symbolId"], "string");
        assert!(json["statusInfo"]["changedAt"].is_string());
        let created = json["createdAt"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(created).is_ok());
    }

    #[test]
    fn symbol_survives_the_wire() {
        let original = sample();
        let json = serde_json::to_string(&SymbolDto::from(&original)).unwrap();
        let dto: SymbolDto = serde_json::from_str(&json).unwrap();
        assert_eq!(Symbol::try_from(dto).unwrap(), original);
    }

    #[test]
    fn minimal_input_gets_defaults() {
        let dto: SymbolDto = serde_json::from_str(
            r#"{"namespace":"a","name":"B","version":"0.1.0","kind":"module"}"#,
        )
        .unwrap();
        let symbol = Symbol::try_from(dto).unwrap();
        assert_eq!(symbol.level, Level::Module);
        assert_eq!(symbol.language, "typescript");
        assert_eq!(symbol.status, Status::Declared);
    }

    #[test]
    fn bad_reference_is_rejected() {
        let dto = ConnectionRequestDto {
            from_symbol_id: "not-an-id".into(),
            from_port: "out".into(),
            to_symbol_id: "a/B@1.0.0".into(),
            to_port: "in".into(),
            transform: None,
        };
        assert!(matches!(
            ConnectionRequest::try_from(dto),
            Err(DomainError::InvalidSymbolId { .. })
        ));
    }

    #[test]
    fn changes_distinguish_absent_from_cleared() {
        let changes = SymbolChanges::try_from(SymbolChangesDto {
            clear_description: true,
            extends: Some("a/Base@1.0.0".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(changes.description, Some(None));
        assert!(matches!(changes.extends, Some(Some(_))));
        assert!(changes.tags.is_none());
    }
}
