//! Driving port: the uniform result facade.
//!
//! Every operation returns an [`ApiResponse`]:
//!
//! ```text
//! { "success": true,  "data": ... }
//! { "success": false, "error": { "code": "NOT_FOUND", "message": "..." } }
//! ```
//!
//! Nothing escapes this boundary. Service errors are translated through
//! [`SymwireError::code`] and panics are caught and reported as
//! `INTERNAL_ERROR`.

use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::{
    application::{
        ApplicationError, WiringError,
        dto::{
            BatchResultDto, ConnectionDto, ConnectionRequestDto, ConnectionValidationDto,
            DirectNeighboursDto, GenerationResultDto, GraphDto, GraphStatsDto, ImportErrorDto,
            ImportSummaryDto, PortMatchDto, SymbolChangesDto, SymbolDto, UnconnectedPortDto,
            ValidationReportDto, id_list,
        },
        services::{
            BatchOutcome, CodeGenerator, GenerateOptions, GraphService, ResolveOptions,
            SymbolQuery, SymbolRegistry, WiringEngine,
        },
    },
    domain::{BumpType, ConnectionId, ConnectionRequest, Status, Symbol, SymbolChanges, SymbolId},
    error::{SymwireError, SymwireResult},
};

// ── Envelope ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl From<&SymwireError> for ApiError {
    fn from(e: &SymwireError) -> Self {
        let message = match e {
            SymwireError::Domain(inner) => inner.to_string(),
            SymwireError::Application(inner) => inner.to_string(),
            SymwireError::Wiring(inner) => inner.to_string(),
            SymwireError::Configuration { message } | SymwireError::Internal { message } => {
                message.clone()
            }
        };
        Self {
            code: e.code().to_string(),
            message,
            suggestions: e.suggestions(),
        }
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        Self::from(&SymwireError::from(e))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn fail(error: ApiError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.success
    }

    /// Error code on failure.
    pub fn code(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.code.as_str())
    }

    pub fn into_result(self) -> Result<T, ApiError> {
        match (self.data, self.error) {
            (Some(data), None) => Ok(data),
            (_, Some(error)) => Err(error),
            (None, None) => Err(ApiError {
                code: "INTERNAL_ERROR".into(),
                message: "empty response".into(),
                suggestions: Vec::new(),
            }),
        }
    }
}

/// Run `operation`, translating errors and panics into the envelope.
pub fn respond<T>(name: &str, operation: impl FnOnce() -> SymwireResult<T>) -> ApiResponse<T> {
    match panic::catch_unwind(AssertUnwindSafe(operation)) {
        Ok(Ok(data)) => ApiResponse::ok(data),
        Ok(Err(e)) => ApiResponse::fail(ApiError::from(&e)),
        Err(payload) => {
            let detail = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".into());
            error!(operation = name, detail = %detail, "Operation panicked");
            ApiResponse::fail(ApiError::from(&SymwireError::Internal {
                message: format!("{name} failed unexpectedly: {detail}"),
            }))
        }
    }
}

fn parse_id(id: &str) -> SymwireResult<SymbolId> {
    Ok(SymbolId::parse(id)?)
}

fn symbols(list: &[Symbol]) -> Vec<SymbolDto> {
    list.iter().map(SymbolDto::from).collect()
}

fn id_groups(list: &[Vec<SymbolId>]) -> Vec<Vec<String>> {
    list.iter().map(|c| id_list(c)).collect()
}

/// A removed symbol and the connections that went with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovalDto {
    pub symbol: SymbolDto,
    pub connections_removed: usize,
}

// ── ArchitectureApi ──────────────────────────────────────────────────────────

/// Single entry point for front ends.
pub struct ArchitectureApi {
    registry: SymbolRegistry,
    wiring: WiringEngine,
    graph: GraphService,
    generator: CodeGenerator,
}

impl ArchitectureApi {
    pub fn new(
        registry: SymbolRegistry,
        wiring: WiringEngine,
        graph: GraphService,
        generator: CodeGenerator,
    ) -> Self {
        Self {
            registry,
            wiring,
            graph,
            generator,
        }
    }

    pub fn registry(&self) -> &SymbolRegistry {
        &self.registry
    }

    pub fn wiring(&self) -> &WiringEngine {
        &self.wiring
    }

    pub fn graph(&self) -> &GraphService {
        &self.graph
    }

    pub fn generator(&self) -> &CodeGenerator {
        &self.generator
    }

    // ========================================================================
    // Registry
    // ========================================================================

    pub fn register(&self, symbol: SymbolDto) -> ApiResponse<SymbolDto> {
        respond("register", || {
            let symbol = Symbol::try_from(symbol)?;
            Ok(SymbolDto::from(&self.registry.register(symbol)?))
        })
    }

    pub fn register_new_version(
        &self,
        id: &str,
        bump: BumpType,
        changes: SymbolChangesDto,
    ) -> ApiResponse<SymbolDto> {
        respond("registerNewVersion", || {
            let id = parse_id(id)?;
            let changes = SymbolChanges::try_from(changes)?;
            Ok(SymbolDto::from(
                &self.registry.register_new_version(&id, bump, changes)?,
            ))
        })
    }

    pub fn get(&self, id: &str) -> ApiResponse<SymbolDto> {
        respond("get", || Ok(SymbolDto::from(&self.registry.get(&parse_id(id)?)?)))
    }

    pub fn list(&self) -> ApiResponse<Vec<SymbolDto>> {
        respond("list", || Ok(symbols(&self.registry.list()?)))
    }

    pub fn update(&self, id: &str, changes: SymbolChangesDto) -> ApiResponse<SymbolDto> {
        respond("update", || {
            let id = parse_id(id)?;
            let changes = SymbolChanges::try_from(changes)?;
            if changes.ports.is_some() {
                let mut candidate = self.registry.get(&id)?;
                changes.clone().apply(&mut candidate)?;
                self.wiring.check_ports_against_connections(&candidate)?;
            }
            Ok(SymbolDto::from(&self.registry.update(&id, changes)?))
        })
    }

    /// Remove a symbol together with every connection touching it.
    pub fn remove(&self, id: &str) -> ApiResponse<RemovalDto> {
        respond("remove", || {
            let id = parse_id(id)?;
            // The symbol goes first; a failed cascade puts it back.
            let symbol = self.registry.remove(&id)?;
            let connections_removed = match self.wiring.remove_connections_for(&id) {
                Ok(count) => count,
                Err(err) => {
                    warn!(id = %id, error = %err, "Connection cascade failed, restoring symbol");
                    self.registry.register(symbol)?;
                    return Err(err);
                }
            };
            self.generator.invalidate(&id)?;
            info!(id = %id, connections_removed, "Symbol removed");
            Ok(RemovalDto {
                symbol: SymbolDto::from(&symbol),
                connections_removed,
            })
        })
    }

    pub fn set_status(&self, id: &str, status: Status, source: &str) -> ApiResponse<SymbolDto> {
        respond("setStatus", || {
            let id = parse_id(id)?;
            Ok(SymbolDto::from(&self.registry.set_status(&id, status, source)?))
        })
    }

    pub fn query(&self, query: &SymbolQuery) -> ApiResponse<Vec<SymbolDto>> {
        respond("query", || Ok(symbols(&self.registry.query(query)?)))
    }

    pub fn search(&self, text: &str) -> ApiResponse<Vec<SymbolDto>> {
        respond("search", || Ok(symbols(&self.registry.search(text)?)))
    }

    pub fn resolve(&self, namespace: &str, name: &str, options: &ResolveOptions) -> ApiResponse<SymbolDto> {
        respond("resolve", || {
            Ok(SymbolDto::from(&self.registry.resolve(namespace, name, options)?))
        })
    }

    pub fn get_versions(&self, namespace: &str, name: &str) -> ApiResponse<Vec<String>> {
        respond("getVersions", || {
            Ok(self
                .registry
                .get_versions(namespace, name)?
                .iter()
                .map(ToString::to_string)
                .collect())
        })
    }

    pub fn contains(&self, id: &str) -> ApiResponse<Vec<SymbolDto>> {
        respond("contains", || Ok(symbols(&self.registry.contains(&parse_id(id)?)?)))
    }

    pub fn contained_by(&self, id: &str) -> ApiResponse<Vec<SymbolDto>> {
        respond("containedBy", || {
            Ok(symbols(&self.registry.contained_by(&parse_id(id)?)?))
        })
    }

    pub fn dependencies(&self, id: &str) -> ApiResponse<Vec<SymbolDto>> {
        respond("dependencies", || {
            Ok(symbols(&self.registry.dependencies(&parse_id(id)?)?))
        })
    }

    pub fn dependents(&self, id: &str) -> ApiResponse<Vec<SymbolDto>> {
        respond("dependents", || Ok(symbols(&self.registry.dependents(&parse_id(id)?)?)))
    }

    /// Bulk register. Items that fail to convert count as failed; the rest
    /// go through the registry one by one.
    pub fn import(&self, items: Vec<SymbolDto>) -> ApiResponse<ImportSummaryDto> {
        respond("import", || {
            let mut rejected = Vec::new();
            let mut accepted = Vec::with_capacity(items.len());
            for dto in items {
                let label = dto
                    .id
                    .clone()
                    .unwrap_or_else(|| format!("{}/{}@{}", dto.namespace, dto.name, dto.version));
                match Symbol::try_from(dto) {
                    Ok(symbol) => accepted.push(symbol),
                    Err(e) => rejected.push(ImportErrorDto {
                        id: label,
                        message: e.to_string(),
                    }),
                }
            }

            let mut summary = ImportSummaryDto::from(self.registry.import(accepted)?);
            summary.failed += rejected.len();
            summary.errors.extend(rejected);
            Ok(summary)
        })
    }

    pub fn export(&self) -> ApiResponse<Vec<SymbolDto>> {
        respond("export", || Ok(symbols(&self.registry.export()?)))
    }

    // ========================================================================
    // Wiring
    // ========================================================================

    pub fn connect(&self, request: ConnectionRequestDto) -> ApiResponse<ConnectionDto> {
        respond("connect", || {
            let request = ConnectionRequest::try_from(request)?;
            Ok(ConnectionDto::from(&self.wiring.connect(request)?))
        })
    }

    pub fn disconnect(&self, id: &str) -> ApiResponse<ConnectionDto> {
        respond("disconnect", || {
            Ok(ConnectionDto::from(
                &self.wiring.disconnect(&ConnectionId::from_string(id))?,
            ))
        })
    }

    /// Dry run of `connect`. Malformed ids are reported inside `data`.
    pub fn validate_connection(&self, request: ConnectionRequestDto) -> ApiResponse<ConnectionValidationDto> {
        respond("validateConnection", || match ConnectionRequest::try_from(request) {
            Ok(request) => Ok(self.wiring.validate_connection(&request)?.into()),
            Err(e) => Ok(ConnectionValidationDto {
                valid: false,
                errors: vec![e.to_string()],
                warnings: Vec::new(),
                score: 0,
            }),
        })
    }

    pub fn get_connection(&self, id: &str) -> ApiResponse<ConnectionDto> {
        respond("getConnection", || {
            Ok(ConnectionDto::from(
                &self.wiring.get_connection(&ConnectionId::from_string(id))?,
            ))
        })
    }

    pub fn list_connections(&self) -> ApiResponse<Vec<ConnectionDto>> {
        respond("listConnections", || {
            Ok(self
                .wiring
                .list_connections()?
                .iter()
                .map(ConnectionDto::from)
                .collect())
        })
    }

    pub fn connections_for(&self, id: &str) -> ApiResponse<Vec<ConnectionDto>> {
        respond("connectionsFor", || {
            Ok(self
                .wiring
                .connections_for(&parse_id(id)?)?
                .iter()
                .map(ConnectionDto::from)
                .collect())
        })
    }

    /// Ports on `target` that `source_symbol.source_port` could feed.
    pub fn find_compatible_ports(
        &self,
        source_symbol: &str,
        source_port: &str,
        target: &str,
    ) -> ApiResponse<Vec<PortMatchDto>> {
        respond("findCompatiblePorts", || {
            let source = self.registry.get(&parse_id(source_symbol)?)?;
            let port = source.port(source_port).ok_or_else(|| {
                SymwireError::from(WiringError::PortNotFound {
                    symbol: source.id().to_string(),
                    port: source_port.to_string(),
                })
            })?;
            Ok(self
                .wiring
                .find_compatible_ports(port, &parse_id(target)?)?
                .into_iter()
                .map(PortMatchDto::from)
                .collect())
        })
    }

    pub fn find_unconnected_required_ports(&self) -> ApiResponse<Vec<UnconnectedPortDto>> {
        respond("findUnconnectedRequiredPorts", || {
            Ok(self
                .wiring
                .find_unconnected_required_ports()?
                .into_iter()
                .map(UnconnectedPortDto::from)
                .collect())
        })
    }

    // ========================================================================
    // Graph
    // ========================================================================

    pub fn build_graph(&self) -> ApiResponse<GraphDto> {
        respond("buildGraph", || Ok(GraphDto::from(&self.graph.build_graph()?)))
    }

    pub fn build_subgraph(&self, root: &str) -> ApiResponse<GraphDto> {
        respond("buildSubgraph", || {
            Ok(GraphDto::from(&self.graph.build_subgraph(&parse_id(root)?)?))
        })
    }

    pub fn detect_cycles(&self) -> ApiResponse<Vec<Vec<String>>> {
        respond("detectCycles", || Ok(id_groups(&self.graph.detect_cycles()?)))
    }

    /// `data` is `null` when the graph is cyclic.
    pub fn get_topological_order(&self) -> ApiResponse<Option<Vec<String>>> {
        respond("getTopologicalOrder", || {
            Ok(self.graph.topological_order()?.map(|order| id_list(&order)))
        })
    }

    pub fn upstream(&self, id: &str) -> ApiResponse<Vec<String>> {
        respond("upstream", || Ok(id_list(&self.graph.upstream(&parse_id(id)?)?)))
    }

    pub fn downstream(&self, id: &str) -> ApiResponse<Vec<String>> {
        respond("downstream", || Ok(id_list(&self.graph.downstream(&parse_id(id)?)?)))
    }

    pub fn direct(&self, id: &str) -> ApiResponse<DirectNeighboursDto> {
        respond("direct", || Ok(self.graph.direct(&parse_id(id)?)?.into()))
    }

    pub fn root_nodes(&self) -> ApiResponse<Vec<String>> {
        respond("rootNodes", || Ok(id_list(&self.graph.root_nodes()?)))
    }

    pub fn leaf_nodes(&self) -> ApiResponse<Vec<String>> {
        respond("leafNodes", || Ok(id_list(&self.graph.leaf_nodes()?)))
    }

    pub fn connected_components(&self) -> ApiResponse<Vec<Vec<String>>> {
        respond("connectedComponents", || {
            Ok(id_groups(&self.graph.connected_components()?))
        })
    }

    pub fn max_depth(&self) -> ApiResponse<i64> {
        respond("maxDepth", || self.graph.max_depth())
    }

    pub fn would_create_cycle(&self, from: &str, to: &str) -> ApiResponse<bool> {
        respond("wouldCreateCycle", || {
            self.graph.would_create_cycle(&parse_id(from)?, &parse_id(to)?)
        })
    }

    pub fn get_stats(&self) -> ApiResponse<GraphStatsDto> {
        respond("getStats", || Ok(self.graph.stats()?.into()))
    }

    // ========================================================================
    // Validation
    // ========================================================================

    pub fn validate_all(&self) -> ApiResponse<ValidationReportDto> {
        respond("validateAll", || Ok(ValidationReportDto::from(&self.registry.validate()?)))
    }

    pub fn validate_symbol(&self, id: &str) -> ApiResponse<ValidationReportDto> {
        respond("validateSymbol", || {
            Ok(ValidationReportDto::from(
                &self.registry.validate_symbol(&parse_id(id)?)?,
            ))
        })
    }

    pub fn check_circular(&self) -> ApiResponse<Vec<Vec<String>>> {
        respond("checkCircular", || Ok(id_groups(&self.registry.check_circular()?)))
    }

    // ========================================================================
    // Generation
    // ========================================================================

    pub fn generate_symbol(&self, id: &str, options: &GenerateOptions) -> ApiResponse<GenerationResultDto> {
        respond("generateSymbol", || {
            let result = self.generator.generate_symbol(&parse_id(id)?, options)?;
            Ok(GenerationResultDto::from(&result))
        })
    }

    /// Malformed ids become failed items; they never abort the batch.
    pub fn generate_multiple(&self, ids: &[String], options: &GenerateOptions) -> ApiResponse<BatchResultDto> {
        respond("generateMultiple", || {
            let mut parsed = Vec::with_capacity(ids.len());
            let mut malformed = Vec::new();
            for raw in ids {
                match SymbolId::parse(raw) {
                    Ok(id) => parsed.push(id),
                    Err(e) => malformed.push((raw.clone(), e.to_string())),
                }
            }
            let mut batch = self.generator.generate_multiple(&parsed, options);
            for (raw, error) in malformed {
                batch.push(raw, BatchOutcome::Failed { error });
            }
            Ok(BatchResultDto::from(&batch))
        })
    }

    pub fn generate_all(&self, options: &GenerateOptions) -> ApiResponse<BatchResultDto> {
        respond("generateAll", || {
            Ok(BatchResultDto::from(&self.generator.generate_all(options)?))
        })
    }

    /// Dry run; the response carries both file bodies.
    pub fn preview_symbol(&self, id: &str, output_dir: impl Into<PathBuf>) -> ApiResponse<GenerationResultDto> {
        let output_dir = output_dir.into();
        respond("previewSymbol", || {
            let result = self.generator.preview_symbol(&parse_id(id)?, &output_dir)?;
            Ok(GenerationResultDto::with_content(result))
        })
    }

    pub fn list_generatable_symbols(&self) -> ApiResponse<Vec<SymbolDto>> {
        respond("listGeneratableSymbols", || {
            Ok(symbols(&self.generator.list_generatable_symbols()?))
        })
    }

    pub fn can_generate(&self, id: &str) -> ApiResponse<bool> {
        respond("canGenerate", || self.generator.can_generate(&parse_id(id)?))
    }
}
