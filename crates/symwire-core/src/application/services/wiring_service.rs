//! Wiring Engine - the sole writer of connections.
//!
//! `connect` runs a fail-fast pipeline; the first failing stage decides the
//! error:
//!
//! 1. self-connection
//! 2. source/target symbol and port exist
//! 3. direction + type compatibility
//! 4. duplicate tuple
//! 5. cardinality of the target port
//! 6. cycle prevention on the current graph
//!
//! `validate_connection` runs the same stages without writing.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::{
    application::{
        ApplicationError, WiringError,
        ports::{ConnectionStore, SymbolStore},
    },
    domain::{
        Connection, ConnectionId, ConnectionRequest, DependencyGraph, Port, Symbol, SymbolId,
        TypeCheckMode, check_port_compatibility,
    },
    error::{SymwireError, SymwireResult},
};

/// Dry-run outcome of the pipeline. Always produced, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionValidation {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Compatibility score; 0 when invalid.
    pub score: u8,
}

/// A target port that a given source port could be wired into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortMatch {
    pub port: String,
    pub score: u8,
    pub notes: Vec<String>,
}

/// A required input with nothing wired into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnconnectedPort {
    pub symbol_id: SymbolId,
    pub port: String,
}

struct Accepted {
    score: u8,
    notes: Vec<String>,
}

pub struct WiringEngine {
    symbols: Arc<dyn SymbolStore>,
    connections: Arc<dyn ConnectionStore>,
    mode: TypeCheckMode,
}

impl WiringEngine {
    pub fn new(
        symbols: Arc<dyn SymbolStore>,
        connections: Arc<dyn ConnectionStore>,
        mode: TypeCheckMode,
    ) -> Self {
        Self {
            symbols,
            connections,
            mode,
        }
    }

    pub fn mode(&self) -> TypeCheckMode {
        self.mode
    }

    #[instrument(
        skip_all,
        fields(
            from = %format!("{}.{}", request.from_symbol, request.from_port),
            to = %format!("{}.{}", request.to_symbol, request.to_port)
        )
    )]
    pub fn connect(&self, request: ConnectionRequest) -> SymwireResult<Connection> {
        let accepted = match self.check(&request) {
            Ok(Ok(accepted)) => accepted,
            Ok(Err(rejection)) => {
                warn!(reason = %rejection, "Connection rejected");
                return Err(rejection.into());
            }
            Err(e) => return Err(e),
        };

        let connection = Connection::from_request(request);
        self.connections.insert(connection.clone())?;
        info!(id = %connection.id, score = accepted.score, "Connection created");
        Ok(connection)
    }

    /// Run the pipeline without writing.
    pub fn validate_connection(&self, request: &ConnectionRequest) -> SymwireResult<ConnectionValidation> {
        Ok(match self.check(request)? {
            Ok(accepted) => ConnectionValidation {
                valid: true,
                errors: Vec::new(),
                warnings: accepted.notes,
                score: accepted.score,
            },
            Err(rejection) => ConnectionValidation {
                valid: false,
                errors: vec![rejection.to_string()],
                warnings: Vec::new(),
                score: 0,
            },
        })
    }

    #[instrument(skip_all, fields(id = %id))]
    pub fn disconnect(&self, id: &ConnectionId) -> SymwireResult<Connection> {
        let connection = self.get_connection(id)?;
        self.connections.remove(id)?;
        info!("Connection removed");
        Ok(connection)
    }

    pub fn get_connection(&self, id: &ConnectionId) -> SymwireResult<Connection> {
        self.connections.get(id)?.ok_or_else(|| {
            SymwireError::from(ApplicationError::ConnectionNotFound { id: id.to_string() })
        })
    }

    /// All connections, oldest first.
    pub fn list_connections(&self) -> SymwireResult<Vec<Connection>> {
        let mut all = self.connections.list()?;
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(all)
    }

    /// Connections with `symbol` at either end.
    pub fn connections_for(&self, symbol: &SymbolId) -> SymwireResult<Vec<Connection>> {
        Ok(self
            .list_connections()?
            .into_iter()
            .filter(|c| c.touches(symbol))
            .collect())
    }

    /// Drop every connection attached to `symbol`; returns how many went.
    /// When a removal fails, the connections already dropped are put back.
    #[instrument(skip_all, fields(symbol = %symbol))]
    pub fn remove_connections_for(&self, symbol: &SymbolId) -> SymwireResult<usize> {
        let attached = self.connections_for(symbol)?;
        for (done, connection) in attached.iter().enumerate() {
            if let Err(err) = self.connections.remove(&connection.id) {
                warn!(error = %err, restored = done, "Cascade failed, restoring connections");
                for removed in &attached[..done] {
                    self.connections.insert(removed.clone())?;
                }
                return Err(err);
            }
        }
        if !attached.is_empty() {
            info!(count = attached.len(), "Removed attached connections");
        }
        Ok(attached.len())
    }

    /// Reject `candidate`, a changed copy of a stored symbol, when its ports
    /// no longer carry the connections already attached to it.
    #[instrument(skip_all, fields(symbol = %candidate.id()))]
    pub fn check_ports_against_connections(&self, candidate: &Symbol) -> SymwireResult<()> {
        let id = candidate.id();
        let attached = self.connections_for(id)?;
        let mut problems = Vec::new();

        for connection in &attached {
            let source = if &connection.from_symbol == id {
                Some(candidate.clone())
            } else {
                self.symbols.get(&connection.from_symbol)?
            };
            let target = if &connection.to_symbol == id {
                Some(candidate.clone())
            } else {
                self.symbols.get(&connection.to_symbol)?
            };
            let (Some(source), Some(target)) = (source, target) else {
                continue;
            };

            let from_port = source.port(&connection.from_port);
            let to_port = target.port(&connection.to_port);
            match (from_port, to_port) {
                (Some(from_port), Some(to_port)) => {
                    let result = check_port_compatibility(from_port, to_port, self.mode);
                    if !result.compatible {
                        problems.push(format!("{connection}: {result}"));
                    }
                }
                (None, _) => problems.push(format!(
                    "{connection}: port '{}' is gone from {}",
                    connection.from_port,
                    source.id()
                )),
                (_, None) => problems.push(format!(
                    "{connection}: port '{}' is gone from {}",
                    connection.to_port,
                    target.id()
                )),
            }
        }

        for port in candidate.inputs().filter(|p| !p.multiple) {
            let inbound = attached
                .iter()
                .filter(|c| &c.to_symbol == id && c.to_port == port.name)
                .count();
            if inbound > 1 {
                problems.push(format!(
                    "port '{}' has {inbound} inbound connections but no longer accepts multiple",
                    port.name
                ));
            }
        }

        if problems.is_empty() {
            return Ok(());
        }
        let rejection = WiringError::BreaksConnections {
            symbol: id.to_string(),
            problems,
        };
        warn!(reason = %rejection, "Symbol change rejected");
        Err(rejection.into())
    }

    /// Ports on `target` that `source` could feed, best score first.
    pub fn find_compatible_ports(&self, source: &Port, target: &SymbolId) -> SymwireResult<Vec<PortMatch>> {
        let symbol = self.symbols.get(target)?.ok_or_else(|| {
            SymwireError::from(ApplicationError::SymbolNotFound {
                id: target.to_string(),
            })
        })?;

        let mut matches: Vec<PortMatch> = symbol
            .ports
            .iter()
            .filter_map(|port| {
                let result = check_port_compatibility(source, port, self.mode);
                result.compatible.then(|| PortMatch {
                    port: port.name.clone(),
                    score: result.score,
                    notes: result.notes,
                })
            })
            .collect();
        matches.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.port.cmp(&b.port)));
        Ok(matches)
    }

    /// Required `in`/`inout` ports with no inbound connection.
    pub fn find_unconnected_required_ports(&self) -> SymwireResult<Vec<UnconnectedPort>> {
        let connections = self.connections.list()?;
        let mut symbols = self.symbols.list()?;
        symbols.sort_by(|a, b| a.id().cmp(b.id()));

        let mut missing = Vec::new();
        for symbol in &symbols {
            for port in symbol.inputs().filter(|p| p.required) {
                let wired = connections
                    .iter()
                    .any(|c| &c.to_symbol == symbol.id() && c.to_port == port.name);
                if !wired {
                    missing.push(UnconnectedPort {
                        symbol_id: symbol.id().clone(),
                        port: port.name.clone(),
                    });
                }
            }
        }
        Ok(missing)
    }

    // -------------------------------------------------------------------------
    // Pipeline
    // -------------------------------------------------------------------------

    /// Outer error: the stores failed. Inner error: the request was rejected.
    fn check(&self, request: &ConnectionRequest) -> SymwireResult<Result<Accepted, WiringError>> {
        // 1. Self-connection, whatever the ports.
        if request.from_symbol == request.to_symbol {
            return Ok(Err(WiringError::SelfConnection {
                symbol: request.from_symbol.to_string(),
            }));
        }

        // 2. Existence.
        let Some(source) = self.symbols.get(&request.from_symbol)? else {
            return Ok(Err(WiringError::SymbolNotFound {
                id: request.from_symbol.to_string(),
            }));
        };
        let Some(target) = self.symbols.get(&request.to_symbol)? else {
            return Ok(Err(WiringError::SymbolNotFound {
                id: request.to_symbol.to_string(),
            }));
        };
        let Some(from_port) = source.port(&request.from_port) else {
            return Ok(Err(WiringError::PortNotFound {
                symbol: source.id().to_string(),
                port: request.from_port.clone(),
            }));
        };
        let Some(to_port) = target.port(&request.to_port) else {
            return Ok(Err(WiringError::PortNotFound {
                symbol: target.id().to_string(),
                port: request.to_port.clone(),
            }));
        };

        // 3. Compatibility.
        let compatibility = check_port_compatibility(from_port, to_port, self.mode);
        if !compatibility.compatible {
            return Ok(Err(WiringError::Incompatible {
                reason: compatibility.to_string(),
                suggestions: compatibility.suggestions,
            }));
        }

        // 4. Duplicate.
        let existing = self.connections.list()?;
        if existing.iter().any(|c| c.same_endpoints(request)) {
            return Ok(Err(WiringError::DuplicateConnection {
                from: format!("{}.{}", request.from_symbol, request.from_port),
                to: format!("{}.{}", request.to_symbol, request.to_port),
            }));
        }

        // 5. Cardinality.
        if !to_port.multiple
            && existing
                .iter()
                .any(|c| c.to_symbol == request.to_symbol && c.to_port == request.to_port)
        {
            return Ok(Err(WiringError::PortFull {
                symbol: request.to_symbol.to_string(),
                port: request.to_port.clone(),
            }));
        }

        // 6. Cycle prevention, before the edge exists.
        let symbols = self.symbols.list()?;
        let graph = DependencyGraph::build(&symbols, &existing);
        if graph.would_create_cycle(&request.from_symbol, &request.to_symbol) {
            return Ok(Err(WiringError::WouldCreateCycle {
                from: request.from_symbol.to_string(),
                to: request.to_symbol.to_string(),
            }));
        }

        Ok(Ok(Accepted {
            score: compatibility.score,
            notes: compatibility.notes,
        }))
    }
}
