use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::symbol::SymbolId;

/// Opaque connection identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Mint a fresh random id.
    pub fn generate() -> Self {
        Self(format!("conn-{}", Uuid::new_v4()))
    }

    /// Restore a previously minted id.
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A request to wire `from_symbol.from_port` into `to_symbol.to_port`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionRequest {
    pub from_symbol: SymbolId,
    pub from_port: String,
    pub to_symbol: SymbolId,
    pub to_port: String,
    pub transform: Option<String>,
}

impl ConnectionRequest {
    pub fn new(
        from_symbol: SymbolId,
        from_port: impl Into<String>,
        to_symbol: SymbolId,
        to_port: impl Into<String>,
    ) -> Self {
        Self {
            from_symbol,
            from_port: from_port.into(),
            to_symbol,
            to_port: to_port.into(),
            transform: None,
        }
    }

    pub fn with_transform(mut self, transform: impl Into<String>) -> Self {
        self.transform = Some(transform.into());
        self
    }
}

/// A validated directed edge between two ports.
///
/// Only the wiring engine creates these; see `WiringEngine::connect`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: ConnectionId,
    pub from_symbol: SymbolId,
    pub from_port: String,
    pub to_symbol: SymbolId,
    pub to_port: String,
    pub transform: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Connection {
    pub(crate) fn from_request(request: ConnectionRequest) -> Self {
        Self {
            id: ConnectionId::generate(),
            from_symbol: request.from_symbol,
            from_port: request.from_port,
            to_symbol: request.to_symbol,
            to_port: request.to_port,
            transform: request.transform,
            created_at: Utc::now(),
        }
    }

    /// Whether this connection joins the same port tuple as `request`.
    pub fn same_endpoints(&self, request: &ConnectionRequest) -> bool {
        self.from_symbol == request.from_symbol
            && self.from_port == request.from_port
            && self.to_symbol == request.to_symbol
            && self.to_port == request.to_port
    }

    pub fn touches(&self, symbol: &SymbolId) -> bool {
        &self.from_symbol == symbol || &self.to_symbol == symbol
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} -> {}.{}",
            self.from_symbol, self.from_port, self.to_symbol, self.to_port
        )
    }
}
