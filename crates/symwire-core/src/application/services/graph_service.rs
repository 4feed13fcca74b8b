//! Graph Service - fresh dependency-graph snapshots per call.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{ConnectionStore, SymbolStore},
    },
    domain::{DependencyGraph, DirectNeighbours, GraphStats, SymbolId},
    error::SymwireResult,
};

pub struct GraphService {
    symbols: Arc<dyn SymbolStore>,
    connections: Arc<dyn ConnectionStore>,
}

impl GraphService {
    pub fn new(symbols: Arc<dyn SymbolStore>, connections: Arc<dyn ConnectionStore>) -> Self {
        Self {
            symbols,
            connections,
        }
    }

    /// Build a snapshot from the current stores.
    #[instrument(skip_all)]
    pub fn build_graph(&self) -> SymwireResult<DependencyGraph> {
        let symbols = self.symbols.list()?;
        let connections = self.connections.list()?;
        let graph = DependencyGraph::build(&symbols, &connections);
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Built dependency graph"
        );
        Ok(graph)
    }

    /// `root` and everything downstream of it.
    pub fn build_subgraph(&self, root: &SymbolId) -> SymwireResult<DependencyGraph> {
        let graph = self.build_graph()?;
        graph.subgraph(root).ok_or_else(|| not_found(root))
    }

    pub fn detect_cycles(&self) -> SymwireResult<Vec<Vec<SymbolId>>> {
        Ok(self.build_graph()?.cycles().to_vec())
    }

    /// Kahn order, or `None` when the wiring graph is cyclic.
    pub fn topological_order(&self) -> SymwireResult<Option<Vec<SymbolId>>> {
        Ok(self.build_graph()?.topological_order().map(<[SymbolId]>::to_vec))
    }

    pub fn upstream(&self, id: &SymbolId) -> SymwireResult<Vec<SymbolId>> {
        Ok(self.graph_with(id)?.upstream(id))
    }

    pub fn downstream(&self, id: &SymbolId) -> SymwireResult<Vec<SymbolId>> {
        Ok(self.graph_with(id)?.downstream(id))
    }

    pub fn direct(&self, id: &SymbolId) -> SymwireResult<DirectNeighbours> {
        Ok(self.graph_with(id)?.direct(id))
    }

    pub fn root_nodes(&self) -> SymwireResult<Vec<SymbolId>> {
        Ok(self.build_graph()?.root_nodes())
    }

    pub fn leaf_nodes(&self) -> SymwireResult<Vec<SymbolId>> {
        Ok(self.build_graph()?.leaf_nodes())
    }

    pub fn connected_components(&self) -> SymwireResult<Vec<Vec<SymbolId>>> {
        Ok(self.build_graph()?.connected_components())
    }

    pub fn max_depth(&self) -> SymwireResult<i64> {
        Ok(self.build_graph()?.max_depth())
    }

    pub fn would_create_cycle(&self, from: &SymbolId, to: &SymbolId) -> SymwireResult<bool> {
        Ok(self.build_graph()?.would_create_cycle(from, to))
    }

    pub fn stats(&self) -> SymwireResult<GraphStats> {
        Ok(self.build_graph()?.stats())
    }

    fn graph_with(&self, id: &SymbolId) -> SymwireResult<DependencyGraph> {
        let graph = self.build_graph()?;
        if !graph.contains(id) {
            return Err(not_found(id));
        }
        Ok(graph)
    }
}

fn not_found(id: &SymbolId) -> crate::error::SymwireError {
    ApplicationError::SymbolNotFound { id: id.to_string() }.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockConnectionStore, MockSymbolStore};
    use crate::domain::{
        Connection, ConnectionRequest, Port, SemVer, Symbol, TypeReference,
    };

    fn sym(name: &str) -> Symbol {
        Symbol::builder("g", name, SemVer::new(1, 0, 0))
            .port(Port::input("in", TypeReference::new("bytes")).multiple())
            .port(Port::output("out", TypeReference::new("bytes")))
            .build()
            .unwrap()
    }

    fn service(names: &[&str], links: &[(&str, &str)]) -> GraphService {
        let symbols: Vec<Symbol> = names.iter().map(|n| sym(n)).collect();
        let connections: Vec<Connection> = links
            .iter()
            .map(|(a, b)| {
                Connection::from_request(ConnectionRequest::new(
                    sym(a).id().clone(),
                    "out",
                    sym(b).id().clone(),
                    "in",
                ))
            })
            .collect();

        let mut symbol_store = MockSymbolStore::new();
        symbol_store
            .expect_list()
            .returning(move || Ok(symbols.clone()));
        let mut connection_store = MockConnectionStore::new();
        connection_store
            .expect_list()
            .returning(move || Ok(connections.clone()));
        GraphService::new(Arc::new(symbol_store), Arc::new(connection_store))
    }

    #[test]
    fn order_and_stats_follow_connections() {
        let service = service(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
        let order = service.topological_order().unwrap().unwrap();
        assert_eq!(order, vec![sym("A").id().clone(), sym("B").id().clone(), sym("C").id().clone()]);

        let stats = service.stats().unwrap();
        assert_eq!(stats.max_depth, 2);
        assert_eq!(stats.root_count, 1);
        assert!(stats.is_acyclic);
    }

    #[test]
    fn cyclic_graph_has_no_order() {
        let service = service(&["A", "B"], &[("A", "B"), ("B", "A")]);
        assert!(service.topological_order().unwrap().is_none());
        assert_eq!(service.detect_cycles().unwrap().len(), 1);
        assert_eq!(service.max_depth().unwrap(), -1);
    }

    #[test]
    fn traversal_of_unknown_node_is_not_found() {
        let service = service(&["A"], &[]);
        let ghost = SymbolId::parse("g/Ghost@1.0.0").unwrap();
        assert_eq!(service.upstream(&ghost).unwrap_err().code(), "NOT_FOUND");
        assert_eq!(service.build_subgraph(&ghost).unwrap_err().code(), "NOT_FOUND");
    }
}
