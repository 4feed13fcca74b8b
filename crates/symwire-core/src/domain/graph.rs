//! Dependency graph over wiring connections.
//!
//! The graph is a derived snapshot: nodes come from registered symbols and
//! edges come exclusively from [`Connection`]s. It is rebuilt per call and
//! never mutated afterwards, so every query below works on a consistent view.
//!
//! ```text
//!   A ──out→in──▶ B ──out→in──▶ C
//!   upstream(B)   = {A}
//!   downstream(B) = {C}
//!   topo order    = [A, B, C]
//! ```
//!
//! All traversals are iterative; graph size is bounded only by memory.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

use crate::domain::{
    entities::{Connection, ConnectionId, Symbol, SymbolId},
    value_objects::{Level, SymbolKind},
};

// ── Nodes and edges ──────────────────────────────────────────────────────────

/// A symbol as seen by the graph: identity, display metadata and port names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub id: SymbolId,
    pub namespace: String,
    pub name: String,
    pub level: Level,
    pub kind: SymbolKind,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

impl GraphNode {
    fn from_symbol(symbol: &Symbol) -> Self {
        Self {
            id: symbol.id().clone(),
            namespace: symbol.namespace().to_string(),
            name: symbol.name().to_string(),
            level: symbol.level,
            kind: symbol.kind,
            inputs: symbol.inputs().map(|p| p.name.clone()).collect(),
            outputs: symbol.outputs().map(|p| p.name.clone()).collect(),
        }
    }
}

/// A directed edge derived from one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    pub connection_id: ConnectionId,
    pub from: SymbolId,
    pub from_port: String,
    pub to: SymbolId,
    pub to_port: String,
}

/// One-hop neighbours of a node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectNeighbours {
    pub upstream: Vec<SymbolId>,
    pub downstream: Vec<SymbolId>,
}

/// Summary numbers for a graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub cycle_count: usize,
    pub root_count: usize,
    pub leaf_count: usize,
    pub component_count: usize,
    /// Largest shortest distance from a root, in edges; 0 for cyclic graphs.
    pub max_depth: usize,
    pub is_acyclic: bool,
}

// ── DependencyGraph ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    nodes: BTreeMap<SymbolId, GraphNode>,
    edges: BTreeMap<SymbolId, Vec<GraphEdge>>,
    /// Reverse adjacency: target id to the distinct sources feeding it.
    incoming: BTreeMap<SymbolId, BTreeSet<SymbolId>>,
    cycles: Vec<Vec<SymbolId>>,
    topological_order: Option<Vec<SymbolId>>,
}

impl DependencyGraph {
    /// Build a snapshot. Connections whose endpoints are not both present in
    /// `symbols` are skipped.
    pub fn build<'a>(
        symbols: impl IntoIterator<Item = &'a Symbol>,
        connections: impl IntoIterator<Item = &'a Connection>,
    ) -> Self {
        let nodes: BTreeMap<SymbolId, GraphNode> = symbols
            .into_iter()
            .map(|s| (s.id().clone(), GraphNode::from_symbol(s)))
            .collect();

        let mut edges: BTreeMap<SymbolId, Vec<GraphEdge>> = BTreeMap::new();
        for conn in connections {
            if !nodes.contains_key(&conn.from_symbol) || !nodes.contains_key(&conn.to_symbol) {
                continue;
            }
            edges
                .entry(conn.from_symbol.clone())
                .or_default()
                .push(GraphEdge {
                    connection_id: conn.id.clone(),
                    from: conn.from_symbol.clone(),
                    from_port: conn.from_port.clone(),
                    to: conn.to_symbol.clone(),
                    to_port: conn.to_port.clone(),
                });
        }

        Self::from_parts(nodes, edges)
    }

    fn from_parts(
        nodes: BTreeMap<SymbolId, GraphNode>,
        edges: BTreeMap<SymbolId, Vec<GraphEdge>>,
    ) -> Self {
        let mut incoming: BTreeMap<SymbolId, BTreeSet<SymbolId>> = BTreeMap::new();
        for edge in edges.values().flatten() {
            incoming
                .entry(edge.to.clone())
                .or_default()
                .insert(edge.from.clone());
        }

        let mut graph = Self {
            nodes,
            edges,
            incoming,
            cycles: Vec::new(),
            topological_order: None,
        };
        graph.cycles = graph.find_cycles();
        graph.topological_order = graph.kahn();
        graph
    }

    pub fn node(&self, id: &SymbolId) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &SymbolId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    /// All edges grouped by source, in source-id order.
    pub fn edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.values().flatten()
    }

    pub fn outgoing(&self, id: &SymbolId) -> &[GraphEdge] {
        self.edges.get(id).map_or(&[], Vec::as_slice)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    /// Distinct successor ids of `id`.
    fn successors(&self, id: &SymbolId) -> BTreeSet<&SymbolId> {
        self.outgoing(id).iter().map(|e| &e.to).collect()
    }

    /// Distinct predecessor ids of `id`.
    fn predecessors(&self, id: &SymbolId) -> BTreeSet<&SymbolId> {
        self.incoming.get(id).into_iter().flatten().collect()
    }

    // ── Cycles and order ─────────────────────────────────────────────────────

    /// Deduplicated cycles, each rotated to start at its smallest id.
    pub fn cycles(&self) -> &[Vec<SymbolId>] {
        &self.cycles
    }

    pub fn is_acyclic(&self) -> bool {
        self.topological_order.is_some()
    }

    /// Kahn order, or `None` when the graph has a cycle.
    pub fn topological_order(&self) -> Option<&[SymbolId]> {
        self.topological_order.as_deref()
    }

    /// DFS with an explicit recursion stack; a back edge closes a cycle.
    fn find_cycles(&self) -> Vec<Vec<SymbolId>> {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Mark {
            Active,
            Done,
        }

        let mut marks: BTreeMap<&SymbolId, Mark> = BTreeMap::new();
        let mut seen: HashSet<Vec<SymbolId>> = HashSet::new();
        let mut cycles = Vec::new();

        for start in self.nodes.keys() {
            if marks.contains_key(start) {
                continue;
            }

            let mut path: Vec<&SymbolId> = vec![start];
            let mut frames: Vec<Vec<&SymbolId>> =
                vec![self.successors(start).into_iter().rev().collect()];
            marks.insert(start, Mark::Active);

            while let Some(pending) = frames.last_mut() {
                let Some(next) = pending.pop() else {
                    frames.pop();
                    if let Some(done) = path.pop() {
                        marks.insert(done, Mark::Done);
                    }
                    continue;
                };

                match marks.get(next) {
                    Some(Mark::Active) => {
                        if let Some(pos) = path.iter().position(|n| *n == next) {
                            let cycle = normalize_cycle(&path[pos..]);
                            if seen.insert(cycle.clone()) {
                                cycles.push(cycle);
                            }
                        }
                    }
                    Some(Mark::Done) => {}
                    None => {
                        marks.insert(next, Mark::Active);
                        path.push(next);
                        frames.push(self.successors(next).into_iter().rev().collect());
                    }
                }
            }
        }

        cycles
    }

    fn kahn(&self) -> Option<Vec<SymbolId>> {
        let mut in_degree: BTreeMap<&SymbolId, usize> =
            self.nodes.keys().map(|id| (id, 0)).collect();
        for id in self.nodes.keys() {
            for succ in self.successors(id) {
                if let Some(d) = in_degree.get_mut(succ) {
                    *d += 1;
                }
            }
        }

        let mut queue: VecDeque<&SymbolId> = in_degree
            .iter()
            .filter(|(_, d)| **d == 0)
            .map(|(id, _)| *id)
            .collect();
        let mut order = Vec::with_capacity(self.nodes.len());

        while let Some(id) = queue.pop_front() {
            order.push(id.clone());
            for succ in self.successors(id) {
                if let Some(d) = in_degree.get_mut(succ) {
                    *d -= 1;
                    if *d == 0 {
                        queue.push_back(succ);
                    }
                }
            }
        }

        (order.len() == self.nodes.len()).then_some(order)
    }

    // ── Traversal ────────────────────────────────────────────────────────────

    /// Every node that can reach `id`, excluding `id` itself.
    pub fn upstream(&self, id: &SymbolId) -> Vec<SymbolId> {
        self.closure(id, |g, n| g.predecessors(n))
    }

    /// Every node reachable from `id`, excluding `id` itself.
    pub fn downstream(&self, id: &SymbolId) -> Vec<SymbolId> {
        self.closure(id, |g, n| g.successors(n))
    }

    fn closure<'g>(
        &'g self,
        start: &SymbolId,
        next: impl Fn(&'g Self, &SymbolId) -> BTreeSet<&'g SymbolId>,
    ) -> Vec<SymbolId> {
        let mut visited: BTreeSet<&SymbolId> = BTreeSet::new();
        let mut stack: Vec<&SymbolId> = next(self, start).into_iter().collect();
        while let Some(id) = stack.pop() {
            if id == start || !visited.insert(id) {
                continue;
            }
            stack.extend(next(self, id));
        }
        visited.into_iter().cloned().collect()
    }

    pub fn direct(&self, id: &SymbolId) -> DirectNeighbours {
        DirectNeighbours {
            upstream: self.predecessors(id).into_iter().cloned().collect(),
            downstream: self.successors(id).into_iter().cloned().collect(),
        }
    }

    /// Nodes with no inbound edges.
    pub fn root_nodes(&self) -> Vec<SymbolId> {
        self.nodes
            .keys()
            .filter(|id| !self.incoming.contains_key(*id))
            .cloned()
            .collect()
    }

    /// Nodes with no outbound edges.
    pub fn leaf_nodes(&self) -> Vec<SymbolId> {
        self.nodes
            .keys()
            .filter(|id| self.outgoing(id).is_empty())
            .cloned()
            .collect()
    }

    /// Weakly connected components (edge direction ignored). Isolated nodes
    /// form singleton components.
    pub fn connected_components(&self) -> Vec<Vec<SymbolId>> {
        let mut neighbours: BTreeMap<&SymbolId, BTreeSet<&SymbolId>> =
            self.nodes.keys().map(|id| (id, BTreeSet::new())).collect();
        for edge in self.edges() {
            if let Some(n) = neighbours.get_mut(&edge.from) {
                n.insert(&edge.to);
            }
            if let Some(n) = neighbours.get_mut(&edge.to) {
                n.insert(&edge.from);
            }
        }

        let mut visited: HashSet<&SymbolId> = HashSet::new();
        let mut components = Vec::new();
        for start in self.nodes.keys() {
            if !visited.insert(start) {
                continue;
            }
            let mut component = vec![start.clone()];
            let mut queue = VecDeque::from([start]);
            while let Some(id) = queue.pop_front() {
                for &n in neighbours.get(id).into_iter().flatten() {
                    if visited.insert(n) {
                        component.push(n.clone());
                        queue.push_back(n);
                    }
                }
            }
            component.sort();
            components.push(component);
        }
        components
    }

    /// Deepest level reached by a breadth-first walk started from every root
    /// at once: the largest shortest distance, in edges, from any root.
    /// `-1` when the graph is cyclic.
    pub fn max_depth(&self) -> i64 {
        if !self.is_acyclic() {
            return -1;
        }

        let mut depth: HashMap<&SymbolId, i64> = HashMap::new();
        let mut queue: VecDeque<&SymbolId> = VecDeque::new();
        for id in self.nodes.keys() {
            if !self.incoming.contains_key(id) {
                depth.insert(id, 0);
                queue.push_back(id);
            }
        }

        let mut max = 0;
        while let Some(id) = queue.pop_front() {
            let d = depth.get(id).copied().unwrap_or(0);
            max = max.max(d);
            for succ in self.successors(id) {
                if !depth.contains_key(succ) {
                    depth.insert(succ, d + 1);
                    queue.push_back(succ);
                }
            }
        }
        max
    }

    /// Whether adding `from → to` would close a cycle.
    pub fn would_create_cycle(&self, from: &SymbolId, to: &SymbolId) -> bool {
        from == to || self.downstream(to).contains(from)
    }

    /// `root` plus its transitive downstream closure, keeping only edges
    /// between included nodes. `None` when `root` is not in the graph.
    pub fn subgraph(&self, root: &SymbolId) -> Option<Self> {
        if !self.nodes.contains_key(root) {
            return None;
        }

        let mut keep: BTreeSet<SymbolId> = self.downstream(root).into_iter().collect();
        keep.insert(root.clone());

        let nodes = self
            .nodes
            .iter()
            .filter(|(id, _)| keep.contains(*id))
            .map(|(id, node)| (id.clone(), node.clone()))
            .collect();
        let edges = self
            .edges
            .iter()
            .filter(|(id, _)| keep.contains(*id))
            .map(|(id, out)| {
                let kept: Vec<GraphEdge> =
                    out.iter().filter(|e| keep.contains(&e.to)).cloned().collect();
                (id.clone(), kept)
            })
            .filter(|(_, out)| !out.is_empty())
            .collect();

        Some(Self::from_parts(nodes, edges))
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            cycle_count: self.cycles.len(),
            root_count: self.root_nodes().len(),
            leaf_count: self.leaf_nodes().len(),
            component_count: self.connected_components().len(),
            max_depth: usize::try_from(self.max_depth()).unwrap_or(0),
            is_acyclic: self.is_acyclic(),
        }
    }
}

/// Rotate so the smallest id comes first; the direction is preserved.
fn normalize_cycle(segment: &[&SymbolId]) -> Vec<SymbolId> {
    let pivot = segment
        .iter()
        .enumerate()
        .min_by_key(|(_, id)| **id)
        .map_or(0, |(i, _)| i);
    segment[pivot..]
        .iter()
        .chain(&segment[..pivot])
        .map(|id| (*id).clone())
        .collect()
}
