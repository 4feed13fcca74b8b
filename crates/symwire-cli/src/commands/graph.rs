//! `symwire graph`: read-only views over the connection graph.

use super::Context;
use crate::{cli::GraphCommands, error::CliResult};

pub fn execute(cmd: GraphCommands, ctx: &Context) -> CliResult<()> {
    let api = &ctx.api;
    let out = &ctx.output;
    match cmd {
        GraphCommands::Show { root: Some(root) } => out.emit(api.build_subgraph(&root)),
        GraphCommands::Show { root: None } => out.emit(api.build_graph()),
        GraphCommands::Cycles => out.emit(api.detect_cycles()),
        GraphCommands::Order => out.emit(api.get_topological_order()),
        GraphCommands::Stats => out.emit(api.get_stats()),
        GraphCommands::Upstream { id } => out.emit(api.upstream(&id)),
        GraphCommands::Downstream { id } => out.emit(api.downstream(&id)),
        GraphCommands::Direct { id } => out.emit(api.direct(&id)),
        GraphCommands::Roots => out.emit(api.root_nodes()),
        GraphCommands::Leaves => out.emit(api.leaf_nodes()),
        GraphCommands::Components => out.emit(api.connected_components()),
        GraphCommands::Depth => out.emit(api.max_depth()),
        GraphCommands::WouldCycle { from, to } => out.emit(api.would_create_cycle(&from, &to)),
    }
}
