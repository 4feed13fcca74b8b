//! `symwire wire`: port-to-port connections.

use symwire_core::application::dto::ConnectionRequestDto;

use super::Context;
use crate::{
    cli::{Endpoints, WireCommands},
    error::CliResult,
};

pub fn execute(cmd: WireCommands, ctx: &Context) -> CliResult<()> {
    let api = &ctx.api;
    let out = &ctx.output;
    match cmd {
        WireCommands::Connect(endpoints) => out.emit(api.connect(request(endpoints))),
        WireCommands::Disconnect { id } => out.emit(api.disconnect(&id)),
        WireCommands::Validate(endpoints) => out.emit(api.validate_connection(request(endpoints))),
        WireCommands::Get { id } => out.emit(api.get_connection(&id)),
        WireCommands::List { symbol: Some(id) } => out.emit(api.connections_for(&id)),
        WireCommands::List { symbol: None } => out.emit(api.list_connections()),
        WireCommands::Compatible {
            symbol,
            port,
            target,
        } => out.emit(api.find_compatible_ports(&symbol, &port, &target)),
        WireCommands::Unconnected => out.emit(api.find_unconnected_required_ports()),
    }
}

fn request(endpoints: Endpoints) -> ConnectionRequestDto {
    ConnectionRequestDto {
        from_symbol_id: endpoints.from_symbol,
        from_port: endpoints.from_port,
        to_symbol_id: endpoints.to_symbol,
        to_port: endpoints.to_port,
        transform: endpoints.transform,
    }
}
