pub mod connection;
pub mod symbol;

pub use connection::*;
pub use symbol::*;
