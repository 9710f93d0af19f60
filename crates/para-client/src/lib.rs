//! Client for the WinCC OA MCP HTTP control service
//!
//! The browser never writes the project stores. Value changes go through the
//! control service, which forwards them to the running system. The endpoint
//! and token are discovered from `<project>/javascript/mcpServer/.env`.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use para_client::McpClient;
//!
//! #[tokio::main]
//! async fn main() -> para_client::Result<()> {
//!     let mut client = McpClient::new()?;
//!     if client.configure(Path::new("/opt/projects/Demo")) {
//!         client.check_health().await;
//!         let outcome = client.set_value("Pump1.cmd", "42").await;
//!         println!("{:?}", outcome);
//!     }
//!     Ok(())
//! }
//! ```

mod client;
mod env;
mod error;
mod response;
pub mod testing;
mod types;
mod value;

pub use client::{McpClient, Reachability, HEALTH_TIMEOUT, SET_TIMEOUT};
pub use env::{env_file_path, parse_env, McpConfig};
pub use error::{McpClientError, Result};
pub use response::{find_data_line, interpret_dp_set, unwrap_tool_result};
pub use types::*;
pub use value::coerce_value;
