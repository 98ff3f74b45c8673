//! Minecraft server status reports.
//!
//! A status payload (fetched with the MCServerInfo jar or over the Server List
//! Ping protocol) is decoded, its MOTD flattened and stripped of `§` codes,
//! and rendered as a fixed six-line report.

pub mod command;
pub mod config;
pub mod error;
pub mod motd;
pub mod packets;
pub mod ping;
pub mod query;
pub mod report;
pub mod server_list;

pub use config::{Backend, QueryConfig};
pub use error::{QueryError, StatusError};
pub use motd::{strip_color_codes, Motd};
pub use report::{format_server_info, RawPayload, Report, StatusPayload};
