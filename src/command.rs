//! Chat command handling: turns incoming messages into replies.

use tracing::{debug, info};

use crate::{config::QueryConfig, error::QueryError, query, report::Report};

pub const PLUGIN_NAME: &str = "MCServerInfo";

pub const HELP_TEXT: &str = "📦 **MCServerInfo 插件使用说明**\n\n\
📌 命令格式：\n\
`/mcsinfo <服务器地址>`\n\n\
📌 说明：\n\
查询指定 Minecraft 服务器的版本、在线人数、延迟等信息。";

pub const USAGE_TEXT: &str = "❌ 请输入服务器地址。\n用法：/mcsinfo <服务器地址>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Help,
    /// `/mcsinfo` without an address.
    MissingAddress,
    Query(String),
}

impl ChatCommand {
    /// Recognizes a command in a raw chat message. Anything else is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (word, rest) = match raw.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (raw, ""),
        };

        match word {
            "/mcsinfo" if rest.is_empty() => Some(ChatCommand::MissingAddress),
            "/mcsinfo" => Some(ChatCommand::Query(rest.to_string())),
            "/help" if rest.is_empty() || rest.eq_ignore_ascii_case(PLUGIN_NAME) => {
                Some(ChatCommand::Help)
            }
            _ => None,
        }
    }
}

/// User-facing text for a failed query.
pub fn failure_reply(err: &QueryError) -> String {
    match err {
        QueryError::JarNotFound(path) => format!("❌ 未找到 JAR 文件: {}", path.display()),
        QueryError::Failed { stderr, .. } => format!("❌ 命令执行失败:\n{stderr}"),
        QueryError::EmptyOutput => "⚠️ 命令执行成功，但无输出内容。".to_string(),
        other => format!("❌ 运行命令时发生异常:\n{other}"),
    }
}

/// Runs a status query and renders either the report or the failure text.
pub async fn server_info(address: &str, config: &QueryConfig) -> String {
    match query::query(address, config).await {
        Ok(payload) => Report::from_payload(&payload).to_string(),
        Err(err) => {
            info!(address, error = %err, "server info query failed");
            failure_reply(&err)
        }
    }
}

/// Reply for an incoming message, if it is addressed to this plugin.
pub async fn respond(raw: &str, config: &QueryConfig) -> Option<String> {
    let command = ChatCommand::parse(raw)?;
    debug!(?command, "handling chat command");

    let reply = match command {
        ChatCommand::Help => HELP_TEXT.to_string(),
        ChatCommand::MissingAddress => USAGE_TEXT.to_string(),
        ChatCommand::Query(address) => server_info(&address, config).await,
    };
    Some(reply)
}
