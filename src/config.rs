use std::{path::PathBuf, time::Duration};

use clap::ValueEnum;

pub const DEFAULT_JAR: &str = "MCServerInfo-1.3.jar";
pub const DEFAULT_JAVA: &str = "java";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Where status payloads come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Backend {
    /// Run the MCServerInfo jar and read its JSON output.
    #[default]
    Jar,
    /// Speak the Server List Ping protocol directly.
    Native,
}

#[derive(Debug, Clone)]
pub struct QueryConfig {
    pub backend: Backend,
    pub jar_path: PathBuf,
    pub java: String,
    /// Upper bound for a whole query, process or network.
    pub timeout: Duration,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            jar_path: PathBuf::from(DEFAULT_JAR),
            java: DEFAULT_JAVA.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}
