//! Fetching a status payload for a server address.

use std::{io, process::Stdio};

use tokio::process::Command;
use tracing::{debug, warn};

use crate::{
    config::{Backend, QueryConfig},
    error::QueryError,
    ping::{self, ServerAddress},
    report::StatusPayload,
};

/// Fetches and decodes the status of `address` using the configured backend.
pub async fn query(address: &str, config: &QueryConfig) -> Result<StatusPayload, QueryError> {
    match config.backend {
        Backend::Jar => {
            let output = run_jar(address, config).await?;
            Ok(StatusPayload::decode(&output)?)
        }
        Backend::Native => {
            let address: ServerAddress = address.parse()?;
            let timeout = config.timeout;
            tokio::task::spawn_blocking(move || ping::ping(&address, timeout))
                .await
                .map_err(|e| QueryError::Io(io::Error::new(io::ErrorKind::Other, e)))?
        }
    }
}

/// Runs the MCServerInfo jar in API mode and returns its trimmed stdout.
pub async fn run_jar(address: &str, config: &QueryConfig) -> Result<String, QueryError> {
    if !config.jar_path.is_file() {
        return Err(QueryError::JarNotFound(config.jar_path.clone()));
    }
    let jar = config.jar_path.canonicalize()?;

    let mut command = Command::new(&config.java);
    command
        .arg("-Dfile.encoding=UTF-8")
        .arg("-jar")
        .arg(&jar)
        .args(["-c", "api", address])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = jar.parent() {
        command.current_dir(dir);
    }

    debug!(java = %config.java, jar = %jar.display(), address, "spawning status query");
    let child = command.spawn().map_err(|source| QueryError::Spawn {
        program: config.java.clone(),
        source,
    })?;

    let output = tokio::time::timeout(config.timeout, child.wait_with_output())
        .await
        .map_err(|_| QueryError::Timeout(config.timeout))??;

    let stdout = decode_output(&output.stdout);
    let stderr = decode_output(&output.stderr);

    if !output.status.success() {
        warn!(status = %output.status, %stderr, "status query failed");
        return Err(QueryError::Failed {
            code: output.status.code(),
            stderr,
        });
    }
    if stdout.is_empty() {
        return Err(QueryError::EmptyOutput);
    }

    Ok(stdout)
}

/// Decodes process output as UTF-8, falling back to GBK (what a Chinese
/// Windows console emits), and trims it. Undecodable bytes become U+FFFD.
pub fn decode_output(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            debug!(error = %e, "process output is not valid UTF-8, decoding as GBK");
            let (text, _, _) = encoding_rs::GBK.decode(bytes);
            text.trim().to_string()
        }
    }
}
