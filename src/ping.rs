//! Server List Ping client.
//!
//! Performs the status exchange against a server directly: handshake, status
//! request, then a ping whose round trip becomes the reported latency.

use std::{
    fmt,
    io::{self, BufReader, BufWriter, Write},
    net::{SocketAddr, TcpStream, ToSocketAddrs},
    str::FromStr,
    time::{Duration, Instant},
};

use tracing::{debug, info};

use crate::{
    error::QueryError,
    packets::{read_frame, Handshake, Ping, StatusRequest, StatusResponse},
    report::{decode_json, StatusPayload},
    server_list::ServerList,
};

pub const DEFAULT_PORT: u16 = 25565;

/// `host[:port]`, with IPv6 literals written as `[addr]:port`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAddress {
    pub host: String,
    pub port: u16,
}

impl FromStr for ServerAddress {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || QueryError::InvalidAddress(s.to_string());

        let (host, port) = if let Some(rest) = s.strip_prefix('[') {
            let (host, tail) = rest.split_once(']').ok_or_else(invalid)?;
            match tail {
                "" => (host, None),
                _ => (host, Some(tail.strip_prefix(':').ok_or_else(invalid)?)),
            }
        } else {
            match s.rsplit_once(':') {
                Some((host, port)) if !host.contains(':') => (host, Some(port)),
                // bare IPv6 literal
                Some(_) => (s, None),
                None => (s, None),
            }
        };

        if host.is_empty() || host.contains(char::is_whitespace) {
            return Err(invalid());
        }
        let port = match port {
            Some(port) => port.parse().map_err(|_| invalid())?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

fn timed_out(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
    )
}

fn io_error(err: io::Error, timeout: Duration) -> QueryError {
    if timed_out(&err) {
        QueryError::Timeout(timeout)
    } else {
        QueryError::Io(err)
    }
}

fn connect(address: &ServerAddress, timeout: Duration) -> Result<TcpStream, QueryError> {
    let candidates: Vec<SocketAddr> = (address.host.as_str(), address.port)
        .to_socket_addrs()?
        .collect();

    let mut last_err = None;
    for candidate in candidates {
        debug!(%candidate, "connecting");
        match TcpStream::connect_timeout(&candidate, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = Some(e),
        }
    }

    Err(match last_err {
        Some(err) => io_error(err, timeout),
        None => QueryError::InvalidAddress(address.to_string()),
    })
}

/// Queries `address` and returns its status mapped onto a [`StatusPayload`].
///
/// Blocking; every socket operation is bounded by `timeout`.
pub fn ping(address: &ServerAddress, timeout: Duration) -> Result<StatusPayload, QueryError> {
    let stream = connect(address, timeout)?;
    stream.set_read_timeout(Some(timeout))?;
    stream.set_write_timeout(Some(timeout))?;

    exchange(&stream, address).map_err(|err| match err {
        QueryError::Io(err) => io_error(err, timeout),
        other => other,
    })
}

fn exchange(stream: &TcpStream, address: &ServerAddress) -> Result<StatusPayload, QueryError> {
    let mut reader = BufReader::new(stream);
    let mut writer = BufWriter::new(stream);

    writer.write_all(&Handshake::status(&address.host, address.port).encode()?)?;
    writer.write_all(&StatusRequest.encode()?)?;
    writer.flush()?;

    let (packet_id, mut body) = read_frame(&mut reader)?;
    if packet_id != StatusResponse::ID {
        return Err(QueryError::Protocol(format!(
            "expected status response, got packet {packet_id:#04x}"
        )));
    }
    let response = StatusResponse::from_data(&mut body)?;
    debug!(bytes = response.json.len(), "received status response");

    let list: ServerList = serde_json::from_value(decode_json(&response.json)?)
        .map_err(|e| QueryError::Protocol(format!("unexpected status layout: {e}")))?;

    let ping = Ping {
        payload: rand::random(),
    };
    let started = Instant::now();
    writer.write_all(&ping.encode()?)?;
    writer.flush()?;

    let (packet_id, mut body) = read_frame(&mut reader)?;
    let latency = started.elapsed();
    if packet_id != Ping::ID {
        return Err(QueryError::Protocol(format!(
            "expected pong, got packet {packet_id:#04x}"
        )));
    }
    let pong = Ping::from_data(&mut body)?;
    if pong != ping {
        return Err(QueryError::Protocol("pong payload does not match ping".into()));
    }

    let ping_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
    info!(%address, ping_ms, "status query finished");

    Ok(list.into_payload(ping_ms)?)
}
