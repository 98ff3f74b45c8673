use std::io::{self, Cursor, Read, Write};

use mc_varint::{VarInt, VarIntRead, VarIntWrite};

/// Protocol version announced in the handshake. Servers answer status
/// requests whatever the version, so this only needs to be plausible.
pub const PROTOCOL: i32 = 765;

/// Status JSON can carry a base64 favicon, so frames get some headroom.
const MAX_FRAME_LEN: i32 = 2 * 1024 * 1024;

fn invalid_data<E>(err: E) -> io::Error
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    io::Error::new(io::ErrorKind::InvalidData, err)
}

fn remaining(cursor: &Cursor<Vec<u8>>) -> u64 {
    (cursor.get_ref().len() as u64).saturating_sub(cursor.position())
}

pub fn read_string(cursor: &mut Cursor<Vec<u8>>) -> io::Result<String> {
    let length: i32 = cursor.read_var_int()?.into();
    if length < 0 || length as u64 > remaining(cursor) {
        return Err(invalid_data(format!("string length {length} out of bounds")));
    }

    let mut value = vec![0; length as usize];
    cursor.read_exact(&mut value)?;

    String::from_utf8(value).map_err(invalid_data)
}

pub fn read_u16(cursor: &mut Cursor<Vec<u8>>) -> io::Result<u16> {
    let mut bytes = [0u8; 2];
    cursor.read_exact(&mut bytes)?;

    Ok(u16::from_be_bytes(bytes))
}

pub fn read_i64(cursor: &mut Cursor<Vec<u8>>) -> io::Result<i64> {
    let mut bytes = [0u8; 8];
    cursor.read_exact(&mut bytes)?;

    Ok(i64::from_be_bytes(bytes))
}

pub fn write_string(data: &str) -> io::Result<Vec<u8>> {
    let mut res = Vec::with_capacity(data.len() + 5);

    res.write_var_int(VarInt::from(data.len() as i32))?;
    res.extend_from_slice(data.as_bytes());

    Ok(res)
}

/// Prefixes `body` with the packet id and the total length.
pub fn frame(id: i32, body: &[u8]) -> io::Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::with_capacity(body.len() + 5));
    cursor.write_var_int(VarInt::from(id))?;
    cursor.write_all(body)?;

    let payload = cursor.into_inner();

    let mut result = Vec::with_capacity(payload.len() + 5);
    result.write_var_int(VarInt::from(payload.len() as i32))?;
    result.extend_from_slice(&payload);

    Ok(result)
}

/// Reads one length-prefixed packet, returning its id and a cursor over the
/// remaining body.
pub fn read_frame<R: Read>(reader: &mut R) -> io::Result<(i32, Cursor<Vec<u8>>)> {
    let packet_size: i32 = reader.read_var_int()?.into();
    if packet_size <= 0 || packet_size > MAX_FRAME_LEN {
        return Err(invalid_data(format!("packet size {packet_size} out of bounds")));
    }

    let mut data = vec![0; packet_size as usize];
    reader.read_exact(&mut data)?;

    let mut cursor = Cursor::new(data);
    let packet_id: i32 = cursor.read_var_int()?.into();

    Ok((packet_id, cursor))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handshake {
    pub protocol: i32,
    pub address: String,
    pub port: u16,
    pub next_state: i32,
}

impl Handshake {
    pub const ID: i32 = 0x00;
    pub const STATUS: i32 = 1;

    pub fn status(address: &str, port: u16) -> Self {
        Self {
            protocol: PROTOCOL,
            address: address.to_string(),
            port,
            next_state: Self::STATUS,
        }
    }

    pub fn from_data(cursor: &mut Cursor<Vec<u8>>) -> io::Result<Self> {
        let protocol: i32 = cursor.read_var_int()?.into();
        let address = read_string(cursor)?;
        let port = read_u16(cursor)?;
        let next_state: i32 = cursor.read_var_int()?.into();

        Ok(Self {
            protocol,
            address,
            port,
            next_state,
        })
    }

    pub fn encode(&self) -> io::Result<Vec<u8>> {
        let mut body = Vec::new();
        body.write_var_int(VarInt::from(self.protocol))?;
        body.extend_from_slice(&write_string(&self.address)?);
        body.extend_from_slice(&self.port.to_be_bytes());
        body.write_var_int(VarInt::from(self.next_state))?;

        frame(Self::ID, &body)
    }
}

/// Empty request asking for the status JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusRequest;

impl StatusRequest {
    pub const ID: i32 = 0x00;

    pub fn encode(&self) -> io::Result<Vec<u8>> {
        frame(Self::ID, &[])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusResponse {
    pub json: String,
}

impl StatusResponse {
    pub const ID: i32 = 0x00;

    pub fn from_data(cursor: &mut Cursor<Vec<u8>>) -> io::Result<Self> {
        Ok(Self {
            json: read_string(cursor)?,
        })
    }

    pub fn encode(&self) -> io::Result<Vec<u8>> {
        frame(Self::ID, &write_string(&self.json)?)
    }
}

/// Ping request and pong response share a layout: the server echoes the
/// payload back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ping {
    pub payload: i64,
}

impl Ping {
    pub const ID: i32 = 0x01;

    pub fn from_data(cursor: &mut Cursor<Vec<u8>>) -> io::Result<Self> {
        Ok(Self {
            payload: read_i64(cursor)?,
        })
    }

    pub fn encode(&self) -> io::Result<Vec<u8>> {
        frame(Self::ID, &self.payload.to_be_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handshake_reads_back() {
        let handshake = Handshake::status("play.example.org", 25565);
        let mut encoded = Cursor::new(handshake.encode().unwrap());

        let (id, mut body) = read_frame(&mut encoded).unwrap();
        assert_eq!(id, Handshake::ID);
        assert_eq!(Handshake::from_data(&mut body).unwrap(), handshake);
        assert_eq!(remaining(&body), 0);
    }

    #[test]
    fn status_request_is_two_bytes() {
        assert_eq!(StatusRequest.encode().unwrap(), vec![0x01, 0x00]);
    }

    #[test]
    fn ping_payload_is_big_endian() {
        let encoded = Ping { payload: 1 }.encode().unwrap();
        assert_eq!(encoded, vec![0x09, 0x01, 0, 0, 0, 0, 0, 0, 0, 0x01]);
    }

    #[test]
    fn long_strings_use_multibyte_lengths() {
        let json = "x".repeat(300);
        let mut encoded = Cursor::new(StatusResponse { json: json.clone() }.encode().unwrap());

        let (id, mut body) = read_frame(&mut encoded).unwrap();
        assert_eq!(id, StatusResponse::ID);
        assert_eq!(StatusResponse::from_data(&mut body).unwrap().json, json);
    }

    #[test]
    fn rejects_string_longer_than_frame() {
        let mut body = Vec::new();
        body.write_var_int(VarInt::from(10)).unwrap();
        body.extend_from_slice(b"abc");

        let err = read_string(&mut Cursor::new(body)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn rejects_empty_frame() {
        let err = read_frame(&mut Cursor::new(vec![0x00])).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn truncated_frame_is_eof() {
        let err = read_frame(&mut Cursor::new(vec![0x05, 0x00, 0x01])).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
