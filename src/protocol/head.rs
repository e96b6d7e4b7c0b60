//! Default host-side message heads.
//!
//! These are ready-made [`Sink`]s for hosts that just want the parsed
//! message; hosts with their own header containers implement [`Sink`]
//! directly and skip this module.

use bytes::Bytes;
use http::{Method, StatusCode, Version};

use crate::codec::Sink;
use crate::error::ParseError;
use crate::Result;

/// Header and trailer fields in wire order. Values are raw octets: a
/// folded value keeps its CRLFs, and nothing here requires UTF-8.
#[derive(Debug, Default, Clone)]
pub struct FieldList {
    entries: Vec<(String, Bytes)>,
}

impl FieldList {
    /// First value for `name`, compared case-insensitively.
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, name: &[u8], value: &[u8]) {
        // field names are token characters, always ASCII
        self.entries.push((
            String::from_utf8_lossy(name).into_owned(),
            Bytes::copy_from_slice(value),
        ));
    }
}

/// Map the wire-encoded version (`10 * major + minor`) onto the `http`
/// crate's type, for the versions it models.
pub fn http_version(version: u8) -> Option<Version> {
    match version {
        9 => Some(Version::HTTP_09),
        10 => Some(Version::HTTP_10),
        11 => Some(Version::HTTP_11),
        _ => None,
    }
}

/// Request head populated by a request-variant parser.
#[derive(Debug, Default, Clone)]
pub struct RequestHead {
    pub method: Method,
    pub target: String,
    pub version: u8,
    pub fields: FieldList,
}

impl Sink for RequestHead {
    fn on_request(&mut self, method: &[u8], target: &[u8], version: u8) -> Result<()> {
        self.method = Method::from_bytes(method).map_err(|_| ParseError::BadMethod)?;
        self.target = String::from_utf8(target.to_vec()).map_err(|_| ParseError::BadPath)?;
        self.version = version;
        Ok(())
    }

    fn on_field(&mut self, name: &[u8], value: &[u8]) -> Result<()> {
        self.fields.push(name, value);
        Ok(())
    }
}

/// Response head populated by a response-variant parser. Trailer fields
/// land in `fields` after the header fields, still in wire order.
#[derive(Debug, Clone)]
pub struct ResponseHead {
    pub status: StatusCode,
    pub reason: String,
    pub version: u8,
    pub fields: FieldList,
}

impl Default for ResponseHead {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            reason: String::new(),
            version: 0,
            fields: FieldList::default(),
        }
    }
}

impl Sink for ResponseHead {
    fn on_response(&mut self, status: u16, reason: &[u8], version: u8) -> Result<()> {
        self.status = StatusCode::from_u16(status).map_err(|_| ParseError::BadStatus)?;
        self.reason = String::from_utf8_lossy(reason).into_owned();
        self.version = version;
        Ok(())
    }

    fn on_field(&mut self, name: &[u8], value: &[u8]) -> Result<()> {
        self.fields.push(name, value);
        Ok(())
    }
}
