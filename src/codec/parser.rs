//! The incremental parser: framing state, resumable scanning, chunk
//! decoding, and the driver-facing operations.

use std::cmp;

use bytes::{Buf, BytesMut};
use tracing::trace;

use crate::codec::scan;
use crate::codec::sink::{BodyReader, Sink};
use crate::codec::start_line::{parse_request_line, parse_status_line};
use crate::error::ParseError;
use crate::Result;

/// Which start-line variant the parser accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Request,
    Response,
}

pub(super) const FLAG_CONTENT_LENGTH: u8 = 1;
pub(super) const FLAG_CHUNKED: u8 = 2;
pub(super) const FLAG_UPGRADE: u8 = 4;
pub(super) const FLAG_HEADER: u8 = 8;
pub(super) const FLAG_DONE: u8 = 16;
pub(super) const FLAG_EXPECT_CRLF: u8 = 32;
pub(super) const FLAG_FINAL_CHUNK: u8 = 64;
pub(super) const FLAG_SKIP_BODY: u8 = 128;

/// Returned by [`Parser::remain`] when no framing signal bounds the body.
/// A maximum single-read hint, not a length.
const READ_HINT: u64 = 65536;

/// Incremental HTTP/1.x message parser.
///
/// The parser is bound at construction to the [`Sink`] it populates and is
/// driven by the host I/O loop: hand `write` a view of the buffered input
/// and consume however many bytes it reports; move decoded body octets with
/// `write_body`; announce transport closure with `write_eof`. A view handed
/// to `write` after a `NeedMore` must be the previous view extended, which
/// is what lets the terminator searches resume without rescanning.
pub struct Parser<S> {
    pub(super) sink: S,
    kind: Kind,
    pub(super) flags: u8,
    /// Remaining body octets (Content-Length) or remaining octets in the
    /// current chunk (chunked). `u64::MAX` means unknown, until EOF.
    pub(super) len: u64,
    /// Leading bytes of the current view known not to contain the
    /// terminator being sought.
    skip: u32,
    /// Offset of the CRLF ending the final chunk's size line, kept so
    /// trailer scanning resumes from it.
    scratch: u32,
    /// Flattens multi-segment input; grown on demand, never shrunk.
    scratch_buf: Option<Vec<u8>>,
    failed: Option<ParseError>,
}

impl<S: Sink> Parser<S> {
    /// A parser for the request variant, writing into `sink`.
    pub fn request(sink: S) -> Self {
        Self::new(Kind::Request, sink)
    }

    /// A parser for the response variant, writing into `sink`.
    pub fn response(sink: S) -> Self {
        Self::new(Kind::Response, sink)
    }

    pub fn new(kind: Kind, sink: S) -> Self {
        Self {
            sink,
            kind,
            flags: 0,
            len: u64::MAX,
            skip: 0,
            scratch: 0,
            scratch_buf: None,
            failed: None,
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// `true` once a complete message has been received.
    pub fn done(&self) -> bool {
        self.flags & FLAG_DONE != 0
    }

    /// `true` once the header block, including its blank line, is consumed.
    pub fn have_header(&self) -> bool {
        self.flags & FLAG_HEADER != 0
    }

    /// `true` if the Transfer-Encoding ends in `chunked`.
    pub fn is_chunked(&self) -> bool {
        self.flags & FLAG_CHUNKED != 0
    }

    /// `true` if an `Upgrade` field was present. Its value is not
    /// interpreted; it passes through `on_field` like any other.
    pub fn is_upgrade(&self) -> bool {
        self.flags & FLAG_UPGRADE != 0
    }

    /// The declared Content-Length less any body octets already
    /// transferred; `None` unless a Content-Length field was accepted.
    pub fn content_length(&self) -> Option<u64> {
        if self.flags & FLAG_CONTENT_LENGTH == 0 {
            return None;
        }
        Some(self.len)
    }

    /// `true` if only EOF can delimit the message body.
    pub fn needs_eof(&self) -> bool {
        self.flags & (FLAG_CONTENT_LENGTH | FLAG_CHUNKED) == 0
    }

    /// Body octets remaining in the current chunk or Content-Length body.
    /// When neither framing signal applies the sentinel 65536 is returned
    /// to bound a single read; it is a hint, not a length.
    pub fn remain(&self) -> u64 {
        if self.flags & (FLAG_CONTENT_LENGTH | FLAG_CHUNKED) != 0 {
            return self.len;
        }
        READ_HINT
    }

    /// Declare that the message carries no body regardless of framing,
    /// e.g. a response to a HEAD request. Takes effect when the header
    /// block completes.
    pub fn skip_body(&mut self) {
        self.flags |= FLAG_SKIP_BODY;
    }

    /// Account for body octets the host moved without `write_body`, e.g.
    /// read from the transport straight into its own storage.
    pub fn consume(&mut self, n: u64) {
        self.len = self.len.saturating_sub(n);
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Advance parsing over `buf`, returning the number of bytes consumed.
    ///
    /// `Err(NeedMore)` means the view lacks a complete structural unit and
    /// nothing was consumed; extend the view and call again. Zero with no
    /// error means the parser is waiting on body transfer (or the message
    /// is already done).
    pub fn write(&mut self, buf: &[u8]) -> Result<usize> {
        if let Some(e) = self.failed {
            return Err(e);
        }
        let res = self.write_inner(buf);
        if let Err(e) = res {
            if e != ParseError::NeedMore {
                self.failed = Some(e);
            }
        }
        res
    }

    /// Multi-segment `write`. A single segment is parsed in place; two or
    /// more are flattened into the scratch buffer first, since the inner
    /// scan loops run over one contiguous range.
    pub fn write_vectored(&mut self, bufs: &[&[u8]]) -> Result<usize> {
        match bufs {
            [] => self.write(&[]),
            [one] => self.write(one),
            many => {
                let mut flat = self.scratch_buf.take().unwrap_or_default();
                flat.clear();
                let total: usize = many.iter().map(|b| b.len()).sum();
                flat.reserve(total);
                for b in many {
                    flat.extend_from_slice(b);
                }
                let res = self.write(&flat);
                self.scratch_buf = Some(flat);
                res
            }
        }
    }

    /// Announce that the transport reached end of stream.
    ///
    /// With no explicit framing after the header, EOF is what terminates
    /// the message. Anywhere else an incomplete message is a `ShortRead`.
    pub fn write_eof(&mut self) -> Result<()> {
        if let Some(e) = self.failed {
            return Err(e);
        }
        if self.done() {
            return Ok(());
        }
        if self.have_header() && self.needs_eof() {
            self.flags |= FLAG_DONE;
            trace!("message complete at eof");
            return Ok(());
        }
        self.failed = Some(ParseError::ShortRead);
        Err(ParseError::ShortRead)
    }

    /// Move up to `min(remain, buf.len())` decoded body octets from `buf`
    /// into `reader`, advancing `buf` past them. Never crosses the end of
    /// the current chunk or the declared Content-Length.
    pub fn write_body<R: BodyReader>(&mut self, reader: &mut R, buf: &mut BytesMut) -> Result<usize> {
        if let Some(e) = self.failed {
            return Err(e);
        }
        if !self.have_header() || self.done() {
            return Ok(0);
        }
        let n = cmp::min(self.len, buf.len() as u64) as usize;
        if n > 0 {
            let dst = reader.prepare(n)?;
            dst[..n].copy_from_slice(&buf[..n]);
            reader.commit(n)?;
            buf.advance(n);
            self.len -= n as u64;
        }
        if self.flags & FLAG_CONTENT_LENGTH != 0 && self.len == 0 {
            self.flags |= FLAG_DONE;
            trace!("message complete");
        }
        Ok(n)
    }

    fn write_inner(&mut self, buf: &[u8]) -> Result<usize> {
        if self.done() {
            return Ok(0);
        }
        if self.flags & FLAG_HEADER == 0 {
            return self.parse_header(buf);
        }
        if self.flags & FLAG_CHUNKED != 0 {
            if self.len == 0 {
                return self.parse_chunked(buf);
            }
            // chunk data pending; the body helper moves it
            return Ok(0);
        }
        if self.flags & FLAG_CONTENT_LENGTH != 0 && self.len == 0 {
            self.flags |= FLAG_DONE;
            trace!("message complete");
        }
        Ok(0)
    }

    /// Find the header terminator, then parse the whole prefix in one pass.
    fn parse_header(&mut self, buf: &[u8]) -> Result<usize> {
        let n = buf.len();
        if n < 4 {
            return Err(ParseError::NeedMore);
        }
        let Some(pos) = scan::find_crlf_crlf(buf, self.skip as usize) else {
            self.skip = (n - 3) as u32;
            return Err(ParseError::NeedMore);
        };
        self.skip = 0;

        let end = pos + 4;
        let region = &buf[..end];
        let mut cur = 0usize;
        match self.kind {
            Kind::Request => {
                let line = parse_request_line(region, &mut cur)?;
                self.sink.on_request(line.method, line.target, line.version)?;
            }
            Kind::Response => {
                let line = parse_status_line(region, &mut cur)?;
                self.sink.on_response(line.status, line.reason, line.version)?;
            }
        }
        self.parse_fields(region, &mut cur)?;
        debug_assert_eq!(cur, end);
        self.sink.on_header()?;

        self.flags |= FLAG_HEADER;
        if self.flags & FLAG_CHUNKED != 0 {
            // no chunk open yet
            self.len = 0;
        }
        if self.flags & FLAG_SKIP_BODY != 0
            || (self.flags & FLAG_CONTENT_LENGTH != 0 && self.len == 0)
        {
            self.flags |= FLAG_DONE;
        }
        trace!(
            consumed = end,
            chunked = self.is_chunked(),
            content_length = self.content_length(),
            "header complete"
        );
        Ok(end)
    }

    /// One chunk transition: the previous chunk's trailing CRLF (when
    /// expected), a size line, and for the final chunk the whole trailer.
    /// Nothing is consumed on any `NeedMore` path, so a re-entered call
    /// sees the same prefix extended and resumes its search from `skip`.
    fn parse_chunked(&mut self, buf: &[u8]) -> Result<usize> {
        let n = buf.len();
        let base = if self.flags & FLAG_EXPECT_CRLF != 0 {
            if n < 2 {
                return Err(ParseError::NeedMore);
            }
            if buf[0] != b'\r' || buf[1] != b'\n' {
                return Err(ParseError::BadChunk);
            }
            2
        } else {
            0
        };

        if self.flags & FLAG_FINAL_CHUNK == 0 {
            let from = cmp::max(self.skip as usize, base);
            let Some(eol) = scan::find_crlf(buf, from) else {
                if n > 0 {
                    self.skip = (n - 1) as u32;
                }
                return Err(ParseError::NeedMore);
            };
            self.skip = 0;

            let mut cur = base;
            let size = scan::parse_hex(&buf[..eol], &mut cur).ok_or(ParseError::BadChunk)?;
            if cur != eol && buf[cur] != b';' {
                return Err(ParseError::BadChunk);
            }
            if size != 0 {
                if cur != eol {
                    // extension text, forwarded raw
                    self.sink.on_chunk(size, &buf[cur..eol])?;
                }
                self.len = size;
                self.flags |= FLAG_EXPECT_CRLF;
                trace!(size, "chunk begun");
                return Ok(eol + 2);
            }
            self.flags |= FLAG_FINAL_CHUNK;
            self.scratch = eol as u32;
            self.skip = self.scratch;
        }

        // Final chunk: everything through the trailer's CRLFCRLF is
        // consumed in one step, so the size line is still in view and the
        // search resumes from the recorded offset of its CRLF.
        let Some(term) = scan::find_crlf_crlf(buf, self.skip as usize) else {
            if n >= 4 {
                self.skip = cmp::max(self.scratch, (n - 3) as u32);
            }
            return Err(ParseError::NeedMore);
        };
        self.skip = 0;

        let eol = self.scratch as usize;
        let mut cur = base;
        scan::parse_hex(&buf[..eol], &mut cur).ok_or(ParseError::BadChunk)?;
        if cur != eol {
            self.sink.on_chunk(0, &buf[cur..eol])?;
        }

        let end = term + 4;
        let mut cur = eol + 2;
        self.parse_fields(&buf[..end], &mut cur)?;
        debug_assert_eq!(cur, end);
        self.flags |= FLAG_DONE;
        trace!(consumed = end, "message complete");
        Ok(end)
    }
}
