//! The seams between the engine and its host.

use crate::Result;

/// Host callbacks, invoked synchronously from `write` in message order:
/// the start-line first, then each header field in wire order, then
/// `on_header`, then chunk metadata interleaved with body transfer, then
/// one `on_field` per trailer field. Nothing is invoked after an error.
///
/// Every method defaults to accepting and discarding, so a host implements
/// only the callbacks its message kind can produce. Returning an error from
/// a callback latches the parser.
pub trait Sink {
    /// Start-line of a request. `version` is `10 * major + minor`.
    fn on_request(&mut self, method: &[u8], target: &[u8], version: u8) -> Result<()> {
        let _ = (method, target, version);
        Ok(())
    }

    /// Start-line of a response. `version` is `10 * major + minor`.
    fn on_response(&mut self, status: u16, reason: &[u8], version: u8) -> Result<()> {
        let _ = (status, reason, version);
        Ok(())
    }

    /// One header or trailer field, name and value in wire bytes. Folded
    /// values keep their CRLFs and continuation whitespace verbatim.
    fn on_field(&mut self, name: &[u8], value: &[u8]) -> Result<()> {
        let _ = (name, value);
        Ok(())
    }

    /// The blank line ending the field block was consumed.
    fn on_header(&mut self) -> Result<()> {
        Ok(())
    }

    /// A chunk-size line carried an extension, forwarded raw and
    /// unvalidated. Size zero is the final chunk.
    fn on_chunk(&mut self, size: u64, extension: &[u8]) -> Result<()> {
        let _ = (size, extension);
        Ok(())
    }
}

/// Discards every callback. Useful when only framing matters.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl Sink for NullSink {}

/// Receives decoded body octets through a prepare/commit pair: `prepare`
/// exposes a writable window of the requested size, `commit` accepts the
/// first `n` bytes of the last window. Splitting the pair lets the driver
/// read from the transport straight into the window.
pub trait BodyReader {
    fn prepare(&mut self, n: usize) -> Result<&mut [u8]>;

    fn commit(&mut self, n: usize) -> Result<()>;
}
