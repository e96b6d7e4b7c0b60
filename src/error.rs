use thiserror::Error;

/// Everything the parser can report to its driver.
///
/// `NeedMore` is flow control rather than failure: the view handed to
/// `write` does not yet contain a complete structural unit, nothing was
/// consumed, and the parser stays resumable. Every other variant latches
/// the parser in a terminal state.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    #[error("more input needed")]
    NeedMore,

    #[error("bad method")]
    BadMethod,

    #[error("bad path")]
    BadPath,

    #[error("bad version")]
    BadVersion,

    #[error("bad status")]
    BadStatus,

    #[error("bad reason")]
    BadReason,

    #[error("bad field")]
    BadField,

    #[error("bad value")]
    BadValue,

    #[error("bad Content-Length")]
    BadContentLength,

    #[error("bad Transfer-Encoding")]
    BadTransferEncoding,

    #[error("bad chunk")]
    BadChunk,

    #[error("unexpected end of message")]
    ShortRead,
}
