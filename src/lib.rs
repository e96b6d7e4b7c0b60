//! Incremental HTTP/1.x message parsing.
//!
//! The crate centers on [`codec::Parser`], a push parser driven by a host
//! I/O loop: feed it views of a growing input buffer with `write`, move
//! decoded body octets with `write_body`, and announce transport closure
//! with `write_eof`. The start-line, each header field, and chunk metadata
//! are delivered through the [`codec::Sink`] the parser is bound to;
//! [`protocol`] has ready-made sinks, and [`read::read_message`] is a
//! complete blocking driver.

pub mod codec;
pub mod error;
pub mod protocol;
pub mod read;

pub use codec::{BodyReader, Kind, NullSink, Parser, Sink};
pub use error::ParseError;

pub type Result<T> = std::result::Result<T, ParseError>;
