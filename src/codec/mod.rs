mod fields;
mod parser;
mod scan;
mod sink;
mod start_line;

pub use parser::{Kind, Parser};
pub use sink::{BodyReader, NullSink, Sink};
