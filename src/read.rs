//! A blocking, byte-copying read loop for driving the parser from any
//! `std::io::Read` transport. Also the reference for wiring the parser
//! into an I/O loop of your own.

use std::cmp;
use std::io::{self, Read};

use bytes::{Buf, BytesMut};
use thiserror::Error;

use crate::codec::{BodyReader, Parser, Sink};
use crate::error::ParseError;

/// Failures from [`read_message`].
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("parse error: {source}")]
    Parse {
        #[from]
        source: ParseError,
    },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

const READ_CHUNK: usize = 4096;

/// Read and parse one complete message from `stream`.
///
/// `buf` is the connection's dynamic buffer; bytes past the end of the
/// message (a pipelined follow-up, say) are left in it. Decoded body
/// octets go to `reader`.
pub fn read_message<T, S, R>(
    stream: &mut T,
    buf: &mut BytesMut,
    parser: &mut Parser<S>,
    reader: &mut R,
) -> Result<(), ReadError>
where
    T: Read,
    S: Sink,
    R: BodyReader,
{
    // header block
    loop {
        match parser.write(&buf[..]) {
            Ok(n) => {
                buf.advance(n);
                break;
            }
            Err(ParseError::NeedMore) => {
                if read_some(stream, buf)? == 0 {
                    parser.write_eof()?;
                }
            }
            Err(e) => return Err(e.into()),
        }
    }

    // body
    while !parser.done() {
        // framing progress: chunk delimiters, the trailer, end detection
        loop {
            match parser.write(&buf[..]) {
                Ok(n) => {
                    buf.advance(n);
                    break;
                }
                Err(ParseError::NeedMore) => {
                    if read_some(stream, buf)? == 0 {
                        parser.write_eof()?;
                        break;
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }
        if parser.done() {
            break;
        }

        // move body octets already sitting in the buffer
        parser.write_body(reader, buf)?;

        // then read the rest of the chunk straight into the reader
        while !parser.done() {
            let remain = parser.remain();
            if remain == 0 {
                break;
            }
            let want = cmp::min(remain, READ_CHUNK as u64) as usize;
            let window = reader.prepare(want)?;
            let n = stream.read(window)?;
            if n == 0 {
                reader.commit(0)?;
                parser.write_eof()?;
                break;
            }
            reader.commit(n)?;
            parser.consume(n as u64);
        }
    }

    Ok(())
}

fn read_some<T: Read>(stream: &mut T, buf: &mut BytesMut) -> io::Result<usize> {
    let mut tmp = [0u8; READ_CHUNK];
    let n = stream.read(&mut tmp)?;
    buf.extend_from_slice(&tmp[..n]);
    Ok(n)
}
