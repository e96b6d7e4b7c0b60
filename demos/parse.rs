use std::io::Cursor;

use bytes::BytesMut;
use h1_parse::protocol::{ResponseHead, VecBody};
use h1_parse::read::read_message;
use h1_parse::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

const WIRE: &str = "HTTP/1.1 200 OK\r\n\
    Server: demo\r\n\
    Transfer-Encoding: chunked\r\n\
    \r\n\
    b\r\n\
    hello world\r\n\
    0\r\n\
    Expires: never\r\n\
    \r\n";

fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::TRACE)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let mut stream = Cursor::new(WIRE.as_bytes());
    let mut buf = BytesMut::new();
    let mut parser = Parser::response(ResponseHead::default());
    let mut body = VecBody::new();

    read_message(&mut stream, &mut buf, &mut parser, &mut body).expect("canned message parses");

    let head = parser.sink();
    info!(status = %head.status, version = head.version, reason = %head.reason, "parsed response");
    for (name, value) in head.fields.iter() {
        info!(name = name, value = %String::from_utf8_lossy(value), "field");
    }
    info!(body = %String::from_utf8_lossy(body.as_slice()), "body");
}
