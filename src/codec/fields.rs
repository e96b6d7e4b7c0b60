//! Header-field list parsing and the semantic field interpreter.
//!
//! One routine serves both the header block and the chunked trailer: the
//! framing layer has already located the blank-line terminator, so the
//! region handed in here is complete and parsing never suspends.

use crate::codec::parser::{Parser, FLAG_CHUNKED, FLAG_CONTENT_LENGTH, FLAG_UPGRADE};
use crate::codec::scan;
use crate::codec::sink::Sink;
use crate::error::ParseError;
use crate::Result;

impl<S: Sink> Parser<S> {
    /// Parse field lines from `*cur` through the blank CRLF ending the
    /// block. Each field goes to the host callback first, then to the
    /// interpreter; the callback's error wins.
    pub(super) fn parse_fields(&mut self, buf: &[u8], cur: &mut usize) -> Result<()> {
        loop {
            if buf.get(*cur..*cur + 2) == Some(&b"\r\n"[..]) {
                *cur += 2;
                return Ok(());
            }

            let start = *cur;
            while let Some(&b) = buf.get(*cur) {
                if !scan::is_tchar(b) {
                    break;
                }
                *cur += 1;
            }
            if *cur == start || buf.get(*cur) != Some(&b':') {
                return Err(ParseError::BadField);
            }
            let name_end = *cur;
            *cur += 1;

            while buf.get(*cur).is_some_and(|&b| scan::is_ows(b)) {
                *cur += 1;
            }

            let vstart = *cur;
            let vend = loop {
                match buf.get(*cur) {
                    Some(&b'\r') => {
                        if buf.get(*cur + 1) != Some(&b'\n') {
                            return Err(ParseError::BadValue);
                        }
                        if buf.get(*cur + 2).is_some_and(|&b| scan::is_ows(b)) {
                            // obs-fold: the CRLF and its continuation
                            // whitespace stay in the value verbatim
                            *cur += 3;
                            continue;
                        }
                        let end = *cur;
                        *cur += 2;
                        break end;
                    }
                    Some(&b) if scan::is_value_char(b) || scan::is_ows(b) => *cur += 1,
                    _ => return Err(ParseError::BadValue),
                }
            };
            let mut vend = vend;
            while vend > vstart && scan::is_ows(buf[vend - 1]) {
                vend -= 1;
            }

            let (name, value) = (&buf[start..name_end], &buf[vstart..vend]);
            self.sink.on_field(name, value)?;
            self.do_field(name, value)?;
        }
    }

    /// Extract framing metadata from the recognized fields; everything
    /// else passes through untouched.
    fn do_field(&mut self, name: &[u8], value: &[u8]) -> Result<()> {
        if name.eq_ignore_ascii_case(b"content-length") {
            if self.flags & (FLAG_CHUNKED | FLAG_CONTENT_LENGTH) != 0 {
                return Err(ParseError::BadContentLength);
            }
            let v = scan::parse_dec(value).ok_or(ParseError::BadContentLength)?;
            self.flags |= FLAG_CONTENT_LENGTH;
            self.len = v;
        } else if name.eq_ignore_ascii_case(b"transfer-encoding") {
            if self.flags & (FLAG_CHUNKED | FLAG_CONTENT_LENGTH) != 0 {
                return Err(ParseError::BadTransferEncoding);
            }
            // chunked, when present, must be the final coding; other
            // codings are accepted but not decoded here
            let mut chunked = false;
            for tok in value.split(|&b| b == b',') {
                if chunked {
                    return Err(ParseError::BadTransferEncoding);
                }
                if trim_ows(tok).eq_ignore_ascii_case(b"chunked") {
                    chunked = true;
                }
            }
            if chunked {
                self.flags |= FLAG_CHUNKED;
            }
        } else if name.eq_ignore_ascii_case(b"upgrade") {
            // presence only; the value passes through uninterpreted
            self.flags |= FLAG_UPGRADE;
        }
        Ok(())
    }
}

fn trim_ows(mut s: &[u8]) -> &[u8] {
    while let [b' ' | b'\t', rest @ ..] = s {
        s = rest;
    }
    while let [rest @ .., b' ' | b'\t'] = s {
        s = rest;
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::sink::NullSink;

    #[derive(Default)]
    struct Rec {
        fields: Vec<(String, Vec<u8>)>,
    }

    impl Sink for Rec {
        fn on_field(&mut self, name: &[u8], value: &[u8]) -> Result<()> {
            self.fields
                .push((String::from_utf8_lossy(name).into_owned(), value.to_vec()));
            Ok(())
        }
    }

    fn parse(buf: &[u8]) -> Result<Parser<Rec>> {
        let mut p = Parser::request(Rec::default());
        let mut cur = 0;
        p.parse_fields(buf, &mut cur)?;
        assert_eq!(cur, buf.len());
        Ok(p)
    }

    #[test]
    fn plain_fields_in_wire_order() {
        let p = parse(b"Host: example.com\r\nAccept: */*\r\n\r\n").unwrap();
        let fields = &p.sink().fields;
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].0, "Host");
        assert_eq!(fields[0].1, b"example.com");
        assert_eq!(fields[1].0, "Accept");
        assert_eq!(fields[1].1, b"*/*");
    }

    #[test]
    fn surrounding_ows_is_trimmed() {
        let p = parse(b"X: \t x \t \r\n\r\n").unwrap();
        assert_eq!(p.sink().fields[0].1, b"x");
    }

    #[test]
    fn empty_value() {
        let p = parse(b"X:\r\n\r\n").unwrap();
        assert_eq!(p.sink().fields[0].1, b"");
    }

    #[test]
    fn obs_fold_is_preserved_verbatim() {
        let p = parse(b"X: line1\r\n line2\r\n\tline3\r\n\r\n").unwrap();
        assert_eq!(p.sink().fields[0].1, b"line1\r\n line2\r\n\tline3");
    }

    #[test]
    fn field_errors() {
        assert_eq!(parse(b"Na me: x\r\n\r\n").err(), Some(ParseError::BadField));
        assert_eq!(parse(b": x\r\n\r\n").err(), Some(ParseError::BadField));
        assert_eq!(parse(b"X x\r\n\r\n").err(), Some(ParseError::BadField));
        assert_eq!(parse(b"X: a\x01b\r\n\r\n").err(), Some(ParseError::BadValue));
        assert_eq!(parse(b"X: a\rb\r\n\r\n").err(), Some(ParseError::BadValue));
    }

    fn interpret(buf: &[u8]) -> Result<Parser<NullSink>> {
        let mut p = Parser::request(NullSink);
        let mut cur = 0;
        p.parse_fields(buf, &mut cur)?;
        Ok(p)
    }

    #[test]
    fn content_length_sets_framing() {
        let p = interpret(b"Content-Length: 5\r\n\r\n").unwrap();
        assert_eq!(p.content_length(), Some(5));
        assert!(!p.needs_eof());
    }

    #[test]
    fn content_length_rejects_garbage() {
        assert!(matches!(
            interpret(b"Content-Length: 5x\r\n\r\n"),
            Err(ParseError::BadContentLength)
        ));
        assert!(matches!(
            interpret(b"Content-Length:\r\n\r\n"),
            Err(ParseError::BadContentLength)
        ));
    }

    #[test]
    fn conflicting_framing_errors_on_the_second_field() {
        assert!(matches!(
            interpret(b"Content-Length: 5\r\nContent-Length: 5\r\n\r\n"),
            Err(ParseError::BadContentLength)
        ));
        assert!(matches!(
            interpret(b"Content-Length: 5\r\nTransfer-Encoding: chunked\r\n\r\n"),
            Err(ParseError::BadTransferEncoding)
        ));
        assert!(matches!(
            interpret(b"Transfer-Encoding: chunked\r\nContent-Length: 5\r\n\r\n"),
            Err(ParseError::BadContentLength)
        ));
    }

    #[test]
    fn chunked_must_be_the_final_coding() {
        let p = interpret(b"Transfer-Encoding: gzip, chunked\r\n\r\n").unwrap();
        assert!(p.is_chunked());

        let p = interpret(b"Transfer-Encoding: Chunked\r\n\r\n").unwrap();
        assert!(p.is_chunked());

        assert!(matches!(
            interpret(b"Transfer-Encoding: chunked, gzip\r\n\r\n"),
            Err(ParseError::BadTransferEncoding)
        ));
        assert!(matches!(
            interpret(b"Transfer-Encoding: chunked,\r\n\r\n"),
            Err(ParseError::BadTransferEncoding)
        ));
    }

    #[test]
    fn other_codings_leave_framing_open() {
        let p = interpret(b"Transfer-Encoding: gzip\r\n\r\n").unwrap();
        assert!(!p.is_chunked());
        assert!(p.needs_eof());
    }

    #[test]
    fn upgrade_presence_is_recorded() {
        let p = interpret(b"Upgrade: websocket\r\nConnection: upgrade\r\n\r\n").unwrap();
        assert!(p.is_upgrade());
        // connection fields carry no semantic action
        assert!(p.needs_eof());
    }
}
