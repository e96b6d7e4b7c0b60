//! A growable body reader for hosts that buffer the decoded body.

use std::cmp;

use crate::codec::BodyReader;
use crate::Result;

/// `Vec`-backed [`BodyReader`]: `prepare` grows the buffer to expose a
/// window, `commit` keeps the filled prefix and discards the rest.
#[derive(Debug, Default, Clone)]
pub struct VecBody {
    buf: Vec<u8>,
    len: usize,
}

impl VecBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// The committed body octets.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn into_vec(mut self) -> Vec<u8> {
        self.buf.truncate(self.len);
        self.buf
    }
}

impl BodyReader for VecBody {
    fn prepare(&mut self, n: usize) -> Result<&mut [u8]> {
        self.buf.resize(self.len + n, 0);
        Ok(&mut self.buf[self.len..])
    }

    fn commit(&mut self, n: usize) -> Result<()> {
        self.len = cmp::min(self.len + n, self.buf.len());
        self.buf.truncate(self.len);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepare_then_partial_commit() {
        let mut body = VecBody::new();
        let window = body.prepare(8).unwrap();
        window[..3].copy_from_slice(b"abc");
        body.commit(3).unwrap();
        assert_eq!(body.as_slice(), b"abc");

        let window = body.prepare(4).unwrap();
        assert_eq!(window.len(), 4);
        window[..2].copy_from_slice(b"de");
        body.commit(2).unwrap();
        assert_eq!(body.as_slice(), b"abcde");
        assert_eq!(body.into_vec(), b"abcde".to_vec());
    }

    #[test]
    fn zero_commit_discards_the_window() {
        let mut body = VecBody::new();
        body.prepare(16).unwrap();
        body.commit(0).unwrap();
        assert!(body.is_empty());
        assert_eq!(body.into_vec(), Vec::<u8>::new());
    }
}
