//! Shared fixtures for the parser benchmarks.

/// A named wire-format message fixture.
#[derive(Debug, Copy, Clone)]
pub struct WireFile {
    file_name: &'static str,
    content: &'static str,
}

impl WireFile {
    pub const fn new(file_name: &'static str, content: &'static str) -> Self {
        Self { file_name, content }
    }

    pub fn file_name(&self) -> &'static str {
        self.file_name
    }

    pub fn bytes(&self) -> &'static [u8] {
        self.content.as_bytes()
    }
}

/// One benchmark case over a fixture.
#[derive(Debug, Copy, Clone)]
pub struct BenchCase {
    name: &'static str,
    kind: CaseKind,
    file: WireFile,
}

/// What the case exercises: the header path alone, or a full message
/// including chunked body decoding.
#[derive(Debug, Copy, Clone)]
pub enum CaseKind {
    Header,
    Chunked,
}

impl BenchCase {
    pub fn header(name: &'static str, file: WireFile) -> Self {
        Self { name, kind: CaseKind::Header, file }
    }

    pub fn chunked(name: &'static str, file: WireFile) -> Self {
        Self { name, kind: CaseKind::Chunked, file }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> CaseKind {
        self.kind
    }

    pub fn file(&self) -> &WireFile {
        &self.file
    }
}
