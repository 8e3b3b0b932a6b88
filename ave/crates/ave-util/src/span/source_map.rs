use super::FileId;
use crate::error::{SourceMapError, SourceMapResult};
use std::path::PathBuf;

/// One file handed to the pipeline: its path, raw text, and the byte offset
/// of each line start (for turning a byte offset back into line/column,
/// which the renderer needs but the core doesn't compute itself).
#[derive(Clone, Debug)]
pub struct SourceFile {
    pub path: PathBuf,
    pub content: String,
    line_starts: Vec<usize>,
}

impl SourceFile {
    pub fn new(path: PathBuf, content: String) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in content.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { path, content, line_starts }
    }

    /// 1-based (line, column) for a byte offset into this file.
    pub fn line_col(&self, offset: usize) -> (u32, u32) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        let col = offset.saturating_sub(self.line_starts[line]);
        (line as u32 + 1, col as u32 + 1)
    }

    pub fn snippet(&self, start: usize, end: usize) -> SourceMapResult<&str> {
        self.content.get(start..end).ok_or(SourceMapError::SpanOutOfBounds {
            file_len: self.content.len(),
            span_start: start,
            span_end: end,
        })
    }
}

/// All files loaded for one compilation.
#[derive(Clone, Debug, Default)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    pub fn add_file(&mut self, path: PathBuf, content: String) -> FileId {
        let id = FileId(self.files.len());
        self.files.push(SourceFile::new(path, content));
        id
    }

    pub fn get(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = (FileId, &SourceFile)> {
        self.files.iter().enumerate().map(|(i, f)| (FileId(i), f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_col_tracks_newlines() {
        let f = SourceFile::new(PathBuf::from("a.ave"), "var a\nvar b\n".to_string());
        assert_eq!(f.line_col(0), (1, 1));
        assert_eq!(f.line_col(6), (2, 1));
    }

    #[test]
    fn add_file_returns_sequential_ids() {
        let mut map = SourceMap::new();
        let a = map.add_file(PathBuf::from("a.ave"), "x".into());
        let b = map.add_file(PathBuf::from("b.ave"), "y".into());
        assert_eq!(a, FileId(0));
        assert_eq!(b, FileId(1));
        assert_eq!(map.get(a).unwrap().content, "x");
    }
}
