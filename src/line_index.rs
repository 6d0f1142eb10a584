use std::ops::Range;

/// Maps 1-based source line numbers to byte ranges for a single source file.
///
/// Nodes only carry line numbers; diagnostics rendered against the source
/// text need byte offsets.
pub struct LineIndex {
    /// Byte offset of the start of each line. line_starts[0] == 0 always.
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts, len: source.len() }
    }

    /// Byte range of `line` (1-based), without its trailing newline.
    ///
    /// Returns `None` for line 0 and for lines past the end of the file.
    pub fn line_range(&self, line: u32) -> Option<Range<usize>> {
        let idx = (line as usize).checked_sub(1)?;
        let start = *self.line_starts.get(idx)?;
        let end = match self.line_starts.get(idx + 1) {
            Some(next) => next - 1,
            None => self.len,
        };
        Some(start..end)
    }
}
