/// Display category of a transcript line. Affects styling only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineKind {
    #[default]
    Normal,
    System,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptLine {
    pub kind: LineKind,
    pub text: String,
}

/// Append-only list of rendered lines for the current chat screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transcript {
    lines: Vec<TranscriptLine>,
}

impl Transcript {
    pub fn lines(&self) -> &[TranscriptLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Appends `text`, splitting embedded newlines into separate lines of the same kind.
    pub fn push(&mut self, kind: LineKind, text: impl AsRef<str>) {
        for line in text.as_ref().split('\n') {
            self.lines.push(TranscriptLine {
                kind,
                text: line.to_owned(),
            });
        }
    }

    pub fn push_normal(&mut self, text: impl AsRef<str>) {
        self.push(LineKind::Normal, text);
    }

    pub fn push_system(&mut self, text: impl AsRef<str>) {
        self.push(LineKind::System, text);
    }

    pub fn push_error(&mut self, text: impl AsRef<str>) {
        self.push(LineKind::Error, text);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Returns the newest `height` lines, which is what an auto-scrolled view shows.
    pub fn tail(&self, height: usize) -> &[TranscriptLine] {
        let start = self.lines.len().saturating_sub(height);
        &self.lines[start..]
    }
}
