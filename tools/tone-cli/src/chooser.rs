//! Terminal file chooser for `configure --choose-file`

use std::io::{BufRead, Write};
use std::path::PathBuf;

use tonecanvas_core::FileChooser;

/// Asks for a path on a line of input. An empty line or end of input
/// selects nothing.
pub struct PromptChooser<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptChooser<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> FileChooser for PromptChooser<R, W> {
    fn choose_file(&mut self, title: &str) -> Option<PathBuf> {
        if let Err(e) = write!(self.output, "{title}: ").and_then(|_| self.output.flush()) {
            tracing::warn!("Failed to write prompt: {}", e);
        }

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(_) => {
                let line = line.trim();
                (!line.is_empty()).then(|| PathBuf::from(line))
            }
            Err(e) => {
                tracing::warn!("Failed to read file name: {}", e);
                None
            }
        }
    }
}
