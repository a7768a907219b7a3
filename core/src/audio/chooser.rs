//! File selection for the WAV writer's output path.

use std::path::PathBuf;

/// Title shown by the file chooser when picking the WAV output path.
pub const WAV_FILE_DIALOG_TITLE: &str = "Select file name and location for WAV recording";

/// External file-choosing collaborator (a dialog, a prompt, a script).
///
/// Returns the selected path, or `None` when the user selected nothing.
pub trait FileChooser {
    fn choose_file(&mut self, title: &str) -> Option<PathBuf>;
}

impl<F> FileChooser for F
where
    F: FnMut(&str) -> Option<PathBuf>,
{
    fn choose_file(&mut self, title: &str) -> Option<PathBuf> {
        self(title)
    }
}
