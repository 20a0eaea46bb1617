//! External editor invocation.
//!
//! The text is written to a temp file, the user's command is run with the
//! file path appended, and the file is read back once the editor exits.

use std::{
    fs,
    io::{self, Write},
    path::Path,
    process::{Command, Stdio},
};
use tracing::debug;

use crate::error::EditorError;

/// Something that turns a text into its edited version.
pub trait Edit {
    fn edit(&self, text: &str) -> Result<String, EditorError>;
}

/// A user-configured editor command line, e.g. `gvim -f` or
/// `xterm -e "vim +startinsert"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    command: String,
}

impl Editor {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Split the command line with shell quoting rules into program + args.
    pub fn argv(&self) -> Result<(String, Vec<String>), EditorError> {
        let mut parts = shlex::split(&self.command)
            .ok_or_else(|| EditorError::Unparsable(self.command.clone()))?
            .into_iter();
        let program = parts.next().ok_or(EditorError::EmptyCommand)?;
        Ok((program, parts.collect()))
    }

    /// Run the editor on `path` in the foreground and wait for it.
    ///
    /// The child's stdout is pointed at our stderr: our stdout carries frames.
    fn run(&self, path: &Path) -> Result<(), EditorError> {
        let (program, args) = self.argv()?;
        debug!(%program, ?args, path = %path.display(), "running editor");

        let status = Command::new(&program)
            .args(&args)
            .arg(path)
            .stdin(Stdio::inherit())
            .stdout(Stdio::from(io::stderr()))
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| EditorError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(EditorError::Failed(status));
        }
        Ok(())
    }
}

impl Edit for Editor {
    fn edit(&self, text: &str) -> Result<String, EditorError> {
        let mut file = tempfile::Builder::new().prefix("tbed-").tempfile()?;
        debug!(path = %file.path().display(), "edit: temp file created");
        file.write_all(text.as_bytes())?;
        file.flush()?;

        self.run(file.path())?;

        // Editors often replace the file instead of rewriting it in place,
        // so read it back by path rather than through the open handle.
        let edited = fs::read_to_string(file.path())?;
        debug!(len = edited.len(), "edit: read back");
        Ok(edited)
    }
}
