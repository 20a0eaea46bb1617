//! The single exchange a host process performs.
//!
//! 1. `--tbed-hdr\nCommand: <editor>` names the editor to run;
//! 2. the next logical message is the text to edit;
//! 3. the edited text is sent back, paged if necessary.

use std::io::{BufRead, Write};
use tracing::info;

use crate::editor::Edit;
use crate::error::{NmError, Result};
use crate::message::ControlHeader;
use crate::protocol::Protocol;

/// Editor command carried by the opening header message.
pub fn parse_command(message: &str) -> Result<String> {
    let header = ControlHeader::parse(message).ok_or(NmError::MissingCommand)??;
    header
        .command()
        .map(str::to_owned)
        .ok_or(NmError::MissingCommand)
}

/// Run one command/text/reply exchange.
///
/// `make_editor` builds the collaborator from the received command line. If
/// editing fails nothing is written back.
pub fn exchange<R, W, E, F>(protocol: &mut Protocol<R, W>, make_editor: F) -> Result<()>
where
    R: BufRead,
    W: Write,
    E: Edit,
    F: FnOnce(String) -> E,
{
    let command = parse_command(&protocol.receive_logical_message()?)?;
    info!(%command, "editor command received");

    let text = protocol.receive_logical_message()?;
    let edited = make_editor(command).edit(&text)?;
    info!(before = text.len(), after = edited.len(), "text edited");

    protocol.send_logical_message(&edited)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_header_yields_command() {
        let cmd = parse_command("--tbed-hdr\nCommand: emacsclient -c").unwrap();
        assert_eq!(cmd, "emacsclient -c");
    }

    #[test]
    fn pages_header_is_not_a_command() {
        let err = parse_command("--tbed-hdr\nPages: 2").unwrap_err();
        assert!(matches!(err, NmError::MissingCommand));
    }

    #[test]
    fn plain_text_is_not_a_command() {
        assert!(matches!(
            parse_command("hello").unwrap_err(),
            NmError::MissingCommand
        ));
    }
}
