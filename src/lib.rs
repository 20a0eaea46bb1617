//! # tbed
//!
//! A **native messaging host** that lets a Thunderbird MailExtension (or any
//! browser extension) hand compose-window text to an **external editor** of
//! the user's choice, and get the edited text back.
//!
//! The host is single-shot: the client launches it, one exchange happens over
//! **stdin/stdout**, the process exits.
//!
//! ---
//!
//! ## Wire protocol
//!
//! Each frame is:
//!
//! 1. a **4-byte length prefix** (`u32`) in the machine's **native byte order**
//!    ([`ByteOrder::detect`]);
//! 2. **that many bytes** of UTF-8 JSON; here always a single JSON string.
//!
//! Host → client frames are capped at **1 MiB** ([`config::MAX_TO_CLIENT`]),
//! so long texts are **paged**. A control header goes first, then the pages:
//!
//! ```text
//! [len]"--tbed-hdr\nPages: 2"
//! [len]"<first 524288 chars>"
//! [len]"<the rest>"
//! ```
//!
//! The same `--tbed-hdr` convention opens every exchange from the extension:
//!
//! ```text
//! extension -> host   "--tbed-hdr\nCommand: gvim -f"
//! extension -> host   "Dear all, ..."
//! host -> extension   "Dear all, ... (edited)"      (paged if needed)
//! ```
//!
//! ### Gotchas
//!
//! - **Never log to stdout:** stdout carries frames. [`logging::init`] sends
//!   everything to a file, and the editor's own stdout is redirected to stderr.
//! - **Empty replies fail:** a text with zero characters produces zero pages
//!   and is rejected with [`NmError::EmptyPayload`].
//! - **Pages are counted in characters**, not bytes, and cut on `char`
//!   boundaries so multi-byte text is never split mid-sequence.
//! - **...but frames are capped in bytes.** A page of 524 288 characters that
//!   are mostly 3- or 4-byte UTF-8 (CJK, emoji) encodes to more than the
//!   1 MiB `max_outgoing` limit and is refused with
//!   [`NmError::OutgoingTooLarge`] rather than sent. Lower `page_size` in the
//!   config file (e.g. to 200 000) if users write such text in bulk.
//!
//! ---
//!
//! ## Crate layout
//!
//! - [`endian`]: native byte-order detection.
//! - [`message`]: paging and the `--tbed-hdr` control header.
//! - [`host`]: frame codec and the stdio [`Connection`].
//! - [`protocol`]: the page-header handshake ([`Protocol`]).
//! - [`editor`]: running the external editor over a temp file.
//! - [`session`]: the whole command/text/reply exchange.
//! - [`config`], [`logging`]: start-up configuration and the log sink.
//! - [`install`]: manifest install/verify/remove (feature `install`).
//!
//! ---
//!
//! ## Paging in memory
//!
//! ```rust
//! use tbed::Message;
//!
//! let text = "x".repeat(10);
//! let msg = Message::from_plaintext(&text, 4).unwrap();
//!
//! // One control page + ceil(10 / 4) = 3 data pages.
//! assert_eq!(msg.page_count(), 3);
//! assert_eq!(msg.pages().len(), 4);
//! assert_eq!(msg.pages()[0], r#""--tbed-hdr\nPages: 3""#);
//! assert_eq!(msg.to_plaintext().unwrap(), text);
//! ```
//!
//! ## Framing over any reader/writer
//!
//! ```rust
//! use std::io::Cursor;
//! use tbed::{ByteOrder, Connection, HostConfig, Protocol};
//!
//! let config = HostConfig::new(ByteOrder::detect().unwrap()).with_page_size(3);
//!
//! let mut out = Protocol::new(Connection::new(Cursor::new(Vec::new()), Vec::new(), &config), &config);
//! out.send_logical_message("hello world").unwrap();
//! let (_, wire) = out.into_connection().into_inner();
//!
//! let mut back = Protocol::new(Connection::new(Cursor::new(wire), Vec::new(), &config), &config);
//! assert_eq!(back.receive_logical_message().unwrap(), "hello world");
//! ```
//!
//! ## Running an exchange
//!
//! ```no_run
//! use tbed::{session, ByteOrder, Editor, HostConfig, Protocol};
//!
//! # fn main() -> tbed::Result<()> {
//! let config = HostConfig::new(ByteOrder::detect()?);
//! let mut protocol = Protocol::stdio(&config);
//! session::exchange(&mut protocol, Editor::new)?;
//! # Ok(())
//! # }
//! ```
//!
//! ---
//!
//! ## Installing the manifest
//!
//! The client finds the host through a JSON manifest. Locations per client
//! and OS come from an embedded `clients.toml` (`thunderbird`, `firefox`,
//! `chrome`, `chromium`).
//!
//! ```no_run
//! use std::path::Path;
//! use tbed::{install, verify_installed, remove, Scope};
//!
//! let exe = Path::new("/usr/local/bin/tbed");
//! install("tbed", "External editor", exe, &[], &["tbed@example.org".into()], &["thunderbird"], Scope::User).unwrap();
//! assert!(verify_installed("tbed", Some(&["thunderbird"]), Scope::User).unwrap());
//! remove("tbed", &["thunderbird"], Scope::User).unwrap();
//! ```
//!
//! ### Troubleshooting
//!
//! - *"No such native application tbed"*: the manifest is missing or its
//!   `name` differs from what the extension passes to `connectNative`.
//! - *The editor opens and the text never comes back*: the editor forked into
//!   the background. Use its foreground flag (`gvim -f`, `code --wait`,
//!   `emacsclient -c`).

pub mod config;
pub mod editor;
pub mod endian;
pub mod error;
pub mod host;
#[cfg(feature = "install")]
pub mod install;
pub mod logging;
pub mod message;
pub mod protocol;
pub mod session;

/// Name the extension passes to `connectNative`.
pub const HOST_NAME: &str = "tbed";

#[doc(inline)]
pub use config::{HostConfig, Settings};
#[doc(inline)]
pub use editor::{Edit, Editor};
#[doc(inline)]
pub use endian::ByteOrder;
#[doc(inline)]
pub use error::{EditorError, NmError, Result};
#[doc(inline)]
pub use host::{decode_frame, encode_frame, Connection};
#[doc(inline)]
pub use message::{ControlHeader, Message};
#[doc(inline)]
pub use protocol::Protocol;

#[cfg(feature = "install")]
#[doc(inline)]
pub use install::manifest::{install, remove, verify_installed};
#[cfg(feature = "install")]
#[doc(inline)]
pub use install::paths::Scope;
