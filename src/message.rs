//! Paging of logical messages.
//!
//! A host -> client frame is capped at 1 MiB, so a long text is cut into
//! pages. When more than one page is needed a control header announcing the
//! page count goes out first:
//!
//! ```text
//! "--tbed-hdr\nPages: 2"   <- control page
//! "first 524288 chars..."  <- data page 1
//! "...the rest"            <- data page 2
//! ```
//!
//! Every page is stored JSON-encoded, exactly as it travels on the wire.

use std::fmt;
use tracing::{debug, warn};

use crate::error::{NmError, Result};

/// First line of every control header.
pub const HEADER_MARKER: &str = "--tbed-hdr";
pub const PAGES_KEY: &str = "Pages";
pub const COMMAND_KEY: &str = "Command";

/// A decoded `--tbed-hdr` page: the marker line followed by `Key: value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlHeader {
    pub key: String,
    pub value: String,
}

impl ControlHeader {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn pages(count: usize) -> Self {
        Self::new(PAGES_KEY, count.to_string())
    }

    /// `None` when `text` is not a control header at all; `Some(Err(_))` when
    /// it carries the marker but the `Key: value` line is malformed.
    pub fn parse(text: &str) -> Option<Result<Self>> {
        let rest = text.strip_prefix(HEADER_MARKER)?.strip_prefix('\n')?;
        let line = rest.trim_end_matches(['\r', '\n']);
        Some(match line.split_once(':') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok(Self::new(key.trim(), value.trim()))
            }
            _ => Err(NmError::InvalidHeader(format!("expected `Key: value`, got {line:?}"))),
        })
    }

    /// Declared number of data pages, if this is a `Pages` header.
    pub fn page_count(&self) -> Option<Result<usize>> {
        if self.key != PAGES_KEY {
            return None;
        }
        Some(
            self.value
                .parse::<usize>()
                .map_err(|e| NmError::InvalidHeader(format!("Pages {:?}: {e}", self.value))),
        )
    }

    /// Editor command line, if this is a `Command` header.
    pub fn command(&self) -> Option<&str> {
        (self.key == COMMAND_KEY).then_some(self.value.as_str())
    }
}

impl fmt::Display for ControlHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{HEADER_MARKER}\n{}: {}", self.key, self.value)
    }
}

/// JSON-decode one wire page into its string content.
pub fn decode_page(page: &str) -> Result<String> {
    Ok(serde_json::from_str::<String>(page)?)
}

/// Data pages announced by a decoded page, if it is a `Pages` header.
///
/// Anything else carrying the marker (a `Command` header, a quoted marker
/// line, a non-numeric count) is ordinary content. A zero count is rejected:
/// a paged message always has at least one data page.
pub fn declared_pages(text: &str) -> Result<Option<usize>> {
    let Some(Ok(header)) = ControlHeader::parse(text) else {
        return Ok(None);
    };
    match header.page_count() {
        Some(Ok(0)) => Err(NmError::InvalidHeader("Pages must be at least 1".into())),
        Some(Ok(count)) => Ok(Some(count)),
        _ => Ok(None),
    }
}

/// Text that a receiver could mistake for a control header.
fn starts_with_marker(text: &str) -> bool {
    text.strip_prefix(HEADER_MARKER)
        .is_some_and(|rest| rest.starts_with('\n'))
}

/// One logical text payload, held as the ordered pages it travels in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pages: Vec<String>,
    page_count: usize,
}

impl Message {
    /// Split `text` into pages of at most `page_size` characters.
    ///
    /// Slices are cut on `char` boundaries, so multi-byte text survives the
    /// round trip intact. A text that itself starts with the header marker
    /// line always gets a `Pages` header, so the receiver never mistakes its
    /// first page for one.
    pub fn from_plaintext(text: &str, page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(NmError::Config("page size must be greater than zero".into()));
        }
        let chars = text.chars().count();
        let page_count = chars.div_ceil(page_size);
        debug!(chars, page_size, page_count, "paging message");

        if page_count == 0 {
            return Err(NmError::EmptyPayload);
        }
        if page_count == 1 && !starts_with_marker(text) {
            return Ok(Self {
                pages: vec![serde_json::to_string(text)?],
                page_count,
            });
        }

        let mut pages = Vec::with_capacity(page_count + 1);
        pages.push(serde_json::to_string(&ControlHeader::pages(page_count).to_string())?);
        for slice in char_chunks(text, page_size) {
            pages.push(serde_json::to_string(slice)?);
        }
        debug_assert_eq!(pages.len(), page_count + 1);
        Ok(Self { pages, page_count })
    }

    /// Rebuild a message from wire pages, in the order they were received.
    pub fn from_pages(pages: Vec<String>) -> Result<Self> {
        let first = pages.first().ok_or(NmError::EmptyPayload)?;
        let control = declared_pages(&decode_page(first)?)?.is_some();
        let page_count = if control { pages.len() - 1 } else { pages.len() };
        Ok(Self { pages, page_count })
    }

    /// Every wire page, control page first when present.
    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    /// Number of data pages, excluding the control page.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn has_control_header(&self) -> bool {
        self.pages.len() > self.page_count
    }

    /// Decode and concatenate the data pages.
    ///
    /// A leading `Pages` header is dropped; its count is only a hint.
    pub fn to_plaintext(&self) -> Result<String> {
        let mut pages = self.pages.iter();
        let mut text = String::new();

        let Some(first) = pages.next() else {
            return Err(NmError::EmptyPayload);
        };
        let first = decode_page(first)?;
        let expected = declared_pages(&first)?;
        if expected.is_none() {
            text.push_str(&first);
        }

        let mut received = 0usize;
        for page in pages {
            text.push_str(&decode_page(page)?);
            received += 1;
        }
        if let Some(expected) = expected {
            if expected != received {
                warn!(expected, received, "page count differs from control header");
            }
        }
        Ok(text)
    }
}

/// Slices of at most `size` chars each, cut on char boundaries.
fn char_chunks(text: &str, size: usize) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let end = rest
            .char_indices()
            .nth(size)
            .map_or(rest.len(), |(idx, _)| idx);
        let (head, tail) = rest.split_at(end);
        rest = tail;
        Some(head)
    })
}
