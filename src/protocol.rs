//! The page-header convention on top of single frames.
//!
//! Outbound: a long text goes out as a `Pages: N` control frame followed by
//! `N` data frames. Inbound: the first frame is inspected; a `Pages` header
//! means exactly `N` more frames belong to the same logical message.

use std::io::{BufRead, BufReader, BufWriter, Stdin, Stdout, Write};
use tracing::{debug, info};

use crate::config::HostConfig;
use crate::error::Result;
use crate::host::Connection;
use crate::message::{decode_page, declared_pages, Message};

#[derive(Debug)]
pub struct Protocol<R, W> {
    conn: Connection<R, W>,
    page_size: usize,
}

impl Protocol<BufReader<Stdin>, BufWriter<Stdout>> {
    pub fn stdio(config: &HostConfig) -> Self {
        Self::new(Connection::stdio(config), config)
    }
}

impl<R: BufRead, W: Write> Protocol<R, W> {
    pub fn new(conn: Connection<R, W>, config: &HostConfig) -> Self {
        Self {
            conn,
            page_size: config.page_size,
        }
    }

    /// Read one logical message, following a `Pages` header if present.
    pub fn receive_logical_message(&mut self) -> Result<String> {
        let first = self.conn.read_page()?;
        let declared = declared_pages(&decode_page(&first)?)?;

        // The count is peer-supplied: pages are pushed as they arrive, never
        // preallocated from it.
        let mut pages = vec![first];
        if let Some(count) = declared {
            debug!(count, "read: paged message");
            for page in 1..=count {
                debug!(page, "read: page");
                pages.push(self.conn.read_page()?);
            }
        }

        let text = Message::from_pages(pages)?.to_plaintext()?;
        info!(chars = text.chars().count(), "received message");
        Ok(text)
    }

    /// Page `text` and write every page, control page first.
    pub fn send_logical_message(&mut self, text: &str) -> Result<()> {
        let message = Message::from_plaintext(text, self.page_size)?;
        let paged = message.has_control_header();
        for (idx, page) in message.pages().iter().enumerate() {
            if paged {
                debug!(page = idx, of = message.page_count(), "send: page");
            }
            self.conn.write_frame(page)?;
        }
        info!(pages = message.page_count(), "message sent");
        Ok(())
    }

    pub fn into_connection(self) -> Connection<R, W> {
        self.conn
    }
}
