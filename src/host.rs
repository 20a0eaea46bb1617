//! Frame codec and the stdio connection.
//!
//! One frame on the wire is a 4-byte length in native byte order followed by
//! that many bytes of UTF-8 JSON (always a single JSON string here).

use std::io::{self, BufRead, BufReader, BufWriter, Read, Stdin, Stdout, Write};
use tracing::{debug, info};

use crate::config::HostConfig;
use crate::endian::ByteOrder;
use crate::error::{NmError, Result};

/// Read the length prefix, telling a short header apart from a clean EOF.
fn read_len<R: Read>(r: &mut R, order: ByteOrder) -> Result<u32> {
    let mut len_buf = [0u8; 4];
    let mut filled = 0;
    while filled < len_buf.len() {
        match r.read(&mut len_buf[filled..]) {
            Ok(0) => return Err(NmError::TruncatedHeader { received: filled }),
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    debug!(raw = ?len_buf, "read: length header");
    Ok(order.decode_u32(len_buf))
}

/// Frame an already JSON-encoded payload: length prefix + payload bytes.
pub fn encode_frame(payload: &str, order: ByteOrder, max_size: usize) -> Result<Vec<u8>> {
    let body = payload.as_bytes();
    if body.len() > max_size {
        return Err(NmError::OutgoingTooLarge {
            len: body.len(),
            max: max_size,
        });
    }
    let len = u32::try_from(body.len()).map_err(|_| NmError::OutgoingTooLarge {
        len: body.len(),
        max: u32::MAX as usize,
    })?;
    let mut out = Vec::with_capacity(4 + body.len());
    out.extend_from_slice(&order.encode_u32(len));
    out.extend_from_slice(body);
    Ok(out)
}

/// Read one frame body as raw JSON text, without decoding it.
pub fn decode_frame<R: Read>(reader: &mut R, order: ByteOrder, max_size: usize) -> Result<String> {
    let declared = read_len(&mut *reader, order)? as usize;
    if declared > max_size {
        return Err(NmError::IncomingTooLarge {
            len: declared,
            max: max_size,
        });
    }
    // `take` keeps a lying header from forcing a large up-front allocation.
    let mut buf = Vec::with_capacity(declared.min(64 * 1024));
    let received = reader.take(declared as u64).read_to_end(&mut buf)?;
    if received != declared {
        return Err(NmError::LengthMismatch { declared, received });
    }
    Ok(String::from_utf8(buf)?)
}

/// The host's input/output stream pair.
///
/// Production code binds it to stdin/stdout with [`Connection::stdio`]; tests
/// use any `BufRead`/`Write` pair.
#[derive(Debug)]
pub struct Connection<R, W> {
    input: R,
    output: W,
    byte_order: ByteOrder,
    max_incoming: usize,
    max_outgoing: usize,
}

impl Connection<BufReader<Stdin>, BufWriter<Stdout>> {
    pub fn stdio(config: &HostConfig) -> Self {
        Self::new(BufReader::new(io::stdin()), BufWriter::new(io::stdout()), config)
    }
}

impl<R: BufRead, W: Write> Connection<R, W> {
    pub fn new(input: R, output: W, config: &HostConfig) -> Self {
        Self {
            input,
            output,
            byte_order: config.byte_order,
            max_incoming: config.max_incoming,
            max_outgoing: config.max_outgoing,
        }
    }

    /// Read one frame and return its body as raw JSON text.
    pub fn read_page(&mut self) -> Result<String> {
        let page = decode_frame(&mut self.input, self.byte_order, self.max_incoming)?;
        debug!(len = page.len(), "read: json page");
        Ok(page)
    }

    /// Read one frame and JSON-decode its body as a string.
    pub fn read_frame(&mut self) -> Result<String> {
        let page = self.read_page()?;
        let text: String = serde_json::from_str(&page)?;
        info!(len = text.len(), "received frame");
        Ok(text)
    }

    /// Write one frame. `payload` must already be JSON text.
    ///
    /// Header and body go out in a single `write_all`, then the writer is
    /// flushed.
    pub fn write_frame(&mut self, payload: &str) -> Result<()> {
        let frame = encode_frame(payload, self.byte_order, self.max_outgoing)?;
        self.output.write_all(&frame)?;
        self.output.flush()?;
        debug!(len = payload.len(), "send: frame written");
        Ok(())
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}
