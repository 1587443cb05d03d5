//! CRLF line framing for the connection.
//!
//! Inbound bytes are split into lines on `\r\n`; a fragment that has not
//! seen its delimiter yet stays in the buffer until the next read completes
//! it. Lines longer than the codec's limit are thrown away rather than
//! buffered. Outbound commands are rendered and terminated with `\r\n`.

use std::io;

use bytes::Buf;
use bytes::BytesMut;
use tokio_util::codec::Decoder;
use tokio_util::codec::Encoder;
use tracing::debug;
use tracing::warn;

use crate::command::Command;

const DELIMITER: &[u8] = b"\r\n";

/// Room for a 512 byte IRC line plus IRCv3 message tags.
pub const DEFAULT_MAX_LEN: usize = 8704;

#[derive(Debug)]
pub struct LineCodec {
    /// Where to resume scanning for a delimiter in the buffered bytes.
    next_index: usize,
    /// Longest line accepted, delimiter excluded.
    max_len: usize,
    /// Set while skipping the rest of an oversized line.
    discarding: bool,
}

impl LineCodec {
    pub fn new() -> Self {
        Self::with_max_len(DEFAULT_MAX_LEN)
    }

    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
            discarding: false,
        }
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>, io::Error> {
        loop {
            let Some(offset) = src[self.next_index..]
                .windows(DELIMITER.len())
                .position(|window| window == DELIMITER)
            else {
                if src.len() > self.max_len {
                    if !self.discarding {
                        warn!(bytes = src.len(), limit = self.max_len, "Discarding oversized line");
                        self.discarding = true;
                    }
                    src.advance(src.len() - 1);
                }

                // Keep the last byte in scan range, it may be a CR whose LF is still in flight.
                self.next_index = src.len().saturating_sub(1);
                return Ok(None);
            };

            let end = self.next_index + offset;
            let frame = src.split_to(end + DELIMITER.len());
            self.next_index = 0;

            if self.discarding {
                self.discarding = false;
                continue;
            }

            if end == 0 {
                continue;
            }

            if end > self.max_len {
                warn!(bytes = end, limit = self.max_len, "Discarding oversized line");
                continue;
            }

            // Invalid byte sequences become U+FFFD instead of failing the read.
            let line = String::from_utf8_lossy(&frame[..end]).into_owned();
            return Ok(Some(line));
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<String>, io::Error> {
        if let Some(line) = self.decode(src)? {
            return Ok(Some(line));
        }

        if !src.is_empty() {
            debug!(bytes = src.len(), "Dropping unterminated fragment at end of stream");
            src.clear();
        }
        self.next_index = 0;
        self.discarding = false;

        Ok(None)
    }
}

impl Encoder<Command> for LineCodec {
    type Error = io::Error;

    fn encode(&mut self, command: Command, dst: &mut BytesMut) -> Result<(), io::Error> {
        let mut line = command.to_string();

        // Text echoed from the wire must not smuggle in extra lines.
        if line.contains(['\r', '\n']) {
            line = line.replace(['\r', '\n'], " ");
        }

        dst.reserve(line.len() + DELIMITER.len());
        dst.extend_from_slice(line.as_bytes());
        dst.extend_from_slice(DELIMITER);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(codec: &mut LineCodec, buf: &mut BytesMut) -> Vec<String> {
        let mut lines = Vec::new();
        while let Some(line) = codec.decode(buf).unwrap() {
            lines.push(line);
        }
        lines
    }

    #[test]
    fn decode_splits_and_skips_empty() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("\r\nPING :one\r\n\r\n\r\n:a!u@h PRIVMSG #test :hi\r\n");

        assert_eq!(drain(&mut codec, &mut buf), vec!["PING :one", ":a!u@h PRIVMSG #test :hi"]);
        assert!(buf.is_empty());
    }

    #[test]
    fn decode_is_independent_of_delimiter_position() {
        let input = "first\r\nsecond line\r\n\r\nthird\r\n";
        let expected = vec!["first", "second line", "third"];

        for split in 0..=input.len() {
            let mut codec = LineCodec::new();
            let mut buf = BytesMut::from(&input[..split]);
            let mut lines = drain(&mut codec, &mut buf);
            buf.extend_from_slice(input[split..].as_bytes());
            lines.extend(drain(&mut codec, &mut buf));

            assert_eq!(lines, expected, "split at {}", split);
        }
    }

    #[test]
    fn decode_buffers_partial_line() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("PING :ab");

        assert_eq!(codec.decode(&mut buf).unwrap(), None);

        buf.extend_from_slice(b"c123\r\n");
        assert_eq!(codec.decode(&mut buf).unwrap(), Some("PING :abc123".to_string()));
    }

    #[test]
    fn decode_invalid_utf8_is_replaced() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from(&b"PRIVMSG #test :bad \xff byte\r\n"[..]);

        assert_eq!(codec.decode(&mut buf).unwrap(), Some("PRIVMSG #test :bad \u{FFFD} byte".to_string()));
    }

    #[test]
    fn decode_eof_drops_fragment() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("done\r\ntrailing");

        assert_eq!(codec.decode_eof(&mut buf).unwrap(), Some("done".to_string()));
        assert_eq!(codec.decode_eof(&mut buf).unwrap(), None);
        assert!(buf.is_empty());
    }

    #[test]
    fn same_chunk_twice_yields_same_lines() {
        let chunk = "PING :x\r\n:bob!u@h PRIVMSG #test :again\r\n";
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from(chunk);
        let first = drain(&mut codec, &mut buf);
        buf.extend_from_slice(chunk.as_bytes());
        let second = drain(&mut codec, &mut buf);

        assert_eq!(first, second);
    }

    #[test]
    fn oversized_line_is_not_buffered() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::new();
        let chunk = vec![b'a'; 4096];

        for _ in 0..4096 {
            buf.extend_from_slice(&chunk);
            assert_eq!(codec.decode(&mut buf).unwrap(), None);
            assert!(buf.len() <= DEFAULT_MAX_LEN, "buffer held {} bytes", buf.len());
        }

        buf.extend_from_slice(b"tail of the long line\r\nPING :x\r\n");
        assert_eq!(drain(&mut codec, &mut buf), vec!["PING :x"]);
    }

    #[test]
    fn oversized_line_in_one_read_is_skipped() {
        let mut codec = LineCodec::with_max_len(8);
        let mut buf = BytesMut::from("way past the limit\r\nshort\r\n");

        assert_eq!(drain(&mut codec, &mut buf), vec!["short"]);
    }

    #[test]
    fn line_at_the_limit_is_kept() {
        let mut codec = LineCodec::with_max_len(5);
        let mut buf = BytesMut::from("exact\r\n");

        assert_eq!(drain(&mut codec, &mut buf), vec!["exact"]);
    }

    #[test]
    fn discard_ends_on_split_delimiter() {
        let mut codec = LineCodec::with_max_len(4);
        let mut buf = BytesMut::from("toolong\r");

        assert_eq!(codec.decode(&mut buf).unwrap(), None);
        buf.extend_from_slice(b"\nnext\r\n");
        assert_eq!(drain(&mut codec, &mut buf), vec!["next"]);
    }

    #[test]
    fn encode_appends_delimiter() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::new();

        codec.encode(Command::Pong("abc123".to_string()), &mut buf).unwrap();
        assert_eq!(&buf[..], b"PONG abc123\r\n");
    }

    #[test]
    fn encode_strips_embedded_newlines() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::new();

        codec.encode(Command::Privmsg("#test".to_string(), "hi\nQUIT".to_string()), &mut buf).unwrap();
        assert_eq!(&buf[..], b"PRIVMSG #test :hi QUIT\r\n");
    }
}
