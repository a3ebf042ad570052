//! Incremental parser for the backend's token stream framing.
//!
//! Generation endpoints stream newline-delimited `data: {json}` lines. This
//! is the app's own framing, not full Server-Sent-Events semantics, so it is
//! parsed by hand: a byte buffer accumulates chunks, complete lines are split
//! off, and the partial tail is retained for the next chunk. Keeping the
//! undecoded tail in the buffer means a multi-byte UTF-8 character split
//! across chunk boundaries is reassembled before decoding.
//!
//! A frame is either a token (`{"token": "..."}`) or the completion sentinel
//! (`{"done": true}`). After the sentinel the parser refuses further input.
//! A `data: ` line that fails to parse as JSON aborts the stream with a
//! protocol error: the frames are machine generated, so a bad one means the
//! stream is garbage and skipping it would hide data loss.

use crate::error::ApiError;

const DATA_PREFIX: &str = "data: ";

/// One unit of a generation stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamFrame {
    /// A piece of generated text, in arrival order.
    Token(String),
    /// End of stream. No tokens follow.
    Done,
}

/// Incremental frame parser. Feed it raw response chunks with [`push`],
/// then call [`finish`] when the underlying stream ends.
///
/// [`push`]: FrameParser::push
/// [`finish`]: FrameParser::finish
#[derive(Debug, Default)]
pub struct FrameParser {
    buf: Vec<u8>,
    done: bool,
}

impl FrameParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the completion sentinel has been parsed.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Consume a chunk of raw bytes and return the frames it completed,
    /// in order. Input after the completion sentinel is discarded.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<StreamFrame>, ApiError> {
        if self.done {
            return Ok(Vec::new());
        }
        self.buf.extend_from_slice(chunk);

        let mut frames = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            if let Some(frame) = self.parse_line(&line[..line.len() - 1])? {
                let stop = frame == StreamFrame::Done;
                frames.push(frame);
                if stop {
                    self.done = true;
                    self.buf.clear();
                    break;
                }
            }
        }
        Ok(frames)
    }

    /// Flush the stream end: process a non-empty unterminated final line,
    /// then guarantee exactly one [`StreamFrame::Done`] even when the server
    /// closed without sending the sentinel (or sent nothing at all).
    pub fn finish(mut self) -> Result<Vec<StreamFrame>, ApiError> {
        if self.done {
            return Ok(Vec::new());
        }
        let mut frames = Vec::new();
        if !self.buf.is_empty() {
            let tail = std::mem::take(&mut self.buf);
            if let Some(frame) = self.parse_line(&tail)? {
                frames.push(frame);
            }
        }
        if frames.last() != Some(&StreamFrame::Done) {
            frames.push(StreamFrame::Done);
        }
        Ok(frames)
    }

    /// Parse one complete line. Lines without the `data: ` prefix are
    /// ignored; anything after the prefix must be a valid frame.
    fn parse_line(&self, line: &[u8]) -> Result<Option<StreamFrame>, ApiError> {
        let line = match line.last() {
            Some(b'\r') => &line[..line.len() - 1],
            _ => line,
        };
        if line.is_empty() {
            return Ok(None);
        }
        let text = std::str::from_utf8(line)
            .map_err(|e| ApiError::Protocol(format!("invalid UTF-8 in frame: {}", e)))?;
        let payload = match text.strip_prefix(DATA_PREFIX) {
            Some(p) => p,
            None => return Ok(None),
        };

        let value: serde_json::Value = serde_json::from_str(payload)
            .map_err(|e| ApiError::Protocol(format!("malformed frame {:?}: {}", payload, e)))?;

        if value.get("done").and_then(|v| v.as_bool()).unwrap_or(false) {
            return Ok(Some(StreamFrame::Done));
        }
        match value.get("token").and_then(|v| v.as_str()) {
            Some(token) => Ok(Some(StreamFrame::Token(token.to_string()))),
            None => Err(ApiError::Protocol(format!(
                "frame has neither token nor done: {:?}",
                payload
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(chunks: &[&[u8]]) -> Vec<StreamFrame> {
        let mut parser = FrameParser::new();
        let mut frames = Vec::new();
        for chunk in chunks {
            frames.extend(parser.push(chunk).unwrap());
            if parser.is_done() {
                return frames;
            }
        }
        frames.extend(parser.finish().unwrap());
        frames
    }

    #[test]
    fn test_tokens_then_done_in_order() {
        let frames = collect(&[
            b"data: {\"token\":\"Hi\"}\n",
            b"data: {\"token\":\" there\"}\n",
            b"data: {\"done\":true}\n",
        ]);
        assert_eq!(
            frames,
            vec![
                StreamFrame::Token("Hi".to_string()),
                StreamFrame::Token(" there".to_string()),
                StreamFrame::Done,
            ]
        );
    }

    #[test]
    fn test_split_mid_line() {
        let frames = collect(&[
            b"data: {\"tok",
            b"en\":\"Hi\"}\ndata: {\"token\":\" there\"}\nda",
            b"ta: {\"done\":true}\n",
        ]);
        assert_eq!(
            frames,
            vec![
                StreamFrame::Token("Hi".to_string()),
                StreamFrame::Token(" there".to_string()),
                StreamFrame::Done,
            ]
        );
    }

    #[test]
    fn test_split_mid_utf8_rune() {
        // "på" is [0x70, 0xc3, 0xa5]; split between the two bytes of 'å'.
        let full = "data: {\"token\":\"p\u{e5}\"}\n".as_bytes();
        let frames = collect(&[&full[..9], &full[9..]]);
        assert_eq!(frames[0], StreamFrame::Token("p\u{e5}".to_string()));
    }

    #[test]
    fn test_close_without_done_still_completes_once() {
        let frames = collect(&[b"data: {\"token\":\"X\"}\n"]);
        assert_eq!(
            frames,
            vec![StreamFrame::Token("X".to_string()), StreamFrame::Done]
        );
    }

    #[test]
    fn test_unterminated_final_line_is_not_dropped() {
        let frames = collect(&[b"data: {\"token\":\"tail\"}"]);
        assert_eq!(
            frames,
            vec![StreamFrame::Token("tail".to_string()), StreamFrame::Done]
        );
    }

    #[test]
    fn test_empty_stream_completes_exactly_once() {
        let frames = collect(&[]);
        assert_eq!(frames, vec![StreamFrame::Done]);
    }

    #[test]
    fn test_nothing_after_done() {
        let mut parser = FrameParser::new();
        let frames = parser
            .push(b"data: {\"done\":true}\ndata: {\"token\":\"late\"}\n")
            .unwrap();
        assert_eq!(frames, vec![StreamFrame::Done]);
        assert!(parser.is_done());
        assert!(parser.push(b"data: {\"token\":\"later\"}\n").unwrap().is_empty());
    }

    #[test]
    fn test_non_data_lines_ignored() {
        let frames = collect(&[b"event: ping\n\ndata: {\"token\":\"A\"}\n"]);
        assert_eq!(
            frames,
            vec![StreamFrame::Token("A".to_string()), StreamFrame::Done]
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        let frames = collect(&[b"data: {\"token\":\"A\"}\r\ndata: {\"done\":true}\r\n"]);
        assert_eq!(
            frames,
            vec![StreamFrame::Token("A".to_string()), StreamFrame::Done]
        );
    }

    #[test]
    fn test_malformed_frame_is_fatal() {
        let mut parser = FrameParser::new();
        let err = parser.push(b"data: {not json}\n").unwrap_err();
        assert!(matches!(err, ApiError::Protocol(_)));
    }

    #[test]
    fn test_frame_without_token_or_done_is_fatal() {
        let mut parser = FrameParser::new();
        let err = parser.push(b"data: {\"other\":1}\n").unwrap_err();
        assert!(matches!(err, ApiError::Protocol(_)));
    }
}
