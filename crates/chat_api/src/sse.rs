use crate::events::StreamEvent;

/// Payload that ends a stream on purpose.
pub const DONE_SENTINEL: &str = "[DONE]";

const DATA_PREFIX: &str = "data: ";

/// Incremental decoder for `data: <json>` line streams.
///
/// Bytes are buffered until a newline arrives, so the output does not depend
/// on how the transport fragments the body (multi-byte characters included).
/// Only the trailing partial line is kept between feeds, and its length is
/// not capped.
#[derive(Debug, Default)]
pub struct SseLineDecoder {
    buffer: Vec<u8>,
    finished: bool,
}

enum LineOutcome {
    Event(StreamEvent),
    Done,
    Skip,
}

impl SseLineDecoder {
    /// Feed arbitrary bytes and drain every event completed by them.
    ///
    /// After the `[DONE]` sentinel the decoder is finished: the rest of the
    /// chunk and any later input are discarded.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        if self.finished {
            return events;
        }

        self.buffer.extend_from_slice(bytes);
        let mut consumed = 0;

        while let Some(offset) = self.buffer[consumed..].iter().position(|byte| *byte == b'\n') {
            let line_end = consumed + offset;
            let line = String::from_utf8_lossy(&self.buffer[consumed..line_end]).into_owned();
            consumed = line_end + 1;

            match decode_line(&line) {
                LineOutcome::Event(event) => events.push(event),
                LineOutcome::Done => {
                    self.finished = true;
                    self.buffer.clear();
                    return events;
                }
                LineOutcome::Skip => {}
            }
        }

        self.buffer.drain(..consumed);
        events
    }

    /// Parse a complete body in one shot.
    pub fn parse_frames(input: &str) -> Vec<StreamEvent> {
        let mut decoder = Self::default();
        decoder.feed(input.as_bytes())
    }

    /// True once the `[DONE]` sentinel has been seen.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn has_partial_line(&self) -> bool {
        !self.buffer.is_empty()
    }
}

fn decode_line(line: &str) -> LineOutcome {
    let Some(rest) = line.strip_prefix(DATA_PREFIX) else {
        return LineOutcome::Skip;
    };

    let payload = rest.trim();
    if payload == DONE_SENTINEL {
        return LineOutcome::Done;
    }

    match StreamEvent::from_payload(payload) {
        Some(event) => LineOutcome::Event(event),
        None => {
            tracing::trace!(payload, "skipping malformed stream frame");
            LineOutcome::Skip
        }
    }
}
