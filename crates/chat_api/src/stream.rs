use std::collections::VecDeque;

use futures_util::stream::{self, BoxStream, Stream};
use futures_util::StreamExt;
use reqwest::Response;

use crate::error::ChatApiError;
use crate::events::{ChatResponse, StreamEvent};
use crate::sse::SseLineDecoder;

/// Raw body chunks as delivered by the transport.
pub type ByteChunkStream = BoxStream<'static, Result<Vec<u8>, ChatApiError>>;

/// Lazy sequence of [`StreamEvent`]s read from an open response body.
///
/// The body is only polled when [`EventStream::next_event`] runs out of
/// already-decoded events, so the consumer sets the pace. Dropping the stream
/// stops reading; nothing is sent upstream.
pub struct EventStream {
    body: ByteChunkStream,
    decoder: SseLineDecoder,
    ready: VecDeque<StreamEvent>,
    closed: bool,
}

impl EventStream {
    pub fn new(body: ByteChunkStream) -> Self {
        Self {
            body,
            decoder: SseLineDecoder::default(),
            ready: VecDeque::new(),
            closed: false,
        }
    }

    /// Wraps pre-recorded chunks, delivered one per read.
    pub fn from_chunks<I, B>(chunks: I) -> Self
    where
        I: IntoIterator<Item = B>,
        I::IntoIter: Send + 'static,
        B: Into<Vec<u8>>,
    {
        let body = stream::iter(
            chunks
                .into_iter()
                .map(|chunk| Ok::<Vec<u8>, ChatApiError>(chunk.into())),
        )
        .boxed();
        Self::new(body)
    }

    pub(crate) fn from_response(response: Response) -> Self {
        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()).map_err(ChatApiError::from))
            .boxed();
        Self::new(body)
    }

    /// Returns the next event, reading more of the body when needed.
    ///
    /// `None` marks the end of the sequence: the body closed, or `[DONE]` was
    /// decoded. A read failure is returned once and ends the sequence.
    pub async fn next_event(&mut self) -> Option<Result<StreamEvent, ChatApiError>> {
        loop {
            if let Some(event) = self.ready.pop_front() {
                return Some(Ok(event));
            }
            if self.closed || self.decoder.is_finished() {
                return None;
            }

            match self.body.next().await {
                None => {
                    self.closed = true;
                    return None;
                }
                Some(Err(error)) => {
                    self.closed = true;
                    return Some(Err(error));
                }
                Some(Ok(chunk)) => self.ready.extend(self.decoder.feed(&chunk)),
            }
        }
    }

    /// Adapts the sequence into a `futures` stream.
    pub fn into_stream(self) -> impl Stream<Item = Result<StreamEvent, ChatApiError>> + Send {
        stream::unfold(self, |mut events| async move {
            let item = events.next_event().await?;
            Some((item, events))
        })
    }

    /// Drains the sequence into a single reply.
    ///
    /// Content pieces are concatenated and tool invocations kept in arrival
    /// order; a `done` event stops reading.
    pub async fn collect_response(mut self) -> Result<ChatResponse, ChatApiError> {
        let mut message = String::new();
        let mut tools_invoked = Vec::new();

        while let Some(event) = self.next_event().await {
            match event? {
                StreamEvent::Content(text) => message.push_str(&text),
                StreamEvent::ToolInvocation(invocation) => tools_invoked.push(invocation),
                StreamEvent::Done => break,
            }
        }

        Ok(ChatResponse {
            message,
            tools_invoked,
            conversation_id: None,
        })
    }
}
