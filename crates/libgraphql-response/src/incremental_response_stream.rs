use crate::GraphQLResponse;
use crate::IncrementalError;
use crate::IncrementalMerger;
use crate::MultipartDecoder;
use futures::Stream;
use std::collections::VecDeque;
use std::pin::Pin;
use std::task::Context;
use std::task::Poll;

/// A [`Stream`] of the responses of one incremental request, driven by a
/// stream of `multipart/mixed` body chunks.
///
/// Nothing is read from `source` until the stream is first polled. The
/// stream ends after the payload with `hasNext: false` or after the first
/// error, and drops `source` at that point. Dropping the stream drops
/// `source` too, which is how a consumer cancels the request.
pub struct IncrementalResponseStream<S> {
    decoder: MultipartDecoder,
    done: bool,
    merger: IncrementalMerger,
    pending: VecDeque<String>,
    source: Option<Pin<Box<S>>>,
}
impl<S> IncrementalResponseStream<S> {
    pub fn new(source: S, merger: IncrementalMerger) -> Self {
        Self {
            decoder: MultipartDecoder::default(),
            done: false,
            merger,
            pending: VecDeque::new(),
            source: Some(Box::pin(source)),
        }
    }

    fn close(&mut self) {
        self.done = true;
        self.pending.clear();
        self.source = None;
    }

    pub fn merger(&self) -> &IncrementalMerger {
        &self.merger
    }

    pub fn with_boundary(mut self, boundary: &str) -> Self {
        self.decoder = MultipartDecoder::new(boundary);
        self
    }
}
impl<S, B, E> Stream for IncrementalResponseStream<S>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    type Item = Result<GraphQLResponse, IncrementalError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if let Some(part) = this.pending.pop_front() {
                let result = this.merger.apply_json(&part);
                if result.is_err() || this.merger.is_terminal() {
                    this.close();
                }
                return Poll::Ready(Some(result));
            }
            if this.done {
                return Poll::Ready(None);
            }
            let Some(source) = this.source.as_mut() else {
                this.close();
                return Poll::Ready(Some(Err(IncrementalError::StreamEndedEarly)));
            };

            match std::task::ready!(source.as_mut().poll_next(cx)) {
                Some(Ok(chunk)) => match this.decoder.push(chunk.as_ref()) {
                    Ok(parts) => this.pending.extend(parts),
                    Err(err) => {
                        this.close();
                        return Poll::Ready(Some(Err(err)));
                    },
                },
                Some(Err(err)) => {
                    this.close();
                    return Poll::Ready(Some(Err(IncrementalError::Transport(err.into()))));
                },
                None => {
                    this.source = None;
                    match this.decoder.finish() {
                        Ok(parts) => this.pending.extend(parts),
                        Err(err) => {
                            this.close();
                            return Poll::Ready(Some(Err(err)));
                        },
                    }
                },
            }
        }
    }
}
