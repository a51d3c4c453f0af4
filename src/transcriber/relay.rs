//! Bounded byte stream used as an upload body.
//!
//! The upload endpoint needs the size before the first byte. [`RelayBody`]
//! forwards chunks from a source stream (a local file or a download) and
//! checks that the source delivers exactly the declared number of bytes.
//! Dropping the body drops the source, which closes the file or connection.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::Stream;

pub struct RelayBody<S> {
    source: S,
    declared: u64,
    sent: u64,
    done: bool,
}

impl<S> RelayBody<S> {
    pub fn new(source: S, declared: u64) -> Self {
        Self {
            source,
            declared,
            sent: 0,
            done: false,
        }
    }
}

impl<S, E> Stream for RelayBody<S>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    type Item = io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.done {
            return Poll::Ready(None);
        }

        match Pin::new(&mut this.source).poll_next(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Some(Ok(chunk))) => {
                this.sent += chunk.len() as u64;
                if this.sent > this.declared {
                    this.done = true;
                    return Poll::Ready(Some(Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!(
                            "source sent more than the declared {} bytes",
                            this.declared
                        ),
                    ))));
                }
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(e))) => {
                this.done = true;
                Poll::Ready(Some(Err(io::Error::other(e))))
            }
            Poll::Ready(None) => {
                this.done = true;
                if this.sent < this.declared {
                    return Poll::Ready(Some(Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        format!(
                            "source ended after {} of {} declared bytes",
                            this.sent, this.declared
                        ),
                    ))));
                }
                Poll::Ready(None)
            }
        }
    }
}
