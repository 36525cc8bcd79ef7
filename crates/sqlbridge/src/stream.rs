//! Lazy row sequences.
//!
//! A [`RowStream`] owns both the backend cursor and the connection that
//! produced it. The connection closes exactly once: when the cursor drains,
//! when the stream hits an error, or when the stream is dropped early --
//! whichever comes first. A drained stream stays terminated; it never
//! restarts.

use crate::connection::{Connection, RowCursor};
use crate::error::AccessResult;
use crate::record::RecordLoad;
use crate::row::Row;
use futures_core::Stream;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context, Poll};

// The dyn cursor cannot lend a borrowed future across polls, so each pull is
// an owned round trip: the future takes the cursor and hands it back with
// the result.
type NextFuture =
    Pin<Box<dyn Future<Output = (Box<dyn RowCursor>, AccessResult<Option<Row>>)> + Send>>;

enum CursorState {
    Idle(Box<dyn RowCursor>),
    Pending(NextFuture),
    Done,
}

#[must_use]
pub struct RowStream {
    state: CursorState,
    connection: Option<Box<dyn Connection>>,
}

impl RowStream {
    pub(crate) fn new(cursor: Box<dyn RowCursor>, connection: Box<dyn Connection>) -> Self {
        Self {
            state: CursorState::Idle(cursor),
            connection: Some(connection),
        }
    }

    fn finish(&mut self) {
        self.state = CursorState::Done;
        if let Some(mut connection) = self.connection.take() {
            connection.close();
        }
    }
}

impl std::fmt::Debug for RowStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowStream").finish_non_exhaustive()
    }
}

impl Stream for RowStream {
    type Item = AccessResult<Row>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match std::mem::replace(&mut self.state, CursorState::Done) {
                CursorState::Idle(mut cursor) => {
                    self.state = CursorState::Pending(Box::pin(async move {
                        let result = cursor.next_row().await;
                        (cursor, result)
                    }));
                }
                CursorState::Pending(mut future) => match future.as_mut().poll(cx) {
                    Poll::Pending => {
                        self.state = CursorState::Pending(future);
                        return Poll::Pending;
                    }
                    Poll::Ready((cursor, Ok(Some(row)))) => {
                        self.state = CursorState::Idle(cursor);
                        return Poll::Ready(Some(Ok(row)));
                    }
                    Poll::Ready((_, Ok(None))) => {
                        self.finish();
                        return Poll::Ready(None);
                    }
                    Poll::Ready((_, Err(e))) => {
                        self.finish();
                        return Poll::Ready(Some(Err(e)));
                    }
                },
                CursorState::Done => return Poll::Ready(None),
            }
        }
    }
}

impl Drop for RowStream {
    fn drop(&mut self) {
        // Abandoned mid-iteration: the connection still needs releasing.
        if let Some(mut connection) = self.connection.take() {
            connection.close();
        }
    }
}

/// A [`RowStream`] that materializes each row into a fresh `R` via
/// [`RecordLoad`].
#[must_use]
pub struct RecordStream<R> {
    inner: RowStream,
    _marker: PhantomData<fn() -> R>,
}

impl<R> RecordStream<R> {
    pub(crate) fn new(inner: RowStream) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }
}

impl<R: RecordLoad + Default> Stream for RecordStream<R> {
    type Item = AccessResult<R>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match Pin::new(&mut self.inner).poll_next(cx) {
            Poll::Ready(Some(Ok(row))) => {
                let mut record = R::default();
                record.load(&row);
                Poll::Ready(Some(Ok(record)))
            }
            Poll::Ready(Some(Err(e))) => Poll::Ready(Some(Err(e))),
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}
