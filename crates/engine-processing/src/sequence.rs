use crate::{
    source::{locator, paginator},
    transform::{follow, map::map_batched},
};
use engine_core::{
    config::{DEFAULT_MAX_IN_FLIGHT, LocateConfig},
    context::query::QueryContext,
    error::QueryError,
    metrics::MetricsSnapshot,
    progress::{Completion, Progress},
};
use futures::{
    future,
    stream::{BoxStream, Stream, StreamExt},
};
use model::records::record::Record;
use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

/// A lazy, single-pass, pull-driven sequence.
///
/// Every stage derived from one root query shares that query's context, so
/// `total`, `completion` and `metrics` can be read from any stage. Nothing is
/// fetched until the sequence is polled, and only as many pages as the
/// consumer actually pulls are ever requested.
pub struct Sequence<T> {
    stream: BoxStream<'static, T>,
    ctx: Arc<QueryContext>,
}

impl Sequence<Record> {
    /// Every record of the index, in order.
    pub fn paginate(ctx: Arc<QueryContext>) -> Self {
        let stream = paginator::paginate(Arc::clone(&ctx));
        Self { stream, ctx }
    }

    /// Only the records whose key field equals the configured key.
    pub fn locate(ctx: Arc<QueryContext>, locate: LocateConfig) -> Self {
        let stream = locator::locate(Arc::clone(&ctx), locate);
        Self { stream, ctx }
    }

    /// Fetches the document linked from `field` and stores the parsed result
    /// under `target` (or back into `field` when `target` is `None`).
    pub fn follow(self, field: &str, target: Option<&str>) -> Self {
        self.follow_bounded(field, target, DEFAULT_MAX_IN_FLIGHT)
    }

    pub fn follow_bounded(self, field: &str, target: Option<&str>, max_in_flight: usize) -> Self {
        let target = target.unwrap_or(field).to_string();
        let stream = follow::follow(
            self.stream,
            Arc::clone(&self.ctx),
            field.to_string(),
            target,
            max_in_flight,
        );
        Self {
            stream,
            ctx: self.ctx,
        }
    }
}

impl<T: Send + 'static> Sequence<T> {
    pub fn new(stream: BoxStream<'static, T>, ctx: Arc<QueryContext>) -> Self {
        Self { stream, ctx }
    }

    pub fn progress(&self) -> Progress {
        self.ctx.progress()
    }

    /// Total record count of the index, once the first page has arrived.
    pub fn total(&self) -> Option<u64> {
        self.ctx.progress().total()
    }

    pub fn completion(&self) -> Completion {
        self.ctx.progress().completion()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.ctx.metrics().snapshot()
    }

    /// Drops the first `n` items.
    pub fn skip(self, n: usize) -> Self {
        self.with_stream(|s| s.skip(n).boxed())
    }

    /// Yields at most `n` items, then stops pulling upstream.
    pub fn limit(self, n: usize) -> Self {
        self.with_stream(|s| s.take(n).boxed())
    }

    /// Items `from..to`. Empty when `to <= from`.
    pub fn slice(self, from: usize, to: usize) -> Self {
        self.skip(from).limit(to.saturating_sub(from))
    }

    pub fn filter<F>(self, mut predicate: F) -> Self
    where
        F: FnMut(&T) -> bool + Send + 'static,
    {
        self.with_stream(|s| s.filter(move |item| future::ready(predicate(item))).boxed())
    }

    /// Async transform with the default concurrency bound.
    pub fn map<U, F, Fut>(self, f: F) -> Sequence<U>
    where
        U: Send + 'static,
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: Future<Output = Option<U>> + Send + 'static,
    {
        self.map_bounded(f, DEFAULT_MAX_IN_FLIGHT)
    }

    /// Async transform running at most `max_in_flight` calls at once.
    /// Items mapped to `None` are dropped.
    pub fn map_bounded<U, F, Fut>(self, f: F, max_in_flight: usize) -> Sequence<U>
    where
        U: Send + 'static,
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: Future<Output = Option<U>> + Send + 'static,
    {
        Sequence {
            stream: map_batched(self.stream, f, max_in_flight),
            ctx: self.ctx,
        }
    }

    /// Drains the sequence. Transport failures truncate the result silently;
    /// use [`Sequence::try_all`] to observe them.
    pub async fn all(self) -> Vec<T> {
        self.stream.collect().await
    }

    /// The first item, without pulling a second one.
    pub async fn first(mut self) -> Option<T> {
        self.stream.next().await
    }

    /// Like [`Sequence::all`], but fails if the source stopped on a failed page.
    pub async fn try_all(self) -> Result<Vec<T>, QueryError> {
        let progress = self.progress();
        let items = self.all().await;
        progress.completion().check()?;
        Ok(items)
    }

    /// Like [`Sequence::first`], but an empty result caused by a failed page
    /// is an error.
    pub async fn try_first(self) -> Result<Option<T>, QueryError> {
        let progress = self.progress();
        match self.first().await {
            Some(item) => Ok(Some(item)),
            None => {
                progress.completion().check()?;
                Ok(None)
            }
        }
    }

    pub fn into_stream(self) -> BoxStream<'static, T> {
        self.stream
    }

    fn with_stream<F>(self, f: F) -> Self
    where
        F: FnOnce(BoxStream<'static, T>) -> BoxStream<'static, T>,
    {
        Self {
            stream: f(self.stream),
            ctx: self.ctx,
        }
    }
}

impl<T> Stream for Sequence<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.stream.poll_next_unpin(cx)
    }
}
