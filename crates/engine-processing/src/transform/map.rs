use async_stream::stream;
use futures::{
    future::join_all,
    stream::{BoxStream, StreamExt},
};
use std::future::Future;

/// Applies `f` to the upstream items in batches of `max_in_flight`.
///
/// A batch is filled, all of its calls run concurrently, and the results are
/// emitted in submission order once the whole batch has completed. `None`
/// results are dropped, so `f` can filter as well as transform. At most
/// `max_in_flight` calls are ever pending at once.
pub fn map_batched<T, U, F, Fut>(
    upstream: BoxStream<'static, T>,
    mut f: F,
    max_in_flight: usize,
) -> BoxStream<'static, U>
where
    T: Send + 'static,
    U: Send + 'static,
    F: FnMut(T) -> Fut + Send + 'static,
    Fut: Future<Output = Option<U>> + Send + 'static,
{
    let max_in_flight = max_in_flight.max(1);

    stream! {
        let mut upstream = upstream;
        let mut pending = Vec::new();

        while let Some(item) = upstream.next().await {
            pending.push(f(item));
            if pending.len() == max_in_flight {
                let batch = std::mem::take(&mut pending);
                for output in join_all(batch).await.into_iter().flatten() {
                    yield output;
                }
            }
        }

        for output in join_all(pending).await.into_iter().flatten() {
            yield output;
        }
    }
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use std::time::Duration;

    #[tokio::test]
    async fn test_results_keep_submission_order() {
        let upstream = stream::iter(vec![1u64, 2, 3, 4, 5]).boxed();
        let mapped = map_batched(
            upstream,
            |x| async move {
                // earlier items finish last
                tokio::time::sleep(Duration::from_millis((6 - x) * 5)).await;
                Some(x * 10)
            },
            2,
        );

        let out: Vec<u64> = mapped.collect().await;
        assert_eq!(out, vec![10, 20, 30, 40, 50]);
    }

    #[tokio::test]
    async fn test_none_results_are_dropped() {
        let upstream = stream::iter(1..=7).boxed();
        let mapped = map_batched(
            upstream,
            |x: i32| async move { (x % 2 == 0).then_some(x) },
            3,
        );

        let out: Vec<i32> = mapped.collect().await;
        assert_eq!(out, vec![2, 4, 6]);
    }

    #[tokio::test]
    async fn test_zero_in_flight_still_progresses() {
        let upstream = stream::iter(vec!["a", "b"]).boxed();
        let mapped = map_batched(upstream, |s| async move { Some(s.to_uppercase()) }, 0);

        let out: Vec<String> = mapped.collect().await;
        assert_eq!(out, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_huge_bound_runs_everything_in_one_batch() {
        let upstream = stream::iter(vec![1u64, 2, 3]).boxed();
        let mapped = map_batched(upstream, |x| async move { Some(x) }, usize::MAX);

        let out: Vec<u64> = mapped.collect().await;
        assert_eq!(out, vec![1, 2, 3]);
    }
}
