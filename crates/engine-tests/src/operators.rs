#[cfg(test)]
mod tests {
    use crate::{backend::MockBackend, utils::*};
    use futures::StreamExt;
    use model::records::record::Record;
    use serde_json::{Value, json};
    use std::{
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    };
    use tracing_test::traced_test;

    fn blog_backend(n: u64) -> MockBackend {
        (1..=n).fold(MockBackend::new(posts(n)), |backend, id| {
            backend.with_document(
                &format!("https://example.com/blog/post-{id}"),
                &format!("<h1>Post {id}</h1>"),
            )
        })
    }

    #[traced_test]
    #[tokio::test]
    async fn test_skip_limit_and_slice() {
        let backend = MockBackend::new(posts(30)).into_shared();

        let skipped = index(&backend, 7).skip(25).all().await;
        assert_eq!(ids(&skipped), vec![26, 27, 28, 29, 30]);

        let sliced = index(&backend, 7).slice(10, 13).all().await;
        assert_eq!(ids(&sliced), vec![11, 12, 13]);

        let reversed = index(&backend, 7).slice(13, 10).all().await;
        assert!(reversed.is_empty());

        let past_end = index(&backend, 7).skip(100).all().await;
        assert!(past_end.is_empty());
    }

    #[traced_test]
    #[tokio::test]
    async fn test_map_bounds_concurrency() {
        let backend = MockBackend::new(posts(10)).into_shared();
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let results = {
            let active = Arc::clone(&active);
            let peak = Arc::clone(&peak);
            index(&backend, 4)
                .map_bounded(
                    move |record| {
                        let active = Arc::clone(&active);
                        let peak = Arc::clone(&peak);
                        async move {
                            let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                            peak.fetch_max(now, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(10)).await;
                            active.fetch_sub(1, Ordering::SeqCst);
                            Some(id_of(&record))
                        }
                    },
                    3,
                )
                .all()
                .await
        };

        assert_eq!(results, (1..=10).collect::<Vec<_>>());
        assert_eq!(peak.load(Ordering::SeqCst), 3);
    }

    #[traced_test]
    #[tokio::test]
    async fn test_map_keeps_order_when_work_finishes_out_of_order() {
        let backend = MockBackend::new(posts(5)).into_shared();

        let results = index(&backend, 10)
            .map_bounded(
                |record| async move {
                    let id = id_of(&record);
                    tokio::time::sleep(Duration::from_millis((6 - id) * 5)).await;
                    Some(id * 10)
                },
                2,
            )
            .all()
            .await;

        assert_eq!(results, vec![10, 20, 30, 40, 50]);
    }

    #[traced_test]
    #[tokio::test]
    async fn test_map_drops_absent_results() {
        let backend = MockBackend::new(posts(8)).into_shared();

        let titles = index(&backend, 3)
            .map(|record| async move {
                (record.get_str("locale") == Some("en"))
                    .then(|| record.get_str("title").unwrap_or_default().to_string())
            })
            .all()
            .await;

        assert_eq!(titles, vec!["Post 1", "Post 3", "Post 5", "Post 7"]);
    }

    #[traced_test]
    #[tokio::test]
    async fn test_operators_compose() {
        let backend = MockBackend::new(posts(40)).into_shared();

        let titles = index(&backend, 6)
            .filter(|r| r.get_str("locale") == Some("de"))
            .map(|record| async move {
                record.get_str("title").map(|t| t.to_uppercase())
            })
            .slice(1, 4)
            .all()
            .await;

        assert_eq!(titles, vec!["POST 4", "POST 6", "POST 8"]);
    }

    #[traced_test]
    #[tokio::test]
    async fn test_follow_stores_document_under_target() {
        let backend = blog_backend(3).into_shared();

        let records = index(&backend, 2).follow("path", Some("doc")).all().await;

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].get_str("path"), Some("/blog/post-1"));
        assert_eq!(records[0].get("doc"), Some(&json!("<h1>Post 1</h1>")));
        assert_eq!(records[2].get("doc"), Some(&json!("<h1>Post 3</h1>")));
        assert_eq!(
            backend.document_requests(),
            vec![
                "https://example.com/blog/post-1",
                "https://example.com/blog/post-2",
                "https://example.com/blog/post-3",
            ]
        );
    }

    #[traced_test]
    #[tokio::test]
    async fn test_follow_overwrites_field_with_parsed_value() {
        let backend = blog_backend(2).into_shared();

        let records = index(&backend, 10)
            .with_html_parser(|html: &str| json!({ "length": html.len() }))
            .follow("path", None)
            .all()
            .await;

        assert_eq!(records[0].get("path"), Some(&json!({ "length": 15 })));
        assert_eq!(records[1].get("path"), Some(&json!({ "length": 15 })));
    }

    #[traced_test]
    #[tokio::test]
    async fn test_follow_passes_records_without_link() {
        let unlinked: Vec<Record> = (1..=3u64)
            .map(|id| Record::from_iter([("id", id)]))
            .collect();
        let backend = MockBackend::new(unlinked.clone()).into_shared();

        let records = index(&backend, 10).follow("path", Some("doc")).all().await;

        assert_eq!(records, unlinked);
        assert!(backend.document_requests().is_empty());
    }

    #[traced_test]
    #[tokio::test]
    async fn test_follow_failure_stores_null() {
        let backend = MockBackend::new(posts(2))
            .with_document("https://example.com/blog/post-1", "<h1>Post 1</h1>")
            .into_shared();

        let mut sequence = index(&backend, 10).follow("path", Some("doc"));
        let records: Vec<Record> = (&mut sequence).collect().await;

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("doc"), Some(&json!("<h1>Post 1</h1>")));
        assert_eq!(records[1].get("doc"), Some(&Value::Null));
        let metrics = sequence.metrics();
        assert_eq!(metrics.documents_fetched, 2);
        assert_eq!(metrics.fetch_failures, 1);
        assert!(logs_contain("post-2"));
    }

    #[traced_test]
    #[tokio::test]
    async fn test_follow_after_limit_fetches_only_kept_documents() {
        let backend = blog_backend(10).into_shared();

        let records = index(&backend, 10)
            .limit(2)
            .follow("path", Some("doc"))
            .all()
            .await;

        assert_eq!(records.len(), 2);
        assert_eq!(backend.document_requests().len(), 2);
    }

    #[traced_test]
    #[tokio::test]
    async fn test_follow_fetches_documents_concurrently() {
        let backend = blog_backend(5)
            .with_latency(Duration::from_millis(50))
            .into_shared();

        let started = std::time::Instant::now();
        let records = index(&backend, 10)
            .follow_bounded("path", Some("doc"), 5)
            .all()
            .await;
        let elapsed = started.elapsed();

        assert_eq!(records.len(), 5);
        assert!(records.iter().all(|r| r.get_str("doc").is_some()));
        // one page plus one round of documents, not five
        assert!(elapsed < Duration::from_millis(250), "took {elapsed:?}");
    }
}
