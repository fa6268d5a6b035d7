use crate::factory;
use connectors::{fetcher::Fetcher, html::HtmlParser};
use engine_core::{
    config::{LocateConfig, QueryConfig},
    context::query::QueryContext,
    error::QueryError,
};
use engine_processing::sequence::Sequence;
use model::records::record::Record;
use std::{future::Future, sync::Arc};

/// Forwards the operators and consumers of `Sequence<Record>` to a builder,
/// starting the query on first use.
macro_rules! delegate_sequence {
    ($builder:ty) => {
        impl $builder {
            pub fn skip(self, n: usize) -> Sequence<Record> {
                self.start().skip(n)
            }

            pub fn limit(self, n: usize) -> Sequence<Record> {
                self.start().limit(n)
            }

            pub fn slice(self, from: usize, to: usize) -> Sequence<Record> {
                self.start().slice(from, to)
            }

            pub fn filter<F>(self, predicate: F) -> Sequence<Record>
            where
                F: FnMut(&Record) -> bool + Send + 'static,
            {
                self.start().filter(predicate)
            }

            pub fn map<U, F, Fut>(self, f: F) -> Sequence<U>
            where
                U: Send + 'static,
                F: FnMut(Record) -> Fut + Send + 'static,
                Fut: Future<Output = Option<U>> + Send + 'static,
            {
                self.start().map(f)
            }

            pub fn map_bounded<U, F, Fut>(self, f: F, max_in_flight: usize) -> Sequence<U>
            where
                U: Send + 'static,
                F: FnMut(Record) -> Fut + Send + 'static,
                Fut: Future<Output = Option<U>> + Send + 'static,
            {
                self.start().map_bounded(f, max_in_flight)
            }

            pub fn follow(self, field: &str, target: Option<&str>) -> Sequence<Record> {
                self.start().follow(field, target)
            }

            pub fn follow_bounded(
                self,
                field: &str,
                target: Option<&str>,
                max_in_flight: usize,
            ) -> Sequence<Record> {
                self.start().follow_bounded(field, target, max_in_flight)
            }

            pub async fn all(self) -> Vec<Record> {
                self.start().all().await
            }

            pub async fn first(self) -> Option<Record> {
                self.start().first().await
            }

            pub async fn try_all(self) -> Result<Vec<Record>, QueryError> {
                self.start().try_all().await
            }

            pub async fn try_first(self) -> Result<Option<Record>, QueryError> {
                self.start().try_first().await
            }
        }
    };
}

/// A root query that has not fetched anything yet.
///
/// Configuration (`chunks`, `sheet`, transport) is only possible here; the
/// first operator or consumer freezes it.
pub struct Query {
    url: String,
    config: QueryConfig,
    fetcher: Option<Arc<dyn Fetcher>>,
    parser: Option<Arc<dyn HtmlParser>>,
}

impl Query {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            config: factory::default_config(),
            fetcher: None,
            parser: None,
        }
    }

    /// Page size for every request of this query.
    pub fn chunks(mut self, chunk_size: u64) -> Self {
        self.config = self.config.with_chunk_size(chunk_size);
        self
    }

    /// Reads the named sheet of a multi-sheet index.
    pub fn sheet(mut self, name: impl Into<String>) -> Self {
        self.config = self.config.with_sheet(name);
        self
    }

    pub fn with_fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Parser applied to documents fetched by `follow`.
    pub fn with_html_parser(mut self, parser: impl HtmlParser + 'static) -> Self {
        self.parser = Some(Arc::new(parser));
        self
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Freezes the configuration and returns the lazy record sequence.
    pub fn start(self) -> Sequence<Record> {
        Sequence::paginate(self.into_context())
    }

    fn into_context(self) -> Arc<QueryContext> {
        let fetcher = self.fetcher.unwrap_or_else(factory::default_fetcher);
        let parser = self.parser.unwrap_or_else(factory::default_parser);
        Arc::new(QueryContext::new(self.url, self.config, fetcher, parser))
    }
}

delegate_sequence!(Query);

/// A keyed lookup that has not fetched anything yet.
pub struct KeyQuery {
    query: Query,
    locate: LocateConfig,
}

impl KeyQuery {
    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            query: Query::new(url),
            locate: LocateConfig::new(key),
        }
    }

    pub fn chunks(mut self, chunk_size: u64) -> Self {
        self.query = self.query.chunks(chunk_size);
        self
    }

    pub fn sheet(mut self, name: impl Into<String>) -> Self {
        self.query = self.query.sheet(name);
        self
    }

    /// Field the index is sorted by and compared against the key.
    pub fn key_field(mut self, field: impl Into<String>) -> Self {
        self.locate = self.locate.with_key_field(field);
        self
    }

    pub fn with_fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.query = self.query.with_fetcher(fetcher);
        self
    }

    pub fn with_html_parser(mut self, parser: impl HtmlParser + 'static) -> Self {
        self.query = self.query.with_html_parser(parser);
        self
    }

    pub fn config(&self) -> &QueryConfig {
        self.query.config()
    }

    pub fn start(self) -> Sequence<Record> {
        Sequence::locate(self.query.into_context(), self.locate)
    }
}

delegate_sequence!(KeyQuery);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_before_start() {
        let query = Query::new("https://example.com/query-index.json")
            .chunks(250)
            .sheet("blogs");
        assert_eq!(query.config().chunk_size(), 250);
        assert_eq!(query.config().sheet(), Some("blogs"));
    }

    #[test]
    fn test_key_query_configuration() {
        let query = KeyQuery::new("https://example.com/authors.json", "/authors/smith")
            .chunks(0)
            .key_field("path");
        assert_eq!(query.config().chunk_size(), 1);
        assert_eq!(query.locate.key_field, "path");
        assert_eq!(query.locate.key, "/authors/smith");
    }
}
