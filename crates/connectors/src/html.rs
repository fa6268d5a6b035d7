use serde_json::Value;

/// Turns a followed document into the value stored on the record.
pub trait HtmlParser: Send + Sync {
    fn parse(&self, html: &str) -> Value;
}

/// Stores the document text unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawHtml;

impl HtmlParser for RawHtml {
    fn parse(&self, html: &str) -> Value {
        Value::String(html.to_string())
    }
}

impl<F> HtmlParser for F
where
    F: Fn(&str) -> Value + Send + Sync,
{
    fn parse(&self, html: &str) -> Value {
        self(html)
    }
}
