/// Query parameters for one page fetch: `?offset=&limit=[&sheet=]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: u64,
    pub limit: u64,
    pub sheet: Option<String>,
}

impl PageRequest {
    pub fn new(offset: u64, limit: u64) -> Self {
        PageRequest {
            offset,
            limit,
            sheet: None,
        }
    }

    pub fn with_sheet(mut self, sheet: Option<String>) -> Self {
        self.sheet = sheet;
        self
    }

    /// Parameters in wire order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("offset", self.offset.to_string()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(sheet) = &self.sheet {
            pairs.push(("sheet", sheet.clone()));
        }
        pairs
    }
}
