//! Query string builder.

use chrono::NaiveDate;

/// Ordered query parameters. Repeating a key encodes a list-valued parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `key=value`.
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.pairs.push((key.into(), value.to_string()));
        self
    }

    /// Append `key=value` only when a value is present.
    pub fn opt(self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    /// Append a boolean as `true`/`false`.
    pub fn flag(self, key: impl Into<String>, value: bool) -> Self {
        self.param(key, if value { "true" } else { "false" })
    }

    /// Append an ISO-8601 date (`YYYY-MM-DD`).
    pub fn date(self, key: impl Into<String>, value: NaiveDate) -> Self {
        self.param(key, value.format("%Y-%m-%d"))
    }

    pub fn opt_date(self, key: impl Into<String>, value: Option<NaiveDate>) -> Self {
        match value {
            Some(value) => self.date(key, value),
            None => self,
        }
    }

    /// Append the key once per value.
    pub fn repeated<I, V>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        let key = key.into();
        for value in values {
            self.pairs.push((key.clone(), value.to_string()));
        }
        self
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(query: &Query) -> Vec<(&str, &str)> {
        query
            .pairs()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    #[test]
    fn test_scalar_params() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        let query = Query::new()
            .flag("enabledOnly", true)
            .date("priceDate", date)
            .opt("fundId", None::<i64>)
            .opt("priceTypeName", Some("CLOSE"));

        assert_eq!(
            pairs(&query),
            [
                ("enabledOnly", "true"),
                ("priceDate", "2024-03-07"),
                ("priceTypeName", "CLOSE"),
            ]
        );
    }

    #[test]
    fn test_repeated_keys() {
        let query = Query::new().repeated("fundId", [1, 2, 3]);
        assert_eq!(pairs(&query), [("fundId", "1"), ("fundId", "2"), ("fundId", "3")]);

        let key = String::from("instrumentGroupName");
        let query = Query::new().repeated(key, ["Equity", "Futures"]);
        assert_eq!(
            pairs(&query),
            [("instrumentGroupName", "Equity"), ("instrumentGroupName", "Futures")]
        );
    }

    #[test]
    fn test_empty() {
        assert!(Query::new().is_empty());
        assert!(Query::new().opt_date("date", None).is_empty());
    }
}
