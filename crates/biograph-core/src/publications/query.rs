use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_PER_PAGE, DEFAULT_SEARCH_FIELDS};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order '{}' (expected asc or desc)", other)),
        }
    }
}

/// Paging, filter, and sort parameters for catalogue listings.
///
/// Which parameters apply depends on the endpoint: `/papers` reads paging
/// and sort, `/search` reads paging and search fields, `/filter` reads all
/// of them.
#[derive(Debug, Clone, PartialEq)]
pub struct PublicationQuery {
    pub page: u32,
    pub per_page: u32,
    pub categories: Vec<String>,
    pub year: Option<i32>,
    pub journal: Option<String>,
    pub author: Option<String>,
    pub has_pdf: Option<bool>,
    pub text: Option<String>,
    pub search_fields: String,
    pub sort_by: Option<String>,
    pub sort_order: SortOrder,
}

impl Default for PublicationQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            categories: Vec::new(),
            year: None,
            journal: None,
            author: None,
            has_pdf: None,
            text: None,
            search_fields: DEFAULT_SEARCH_FIELDS.to_string(),
            sort_by: None,
            sort_order: SortOrder::default(),
        }
    }
}

impl PublicationQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// 1-based page number; 0 is treated as 1.
    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn journal(mut self, journal: impl Into<String>) -> Self {
        self.journal = Some(journal.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn has_pdf(mut self, has_pdf: bool) -> Self {
        self.has_pdf = Some(has_pdf);
        self
    }

    /// Free-text query, matched against `search_fields`.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn search_fields(mut self, fields: impl Into<String>) -> Self {
        self.search_fields = fields.into();
        self
    }

    pub fn sort_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(field.into());
        self.sort_order = order;
        self
    }

    fn paging(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
        ]
    }

    /// Parameters for `/papers`.
    pub(crate) fn list_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = self.paging();
        pairs.push((
            "sort_by",
            self.sort_by.clone().unwrap_or_else(|| "year".to_string()),
        ));
        pairs.push(("sort_order", self.sort_order.to_string()));
        pairs
    }

    /// Parameters for `/search`.
    pub(crate) fn search_pairs(&self, text: &str) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("query", text.to_string())];
        pairs.extend(self.paging());
        pairs.push(("search_fields", self.search_fields.clone()));
        pairs
    }

    /// Parameters for `/filter`. Categories repeat as `category=A&category=B`.
    pub(crate) fn filter_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs: Vec<(&'static str, String)> = self
            .categories
            .iter()
            .map(|c| ("category", c.clone()))
            .collect();

        if let Some(year) = self.year {
            pairs.push(("year", year.to_string()));
        }
        if let Some(journal) = &self.journal {
            pairs.push(("journal", journal.clone()));
        }
        if let Some(author) = &self.author {
            pairs.push(("author", author.clone()));
        }
        if let Some(has_pdf) = self.has_pdf {
            pairs.push(("has_pdf", has_pdf.to_string()));
        }
        if let Some(text) = self.text.as_deref().filter(|t| !t.trim().is_empty()) {
            pairs.push(("query", text.to_string()));
            pairs.push(("search_fields", self.search_fields.clone()));
        }
        if let Some(sort_by) = &self.sort_by {
            pairs.push(("sort_by", sort_by.clone()));
        }
        pairs.push(("sort_order", self.sort_order.to_string()));
        pairs.extend(self.paging());
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_pairs_repeat_categories() {
        let query = PublicationQuery::new()
            .category("Bone")
            .category("Muscle")
            .year(2020)
            .has_pdf(true);
        let pairs = query.filter_pairs();

        let categories: Vec<&str> = pairs
            .iter()
            .filter(|(k, _)| *k == "category")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(categories, vec!["Bone", "Muscle"]);
        assert!(pairs.contains(&("year", "2020".to_string())));
        assert!(pairs.contains(&("has_pdf", "true".to_string())));
        assert!(!pairs.iter().any(|(k, _)| *k == "query"));
    }

    #[test]
    fn test_list_defaults_to_year_desc() {
        let pairs = PublicationQuery::new().page(0).list_pairs();
        assert_eq!(
            pairs,
            vec![
                ("page", "1".to_string()),
                ("per_page", "20".to_string()),
                ("sort_by", "year".to_string()),
                ("sort_order", "desc".to_string()),
            ]
        );
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!("ASC".parse::<SortOrder>(), Ok(SortOrder::Asc));
        assert!("sideways".parse::<SortOrder>().is_err());
    }
}
