//! Publication catalogue payloads.

use serde::{Deserialize, Serialize};

use crate::value::{null_as_default, Scalar};

/// One catalogue entry.
///
/// Only `title` is reliably present; the ingestion pipeline leaves the rest
/// empty or `null` often enough that every other field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Publication {
    pub pmcid: Option<String>,
    pub pmid: Option<String>,
    pub title: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub authors: Vec<String>,
    /// Integer in most records, free text ("2019 Mar") in some.
    pub year: Option<Scalar>,
    pub journal: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub categories: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
    pub doi: Option<String>,
    pub volume: Option<Scalar>,
    pub issue: Option<Scalar>,
    pub pages: Option<String>,
    pub url: Option<String>,
    pub pdf_url: Option<String>,
    pub pdf_file_path: Option<String>,
    pub pdf_downloaded: bool,
    pub pdf_file_size: Option<u64>,
}

impl Publication {
    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled")
    }

    pub fn has_pdf(&self) -> bool {
        self.pdf_downloaded
    }
}

/// One page of `/papers`, `/search` or `/filter` results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicationPage {
    #[serde(deserialize_with = "null_as_default")]
    pub publications: Vec<Publication>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
    /// Echoed by `/search`.
    pub query: Option<String>,
    /// Echoed by `/filter`.
    pub filters_applied: Option<String>,
}

impl PublicationPage {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// A name with an occurrence count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountEntry {
    pub name: String,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryList {
    pub categories: Vec<CountEntry>,
    pub total_unique_categories: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalList {
    pub journals: Vec<CountEntry>,
    pub total_unique_journals: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorList {
    pub authors: Vec<CountEntry>,
    pub total_unique_authors: u64,
}

/// PDF availability for one publication.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfInfo {
    pub pmcid: String,
    pub pdf_downloaded: bool,
    pub pdf_file_size: Option<u64>,
    pub pdf_file_path: Option<String>,
    pub download_source: Option<String>,
    pub download_timestamp: Option<String>,
    pub pdf_error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YearRange {
    pub min: Option<Scalar>,
    pub max: Option<Scalar>,
}

/// PDF figures as reported; the backend sends them pre-formatted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfStatistics {
    pub total_pdfs_downloaded: u64,
    pub pdf_success_rate: String,
    pub total_pdf_size_mb: String,
}

/// Response of `/stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogStats {
    pub total_publications: u64,
    pub year_range: YearRange,
    pub pdf_statistics: PdfStatistics,
    pub top_categories: Vec<CountEntry>,
    pub top_journals: Vec<CountEntry>,
    pub top_authors: Vec<CountEntry>,
    pub categories_count: u64,
    pub journals_count: u64,
    pub authors_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publication_tolerates_nulls() {
        let json = r#"{
            "pmcid": "PMC123",
            "title": "Bone loss in microgravity",
            "authors": null,
            "year": "2019 Mar",
            "abstract": "Mice flown on the ISS...",
            "pdf_downloaded": true
        }"#;
        let publication: Publication = serde_json::from_str(json).unwrap();
        assert!(publication.authors.is_empty());
        assert_eq!(publication.year, Some(Scalar::from("2019 Mar")));
        assert_eq!(
            publication.abstract_text.as_deref(),
            Some("Mice flown on the ISS...")
        );
        assert!(publication.has_pdf());
    }

    #[test]
    fn test_page_has_next() {
        let page = PublicationPage {
            page: 1,
            total_pages: 3,
            ..PublicationPage::default()
        };
        assert!(page.has_next());
    }
}
