//! Publication catalogue client.
//!
//! Browsing, searching and filtering the publication records that the graph
//! was built from, plus PDF availability.

mod query;
mod types;

pub use query::{PublicationQuery, SortOrder};
pub use types::{
    AuthorList, CatalogStats, CategoryList, CountEntry, JournalList, PdfInfo, PdfStatistics,
    Publication, PublicationPage, YearRange,
};

use async_trait::async_trait;
use reqwest::Url;

use crate::api::{ApiError, HttpBackend};
use crate::config::DEFAULT_AUTHOR_LIMIT;

/// Read access to the publication catalogue.
#[async_trait]
pub trait PublicationsApi: Send + Sync {
    /// All publications, paged and sorted.
    async fn list(&self, query: &PublicationQuery) -> Result<PublicationPage, ApiError>;

    /// Free-text search over `query.search_fields`.
    async fn search_papers(
        &self,
        text: &str,
        query: &PublicationQuery,
    ) -> Result<PublicationPage, ApiError>;

    /// Combined category/year/journal/author/PDF filter with optional text.
    async fn filter(&self, query: &PublicationQuery) -> Result<PublicationPage, ApiError>;

    /// One publication by PMC id.
    async fn get(&self, pmcid: &str) -> Result<Publication, ApiError>;

    async fn categories(&self) -> Result<CategoryList, ApiError>;

    async fn journals(&self) -> Result<JournalList, ApiError>;

    /// The most prolific authors; `None` uses the backend's default cap.
    async fn authors(&self, limit: Option<u32>) -> Result<AuthorList, ApiError>;

    async fn stats(&self) -> Result<CatalogStats, ApiError>;

    async fn pdf_info(&self, pmcid: &str) -> Result<PdfInfo, ApiError>;

    /// Download URL of a publication's PDF. Makes no request.
    fn pdf_url(&self, pmcid: &str) -> Result<Url, ApiError>;
}

#[async_trait]
impl PublicationsApi for HttpBackend {
    async fn list(&self, query: &PublicationQuery) -> Result<PublicationPage, ApiError> {
        let url = self.endpoint(&["papers"])?;
        self.get_json(url, &query.list_pairs()).await
    }

    async fn search_papers(
        &self,
        text: &str,
        query: &PublicationQuery,
    ) -> Result<PublicationPage, ApiError> {
        let text = text.trim();
        if text.is_empty() {
            return self.list(query).await;
        }
        let url = self.endpoint(&["search"])?;
        self.get_json(url, &query.search_pairs(text)).await
    }

    async fn filter(&self, query: &PublicationQuery) -> Result<PublicationPage, ApiError> {
        let url = self.endpoint(&["filter"])?;
        self.get_json(url, &query.filter_pairs()).await
    }

    async fn get(&self, pmcid: &str) -> Result<Publication, ApiError> {
        let url = self.endpoint(&["paper", pmcid.trim()])?;
        self.get_json(url, &[]).await
    }

    async fn categories(&self) -> Result<CategoryList, ApiError> {
        let url = self.endpoint(&["categories"])?;
        self.get_json(url, &[]).await
    }

    async fn journals(&self) -> Result<JournalList, ApiError> {
        let url = self.endpoint(&["journals"])?;
        self.get_json(url, &[]).await
    }

    async fn authors(&self, limit: Option<u32>) -> Result<AuthorList, ApiError> {
        let url = self.endpoint(&["authors"])?;
        let limit = limit.unwrap_or(DEFAULT_AUTHOR_LIMIT);
        self.get_json(url, &[("limit", limit.to_string())]).await
    }

    async fn stats(&self) -> Result<CatalogStats, ApiError> {
        let url = self.endpoint(&["stats"])?;
        self.get_json(url, &[]).await
    }

    async fn pdf_info(&self, pmcid: &str) -> Result<PdfInfo, ApiError> {
        let url = self.endpoint(&["pdf", "info", pmcid.trim()])?;
        self.get_json(url, &[]).await
    }

    fn pdf_url(&self, pmcid: &str) -> Result<Url, ApiError> {
        self.endpoint(&["pdf", pmcid.trim()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_url() {
        let backend = HttpBackend::new("http://localhost:8000/");
        let url = backend.pdf_url("PMC4136787").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/pdf/PMC4136787");
    }
}
