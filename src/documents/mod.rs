//! Typed operations for the document resource.
//!
//! Thin wrappers translating semantic calls into transport requests with
//! fixed paths and payload shapes. The list operation is the single place
//! that absorbs failures: a failed list fetch must not crash a listing view,
//! so it yields an empty, well-formed page and leaves user-visible reporting
//! to the notification path.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{instrument, warn};

use crate::download::{SaveTarget, extract_filename, trigger_download};
use crate::transport::{ApiError, RequestContext, Transport};

/// Fixed path prefix for the document resource.
const DOCUMENTS_PATH: &str = "/api/documents";

/// Default page size when the caller does not specify one.
pub const DEFAULT_PAGE_LIMIT: u64 = 20;

/// A document as produced by the remote service. Consumed read-only; the
/// client never mutates it except via explicit operations that return a
/// fresh copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    #[serde(default)]
    pub insurer: Option<String>,
    #[serde(default)]
    pub policy_type: Option<String>,
    #[serde(default)]
    pub classification: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
}

/// Filters for the list/search operation, rendered as query parameters.
#[derive(Debug, Clone, Default)]
pub struct DocumentFilters {
    pub search: Option<String>,
    pub status: Option<String>,
    pub classification: Option<String>,
    pub country: Option<String>,
    pub limit: Option<u64>,
    pub offset: u64,
}

impl DocumentFilters {
    fn apply(&self, mut ctx: RequestContext) -> RequestContext {
        if let Some(search) = &self.search {
            ctx = ctx.query("search", search);
        }
        if let Some(status) = &self.status {
            ctx = ctx.query("status", status);
        }
        if let Some(classification) = &self.classification {
            ctx = ctx.query("classification", classification);
        }
        if let Some(country) = &self.country {
            ctx = ctx.query("country", country);
        }
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
        ctx.query("limit", limit.to_string())
            .query("offset", self.offset.to_string())
    }
}

/// Raw list endpoint response shape.
#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    documents: Vec<Document>,
    #[serde(default)]
    total: u64,
    #[serde(default = "default_limit")]
    limit: u64,
    #[serde(default)]
    offset: u64,
}

fn default_limit() -> u64 {
    DEFAULT_PAGE_LIMIT
}

/// Normalized paginated view of a list response.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentPage {
    pub items: Vec<Document>,
    pub total: u64,
    /// 1-based current page.
    pub page: u64,
    /// Total page count; 1 even when there are no results.
    pub pages: u64,
}

impl DocumentPage {
    /// The empty, well-formed page returned when a list fetch fails.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 1,
            pages: 1,
        }
    }

    fn from_response(raw: ListResponse) -> Self {
        let limit = raw.limit.max(1);
        let pages = if raw.total == 0 {
            1
        } else {
            raw.total.div_ceil(limit)
        };
        Self {
            items: raw.documents,
            total: raw.total,
            page: raw.offset / limit + 1,
            pages,
        }
    }
}

/// Typed request surface for the document resource.
#[derive(Clone)]
pub struct DocumentsApi {
    transport: Transport,
}

impl DocumentsApi {
    #[must_use]
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Lists documents matching the filters.
    ///
    /// Failures are absorbed into an empty page by design — the notification
    /// channel carries the user-visible report, and listing views only clear
    /// their loading state.
    #[instrument(level = "debug", skip(self, filters))]
    pub async fn list(&self, filters: &DocumentFilters) -> DocumentPage {
        let ctx = filters.apply(RequestContext::new(DOCUMENTS_PATH));
        match self.transport.send_json::<ListResponse>(ctx).await {
            Ok(raw) => DocumentPage::from_response(raw),
            Err(error) => {
                warn!(%error, "list fetch failed; returning empty page");
                DocumentPage::empty()
            }
        }
    }

    /// Fetches a single document.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request fails.
    pub async fn get(&self, id: i64) -> Result<Document, ApiError> {
        self.transport
            .send_json(RequestContext::new(format!("{DOCUMENTS_PATH}/{id}")))
            .await
    }

    /// Approves a document, returning the updated copy.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request fails.
    pub async fn approve(&self, id: i64) -> Result<Document, ApiError> {
        self.transport
            .send_json(RequestContext::new(format!("{DOCUMENTS_PATH}/{id}/approve")).method("POST"))
            .await
    }

    /// Reclassifies a document, returning the updated copy.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request fails.
    pub async fn reclassify(&self, id: i64, classification: &str) -> Result<Document, ApiError> {
        self.transport
            .send_json(
                RequestContext::new(format!("{DOCUMENTS_PATH}/{id}/reclassify"))
                    .method("POST")
                    .json(json!({ "classification": classification })),
            )
            .await
    }

    /// Archives a document, returning the updated copy.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request fails.
    pub async fn archive(&self, id: i64) -> Result<Document, ApiError> {
        self.transport
            .send_json(RequestContext::new(format!("{DOCUMENTS_PATH}/{id}/archive")).method("POST"))
            .await
    }

    /// Deletes a document.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request fails.
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.transport
            .send(RequestContext::new(format!("{DOCUMENTS_PATH}/{id}")).method("DELETE"))
            .await?;
        Ok(())
    }

    /// Downloads one document and triggers a save through `target`, returning
    /// the filename used.
    ///
    /// The filename comes from the response `Content-Disposition` header,
    /// falling back to `document-{id}.pdf`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request or the save action fails.
    #[instrument(level = "debug", skip(self, target))]
    pub async fn download(&self, id: i64, target: &dyn SaveTarget) -> Result<String, ApiError> {
        let payload = self
            .transport
            .send_bytes(RequestContext::new(format!("{DOCUMENTS_PATH}/{id}/download")))
            .await?;
        let fallback = format!("document-{id}.pdf");
        let filename = extract_filename(payload.content_disposition.as_deref(), &fallback);
        trigger_download(&payload.bytes, &filename, target)
            .map_err(|error| ApiError::generic(None, error.to_string()))?;
        Ok(filename)
    }

    /// Downloads every document matching the filters as one archive,
    /// returning the filename used. Falls back to `documents.zip`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request or the save action fails.
    #[instrument(level = "debug", skip(self, filters, target))]
    pub async fn download_all(
        &self,
        filters: &DocumentFilters,
        target: &dyn SaveTarget,
    ) -> Result<String, ApiError> {
        let ctx = filters.apply(RequestContext::new(format!("{DOCUMENTS_PATH}/download-all")));
        let payload = self.transport.send_bytes(ctx).await?;
        let filename = extract_filename(payload.content_disposition.as_deref(), "documents.zip");
        trigger_download(&payload.bytes, &filename, target)
            .map_err(|error| ApiError::generic(None, error.to_string()))?;
        Ok(filename)
    }
}
