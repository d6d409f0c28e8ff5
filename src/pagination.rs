//! Cursor-based pagination.
//!
//! List endpoints return a JSON array body; when more data is available the
//! server adds an `X-Cursor` header with an opaque continuation token. A
//! [`Page`] captures the items together with the request state needed to
//! fetch the successor page.

use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::connector::Connector;
use crate::error::{CybsiError, Result};

pub(crate) const CURSOR_HEADER: &str = "X-Cursor";

/// Maximum pages [`chain_pages`] fetches (safety limit).
const MAX_PAGES: u32 = 1000;

/// Opaque page cursor.
///
/// Never interpreted client-side. Cursors are printable and storable:
/// replist change feeds hand out cursors that remain valid across client
/// restarts, so persisting one and resuming later is supported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Cursor {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Cursor {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One page of a paginated resource list.
#[derive(Clone)]
pub struct Page<T> {
    connector: Connector,
    path: String,
    params: Vec<(String, String)>,
    items: Vec<T>,
    cursor: Option<Cursor>,
}

impl<T> std::fmt::Debug for Page<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("path", &self.path)
            .field("len", &self.items.len())
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

impl<T: DeserializeOwned> Page<T> {
    /// Build a page from a list response, pulling the continuation cursor
    /// out of the `X-Cursor` header before the body is consumed.
    pub(crate) async fn from_response(
        connector: Connector,
        path: String,
        params: Vec<(String, String)>,
        response: Response,
    ) -> Result<Self> {
        let cursor = response
            .headers()
            .get(CURSOR_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(Cursor::from);
        let items = response.json().await.map_err(CybsiError::Http)?;
        Ok(Self {
            connector,
            path,
            params,
            items,
            cursor,
        })
    }

    /// Fetch the next page, or `None` if the server omitted a cursor.
    ///
    /// Issues exactly one GET, repeating the original query params with
    /// only the cursor replaced.
    pub async fn next_page(&self) -> Result<Option<Page<T>>> {
        let Some(cursor) = &self.cursor else {
            return Ok(None);
        };
        let params = next_params(&self.params, cursor);
        let response = self.connector.do_get(&self.path, &params).await?;
        let page =
            Page::from_response(self.connector.clone(), self.path.clone(), params, response)
                .await?;
        Ok(Some(page))
    }
}

impl<T> Page<T> {
    /// Items of this page.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the page, keeping only its items.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Continuation cursor, if the server sent one.
    ///
    /// An empty page that still carries a cursor means "nothing new yet",
    /// not end-of-feed.
    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Drain all pages starting from `first`, collecting every item.
///
/// Stops after a safety limit of pages rather than looping forever on a
/// server that keeps returning cursors.
pub async fn chain_pages<T: DeserializeOwned>(first: Page<T>) -> Result<Vec<T>> {
    let mut all_items = Vec::new();
    let mut current = first;
    let mut fetched: u32 = 0;

    loop {
        fetched += 1;
        all_items.append(&mut current.items);

        if current.cursor.is_none() {
            break;
        }
        if fetched >= MAX_PAGES {
            tracing::warn!("reached pagination limit of {} pages, stopping", MAX_PAGES);
            break;
        }

        match current.next_page().await? {
            Some(page) => current = page,
            None => break,
        }
    }

    Ok(all_items)
}

/// Original query params with only the cursor replaced.
fn next_params(params: &[(String, String)], cursor: &Cursor) -> Vec<(String, String)> {
    let mut next: Vec<(String, String)> = params
        .iter()
        .filter(|(key, _)| key != "cursor")
        .cloned()
        .collect();
    next.push(("cursor".to_string(), cursor.to_string()));
    next
}
