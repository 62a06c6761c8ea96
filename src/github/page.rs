//! Exhaustive retrieval of paginated listing endpoints.
//!
//! GitHub reports the total page count in the `Link` response header of page
//! 1. `fetch_all` uses that to request every remaining page in one concurrent
//! batch instead of walking pages sequentially.

use std::future::Future;

use futures::future::join_all;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::errors::GithubError;

/// Items per page requested from every listing endpoint.
pub const PAGE_SIZE: u32 = 100;

/// Pagination state parsed from one page response. Lives only for the
/// duration of a single `fetch_all` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub last_page: u32,
    pub per_page: u32,
}

impl PageCursor {
    /// Parse the `rel="last"` target out of a `Link` header.
    ///
    /// Header shape:
    /// `<https://api.github.com/...?per_page=100&page=2>; rel="next",
    ///  <https://api.github.com/...?per_page=100&page=34>; rel="last"`
    ///
    /// Returns `None` when the header carries no `rel="last"` entry, which is
    /// GitHub's way of saying the current page is the final one.
    pub fn from_link_header(link: &str) -> Option<Self> {
        for part in link.split(',') {
            let part = part.trim();
            if !part.ends_with("rel=\"last\"") {
                continue;
            }
            let url = part.strip_prefix('<')?;
            let url = &url[..url.find('>')?];
            let query = url.split_once('?')?.1;

            let mut last_page = None;
            let mut per_page = PAGE_SIZE;
            for pair in query.split('&') {
                match pair.split_once('=') {
                    Some(("page", v)) => last_page = v.parse().ok(),
                    Some(("per_page", v)) => per_page = v.parse().unwrap_or(PAGE_SIZE),
                    _ => {}
                }
            }
            return last_page.map(|last_page| PageCursor {
                last_page,
                per_page,
            });
        }
        None
    }
}

/// One page of a listing endpoint: its items plus the cursor, if more pages
/// remain.
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub cursor: Option<PageCursor>,
}

/// Fetch every page of a paginated endpoint and return the concatenation in
/// page order.
///
/// Page 1 is fetched first; if its cursor reports further pages, pages
/// `2..=last` are requested concurrently and concatenated in page-number
/// order regardless of completion order. Any single page failure fails the
/// whole fetch — partial success is handled one level up, per repository.
pub async fn fetch_all<T, F, Fut>(fetch_page: F) -> Result<Vec<T>, GithubError>
where
    F: Fn(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>, GithubError>>,
{
    let first = fetch_page(1).await?;
    let Some(cursor) = first.cursor else {
        return Ok(first.items);
    };

    // join_all preserves input order, so the concatenation below is in page
    // order even when later pages complete first.
    let rest = join_all((2..=cursor.last_page).map(&fetch_page)).await;

    let mut items = first.items;
    for page in rest {
        items.extend(page?.items);
    }
    Ok(items)
}

/// Decode a page of raw listing items, dropping malformed entries.
///
/// Entries lacking an `id` (or failing to match the typed record) are logged
/// and skipped rather than failing the page.
pub fn decode_items<T: DeserializeOwned>(raw: Vec<serde_json::Value>) -> Vec<T> {
    raw.into_iter()
        .filter(|item| item.get("id").is_some_and(|id| !id.is_null()))
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(typed) => Some(typed),
            Err(err) => {
                debug!(error = %err, "dropping malformed listing item");
                None
            }
        })
        .collect()
}
