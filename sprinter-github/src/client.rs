//! GitHub API client using octocrab

use crate::error::tracker_error;
use crate::{Error, Result};
use octocrab::Octocrab;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sprinter_core::filter::ItemQuery;
use sprinter_core::{Credentials, Page, PageCursor, RepoId, TrackerResult};
use tracing::{debug, info};

/// Page size requested from every listing endpoint
pub(crate) const PER_PAGE: u8 = 100;

/// Query string of a listing request
#[derive(Debug, Serialize)]
pub(crate) struct ListParams<'a> {
    #[serde(flatten)]
    query: Option<&'a ItemQuery>,
    per_page: u8,
}

impl<'a> ListParams<'a> {
    pub(crate) fn plain() -> Self {
        Self {
            query: None,
            per_page: PER_PAGE,
        }
    }

    pub(crate) fn filtered(query: &'a ItemQuery) -> Self {
        Self {
            query: Some(query),
            per_page: PER_PAGE,
        }
    }
}

/// GitHub API client shared by every monitored repository
pub struct GitHubClient {
    client: Octocrab,
    api_url: Option<String>,
}

impl GitHubClient {
    /// Create a client authenticated with `credentials`.
    ///
    /// `api_url` points the client at a GitHub Enterprise install; github.com
    /// is used when it is `None`.
    pub fn new(credentials: &Credentials, api_url: Option<&str>) -> Result<Self> {
        let mut builder = match credentials {
            Credentials::Token(token) => Octocrab::builder().personal_token(token.clone()),
            Credentials::Basic { username, password } => {
                Octocrab::builder().basic_auth(username.clone(), password.clone())
            }
        };

        if let Some(url) = api_url {
            builder = builder.base_uri(url).map_err(|e| Error::InvalidUrl {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        }

        let client = builder
            .build()
            .map_err(|e| Error::Auth(format!("Failed to create GitHub client: {}", e)))?;

        info!(api_url = api_url.unwrap_or("https://api.github.com"), "Created GitHub client");

        Ok(Self {
            client,
            api_url: api_url.map(str::to_string),
        })
    }

    /// API route of a repository resource, e.g. `/repos/org/name/labels`
    pub(crate) fn route(repo: &RepoId, resource: &str) -> String {
        format!("/repos/{}/{}/{}", repo.owner(), repo.name(), resource)
    }

    /// Fetch one page of a listing.
    ///
    /// Without a cursor the first page of `route` is requested with `params`.
    /// A cursor is the absolute `next` link GitHub returned, which already
    /// carries the query string.
    pub(crate) async fn get_page<T: DeserializeOwned>(
        &self,
        route: &str,
        params: &ListParams<'_>,
        cursor: Option<PageCursor>,
    ) -> TrackerResult<Page<T>> {
        let page: octocrab::Page<T> = match &cursor {
            Some(next) => {
                debug!(url = next.as_str(), "Following next page");
                self.client.get(next.as_str(), None::<&()>).await
            }
            None => {
                debug!(route, ?params, "Fetching first page");
                self.client.get(route, Some(params)).await
            }
        }
        .map_err(tracker_error)?;

        Ok(Page {
            items: page.items,
            next: page.next.map(|uri| PageCursor::new(uri.to_string())),
        })
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        route: &str,
        body: &B,
    ) -> TrackerResult<T> {
        debug!(route, "POST");
        self.client.post(route, Some(body)).await.map_err(tracker_error)
    }

    pub(crate) async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        route: &str,
        body: &B,
    ) -> TrackerResult<T> {
        debug!(route, "PATCH");
        self.client.patch(route, Some(body)).await.map_err(tracker_error)
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}
