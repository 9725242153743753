// HTTP client for the booru DAPI — unauthenticated or api_key/user_id GETs.
//
// A thin reqwest wrapper behind a `Transport` trait, plus the request
// construction and degradation policy: post searches get one retry in the
// legacy wire format on transport/HTTP failure, and both post and tag
// searches degrade to empty results rather than surfacing errors. Comments
// and deleted listings propagate `ApiError` so callers can present it.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use super::criteria::{PostQuery, TagQuery};
use super::error::ApiError;
use super::models::{Comment, Post, Tag};
use super::normalize::{self, Resource};

/// Request timeout when the configuration doesn't override it.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Hard upstream cap on post-search page size.
pub const MAX_POST_LIMIT: u32 = 100;

/// One GET against the API, returning the parsed JSON body.
///
/// The production implementation is [`HttpTransport`]; tests script this
/// trait directly. An empty 2xx body parses as `Value::Null` — the
/// normalization layer treats that as zero results, not an error.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_json(&self, params: &[(String, String)]) -> Result<Value, ApiError>;
}

/// Reqwest-backed transport for `<base_url>/index.php` queries.
///
/// Query parameters go through reqwest's form serializer, which applies
/// the percent-encoding the API expects (space becomes `+`).
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("sepia/0.1 (booru search core)")
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(&self, params: &[(String, String)]) -> Result<Value, ApiError> {
        let url = format!("{}/index.php", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await.map_err(ApiError::from_transport)?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body)
            .map_err(|err| ApiError::Unexpected(anyhow::Error::new(err).context("Unparseable API response body")))
    }
}

/// The two wire formats boorus expose for post listings. `Dapi` is the
/// primary; `Legacy` is the fallback some deployments still answer when
/// the DAPI path is broken or disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PostFormat {
    Dapi,
    Legacy,
}

impl PostFormat {
    fn params(&self, query: &PostQuery) -> Vec<(String, String)> {
        let limit = query.limit.clamp(1, MAX_POST_LIMIT);
        let mut params: Vec<(String, String)> = match self {
            PostFormat::Dapi => vec![
                ("page".into(), "dapi".into()),
                ("s".into(), "post".into()),
                ("q".into(), "index".into()),
            ],
            PostFormat::Legacy => vec![
                ("page".into(), "post".into()),
                ("s".into(), "list".into()),
            ],
        };
        params.push(("limit".into(), limit.to_string()));
        params.push(("pid".into(), query.page.to_string()));

        if !query.tags.is_empty() {
            params.push(("tags".into(), query.tags.clone()));
        }
        // The legacy format understands tags/limit/pid/id but not cid.
        if *self == PostFormat::Dapi {
            if let Some(cid) = query.change_id {
                params.push(("cid".into(), cid.to_string()));
            }
        }
        if let Some(id) = query.post_id {
            params.push(("id".into(), id.to_string()));
        }
        params
    }
}

/// Client for one booru instance.
pub struct BooruClient {
    transport: Box<dyn Transport>,
    api_key: Option<String>,
    user_id: Option<String>,
}

impl BooruClient {
    /// Create a client talking HTTP to the given base URL.
    ///
    /// `api_key`/`user_id` are the static credential pair; pass `None`
    /// for anonymous access.
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        user_id: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self> {
        let transport = HttpTransport::new(base_url, timeout_secs)?;
        Ok(Self::with_transport(Box::new(transport), api_key, user_id))
    }

    /// Create a client over an arbitrary transport (used by tests).
    pub fn with_transport(
        transport: Box<dyn Transport>,
        api_key: Option<String>,
        user_id: Option<String>,
    ) -> Self {
        Self {
            transport,
            api_key,
            user_id,
        }
    }

    /// Auth parameters, or nothing. The API rejects a lone key or a lone
    /// user id, so the pair is all-or-none.
    fn auth_params(&self) -> Vec<(String, String)> {
        match (&self.api_key, &self.user_id) {
            (Some(key), Some(user)) => vec![
                ("api_key".into(), key.clone()),
                ("user_id".into(), user.clone()),
            ],
            _ => Vec::new(),
        }
    }

    /// Issue one request with auth and `json=1` applied.
    async fn request(&self, mut params: Vec<(String, String)>) -> Result<Value, ApiError> {
        params.extend(self.auth_params());
        if !params.iter().any(|(k, _)| k == "json") {
            params.push(("json".into(), "1".into()));
        }

        debug!(
            params = %format_params_for_log(&params),
            "booru API request"
        );
        self.transport.get_json(&params).await
    }

    /// One post-search attempt in the given wire format.
    async fn fetch_posts(&self, format: PostFormat, query: &PostQuery) -> Result<Vec<Post>, ApiError> {
        let body = self.request(format.params(query)).await?;
        Ok(normalize::decode(body, Resource::Post))
    }

    /// Search posts, degrading to empty results on failure.
    ///
    /// Two attempts: the DAPI format, then — only if that attempt failed
    /// outright (transport, HTTP, or unparseable body; never a shape
    /// anomaly) — the legacy format. A second failure yields an empty
    /// list so callers present upstream outages as "no results".
    pub async fn search_posts(&self, query: &PostQuery) -> Vec<Post> {
        match self.fetch_posts(PostFormat::Dapi, query).await {
            Ok(posts) => posts,
            Err(err) => {
                warn!(error = %err, "primary post search failed, retrying with legacy format");
                match self.fetch_posts(PostFormat::Legacy, query).await {
                    Ok(posts) => posts,
                    Err(err) => {
                        warn!(error = %err, "legacy post search also failed, returning no results");
                        Vec::new()
                    }
                }
            }
        }
    }

    /// Fetch a single post by id. Routed through the post-search path, so
    /// it inherits the fallback protocol.
    pub async fn post_by_id(&self, post_id: u64) -> Option<Post> {
        self.search_posts(&PostQuery::by_id(post_id))
            .await
            .into_iter()
            .next()
    }

    fn tag_params(query: &TagQuery) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = vec![
            ("page".into(), "dapi".into()),
            ("s".into(), "tag".into()),
            ("q".into(), "index".into()),
            ("limit".into(), query.limit.to_string()),
            ("order".into(), query.order.as_str().into()),
            ("orderby".into(), query.order_by.as_str().into()),
        ];
        if let Some(after_id) = query.after_id {
            params.push(("after_id".into(), after_id.to_string()));
        }
        if let Some(ref name) = query.name {
            params.push(("name".into(), name.clone()));
        }
        if let Some(ref names) = query.names {
            params.push(("names".into(), names.clone()));
        }
        if let Some(ref pattern) = query.pattern {
            params.push(("tags".into(), pattern.clone()));
        }
        params
    }

    /// Search tags, degrading to an empty list on request failure. There
    /// is no alternate wire format for tags — just the shape handling.
    pub async fn search_tags(&self, query: &TagQuery) -> Vec<Tag> {
        match self.request(Self::tag_params(query)).await {
            Ok(body) => normalize::decode(body, Resource::Tag),
            Err(err) => {
                warn!(error = %err, "tag search failed, returning no results");
                Vec::new()
            }
        }
    }

    /// Fetch comments for a post. Failures propagate — there is no
    /// sensible empty-result reading of "couldn't load the comments".
    pub async fn comments(&self, post_id: u64) -> Result<Vec<Comment>, ApiError> {
        let params: Vec<(String, String)> = vec![
            ("page".into(), "dapi".into()),
            ("s".into(), "comment".into()),
            ("q".into(), "index".into()),
            ("post_id".into(), post_id.to_string()),
        ];
        let body = self.request(params).await?;
        Ok(normalize::decode(body, Resource::Comment))
    }

    /// List deleted posts, optionally only those above `last_id`.
    /// Failures propagate, like `comments`.
    pub async fn deleted_posts(&self, last_id: Option<u64>) -> Result<Vec<Post>, ApiError> {
        let mut params: Vec<(String, String)> = vec![
            ("page".into(), "dapi".into()),
            ("s".into(), "post".into()),
            ("q".into(), "index".into()),
            ("deleted".into(), "show".into()),
        ];
        if let Some(last_id) = last_id {
            params.push(("last_id".into(), last_id.to_string()));
        }
        let body = self.request(params).await?;
        Ok(normalize::decode(body, Resource::Post))
    }
}

/// Render params for debug logging with the credential pair masked.
fn format_params_for_log(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| {
            if k == "api_key" || k == "user_id" {
                format!("{k}=***")
            } else {
                format!("{k}={v}")
            }
        })
        .collect::<Vec<_>>()
        .join("&")
}
