// Unit tests for the booru client protocol — request construction, the
// two-attempt post fallback, degradation, and error propagation. The
// transport is scripted, so no network access is involved.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use sepia::booru::client::{BooruClient, Transport};
use sepia::booru::criteria::{PostQuery, SortOrder, TagOrderBy, TagQuery};
use sepia::booru::error::ApiError;

/// Shared record of every parameter list the client sent.
#[derive(Clone, Default)]
struct RequestLog(Arc<Mutex<Vec<Vec<(String, String)>>>>);

impl RequestLog {
    fn all(&self) -> Vec<Vec<(String, String)>> {
        self.0.lock().unwrap().clone()
    }
}

/// Scripted transport: answers requests from a queue of canned replies.
/// Runs dry into `Ok(Value::Null)` (an empty 2xx body).
struct FakeTransport {
    replies: Mutex<VecDeque<Result<Value, ApiError>>>,
    log: RequestLog,
}

impl FakeTransport {
    fn scripted(log: &RequestLog, replies: Vec<Result<Value, ApiError>>) -> Box<Self> {
        Box::new(Self {
            replies: Mutex::new(replies.into()),
            log: log.clone(),
        })
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get_json(&self, params: &[(String, String)]) -> Result<Value, ApiError> {
        self.log.0.lock().unwrap().push(params.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(Value::Null))
    }
}

fn client_with(log: &RequestLog, replies: Vec<Result<Value, ApiError>>) -> BooruClient {
    BooruClient::with_transport(FakeTransport::scripted(log, replies), None, None)
}

fn param<'a>(request: &'a [(String, String)], key: &str) -> Option<&'a str> {
    request.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
}

fn three_posts() -> Value {
    json!({"post": [{"id": 1}, {"id": 2}, {"id": 3}]})
}

fn upstream_error(status: u16) -> ApiError {
    ApiError::Upstream {
        status,
        message: "server error".to_string(),
    }
}

#[tokio::test]
async fn primary_success_makes_one_request() {
    let log = RequestLog::default();
    let client = client_with(&log, vec![Ok(three_posts())]);

    let posts = client.search_posts(&PostQuery::tags("cat", 20, 0)).await;
    assert_eq!(posts.len(), 3);

    let requests = log.all();
    assert_eq!(requests.len(), 1);
    assert_eq!(param(&requests[0], "page"), Some("dapi"));
    assert_eq!(param(&requests[0], "s"), Some("post"));
    assert_eq!(param(&requests[0], "q"), Some("index"));
    assert_eq!(param(&requests[0], "tags"), Some("cat"));
    assert_eq!(param(&requests[0], "json"), Some("1"));
}

#[tokio::test]
async fn primary_failure_falls_back_and_succeeds() {
    let log = RequestLog::default();
    let client = client_with(
        &log,
        vec![
            Err(ApiError::Unexpected(anyhow::anyhow!("connection reset"))),
            Ok(three_posts()),
        ],
    );

    let posts = client.search_posts(&PostQuery::tags("cat", 50, 2)).await;
    assert_eq!(posts.len(), 3);

    let requests = log.all();
    assert_eq!(requests.len(), 2);
    // The retry switches wire formats and keeps the search parameters
    assert_eq!(param(&requests[1], "page"), Some("post"));
    assert_eq!(param(&requests[1], "s"), Some("list"));
    assert_eq!(param(&requests[1], "q"), None);
    assert_eq!(param(&requests[1], "tags"), Some("cat"));
    assert_eq!(param(&requests[1], "limit"), Some("50"));
    assert_eq!(param(&requests[1], "pid"), Some("2"));
}

#[tokio::test]
async fn http_error_also_triggers_fallback() {
    let log = RequestLog::default();
    let client = client_with(&log, vec![Err(upstream_error(500)), Ok(three_posts())]);

    let posts = client.search_posts(&PostQuery::default()).await;
    assert_eq!(posts.len(), 3);
    assert_eq!(log.all().len(), 2);
}

#[tokio::test]
async fn both_attempts_failing_degrades_to_empty() {
    let log = RequestLog::default();
    let client = client_with(
        &log,
        vec![Err(upstream_error(503)), Err(upstream_error(503))],
    );

    let posts = client.search_posts(&PostQuery::tags("cat", 20, 0)).await;
    assert!(posts.is_empty());
    assert_eq!(log.all().len(), 2);
}

#[tokio::test]
async fn shape_anomaly_does_not_trigger_fallback() {
    let log = RequestLog::default();
    // A 2xx body with no post key normalizes to empty — that's a result,
    // not a failure, so no second request goes out.
    let client = client_with(&log, vec![Ok(json!({"@attributes": {"count": 0}}))]);

    let posts = client.search_posts(&PostQuery::tags("cat", 20, 0)).await;
    assert!(posts.is_empty());
    assert_eq!(log.all().len(), 1);
}

#[tokio::test]
async fn limit_clamps_to_upstream_range() {
    let log = RequestLog::default();
    let client = client_with(&log, vec![Ok(Value::Null), Ok(Value::Null)]);

    client.search_posts(&PostQuery::tags("", 500, 0)).await;
    client.search_posts(&PostQuery::tags("", 0, 0)).await;

    let requests = log.all();
    assert_eq!(param(&requests[0], "limit"), Some("100"));
    assert_eq!(param(&requests[1], "limit"), Some("1"));
}

#[tokio::test]
async fn change_id_is_dropped_from_the_legacy_format() {
    let log = RequestLog::default();
    let query = PostQuery {
        change_id: Some(777),
        post_id: Some(12),
        ..PostQuery::default()
    };
    let client = client_with(&log, vec![Err(upstream_error(500)), Ok(Value::Null)]);

    client.search_posts(&query).await;

    let requests = log.all();
    assert_eq!(param(&requests[0], "cid"), Some("777"));
    assert_eq!(param(&requests[0], "id"), Some("12"));
    assert_eq!(param(&requests[1], "cid"), None);
    assert_eq!(param(&requests[1], "id"), Some("12"));
}

#[tokio::test]
async fn auth_pair_sent_only_when_complete() {
    let log = RequestLog::default();
    let client = BooruClient::with_transport(
        FakeTransport::scripted(&log, vec![Ok(Value::Null)]),
        Some("key".to_string()),
        Some("1234".to_string()),
    );
    client.search_posts(&PostQuery::default()).await;

    let half = RequestLog::default();
    let half_client = BooruClient::with_transport(
        FakeTransport::scripted(&half, vec![Ok(Value::Null)]),
        Some("key".to_string()),
        None,
    );
    half_client.search_posts(&PostQuery::default()).await;

    let requests = log.all();
    assert_eq!(param(&requests[0], "api_key"), Some("key"));
    assert_eq!(param(&requests[0], "user_id"), Some("1234"));

    let half_requests = half.all();
    assert_eq!(param(&half_requests[0], "api_key"), None);
    assert_eq!(param(&half_requests[0], "user_id"), None);
}

#[tokio::test]
async fn post_by_id_returns_the_first_record() {
    let log = RequestLog::default();
    let client = client_with(&log, vec![Ok(json!({"post": {"id": 42}}))]);

    let post = client.post_by_id(42).await.unwrap();
    assert_eq!(post.id, Some(42));

    let requests = log.all();
    assert_eq!(param(&requests[0], "id"), Some("42"));
    assert_eq!(param(&requests[0], "limit"), Some("1"));
}

#[tokio::test]
async fn post_by_id_missing_is_none() {
    let log = RequestLog::default();
    let client = client_with(&log, vec![Ok(json!({"post": []}))]);
    assert!(client.post_by_id(42).await.is_none());
}

#[tokio::test]
async fn tag_search_sends_order_and_criteria() {
    let log = RequestLog::default();
    let client = client_with(&log, vec![Ok(json!({"tag": [{"name": "cat"}]}))]);

    let query = TagQuery {
        limit: 10,
        name: Some("cat".to_string()),
        order: SortOrder::Desc,
        order_by: TagOrderBy::Count,
        ..TagQuery::default()
    };
    let tags = client.search_tags(&query).await;
    assert_eq!(tags.len(), 1);

    let requests = log.all();
    assert_eq!(param(&requests[0], "s"), Some("tag"));
    assert_eq!(param(&requests[0], "name"), Some("cat"));
    assert_eq!(param(&requests[0], "order"), Some("DESC"));
    assert_eq!(param(&requests[0], "orderby"), Some("count"));
    assert_eq!(param(&requests[0], "limit"), Some("10"));
}

#[tokio::test]
async fn tag_search_failure_degrades_to_empty_without_retry() {
    let log = RequestLog::default();
    let client = client_with(&log, vec![Err(upstream_error(500))]);

    let tags = client.search_tags(&TagQuery::exact("cat", 10)).await;
    assert!(tags.is_empty());
    assert_eq!(log.all().len(), 1);
}

#[tokio::test]
async fn comments_propagate_upstream_errors() {
    let log = RequestLog::default();
    let client = client_with(&log, vec![Err(upstream_error(502))]);

    match client.comments(9).await {
        Err(ApiError::Upstream { status, .. }) => assert_eq!(status, 502),
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn comments_decode_and_carry_post_id_param() {
    let log = RequestLog::default();
    let client = client_with(
        &log,
        vec![Ok(json!({"comment": [{"post_id": 9, "body": "hi"}]}))],
    );

    let comments = client.comments(9).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].body, "hi");

    let requests = log.all();
    assert_eq!(param(&requests[0], "s"), Some("comment"));
    assert_eq!(param(&requests[0], "post_id"), Some("9"));
}

#[tokio::test]
async fn deleted_posts_send_show_flag_and_last_id() {
    let log = RequestLog::default();
    let client = client_with(&log, vec![Ok(json!({"post": [{"id": 1000}]}))]);

    let posts = client.deleted_posts(Some(999)).await.unwrap();
    assert_eq!(posts.len(), 1);

    let requests = log.all();
    assert_eq!(param(&requests[0], "deleted"), Some("show"));
    assert_eq!(param(&requests[0], "last_id"), Some("999"));
}
