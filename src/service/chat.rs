// Chat flow — the interface a chat transport adapter consumes.
//
// Ties the composer, client, preference store, and session store together:
// a search composes the user's preferences into the query, fetches one
// batch of results, and parks them in a per-user session that navigation
// and selection events then page through. Zero-result searches create no
// session — the caller short-circuits to a "nothing found" reply.

use tracing::{debug, info};

use crate::booru::client::BooruClient;
use crate::booru::criteria::PostQuery;
use crate::booru::models::{Post, Tag};
use crate::compose::compose;
use crate::prefs::traits::PersistenceError;
use crate::service::tags;
use crate::service::users::UserService;
use crate::session::SessionStore;

/// How many posts one search fetches up front for local pagination.
pub const SEARCH_FETCH_LIMIT: u32 = 50;

/// One step of page navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

/// One renderable page of an active search.
#[derive(Debug, Clone)]
pub struct ResultPage {
    /// The composed query the search ran with.
    pub query: String,
    /// Zero-based page index.
    pub page: usize,
    pub total_pages: usize,
    pub posts: Vec<Post>,
}

pub struct ChatFlow {
    client: BooruClient,
    users: UserService,
    sessions: SessionStore,
}

impl ChatFlow {
    pub fn new(client: BooruClient, users: UserService) -> Self {
        Self {
            client,
            users,
            sessions: SessionStore::new(),
        }
    }

    /// Settings operations, for callers that need more than the
    /// delegations below.
    pub fn users(&self) -> &UserService {
        &self.users
    }

    /// Compose the user's query with their stored preferences, run the
    /// search, and open a fresh session on the results. Returns the first
    /// page, or `None` when nothing matched (no session is created and an
    /// existing one is left untouched).
    pub async fn compose_and_search(&self, user_id: i64, raw_query: &str) -> Option<ResultPage> {
        let settings = self.users.settings(user_id).await;
        let query = compose(raw_query, &settings);
        info!(user_id, query = %query, "starting search");

        let posts = self
            .client
            .search_posts(&PostQuery::tags(query.as_str(), SEARCH_FETCH_LIMIT, 0))
            .await;

        if posts.is_empty() {
            debug!(user_id, "search returned nothing, no session created");
            return None;
        }

        self.sessions.start_search(user_id, query.as_str(), posts).await;
        self.page(user_id, 0).await
    }

    /// Jump to an absolute page. `None` when there is no session or the
    /// page is out of range — the current page stays put.
    pub async fn goto_page(&self, user_id: i64, page: usize) -> Option<ResultPage> {
        if !self.sessions.goto_page(user_id, page).await {
            return None;
        }
        self.page(user_id, page).await
    }

    /// Move one page forward or back from the current position.
    pub async fn navigate_page(&self, user_id: i64, direction: Direction) -> Option<ResultPage> {
        let state = self.sessions.get(user_id).await?;
        let target = match direction {
            Direction::Next => state.current_page + 1,
            Direction::Prev => state.current_page.checked_sub(1)?,
        };
        self.goto_page(user_id, target).await
    }

    /// The post at `index`, absolute over the full result set.
    pub async fn select_result(&self, user_id: i64, index: usize) -> Option<Post> {
        self.sessions.select_post(user_id, index).await
    }

    /// Tag lookup with the exact-then-pattern fallback.
    pub async fn lookup_tags(&self, query: &str, limit: u32) -> Vec<Tag> {
        tags::search_with_fallback(&self.client, query, limit).await
    }

    /// Fetch one post by id, bypassing the session.
    pub async fn post_by_id(&self, post_id: u64) -> Option<Post> {
        self.client.post_by_id(post_id).await
    }

    // Settings delegations — the operations a chat settings menu needs.

    pub async fn add_auto_tag(&self, user_id: i64, tag: &str) -> Result<bool, PersistenceError> {
        self.users.add_auto_tag(user_id, tag).await
    }

    pub async fn remove_auto_tag(
        &self,
        user_id: i64,
        index: usize,
    ) -> Result<bool, PersistenceError> {
        self.users.remove_auto_tag_at(user_id, index).await
    }

    pub async fn toggle_rule(&self, user_id: i64, rule: &str) -> Result<bool, PersistenceError> {
        self.users.toggle_rule(user_id, rule).await
    }

    async fn page(&self, user_id: i64, page: usize) -> Option<ResultPage> {
        let state = self.sessions.get(user_id).await?;
        Some(ResultPage {
            query: state.query.clone(),
            page,
            total_pages: state.total_pages,
            posts: state.page_slice(page).to_vec(),
        })
    }
}
