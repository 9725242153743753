// Search sessions — per-user in-memory pagination state.
//
// One session per user, replaced wholesale on every new search and gone
// when the process exits. Navigation is index-based and rejects
// out-of-range requests instead of clamping; callers decide how to clamp.

use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

use crate::booru::models::Post;

/// Fixed page size for result pagination.
pub const POSTS_PER_PAGE: usize = 5;

/// The state of one user's active search.
#[derive(Debug, Clone)]
pub struct SearchState {
    /// The fully composed tag query this search ran with.
    pub query: String,
    /// The result set, fixed once populated.
    pub results: Vec<Post>,
    /// Zero-based current page.
    pub current_page: usize,
    /// Always at least 1, even for an empty result set.
    pub total_pages: usize,
}

impl SearchState {
    pub fn new(query: impl Into<String>, results: Vec<Post>) -> Self {
        let total_pages = results.len().div_ceil(POSTS_PER_PAGE).max(1);
        Self {
            query: query.into(),
            results,
            current_page: 0,
            total_pages,
        }
    }

    /// The results on the given page. Out-of-range pages are empty.
    pub fn page_slice(&self, page: usize) -> &[Post] {
        let start = page.saturating_mul(POSTS_PER_PAGE);
        if start >= self.results.len() {
            return &[];
        }
        let end = (start + POSTS_PER_PAGE).min(self.results.len());
        &self.results[start..end]
    }
}

/// Per-user session map. Users never interact across keys, so one lock
/// over the whole map is enough; same-user races are last-write-wins.
pub struct SessionStore {
    states: Mutex<HashMap<i64, SearchState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            states: Mutex::new(HashMap::new()),
        }
    }

    /// Create a session for the user, replacing any existing one.
    pub async fn start_search(&self, user_id: i64, query: impl Into<String>, results: Vec<Post>) {
        let state = SearchState::new(query, results);
        debug!(
            user_id,
            results = state.results.len(),
            pages = state.total_pages,
            "search session started"
        );
        self.states.lock().await.insert(user_id, state);
    }

    /// A snapshot of the user's session, if one exists.
    pub async fn get(&self, user_id: i64) -> Option<SearchState> {
        self.states.lock().await.get(&user_id).cloned()
    }

    /// Move to `page`. Returns false (leaving the session untouched) when
    /// no session exists or the page is out of range.
    pub async fn goto_page(&self, user_id: i64, page: usize) -> bool {
        let mut states = self.states.lock().await;
        match states.get_mut(&user_id) {
            Some(state) if page < state.total_pages => {
                state.current_page = page;
                true
            }
            _ => false,
        }
    }

    /// The posts on the given page of the user's session.
    pub async fn page_slice(&self, user_id: i64, page: usize) -> Vec<Post> {
        self.states
            .lock()
            .await
            .get(&user_id)
            .map(|state| state.page_slice(page).to_vec())
            .unwrap_or_default()
    }

    /// Look up a post by absolute index over the full result set.
    pub async fn select_post(&self, user_id: i64, index: usize) -> Option<Post> {
        self.states
            .lock()
            .await
            .get(&user_id)
            .and_then(|state| state.results.get(index))
            .cloned()
    }

    /// Drop the user's session. Returns whether one existed.
    pub async fn clear(&self, user_id: i64) -> bool {
        self.states.lock().await.remove(&user_id).is_some()
    }

    /// Drop every session, returning how many were removed.
    pub async fn clear_all(&self) -> usize {
        let mut states = self.states.lock().await;
        let count = states.len();
        states.clear();
        count
    }

    /// How many users currently have an active search.
    pub async fn active_users(&self) -> usize {
        self.states.lock().await.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
