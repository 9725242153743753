// Search criteria — parameter records for the posts and tags endpoints.
//
// Constructed with explicit defaults so callers fill in only what they
// need. The client turns these into wire parameters; nothing here does I/O.

/// Parameters for a post search.
#[derive(Debug, Clone)]
pub struct PostQuery {
    /// Space-separated tag query, empty for "everything".
    pub tags: String,
    /// Requested result count. Clamped to [1, 100] at request time.
    pub limit: u32,
    /// Zero-based page index (`pid` on the wire).
    pub page: u64,
    /// Fetch a single post by id (`id` on the wire).
    pub post_id: Option<u64>,
    /// Filter by change id (`cid` on the wire).
    pub change_id: Option<u64>,
}

impl Default for PostQuery {
    fn default() -> Self {
        Self {
            tags: String::new(),
            limit: 20,
            page: 0,
            post_id: None,
            change_id: None,
        }
    }
}

impl PostQuery {
    /// A plain tag search on the given page.
    pub fn tags(tags: impl Into<String>, limit: u32, page: u64) -> Self {
        Self {
            tags: tags.into(),
            limit,
            page,
            ..Self::default()
        }
    }

    /// Look up a single post by id.
    pub fn by_id(post_id: u64) -> Self {
        Self {
            limit: 1,
            post_id: Some(post_id),
            ..Self::default()
        }
    }
}

/// Sort direction for tag listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Sort key for tag listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagOrderBy {
    Date,
    Count,
    Name,
}

impl TagOrderBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagOrderBy::Date => "date",
            TagOrderBy::Count => "count",
            TagOrderBy::Name => "name",
        }
    }
}

/// Parameters for a tag search. `name` matches exactly; `pattern` is a
/// wildcard match (`%query%` for substring semantics).
#[derive(Debug, Clone)]
pub struct TagQuery {
    pub limit: u32,
    pub after_id: Option<u64>,
    pub name: Option<String>,
    /// Comma-separated list of exact names.
    pub names: Option<String>,
    pub pattern: Option<String>,
    pub order: SortOrder,
    pub order_by: TagOrderBy,
}

impl Default for TagQuery {
    fn default() -> Self {
        Self {
            limit: 100,
            after_id: None,
            name: None,
            names: None,
            pattern: None,
            order: SortOrder::Asc,
            order_by: TagOrderBy::Name,
        }
    }
}

impl TagQuery {
    /// Exact-name lookup.
    pub fn exact(name: impl Into<String>, limit: u32) -> Self {
        Self {
            limit,
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Wildcard pattern lookup.
    pub fn pattern(pattern: impl Into<String>, limit: u32) -> Self {
        Self {
            limit,
            pattern: Some(pattern.into()),
            ..Self::default()
        }
    }
}
