//! Configuration constants for the market backend


/// Service identification
pub mod service {
    /// Name reported by the health endpoint and used for JSON logs
    pub const SERVICE_NAME: &str = "market-backend";
}

/// Default server configuration
pub mod server {
    /// Default HTTP listening host
    pub const DEFAULT_HOST: &str = "127.0.0.1";

    /// Default HTTP server port
    pub const DEFAULT_PORT: u16 = 8080;
}

/// Database configuration
pub mod database {
    /// Default PostgreSQL database URL
    pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost:5432/market";

    /// Default number of pooled connections
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 16;

    /// Default number of idle connections kept open
    pub const DEFAULT_MIN_IDLE_CONNECTIONS: u32 = 2;

    /// Default wait for a free connection, in seconds
    pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

    /// Default idle time before a connection is closed, in seconds
    pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600;

    /// Default lifetime of a connection, in seconds
    pub const DEFAULT_MAX_LIFETIME_SECS: u64 = 1_800;
}

/// Pagination configuration
pub mod pagination {
    /// Page size used when a request does not ask for one
    pub const DEFAULT_PAGE_LIMIT: i64 = 10;

    /// Largest page size a request may ask for
    pub const MAX_PAGE_LIMIT: i64 = 100;

    /// Upper bound for a configured `max_limit`
    pub const PAGE_LIMIT_CEILING: i64 = 1_000;

    /// Default deadline for a single page query, in seconds
    pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 30;
}

/// Limits enforced on request bodies
pub mod validation {
    pub const MAX_TITLE_LEN: usize = 255;

    pub const MAX_ARTICLE_CONTENT_LEN: usize = 10_000;

    pub const MAX_PRODUCT_NAME_LEN: usize = 255;

    pub const MAX_PRODUCT_DESCRIPTION_LEN: usize = 10_000;

    /// Maximum number of tags on a product
    pub const MAX_TAGS: usize = 20;

    pub const MAX_TAG_LEN: usize = 50;

    pub const MAX_COMMENT_LEN: usize = 1_000;

    /// Longest accepted `keyword` query parameter
    pub const MAX_KEYWORD_LEN: usize = 100;
}
