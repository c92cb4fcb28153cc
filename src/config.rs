//! Configuration passed explicitly into every extraction call.

pub const DEFAULT_BASE_URL: &str = "http://google.com/movies";
pub const DEFAULT_USER_AGENT: &str = "showtimes (http://github.com/jonursenbach/showtimes)";
pub const PAGE_SIZE: u32 = 10;

/// Which collection is on the outside of the result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Grouping {
    /// Theaters, each with the movies it shows
    #[default]
    ByTheater,
    /// Movies, each with the theaters showing it
    ByMovie,
}

/// Per-request options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionConfig {
    /// Days from today; 0 is today
    pub date_offset: i32,
    pub grouping: Grouping,
}

impl ExtractionConfig {
    pub fn new(date_offset: i32, grouping: Grouping) -> Self {
        Self {
            date_offset,
            grouping,
        }
    }
}

/// Settings for talking to the listing source.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub user_agent: String,
    /// Listing blocks per page; page offsets step by this
    pub page_size: u32,
    /// Hard stop for pagination
    pub max_pages: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            page_size: PAGE_SIZE,
            max_pages: 50,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }
}
