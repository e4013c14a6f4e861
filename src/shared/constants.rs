/// Maximum length of a region name, counted in characters
pub const NAME_MAX_LENGTH: usize = 200;

/// Upper bound on results returned by cross-parent searches
pub const SEARCH_RESULT_LIMIT: usize = 100;
