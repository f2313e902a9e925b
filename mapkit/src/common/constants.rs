// path syntax constants
pub const DOT_SEPARATOR: char = '.';
pub const UNDERSCORE_SEPARATOR: char = '_';
pub const ESCAPED_UNDERSCORE: &str = "__";

// resolver defaults
pub const DEFAULT_MAX_SEGMENTS: usize = 1000;
pub const DEFAULT_MAX_SUGGESTIONS: usize = 3;
pub const DEFAULT_MAX_SUGGESTION_DISTANCE: usize = 2;
