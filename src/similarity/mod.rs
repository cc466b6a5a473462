/// Related-tag lookup and search tag planning
pub mod resolver;
/// Category to tag mapping
pub mod taxonomy;
