//! Page category constants.
//!
//! Every page declares:
//!   - HTML `id` in the format `{entity}--{category}` (e.g. `"a001_prompt_library--list"`)
//!   - `data-page-category` with one of the constants below
//!
//! The `--` separator makes the entity name searchable: copy the id from
//! the browser DOM Inspector, paste into IDE search, and you land in the
//! matching `domain/` or `usecases/` directory.

/// List of records with filters.
pub const PAGE_CAT_LIST: &str = "list";

/// Detail / edit form for a single record.
pub const PAGE_CAT_DETAIL: &str = "detail";

/// Use-case page (generation, injection, assistant).
pub const PAGE_CAT_USECASE: &str = "usecase";

/// Landing page with summary cards.
pub const PAGE_CAT_DASHBOARD: &str = "dashboard";
