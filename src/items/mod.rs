//! Work items and the privacy sanitizer
//!
//! Items are the common shape every calendar event and email is normalised
//! into before aggregation.

pub mod models;
pub mod sanitizer;

pub use models::{
    parse_timestamp, truncate_chars, Item, ItemKind, ItemMeta, ItemSource, ItemStatus, RawItem,
    CONTENT_PREVIEW_LIMIT, MAX_PARTICIPANTS,
};
pub use sanitizer::{sanitize, sanitize_item, SafeMeta, SanitizedItem};
