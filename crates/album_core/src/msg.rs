use crate::{Article, Freshness};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Begin the run in the mode the state was created with.
    Start,
    /// Both freshness samples came back (successfully or not).
    CheckCompleted(Freshness),
    /// The full listing walk finished, possibly truncated by a page failure.
    ListingCompleted(Vec<Article>),
    /// The item at `index` was fetched, extracted and written.
    ItemStored { index: usize },
    /// The item at `index` could not be fetched or written.
    ItemFailed { index: usize, reason: String },
}
