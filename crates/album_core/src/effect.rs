use crate::{PlannedItem, SyncStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run the two single-item samples and compare against the catalog.
    CheckRemote,
    /// Walk every page of the remote listing.
    FetchListing,
    /// Fetch, extract and write one item.
    FetchItem { index: usize, item: PlannedItem },
    /// An item was not fetched because it is already stored or repeats an earlier one.
    ReportSkip { filename: String, reason: SkipReason },
    /// The run reached a terminal phase.
    Finish { status: SyncStatus },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AlreadyStored,
    DuplicateInListing,
}
