use crate::{Effect, Msg, Phase, SyncState};

/// Pure update function: applies a message to state and returns any effects.
///
/// Messages that do not fit the current phase are ignored, so a late or repeated
/// completion can never double count an item.
pub fn update(mut state: SyncState, msg: Msg) -> (SyncState, Vec<Effect>) {
    let effects = match msg {
        Msg::Start => {
            if state.phase() == Phase::Idle {
                state.begin()
            } else {
                Vec::new()
            }
        }
        Msg::CheckCompleted(freshness) => {
            if state.phase() == Phase::Checking {
                state.apply_check(freshness)
            } else {
                Vec::new()
            }
        }
        Msg::ListingCompleted(articles) => {
            if state.phase() == Phase::Listing {
                state.apply_listing(articles)
            } else {
                Vec::new()
            }
        }
        Msg::ItemStored { index } => state.apply_item_done(index, true),
        Msg::ItemFailed { index, .. } => state.apply_item_done(index, false),
    };

    (state, effects)
}
