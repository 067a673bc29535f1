use album_core::{update, Article, Catalog, Msg, Phase, SyncMode, SyncResult, SyncState};

#[test]
fn out_of_phase_messages_are_ignored() {
    let state = SyncState::new(SyncMode::Force, Catalog::new());

    let (state, effects) = update(state, Msg::ItemStored { index: 0 });
    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::Idle);

    let (state, effects) = update(state, Msg::ListingCompleted(Vec::<Article>::new()));
    assert!(effects.is_empty());
    assert_eq!(state.result(), SyncResult::default());

    let (state, _) = update(state, Msg::Start);
    let (state, effects) = update(state, Msg::Start);
    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::Listing);
}
