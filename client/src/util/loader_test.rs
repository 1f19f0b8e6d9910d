use super::*;

#[test]
fn default_is_loading() {
    assert!(LoadState::<u8>::default().is_loading());
}

#[test]
fn ok_becomes_ready() {
    let state = LoadState::from_result(Ok::<_, String>(3), "Failed to load courses");
    assert_eq!(state.ready(), Some(&3));
    assert_eq!(state.error(), None);
}

#[test]
fn error_is_replaced_by_static_message() {
    let state = LoadState::<u8>::from_result(Err("connection reset"), "Failed to load courses");
    assert_eq!(state, LoadState::Failed("Failed to load courses".to_owned()));
}

#[test]
fn require_turns_missing_row_into_failure() {
    let found = LoadState::Ready(Some(1)).require("Course not found");
    let missing = LoadState::<Option<u8>>::Ready(None).require("Course not found");

    assert_eq!(found, LoadState::Ready(1));
    assert_eq!(missing.error(), Some("Course not found"));
    assert!(LoadState::<Option<u8>>::Loading.require("x").is_loading());
}

#[test]
fn ready_mut_edits_only_loaded_data() {
    let mut state = LoadState::Ready(vec![1]);
    if let Some(items) = state.ready_mut() {
        items.push(2);
    }
    assert_eq!(state.ready(), Some(&vec![1, 2]));

    let mut failed = LoadState::<Vec<u8>>::Failed("x".to_owned());
    assert!(failed.ready_mut().is_none());
}

#[test]
fn loader_without_services_stays_loading_off_browser() {
    let loader = Loader::<u8>::new();
    loader.load(None, "Failed to load courses", |_client| async { Ok(1) });
    assert!(loader.state.get_untracked().is_loading());
}
