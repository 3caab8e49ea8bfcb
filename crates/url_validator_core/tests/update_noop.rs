use url_validator_core::{update, Msg, PipelineState};

#[test]
fn update_is_noop() {
    let state = PipelineState::new();
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn fresh_state_reports_defaults() {
    let view = PipelineState::new().view();

    assert!(!view.network_activity);
    assert!(!view.is_valid_url);
    assert!(!view.is_reachable_url);
    assert_eq!(view.validated_url, None);
}
