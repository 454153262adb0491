//! Input and delivery handling — maps key events and request results to
//! state mutations.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::columns::ColumnsDelivery;
use super::list_view::{Delivery, ListDelivery};
use super::state::AppState;
use crate::config::Action;
use crate::core::record::{DataFrameRecord, RecordDisplay};

/// Process a key event.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Ctrl+c always quits.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    let len = state.list_view.list().len();
    match key.code {
        KeyCode::Home => {
            state.list_state.selected = 0;
            return;
        }
        KeyCode::End => {
            state.list_state.selected = len.saturating_sub(1);
            return;
        }
        _ => {}
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };

    match action {
        Action::Quit => state.should_quit = true,
        Action::MoveUp => state.list_state.select_prev(),
        Action::MoveDown => state.list_state.select_next(len),
        Action::Refresh => {
            let ticket = state.list_view.fetch_data_frames();
            tracing::debug!("refresh requested: gen={}", ticket.generation);
            state.status_message = None;
        }
        Action::Inspect => inspect_selected(state),
    }
}

fn inspect_selected(state: &mut AppState) {
    let Some(record) = state.selected_record() else {
        return;
    };
    match record.record_id() {
        Some(id) => {
            state.columns.request(&id);
            state.status_message = None;
        }
        None => {
            state.columns.clear();
            state.status_message = Some("record has no id to inspect".into());
        }
    }
}

/// Apply a list result and fix up everything that depends on the list.
pub fn handle_list_delivery(state: &mut AppState, delivery: ListDelivery<DataFrameRecord>) {
    match state.list_view.deliver(delivery) {
        Delivery::Applied(_) => {
            state.clamp_selection();
            // Inspected id may be gone from the new list.
            let still_listed = state.columns.promise().id().is_some_and(|id| {
                state
                    .list_view
                    .list()
                    .iter()
                    .any(|r| r.record_id().as_deref() == Some(id))
            });
            if !still_listed {
                state.columns.clear();
            }
        }
        Delivery::Failed => {
            if let Some(err) = state.list_view.visible_error() {
                state.status_message = Some(format!("{}: {err}", err.kind()));
            }
        }
        Delivery::Ignored => {}
    }
}

pub fn handle_columns_delivery(state: &mut AppState, delivery: ColumnsDelivery) {
    state.columns.deliver(delivery);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::columns::ColumnsPromise;
    use crate::app::fetch_runtime::testing::MockTransport;
    use crate::app::state::Deliveries;
    use crate::config::AppConfig;
    use crate::core::error::FetchError;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    async fn loaded_state(
        mock: &std::sync::Arc<MockTransport>,
        config: AppConfig,
    ) -> (AppState, Deliveries) {
        let (mut state, mut rx) = AppState::new(config, mock.clone()).unwrap();
        state.list_view.initialize();
        let delivery = rx.list_rx.recv().await.unwrap();
        handle_list_delivery(&mut state, delivery);
        (state, rx)
    }

    #[tokio::test]
    async fn navigation_stays_inside_the_list() {
        let mock = MockTransport::new();
        mock.respond_json(r#"[{"id":"a"},{"id":"b"}]"#);
        let (mut state, _rx) = loaded_state(&mock, AppConfig::default()).await;

        handle_key(&mut state, key(KeyCode::Down));
        handle_key(&mut state, key(KeyCode::Down));
        assert_eq!(state.list_state.selected, 1);
        handle_key(&mut state, key(KeyCode::Char('k')));
        handle_key(&mut state, key(KeyCode::Up));
        assert_eq!(state.list_state.selected, 0);
        handle_key(&mut state, key(KeyCode::End));
        assert_eq!(state.list_state.selected, 1);
    }

    #[tokio::test]
    async fn refresh_replaces_list_and_clamps_cursor() {
        let mock = MockTransport::new();
        mock.respond_json(r#"[{"id":"a"},{"id":"b"},{"id":"c"}]"#);
        mock.respond_json(r#"[{"id":"z"}]"#);
        let (mut state, mut rx) = loaded_state(&mock, AppConfig::default()).await;
        handle_key(&mut state, key(KeyCode::End));

        handle_key(&mut state, key(KeyCode::Char('r')));
        let delivery = rx.list_rx.recv().await.unwrap();
        handle_list_delivery(&mut state, delivery);

        assert_eq!(state.list_view.list().len(), 1);
        assert_eq!(state.list_state.selected, 0);
        assert_eq!(mock.requests().len(), 2);
    }

    #[tokio::test]
    async fn inspect_requests_columns_of_selected_record() {
        let mock = MockTransport::new();
        mock.respond_json(r#"[{"id":"df1","columns":["id"]},{"id":"df2","columns":["geometry"]}]"#);
        mock.respond_json(r#"{"id":"int64","geometry":"object"}"#);
        let (mut state, mut rx) = loaded_state(&mock, AppConfig::default()).await;

        handle_key(&mut state, key(KeyCode::Down));
        handle_key(&mut state, key(KeyCode::Enter));
        let delivery = rx.columns_rx.recv().await.unwrap();
        handle_columns_delivery(&mut state, delivery);

        assert_eq!(
            mock.requests().last().map(String::as_str),
            Some("http://localhost:5000/dataframe/df2/columns")
        );
        assert!(matches!(state.columns.promise(), ColumnsPromise::Resolved(id, _) if id == "df2"));
    }

    #[tokio::test]
    async fn record_without_id_cannot_be_inspected() {
        let mock = MockTransport::new();
        mock.respond_json(r#"["plain"]"#);
        let (mut state, _rx) = loaded_state(&mock, AppConfig::default()).await;

        handle_key(&mut state, key(KeyCode::Enter));

        assert_eq!(state.columns.promise(), &ColumnsPromise::Empty);
        assert!(state.status_message.is_some());
        assert_eq!(mock.requests().len(), 1);
    }

    #[tokio::test]
    async fn failures_reach_status_bar_only_when_surfaced() {
        for (surface, expect_message) in [(false, false), (true, true)] {
            let mock = MockTransport::new();
            mock.respond_err(FetchError::Status {
                url: "http://localhost:5000/dataframes".into(),
                status: 500,
            });
            let config = AppConfig {
                surface_errors: surface,
                ..AppConfig::default()
            };
            let (state, _rx) = loaded_state(&mock, config).await;

            assert!(state.list_view.list().is_empty());
            assert_eq!(state.status_message.is_some(), expect_message);
        }
    }

    #[test]
    fn unusable_service_url_is_refused_before_any_request() {
        let mock = MockTransport::new();
        let config = AppConfig {
            base_url: "localhost:5000".into(),
            ..AppConfig::default()
        };

        let err = AppState::new(config, mock.clone()).err();

        assert!(matches!(err, Some(FetchError::BadUrl { .. })));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn ctrl_c_quits() {
        let mock = MockTransport::new();
        let (mut state, _rx) = AppState::new(AppConfig::default(), mock).unwrap();

        handle_key(
            &mut state,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(state.should_quit);
    }
}
