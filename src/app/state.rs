//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use tokio::sync::mpsc;

use super::columns::{ColumnsDelivery, ColumnsView};
use super::fetch_runtime::SharedTransport;
use super::list_view::{DataFrameListView, ListDelivery};
use crate::config::AppConfig;
use crate::core::record::DataFrameRecord;
use crate::core::{error::FetchError, transport::ServiceUrl};
use crate::ui::list_widget::ListWidgetState;

/// Top-level application state.
pub struct AppState {
    /// The dataframe list and the request that fills it.
    pub list_view: DataFrameListView<DataFrameRecord>,
    /// Column types of the inspected dataframe.
    pub columns: ColumnsView,
    /// Widget-level state (selection, scroll).
    pub list_state: ListWidgetState,
    /// User configuration (bindings, service address).
    pub config: AppConfig,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Tick counter, drives the activity indicator.
    pub tick: u64,
}

/// Receiving ends of the request channels, polled by the event loop.
pub struct Deliveries {
    pub list_rx: mpsc::UnboundedReceiver<ListDelivery<DataFrameRecord>>,
    pub columns_rx: mpsc::UnboundedReceiver<ColumnsDelivery>,
}

impl AppState {
    /// Wire the views to `transport`.  No request is issued until
    /// [`DataFrameListView::initialize`] is called.
    ///
    /// Fails when `config.base_url` is not an http(s) URL.
    pub fn new(
        config: AppConfig,
        transport: SharedTransport,
    ) -> Result<(Self, Deliveries), FetchError> {
        let service = ServiceUrl::parse(&config.base_url)?;
        let (list_tx, list_rx) = mpsc::unbounded_channel();
        let (columns_tx, columns_rx) = mpsc::unbounded_channel();

        let list_view = DataFrameListView::new(
            SharedTransport::clone(&transport),
            service.dataframes(),
            list_tx,
        )
        .with_failure_policy(config.failure_policy());
        let columns = ColumnsView::new(transport, service, columns_tx);

        let state = Self {
            list_view,
            columns,
            list_state: ListWidgetState::default(),
            config,
            should_quit: false,
            status_message: None,
            tick: 0,
        };
        Ok((state, Deliveries { list_rx, columns_rx }))
    }

    /// The record under the cursor, if any.
    pub fn selected_record(&self) -> Option<&DataFrameRecord> {
        self.list_view.list().get(self.list_state.selected)
    }

    /// Keep the cursor inside the list after it was replaced.
    pub fn clamp_selection(&mut self) {
        let len = self.list_view.list().len();
        if self.list_state.selected >= len {
            self.list_state.selected = len.saturating_sub(1);
        }
    }

    /// Tear down both views so late responses are dropped.
    pub fn teardown(&mut self) {
        self.list_view.teardown();
        self.columns.teardown();
    }
}
