//! The dataframe list view: owns the fetched records and the request that
//! fills them.
//!
//! The view never blocks.  [`DataFrameListView::fetch_data_frames`] hands the
//! request to a background job and returns; the result comes back later as a
//! [`ListDelivery`] on the event loop, which passes it to
//! [`DataFrameListView::deliver`].  A generation counter makes sure only the
//! newest request can land, and a cancel flag keeps late results away from a
//! view that has been torn down.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Local};
use serde::de::DeserializeOwned;
use tokio::sync::mpsc;

use super::fetch_runtime::{self, SharedTransport};
use crate::core::{error::FetchError, record::DataFrameRecord};

// ───────────────────────────────────────── list ──────────────

/// Ordered records, replaced wholesale on every successful fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct DataFrameList<R> {
    items: Vec<R>,
}

impl<R> DataFrameList<R> {
    pub fn as_slice(&self) -> &[R] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Swap in a new response.  Never merges.
    fn replace(&mut self, items: Vec<R>) {
        self.items = items;
    }
}

impl<R> Default for DataFrameList<R> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

// ───────────────────────────────────────── messages ──────────

/// Result of one list request, tagged with the generation that issued it.
#[derive(Debug)]
pub struct ListDelivery<R> {
    pub generation: u64,
    pub result: Result<Vec<R>, FetchError>,
}

/// Returned by [`DataFrameListView::fetch_data_frames`] to identify the
/// request it just issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
}

/// What [`DataFrameListView::deliver`] did with a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The list now holds this many records.
    Applied(usize),
    /// The request failed; the list kept its previous contents.
    Failed,
    /// Stale generation or torn-down view; nothing changed.
    Ignored,
}

/// `NotYetFetched` until the first successful delivery, then `Fetched` for
/// the rest of the view's life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    #[default]
    NotYetFetched,
    Fetched,
}

/// How request failures reach the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Keep the previous list and show nothing.
    #[default]
    Silent,
    /// Keep the previous list and expose the error to the render layer.
    Surface,
}

// ───────────────────────────────────────── view ──────────────

pub struct DataFrameListView<R = DataFrameRecord> {
    url: String,
    transport: SharedTransport,
    tx: mpsc::UnboundedSender<ListDelivery<R>>,
    list: DataFrameList<R>,
    phase: FetchPhase,
    failure_policy: FailurePolicy,
    last_error: Option<FetchError>,
    /// Id of the newest request; older deliveries are stale.
    generation: u64,
    /// Generation still awaiting its delivery, if any.
    pending: Option<u64>,
    initialized: bool,
    updated_at: Option<DateTime<Local>>,
    cancel: Arc<AtomicBool>,
}

impl<R> DataFrameListView<R>
where
    R: DeserializeOwned + Send + 'static,
{
    pub fn new(
        transport: SharedTransport,
        url: impl Into<String>,
        tx: mpsc::UnboundedSender<ListDelivery<R>>,
    ) -> Self {
        Self {
            url: url.into(),
            transport,
            tx,
            list: DataFrameList::default(),
            phase: FetchPhase::default(),
            failure_policy: FailurePolicy::default(),
            last_error: None,
            generation: 0,
            pending: None,
            initialized: false,
            updated_at: None,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Activate the view.  The first call issues the initial fetch; any later
    /// call is a no-op and returns `false`.
    pub fn initialize(&mut self) -> bool {
        if self.initialized {
            return false;
        }
        self.initialized = true;
        self.fetch_data_frames();
        true
    }

    /// Issue one GET for the list and return immediately.
    ///
    /// The response is applied later through [`Self::deliver`].  No retry.
    pub fn fetch_data_frames(&mut self) -> FetchTicket {
        self.generation = self.generation.wrapping_add(1);
        let generation = self.generation;
        self.pending = Some(generation);

        tracing::debug!("fetch_data_frames: gen={generation} url={}", self.url);
        fetch_runtime::spawn_json_get::<Vec<R>, _, _>(
            Arc::clone(&self.transport),
            self.url.clone(),
            Arc::clone(&self.cancel),
            self.tx.clone(),
            move |result| ListDelivery { generation, result },
        );

        FetchTicket { generation }
    }

    /// Apply a delivered result.
    pub fn deliver(&mut self, delivery: ListDelivery<R>) -> Delivery {
        if self.cancel.load(Ordering::Relaxed) || delivery.generation != self.generation {
            tracing::debug!(
                "ignoring list delivery gen={} (current={})",
                delivery.generation,
                self.generation
            );
            return Delivery::Ignored;
        }
        self.pending = None;

        match delivery.result {
            Ok(items) => {
                let count = items.len();
                self.list.replace(items);
                self.phase = FetchPhase::Fetched;
                self.last_error = None;
                self.updated_at = Some(Local::now());
                tracing::debug!("list replaced: {count} records");
                Delivery::Applied(count)
            }
            Err(err) => {
                tracing::debug!("list fetch failed: {err}");
                self.last_error = Some(err);
                Delivery::Failed
            }
        }
    }
}

impl<R> DataFrameListView<R> {
    /// Stop accepting deliveries.  In-flight jobs drop their results.
    pub fn teardown(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        self.pending = None;
    }

    pub fn list(&self) -> &[R] {
        self.list.as_slice()
    }

    pub fn phase(&self) -> FetchPhase {
        self.phase
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_fetching(&self) -> bool {
        self.pending.is_some()
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    /// Generation of the newest request issued; `0` before the first one.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    /// The last error, but only when the policy lets it be shown.
    pub fn visible_error(&self) -> Option<&FetchError> {
        match self.failure_policy {
            FailurePolicy::Silent => None,
            FailurePolicy::Surface => self.last_error.as_ref(),
        }
    }

    pub fn updated_at(&self) -> Option<DateTime<Local>> {
        self.updated_at
    }
}

impl<R> Drop for DataFrameListView<R> {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}
