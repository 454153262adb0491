//! Column-type inspector for the selected dataframe.
//!
//! Tracks a single `/dataframe/<id>/columns` request as a small promise:
//! empty, deferred on an id, resolved, or rejected.  Only a result for the id
//! still being waited on is accepted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

use super::fetch_runtime::{self, SharedTransport};
use crate::core::{error::FetchError, record::ColumnTypes, transport::ServiceUrl};

/// Result of a columns request for `id`.
#[derive(Debug)]
pub struct ColumnsDelivery {
    pub id: String,
    pub result: Result<ColumnTypes, FetchError>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ColumnsPromise {
    #[default]
    Empty,
    Deferred(String),
    Resolved(String, ColumnTypes),
    Rejected(String, FetchError),
}

impl ColumnsPromise {
    pub fn is_deferred(&self, id: &str) -> bool {
        matches!(self, Self::Deferred(d) if d == id)
    }

    /// Id the promise is about, if any.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::Deferred(id) | Self::Resolved(id, _) | Self::Rejected(id, _) => Some(id),
        }
    }
}

pub struct ColumnsView {
    service: ServiceUrl,
    transport: SharedTransport,
    tx: mpsc::UnboundedSender<ColumnsDelivery>,
    promise: ColumnsPromise,
    cancel: Arc<AtomicBool>,
}

impl ColumnsView {
    pub fn new(
        transport: SharedTransport,
        service: ServiceUrl,
        tx: mpsc::UnboundedSender<ColumnsDelivery>,
    ) -> Self {
        Self {
            service,
            transport,
            tx,
            promise: ColumnsPromise::Empty,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Ask for the column types of `id`, replacing whatever was shown.
    pub fn request(&mut self, id: &str) {
        if self.promise.is_deferred(id) {
            return;
        }
        self.promise = ColumnsPromise::Deferred(id.to_string());

        let url = self.service.columns(id);
        let id = id.to_string();
        fetch_runtime::spawn_json_get::<ColumnTypes, _, _>(
            Arc::clone(&self.transport),
            url,
            Arc::clone(&self.cancel),
            self.tx.clone(),
            move |result| ColumnsDelivery { id, result },
        );
    }

    /// Apply a delivered result.  Returns `true` if it was accepted.
    pub fn deliver(&mut self, delivery: ColumnsDelivery) -> bool {
        if self.cancel.load(Ordering::Relaxed) || !self.promise.is_deferred(&delivery.id) {
            return false;
        }
        self.promise = match delivery.result {
            Ok(columns) => ColumnsPromise::Resolved(delivery.id, columns),
            Err(err) => {
                tracing::debug!("columns for {} failed: {err}", delivery.id);
                ColumnsPromise::Rejected(delivery.id, err)
            }
        };
        true
    }

    pub fn clear(&mut self) {
        self.promise = ColumnsPromise::Empty;
    }

    pub fn promise(&self) -> &ColumnsPromise {
        &self.promise
    }

    pub fn teardown(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}

impl Drop for ColumnsView {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}
