//! Record types carried by the dataframe list.
//!
//! The service imposes no schema on list elements, so the default record is
//! an opaque [`serde_json::Value`].  [`DataFrameSummary`] is the declared
//! shape the reference backend actually emits (`{"id": .., "columns": [..]}`)
//! for callers that want typed access.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One opaque element of the `/dataframes` response.
pub type DataFrameRecord = Value;

/// Column name → dtype string, as served by `/dataframe/<id>/columns`.
pub type ColumnTypes = BTreeMap<String, String>;

/// Declared record shape of the reference backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataFrameSummary {
    pub id: String,
    #[serde(default)]
    pub columns: Vec<String>,
}

/// Anything the list view can render and inspect.
///
/// Both accessors are best-effort: a record without an id simply cannot be
/// inspected.
pub trait RecordDisplay {
    /// Identifier usable in `/dataframe/<id>/columns`, if the record has one.
    fn record_id(&self) -> Option<String>;

    /// One-line label for the list row.
    fn label(&self) -> String;
}

impl RecordDisplay for Value {
    fn record_id(&self) -> Option<String> {
        match self.get("id")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn label(&self) -> String {
        let Some(id) = self.record_id() else {
            return self.to_string();
        };
        match self.get("columns").and_then(Value::as_array) {
            Some(cols) => {
                let names: Vec<String> = cols
                    .iter()
                    .map(|c| c.as_str().map_or_else(|| c.to_string(), str::to_owned))
                    .collect();
                format!("{id}  [{}]", names.join(", "))
            }
            None => format!("{id}  {self}"),
        }
    }
}

impl RecordDisplay for DataFrameSummary {
    fn record_id(&self) -> Option<String> {
        Some(self.id.clone())
    }

    fn label(&self) -> String {
        format!("{}  [{}]", self.id, self.columns.join(", "))
    }
}
