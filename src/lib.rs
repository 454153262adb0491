//! Load the dataframe list from a dataframe service and present it in a
//! terminal UI.
//!
//! [`app::list_view::DataFrameListView`] is the heart of the crate: it owns
//! the list, issues the request on [`initialize`](app::list_view::DataFrameListView::initialize),
//! and swaps in each delivered response wholesale.

pub mod app;
pub mod config;
pub mod core;
pub mod ui;
