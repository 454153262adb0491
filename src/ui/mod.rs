//! UI / rendering layer — everything that touches Ratatui widgets.
//!
//! This layer takes the views' current contents and turns them into cells on
//! the terminal.  No network I/O happens here.

pub mod columns_pane;
pub mod layout;
pub mod list_widget;
pub mod spinner;
pub mod theme;
