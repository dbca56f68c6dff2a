// coach-desk-tui/src/ui.rs
pub mod auth;
pub mod editors;
pub mod layout;
pub mod lists;
pub mod modals;
pub mod status_bar;
pub mod viewer;

pub use layout::render_ui;
