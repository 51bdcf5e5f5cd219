//! Web surface — page rendering and the event transport.

pub mod render;
pub mod routes;

pub use render::{render_page, render_sections};
pub use routes::{AppState, WsMessage, page_routes};
