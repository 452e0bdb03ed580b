// Presentation layer - CLI and text views
pub mod app_state;
pub mod cli;
pub mod handlers;
pub mod views;
