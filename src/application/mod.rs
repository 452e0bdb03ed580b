// Application layer - Accessors and refresh orchestration
pub mod accessor;
pub mod event_view;
pub mod live_poll;
pub mod resources;
