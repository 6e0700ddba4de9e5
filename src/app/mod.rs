pub mod actions;
pub mod app_state;
