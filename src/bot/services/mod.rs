pub mod github_status;
pub mod link_info;
pub mod status_store;
pub mod telegram_api;
