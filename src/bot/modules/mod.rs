pub mod account;
pub mod codec;
pub mod echo;
pub mod group_guard;
pub mod help;
pub mod link_preview;
pub mod site_status;
pub mod welcome;
