pub mod actions;
pub mod auth;
pub mod callback_data;
pub mod classifier;
pub mod commands;
pub mod dispatcher;
pub mod errors;
pub mod keyboards;
pub mod modules;
pub mod services;
pub mod strings;
pub mod update;
