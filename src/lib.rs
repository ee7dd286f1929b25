//! Polls the Practicum homework status API and reports review status changes
//! to a Telegram chat.
pub mod config;
pub mod error;
pub mod interpret;
pub mod model;
pub mod notify;
pub mod poller;
pub mod practicum;
pub mod validate;
