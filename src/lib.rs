//! # techdesk
//!
//! Terminal chat-and-news assistant: converse with a hosted language model and
//! read auto-summarized technology news filtered by a stored personal profile.

pub mod chat;
pub mod config;
pub mod errors;
pub mod news;
pub mod profile;
pub mod providers;
pub mod shell;

pub use chat::ChatSession;
pub use errors::{Result, TechdeskError};
pub use profile::{ProfileStore, UserProfile};
