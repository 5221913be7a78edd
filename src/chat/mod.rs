//! Chat Engine
//!
//! Sessão de conversa com histórico limitado sobre o backend de geração.

mod session;

pub use session::{ChatSession, Role, Turn, APOLOGY_REPLY, FALLBACK_REPLY, HISTORY_CAP};
