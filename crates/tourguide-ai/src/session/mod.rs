//! Conversation state and the per-process session store.
//!
//! A `ConversationState` belongs to exactly one visitor session. The store
//! hands out shared handles so a connection can run a turn while the
//! rate-limit bookkeeping stays inside a single lock acquisition.

mod state;
mod store;

pub use state::{ChatTurn, ConversationState, Role};
pub use store::{SessionStore, SharedState};
