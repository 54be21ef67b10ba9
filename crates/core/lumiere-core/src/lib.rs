//! Lumiere core
//!
//! Stores and orchestration for the smart routine and product advisor:
//!
//! - Catalog store: lazily loaded product list with category/text filtering
//! - Selection store: ordered, persisted subset of the catalog
//! - Conversation log: append-only, persisted chat history
//! - Localization controller: Ltr/Rtl flag with one-shot auto-detection
//! - Topic guard: allow-list gate in front of the relay
//! - Advisor: the facade wiring stores to a [`provider::ChatProvider`]
//!
//! Rendering lives in the adaptor crates; nothing in this crate writes
//! to a display surface.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod advisor;
pub mod catalog;
pub mod config;
pub mod error;
pub mod i18n;
pub mod locale;
pub mod prompts;
pub mod provider;
pub mod selection;
pub mod session;
pub mod storage;
pub mod testing;
pub mod topic;
pub mod types;

pub use advisor::{Advisor, AdvisorEvents, AdvisorReply, NullEvents};
pub use catalog::CatalogStore;
pub use config::{get_env_or, get_required_env, load_env, AdvisorConfig};
pub use error::{LumiereError, Result};
pub use i18n::{message, Locale, MessageKey};
pub use locale::{client_language_preferences, LocaleController, LocaleInit};
pub use provider::ChatProvider;
pub use selection::SelectionStore;
pub use session::{ConversationLog, OUTBOUND_WINDOW};
pub use storage::{
    KeyValueStorage, MemoryStorage, KEY_CONVERSATION, KEY_RTL_MODE, KEY_SELECTED_PRODUCTS,
};
pub use topic::is_on_topic;
pub use types::{
    ChatMessage, ChatRequest, ChatRole, ConversationEntry, FunctionSpec, Product, ToolSpec,
};
