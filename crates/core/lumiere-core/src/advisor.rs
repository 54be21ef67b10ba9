//! Advisor orchestration
//!
//! Wires the catalog, selection, conversation, and locale stores to the
//! chat provider. All user-triggered operations flow through here; the
//! rendering adapter only observes state and displays replies.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info};

use crate::catalog::CatalogStore;
use crate::i18n::{message, Locale, MessageKey};
use crate::locale::{LocaleController, LocaleInit};
use crate::prompts;
use crate::provider::ChatProvider;
use crate::selection::SelectionStore;
use crate::session::ConversationLog;
use crate::storage::KeyValueStorage;
use crate::topic::is_on_topic;
use crate::types::{ChatMessage, ChatRequest, ChatRole, ConversationEntry, Product, ToolSpec};
use crate::Result;

/// Output size bound for routine generation
const ROUTINE_MAX_TOKENS: u32 = 1200;
/// Output size bound for follow-up chat
const CHAT_MAX_TOKENS: u32 = 600;
/// Sampling temperature for every relay call
const TEMPERATURE: f32 = 0.7;

/// Observer of advisor activity, implemented by the rendering adapter.
/// `thinking_finished` fires exactly once per started call, on success,
/// failure, and cancellation alike.
pub trait AdvisorEvents: Send + Sync {
    /// A relay call started; show the busy indicator with this label
    fn thinking_started(&self, label: &str);
    /// The relay call ended; remove the busy indicator
    fn thinking_finished(&self);
}

/// No-op event sink
pub struct NullEvents;

impl AdvisorEvents for NullEvents {
    fn thinking_started(&self, _label: &str) {}
    fn thinking_finished(&self) {}
}

/// Outcome of an advisor operation, carrying the localized display text
#[derive(Debug, Clone, PartialEq)]
pub enum AdvisorReply {
    /// A freshly generated routine
    Routine(String),
    /// A chat answer from the relay
    Answer(String),
    /// Polite redirect for an off-topic message
    Redirect(String),
    /// Routine requested with an empty selection
    SelectionEmpty(String),
    /// The relay call failed; a generic localized apology
    Apology(String),
    /// Another relay call is still in flight. Exclusive borrows already
    /// serialize the entry points, so this is only produced when the
    /// advisor is driven through a shared handle (or a future is leaked
    /// mid-call); single-owner callers never see it.
    Busy(String),
}

impl AdvisorReply {
    /// The display text of the reply
    pub fn text(&self) -> &str {
        match self {
            AdvisorReply::Routine(s)
            | AdvisorReply::Answer(s)
            | AdvisorReply::Redirect(s)
            | AdvisorReply::SelectionEmpty(s)
            | AdvisorReply::Apology(s)
            | AdvisorReply::Busy(s) => s,
        }
    }
}

/// Releases the in-flight flag and fires `thinking_finished` exactly
/// once, even when the awaiting future is dropped.
struct ThinkingGuard {
    flag: Arc<AtomicBool>,
    events: Arc<dyn AdvisorEvents>,
}

impl ThinkingGuard {
    fn acquire(flag: &Arc<AtomicBool>, events: &Arc<dyn AdvisorEvents>, label: &str) -> Option<Self> {
        if flag.swap(true, Ordering::SeqCst) {
            return None;
        }
        events.thinking_started(label);
        Some(Self {
            flag: flag.clone(),
            events: events.clone(),
        })
    }
}

impl Drop for ThinkingGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
        self.events.thinking_finished();
    }
}

/// The advisor runtime: owning facade over the session's stores
pub struct Advisor {
    catalog: CatalogStore,
    selection: SelectionStore,
    conversation: ConversationLog,
    locale: LocaleController,
    provider: Arc<dyn ChatProvider>,
    events: Arc<dyn AdvisorEvents>,
    model: String,
    routine_context: Option<String>,
    in_flight: Arc<AtomicBool>,
}

impl Advisor {
    /// Assemble an advisor over the given backends. Call [`Advisor::init`]
    /// before use.
    pub fn new(
        catalog: CatalogStore,
        storage: Arc<dyn KeyValueStorage>,
        provider: Arc<dyn ChatProvider>,
        events: Arc<dyn AdvisorEvents>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            selection: SelectionStore::new(storage.clone()),
            conversation: ConversationLog::new(storage.clone()),
            locale: LocaleController::new(storage),
            provider,
            events,
            model: model.into(),
            routine_context: None,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Load the catalog and restore persisted state. Locale detection
    /// runs against `language_preferences` only when no explicit
    /// preference was persisted; an auto-detected activation appends a
    /// one-time notice to the conversation.
    ///
    /// A catalog load failure is returned so the caller can render a
    /// retry placeholder, but the advisor stays usable for chat.
    pub async fn init(&mut self, language_preferences: &[String]) -> Result<()> {
        self.conversation.hydrate().await?;
        let init = self.locale.init(language_preferences).await?;
        if let LocaleInit::AutoDetected(locale) = init {
            self.conversation
                .append(ConversationEntry::note(message(
                    locale,
                    MessageKey::AutoDetectNotice,
                )))
                .await?;
        }
        self.catalog.load().await?;
        self.selection.hydrate(&self.catalog).await?;
        info!(
            "Advisor ready: {} products, {} selected, {} history entries, locale {}",
            self.catalog.products().len(),
            self.selection.len(),
            self.conversation.len(),
            self.locale.locale().lang_tag()
        );
        Ok(())
    }

    /// Generate a routine from the current selection
    pub async fn generate_routine(&mut self) -> Result<AdvisorReply> {
        let locale = self.locale.locale();
        if self.selection.is_empty() {
            return Ok(AdvisorReply::SelectionEmpty(
                message(locale, MessageKey::SelectProductsFirst).to_string(),
            ));
        }
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::new(ChatRole::System, prompts::routine_system_prompt(locale)),
                ChatMessage::new(
                    ChatRole::User,
                    prompts::routine_user_prompt(self.selection.products()),
                ),
            ],
            max_tokens: ROUTINE_MAX_TOKENS,
            temperature: TEMPERATURE,
            tools: Some(vec![ToolSpec::web_search(
                "Search the web for current information about beauty products, \
                 routines, or skincare techniques",
            )]),
        };

        let Some(_guard) = ThinkingGuard::acquire(
            &self.in_flight,
            &self.events,
            message(locale, MessageKey::GeneratingRoutine),
        ) else {
            return Ok(AdvisorReply::Busy(
                message(locale, MessageKey::RequestInFlight).to_string(),
            ));
        };
        let result = self.provider.complete(request).await;
        drop(_guard);

        match result {
            Ok(routine) => {
                self.routine_context = Some(routine.clone());
                self.conversation
                    .append(ConversationEntry::note(prompts::routine_marker(
                        self.selection.products(),
                    )))
                    .await?;
                self.conversation
                    .append(ConversationEntry::assistant(routine.clone()))
                    .await?;
                Ok(AdvisorReply::Routine(routine))
            }
            Err(e) => {
                error!("Routine generation failed: {}", e);
                let apology = message(locale, MessageKey::RoutineApology).to_string();
                self.conversation
                    .append(ConversationEntry::assistant(apology.clone()))
                    .await?;
                Ok(AdvisorReply::Apology(apology))
            }
        }
    }

    /// Handle a free-text user message: record it, gate it through the
    /// topic guard, and forward it with the bounded history window.
    pub async fn handle_message(&mut self, text: &str) -> Result<AdvisorReply> {
        let locale = self.locale.locale();
        self.conversation
            .append(ConversationEntry::user(text))
            .await?;

        if !is_on_topic(text) {
            let redirect = message(locale, MessageKey::OffTopicRedirect).to_string();
            self.conversation
                .append(ConversationEntry::assistant(redirect.clone()))
                .await?;
            return Ok(AdvisorReply::Redirect(redirect));
        }

        let system = prompts::chat_system_prompt(
            locale,
            self.routine_context.as_deref(),
            self.selection.products(),
        );
        // Window is taken before the entry appended above, which goes
        // last as the fresh user message.
        let mut messages = vec![ChatMessage::new(ChatRole::System, system)];
        messages.extend(self.conversation.outbound_window(1));
        messages.push(ChatMessage::new(ChatRole::User, text));

        let request = ChatRequest {
            model: self.model.clone(),
            messages,
            max_tokens: CHAT_MAX_TOKENS,
            temperature: TEMPERATURE,
            tools: Some(vec![ToolSpec::web_search(
                "Search the web for current information",
            )]),
        };

        let Some(_guard) = ThinkingGuard::acquire(
            &self.in_flight,
            &self.events,
            message(locale, MessageKey::Thinking),
        ) else {
            return Ok(AdvisorReply::Busy(
                message(locale, MessageKey::RequestInFlight).to_string(),
            ));
        };
        let result = self.provider.complete(request).await;
        drop(_guard);

        match result {
            Ok(answer) => {
                self.conversation
                    .append(ConversationEntry::assistant(answer.clone()))
                    .await?;
                Ok(AdvisorReply::Answer(answer))
            }
            Err(e) => {
                error!("Chat reply failed: {}", e);
                let apology = message(locale, MessageKey::ChatApology).to_string();
                self.conversation
                    .append(ConversationEntry::assistant(apology.clone()))
                    .await?;
                Ok(AdvisorReply::Apology(apology))
            }
        }
    }

    /// Flip the display language; the new value is an explicit choice
    pub async fn toggle_locale(&mut self) -> Result<Locale> {
        self.locale.toggle().await
    }

    /// Toggle a product in the selection
    pub async fn toggle_product(&mut self, product_id: u32) -> Result<()> {
        self.selection.toggle(product_id, &self.catalog).await
    }

    /// Remove a product from the selection
    pub async fn remove_product(&mut self, product_id: u32) -> Result<()> {
        self.selection.remove(product_id).await
    }

    /// Clear the selection
    pub async fn clear_selection(&mut self) -> Result<()> {
        self.selection.clear().await
    }

    /// The filtered catalog view
    pub fn filter_products(&self, categories: &str, search_text: &str) -> Vec<&Product> {
        self.catalog.filter(categories, search_text)
    }

    /// Retry a failed catalog load
    pub async fn reload_catalog(&mut self) -> Result<()> {
        self.catalog.load().await?;
        self.selection.hydrate(&self.catalog).await
    }

    /// The catalog store
    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    /// The current selection
    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    /// The conversation log
    pub fn conversation(&self) -> &ConversationLog {
        &self.conversation
    }

    /// The active locale
    pub fn locale(&self) -> Locale {
        self.locale.locale()
    }

    /// The most recently generated routine, if any
    pub fn routine_context(&self) -> Option<&str> {
        self.routine_context.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::CountingEvents;

    #[test]
    fn guard_refuses_a_second_acquire_while_held() {
        let flag = Arc::new(AtomicBool::new(false));
        let events: Arc<dyn AdvisorEvents> = Arc::new(CountingEvents::new());
        let first = ThinkingGuard::acquire(&flag, &events, "working");
        assert!(first.is_some());
        assert!(ThinkingGuard::acquire(&flag, &events, "working").is_none());
        drop(first);
        assert!(ThinkingGuard::acquire(&flag, &events, "working").is_some());
    }

    #[test]
    fn guard_drop_clears_the_flag_and_fires_finished_once() {
        let flag = Arc::new(AtomicBool::new(false));
        let counting = Arc::new(CountingEvents::new());
        let events: Arc<dyn AdvisorEvents> = counting.clone();
        let guard = ThinkingGuard::acquire(&flag, &events, "working");
        assert_eq!(counting.started(), 1);
        assert_eq!(counting.finished(), 0);
        drop(guard);
        assert_eq!(counting.started(), 1);
        assert_eq!(counting.finished(), 1);
        assert!(!flag.load(Ordering::SeqCst));
    }
}
