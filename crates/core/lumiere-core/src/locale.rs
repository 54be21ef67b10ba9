//! Localization controller
//!
//! Owns the single locale flag. A persisted preference always wins; when
//! none exists the controller runs auto-detection once against the
//! client's ordered language preferences. Only an explicit toggle is
//! persisted - an auto-detected value must stay re-detectable next
//! session, never silently promoted to a user choice.

use std::sync::Arc;
use tracing::{info, warn};

use crate::i18n::Locale;
use crate::storage::{KeyValueStorage, KEY_RTL_MODE};
use crate::Result;

/// Primary language subtags written right-to-left
const RTL_SUBTAGS: [&str; 8] = ["ar", "he", "fa", "ur", "ku", "ps", "sd", "ug"];

/// Outcome of controller initialization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaleInit {
    /// A persisted explicit preference was restored
    Persisted(Locale),
    /// No preference existed; auto-detection chose right-to-left
    AutoDetected(Locale),
    /// No preference and no right-to-left hint; left-to-right default
    Default(Locale),
}

impl LocaleInit {
    /// The locale chosen by initialization
    pub fn locale(self) -> Locale {
        match self {
            LocaleInit::Persisted(l) | LocaleInit::AutoDetected(l) | LocaleInit::Default(l) => l,
        }
    }
}

/// Holder of the active locale flag
pub struct LocaleController {
    storage: Arc<dyn KeyValueStorage>,
    locale: Locale,
}

impl LocaleController {
    /// Create a controller in the left-to-right default
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            locale: Locale::En,
        }
    }

    /// Initialize from the persisted preference if one exists, otherwise
    /// auto-detect once from the given ordered language preferences.
    /// The auto-detected value is intentionally not persisted.
    pub async fn init(&mut self, language_preferences: &[String]) -> Result<LocaleInit> {
        match self.storage.get(KEY_RTL_MODE).await? {
            Some(raw) => match raw.as_str() {
                "true" => {
                    self.locale = Locale::Ar;
                    Ok(LocaleInit::Persisted(Locale::Ar))
                }
                "false" => {
                    self.locale = Locale::En;
                    Ok(LocaleInit::Persisted(Locale::En))
                }
                other => {
                    warn!("Discarding corrupt locale preference '{}'", other);
                    self.storage.remove(KEY_RTL_MODE).await?;
                    self.auto_detect(language_preferences)
                }
            },
            None => self.auto_detect(language_preferences),
        }
    }

    fn auto_detect(&mut self, language_preferences: &[String]) -> Result<LocaleInit> {
        for tag in language_preferences {
            let subtag = primary_subtag(tag);
            if RTL_SUBTAGS.contains(&subtag.as_str()) {
                info!("Auto-detected right-to-left locale from '{}'", tag);
                self.locale = Locale::Ar;
                return Ok(LocaleInit::AutoDetected(Locale::Ar));
            }
        }
        self.locale = Locale::En;
        Ok(LocaleInit::Default(Locale::En))
    }

    /// Flip the locale and persist the new value as an explicit choice
    pub async fn toggle(&mut self) -> Result<Locale> {
        self.locale = self.locale.flipped();
        self.storage
            .put(KEY_RTL_MODE, if self.locale.is_rtl() { "true" } else { "false" })
            .await?;
        Ok(self.locale)
    }

    /// The active locale
    pub fn locale(&self) -> Locale {
        self.locale
    }
}

/// Ordered client language preferences from the process environment:
/// `LANGUAGE` (colon-separated) first, then `LC_ALL`, `LC_MESSAGES`,
/// `LANG`.
pub fn client_language_preferences() -> Vec<String> {
    let mut prefs = Vec::new();
    if let Ok(language) = std::env::var("LANGUAGE") {
        prefs.extend(language.split(':').filter(|s| !s.is_empty()).map(String::from));
    }
    for var in ["LC_ALL", "LC_MESSAGES", "LANG"] {
        if let Ok(value) = std::env::var(var) {
            if !value.is_empty() {
                prefs.push(value);
            }
        }
    }
    prefs
}

/// Primary language subtag of a locale tag: "ar_SA.UTF-8" -> "ar",
/// "he-IL" -> "he". The "C" and "POSIX" locales yield themselves and
/// never match an RTL subtag.
fn primary_subtag(tag: &str) -> String {
    tag.split(['_', '-', '.', '@'])
        .next()
        .unwrap_or("")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn primary_subtag_strips_region_and_encoding() {
        assert_eq!(primary_subtag("ar_SA.UTF-8"), "ar");
        assert_eq!(primary_subtag("he-IL"), "he");
        assert_eq!(primary_subtag("en_US"), "en");
        assert_eq!(primary_subtag("C"), "c");
    }

    #[tokio::test]
    async fn persisted_preference_wins_over_detection() {
        let storage = Arc::new(MemoryStorage::new());
        storage.seed(KEY_RTL_MODE, "false");
        let mut ctl = LocaleController::new(storage);
        let init = ctl.init(&["ar_SA.UTF-8".to_string()]).await.unwrap();
        assert_eq!(init, LocaleInit::Persisted(Locale::En));
        assert_eq!(ctl.locale(), Locale::En);
    }

    #[tokio::test]
    async fn auto_detection_activates_rtl_without_persisting() {
        let storage = Arc::new(MemoryStorage::new());
        let mut ctl = LocaleController::new(storage.clone());
        let init = ctl.init(&["ar_SA.UTF-8".to_string()]).await.unwrap();
        assert_eq!(init, LocaleInit::AutoDetected(Locale::Ar));
        // Not promoted to an explicit choice: next session re-detects.
        assert_eq!(storage.get(KEY_RTL_MODE).await.unwrap(), None);
    }

    #[tokio::test]
    async fn no_hint_defaults_to_ltr() {
        let mut ctl = LocaleController::new(Arc::new(MemoryStorage::new()));
        let init = ctl
            .init(&["en_US.UTF-8".to_string(), "C".to_string()])
            .await
            .unwrap();
        assert_eq!(init, LocaleInit::Default(Locale::En));
    }

    #[tokio::test]
    async fn toggle_persists_and_double_toggle_restores() {
        let storage = Arc::new(MemoryStorage::new());
        let mut ctl = LocaleController::new(storage.clone());
        ctl.init(&[]).await.unwrap();

        assert_eq!(ctl.toggle().await.unwrap(), Locale::Ar);
        assert_eq!(storage.get(KEY_RTL_MODE).await.unwrap().as_deref(), Some("true"));

        assert_eq!(ctl.toggle().await.unwrap(), Locale::En);
        assert_eq!(storage.get(KEY_RTL_MODE).await.unwrap().as_deref(), Some("false"));
    }

    #[tokio::test]
    async fn corrupt_preference_is_cleared_and_redetected() {
        let storage = Arc::new(MemoryStorage::new());
        storage.seed(KEY_RTL_MODE, "maybe");
        let mut ctl = LocaleController::new(storage.clone());
        let init = ctl.init(&["fa_IR".to_string()]).await.unwrap();
        assert_eq!(init, LocaleInit::AutoDetected(Locale::Ar));
        assert_eq!(storage.get(KEY_RTL_MODE).await.unwrap(), None);
    }
}
