//! Localized user-facing strings
//!
//! Every string rendered to the user is looked up here by
//! `(Locale, MessageKey)` so the two language paths cannot drift apart.
//! Prompt text sent upstream lives in `prompts`, not here.

use serde::{Deserialize, Serialize};

/// Active display language and reading direction. Exactly one value is
/// active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locale {
    /// English, left-to-right
    En,
    /// Arabic, right-to-left
    Ar,
}

impl Locale {
    /// The opposite locale (used by the language toggle)
    pub fn flipped(self) -> Self {
        match self {
            Locale::En => Locale::Ar,
            Locale::Ar => Locale::En,
        }
    }

    /// True for right-to-left reading direction
    pub fn is_rtl(self) -> bool {
        matches!(self, Locale::Ar)
    }

    /// BCP 47 language tag
    pub fn lang_tag(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ar => "ar",
        }
    }

    /// Reading-direction attribute value
    pub fn direction(self) -> &'static str {
        if self.is_rtl() {
            "rtl"
        } else {
            "ltr"
        }
    }
}

/// Keys for all locale-dependent display strings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKey {
    /// Application title
    Title,
    /// Assistant display name
    AssistantName,
    /// User display name
    UserName,
    /// Startup greeting
    Welcome,
    /// Label on the language toggle (names the *other* language)
    LanguageToggle,
    /// Placeholder before a category is chosen
    SelectCategory,
    /// Placeholder when a filter matches nothing
    NoProductsFound,
    /// Placeholder when the selection is empty
    EmptySelection,
    /// Shown when routine generation is requested with no selection
    SelectProductsFirst,
    /// Busy indicator while a routine is generated
    GeneratingRoutine,
    /// Busy indicator while a chat reply is awaited
    Thinking,
    /// Refusal while another relay call is in flight
    RequestInFlight,
    /// Apology when routine generation fails
    RoutineApology,
    /// Apology when a chat reply fails
    ChatApology,
    /// Polite redirect for off-topic questions
    OffTopicRedirect,
    /// One-time note after locale auto-detection
    AutoDetectNotice,
    /// Placeholder when the catalog cannot be loaded
    CatalogUnavailable,
    /// Fallback line when a console command fails for any other reason
    CommandFailed,
}

/// Look up the display string for a key in the given locale
pub fn message(locale: Locale, key: MessageKey) -> &'static str {
    use MessageKey::*;
    match (locale, key) {
        (Locale::En, Title) => "Lumiere | Smart Routine & Product Advisor",
        (Locale::Ar, Title) => "لوميير | مُنشئ الروتين الذكي ومستشار المنتجات",

        (Locale::En, AssistantName) => "Lumiere Assistant",
        (Locale::Ar, AssistantName) => "مساعد لوميير",

        (Locale::En, UserName) => "You",
        (Locale::Ar, UserName) => "أنت",

        (Locale::En, Welcome) => {
            "Hi! I'm your Lumiere beauty assistant with access to current beauty \
             trends and product information. Select some products and generate a \
             routine to get started, or ask me any beauty-related questions!"
        }
        (Locale::Ar, Welcome) => {
            "مرحباً! أنا مساعد لوميير للجمال، ولدي اطلاع على أحدث صيحات الجمال \
             ومعلومات المنتجات. اختر بعض المنتجات وأنشئ روتيناً للبدء، أو اسألني \
             أي سؤال متعلق بالجمال!"
        }

        (Locale::En, LanguageToggle) => "عربي",
        (Locale::Ar, LanguageToggle) => "English",

        (Locale::En, SelectCategory) => "Select a category to view products",
        (Locale::Ar, SelectCategory) => "اختر فئة لعرض المنتجات",

        (Locale::En, NoProductsFound) => "No products found matching your criteria.",
        (Locale::Ar, NoProductsFound) => "لم يتم العثور على منتجات مطابقة لبحثك.",

        (Locale::En, EmptySelection) => {
            "No products selected yet. Pick products to add them to your routine."
        }
        (Locale::Ar, EmptySelection) => {
            "لم يتم اختيار أي منتجات بعد. اختر منتجات لإضافتها إلى روتينك."
        }

        (Locale::En, SelectProductsFirst) => {
            "Please select some products first to generate a routine!"
        }
        (Locale::Ar, SelectProductsFirst) => "يرجى اختيار بعض المنتجات أولاً لإنشاء روتين!",

        (Locale::En, GeneratingRoutine) => {
            "Generating your personalized routine with current beauty insights... ✨"
        }
        (Locale::Ar, GeneratingRoutine) => "جارٍ إنشاء روتينك الشخصي بأحدث معلومات الجمال... ✨",

        (Locale::En, Thinking) => "Thinking...",
        (Locale::Ar, Thinking) => "جارٍ التفكير...",

        (Locale::En, RequestInFlight) => {
            "One moment - I'm still working on your previous request."
        }
        (Locale::Ar, RequestInFlight) => "لحظة من فضلك - ما زلت أعمل على طلبك السابق.",

        (Locale::En, RoutineApology) => {
            "Sorry, I couldn't generate a routine right now. Please check your \
             connection and try again."
        }
        (Locale::Ar, RoutineApology) => {
            "عذراً، لم أستطع إنشاء روتين الآن. يرجى التحقق من اتصالك والمحاولة مرة أخرى."
        }

        (Locale::En, ChatApology) => {
            "Sorry, I'm having trouble responding right now. Please check your \
             connection and try again."
        }
        (Locale::Ar, ChatApology) => {
            "عذراً، أواجه صعوبة في الرد الآن. يرجى التحقق من اتصالك والمحاولة مرة أخرى."
        }

        (Locale::En, OffTopicRedirect) => {
            "I'm here to help with beauty, skincare, haircare, makeup and fragrance \
             questions. Is there anything beauty-related I can help you with?"
        }
        (Locale::Ar, OffTopicRedirect) => {
            "أنا هنا للمساعدة في أسئلة الجمال والعناية بالبشرة والشعر والمكياج \
             والعطور. هل هناك أي شيء متعلق بالجمال يمكنني مساعدتك فيه؟"
        }

        (Locale::En, AutoDetectNotice) => {
            "Right-to-left display enabled based on your language settings. Use the \
             language toggle to switch back at any time."
        }
        (Locale::Ar, AutoDetectNotice) => {
            "تم تفعيل العرض من اليمين إلى اليسار بناءً على إعدادات لغتك. استخدم زر \
             اللغة للتبديل في أي وقت."
        }

        (Locale::En, CatalogUnavailable) => {
            "Couldn't load the product catalog. Please try again."
        }
        (Locale::Ar, CatalogUnavailable) => "تعذر تحميل كتالوج المنتجات. يرجى المحاولة مرة أخرى.",

        (Locale::En, CommandFailed) => "Something went wrong. Please try again.",
        (Locale::Ar, CommandFailed) => "حدث خطأ ما. يرجى المحاولة مرة أخرى.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flipping_twice_restores_the_locale() {
        assert_eq!(Locale::En.flipped().flipped(), Locale::En);
        assert_eq!(Locale::Ar.flipped(), Locale::En);
    }

    #[test]
    fn direction_tracks_locale() {
        assert_eq!(Locale::En.direction(), "ltr");
        assert_eq!(Locale::Ar.direction(), "rtl");
        assert!(Locale::Ar.is_rtl());
    }

    #[test]
    fn toggle_label_names_the_other_language() {
        assert_eq!(message(Locale::En, MessageKey::LanguageToggle), "عربي");
        assert_eq!(message(Locale::Ar, MessageKey::LanguageToggle), "English");
    }

    #[test]
    fn every_key_has_both_translations() {
        use MessageKey::*;
        let keys = [
            Title,
            AssistantName,
            UserName,
            Welcome,
            LanguageToggle,
            SelectCategory,
            NoProductsFound,
            EmptySelection,
            SelectProductsFirst,
            GeneratingRoutine,
            Thinking,
            RequestInFlight,
            RoutineApology,
            ChatApology,
            OffTopicRedirect,
            AutoDetectNotice,
            CatalogUnavailable,
            CommandFailed,
        ];
        for key in keys {
            assert!(!message(Locale::En, key).is_empty());
            assert!(!message(Locale::Ar, key).is_empty());
            assert_ne!(message(Locale::En, key), message(Locale::Ar, key));
        }
    }
}
