//! Reply language selection and the localized reply texts.
//!
//! Three independent heuristics pick a language:
//! - [`Language::from_marker`]: the message contains the Arabic word for "Arabic".
//!   Used for every gate reply and the generic error.
//! - [`Language::from_locale`]: the interaction locale is exactly `"ar"`. Used by `setup`.
//! - [`Language::detect`]: statistical detection over the message text.

use whatlang::Lang;

/// Literal that switches gate replies to Arabic.
pub const ARABIC_MARKER: &str = "عربي";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Arabic,
}

impl Language {
    pub fn from_marker(text: &str) -> Self {
        if text.contains(ARABIC_MARKER) {
            Language::Arabic
        } else {
            Language::English
        }
    }

    pub fn from_locale(locale: &str) -> Self {
        if locale == "ar" {
            Language::Arabic
        } else {
            Language::English
        }
    }

    pub fn detect(text: &str) -> Self {
        match whatlang::detect(text) {
            Some(info) if info.lang() == Lang::Ara => Language::Arabic,
            _ => Language::English,
        }
    }
}

/// Every user-facing text the bot sends on its own behalf.
#[derive(Debug, Clone, Copy)]
pub enum Notice<'a> {
    SetupRequired,
    WrongChannel,
    PanelUrl(&'a str),
    ContentRemoved,
    GenericError,
    SetupDenied,
    SetupOutsideServer,
    SetupComplete(&'a str),
}

impl Notice<'_> {
    pub fn render(&self, lang: Language) -> String {
        use Language::{Arabic, English};

        match (self, lang) {
            (Notice::SetupRequired, English) => {
                "Please set up the bot first using /setup command".to_string()
            }
            (Notice::SetupRequired, Arabic) => {
                "يرجى إعداد البوت أولاً باستخدام الأمر /setup".to_string()
            }
            (Notice::WrongChannel, English) => "Please use the designated bot channel.".to_string(),
            (Notice::WrongChannel, Arabic) => "يرجى استخدام القناة المحددة للبوت.".to_string(),
            (Notice::PanelUrl(url), English) => format!("Panel URL: {}", url),
            (Notice::PanelUrl(url), Arabic) => format!("رابط لوحة التحكم: {}", url),
            (Notice::ContentRemoved, English) => {
                "Your message was deleted because it contains inappropriate content.".to_string()
            }
            (Notice::ContentRemoved, Arabic) => {
                "تم حذف رسالتك لأنها تحتوي على محتوى غير لائق.".to_string()
            }
            (Notice::GenericError, English) => {
                "Sorry, there was an error processing your request. Please try again.".to_string()
            }
            (Notice::GenericError, Arabic) => {
                "عذراً، حدث خطأ أثناء معالجة طلبك. يرجى المحاولة مرة أخرى.".to_string()
            }
            (Notice::SetupDenied, English) => {
                "Sorry, you need to be an administrator to setup the bot.".to_string()
            }
            (Notice::SetupDenied, Arabic) => {
                "عذراً، يجب أن تكون مسؤولاً للقيام بإعداد البوت.".to_string()
            }
            (Notice::SetupOutsideServer, English) => {
                "The bot can only be set up inside a server.".to_string()
            }
            (Notice::SetupOutsideServer, Arabic) => {
                "يمكن إعداد البوت داخل الخادم فقط.".to_string()
            }
            (Notice::SetupComplete(url), English) => format!(
                "Bot setup complete! You can now ask questions about Minecraft server issues.\nPanel URL: {}",
                url
            ),
            (Notice::SetupComplete(url), Arabic) => format!(
                "تم إعداد البوت بنجاح! يمكنك الآن طرح أسئلة حول مشاكل خادم ماينكرافت.\nرابط لوحة التحكم: {}",
                url
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_selects_arabic() {
        assert_eq!(Language::from_marker("hello عربي please"), Language::Arabic);
        assert_eq!(Language::from_marker("hello"), Language::English);
        // Arabic text without the marker word still gets English gate replies.
        assert_eq!(Language::from_marker("مرحبا"), Language::English);
    }

    #[test]
    fn test_locale_must_match_exactly() {
        assert_eq!(Language::from_locale("ar"), Language::Arabic);
        assert_eq!(Language::from_locale("en-US"), Language::English);
        assert_eq!(Language::from_locale("ar-SA"), Language::English);
    }

    #[test]
    fn test_detect_arabic_sentence() {
        let text = "مرحبا، كيف يمكنني إعادة تشغيل خادم ماينكرافت الخاص بي بعد حدوث خطأ في لوحة التحكم؟";
        assert_eq!(Language::detect(text), Language::Arabic);
    }

    #[test]
    fn test_detect_english_sentence() {
        let text = "How do I restart my Minecraft server after it crashed during the night?";
        assert_eq!(Language::detect(text), Language::English);
        assert_eq!(Language::detect(""), Language::English);
    }

    #[test]
    fn test_panel_url_is_embedded() {
        let url = "https://panel.example.com";
        assert_eq!(
            Notice::PanelUrl(url).render(Language::English),
            "Panel URL: https://panel.example.com"
        );
        assert!(Notice::PanelUrl(url).render(Language::Arabic).ends_with(url));
        assert!(Notice::SetupComplete(url).render(Language::English).contains(url));
        assert!(Notice::SetupComplete(url).render(Language::Arabic).contains(url));
    }
}
