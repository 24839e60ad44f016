//! Message keys and the localization seam.
//!
//! The engine only ever asks for a [`MessageKey`]; hosts that already have a
//! string catalog implement [`Localizer`] themselves. [`BundledLocalizer`]
//! covers a handful of languages for the CLI and for hosts without one.

/// Text the engine may ask the host to display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    UpdateAvailableTitle,
    UpdateAvailableMessage,
    UpdateButton,
    NextTimeButton,
    SkipButton,
}

impl MessageKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKey::UpdateAvailableTitle => "update_available_title",
            MessageKey::UpdateAvailableMessage => "update_available_message",
            MessageKey::UpdateButton => "update_button",
            MessageKey::NextTimeButton => "next_time_button",
            MessageKey::SkipButton => "skip_button",
        }
    }
}

/// Resolves a message key to a display template
pub trait Localizer: Send + Sync {
    /// Template for `key`; may contain `{app}` and `{version}` placeholders
    fn text(&self, key: MessageKey, locale: Option<&str>) -> String;
}

/// Substitute the app name and remote version into a template
pub fn fill_template(template: &str, app_name: &str, version: &str) -> String {
    template
        .replace("{app}", app_name)
        .replace("{version}", version)
}

/// Built-in catalog with English fallback
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledLocalizer;

impl BundledLocalizer {
    fn english(key: MessageKey) -> &'static str {
        match key {
            MessageKey::UpdateAvailableTitle => "Update Available",
            MessageKey::UpdateAvailableMessage => {
                "A new version of {app} is available. Please update to version {version} now."
            }
            MessageKey::UpdateButton => "Update",
            MessageKey::NextTimeButton => "Next time",
            MessageKey::SkipButton => "Skip this version",
        }
    }

    fn lookup(language: &str, key: MessageKey) -> Option<&'static str> {
        let text = match (language, key) {
            ("de", MessageKey::UpdateAvailableTitle) => "Update verfügbar",
            ("de", MessageKey::UpdateAvailableMessage) => {
                "Eine neue Version von {app} ist verfügbar. Bitte aktualisiere jetzt auf Version {version}."
            }
            ("de", MessageKey::UpdateButton) => "Aktualisieren",
            ("de", MessageKey::NextTimeButton) => "Später",
            ("de", MessageKey::SkipButton) => "Diese Version überspringen",
            ("es", MessageKey::UpdateAvailableTitle) => "Actualización disponible",
            ("es", MessageKey::UpdateAvailableMessage) => {
                "Hay una nueva versión de {app} disponible. Por favor, actualiza a la versión {version} ahora."
            }
            ("es", MessageKey::UpdateButton) => "Actualizar",
            ("es", MessageKey::NextTimeButton) => "La próxima vez",
            ("es", MessageKey::SkipButton) => "Saltar esta versión",
            ("fr", MessageKey::UpdateAvailableTitle) => "Mise à jour disponible",
            ("fr", MessageKey::UpdateAvailableMessage) => {
                "Une nouvelle version de {app} est disponible. Veuillez effectuer la mise à jour vers la version {version} dès maintenant."
            }
            ("fr", MessageKey::UpdateButton) => "Mettre à jour",
            ("fr", MessageKey::NextTimeButton) => "La prochaine fois",
            ("fr", MessageKey::SkipButton) => "Ignorer cette version",
            ("ja", MessageKey::UpdateAvailableTitle) => "アップデートのお知らせ",
            ("ja", MessageKey::UpdateAvailableMessage) => {
                "{app} の新しいバージョンがあります。バージョン {version} にアップデートしてください。"
            }
            ("ja", MessageKey::UpdateButton) => "アップデート",
            ("ja", MessageKey::NextTimeButton) => "次回",
            ("ja", MessageKey::SkipButton) => "このバージョンをスキップ",
            _ => return None,
        };
        Some(text)
    }
}

impl Localizer for BundledLocalizer {
    fn text(&self, key: MessageKey, locale: Option<&str>) -> String {
        // "de-AT" and "de_AT" both resolve to "de"
        let language = locale
            .and_then(|l| l.split(['-', '_']).next())
            .map(|l| l.to_ascii_lowercase());

        language
            .as_deref()
            .and_then(|l| Self::lookup(l, key))
            .unwrap_or_else(|| Self::english(key))
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, "Update")]
    #[case(Some("en"), "Update")]
    #[case(Some("de"), "Aktualisieren")]
    #[case(Some("de-AT"), "Aktualisieren")]
    #[case(Some("ES_mx"), "Actualizar")]
    #[case(Some("ja"), "アップデート")]
    #[case(Some("xx"), "Update")]
    fn bundled_localizer_resolves_language_with_english_fallback(
        #[case] locale: Option<&str>,
        #[case] expected: &str,
    ) {
        assert_eq!(BundledLocalizer.text(MessageKey::UpdateButton, locale), expected);
    }

    #[test]
    fn fill_template_substitutes_app_and_version() {
        let template = BundledLocalizer.text(MessageKey::UpdateAvailableMessage, None);

        assert_eq!(
            fill_template(&template, "Notes", "3.0.0.0"),
            "A new version of Notes is available. Please update to version 3.0.0.0 now."
        );
    }
}
