pub mod dom;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::theme::mapping::WidgetTheme;

pub const CLIENT_SRC: &str = "https://giscus.app/client.js";
pub const ORIGIN: &str = "https://giscus.app";

/// Creation-time configuration of the widget.
///
/// `attributes` are forwarded verbatim as `data-*` attributes of the
/// client script; their meaning belongs to giscus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WidgetConfig {
    pub client: String,
    pub attributes: BTreeMap<String, String>,
    pub theme: Option<WidgetTheme>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            client: CLIENT_SRC.into(),
            attributes: BTreeMap::new(),
            theme: None,
        }
    }
}

impl WidgetConfig {
    pub fn new(client: impl Into<String>, attributes: BTreeMap<String, String>) -> Self {
        Self {
            client: client.into(),
            attributes,
            theme: None,
        }
    }

    pub fn with_theme(mut self, theme: WidgetTheme) -> Self {
        self.theme = Some(theme);
        self
    }

    /// `(name, value)` pairs for the client script, `data-theme` last.
    ///
    /// The resolved theme overrides a `theme` entry in `attributes`.
    pub fn data_attributes(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .attributes
            .iter()
            .filter(|(name, _)| self.theme.is_none() || name.as_str() != "theme")
            .map(|(name, value)| (format!("data-{name}"), value.clone()))
            .collect();

        if let Some(theme) = &self.theme {
            pairs.push(("data-theme".into(), theme.to_string()));
        }

        pairs
    }
}

/// Runtime message understood by the giscus frame.
///
/// Serializes to `{ "giscus": { "setConfig": { "theme": .. } } }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WidgetMessage {
    giscus: Envelope,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    set_config: SetConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
struct SetConfig {
    theme: WidgetTheme,
}

impl WidgetMessage {
    pub fn set_theme(theme: WidgetTheme) -> Self {
        Self {
            giscus: Envelope {
                set_config: SetConfig { theme },
            },
        }
    }

    pub fn theme(&self) -> &WidgetTheme {
        &self.giscus.set_config.theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn set_theme_message_shape() {
        let message = WidgetMessage::set_theme("dark".into());

        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            serde_json::json!({ "giscus": { "setConfig": { "theme": "dark" } } })
        );
        assert_eq!(message.theme().as_str(), "dark");
    }

    #[test]
    fn data_attributes_carry_theme_last() {
        let attributes = BTreeMap::from([
            ("repo".to_owned(), "gastrodia/note-rust".to_owned()),
            ("theme".to_owned(), "light".to_owned()),
            ("lang".to_owned(), "zh-CN".to_owned()),
        ]);
        let config = WidgetConfig::new(CLIENT_SRC, attributes).with_theme("dark".into());

        assert_eq!(
            config.data_attributes(),
            vec![
                ("data-lang".to_owned(), "zh-CN".to_owned()),
                ("data-repo".to_owned(), "gastrodia/note-rust".to_owned()),
                ("data-theme".to_owned(), "dark".to_owned()),
            ]
        );
    }

    #[test]
    fn data_attributes_without_theme_are_verbatim() {
        let attributes = BTreeMap::from([("theme".to_owned(), "light".to_owned())]);
        let config = WidgetConfig::new(CLIENT_SRC, attributes);

        assert_eq!(
            config.data_attributes(),
            vec![("data-theme".to_owned(), "light".to_owned())]
        );
    }
}
