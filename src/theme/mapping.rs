use serde::{Deserialize, Serialize};

/// Widget value telling giscus to follow the system color preference.
pub const FALLBACK_THEME: &str = "preferred_color_scheme";

/// Theme identifier understood by the giscus widget.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetTheme(String);

impl WidgetTheme {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn fallback() -> Self {
        Self::new(FALLBACK_THEME)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for WidgetTheme {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WidgetTheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WidgetTheme {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One row of the precedence list.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ThemeEntry {
    pub host: String,
    pub widget: WidgetTheme,
}

/// Fixed table from host theme tokens to widget themes.
///
/// Entries keep the order they were declared in. A host token may appear
/// only once; later duplicates are ignored. Which entry wins for a given
/// token set is decided by the order of the tokens, see [`ThemeMapping::resolve`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThemeMapping {
    entries: Vec<ThemeEntry>,
    fallback: WidgetTheme,
}

impl Default for ThemeMapping {
    fn default() -> Self {
        Self::mdbook()
    }
}

impl ThemeMapping {
    pub fn new<I, H, W>(entries: I) -> Self
    where
        I: IntoIterator<Item = (H, W)>,
        H: Into<String>,
        W: Into<WidgetTheme>,
    {
        Self::from_entries(
            entries
                .into_iter()
                .map(|(host, widget)| ThemeEntry {
                    host: host.into(),
                    widget: widget.into(),
                }),
            WidgetTheme::fallback(),
        )
    }

    pub fn from_entries(entries: impl IntoIterator<Item = ThemeEntry>, fallback: WidgetTheme) -> Self {
        let mut unique: Vec<ThemeEntry> = Vec::new();
        for entry in entries {
            if unique.iter().all(|known| known.host != entry.host) {
                unique.push(entry);
            }
        }

        Self {
            entries: unique,
            fallback,
        }
    }

    /// The stock mdBook themes.
    pub fn mdbook() -> Self {
        Self::new([
            ("light", "light"),
            ("rust", "fro"),
            ("coal", "dark_high_contrast"),
            ("navy", "dark"),
            ("ayu", "noborder_dark"),
        ])
    }

    pub fn get(&self, host: &str) -> Option<&WidgetTheme> {
        self.entries
            .iter()
            .find(|entry| entry.host == host)
            .map(|entry| &entry.widget)
    }

    pub fn entries(&self) -> &[ThemeEntry] {
        &self.entries
    }

    pub fn fallback(&self) -> &WidgetTheme {
        &self.fallback
    }

    /// Widget theme of the first token that has an entry, or the fallback.
    ///
    /// An entry with an empty widget theme counts as a match that maps to
    /// the fallback; later tokens are not consulted.
    pub fn resolve<I, T>(&self, tokens: I) -> WidgetTheme
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        tokens
            .into_iter()
            .find_map(|token| self.get(token.as_ref()))
            .filter(|theme| !theme.as_str().is_empty())
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }
}
