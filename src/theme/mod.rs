pub mod bridge;
pub mod mapping;

pub mod prelude {
    pub use super::bridge::{Delivery, ThemeBridge, ThemeSignal, TokenSource, WidgetFrame, WidgetHost};
    pub use super::mapping::{ThemeEntry, ThemeMapping, WidgetTheme, FALLBACK_THEME};
}
