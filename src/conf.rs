// Configuration definitions, functions and tests
//

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::giscus::WidgetConfig;
use crate::theme::mapping::{ThemeEntry, ThemeMapping, WidgetTheme};

static DEFAULT_CONF: &str = include_str!("../conf/default.yaml");

/// Id of the optional `<script type="application/json">` element that
/// overrides the compiled-in defaults.
pub static OVERRIDE_ELEMENT_ID: &str = "book-frontend-conf";

#[derive(Deserialize, Debug, Clone)]
pub struct Conf {
    pub giscus: GiscusConf,
    pub theme: ThemeConf,
    pub gallery: GalleryConf,
    pub log: Log,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GiscusConf {
    pub client: String,
    pub origin: String,
    pub mount: String,
    pub frame: String,
    pub attributes: BTreeMap<String, String>,
}

impl GiscusConf {
    pub fn widget_config(&self) -> WidgetConfig {
        WidgetConfig::new(&self.client, self.attributes.clone())
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct ThemeConf {
    pub fallback: WidgetTheme,
    pub precedence: Vec<ThemeEntry>,
}

impl ThemeConf {
    pub fn mapping(&self) -> ThemeMapping {
        ThemeMapping::from_entries(self.precedence.iter().cloned(), self.fallback.clone())
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct GalleryConf {
    pub enabled: bool,
    pub selector: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Log {
    pub level: String,
}

impl Log {
    pub fn level(&self) -> Result<tracing::Level> {
        self.level
            .parse()
            .map_err(|_| Error::Level(self.level.clone()))
    }
}

impl Conf {
    /// Compiled-in defaults, overridden by `page_override` JSON if given.
    pub fn derive(page_override: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder().add_source(
            config::File::from_str(DEFAULT_CONF, config::FileFormat::Yaml).required(true),
        );

        if let Some(json) = page_override {
            builder = builder.add_source(config::File::from_str(json, config::FileFormat::Json));
        }

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Reads the override element from `document`, then derives.
    pub fn from_page(document: &web_sys::Document) -> Result<Self> {
        let page_override = document
            .get_element_by_id(OVERRIDE_ELEMENT_ID)
            .and_then(|element| element.text_content())
            .filter(|text| !text.trim().is_empty());

        Self::derive(page_override.as_deref())
    }
}
