use anyhow::Context;
use gloo_console as console;
use tracing::Level;
use web_sys::Document;

use crate::conf::Conf;
use crate::dom::{ClassObserver, DocumentRoot};
use crate::error::Error;
use crate::gallery::{self, GalleryListeners};
use crate::giscus::dom::GiscusHost;
use crate::theme::prelude::*;
use crate::trace::TracingSubscriber;

pub type Bridge = ThemeBridge<DocumentRoot, GiscusHost>;

/// Everything installed on the page; dropping it detaches the listeners.
pub struct Page {
    pub bridge: Option<Bridge>,
    pub observer: Option<ClassObserver>,
    pub gallery: Option<GalleryListeners>,
}

impl Page {
    /// Leaves the listeners attached until the page unloads.
    pub fn forget(self) {
        if let Some(observer) = self.observer {
            observer.forget();
        }
        if let Some(gallery) = self.gallery {
            gallery.forget();
        }
    }
}

/// Runs once after the window `load` event.
pub fn on_load() -> anyhow::Result<Page> {
    let document = crate::dom::document().context("page without a document")?;
    let conf = Conf::from_page(&document).context("failed to read configuration")?;

    if let Err(e) = TracingSubscriber::new()
        .crate_level(log_level(&conf))
        .set_global_default()
    {
        console::warn!(format!("logging not installed: {e}"));
    }

    Ok(install(&document, &conf))
}

/// Configured level, or INFO when the setting is unusable.
pub fn log_level(conf: &Conf) -> Level {
    conf.log.level().unwrap_or_else(|e| {
        console::warn!(format!("{e}, logging at info"));
        Level::INFO
    })
}

/// Sets up each feature on its own; a failing one is logged and skipped.
pub fn install(document: &Document, conf: &Conf) -> Page {
    let (bridge, observer) = match DocumentRoot::locate(document) {
        Ok(root) => {
            let bridge = embed_comments(document, conf, root.clone());
            let observer = match bridge.observe(&root) {
                Ok(observer) => Some(observer),
                Err(e) => {
                    tracing::warn!(error = %e, "theme changes will not reach the widget");
                    None
                }
            };
            (Some(bridge), observer)
        }
        Err(e) => {
            tracing::warn!(error = %e, "comments widget skipped");
            (None, None)
        }
    };

    let gallery = if conf.gallery.enabled {
        match gallery::wire(document, &conf.gallery.selector) {
            Ok(listeners) => Some(listeners),
            Err(e) => {
                tracing::warn!(error = %e, "image gallery skipped");
                None
            }
        }
    } else {
        None
    };

    Page {
        bridge,
        observer,
        gallery,
    }
}

fn embed_comments(document: &Document, conf: &Conf, root: DocumentRoot) -> Bridge {
    let host = GiscusHost::new(
        document.clone(),
        &conf.giscus.mount,
        &conf.giscus.frame,
        &conf.giscus.origin,
    );
    let bridge = ThemeBridge::new(conf.theme.mapping(), root, host);

    match bridge.initialize(conf.giscus.widget_config()) {
        Ok(_) => {}
        Err(e @ Error::MissingTarget(_)) => {
            tracing::warn!(error = %e, "comments widget skipped")
        }
        Err(e) => tracing::error!(error = %e, "failed to embed comments widget"),
    }

    bridge
}
