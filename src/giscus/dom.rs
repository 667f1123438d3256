use gloo_utils::format::JsValueSerdeExt;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlIFrameElement, HtmlScriptElement, Window};

use super::{WidgetConfig, WidgetMessage};
use crate::error::{Error, Result, Target};
use crate::theme::bridge::{WidgetFrame, WidgetHost};

/// giscus living in the current document.
#[derive(Clone, Debug)]
pub struct GiscusHost {
    document: Document,
    mount: String,
    frame: String,
    origin: String,
}

impl GiscusHost {
    pub fn new(
        document: Document,
        mount: impl Into<String>,
        frame: impl Into<String>,
        origin: impl Into<String>,
    ) -> Self {
        Self {
            document,
            mount: mount.into(),
            frame: frame.into(),
            origin: origin.into(),
        }
    }

    fn client_script(&self, config: &WidgetConfig) -> Result<HtmlScriptElement> {
        let script = self
            .document
            .create_element("script")?
            .dyn_into::<HtmlScriptElement>()
            .map_err(|_| Error::Js("created element is not a script".into()))?;

        script.set_type("text/javascript");
        script.set_src(&config.client);
        script.set_async(true);
        script.set_cross_origin(Some("anonymous"));

        for (name, value) in config.data_attributes() {
            script.set_attribute(&name, &value)?;
        }

        Ok(script)
    }
}

impl WidgetHost for GiscusHost {
    type Frame = GiscusFrame;

    fn mount(&self, config: &WidgetConfig) -> Result<()> {
        let mount = self
            .document
            .query_selector(&self.mount)?
            .ok_or_else(|| Error::MissingTarget(Target::MountPoint(self.mount.clone())))?;

        let script = self.client_script(config)?;
        mount.append_child(&script)?;
        Ok(())
    }

    fn frame(&self) -> Option<GiscusFrame> {
        let frame = self
            .document
            .query_selector(&self.frame)
            .ok()
            .flatten()?
            .dyn_into::<HtmlIFrameElement>()
            .ok()?;

        Some(GiscusFrame {
            window: frame.content_window()?,
            origin: self.origin.clone(),
        })
    }
}

pub struct GiscusFrame {
    window: Window,
    origin: String,
}

impl WidgetFrame for GiscusFrame {
    fn post(&self, message: &WidgetMessage) -> Result<()> {
        let message = <JsValue as JsValueSerdeExt>::from_serde(message)?;
        self.window.post_message(&message, &self.origin)?;
        Ok(())
    }
}
