// Lightbox over the book's images, backed by the BigPicture script the page loads.

use std::rc::Rc;

use gloo_events::EventListener;
use gloo_utils::format::JsValueSerdeExt;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlImageElement};

use crate::error::Result;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_name = BigPicture)]
    fn big_picture(options: &JsValue) -> std::result::Result<JsValue, JsValue>;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GalleryEntry {
    pub src: String,
    pub caption: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Gallery {
    entries: Vec<GalleryEntry>,
}

impl Gallery {
    pub fn new<I, S, C>(images: I) -> Self
    where
        I: IntoIterator<Item = (S, C)>,
        S: Into<String>,
        C: Into<String>,
    {
        Self {
            entries: images
                .into_iter()
                .map(|(src, caption)| GalleryEntry {
                    src: src.into(),
                    caption: caption.into(),
                })
                .collect(),
        }
    }

    pub fn entries(&self) -> &[GalleryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Options for opening the lightbox at `position`, minus the element.
    pub fn open_at(&self, position: usize) -> Option<LightboxOptions<'_>> {
        (position < self.entries.len()).then_some(LightboxOptions {
            position,
            gallery: self,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct LightboxOptions<'a> {
    pub position: usize,
    pub gallery: &'a Gallery,
}

impl LightboxOptions<'_> {
    fn to_js(&self, el: &Element) -> Result<JsValue> {
        let options = <JsValue as JsValueSerdeExt>::from_serde(self)?;
        js_sys::Reflect::set(&options, &JsValue::from_str("el"), el)?;
        Ok(options)
    }
}

/// Click listeners of the wired images; removed on drop.
pub struct GalleryListeners {
    listeners: Vec<EventListener>,
}

impl GalleryListeners {
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn forget(self) {
        self.listeners.into_iter().for_each(EventListener::forget);
    }
}

fn images(document: &Document, selector: &str) -> Result<Vec<HtmlImageElement>> {
    let nodes = document.query_selector_all(selector)?;

    Ok((0..nodes.length())
        .filter_map(|index| nodes.item(index))
        .filter_map(|node| node.dyn_into::<HtmlImageElement>().ok())
        .collect())
}

/// Opens the lightbox on click for every image matching `selector`.
pub fn wire(document: &Document, selector: &str) -> Result<GalleryListeners> {
    let images = images(document, selector)?;
    let gallery = Rc::new(Gallery::new(
        images.iter().map(|image| (image.src(), image.alt())),
    ));

    let listeners = images
        .into_iter()
        .enumerate()
        .map(|(position, image)| {
            let gallery = gallery.clone();
            let el: Element = image.clone().into();
            EventListener::new(&image, "click", move |_event| {
                if let Err(e) = open(&gallery, position, &el) {
                    tracing::warn!(position, error = %e, "failed to open lightbox");
                }
            })
        })
        .collect::<Vec<_>>();

    tracing::debug!(images = listeners.len(), selector, "gallery wired");
    Ok(GalleryListeners { listeners })
}

fn open(gallery: &Gallery, position: usize, el: &Element) -> Result<()> {
    let Some(options) = gallery.open_at(position) else {
        return Ok(());
    };
    big_picture(&options.to_js(el)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::{assert_none, assert_some};
    use pretty_assertions::assert_eq;

    fn gallery() -> Gallery {
        Gallery::new([
            ("/img/ownership.png", "ownership"),
            ("/img/borrow.svg", ""),
        ])
    }

    #[test]
    fn entries_keep_page_order() {
        let gallery = gallery();

        assert_eq!(gallery.len(), 2);
        assert_eq!(
            gallery.entries()[1],
            GalleryEntry {
                src: "/img/borrow.svg".into(),
                caption: String::new(),
            }
        );
    }

    #[test]
    fn lightbox_options_shape() {
        let gallery = gallery();
        let options = assert_some!(gallery.open_at(1));

        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            serde_json::json!({
                "position": 1,
                "gallery": [
                    { "src": "/img/ownership.png", "caption": "ownership" },
                    { "src": "/img/borrow.svg", "caption": "" },
                ],
            })
        );
    }

    #[test]
    fn out_of_range_position() {
        assert_none!(gallery().open_at(2));
        assert_none!(Gallery::default().open_at(0));
    }
}
