// Browser side of the theme bridge: the <html> element and its class list.

use js_sys::Array;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Document, Element, MutationObserver, MutationObserverInit, MutationRecord, Window};

use crate::error::{Error, Result, Target};
use crate::theme::bridge::{ThemeSignal, TokenSource};

// mdBook switches themes by rewriting the class attribute of <html>
const THEME_ATTRIBUTE: &str = "class";

pub fn window() -> Result<Window> {
    web_sys::window().ok_or_else(|| Error::Js("no global window".into()))
}

pub fn document() -> Result<Document> {
    window()?
        .document()
        .ok_or_else(|| Error::Js("window has no document".into()))
}

#[derive(Clone, Debug)]
pub struct DocumentRoot {
    element: Element,
}

impl DocumentRoot {
    pub fn locate(document: &Document) -> Result<Self> {
        document
            .document_element()
            .map(|element| Self { element })
            .ok_or(Error::MissingTarget(Target::DocumentRoot))
    }
}

impl TokenSource for DocumentRoot {
    fn tokens(&self) -> Vec<String> {
        let classes = self.element.class_list();
        (0..classes.length())
            .filter_map(|index| classes.item(index))
            .collect()
    }
}

impl ThemeSignal for DocumentRoot {
    type Subscription = ClassObserver;

    fn subscribe(&self, mut on_change: Box<dyn FnMut()>) -> Result<ClassObserver> {
        // one callback per mutation record keeps changes in order
        let callback = Closure::<dyn FnMut(Array, MutationObserver)>::new(
            move |records: Array, _observer: MutationObserver| {
                for record in records.iter() {
                    if record.dyn_ref::<MutationRecord>().is_some() {
                        on_change();
                    }
                }
            },
        );

        let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;

        let init = MutationObserverInit::new();
        init.set_attributes(true);
        init.set_attribute_old_value(true);
        init.set_attribute_filter(&Array::of1(&JsValue::from_str(THEME_ATTRIBUTE)));

        observer.observe_with_options(&self.element, &init)?;

        Ok(ClassObserver {
            observer,
            _callback: callback,
        })
    }
}

/// Live observation of the root's class attribute; disconnects on drop.
pub struct ClassObserver {
    observer: MutationObserver,
    _callback: Closure<dyn FnMut(Array, MutationObserver)>,
}

impl ClassObserver {
    /// Keeps observing for the rest of the page lifetime.
    pub fn forget(self) {
        std::mem::forget(self);
    }
}

impl Drop for ClassObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
