// Keeps the giscus widget theme in sync with the book theme.
//
// Page access goes through the traits below, so the bridge itself never
// touches the DOM. See `crate::dom` and `crate::giscus::dom` for the browser side.

use std::cell::Cell;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::giscus::{WidgetConfig, WidgetMessage};
use crate::theme::mapping::{ThemeMapping, WidgetTheme};

/// Current class tokens of the page root, in document order.
pub trait TokenSource {
    fn tokens(&self) -> Vec<String>;
}

/// Notifies about changes of the page root's theme attribute.
///
/// Callbacks fire once per change, in the order the changes happened.
/// The returned subscription keeps the observation alive.
pub trait ThemeSignal {
    type Subscription;

    fn subscribe(&self, on_change: Box<dyn FnMut()>) -> Result<Self::Subscription>;
}

pub trait WidgetFrame {
    fn post(&self, message: &WidgetMessage) -> Result<()>;
}

pub trait WidgetHost {
    type Frame: WidgetFrame;

    /// Creates the widget in the page with `config`.
    fn mount(&self, config: &WidgetConfig) -> Result<()>;

    /// The live widget frame, if the widget has rendered one yet.
    fn frame(&self) -> Option<Self::Frame>;
}

/// Outcome of a single theme update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Delivery {
    Sent(WidgetTheme),
    // no frame to talk to
    Dropped(WidgetTheme),
    Failed(WidgetTheme),
}

impl Delivery {
    pub fn theme(&self) -> &WidgetTheme {
        match self {
            Self::Sent(theme) | Self::Dropped(theme) | Self::Failed(theme) => theme,
        }
    }
}

#[derive(derivative::Derivative)]
#[derivative(Clone(bound = ""), Debug(bound = ""))]
pub struct ThemeBridge<S, H> {
    mapping: Rc<ThemeMapping>,
    #[derivative(Debug = "ignore")]
    source: Rc<S>,
    #[derivative(Debug = "ignore")]
    host: Rc<H>,
    initialized: Rc<Cell<bool>>,
}

impl<S: TokenSource, H: WidgetHost> ThemeBridge<S, H> {
    pub fn new(mapping: ThemeMapping, source: S, host: H) -> Self {
        Self {
            mapping: Rc::new(mapping),
            source: Rc::new(source),
            host: Rc::new(host),
            initialized: Rc::new(Cell::new(false)),
        }
    }

    pub fn mapping(&self) -> &ThemeMapping {
        &self.mapping
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.get()
    }

    pub fn resolve_theme(&self) -> WidgetTheme {
        self.mapping.resolve(self.source.tokens())
    }

    /// Mounts the widget with the current theme baked into its configuration.
    ///
    /// Succeeds at most once; a failed mount may be retried.
    pub fn initialize(&self, config: WidgetConfig) -> Result<WidgetTheme> {
        if self.initialized.get() {
            return Err(Error::AlreadyInitialized);
        }

        let theme = self.resolve_theme();
        self.host.mount(&config.with_theme(theme.clone()))?;
        self.initialized.set(true);

        tracing::info!(theme = %theme, "widget mounted");
        Ok(theme)
    }

    pub fn on_host_theme_changed(&self) -> Delivery {
        let theme = self.resolve_theme();

        let Some(frame) = self.host.frame() else {
            tracing::debug!(theme = %theme, "no widget frame, theme update dropped");
            return Delivery::Dropped(theme);
        };

        match frame.post(&WidgetMessage::set_theme(theme.clone())) {
            Ok(()) => {
                tracing::debug!(theme = %theme, "theme update sent");
                Delivery::Sent(theme)
            }
            Err(e) => {
                tracing::warn!(theme = %theme, error = %e, "theme update failed");
                Delivery::Failed(theme)
            }
        }
    }
}

impl<S, H> ThemeBridge<S, H>
where
    S: TokenSource + 'static,
    H: WidgetHost + 'static,
{
    /// Pushes a theme update on every change reported by `signal`.
    pub fn observe<G: ThemeSignal>(&self, signal: &G) -> Result<G::Subscription> {
        let bridge = self.clone();
        signal.subscribe(Box::new(move || {
            bridge.on_host_theme_changed();
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::{assert_matches, assert_ok};
    use std::cell::RefCell;

    struct Tokens(Rc<RefCell<Vec<String>>>);

    impl TokenSource for Tokens {
        fn tokens(&self) -> Vec<String> {
            self.0.borrow().clone()
        }
    }

    #[derive(Default)]
    struct Host {
        mounted: RefCell<Vec<WidgetConfig>>,
        posted: Rc<RefCell<Vec<WidgetMessage>>>,
        missing_mount: bool,
    }

    struct Frame(Rc<RefCell<Vec<WidgetMessage>>>);

    impl WidgetFrame for Frame {
        fn post(&self, message: &WidgetMessage) -> Result<()> {
            self.0.borrow_mut().push(message.clone());
            Ok(())
        }
    }

    impl WidgetHost for Host {
        type Frame = Frame;

        fn mount(&self, config: &WidgetConfig) -> Result<()> {
            if self.missing_mount {
                return Err(Error::MissingTarget(crate::error::Target::MountPoint(
                    "main".into(),
                )));
            }
            self.mounted.borrow_mut().push(config.clone());
            Ok(())
        }

        fn frame(&self) -> Option<Frame> {
            self.mounted
                .borrow()
                .first()
                .map(|_| Frame(self.posted.clone()))
        }
    }

    fn bridge(tokens: &[&str], host: Host) -> (ThemeBridge<Tokens, Host>, Rc<RefCell<Vec<String>>>) {
        let tokens = Rc::new(RefCell::new(
            tokens.iter().map(|t| t.to_string()).collect(),
        ));
        let bridge = ThemeBridge::new(ThemeMapping::mdbook(), Tokens(tokens.clone()), host);
        (bridge, tokens)
    }

    #[test]
    fn initialize_only_once() {
        let (bridge, _) = bridge(&["navy"], Host::default());

        assert_ok!(bridge.initialize(WidgetConfig::default()));
        assert_matches!(
            bridge.initialize(WidgetConfig::default()),
            Err(Error::AlreadyInitialized)
        );
        assert_eq!(bridge.host().mounted.borrow().len(), 1);
    }

    #[test]
    fn failed_mount_leaves_bridge_uninitialized() {
        let host = Host {
            missing_mount: true,
            ..Default::default()
        };
        let (bridge, _) = bridge(&["navy"], host);

        let err = bridge.initialize(WidgetConfig::default()).unwrap_err();
        assert!(err.is_missing_target());
        assert!(!bridge.is_initialized());
    }

    #[test]
    fn update_without_frame_is_dropped() {
        let (bridge, tokens) = bridge(&["light"], Host::default());
        tokens.borrow_mut()[0] = "coal".into();

        assert_eq!(
            bridge.on_host_theme_changed(),
            Delivery::Dropped(WidgetTheme::from("dark_high_contrast"))
        );
        assert!(bridge.host().posted.borrow().is_empty());
    }

    #[test]
    fn clones_share_state() {
        let (bridge, _) = bridge(&["rust"], Host::default());
        let other = bridge.clone();

        assert_ok!(other.initialize(WidgetConfig::default()));
        assert!(bridge.is_initialized());
        assert_eq!(bridge.on_host_theme_changed(), Delivery::Sent("fro".into()));
    }
}
