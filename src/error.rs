use wasm_bindgen::JsValue;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    // document.documentElement
    DocumentRoot,
    // primary content region the widget is mounted into
    MountPoint(String),
    // iframe created by the giscus client
    WidgetFrame(String),
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DocumentRoot => write!(f, "document root element"),
            Self::MountPoint(selector) => write!(f, "mount point `{selector}`"),
            Self::WidgetFrame(selector) => write!(f, "widget frame `{selector}`"),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("missing {0}")]
    MissingTarget(Target),

    #[error("widget is already initialized")]
    AlreadyInitialized,

    #[error("javascript error: {0}")]
    Js(String),

    #[error("configuration error")]
    Conf(#[from] config::ConfigError),

    #[error("serialization error")]
    Serde(#[from] serde_json::Error),

    #[error("unknown log level `{0}`")]
    Level(String),

    #[error("tracing subscriber is already set")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

impl Error {
    pub fn is_missing_target(&self) -> bool {
        matches!(self, Self::MissingTarget(_))
    }
}

impl From<JsValue> for Error {
    fn from(value: JsValue) -> Self {
        Self::Js(
            value
                .as_string()
                .unwrap_or_else(|| format!("{value:?}")),
        )
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
