use thiserror::Error;

pub type ViewerResult<T> = Result<T, ViewerError>;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("http error: {0}")]
    Http(String),
    #[error("backend returned {status}: {message}")]
    Backend { status: u16, message: String },
    #[error("decode error: {0}")]
    Decode(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("WebAssembly error: {0}")]
    Wasm(String),
    #[error("logging error: {0}")]
    Logging(String),
}

impl From<reqwest::Error> for ViewerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ViewerError::Decode(err.to_string())
        } else {
            ViewerError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ViewerError {
    fn from(err: serde_json::Error) -> Self {
        ViewerError::Decode(err.to_string())
    }
}

impl From<ViewerError> for wasm_bindgen::JsValue {
    fn from(err: ViewerError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}
