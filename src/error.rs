//! Errors raised while configuring or rendering gradients.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GradientError {
    #[error("unknown parameter `{0}`")]
    UnknownParameter(String),
    #[error("parameter `{key}` must be {expected}, got {value}")]
    InvalidParameter {
        key: String,
        value: f64,
        expected: &'static str,
    },
    #[error("{0} context not supported")]
    ContextUnavailable(&'static str),
    #[error("shader compile failed: {0}")]
    ShaderCompile(String),
    #[error("program link failed: {0}")]
    ProgramLink(String),
    #[error("could not allocate {0}")]
    Allocation(&'static str),
    #[error("frame callback already released")]
    CallbackReleased,
    #[error("host error: {0}")]
    Host(String),
}

pub type Result<T> = std::result::Result<T, GradientError>;

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for GradientError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        GradientError::Host(
            value
                .as_string()
                .unwrap_or_else(|| format!("{value:?}")),
        )
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GradientError> for wasm_bindgen::JsValue {
    fn from(err: GradientError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}
