use crate::event::CallbackKind;
use thiserror::Error;

/// ブリッジ全体で使うエラー型
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("invalid bridge config: {0}")]
    InvalidConfig(String),

    #[error("invalid endpoint {name} = {value:?}: {reason}")]
    InvalidEndpoint {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("no endpoint configured for {0} notifications")]
    EndpointNotConfigured(CallbackKind),

    /// 送信自体の失敗（接続エラー、タイムアウトなど）
    #[error("callback request failed: {0}")]
    Http(String),

    #[error("callback {url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("widget element #{0} not found in the page")]
    WidgetNotFound(String),

    #[error("no widget attached to the bridge")]
    WidgetNotAttached,

    /// ウィジェット側のメソッドが例外を投げた
    #[error("widget call {method} failed: {message}")]
    Widget {
        method: &'static str,
        message: String,
    },

    /// 送信タスクが結果を返す前に終了した
    #[error("notification task ended before reporting a result")]
    Aborted,

    #[error("bridge not initialized, call initBridge first")]
    NotInitialized,
}

impl From<reqwest::Error> for BridgeError {
    fn from(e: reqwest::Error) -> Self {
        BridgeError::Http(e.to_string())
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(e: serde_json::Error) -> Self {
        BridgeError::InvalidConfig(e.to_string())
    }
}
