use crate::error::BridgeError;
use crate::event::CallbackKind;
use reqwest::Url;
use serde::Deserialize;

/// ウィジェットを埋め込むコンテナ要素のデフォルトID
pub const DEFAULT_CONTAINER_ID: &str = "content";

/// 通知先エンドポイント一式
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackEndpoints {
    pub selection: Url,
    pub selection_cleared: Url,
    /// ホストによっては未定義
    pub document_clicked: Option<Url>,
}

impl CallbackEndpoints {
    pub fn get(&self, kind: CallbackKind) -> Option<&Url> {
        match kind {
            CallbackKind::Selection => Some(&self.selection),
            CallbackKind::SelectionCleared => Some(&self.selection_cleared),
            CallbackKind::DocumentClicked => self.document_clicked.as_ref(),
        }
    }
}

/// ブリッジの初期化パラメータ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    pub endpoints: CallbackEndpoints,
    pub container_id: String,
}

/// ページから渡されるJSONの形
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    selection_callback: String,
    selection_cleared_callback: String,
    #[serde(default)]
    document_clicked_callback: Option<String>,
    #[serde(default)]
    container_id: Option<String>,
}

impl BridgeConfig {
    pub fn new(selection: &str, selection_cleared: &str) -> Result<Self, BridgeError> {
        Ok(Self {
            endpoints: CallbackEndpoints {
                selection: parse_endpoint(CallbackKind::Selection.config_key(), selection)?,
                selection_cleared: parse_endpoint(
                    CallbackKind::SelectionCleared.config_key(),
                    selection_cleared,
                )?,
                document_clicked: None,
            },
            container_id: DEFAULT_CONTAINER_ID.to_string(),
        })
    }

    pub fn with_document_clicked(mut self, document_clicked: &str) -> Result<Self, BridgeError> {
        self.endpoints.document_clicked = Some(parse_endpoint(
            CallbackKind::DocumentClicked.config_key(),
            document_clicked,
        )?);
        Ok(self)
    }

    pub fn with_container_id(mut self, container_id: &str) -> Result<Self, BridgeError> {
        if container_id.trim().is_empty() {
            return Err(BridgeError::InvalidConfig("containerId must not be empty".to_string()));
        }
        self.container_id = container_id.to_string();
        Ok(self)
    }

    /// ページ側の設定オブジェクト（JSON文字列）から構築
    ///
    /// ```json
    /// { "selectionCallback": "http://localhost:8080/select",
    ///   "selectionClearedCallback": "http://localhost:8080/clear",
    ///   "documentClickedCallback": "http://localhost:8080/document",
    ///   "containerId": "content" }
    /// ```
    pub fn from_json(source: &str) -> Result<Self, BridgeError> {
        let raw: RawConfig = serde_json::from_str(source)?;
        let mut config = Self::new(&raw.selection_callback, &raw.selection_cleared_callback)?;
        if let Some(document) = raw.document_clicked_callback.as_deref() {
            config = config.with_document_clicked(document)?;
        }
        if let Some(container_id) = raw.container_id.as_deref() {
            config = config.with_container_id(container_id)?;
        }
        Ok(config)
    }

    /// 環境変数から構築（ネイティブ用）
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self, BridgeError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, BridgeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| BridgeError::InvalidConfig(format!("{} is not set", key)))
        };

        let mut config = Self::new(
            &required(ENV_SELECTION_CALLBACK)?,
            &required(ENV_SELECTION_CLEARED_CALLBACK)?,
        )?;
        if let Some(document) = lookup(ENV_DOCUMENT_CLICKED_CALLBACK) {
            config = config.with_document_clicked(&document)?;
        }
        if let Some(container_id) = lookup(ENV_CONTAINER_ID) {
            config = config.with_container_id(&container_id)?;
        }
        Ok(config)
    }
}

pub const ENV_SELECTION_CALLBACK: &str = "CIRCLES_SELECTION_CALLBACK";
pub const ENV_SELECTION_CLEARED_CALLBACK: &str = "CIRCLES_SELECTION_CLEARED_CALLBACK";
pub const ENV_DOCUMENT_CLICKED_CALLBACK: &str = "CIRCLES_DOCUMENT_CLICKED_CALLBACK";
pub const ENV_CONTAINER_ID: &str = "CIRCLES_CONTAINER_ID";

/// 絶対URL（http/https）のみ受け付ける
fn parse_endpoint(name: &'static str, value: &str) -> Result<Url, BridgeError> {
    let invalid = |reason: String| BridgeError::InvalidEndpoint {
        name,
        value: value.to_string(),
        reason,
    };

    let url = Url::parse(value.trim()).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme '{}'", other))),
    }
}
