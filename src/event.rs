use std::fmt;

/// 通知先エンドポイントの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackKind {
    /// グループ（クラスタ）選択
    Selection,
    /// 選択解除
    SelectionCleared,
    /// ドキュメントクリック
    DocumentClicked,
}

impl CallbackKind {
    /// 設定キー名（ページ側のグローバル変数名と同じ）
    pub fn config_key(&self) -> &'static str {
        match self {
            CallbackKind::Selection => "selectionCallback",
            CallbackKind::SelectionCleared => "selectionClearedCallback",
            CallbackKind::DocumentClicked => "documentClickedCallback",
        }
    }
}

impl fmt::Display for CallbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_key())
    }
}

/// ウィジェットから届くイベント
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    GroupSelected {
        cluster_id: String,
        /// 受け取るだけで送信はしない
        doc_list: Vec<String>,
    },
    SelectionCleared,
    DocumentSelected {
        document_id: String,
    },
}

impl BridgeEvent {
    pub fn kind(&self) -> CallbackKind {
        match self {
            BridgeEvent::GroupSelected { .. } => CallbackKind::Selection,
            BridgeEvent::SelectionCleared => CallbackKind::SelectionCleared,
            BridgeEvent::DocumentSelected { .. } => CallbackKind::DocumentClicked,
        }
    }

    /// POSTするフォームフィールド。IDは加工せずそのまま渡す
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            BridgeEvent::GroupSelected { cluster_id, .. } => vec![("group", cluster_id.clone())],
            BridgeEvent::SelectionCleared => Vec::new(),
            BridgeEvent::DocumentSelected { document_id } => vec![("document", document_id.clone())],
        }
    }
}
