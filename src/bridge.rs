use crate::config::BridgeConfig;
use crate::dispatch::{Delivery, spawn_notification};
use crate::error::BridgeError;
use crate::event::BridgeEvent;
use crate::transport::CallbackTransport;
use crate::widget::CirclesWidget;

/// ウィジェットとホストページ（サーバ）をつなぐブリッジ
///
/// - ウィジェット発のイベント → コールバックエンドポイントへのPOST
/// - ホスト発のコマンド → ウィジェットのメソッド呼び出し
///
/// 各操作は独立していて、ブリッジ自身は状態遷移を持たない。
pub struct EventBridge {
    config: BridgeConfig,
    transport: Box<dyn CallbackTransport>,
    /// プラグインの読み込みが遅れることがあるので後から差し込める
    widget: Option<Box<dyn CirclesWidget>>,
}

impl EventBridge {
    pub fn new<T>(config: BridgeConfig, transport: T) -> Self
    where
        T: CallbackTransport + 'static,
    {
        Self {
            config,
            transport: Box::new(transport),
            widget: None,
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// ウィジェットを差し込む（既存のものは置き換える）
    pub fn attach_widget<W>(&mut self, widget: W)
    where
        W: CirclesWidget + 'static,
    {
        if self.widget.is_some() {
            log::info!("Replacing attached widget");
        }
        self.widget = Some(Box::new(widget));
    }

    pub fn has_widget(&self) -> bool {
        self.widget.is_some()
    }

    // ========================================
    // ウィジェット → サーバ
    // ========================================

    /// イベントを対応するエンドポイントへ送る
    ///
    /// 送信は呼び出した時点で始まる。返り値の `Delivery` を待てば成否が分かり、
    /// 捨てても送信は止まらない。
    pub fn notify(&self, event: BridgeEvent) -> Delivery {
        let kind = event.kind();
        let Some(url) = self.config.endpoints.get(kind) else {
            log::warn!("Dropping {:?}: no endpoint for {}", event, kind);
            return Delivery::ready(Err(BridgeError::EndpointNotConfigured(kind)));
        };

        log::debug!("Forwarding {:?} to {}", event, url);
        spawn_notification(kind.config_key(), self.transport.post_form(url, event.form_fields()))
    }

    /// `groupClicked(clusterId, docList)`
    pub fn on_group_selected(&self, cluster_id: &str, doc_list: &[String]) -> Delivery {
        log::info!("Group selected: {} ({} documents)", cluster_id, doc_list.len());
        self.notify(BridgeEvent::GroupSelected {
            cluster_id: cluster_id.to_string(),
            doc_list: doc_list.to_vec(),
        })
    }

    /// `selectionCleared()`
    pub fn on_selection_cleared(&self) -> Delivery {
        log::info!("Selection cleared");
        self.notify(BridgeEvent::SelectionCleared)
    }

    /// `documentClicked(documentId)`
    pub fn on_document_selected(&self, document_id: &str) -> Delivery {
        log::info!("Document selected: {}", document_id);
        self.notify(BridgeEvent::DocumentSelected {
            document_id: document_id.to_string(),
        })
    }

    // ========================================
    // ホスト → ウィジェット
    // ========================================

    pub fn select_group(&self, id: &str) -> Result<(), BridgeError> {
        self.widget()?.select_group_by_id(id)
    }

    pub fn load_from_url(&self, url: &str) -> Result<(), BridgeError> {
        log::info!("Reloading widget data from {}", url);
        self.widget()?.load_data_from_url(url)
    }

    pub fn load_from_xml(&self, data: &str) -> Result<(), BridgeError> {
        log::info!("Reloading widget data from inline XML ({} bytes)", data.len());
        self.widget()?.load_data_from_xml(data)
    }

    fn widget(&self) -> Result<&dyn CirclesWidget, BridgeError> {
        self.widget.as_deref().ok_or(BridgeError::WidgetNotAttached)
    }
}
