// ページに公開する関数群
// 名前はウィジェット（プラグイン）とホストページが呼び出す既存のグローバル関数名に合わせる

use crate::bridge::EventBridge;
use crate::config::BridgeConfig;
use crate::dispatch::{Delivery, log_outcome};
use crate::error::BridgeError;
use crate::transport::HttpTransport;
use crate::wasm::dom_widget::locate_widget;
use std::cell::RefCell;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

thread_local! {
    static BRIDGE: RefCell<Option<EventBridge>> = const { RefCell::new(None) };
}

fn to_js(e: BridgeError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

// ウィジェット呼び出し中に同期的にコールバックが返ってくることがあるので、
// 通常の操作は共有借用で行う
fn with_bridge<T>(f: impl FnOnce(&EventBridge) -> Result<T, BridgeError>) -> Result<T, BridgeError> {
    BRIDGE.with(|bridge| match bridge.borrow().as_ref() {
        Some(bridge) => f(bridge),
        None => Err(BridgeError::NotInitialized),
    })
}

fn with_bridge_mut<T>(f: impl FnOnce(&mut EventBridge) -> Result<T, BridgeError>) -> Result<T, BridgeError> {
    BRIDGE.with(|bridge| match bridge.borrow_mut().as_mut() {
        Some(bridge) => f(bridge),
        None => Err(BridgeError::NotInitialized),
    })
}

#[wasm_bindgen(start)]
pub fn start() {
    // パニック時のエラーメッセージをブラウザコンソールに表示
    console_error_panic_hook::set_once();

    // WebAssembly用のロガーを初期化（二重初期化は無視）
    console_log::init_with_level(log::Level::Debug).ok();

    log::info!("circles bridge loaded");
}

/// 設定オブジェクト（JSON文字列）からブリッジを初期化する
///
/// ウィジェットがまだ読み込まれていなければ警告だけ出し、
/// 後から `attachWidget()` で差し込めるようにする。
#[wasm_bindgen(js_name = initBridge)]
pub fn init_bridge(config_json: &str) -> Result<(), JsValue> {
    let config = BridgeConfig::from_json(config_json).map_err(to_js)?;
    let mut bridge = EventBridge::new(config, HttpTransport::new());

    match locate_widget(&bridge.config().container_id) {
        Ok(widget) => bridge.attach_widget(widget),
        Err(e) => log::warn!("{}; call attachWidget() once the plugin is loaded", e),
    }

    BRIDGE.with(|slot| *slot.borrow_mut() = Some(bridge));
    log::info!("Bridge initialized");
    Ok(())
}

/// ウィジェット要素を探し直して差し込む
#[wasm_bindgen(js_name = attachWidget)]
pub fn attach_widget() -> Result<(), JsValue> {
    with_bridge_mut(|bridge| {
        let widget = locate_widget(&bridge.config().container_id)?;
        bridge.attach_widget(widget);
        Ok(())
    })
    .map_err(to_js)
}

/// 通知の完了を待ち、成否を `true` / `false` で返す
/// rejectしないのでウィジェット側が結果を無視しても未処理例外にならない
async fn deliver(label: &str, delivery: Result<Delivery, BridgeError>) -> Result<JsValue, JsValue> {
    let result = match delivery {
        // 成否のログは送信タスクが出している
        Ok(delivery) => delivery.await,
        Err(e) => {
            let result = Err(e);
            log_outcome(label, &result);
            result
        }
    };
    Ok(JsValue::from_bool(result.is_ok()))
}

/// ウィジェットから渡されたIDを送信用の文字列にする
///
/// ウィジェットは数値のIDを渡すことがある。文字列化はフォーム送信と同じ規則
/// （数値・真偽値はJSの `String()` と同じ表記、null/undefinedは空文字）で、
/// それ以外の値はJSON表記にする。
pub(crate) fn js_id(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    if let Some(b) = value.as_bool() {
        return b.to_string();
    }
    if value.is_null() || value.is_undefined() {
        return String::new();
    }
    if value.as_f64().is_some() {
        if let Ok(s) = value.unchecked_ref::<js_sys::Number>().to_string(10) {
            return String::from(s);
        }
    }
    js_sys::JSON::stringify(value)
        .map(String::from)
        .unwrap_or_default()
}

/// ドキュメントIDの配列（配列以外は空扱い）
fn doc_ids(doc_list: &JsValue) -> Vec<String> {
    if !js_sys::Array::is_array(doc_list) {
        return Vec::new();
    }
    js_sys::Array::from(doc_list).iter().map(|v| js_id(&v)).collect()
}

#[wasm_bindgen(js_name = groupClicked)]
pub async fn group_clicked(cluster_id: JsValue, doc_list: JsValue) -> Result<JsValue, JsValue> {
    let cluster_id = js_id(&cluster_id);
    let doc_list = doc_ids(&doc_list);
    let delivery = with_bridge(|bridge| Ok(bridge.on_group_selected(&cluster_id, &doc_list)));
    deliver("groupClicked", delivery).await
}

#[wasm_bindgen(js_name = selectionCleared)]
pub async fn selection_cleared() -> Result<JsValue, JsValue> {
    let delivery = with_bridge(|bridge| Ok(bridge.on_selection_cleared()));
    deliver("selectionCleared", delivery).await
}

#[wasm_bindgen(js_name = documentClicked)]
pub async fn document_clicked(document_id: JsValue) -> Result<JsValue, JsValue> {
    let document_id = js_id(&document_id);
    let delivery = with_bridge(|bridge| Ok(bridge.on_document_selected(&document_id)));
    deliver("documentClicked", delivery).await
}

#[wasm_bindgen(js_name = selectGroupById)]
pub fn select_group_by_id(id: JsValue) -> Result<(), JsValue> {
    let id = js_id(&id);
    with_bridge(|bridge| bridge.select_group(&id)).map_err(to_js)
}

#[wasm_bindgen(js_name = loadDataFromURL)]
pub fn load_data_from_url(url: &str) -> Result<(), JsValue> {
    with_bridge(|bridge| bridge.load_from_url(url)).map_err(to_js)
}

#[wasm_bindgen(js_name = loadDataFromXML)]
pub fn load_data_from_xml(data: &str) -> Result<(), JsValue> {
    with_bridge(|bridge| bridge.load_from_xml(data)).map_err(to_js)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wasm::dom_widget::tests::{install, mount};
    use wasm_bindgen_test::*;

    fn reset() {
        BRIDGE.with(|slot| *slot.borrow_mut() = None);
    }

    fn error_text(e: JsValue) -> String {
        e.as_string().unwrap_or_default()
    }

    const CONFIG: &str = r#"{
        "selectionCallback": "http://127.0.0.1:9/select",
        "selectionClearedCallback": "http://127.0.0.1:9/cleared",
        "containerId": "circles-hooks"
    }"#;

    #[wasm_bindgen_test]
    fn test_js_id_conversions() {
        assert_eq!(js_id(&JsValue::from_str("c-1")), "c-1");
        assert_eq!(js_id(&JsValue::from_f64(42.0)), "42");
        assert_eq!(js_id(&JsValue::from_f64(1.5)), "1.5");
        assert_eq!(js_id(&JsValue::TRUE), "true");
        assert_eq!(js_id(&JsValue::NULL), "");
        assert_eq!(js_id(&JsValue::UNDEFINED), "");
    }

    #[wasm_bindgen_test]
    fn test_doc_ids_mixed_array() {
        let list = js_sys::Array::new();
        list.push(&JsValue::from_str("d1"));
        list.push(&JsValue::from_f64(7.0));

        assert_eq!(doc_ids(&list.into()), vec!["d1".to_string(), "7".to_string()]);
        assert!(doc_ids(&JsValue::from_str("d1")).is_empty());
    }

    #[wasm_bindgen_test]
    async fn test_notification_before_init_resolves_false() {
        reset();
        let result = group_clicked(JsValue::from_f64(3.0), JsValue::UNDEFINED).await.unwrap();
        assert_eq!(result, JsValue::FALSE);
    }

    #[wasm_bindgen_test]
    async fn test_missing_document_endpoint_resolves_false() {
        reset();
        init_bridge(CONFIG).unwrap();
        let result = document_clicked(JsValue::from_str("doc-1")).await.unwrap();
        assert_eq!(result, JsValue::FALSE);
        reset();
    }

    #[wasm_bindgen_test]
    fn test_commands_before_init_throw() {
        reset();
        let err = select_group_by_id(JsValue::from_str("1")).unwrap_err();
        assert!(error_text(err).contains("initBridge"));
    }

    #[wasm_bindgen_test]
    fn test_widget_loaded_after_init() {
        reset();
        init_bridge(CONFIG).unwrap();

        // プラグインがまだ無い
        let err = select_group_by_id(JsValue::from_str("1")).unwrap_err();
        assert!(error_text(err).contains("no widget attached"));

        let element = mount("circles-hooks");
        install(&element, "selectGroupById", "id", "this.selected = id;");
        attach_widget().unwrap();

        select_group_by_id(JsValue::from_f64(12.0)).unwrap();
        let selected = js_sys::Reflect::get(&element, &JsValue::from_str("selected")).unwrap();
        assert_eq!(selected.as_string().as_deref(), Some("12"));

        element.remove();
        reset();
    }
}
