use crate::error::BridgeError;
use crate::widget::CirclesWidget;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// プラグインを埋め込んだDOM要素
    pub type CirclesElement;

    #[wasm_bindgen(method, catch, js_name = selectGroupById)]
    fn select_group_by_id(this: &CirclesElement, id: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = loadDataFromURL)]
    fn load_data_from_url(this: &CirclesElement, url: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = loadDataFromXML)]
    fn load_data_from_xml(this: &CirclesElement, xml: &str) -> Result<JsValue, JsValue>;
}

/// DOM上のcirclesウィジェット
pub struct DomCirclesWidget {
    element: CirclesElement,
}

/// コンテナIDでウィジェット要素を探す
/// 初期化時に一度だけ呼び、見つかった要素をブリッジに差し込む
pub fn locate_widget(container_id: &str) -> Result<DomCirclesWidget, BridgeError> {
    let not_found = || BridgeError::WidgetNotFound(container_id.to_string());

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(not_found)?;
    let element = document.get_element_by_id(container_id).ok_or_else(not_found)?;

    log::debug!("Located widget element #{}", container_id);
    Ok(DomCirclesWidget {
        element: element.unchecked_into::<CirclesElement>(),
    })
}

/// JS側の例外をエラーに変換
fn widget_error(method: &'static str, e: JsValue) -> BridgeError {
    let message = e
        .dyn_ref::<js_sys::Error>()
        .map(|err| String::from(err.message()))
        .or_else(|| e.as_string())
        .unwrap_or_else(|| format!("{:?}", e));
    BridgeError::Widget { method, message }
}

impl CirclesWidget for DomCirclesWidget {
    fn select_group_by_id(&self, id: &str) -> Result<(), BridgeError> {
        self.element
            .select_group_by_id(id)
            .map(|_| ())
            .map_err(|e| widget_error("selectGroupById", e))
    }

    fn load_data_from_url(&self, url: &str) -> Result<(), BridgeError> {
        self.element
            .load_data_from_url(url)
            .map(|_| ())
            .map_err(|e| widget_error("loadDataFromURL", e))
    }

    fn load_data_from_xml(&self, xml: &str) -> Result<(), BridgeError> {
        // 戻り値は捨てる
        self.element
            .load_data_from_xml(xml)
            .map(|_| ())
            .map_err(|e| widget_error("loadDataFromXML", e))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    /// bodyにidつきの要素を置く
    pub(crate) fn mount(id: &str) -> web_sys::Element {
        let document = web_sys::window().unwrap().document().unwrap();
        let element = document.create_element("div").unwrap();
        element.set_id(id);
        document.body().unwrap().append_child(&element).unwrap();
        element
    }

    /// 要素にJSのメソッドを生やす
    pub(crate) fn install(element: &web_sys::Element, name: &str, arg: &str, body: &str) {
        let function = js_sys::Function::new_with_args(arg, body);
        js_sys::Reflect::set(element, &JsValue::from_str(name), &function).unwrap();
    }

    fn property(element: &web_sys::Element, name: &str) -> Option<String> {
        js_sys::Reflect::get(element, &JsValue::from_str(name)).unwrap().as_string()
    }

    #[wasm_bindgen_test]
    fn test_missing_container_is_not_found() {
        let err = locate_widget("no-such-container").err().unwrap();
        assert!(matches!(err, BridgeError::WidgetNotFound(id) if id == "no-such-container"));
    }

    #[wasm_bindgen_test]
    fn test_calls_reach_element_methods() {
        let element = mount("circles-widget-a");
        install(&element, "selectGroupById", "id", "this.selected = id;");
        install(&element, "loadDataFromURL", "url", "this.url = url;");
        install(&element, "loadDataFromXML", "xml", "this.xml = xml; return 'ignored';");

        let widget = locate_widget("circles-widget-a").unwrap();
        widget.select_group_by_id("c-3").unwrap();
        widget.load_data_from_url("http://data.example/c.xml").unwrap();
        widget.load_data_from_xml("<searchresult/>").unwrap();

        assert_eq!(property(&element, "selected").as_deref(), Some("c-3"));
        assert_eq!(property(&element, "url").as_deref(), Some("http://data.example/c.xml"));
        assert_eq!(property(&element, "xml").as_deref(), Some("<searchresult/>"));
        element.remove();
    }

    #[wasm_bindgen_test]
    fn test_thrown_error_becomes_widget_error() {
        let element = mount("circles-widget-b");
        install(&element, "loadDataFromXML", "xml", "throw new Error('bad xml: ' + xml);");

        let widget = locate_widget("circles-widget-b").unwrap();
        match widget.load_data_from_xml("<x/>").unwrap_err() {
            BridgeError::Widget { method, message } => {
                assert_eq!(method, "loadDataFromXML");
                assert_eq!(message, "bad xml: <x/>");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        element.remove();
    }

    #[wasm_bindgen_test]
    fn test_element_without_plugin_methods() {
        // プラグインが読み込まれる前の要素
        let element = mount("circles-widget-c");

        let widget = locate_widget("circles-widget-c").unwrap();
        let err = widget.select_group_by_id("1").unwrap_err();
        assert!(matches!(err, BridgeError::Widget { method: "selectGroupById", .. }));
        element.remove();
    }
}
