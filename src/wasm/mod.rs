// ブラウザ（wasm32）側の実装

pub mod dom_widget;
pub mod hooks;

pub use dom_widget::{DomCirclesWidget, locate_widget};

#[cfg(test)]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);
