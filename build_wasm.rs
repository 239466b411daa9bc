use std::fs;
use std::path::Path;
use std::process::Command;

// pkg/ にwasmとホストページのひな形を出力する
//   cargo run --bin build_wasm
fn main() {
    println!("🚀 Building circles bridge WASM...");

    // 1. wasm-pack でビルド
    println!("📦 Running wasm-pack build...");
    let status = match Command::new("wasm-pack")
        .args([
            "build",
            "--release",
            "--target",
            "web",
            "--out-dir",
            "pkg",
            "--no-default-features",
            "--features",
            "wasm",
        ])
        .status()
    {
        Ok(status) => status,
        Err(e) => {
            eprintln!("❌ Failed to execute wasm-pack: {}", e);
            std::process::exit(1);
        }
    };

    if !status.success() {
        eprintln!("❌ wasm-pack build failed");
        std::process::exit(1);
    }

    println!("✅ WASM build completed");

    // 2. ホストページを生成
    println!("📝 Generating HTML file...");
    let pkg_dir = Path::new("pkg");
    if let Err(e) = fs::write(pkg_dir.join("index.html"), host_page()) {
        eprintln!("❌ Failed to write index.html: {}", e);
        std::process::exit(1);
    }

    println!("✅ HTML file generated:");
    println!("   - pkg/index.html");
    println!("\n   Edit the callback URLs and the widget source in index.html before serving it.");
}

/// ウィジェットはエクスポートをグローバル関数として呼ぶので window に載せる
fn host_page() -> &'static str {
    r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Circles</title>
    <style>
        html, body, #content {
            width: 100%;
            height: 100%;
            margin: 0;
        }
    </style>
</head>
<body>
    <object id="content" type="application/x-shockwave-flash" data="circles.swf">
        <param name="allowScriptAccess" value="always">
    </object>
    <script type="module">
        import init, * as bridge from './circles_bridge.js';

        await init();

        for (const name of [
            'groupClicked', 'selectionCleared', 'documentClicked',
            'selectGroupById', 'loadDataFromURL', 'loadDataFromXML',
            'attachWidget',
        ]) {
            window[name] = bridge[name];
        }

        bridge.initBridge(JSON.stringify({
            selectionCallback: new URL('/select', location.origin).href,
            selectionClearedCallback: new URL('/clear', location.origin).href,
            documentClickedCallback: new URL('/document', location.origin).href,
            containerId: 'content',
        }));
    </script>
</body>
</html>
"#
}
