use std::env;
use std::fs;
use std::path::Path;

/// Копирует config.toml и templates/*.md из корня workspace рядом с бинарником
fn main() {
    println!("cargo:rerun-if-changed=../../config.toml");
    println!("cargo:rerun-if-changed=../../templates");

    let out_dir = env::var("OUT_DIR").unwrap();
    let profile = env::var("PROFILE").unwrap(); // "debug" or "release"

    // OUT_DIR: target/debug/build/backend-xxx/out -> target/debug
    let target_dir = Path::new(&out_dir)
        .ancestors()
        .find(|p| p.ends_with(&profile))
        .expect("Could not find target profile directory");

    let workspace_root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("Could not find workspace root");

    let source_config = workspace_root.join("config.toml");
    if source_config.exists() {
        fs::copy(&source_config, target_dir.join("config.toml"))
            .unwrap_or_else(|e| panic!("Failed to copy config.toml: {}", e));
    } else {
        println!(
            "cargo:warning=config.toml not found at {:?}, using default config",
            source_config
        );
    }

    let source_templates = workspace_root.join("templates");
    let dest_templates = target_dir.join("templates");
    if let Ok(entries) = fs::read_dir(&source_templates) {
        fs::create_dir_all(&dest_templates)
            .unwrap_or_else(|e| panic!("Failed to create templates dir: {}", e));
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("md") {
                fs::copy(&path, dest_templates.join(entry.file_name()))
                    .unwrap_or_else(|e| panic!("Failed to copy {:?}: {}", path, e));
            }
        }
    } else {
        println!("cargo:warning=templates/ not found, built-in meta-prompts will be used");
    }
}
