//! Example demonstrating a launcher's settings file.
//!
//! This example shows how to:
//! - Resolve the platform application-data directory
//! - Load (or create) a settings file completed against defaults
//! - Log to a rotated file
//! - Subscribe to all changes and to a single option
//! - Change options and read them back
//!
//! Run with: cargo run --example launcher_settings

use serde::Deserialize;
use serde_json::json;
use settings_store::paths::app_data_dir;
use settings_store::prelude::*;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Minecraft {
    auto_connect: bool,
    last_server: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Launcher Settings Example ===\n");

    let dir = app_data_dir(".launcher-demo").unwrap_or_else(|| "./launcher-demo".into());
    let logger = Arc::new(FileLogger::new("[Settings]", dir.join("logs").join("main.log")));

    let config = ConfigManager::builder()
        .with_config_name("settings.json")
        .with_config_dir(&dir)
        .with_defaults(json!({
            "java": {
                "path": "",
                "memory": { "max": 1024, "min": 512 },
                "args": ""
            },
            "minecraft": { "autoConnect": false, "lastServer": "" }
        }))
        .with_logger(logger)
        .with_debug(true)
        .build()?;

    config.load(None);
    println!("Settings file: {}", config.config_path().unwrap_or_default().display());
    println!("Watching: {}\n", config.is_watching());

    config.add_callback(|cfg| {
        println!("Settings changed, java = {}", cfg["java"]);
    });
    config.watch_option("java.memory.max").subscribe(|max| {
        println!("Max memory is now {max} MB");
    });

    println!("--- Raising max memory ---");
    config.set_option("java.memory.max", 4096).await;
    config.set_option("minecraft.lastServer", "play.example.net").await;

    // Give the watcher time to report the writes.
    tokio::time::sleep(Duration::from_millis(300)).await;

    let minecraft: Option<Minecraft> = config.get_as("minecraft");
    println!("\nMinecraft settings: {minecraft:?}");
    println!(
        "Default max memory: {}",
        config.get_option("java.memory.max", true).unwrap_or_default()
    );

    println!("\nEdit {} while this runs to see reloads (Ctrl+C to quit).", dir.display());
    tokio::signal::ctrl_c().await?;

    Ok(())
}
