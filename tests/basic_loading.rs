//! Integration tests for loading, saving and reading settings.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use settings_store::prelude::*;
use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Memory {
    max: u32,
    min: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Java {
    path: String,
    memory: Memory,
    args: String,
}

fn launcher_defaults() -> Value {
    json!({
        "java": {
            "path": "",
            "memory": { "max": 1024, "min": 512 },
            "args": ""
        },
        "minecraft": { "autoConnect": false, "fullscreen": false }
    })
}

fn build(dir: &TempDir) -> ConfigManager {
    ConfigManager::builder()
        .with_config_dir(dir.path())
        .with_defaults(launcher_defaults())
        .with_file_watch(false)
        .build()
        .unwrap()
}

fn read_json(dir: &TempDir) -> Value {
    let text = fs::read_to_string(dir.path().join("config.json")).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn test_first_run_writes_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config = build(&temp_dir);

    assert_eq!(config.load(None), Some(launcher_defaults()));
    assert_eq!(read_json(&temp_dir), launcher_defaults());
}

#[test]
fn test_file_is_pretty_printed_with_four_spaces() {
    let temp_dir = TempDir::new().unwrap();
    let config = build(&temp_dir);
    config.load(None);

    let text = fs::read_to_string(temp_dir.path().join("config.json")).unwrap();
    assert!(text.starts_with("{\n    \"java\": {\n        \"path\": \"\","));
}

#[test]
fn test_existing_values_survive_completion() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("config.json"),
        r#"{"java": {"path": "/usr/bin/java", "memory": {"max": 2048, "min": 1024},
            "args": "-XX:+UseG1GC"}}"#,
    )
    .unwrap();
    let config = build(&temp_dir);
    config.load(None);

    let java: Java = config.get_as("java").unwrap();
    assert_eq!(java.path, "/usr/bin/java");
    assert_eq!(java.memory, Memory { max: 2048, min: 1024 });
    assert_eq!(
        config.get_option("minecraft", false),
        Some(json!({"autoConnect": false, "fullscreen": false}))
    );
    assert_eq!(read_json(&temp_dir)["minecraft"]["fullscreen"], json!(false));
}

#[test]
fn test_arrays_are_kept_as_is() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("config.json"),
        r#"{"servers": ["play.example.net"]}"#,
    )
    .unwrap();
    let config = ConfigManager::builder()
        .with_config_dir(temp_dir.path())
        .with_defaults(json!({"servers": ["a", "b", "c"]}))
        .with_file_watch(false)
        .build()
        .unwrap();

    config.load(None);
    assert_eq!(
        config.get_option("servers", false),
        Some(json!(["play.example.net"]))
    );
}

#[test]
fn test_type_mismatch_keeps_stored_value() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("config.json"), r#"{"java": "legacy"}"#).unwrap();
    let config = build(&temp_dir);

    config.load(None);
    assert_eq!(config.get_option("java", false), Some(json!("legacy")));
}

#[test]
fn test_corrupt_file_is_replaced() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("config.json"), "{\"java\": {").unwrap();
    let config = build(&temp_dir);

    assert_eq!(config.load(None), Some(launcher_defaults()));
    assert_eq!(read_json(&temp_dir), launcher_defaults());
}

#[test]
fn test_top_level_array_is_replaced() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("config.json"), "[1, 2, 3]").unwrap();
    let config = build(&temp_dir);

    assert_eq!(config.load(None), Some(launcher_defaults()));
}

#[test]
fn test_custom_name_and_directory() {
    let temp_dir = TempDir::new().unwrap();
    let config = ConfigManager::builder()
        .with_config_name("launcher.json")
        .with_config_dir(temp_dir.path().join("unused"))
        .with_defaults(launcher_defaults())
        .with_file_watch(false)
        .build()
        .unwrap();

    let dir = temp_dir.path().join(".tjmc");
    config.load(Some(&dir));

    assert!(dir.join("launcher.json").exists());
    assert!(!temp_dir.path().join("unused").exists());
}

#[tokio::test]
async fn test_set_then_reload() {
    let temp_dir = TempDir::new().unwrap();
    let config = build(&temp_dir);
    config.load(None);

    assert_eq!(config.set_option("java.memory.max", 4096).await, Some(true));
    assert_eq!(config.set_option("minecraft.lastServer", "mc.example.net").await, Some(true));

    let reloaded = build(&temp_dir);
    reloaded.load(None);
    assert_eq!(reloaded.get_option("java.memory.max", false), Some(json!(4096)));
    assert_eq!(
        reloaded.get_option("minecraft.lastServer", false),
        Some(json!("mc.example.net"))
    );
}

#[tokio::test]
async fn test_set_option_with_struct_value() {
    let temp_dir = TempDir::new().unwrap();
    let config = build(&temp_dir);
    config.load(None);

    let java = Java {
        path: "/opt/jdk/bin/java".to_string(),
        memory: Memory { max: 8192, min: 2048 },
        args: String::new(),
    };
    config.set_option("java", &java).await;

    assert_eq!(config.get_as::<Java>("java"), Some(java));
}

#[tokio::test]
async fn test_set_option_replaces_scalar_intermediate() {
    let temp_dir = TempDir::new().unwrap();
    let config = build(&temp_dir);
    config.load(None);

    config.set_option("java.path.version", 17).await;
    assert_eq!(config.get_option("java.path", false), Some(json!({"version": 17})));
}

#[tokio::test]
async fn test_replace_options_is_completed() {
    let temp_dir = TempDir::new().unwrap();
    let config = build(&temp_dir);
    config.load(None);

    config
        .replace_options(json!({"minecraft": {"autoConnect": true}}))
        .await;

    let stored = read_json(&temp_dir);
    assert_eq!(stored["minecraft"]["autoConnect"], json!(true));
    assert_eq!(stored["minecraft"]["fullscreen"], json!(false));
    assert_eq!(stored["java"], launcher_defaults()["java"]);
}

#[tokio::test]
async fn test_default_reads_ignore_current_values() {
    let temp_dir = TempDir::new().unwrap();
    let config = build(&temp_dir);
    config.load(None);
    config.set_option("java.memory.max", 4096).await;

    assert_eq!(config.get_option("java.memory.max", true), Some(json!(1024)));
    assert_eq!(config.get_option("java.memory.max", false), Some(json!(4096)));
}

#[tokio::test]
async fn test_set_nested_then_read_through_accessor() {
    let temp_dir = TempDir::new().unwrap();
    let config = build(&temp_dir);
    config.load(None);

    assert_eq!(config.set_option("java.memory.max", 2048).await, Some(true));

    let memory = config.get_option(
        Selector::accessor(|cfg| cfg.get("java")?.get("memory").cloned()),
        false,
    );
    assert_eq!(memory, Some(json!({"max": 2048, "min": 512})));
}

#[test]
fn test_accessor_recovers_state() {
    let temp_dir = TempDir::new().unwrap();
    let config = build(&temp_dir);
    config.load(None);

    let selection = config
        .select(
            Selector::accessor(|cfg| cfg.get("profiles")?.get(0).cloned()),
            false,
        )
        .unwrap();
    assert!(selection.is_recovered());
    assert_eq!(selection.into_value(), launcher_defaults());

    let value = config.get_option(
        Selector::accessor(|cfg| cfg.pointer("/java/memory/min").cloned()),
        false,
    );
    assert_eq!(value, Some(json!(512)));
}

#[test]
fn test_explicit_save_restores_deleted_file() {
    let temp_dir = TempDir::new().unwrap();
    let config = build(&temp_dir);
    config.load(None);

    let path = temp_dir.path().join("config.json");
    fs::remove_file(&path).unwrap();

    assert!(config.save(false, true, "manual"));
    assert_eq!(read_json(&temp_dir), launcher_defaults());
}

#[tokio::test]
async fn test_callbacks_see_new_configuration() {
    let temp_dir = TempDir::new().unwrap();
    let config = build(&temp_dir);
    config.load(None);

    let calls = Arc::new(AtomicUsize::new(0));
    let calls_clone = Arc::clone(&calls);
    config.add_callback(move |cfg| {
        assert_eq!(cfg["minecraft"]["autoConnect"], json!(true));
        calls_clone.fetch_add(1, Ordering::SeqCst);
    });

    config.set_option("minecraft.autoConnect", true).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_clones_share_state() {
    let temp_dir = TempDir::new().unwrap();
    let config = build(&temp_dir);
    let other = config.clone();
    config.load(None);

    other.set_option("java.args", "-Xss2M").await;
    assert_eq!(config.get_option("java.args", false), Some(json!("-Xss2M")));
}
