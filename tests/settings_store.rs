//! 设置存储集成测试
//!
//! 文件存储与启动流程、命令处理配合时的行为

use std::fs;

use feedfilter::pipeline::KeywordSet;
use feedfilter::runtime::{apply_command, startup, Command};
use feedfilter::storage::{JsonFileStore, SettingsStore, StoredSettings};
use feedfilter::EngineState;

#[allow(dead_code)]
mod common {
    include!("common/mod.rs");
}

use common::{body_of_len, controller, hidden_ids, FeedBuilder};

fn feed() -> markup5ever_rcdom::RcDom {
    FeedBuilder::new()
        .post("a", &body_of_len("Apply now for this role", 200))
        .post("b", &body_of_len("Team offsite photos", 200))
        .build()
}

/// 存储中写明禁用时启动后不隐藏任何帖子
#[test]
fn test_startup_reads_disabled_flag_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("settings.json"));
    store
        .save(&StoredSettings {
            enabled: Some(false),
            keywords: None,
        })
        .unwrap();

    let dom = feed();
    let mut controller = controller(&dom);
    let state = startup(&store, &mut controller);

    assert!(!state.enabled);
    assert_eq!(state.keywords, KeywordSet::defaults());
    assert!(hidden_ids(&dom).is_empty());
}

/// 手写的设置文件也能读取，关键词按存储的顺序使用
#[test]
fn test_startup_uses_stored_keywords() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, r#"{"keywords":["offsite"]}"#).unwrap();

    let dom = feed();
    let mut controller = controller(&dom);
    let state = startup(&JsonFileStore::new(&path), &mut controller);

    assert!(state.enabled);
    assert_eq!(state.keywords.as_slice(), &["offsite".to_string()]);
    assert_eq!(hidden_ids(&dom), vec!["a"]);
}

/// 损坏的设置文件不会阻止启动，退回默认设置
#[test]
fn test_corrupt_store_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, "[1, 2").unwrap();

    let dom = feed();
    let mut controller = controller(&dom);
    let state = startup(&JsonFileStore::new(&path), &mut controller);

    assert_eq!(state, EngineState {
        hidden_count: 1,
        ..EngineState::default()
    });
    assert_eq!(hidden_ids(&dom), vec!["b"]);
}

/// 设置表单式的读改写：替换关键词后写回，再次启动时生效
#[test]
fn test_saved_keywords_apply_on_next_startup() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("cfg/settings.json"));

    let dom = feed();
    let mut first = controller(&dom);
    let mut state = startup(&store, &mut first);
    assert_eq!(hidden_ids(&dom), vec!["b"]);

    let keywords = vec!["photos".to_string()];
    store.update(|s| s.keywords = Some(keywords.clone())).unwrap();
    apply_command(Command::UpdateKeywords { keywords }, &mut first, &mut state);
    assert_eq!(hidden_ids(&dom), vec!["a"]);

    let fresh = feed();
    let mut second = controller(&fresh);
    let restarted = startup(&store, &mut second);
    assert_eq!(restarted.hidden_count, 1);
    assert_eq!(hidden_ids(&fresh), vec!["a"]);
}
