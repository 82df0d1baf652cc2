use super::*;
use tempfile::TempDir;

fn store_with(lines: &[&str]) -> (TempDir, HistoryStore) {
    let dir = TempDir::new().unwrap();
    let mut store = HistoryStore::open(dir.path().join("history")).unwrap();
    for line in lines {
        store.append(line).unwrap();
    }
    (dir, store)
}

#[test]
fn test_open_creates_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("history");
    let store = HistoryStore::open(&path).unwrap();
    assert!(path.exists());
    assert!(store.is_empty());
}

#[test]
fn test_append_skips_blank_and_consecutive_duplicates() {
    let (_dir, mut store) = store_with(&[]);
    assert!(store.append("ls").unwrap());
    assert!(!store.append("ls").unwrap());
    assert!(!store.append("   ").unwrap());
    assert!(!store.append("").unwrap());
    assert!(store.append("pwd").unwrap());
    assert!(store.append("ls").unwrap());
    assert_eq!(store.records(), ["ls", "pwd", "ls"]);
}

#[test]
fn test_append_is_durable() {
    let (dir, _store) = store_with(&["ls", "pwd"]);
    let reopened = HistoryStore::open(dir.path().join("history")).unwrap();
    assert_eq!(reopened.records(), ["ls", "pwd"]);
}

#[test]
fn test_multi_line_input_survives_reload() {
    let (dir, mut store) = store_with(&["ls"]);
    assert!(store.append("echo a\necho b").unwrap());
    assert!(store.append("pwd\r\n\nls -l\r").unwrap());
    assert!(!store.append("ls -l\n\n").unwrap());
    assert_eq!(store.records(), ["ls", "echo a", "echo b", "pwd", "ls -l"]);

    let reopened = HistoryStore::open(dir.path().join("history")).unwrap();
    assert_eq!(reopened.records(), store.records());
}

#[test]
fn test_load_skips_blank_lines() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history");
    std::fs::write(&path, "ls\n\n   \necho hi\n").unwrap();
    let store = HistoryStore::open(&path).unwrap();
    assert_eq!(store.records(), ["ls", "echo hi"]);
}

#[test]
fn test_load_tolerates_invalid_utf8() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history");
    std::fs::write(&path, b"ls\n\xff\xfe bad\npwd\n").unwrap();
    let store = HistoryStore::open(&path).unwrap();
    assert_eq!(store.len(), 3);
    assert_eq!(store.get(3), Some("pwd"));
}

#[test]
fn test_clear_truncates_file() {
    let (dir, mut store) = store_with(&["ls", "pwd"]);
    store.clear().unwrap();
    assert!(store.is_empty());
    let path = dir.path().join("history");
    assert!(path.exists());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
}

#[test]
fn test_in_memory_store() {
    let mut store = HistoryStore::in_memory();
    assert!(store.path().is_none());
    store.append("ls").unwrap();
    assert_eq!(store.load().unwrap(), 1);
    store.clear().unwrap();
    assert!(store.is_empty());
}

#[test]
fn test_expand_last_event() {
    let (_dir, store) = store_with(&["ls", "pwd", "echo hi"]);
    assert_eq!(store.expand("!!").unwrap(), "echo hi");
}

#[test]
fn test_expand_numbered_event() {
    let (_dir, store) = store_with(&["ls", "pwd", "echo hi"]);
    assert_eq!(store.expand("!2").unwrap(), "pwd");
    assert_eq!(store.expand("!1").unwrap(), "ls");
}

#[test]
fn test_expand_prefix_prefers_newest() {
    let (_dir, store) = store_with(&["ls", "pwd", "echo hi", "echo bye"]);
    assert_eq!(store.expand("!ec").unwrap(), "echo bye");
    assert_eq!(store.expand("!l").unwrap(), "ls");
}

#[test]
fn test_expand_errors() {
    let (_dir, store) = store_with(&["ls", "pwd", "echo hi"]);
    assert_eq!(
        store.expand("!9").unwrap_err().to_string(),
        "no such event: !9"
    );
    assert_eq!(
        store.expand("!0").unwrap_err().to_string(),
        "no such event: !0"
    );
    assert_eq!(
        store.expand("!zzz").unwrap_err().to_string(),
        "no such event starting with zzz"
    );

    let empty = HistoryStore::in_memory();
    assert_eq!(empty.expand("!!").unwrap_err().to_string(), "no history");
}

#[test]
fn test_expand_leaves_other_text_alone() {
    let (_dir, store) = store_with(&["ls"]);
    assert_eq!(store.expand("ls -la").unwrap(), "ls -la");
    assert_eq!(store.expand("!").unwrap(), "!");
    assert_eq!(store.records(), ["ls"]);
}

#[test]
fn test_expand_huge_event_number() {
    let (_dir, store) = store_with(&["ls"]);
    assert!(matches!(
        store.expand("!99999999999999999999999"),
        Err(HistoryError::NoSuchEvent(_))
    ));
}
