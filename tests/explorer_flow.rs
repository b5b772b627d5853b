use json_explorer::config::ExplorerConfig;
use json_explorer::core::INPUT_JSON_STORAGE_KEY;
use json_explorer::explorer::Explorer;
use json_explorer::json_text;
use json_explorer::model_path::{ModelPath, decode, encode};
use json_explorer::storage::{FileStorage, InputStorage};
use json_explorer::traversal::all_path_values;
use serde_json::json;

fn config_in(dir: &std::path::Path) -> ExplorerConfig {
    ExplorerConfig {
        storage_path: dir.join("storage.json"),
        ..ExplorerConfig::default()
    }
}

#[test]
fn input_survives_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_in(dir.path());

    let mut first = Explorer::new(&config, Box::new(FileStorage::new(&config.storage_path)));
    first.load();
    first.apply_editor_text("{\"kept\": [1, 2]}").expect("valid");
    first
        .set_value_at(&ModelPath::from(["kept", "0"]), json!("one"))
        .expect("exists");

    let mut second = Explorer::new(&config, Box::new(FileStorage::new(&config.storage_path)));
    second.load();
    assert_eq!(second.model(), &json!({"kept": ["one", 2]}));
    assert_eq!(second.text(), first.text());

    let stored = FileStorage::new(&config.storage_path)
        .load(INPUT_JSON_STORAGE_KEY)
        .expect("readable");
    assert_eq!(stored.as_deref(), Some(first.text()));
}

#[test]
fn every_traversed_path_round_trips_through_the_codec() {
    let doc = json!({
        "plain": 1,
        "dot.ted": {"Root": [null, {"": true}]},
        "back\\slash": {" ": "x"},
        "Root": {}
    });
    for pair in all_path_values(&doc) {
        let key = encode(&pair.path);
        assert_eq!(decode(&key), pair.path, "key {key:?}");
    }

    let keys: Vec<String> = all_path_values(&doc)
        .iter()
        .map(|pair| encode(&pair.path))
        .collect();
    let mut unique = keys.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), keys.len());
}

#[test]
fn expanding_everything_then_collapsing_a_branch() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_in(dir.path());
    let mut explorer = Explorer::new(&config, Box::new(FileStorage::new(&config.storage_path)));
    explorer.load();

    explorer.expand_all();
    explorer.run_until_idle();
    assert!(!explorer.is_loading());
    assert_eq!(explorer.rows().len(), all_path_values(explorer.model()).len());

    explorer.collapse(&ModelPath::from(["a", "c"]));
    let ids: Vec<String> = explorer.rows().into_iter().map(|row| row.id).collect();
    assert!(ids.contains(&"a.c".to_string()));
    assert!(!ids.iter().any(|id| id.starts_with("a.c.")));
    assert!(ids.contains(&"a.f.h.2".to_string()));
    assert!(explorer.is_expanded(&ModelPath::from(["a", "f"])));
}

#[test]
fn serialized_model_reparses_to_the_same_value() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = ExplorerConfig {
        indent: 4,
        ..config_in(dir.path())
    };
    let mut explorer = Explorer::new(&config, Box::new(FileStorage::new(&config.storage_path)));
    explorer.load();
    explorer
        .set_value_at(&ModelPath::from(["a", "i"]), json!({"nested": [1.25, -3]}))
        .expect("exists");

    assert!(explorer.text().contains("\n        \"i\": {"));
    let reparsed = json_text::parse(explorer.text()).expect("canonical text parses");
    assert_eq!(&reparsed, explorer.model());
}
