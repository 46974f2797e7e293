use std::fs;

use todo_board::config::{Config, ListCatalog, StatesConfig, CONFIG_FILE};
use todo_board::error::Error;

#[test]
fn missing_config_uses_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = Config::load_or_default(&dir.path().join(CONFIG_FILE)).expect("defaults");
    assert_eq!(config.data_dir.to_str(), Some("data"));
    assert_eq!(config.lists_file.to_str(), Some("lists.yml"));
    assert_eq!(config.states, StatesConfig::default());
    assert_eq!(config.server.port, 5000);
    assert!(config.legacy_file.is_none());
}

#[test]
fn partial_config_fills_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(CONFIG_FILE);
    fs::write(
        &path,
        r#"
data_dir = "/srv/todos"

[states]
allowed = ["Offen", "In Arbeit", "Wartet"]
default = "offen"

[server]
port = 8080
"#,
    )
    .expect("write config");

    let config = Config::load(&path).expect("load");
    assert_eq!(config.data_dir.to_str(), Some("/srv/todos"));
    assert_eq!(config.states.default_state(), "Offen");
    assert_eq!(config.states.canonical("in arbeit"), Some("In Arbeit"));
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8080);
}

#[test]
fn save_then_load_keeps_settings() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(CONFIG_FILE);
    let mut config = Config::default();
    config.legacy_file = Some("todos.json".into());
    config.server.port_attempts = 3;
    config.save(&path).expect("save");

    let loaded = Config::load(&path).expect("load");
    assert_eq!(loaded.legacy_file.as_deref().and_then(|p| p.to_str()), Some("todos.json"));
    assert_eq!(loaded.server.port_attempts, 3);
}

#[test]
fn default_state_outside_allowed_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(CONFIG_FILE);
    fs::write(&path, "[states]\nallowed = [\"idle\"]\ndefault = \"done\"\n").expect("write");

    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(CONFIG_FILE);
    fs::write(&path, "data_dir = [").expect("write");

    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, Error::TomlParse(_)));
}

#[test]
fn catalog_keeps_file_order_and_default() {
    let catalog = ListCatalog::parse(
        "default: arbeit\nlists:\n  privat: Privat\n  arbeit: Arbeit\n  garten: Garten\n",
    )
    .expect("catalog");

    let ids: Vec<&str> = catalog.entries().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["privat", "arbeit", "garten"]);
    assert_eq!(catalog.default_id(), "arbeit");
    assert_eq!(catalog.get("garten").map(|e| e.title.as_str()), Some("Garten"));
}

#[test]
fn missing_catalog_gives_single_list() {
    let dir = tempfile::tempdir().expect("tempdir");
    let catalog = ListCatalog::load_or_default(&dir.path().join("lists.yml")).expect("catalog");
    assert_eq!(catalog.entries().len(), 1);
    assert_eq!(catalog.default_id(), "todos");
}

#[test]
fn catalog_rejects_path_like_ids() {
    let err = ListCatalog::parse("lists:\n  ../etc: Nope\n").unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)));
}

#[test]
fn catalog_rejects_unknown_default() {
    let err = ListCatalog::parse("default: missing\nlists:\n  todos: Todos\n").unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)));
}
