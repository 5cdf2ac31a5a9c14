use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use journal_config::{Config, ConfigError, ConfigSourceKind, LoadOptions, CONFIG_FILE_NAME};
use tempfile::TempDir;

fn write_file(path: impl AsRef<Path>, contents: &str) {
    let mut file = fs::File::create(path).expect("create config");
    file.write_all(contents.as_bytes()).expect("write config");
}

fn canonical(path: impl AsRef<Path>) -> PathBuf {
    fs::canonicalize(path).expect("canonicalize path")
}

#[test]
fn loads_defaults_when_no_files_present() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());

    let config = Config::load(LoadOptions::default().with_working_dir(working_dir.clone()))
        .expect("load defaults");

    assert_eq!(config.site.title, "Journal");
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.content.root, working_dir.join("content"));
    assert_eq!(config.content.summary_length, 220);
    assert!(config.content.exclude.is_empty());
    assert!(config.templates.dir.is_none());
    assert_eq!(config.static_files.dir, working_dir.join("static"));

    assert_eq!(config.sources.layers.len(), 1);
    assert_eq!(config.sources.layers[0].kind, ConfigSourceKind::Default);
}

#[test]
fn override_layer_wins_over_local_layer() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());

    write_file(
        working_dir.join(CONFIG_FILE_NAME),
        r#"
        [site]
        title = "Local Notes"

        [server]
        port = 3000

        [content]
        root = "posts"
        exclude = ["**/drafts/**"]
        "#,
    );

    fs::create_dir(working_dir.join("alt")).expect("create alt");
    write_file(
        working_dir.join("alt/override.toml"),
        r#"
        [server]
        port = 4000

        [templates]
        dir = "themes/plain"
        "#,
    );

    let config = Config::load(
        LoadOptions::default()
            .with_working_dir(working_dir.clone())
            .with_override_path("alt/override.toml"),
    )
    .expect("load layered config");

    assert_eq!(config.site.title, "Local Notes");
    assert_eq!(config.server.port, 4000);
    assert_eq!(config.content.root, working_dir.join("posts"));
    assert!(config
        .content
        .exclude
        .matches(Path::new("articles/drafts/wip.md")));
    assert!(!config.content.exclude.matches(Path::new("articles/done.md")));
    assert_eq!(
        config.templates.dir,
        Some(working_dir.join("alt/themes/plain"))
    );

    let kinds: Vec<_> = config.sources.layers.iter().map(|layer| layer.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ConfigSourceKind::Default,
            ConfigSourceKind::Local,
            ConfigSourceKind::Override
        ]
    );
}

#[test]
fn missing_override_is_reported() {
    let temp = TempDir::new().expect("tempdir");
    let err = Config::load(
        LoadOptions::default()
            .with_working_dir(temp.path())
            .with_override_path("nope.toml"),
    )
    .expect_err("missing override should fail");

    assert!(matches!(err, ConfigError::OverrideNotFound { .. }));
}

#[test]
fn malformed_toml_surfaces_parse_error() {
    let temp = TempDir::new().expect("tempdir");
    write_file(temp.path().join(CONFIG_FILE_NAME), "[server\nport = ");

    let err = Config::load(LoadOptions::default().with_working_dir(temp.path()))
        .expect_err("parse failure");
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn validation_collects_every_problem() {
    let temp = TempDir::new().expect("tempdir");
    write_file(
        temp.path().join(CONFIG_FILE_NAME),
        r#"
        [site]
        title = "  "

        [server]
        port = 0

        [content]
        summary_length = 0
        exclude = ["[unclosed"]
        "#,
    );

    let err = Config::load(LoadOptions::default().with_working_dir(temp.path()))
        .expect_err("validation failure");

    match err {
        ConfigError::Validation(errors) => {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            assert_eq!(messages.len(), 4, "unexpected messages: {messages:?}");
            assert!(messages.iter().any(|m| m.contains("site.title cannot be empty")));
            assert!(messages.iter().any(|m| m.contains("server.port")));
            assert!(messages.iter().any(|m| m.contains("content.summary_length")));
            assert!(messages
                .iter()
                .any(|m| m.starts_with("content.exclude: invalid glob pattern")));
            assert!(messages.iter().all(|m| m.contains("local config at")));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}
