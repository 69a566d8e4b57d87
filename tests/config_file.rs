//! Config file handling through the public API.

use hwsubmit::config::{Config, ContentTypePolicy};
use hwsubmit::{Action, KeymapPreset};
use tempfile::TempDir;

#[test]
fn test_first_run_writes_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hwsubmit").join("config.toml");

    let config = Config::load_or_create(&path).unwrap();
    assert!(path.exists());
    assert_eq!(config.portal.base_url, "http://localhost/system");
    assert_eq!(config.timeouts.submit_secs, 30);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

#[test]
fn test_partial_file_keeps_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[portal]
base_url = "https://school.example/system"
content_type = "by_extension"

[timeouts]
login_secs = 2

[ui]
screen_id = "12"

[ui.keymap]
preset = "emacs"

[[ui.keymap.overrides]]
key = "f5"
action = "submit"
"#,
    )
    .unwrap();

    let config = Config::load_or_create(&path).unwrap();
    assert_eq!(config.portal.base_url, "https://school.example/system");
    assert_eq!(config.portal.homework_path, "screen-homework.php");
    assert_eq!(config.portal.content_type, ContentTypePolicy::ByExtension);
    assert_eq!(config.timeouts.login_secs, 2);
    assert_eq!(config.timeouts.list_secs, 10);
    assert_eq!(config.ui.screen_id, "12");
    assert_eq!(config.ui.keymap.preset, KeymapPreset::Emacs);
    assert_eq!(config.ui.keymap.key_for(Action::Submit), "F5");
}

#[test]
fn test_save_then_load_keeps_values() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    let mut config = Config::default();
    config.portal.token_cookie = "screen_token".to_string();
    config.ui.theme = "light".to_string();
    config.save(&path).unwrap();

    let loaded = Config::load_or_create(&path).unwrap();
    assert_eq!(loaded.portal.token_cookie, "screen_token");
    assert_eq!(loaded.ui.theme, "light");
}

#[test]
fn test_broken_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[portal\nbase_url = ").unwrap();
    assert!(Config::load_or_create(&path).is_err());
}
