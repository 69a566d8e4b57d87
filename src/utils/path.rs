use std::path::PathBuf;

const APP_DIR: &str = "hwsubmit";

pub fn get_home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"))
}

/// `<config_dir>/hwsubmit/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| get_home_dir().join(".config"))
        .join(APP_DIR)
        .join("config.toml")
}

/// `<cache_dir>/hwsubmit/hwsubmit.log`
pub fn default_log_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
        .join("hwsubmit.log")
}

/// Expand a leading `~`. Relative paths are left relative to the working directory.
pub fn expand_path(path_str: &str) -> PathBuf {
    if path_str == "~" {
        get_home_dir()
    } else if let Some(rest) = path_str.strip_prefix("~/") {
        get_home_dir().join(rest)
    } else {
        PathBuf::from(path_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_tilde() {
        assert_eq!(expand_path("~"), get_home_dir());
        assert_eq!(expand_path("~/Pictures"), get_home_dir().join("Pictures"));
        assert_eq!(expand_path("/tmp/a.jpg"), PathBuf::from("/tmp/a.jpg"));
        assert_eq!(expand_path("scans"), PathBuf::from("scans"));
    }

    #[test]
    fn test_default_paths_end_with_app_files() {
        assert!(default_config_path().ends_with("hwsubmit/config.toml"));
        assert!(default_log_path().ends_with("hwsubmit/hwsubmit.log"));
    }
}
