use lingo_logger::{LoggerConfig, cleanup_old_logs};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "lingo_logger_{}_{}_{}",
        name,
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn cleanup_keeps_newest_files_and_ignores_other_prefixes() {
    let dir = scratch_dir("cleanup");
    for date in ["2026-10-01", "2026-10-02", "2026-10-03", "2026-10-04"] {
        File::create(dir.join(format!("lingo.log.{date}"))).unwrap();
    }
    File::create(dir.join("other.log.2020-01-01")).unwrap();

    let removed = cleanup_old_logs(&dir, "lingo.log", 2);

    assert_eq!(removed, 2);
    assert_eq!(
        file_names(&dir),
        vec![
            "lingo.log.2026-10-03".to_string(),
            "lingo.log.2026-10-04".to_string(),
            "other.log.2020-01-01".to_string(),
        ]
    );

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn config_deserializes_from_yaml_with_defaults() {
    let yaml = r#"
level: "lingo_i18n=debug,warn"
file: true
max_files: 5
"#;
    let config: LoggerConfig = serde_yaml::from_str(yaml).unwrap();
    let debug = format!("{config:?}");
    assert!(debug.contains("lingo_i18n=debug,warn"));
    assert!(debug.contains("max_files: Some(5)"));
    assert!(debug.contains("console: true"));
    assert!(debug.contains("lingo.log"));
}

#[test]
fn init_starts_periodic_cleanup() {
    let dir = scratch_dir("periodic");
    let prefix = "periodic.log";
    for date in ["2026-10-20", "2026-10-21", "2026-10-22", "2026-10-23", "2026-10-24"] {
        File::create(dir.join(format!("{prefix}.{date}"))).unwrap();
    }

    let _guard = LoggerConfig::new()
        .log_dir(&dir)
        .file_prefix(prefix)
        .enable_file(true)
        .enable_console(false)
        .max_files(3)
        .cleanup_interval(Duration::from_secs(1))
        .init();

    thread::sleep(Duration::from_millis(500));
    let files = file_names(&dir);
    assert!(
        !files.contains(&format!("{prefix}.2026-10-20")),
        "oldest file should be removed on start: {files:?}"
    );

    for date in ["2026-10-25", "2026-10-26", "2026-10-27"] {
        File::create(dir.join(format!("{prefix}.{date}"))).unwrap();
    }
    thread::sleep(Duration::from_millis(1500));

    let files = file_names(&dir);
    assert!(
        !files.contains(&format!("{prefix}.2026-10-22")),
        "periodic cleanup should drop older files: {files:?}"
    );
}
