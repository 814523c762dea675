//! End-to-end tests through the logger facade.

use std::sync::Arc;
use std::thread;

use clinic_log::{LogLevel, Logger, SinkKind, SinkRegistry};

mod common;

#[test]
fn test_repeated_get_logger_writes_once_per_call() {
    let (_home, config) = common::temp_config();
    let registry = Arc::new(SinkRegistry::new());
    let logger = Logger::new("patient_view", Some(config), false, Arc::clone(&registry)).unwrap();

    for i in 0..3 {
        let handle = logger.get_logger(false, Some("views")).unwrap();
        handle.info(format!("Patient {i} Updated"));
    }
    // A second facade for the same name shares the registered sink.
    let again = Logger::new("patient_view", Some(logger.config().clone()), false, Arc::clone(&registry)).unwrap();
    again.get_logger(false, Some("views")).unwrap().info("Patient 3 Updated");

    let path = logger.current_log_path();
    registry.close_all();

    assert_eq!(
        common::read_lines(&path),
        vec!["Patient 0 Updated", "Patient 1 Updated", "Patient 2 Updated", "Patient 3 Updated"]
    );
}

#[test]
fn test_creates_missing_day_directory() {
    let (home, config) = common::temp_config();
    let registry = Arc::new(SinkRegistry::new());
    let logger = Logger::new("registered_users", Some(config), false, Arc::clone(&registry)).unwrap();

    let path = logger.current_log_path();
    assert!(!path.parent().unwrap().exists());

    logger.get_logger(false, None).unwrap().info("User Registered");
    registry.close_all();

    assert!(path.starts_with(home.path().join("logs")));
    assert_eq!(common::read_lines(&path), vec!["User Registered"]);
}

#[test]
fn test_positional_arguments_are_rendered() {
    let (_home, config) = common::temp_config();
    let registry = Arc::new(SinkRegistry::new());
    let logger = Logger::new("registered_users", Some(config), false, Arc::clone(&registry)).unwrap();

    let handle = logger.get_logger(true, None).unwrap();
    handle.log_args(LogLevel::Info, "user %s created", &[&"alice"]);
    handle.log_args(LogLevel::Info, "user %s created", &[&"bob", &"extra"]);

    let path = logger.current_log_path();
    registry.close_all();

    assert_eq!(
        common::read_lines(&path),
        vec!["user alice created", "user %s created (unformatted args: bob, extra)"]
    );
}

#[test]
fn test_console_sink_registered_once_per_name() {
    let (_home, config) = common::temp_config();
    let registry = Arc::new(SinkRegistry::new());
    let logger = Logger::new("patient_view", Some(config), true, Arc::clone(&registry)).unwrap();

    logger.get_logger(false, None).unwrap();
    logger.get_logger(true, None).unwrap();
    logger.get_logger(true, Some("views")).unwrap();

    assert_eq!(registry.len(), 1);
    assert!(registry.get("patient_view", SinkKind::Console).is_some());
    assert!(registry.get("patient_view", SinkKind::File).is_none());
}

#[test]
fn test_concurrent_facades_share_one_sink() {
    let (_home, config) = common::temp_config();
    let registry = Arc::new(SinkRegistry::new());

    let workers: Vec<_> = (0..8)
        .map(|i| {
            let registry = Arc::clone(&registry);
            let config = config.clone();
            thread::spawn(move || {
                let logger = Logger::new("assessment_view", Some(config), false, registry).unwrap();
                logger.get_logger(true, None).unwrap().info(format!("Assessment {i} Created"));
                logger.current_log_path()
            })
        })
        .collect();
    let paths: Vec<_> = workers.into_iter().map(|w| w.join().unwrap()).collect();

    assert_eq!(registry.len(), 1);
    registry.close_all();

    let mut lines = common::read_lines(&paths[0]);
    lines.sort();
    assert_eq!(lines.len(), 8);
    assert_eq!(lines[0], "Assessment 0 Created");
}

#[test]
fn test_source_file_facade_uses_stem_and_directory() {
    let (_home, mut config) = common::temp_config();
    config.format = "%(folder_name)s %(name)s %(message)s".into();
    let registry = Arc::new(SinkRegistry::new());
    let logger =
        Logger::for_source_file("backend/views/assessment_view.rs", Some(config), false, Arc::clone(&registry)).unwrap();

    logger.get_logger(false, None).unwrap().error("Error deleting Assessment");
    let path = logger.current_log_path();
    registry.close_all();

    assert!(path.ends_with("assessment_view.log"));
    assert_eq!(common::read_lines(&path), vec!["views assessment_view Error deleting Assessment"]);
}

#[test]
fn test_level_threshold_from_config() {
    let (_home, mut config) = common::temp_config();
    config.log_level = "warning".into();
    let registry = Arc::new(SinkRegistry::new());
    let logger = Logger::new("patient_view", Some(config), false, Arc::clone(&registry)).unwrap();

    let handle = logger.get_logger(false, None).unwrap();
    handle.info("skipped");
    handle.warning("kept");
    handle.critical("kept too");
    let path = logger.current_log_path();
    registry.close_all();

    assert_eq!(common::read_lines(&path), vec!["kept", "kept too"]);
}
