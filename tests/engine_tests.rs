//! Tests for Engine
//!
//! These tests verify:
//! - GET/PUT/DELETE semantics and success flags
//! - Malformed request responses
//! - STOP persistence and termination
//! - Persistence failures surfacing as responses
//! - Reloading saved state on open

use std::collections::BTreeMap;

use kvline::config::Config;
use kvline::engine::Engine;
use kvline::protocol::{
    Command, Separator, SessionAction, DELETE_MISSING, DELETE_OK, GET_MISSING, INVALID_TYPE,
    PARAMETER_COUNT, PUT_OK,
};
use kvline::store::Persistence;
use kvline::{KvError, Result};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_engine() -> (TempDir, Config, Engine) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .data_file(temp_dir.path().join("contents.json"))
        .build();
    let engine = Engine::open(&config).unwrap();
    (temp_dir, config, engine)
}

/// Gateway whose saves always fail
struct ReadOnly;

impl Persistence for ReadOnly {
    fn load(&self) -> Result<BTreeMap<String, String>> {
        Ok(BTreeMap::new())
    }

    fn save(&self, _entries: &[(String, String)]) -> Result<()> {
        Err(KvError::Persistence("disk is read-only".to_string()))
    }

    fn location(&self) -> String {
        "readonly.json".to_string()
    }
}

/// Gateway whose loads always fail
struct Unreadable;

impl Persistence for Unreadable {
    fn load(&self) -> Result<BTreeMap<String, String>> {
        Err(KvError::Persistence("garbage".to_string()))
    }

    fn save(&self, _entries: &[(String, String)]) -> Result<()> {
        Ok(())
    }

    fn location(&self) -> String {
        "unreadable.json".to_string()
    }
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_put_then_get() {
    let (_temp, _config, engine) = setup_temp_engine();

    let put = engine.handle_request("PUT\thello\tworld");
    assert_eq!(put.response.message, PUT_OK);
    assert!(put.response.success);

    let get = engine.handle_request("GET\thello");
    assert_eq!(get.response.message, "world");
    assert!(get.response.success);
    assert_eq!(get.action, SessionAction::Continue);
}

#[test]
fn test_get_missing_key() {
    let (_temp, _config, engine) = setup_temp_engine();

    let reply = engine.handle_request("GET\tnope");
    assert_eq!(reply.response.message, GET_MISSING);
    assert!(!reply.response.success);
    assert_eq!(reply.action, SessionAction::Continue);
}

#[test]
fn test_delete_present_and_absent() {
    let (_temp, _config, engine) = setup_temp_engine();

    let missing = engine.handle_request("DELETE\tk");
    assert_eq!(missing.response.message, DELETE_MISSING);
    assert!(!missing.response.success);

    engine.handle_request("PUT\tk\tv");
    let deleted = engine.handle_request("DELETE\tk");
    assert_eq!(deleted.response.message, DELETE_OK);
    assert!(deleted.response.success);

    let after = engine.handle_request("GET\tk");
    assert_eq!(after.response.message, GET_MISSING);
    assert!(!after.response.success);
}

#[test]
fn test_repeated_put_is_idempotent() {
    let (_temp, _config, engine) = setup_temp_engine();

    for _ in 0..5 {
        let reply = engine.handle_request("PUT\tk\tv");
        assert_eq!(reply.response.message, PUT_OK);
    }

    assert_eq!(engine.store().len(), 1);
    assert_eq!(engine.store().get("k"), Some("v".to_string()));
}

#[test]
fn test_command_name_is_case_insensitive() {
    let (_temp, _config, engine) = setup_temp_engine();

    engine.handle_request("pUt\tKey\tValue");
    assert_eq!(engine.handle_request("get\tKey").response.message, "Value");
    // Keys stay case-sensitive
    assert_eq!(engine.handle_request("GET\tkey").response.message, GET_MISSING);
}

#[test]
fn test_execute_typed_command() {
    let (_temp, _config, engine) = setup_temp_engine();

    engine.execute(Command::Put {
        key: "a".to_string(),
        value: "1".to_string(),
    });
    let reply = engine.execute(Command::Get { key: "a".to_string() });
    assert_eq!(reply.response.message, "1");
}

// =============================================================================
// Malformed Request Tests
// =============================================================================

#[test]
fn test_unknown_command() {
    let (_temp, _config, engine) = setup_temp_engine();

    let reply = engine.handle_request("FOO\tbar");
    assert_eq!(reply.response.message, INVALID_TYPE);
    assert!(reply.response.success);
    assert_eq!(reply.action, SessionAction::Continue);
}

#[test]
fn test_wrong_parameter_count() {
    let (_temp, _config, engine) = setup_temp_engine();

    let reply = engine.handle_request("GET\ta\tb");
    assert_eq!(reply.response.message, PARAMETER_COUNT);
    assert!(reply.response.success);
}

#[test]
fn test_empty_request() {
    let (_temp, _config, engine) = setup_temp_engine();

    assert_eq!(engine.handle_request("").response.message, INVALID_TYPE);
}

#[test]
fn test_malformed_requests_do_not_touch_store() {
    let (_temp, _config, engine) = setup_temp_engine();

    engine.handle_request("PUT\tk");
    engine.handle_request("PUT\tk\tv\textra");
    engine.handle_request("UPSERT\tk\tv");

    assert!(engine.store().is_empty());
}

#[test]
fn test_tab_separator_allows_spaces() {
    let temp = TempDir::new().unwrap();
    let config = Config::builder()
        .data_file(temp.path().join("contents.json"))
        .separator(Separator::Tab)
        .build();
    let engine = Engine::open(&config).unwrap();

    assert_eq!(
        engine.handle_request("PUT\tThis is the key\tThis is the value").response.message,
        PUT_OK
    );
    assert_eq!(
        engine.handle_request("GET\tThis is the key").response.message,
        "This is the value"
    );
}

// =============================================================================
// STOP and Persistence Tests
// =============================================================================

#[test]
fn test_scenario_put_get_delete_get_stop() {
    let (_temp, _config, engine) = setup_temp_engine();

    let requests = ["PUT\tfoo\tbar", "GET\tfoo", "DELETE\tfoo", "GET\tfoo", "STOP"];
    let replies: Vec<_> = requests.iter().map(|r| engine.handle_request(r)).collect();

    let messages: Vec<&str> = replies.iter().map(|r| r.response.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            PUT_OK,
            "bar",
            DELETE_OK,
            GET_MISSING,
            "Updated contents.json with latest data.",
        ]
    );

    let actions: Vec<SessionAction> = replies.iter().map(|r| r.action).collect();
    assert_eq!(
        actions,
        vec![
            SessionAction::Continue,
            SessionAction::Continue,
            SessionAction::Continue,
            SessionAction::Continue,
            SessionAction::Stop,
        ]
    );
}

#[test]
fn test_stop_persists_and_reopen_restores() {
    let (_temp, config, engine) = setup_temp_engine();

    engine.handle_request("PUT\ta\t1");
    engine.handle_request("PUT\tb\t2");
    engine.handle_request("PUT\tc\t3");
    engine.handle_request("DELETE\tb");
    let stop = engine.handle_request("stop");
    assert!(stop.is_stop());
    assert!(stop.response.success);
    assert!(config.data_file.exists());

    let reopened = Engine::open(&config).unwrap();
    assert_eq!(reopened.store().snapshot(), engine.store().snapshot());
    assert_eq!(reopened.handle_request("GET\tc").response.message, "3");
    assert_eq!(reopened.handle_request("GET\tb").response.message, GET_MISSING);
}

#[test]
fn test_nothing_written_before_stop() {
    let (_temp, config, engine) = setup_temp_engine();

    engine.handle_request("PUT\ta\t1");

    assert!(!config.data_file.exists());
}

#[test]
fn test_stop_with_wrong_arity_does_not_stop() {
    let (_temp, config, engine) = setup_temp_engine();

    let reply = engine.handle_request("STOP\tnow");
    assert_eq!(reply.response.message, PARAMETER_COUNT);
    assert!(!reply.is_stop());
    assert!(!config.data_file.exists());
}

#[test]
fn test_save_failure_is_reported_and_session_continues() {
    let engine = Engine::with_persistence(Box::new(ReadOnly), Separator::Whitespace).unwrap();
    engine.handle_request("PUT\tk\tv");

    let reply = engine.handle_request("STOP");
    assert!(!reply.response.success);
    assert_eq!(reply.action, SessionAction::Continue);
    assert!(reply.response.message.starts_with("Failed to update readonly.json"));
    assert!(reply.response.message.contains("disk is read-only"));

    // Data is still served
    assert_eq!(engine.handle_request("GET\tk").response.message, "v");
}

#[test]
fn test_load_failure_is_error() {
    let result = Engine::with_persistence(Box::new(Unreadable), Separator::Whitespace);
    assert!(matches!(result, Err(KvError::Persistence(_))));
}

#[test]
fn test_open_reads_existing_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("contents.json");
    std::fs::write(&path, r#"{"data":[{"key":"seed","value":"42"}]}"#).unwrap();

    let config = Config::builder().data_file(&path).build();
    let engine = Engine::open(&config).unwrap();

    assert_eq!(engine.handle_request("GET\tseed").response.message, "42");
}
