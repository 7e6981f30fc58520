//! Config load validation tests for dex-config.
// crates/dex-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards (path, size, encoding, syntax).
// Purpose: Ensure config input handling is strict and fail-closed.
// =============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use dex_config::ConfigError;
use dex_config::DexConfig;
use dex_config::LogSinkKind;
use tempfile::NamedTempFile;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<DexConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config load".to_string()),
    }
}

fn write_config(content: &[u8]) -> Result<NamedTempFile, String> {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(content).map_err(|err| err.to_string())?;
    Ok(file)
}

#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    let path = Path::new(&long_path);
    assert_invalid(DexConfig::load(Some(path)), "config path exceeds max length")?;
    Ok(())
}

#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    let path = Path::new(&long_component);
    assert_invalid(DexConfig::load(Some(path)), "config path component too long")?;
    Ok(())
}

#[test]
fn load_rejects_missing_explicit_file() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("absent.toml");
    assert_invalid(DexConfig::load(Some(&path)), "config io error")?;
    Ok(())
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let file = write_config(&vec![b'#'; 1_048_577])?;
    assert_invalid(DexConfig::load(Some(file.path())), "config file exceeds size limit")?;
    Ok(())
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let file = write_config(&[0xFF, 0xFE, 0xFF])?;
    assert_invalid(DexConfig::load(Some(file.path())), "config file must be utf-8")?;
    Ok(())
}

#[test]
fn load_rejects_malformed_toml() -> TestResult {
    let file = write_config(b"[source\nbase_url = ")?;
    assert_invalid(DexConfig::load(Some(file.path())), "config parse error")?;
    Ok(())
}

#[test]
fn load_rejects_unknown_keys() -> TestResult {
    let file = write_config(b"[store]\npath = \"dex.sqlite\"\ncolour = \"red\"\n")?;
    assert_invalid(DexConfig::load(Some(file.path())), "config parse error")?;
    Ok(())
}

#[test]
fn load_empty_file_yields_defaults() -> TestResult {
    let file = write_config(b"")?;
    let config = DexConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    if config != DexConfig::default() {
        return Err(format!("expected defaults, got {config:?}"));
    }
    Ok(())
}

#[test]
fn load_reads_every_section() -> TestResult {
    let file = write_config(
        br#"
[source]
base_url = "http://127.0.0.1:8080/creature"
allow_http = true
timeout_ms = 2500
max_redirects = 0
user_agent = "dex-test"

[catalog]
expected_total = 9

[store]
path = "data/catalog.sqlite"
journal_mode = "delete"
sync_mode = "normal"

[log]
sink = "file"
path = "logs/sync.jsonl"
"#,
    )?;
    let config = DexConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    let client = config.source.to_client_config();
    if client.base_url != "http://127.0.0.1:8080/creature" || !client.allow_http {
        return Err(format!("unexpected client config {client:?}"));
    }
    if client.timeout_ms != 2500 || client.max_redirects != 0 || client.user_agent != "dex-test" {
        return Err(format!("unexpected client limits {client:?}"));
    }
    if config.catalog.expected_total != 9 {
        return Err("expected_total not applied".to_string());
    }
    let store = config.store.to_sqlite_config();
    if store.path != PathBuf::from("data/catalog.sqlite") {
        return Err(format!("unexpected store path {}", store.path.display()));
    }
    if store.journal_mode.pragma_value() != "delete" || store.sync_mode.pragma_value() != "normal" {
        return Err("store pragmas not applied".to_string());
    }
    if config.log.sink != LogSinkKind::File
        || config.log.path.as_deref() != Some(Path::new("logs/sync.jsonl"))
    {
        return Err(format!("unexpected log config {:?}", config.log));
    }
    Ok(())
}
