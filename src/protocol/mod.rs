use std::path::Path;

use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::CoreConfig;
use crate::error::{CoreError, Result};
use crate::model::catalog::Catalog;
use crate::parsers;
use crate::services::locations::{self, LocationStyle};
use crate::services::qa::Severity;
use crate::services::translation_memory::store::write_atomic;
use crate::services::{encoding, numerus, pretranslate, qa, rebuild, stats};

mod command;
mod project;

pub use command::Command;

fn get_cmd(req: &Value) -> &str {
    req.get("cmd").and_then(|v| v.as_str()).unwrap_or("")
}

fn get_id(req: &Value) -> Value {
    req.get("id").cloned().unwrap_or(Value::Null)
}

fn get_payload(req: &Value) -> &Value {
    static EMPTY: Value = Value::Null;
    req.get("payload").unwrap_or(&EMPTY)
}

fn get_str<'a>(payload: &'a Value, key: &str) -> Option<&'a str> {
    payload.get(key).and_then(|v| v.as_str()).filter(|s| !s.is_empty())
}

fn require_str<'a>(payload: &'a Value, key: &str) -> Result<&'a str> {
    get_str(payload, key).ok_or_else(|| CoreError::InvalidRequest(format!("payload.{key} is required")))
}

fn ok(id: Value, payload: Value) -> String {
    json!({
        "id": id,
        "status": "ok",
        "payload": payload
    })
    .to_string()
}

fn err(id: Value, message: impl Into<String>) -> String {
    json!({
        "id": id,
        "status": "error",
        "message": message.into()
    })
    .to_string()
}

/// The `id` of a raw request line, `null` when the line is not a JSON object.
pub fn request_id(input: &str) -> Value {
    serde_json::from_str::<Value>(input)
        .map(|req| get_id(&req))
        .unwrap_or(Value::Null)
}

/// Response for a request whose handler panicked.
pub fn internal_error(id: Value) -> String {
    err(id, "internal core error")
}

/// Catalog from `payload.catalog` (JSON), `payload.text` (TS source) or `payload.path` (TS file).
fn catalog_from_payload(payload: &Value) -> Result<Catalog> {
    if let Some(v) = payload.get("catalog").filter(|v| !v.is_null()) {
        return serde_json::from_value(v.clone())
            .map_err(|e| CoreError::InvalidRequest(format!("invalid payload.catalog: {e}")));
    }
    if let Some(text) = get_str(payload, "text") {
        return parsers::ts::parse(text);
    }
    if let Some(path) = get_str(payload, "path") {
        let decoded = encoding::read_file(Path::new(path))?;
        return parsers::ts::parse(&decoded.text);
    }
    Err(CoreError::InvalidRequest(
        "payload.catalog, payload.text or payload.path is required".into(),
    ))
}

pub fn handle(input: &str, config: &CoreConfig) -> String {
    let req: Value = match serde_json::from_str(input) {
        Ok(v) => v,
        Err(_) => {
            return json!({
                "status": "error",
                "message": "invalid json"
            })
            .to_string();
        }
    };

    let id = get_id(&req);
    let cmd_str = get_cmd(&req);
    let payload = get_payload(&req);
    let cmd = Command::from(cmd_str);

    debug!(cmd = cmd_str, "request");

    match dispatch(cmd, payload, config) {
        Ok(result) => ok(id, result),
        Err(e) => {
            warn!(cmd = cmd_str, error = %e, "request failed");
            err(id, e.to_string())
        }
    }
}

fn dispatch(cmd: Command, payload: &Value, config: &CoreConfig) -> Result<Value> {
    match cmd {
        Command::Ping => Ok(json!({
            "message": "ts-core alive",
            "version": env!("CARGO_PKG_VERSION")
        })),

        Command::ParseTs => {
            if let Some(path) = get_str(payload, "path") {
                let decoded = encoding::read_file(Path::new(path))?;
                let catalog = parsers::ts::parse(&decoded.text)?;
                Ok(json!({
                    "catalog": catalog,
                    "encoding": decoded.encoding.name().to_lowercase(),
                    "had_errors": decoded.had_errors
                }))
            } else {
                let text = require_str(payload, "text")?;
                Ok(json!({ "catalog": parsers::ts::parse(text)? }))
            }
        }

        Command::RebuildTs => {
            let catalog = catalog_from_payload(payload)?;
            Ok(json!({ "text": rebuild::rebuild(&catalog) }))
        }

        Command::SaveTs => {
            let target = require_str(payload, "target")?;
            let mut catalog = catalog_from_payload(payload)?;
            if let Some(mode) = get_str(payload, "locations") {
                locations::apply(&mut catalog, mode.parse::<LocationStyle>()?);
            }
            let text = rebuild::rebuild(&catalog);
            write_atomic(Path::new(target), text.as_bytes())?;
            Ok(json!({ "path": target, "bytes": text.len() }))
        }

        Command::RunQa => {
            let catalog = catalog_from_payload(payload)?;
            let issues = qa::run(&catalog);
            let errors = issues.iter().filter(|i| i.severity == Severity::Error).count();
            Ok(json!({
                "issues": issues,
                "errors": errors,
                "warnings": issues.len() - errors
            }))
        }

        Command::Stats => {
            let catalog = catalog_from_payload(payload)?;
            let s = stats::collect(&catalog);
            let summary = s.summary();
            Ok(json!({ "stats": s, "summary": summary }))
        }

        Command::Locations => {
            let style = require_str(payload, "mode")?.parse::<LocationStyle>()?;
            let mut catalog = catalog_from_payload(payload)?;
            locations::apply(&mut catalog, style);
            Ok(json!({ "catalog": catalog }))
        }

        Command::NumerusRule => {
            let language = require_str(payload, "language")?;
            Ok(json!({ "language": language, "rule": numerus::rule_for(language) }))
        }

        Command::DetectEncoding => {
            let path = require_str(payload, "path")?;
            let result = encoding::detect_from_file(Path::new(path))?;
            Ok(serde_json::to_value(result)?)
        }

        Command::TmImport => {
            let catalog = catalog_from_payload(payload)?;
            let report = pretranslate::import(&config.tm_file, &catalog)?;
            Ok(json!({ "report": report }))
        }

        Command::TmApply => {
            let mut catalog = catalog_from_payload(payload)?;
            let report = pretranslate::apply(&config.tm_file, &mut catalog)?;
            Ok(json!({ "catalog": catalog, "report": report }))
        }

        c if c.is_project() => project::handle(c, payload, config),

        _ => Err(CoreError::InvalidRequest("unknown command".into())),
    }
}
