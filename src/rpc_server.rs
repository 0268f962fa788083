//! Marktables RPC Server: JSON-RPC over stdin/stdout.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"bookmark.upsert", "params":{"user":"alice","fields":{"url":"..."}}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//!
//! The first argument, when given, is the path of the settings file.

use std::io::{self, BufRead, Write};

use marktables::app::App;
use marktables::logging;
use marktables::rpc_handler::handle_method;
use marktables::services::settings_engine::{SettingsEngine, SettingsEngineTrait};

use serde_json::{json, Value};

fn write_line(out: &mut impl Write, value: &Value) -> io::Result<()> {
    writeln!(out, "{}", value)?;
    out.flush()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = SettingsEngine::new(std::env::args().nth(1));
    let settings = engine.load()?;
    logging::init(&settings.logging);

    let app = App::from_settings(&mut engine).map_err(|e| {
        tracing::error!(error = %e, "failed to initialize bookmark store");
        e
    })?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_line(&mut out, &json!({"event":"ready","version":env!("CARGO_PKG_VERSION")}))?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                tracing::warn!(error = %e, "stdin closed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                tracing::debug!(error = %e, "unparseable request");
                write_line(&mut out, &json!({"id":null,"error":format!("parse error: {}", e)}))?;
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);
        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
        let params = req.get("params").cloned().unwrap_or(json!({}));

        let response = match handle_method(&app, method, &params) {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => {
                tracing::debug!(method, error = %err, "request failed");
                json!({"id": id, "error": err})
            }
        };
        write_line(&mut out, &response)?;
    }

    tracing::info!("rpc server shutting down");
    Ok(())
}
