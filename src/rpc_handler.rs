//! RPC method handler for the Marktables JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! `handle_method` dispatches one call to the bookmark manager held by `App`.

use std::collections::HashMap;

use serde_json::{json, Value};

use crate::app::App;
use crate::database::Row;
use crate::managers::bookmark_manager::{record_from_row, BookmarkManagerTrait};
use crate::services::bookmark_id::bookmark_id;
use crate::types::bookmark::{FOLDERS_ROOT, NewBookmark};

fn str_param<'p>(params: &'p Value, name: &str) -> Result<&'p str, String> {
    params
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", name))
}

fn rows_to_json(rows: &[Row]) -> Value {
    json!(rows.iter().map(record_from_row).collect::<Vec<_>>())
}

/// Reads the string map of a `bookmark.upsert` call.
fn upsert_fields(fields: &Value) -> Result<HashMap<String, String>, String> {
    let map = fields.as_object().ok_or("fields must be an object")?;
    let mut out = HashMap::with_capacity(map.len());
    for (key, value) in map {
        let value = value
            .as_str()
            .ok_or_else(|| format!("field {} must be a string", key))?;
        out.insert(key.clone(), value.to_string());
    }
    Ok(out)
}

/// Picks the target of a get or delete: `id` wins over `url`.
fn id_or_url(params: &Value) -> Result<(Option<&str>, Option<&str>), String> {
    let id = params.get("id").and_then(|v| v.as_str());
    let url = params.get("url").and_then(|v| v.as_str());
    if id.is_none() && url.is_none() {
        return Err("missing id or url".to_string());
    }
    Ok((id, url))
}

/// Dispatch a JSON-RPC method call to the bookmark manager.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub fn handle_method(app: &App, method: &str, params: &Value) -> Result<Value, String> {
    let mgr = &app.bookmarks;
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Bookmarks ───
        "bookmark.upsert" => {
            let user = str_param(params, "user")?;
            let import = params
                .get("import")
                .and_then(|v| v.as_bool())
                .unwrap_or_else(|| app.default_import_mode());
            // Either a raw field map or a typed bookmark
            let url = if let Some(fields) = params.get("fields") {
                let fields = upsert_fields(fields)?;
                mgr.upsert(user, &fields, import).map_err(|e| e.to_string())?;
                fields.get("url").cloned().unwrap_or_default()
            } else {
                let bookmark = params.get("bookmark").ok_or("missing fields")?;
                let bookmark: NewBookmark = serde_json::from_value(bookmark.clone())
                    .map_err(|e| format!("invalid bookmark: {}", e))?;
                mgr.upsert_record(user, &bookmark, import).map_err(|e| e.to_string())?;
                bookmark.url
            };
            let id = bookmark_id(&url).map_err(|e| e.to_string())?;
            Ok(json!({"id": id}))
        }
        "bookmark.get" => {
            let user = str_param(params, "user")?;
            let record = match id_or_url(params)? {
                (Some(id), _) => mgr.get_bookmark(user, id),
                (None, url) => mgr.get_bookmark_by_url(user, url.unwrap_or_default()),
            };
            Ok(json!(record.map_err(|e| e.to_string())?))
        }
        "bookmark.delete" => {
            let user = str_param(params, "user")?;
            let result = match id_or_url(params)? {
                (Some(id), _) => mgr.delete_by_id(user, id),
                (None, url) => mgr.delete_by_url(user, url.unwrap_or_default()),
            };
            result.map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "bookmark.rename" => {
            let user = str_param(params, "user")?;
            let old_url = str_param(params, "old_url")?;
            let new_url = str_param(params, "new_url")?;
            let id = mgr.rename_url(user, old_url, new_url).map_err(|e| e.to_string())?;
            Ok(json!({"id": id}))
        }
        "bookmark.by_folder" => {
            let user = str_param(params, "user")?;
            let folder = str_param(params, "folder")?;
            let rows = mgr.bookmarks_by_folder(user, folder).map_err(|e| e.to_string())?;
            Ok(rows_to_json(&rows))
        }
        "bookmark.by_tags" => {
            let user = str_param(params, "user")?;
            let tags: Vec<String> = params
                .get("tags")
                .and_then(|v| v.as_array())
                .ok_or("missing tags")?
                .iter()
                .filter_map(|t| t.as_str().map(str::to_string))
                .collect();
            let rows = mgr.bookmarks_by_tags(user, &tags).map_err(|e| e.to_string())?;
            Ok(rows_to_json(&rows))
        }

        // ─── Folders ───
        "folders.list" => {
            let user = str_param(params, "user")?;
            let root = params.get("root").and_then(|v| v.as_str()).unwrap_or(FOLDERS_ROOT);
            let folders = mgr.resolve_folders(user, root).map_err(|e| e.to_string())?;
            Ok(json!(folders))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
