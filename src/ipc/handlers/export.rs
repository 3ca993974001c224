use crate::export::{self, ExportError};
use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::types::{AppState, Request};
use serde_json::json;
use std::path::PathBuf;

fn handle_export_preview(state: &mut AppState) -> Result<serde_json::Value, HandlerErr> {
    let table = export::build_table(&state.roster);
    Ok(json!({
        "fileName": export::file_name(state.roster.title()),
        "columns": table.columns,
        "rows": table.rows,
    }))
}

fn handle_export_xlsx(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let out_dir = req
        .params
        .get("outDir")
        .and_then(|v| v.as_str())
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| state.export_dir.clone());

    let summary = match export::export_to_dir(&state.roster, &out_dir) {
        Ok(v) => v,
        Err(ExportError::Rejected(e)) => return Err(e.into()),
        Err(ExportError::Failed(e)) => {
            tracing::error!(error = ?e, "export failed");
            return Err(HandlerErr {
                code: "export_failed",
                message: format!("{e:?}"),
                details: Some(json!({ "outDir": out_dir.to_string_lossy() })),
            });
        }
    };

    Ok(json!({
        "path": summary.path.to_string_lossy(),
        "fileName": summary.file_name,
        "rowCount": summary.row_count,
        "columnCount": summary.column_count,
        "bytes": summary.bytes,
        "sha256": summary.sha256,
        "exportedAt": summary.exported_at,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let res = match req.method.as_str() {
        "export.preview" => handle_export_preview(state),
        "export.xlsx" => handle_export_xlsx(state, req),
        _ => return None,
    };
    Some(respond(&req.id, res))
}
