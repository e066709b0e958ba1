//! Tool host: JSON-RPC 2.0 over newline-delimited stdio.
//!
//! Supports the tool-calling handshake used by agent frameworks: `initialize`, `ping`,
//! `tools/list` and `tools/call`. Notifications (messages without an `id`) never get a reply.

pub mod rpc;
pub mod tools;

use serde_json::{Value, json};
use std::io::{self, BufRead, Write};

use crate::logger::AUDIT_TARGET;
use crate::movies::MovieService;
use rpc::{
    INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR, RpcError, RpcRequest,
    RpcResponse,
};
use tools::{ToolError, call_tool, list_tools};

pub const SERVER_NAME: &str = "Movie Database";
pub const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &["2025-06-18", "2025-03-26", "2024-11-05"];

pub struct ToolServer {
    service: MovieService,
}

impl ToolServer {
    #[must_use]
    pub fn new(service: MovieService) -> Self {
        Self { service }
    }

    /// Reads requests line by line until EOF, writing one response line per request. A line that
    /// is not UTF-8 gets a parse error reply and the loop keeps going.
    ///
    /// # Errors
    /// Returns I/O errors from the underlying reader or writer.
    pub fn serve<R: BufRead, W: Write>(&self, mut reader: R, mut writer: W) -> io::Result<()> {
        log::info!("tool server ready on stdio");
        let mut buf = Vec::with_capacity(4 * 1024);
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let resp = match std::str::from_utf8(&buf) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => self.handle_line(line),
                Err(e) => {
                    log::warn!("rejecting non UTF-8 input: {e}");
                    Some(RpcResponse::failure(
                        Value::Null,
                        RpcError::new(PARSE_ERROR, format!("parse error: {e}")),
                    ))
                }
            };
            if let Some(resp) = resp {
                let out = serde_json::to_string(&resp).map_err(io::Error::other)?;
                writeln!(writer, "{out}")?;
                writer.flush()?;
            }
        }
        log::info!("stdin closed, tool server stopping");
        Ok(())
    }

    /// Handles one raw message. Returns `None` for notifications (no `id` member).
    #[must_use]
    pub fn handle_line(&self, line: &str) -> Option<RpcResponse> {
        let raw: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                return Some(RpcResponse::failure(
                    Value::Null,
                    RpcError::new(PARSE_ERROR, format!("parse error: {e}")),
                ));
            }
        };
        // A present `"id": null` still expects a reply; only an absent id marks a notification.
        let id = raw.get("id").cloned();
        let id_hint = id.clone().unwrap_or(Value::Null);
        let req: RpcRequest = match serde_json::from_value(raw) {
            Ok(r) => r,
            Err(e) => {
                return Some(RpcResponse::failure(
                    id_hint,
                    RpcError::new(INVALID_REQUEST, format!("invalid request: {e}")),
                ));
            }
        };
        if req.jsonrpc != "2.0" {
            return Some(RpcResponse::failure(
                id_hint,
                RpcError::new(INVALID_REQUEST, "jsonrpc must be \"2.0\""),
            ));
        }
        let Some(id) = id else {
            log::debug!("notification {}", req.method);
            return None;
        };
        Some(match self.dispatch(&req.method, req.params) {
            Ok(result) => RpcResponse::success(id, result),
            Err(err) => RpcResponse::failure(id, err),
        })
    }

    fn dispatch(&self, method: &str, params: Option<Value>) -> Result<Value, RpcError> {
        match method {
            "initialize" => Ok(initialize_result(params.as_ref())),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": list_tools() })),
            "tools/call" => self.tools_call(params),
            other => Err(RpcError::new(METHOD_NOT_FOUND, format!("method not found: {other}"))),
        }
    }

    fn tools_call(&self, params: Option<Value>) -> Result<Value, RpcError> {
        let params = params.unwrap_or(Value::Null);
        let Some(name) = params.get("name").and_then(Value::as_str) else {
            return Err(RpcError::new(INVALID_PARAMS, "tools/call requires a tool name"));
        };
        let started = std::time::Instant::now();
        let outcome = call_tool(&self.service, name, params.get("arguments").cloned());
        let elapsed_ms = started.elapsed().as_millis();
        match outcome {
            Ok(value) => {
                log::info!(target: AUDIT_TARGET, "tool={name} outcome=ok duration_ms={elapsed_ms}");
                Ok(tool_result(&value, false))
            }
            Err(ToolError::Failed(e)) => {
                log::warn!(target: AUDIT_TARGET, "tool={name} outcome=error duration_ms={elapsed_ms} error={e}");
                Ok(tool_result(&Value::String(e.to_string()), true))
            }
            Err(e) => {
                log::warn!(target: AUDIT_TARGET, "tool={name} outcome=rejected error={e}");
                Err(RpcError::new(INVALID_PARAMS, e.to_string()))
            }
        }
    }
}

fn initialize_result(params: Option<&Value>) -> Value {
    let requested = params.and_then(|p| p.get("protocolVersion")).and_then(Value::as_str);
    let version = requested
        .filter(|v| SUPPORTED_PROTOCOL_VERSIONS.contains(v))
        .unwrap_or(SUPPORTED_PROTOCOL_VERSIONS[0]);
    json!({
        "protocolVersion": version,
        "capabilities": { "tools": { "listChanged": false } },
        "serverInfo": { "name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION") },
    })
}

// Text content carries the JSON rendering; structured content wraps it so it is always an object.
fn tool_result(value: &Value, is_error: bool) -> Value {
    let text = match value {
        Value::String(s) if is_error => s.clone(),
        v => v.to_string(),
    };
    let mut out = json!({
        "content": [{ "type": "text", "text": text }],
        "isError": is_error,
    });
    if !is_error {
        out["structuredContent"] = json!({ "result": value });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_negotiates_version() {
        let v = initialize_result(Some(&json!({"protocolVersion": "2024-11-05"})));
        assert_eq!(v["protocolVersion"], "2024-11-05");
        let v = initialize_result(Some(&json!({"protocolVersion": "1999-01-01"})));
        assert_eq!(v["protocolVersion"], SUPPORTED_PROTOCOL_VERSIONS[0]);
        assert_eq!(v["serverInfo"]["name"], SERVER_NAME);
    }

    #[test]
    fn tool_result_shapes() {
        let ok = tool_result(&json!(3), false);
        assert_eq!(ok["content"][0]["text"], "3");
        assert_eq!(ok["structuredContent"]["result"], 3);
        let err = tool_result(&json!("Store error: down"), true);
        assert_eq!(err["content"][0]["text"], "Store error: down");
        assert_eq!(err["isError"], true);
        assert!(err.get("structuredContent").is_none());
    }
}
