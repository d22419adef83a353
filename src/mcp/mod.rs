// SPDX-License-Identifier: MIT OR Apache-2.0

//! MCP server support for simgrep (stdio JSON-RPC).

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use simgrep::output::to_json;
use simgrep::query::runner::ToolRunner;
use simgrep::query::search::{self, SearchRequest};

const PROTOCOL_VERSION: &str = "2024-11-05";

const HARNESS_INSTRUCTIONS: &str = "\
simgrep MCP harness (semantic search only).\n\
\n\
semantic_search scores lines by word-embedding similarity to the query, so it\n\
finds text that means the same thing even when the words differ.\n\
\n\
Recommended workflow:\n\
1) semantic_search with recursive=true over a directory to find candidates\n\
2) read the reported file:line locations with your host's read tool\n\
3) locate_text to find every exact occurrence of a line you already know\n\
\n\
Harness rules:\n\
- Phrase queries as a few content words, not regular expressions.\n\
- Raise threshold (e.g. 0.8) when results are noisy; lower it when empty.\n\
- Narrow scope with path and glob early to keep responses small.\n\
\n\
This server is read/search oriented; it does not mutate files.";

pub fn run(runner: ToolRunner) -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    tracing::info!("mcp server ready");

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let req = match serde_json::from_str::<JsonRpcRequest>(&line) {
            Ok(req) => req,
            Err(err) => {
                write_error(&mut stdout, None, -32700, &format!("parse error: {}", err))?;
                continue;
            }
        };

        // JSON-RPC notifications have no id; no response needed.
        if req.id.is_none() {
            continue;
        }

        let resp = handle_request(&req, &runner);
        serde_json::to_writer(&mut stdout, &resp)?;
        stdout.write_all(b"\n")?;
        stdout.flush()?;
    }

    Ok(())
}

#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    #[serde(rename = "jsonrpc")]
    _jsonrpc: String,
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: &'static str,
    id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

impl JsonRpcResponse {
    fn ok(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }
}

fn handle_request(req: &JsonRpcRequest, runner: &ToolRunner) -> JsonRpcResponse {
    tracing::debug!(method = %req.method, "mcp request");
    match req.method.as_str() {
        "initialize" => JsonRpcResponse::ok(
            req.id.clone(),
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": "simgrep",
                    "version": env!("CARGO_PKG_VERSION")
                },
                "instructions": HARNESS_INSTRUCTIONS
            }),
        ),
        "ping" => JsonRpcResponse::ok(req.id.clone(), json!({})),
        "tools/list" => JsonRpcResponse::ok(
            req.id.clone(),
            json!({
                "tools": tool_definitions()
            }),
        ),
        "tools/call" => handle_tool_call(req, runner),
        _ => JsonRpcResponse {
            jsonrpc: "2.0",
            id: req.id.clone(),
            result: None,
            error: Some(JsonRpcError {
                code: -32601,
                message: format!("method not found: {}", req.method),
            }),
        },
    }
}

fn handle_tool_call(req: &JsonRpcRequest, runner: &ToolRunner) -> JsonRpcResponse {
    let params = &req.params;
    let tool_name = params
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let args = params.get("arguments").unwrap_or(&Value::Null);

    let result = match dispatch_tool(tool_name, args, runner) {
        Ok(output) => json!({
            "content": [{
                "type": "text",
                "text": output
            }]
        }),
        Err(err) => {
            tracing::debug!(tool = tool_name, "tool call failed: {}", err);
            json!({
                "content": [{
                    "type": "text",
                    "text": err
                }],
                "isError": true
            })
        }
    };
    JsonRpcResponse::ok(req.id.clone(), result)
}

fn dispatch_tool(tool: &str, args: &Value, runner: &ToolRunner) -> Result<String, String> {
    match tool {
        "semantic_search" => tool_semantic_search(args, runner),
        "locate_text" => tool_locate_text(args, runner),
        _ => Err(format!("unknown tool: {}", tool)),
    }
}

fn tool_semantic_search(args: &Value, runner: &ToolRunner) -> Result<String, String> {
    let query = required_str(args, "query")?;
    let path = required_str(args, "path")?;
    let request = SearchRequest {
        query: query.to_string(),
        path: resolve_in_cwd(args, path),
        recursive: opt_bool(args, "recursive"),
        glob: opt_str(args, "glob").map(str::to_string),
        threshold: opt_f64(args, "threshold"),
        context: opt_u64(args, "context").map(|v| v as usize),
        max_results: opt_u64(args, "limit").map(|v| v as usize),
    };

    let result = search::search(runner, &request).map_err(|e| format!("{:#}", e))?;
    to_json(&result, true).map_err(|e| e.to_string())
}

fn tool_locate_text(args: &Value, runner: &ToolRunner) -> Result<String, String> {
    let text = required_str(args, "text")?;
    let path = required_str(args, "path")?;
    let locations = search::locate(
        runner,
        text,
        &resolve_in_cwd(args, path),
        opt_str(args, "glob"),
        opt_u64(args, "context").map(|v| v as usize),
    )
    .map_err(|e| format!("{:#}", e))?;
    to_json(&locations, true).map_err(|e| e.to_string())
}

fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str, String> {
    args.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| format!("missing required parameter: {}", key))
}

fn opt_str<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.trim().is_empty())
}

fn opt_u64(args: &Value, key: &str) -> Option<u64> {
    args.get(key).and_then(Value::as_u64)
}

fn opt_f64(args: &Value, key: &str) -> Option<f64> {
    args.get(key).and_then(Value::as_f64)
}

fn opt_bool(args: &Value, key: &str) -> bool {
    args.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// Relative paths resolve against `cwd` when the caller supplies one
fn resolve_in_cwd(args: &Value, path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    match opt_str(args, "cwd") {
        Some(cwd) if path.is_relative() => PathBuf::from(cwd).join(path),
        _ => path,
    }
}

fn tool_definitions() -> Vec<Value> {
    vec![
        json!({
            "name": "semantic_search",
            "description": "Find lines semantically similar to the query using word-embedding similarity. With recursive=true, searches every file under path and attaches exact file:line locations to each match.",
            "inputSchema": {
                "type": "object",
                "required": ["query", "path"],
                "properties": {
                    "query": { "type": "string" },
                    "path": { "type": "string" },
                    "cwd": { "type": "string" },
                    "recursive": { "type": "boolean" },
                    "glob": { "type": "string" },
                    "threshold": { "type": "number", "minimum": 0, "maximum": 1 },
                    "context": { "type": "number" },
                    "limit": { "type": "number" }
                }
            }
        }),
        json!({
            "name": "locate_text",
            "description": "Find every exact occurrence of a literal line of text, with file, line, and surrounding context.",
            "inputSchema": {
                "type": "object",
                "required": ["text", "path"],
                "properties": {
                    "text": { "type": "string" },
                    "path": { "type": "string" },
                    "cwd": { "type": "string" },
                    "glob": { "type": "string" },
                    "context": { "type": "number" }
                }
            }
        }),
    ]
}

fn write_error(w: &mut impl Write, id: Option<Value>, code: i32, message: &str) -> io::Result<()> {
    let resp = JsonRpcResponse {
        jsonrpc: "2.0",
        id,
        result: None,
        error: Some(JsonRpcError {
            code,
            message: message.to_string(),
        }),
    };
    serde_json::to_writer(&mut *w, &resp)?;
    w.write_all(b"\n")?;
    w.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(method: &str, params: Value) -> JsonRpcRequest {
        JsonRpcRequest {
            _jsonrpc: "2.0".to_string(),
            id: Some(json!(1)),
            method: method.to_string(),
            params,
        }
    }

    #[test]
    fn unknown_method_is_a_jsonrpc_error() {
        let resp = handle_request(&request("nope", Value::Null), &ToolRunner::default());
        assert_eq!(resp.error.as_ref().map(|e| e.code), Some(-32601));
        assert!(resp.result.is_none());
    }

    #[test]
    fn missing_argument_is_a_tool_error() {
        let resp = handle_request(
            &request(
                "tools/call",
                json!({ "name": "semantic_search", "arguments": { "path": "." } }),
            ),
            &ToolRunner::default(),
        );
        let result = resp.result.expect("result");
        assert_eq!(result["isError"], true);
        assert_eq!(
            result["content"][0]["text"],
            "missing required parameter: query"
        );
    }

    #[test]
    fn cwd_joins_relative_paths_only() {
        let args = json!({ "cwd": "/work" });
        assert_eq!(resolve_in_cwd(&args, "src"), PathBuf::from("/work/src"));
        assert_eq!(resolve_in_cwd(&args, "/abs"), PathBuf::from("/abs"));
        assert_eq!(resolve_in_cwd(&Value::Null, "src"), PathBuf::from("src"));
    }
}
