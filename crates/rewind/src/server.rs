//! JSON-lines tool server.
//!
//! Each input line is a request `{"id": .., "tool": "<id>", "args": {..}}`.
//! Each request gets exactly one response line, in request order:
//! `{"id": .., "ok": true, "title", "output", "metadata"}` or
//! `{"id": .., "ok": false, "error": "<message>"}`.

use rewind_tools::{ToolContext, ToolRegistry};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct Request {
    #[serde(default)]
    id: Value,
    tool: String,
    #[serde(default)]
    args: Value,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Response {
    Success {
        id: Value,
        ok: bool,
        title: String,
        output: String,
        metadata: Value,
    },
    Failure {
        id: Value,
        ok: bool,
        error: String,
    },
}

impl Response {
    fn failure(id: Value, error: impl Into<String>) -> Self {
        Self::Failure {
            id,
            ok: false,
            error: error.into(),
        }
    }
}

/// Serve requests from `reader` until end of input.
pub async fn serve<R, W>(
    tools: &ToolRegistry,
    ctx: &ToolContext,
    reader: R,
    mut writer: W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let response = handle_line(tools, ctx, &line).await;
        let mut encoded = serde_json::to_string(&response)?;
        encoded.push('\n');
        writer.write_all(encoded.as_bytes()).await?;
        writer.flush().await?;
    }

    debug!("Input closed");
    Ok(())
}

async fn handle_line(tools: &ToolRegistry, ctx: &ToolContext, line: &str) -> Response {
    let request: Request = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Malformed request");
            return Response::failure(Value::Null, format!("Invalid request: {e}"));
        }
    };

    match tools.execute(&request.tool, request.args, ctx).await {
        Ok(output) => Response::Success {
            id: request.id,
            ok: true,
            title: output.title,
            output: output.output,
            metadata: output.metadata,
        },
        Err(e) => {
            debug!(tool = %request.tool, error = %e, "Tool failed");
            Response::failure(request.id, e.to_string())
        }
    }
}
