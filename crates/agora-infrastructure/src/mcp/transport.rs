//! Stdio transport for MCP servers.

use super::protocol::{JsonRpcRequest, JsonRpcResponse};
use agora_core::{AgoraError, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::process::Stdio;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::process::{Child, ChildStdin, Command};
use tokio::sync::{Mutex, oneshot};
use tracing::{debug, warn};

/// Spawns an MCP server subprocess and exchanges JSON-RPC messages with
/// it over stdin/stdout, one message per line.
///
/// A background task reads the child's stdout and routes each response
/// to the request waiting on its id. The child is killed when the
/// transport is dropped.
pub struct StdioTransport {
    next_id: AtomicU64,
    pending: Mutex<HashMap<u64, oneshot::Sender<JsonRpcResponse>>>,
    writer: Mutex<BufWriter<ChildStdin>>,
    _child: Mutex<Child>,
}

impl StdioTransport {
    pub fn spawn(command: &str, args: &[&str]) -> Result<Arc<Self>> {
        Self::spawn_with_env(command, args, &[])
    }

    pub fn spawn_with_env(
        command: &str,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> Result<Arc<Self>> {
        let mut cmd = Command::new(command);
        cmd.args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        for (key, value) in env {
            cmd.env(key, value);
        }

        let mut child = cmd
            .spawn()
            .map_err(|e| AgoraError::io(format!("failed to spawn MCP server '{command}': {e}")))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| AgoraError::internal("MCP server stdin unavailable"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| AgoraError::internal("MCP server stdout unavailable"))?;

        let transport = Arc::new(Self {
            next_id: AtomicU64::new(1),
            pending: Mutex::new(HashMap::new()),
            writer: Mutex::new(BufWriter::new(stdin)),
            _child: Mutex::new(child),
        });

        let reader_transport = Arc::clone(&transport);
        tokio::spawn(async move {
            let mut reader = BufReader::new(stdout);
            let mut line = String::new();
            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) | Err(_) => break,
                    Ok(_) => match serde_json::from_str::<JsonRpcResponse>(&line) {
                        Ok(response) => {
                            let mut pending = reader_transport.pending.lock().await;
                            if let Some(sender) = pending.remove(&response.id) {
                                let _ = sender.send(response);
                            }
                        }
                        Err(_) => {
                            // Server-initiated notifications and log lines
                            // are not responses; skip them.
                            debug!(line = line.trim(), "ignoring non-response line");
                        }
                    },
                }
            }
            warn!("MCP server stdout closed");
        });

        Ok(transport)
    }

    async fn write_message(&self, request: &JsonRpcRequest) -> Result<()> {
        let json = serde_json::to_string(request)?;
        let mut writer = self.writer.lock().await;
        writer
            .write_all(json.as_bytes())
            .await
            .map_err(|e| AgoraError::io(format!("failed to write to MCP server: {e}")))?;
        writer
            .write_all(b"\n")
            .await
            .map_err(|e| AgoraError::io(format!("failed to write to MCP server: {e}")))?;
        writer
            .flush()
            .await
            .map_err(|e| AgoraError::io(format!("failed to flush MCP server stdin: {e}")))?;
        Ok(())
    }

    /// Sends one request and waits for the matching response.
    pub async fn request(
        &self,
        method: &str,
        params: Option<Value>,
    ) -> Result<JsonRpcResponse> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut request = JsonRpcRequest::new(method, params);
        request.id = Some(id);

        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(id, tx);

        if let Err(e) = self.write_message(&request).await {
            self.pending.lock().await.remove(&id);
            return Err(e);
        }

        let response = rx
            .await
            .map_err(|_| AgoraError::internal("MCP server closed before responding"))?;

        if let Some(error) = &response.error {
            return Err(AgoraError::internal(format!(
                "MCP server error {}: {}",
                error.code, error.message
            )));
        }

        Ok(response)
    }

    /// Sends a notification; no response is expected.
    pub async fn notify(&self, method: &str) -> Result<()> {
        self.write_message(&JsonRpcRequest::notification(method)).await
    }
}
