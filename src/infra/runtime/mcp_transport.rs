//! Line-delimited JSON-RPC transport (stdio mode), sharing the HTTP dispatcher.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::api::mcp::{Dispatched, Dispatcher};
use crate::infra::http::json as http_json;

/// One response line per request; notifications and blank lines produce nothing.
/// Lines are decoded as raw bytes, so a line that is not UTF-8 gets a parse error
/// reply and the session carries on.
pub async fn serve_lines<R, W>(dispatcher: &Dispatcher, reader: R, mut writer: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.split(b'\n');
    while let Some(line) = lines.next_segment().await? {
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        let resp = match serde_json::from_slice::<serde_json::Value>(&line) {
            Ok(msg) => match dispatcher.dispatch(msg).await {
                Dispatched::NoContent => continue,
                Dispatched::Reply(reply) => reply.body,
            },
            Err(e) => http_json::parse_error(format!("parse error: {e}")).0,
        };
        let mut s = serde_json::to_string(&resp)?;
        s.push('\n');
        writer.write_all(s.as_bytes()).await?;
        writer.flush().await?;
    }
    Ok(())
}

pub async fn serve_stdio(dispatcher: Dispatcher) -> anyhow::Result<()> {
    tracing::info!("mode=stdio");
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    serve_lines(&dispatcher, stdin, stdout).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::config::Config;
    use crate::infra::http_app::build_dispatcher;
    use serde_json::Value;

    async fn run(input: &str) -> Vec<Value> {
        let d = build_dispatcher(&Config::default());
        let mut out: Vec<u8> = Vec::new();
        serve_lines(&d, input.as_bytes(), &mut out).await.unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn answers_requests_and_skips_notifications() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize"}"#, "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#, "\n",
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"ping"}"#, "\n",
        );
        let out = run(input).await;
        assert_eq!(out.len(), 2);
        assert_eq!(out[0]["result"]["protocolVersion"], "2025-11-25");
        assert_eq!(out[1]["id"], 2);
    }

    #[tokio::test]
    async fn malformed_line_yields_parse_error() {
        let out = run("{ not-json }\n").await;
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["error"]["code"], -32700);
        assert!(out[0]["id"].is_null());
    }

    #[tokio::test]
    async fn invalid_utf8_line_does_not_end_the_session() {
        let d = build_dispatcher(&Config::default());
        let mut input: Vec<u8> = b"\xff\xfe\n".to_vec();
        input.extend_from_slice(b"{\"jsonrpc\":\"2.0\",\"id\":7,\"method\":\"ping\"}\r\n");
        let mut out: Vec<u8> = Vec::new();
        serve_lines(&d, input.as_slice(), &mut out).await.unwrap();
        let replies: Vec<Value> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0]["error"]["code"], -32700);
        assert_eq!(replies[1]["id"], 7);
        assert_eq!(replies[1]["result"], serde_json::json!({}));
    }
}
