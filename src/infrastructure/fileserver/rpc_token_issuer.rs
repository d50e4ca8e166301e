use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::ports::fileserver_token_port::{AccessTokenRequest, FileserverTokenIssuer};

const RPC_SERVICE: &str = "seafserv-threaded-rpcserver";
const GET_ACCESS_TOKEN: &str = "seafile_web_get_access_token";

/// Talks to the file server's JSON-RPC endpoint over HTTP.
pub struct SearpcTokenIssuer {
    client: reqwest::Client,
    rpc_url: String,
    secret: Option<String>,
}

#[derive(Debug, Serialize)]
struct RpcCall<'a> {
    service: &'a str,
    method: &'a str,
    params: (&'a str, &'a str, &'a str, &'a str, i32),
    #[serde(skip_serializing_if = "Option::is_none")]
    check_virus: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RpcReply {
    #[serde(default)]
    ret: Option<serde_json::Value>,
    #[serde(default)]
    err_code: Option<i64>,
    #[serde(default)]
    err_msg: Option<String>,
}

impl<'a> RpcCall<'a> {
    fn access_token(req: &'a AccessTokenRequest) -> Self {
        Self {
            service: RPC_SERVICE,
            method: GET_ACCESS_TOKEN,
            params: (
                req.repo_id.as_str(),
                req.obj_id.as_str(),
                req.op.as_str(),
                req.username.as_str(),
                i32::from(req.use_onetime),
            ),
            check_virus: req.check_virus,
        }
    }
}

impl RpcReply {
    fn into_token(self) -> anyhow::Result<String> {
        if let Some(code) = self.err_code {
            anyhow::bail!(
                "rpc error {}: {}",
                code,
                self.err_msg.unwrap_or_else(|| "unknown".into())
            );
        }
        match self.ret {
            Some(serde_json::Value::String(token)) => Ok(token),
            Some(serde_json::Value::Null) | None => Ok(String::new()),
            Some(other) => anyhow::bail!("unexpected rpc return value: {other}"),
        }
    }
}

impl SearpcTokenIssuer {
    pub fn new(rpc_url: &str, secret: Option<String>, timeout_secs: u64) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .build()?;
        Ok(Self {
            client,
            rpc_url: rpc_url.to_string(),
            secret,
        })
    }
}

#[async_trait]
impl FileserverTokenIssuer for SearpcTokenIssuer {
    async fn get_fileserver_access_token(
        &self,
        req: &AccessTokenRequest,
    ) -> anyhow::Result<String> {
        let mut http = self.client.post(&self.rpc_url).json(&RpcCall::access_token(req));
        if let Some(secret) = self.secret.as_deref() {
            http = http.bearer_auth(secret);
        }
        let resp = http
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("request failed: {e}"))?;
        if !resp.status().is_success() {
            anyhow::bail!("file server returned status {}", resp.status());
        }
        let reply: RpcReply = resp
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("failed to decode rpc reply: {e}"))?;
        let token = reply.into_token()?;
        tracing::debug!(repo_id = %req.repo_id, op = %req.op, "fileserver_access_token_issued");
        Ok(token)
    }
}
