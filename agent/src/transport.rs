//! Blocking HTTP transport for the core.
//!
//! Non-2xx statuses are returned as data so the core's parsers decide what
//! they mean. Timeouts are ureq's defaults.

use homework_core::{Error, HttpMethod, HttpRequest, HttpResponse, Transport};
use tracing::debug;

pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, req: &HttpRequest) -> Result<HttpResponse, Error> {
        debug!(method = ?req.method, url = %redact(&req.path), "sending request");
        let result = match req.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&req.path);
                for (name, value) in &req.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post => {
                let mut builder = self.agent.post(&req.path);
                for (name, value) in &req.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                match &req.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result.map_err(|e| Error::connection(format!("{}: {e}", redact(&req.path))))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| Some((name.to_string(), value.to_str().ok()?.to_string())))
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| Error::connection(format!("reading response body: {e}")))?;
        debug!(status, "response received");

        Ok(HttpResponse { status, headers, body })
    }
}

/// Hide the bot token that the bot API carries in its URL path.
fn redact(url: &str) -> String {
    match url.find("/bot") {
        Some(start) => {
            let rest = &url[start + 4..];
            let end = rest.find('/').unwrap_or(rest.len());
            format!("{}/bot***{}", &url[..start], &rest[end..])
        }
        None => url.to_string(),
    }
}
