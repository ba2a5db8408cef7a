//! Request description and the live HTTP transport

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use super::envelope::Envelope;
use super::result::{ApiError, ApiResult};
use crate::config::TransportConfig;
use crate::error::Result;

/// A file attached to a multipart request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

/// Text fields plus files, sent as `multipart/form-data`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartPayload {
    pub fields: Vec<(String, String)>,
    pub files: Vec<FilePart>,
}

impl MultipartPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn file(
        mut self,
        field: impl Into<String>,
        file_name: impl Into<String>,
        mime: Option<&str>,
        bytes: Vec<u8>,
    ) -> Self {
        self.files.push(FilePart {
            field: field.into(),
            file_name: file_name.into(),
            mime: mime.map(str::to_string),
            bytes,
        });
        self
    }

    fn into_form(self) -> ApiResult<Form> {
        let mut form = Form::new();
        for (name, value) in self.fields {
            form = form.text(name, value);
        }
        for file in self.files {
            let mut part = Part::bytes(file.bytes).file_name(file.file_name);
            if let Some(mime) = file.mime {
                part = part
                    .mime_str(&mime)
                    .map_err(|e| ApiError::network(format!("Invalid content type: {}", e)))?;
            }
            form = form.part(file.field, part);
        }
        Ok(form)
    }

    /// JSON view handed to mock handlers; file contents are reduced to name and size
    pub fn to_params(&self) -> Value {
        let mut params = Map::new();
        for (name, value) in &self.fields {
            params.insert(name.clone(), Value::String(value.clone()));
        }
        let files: Vec<Value> = self
            .files
            .iter()
            .map(|f| {
                json!({
                    "field": f.field,
                    "fileName": f.file_name,
                    "size": f.bytes.len(),
                })
            })
            .collect();
        params.insert("files".to_string(), Value::Array(files));
        Value::Object(params)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Multipart(MultipartPayload),
}

impl Payload {
    /// Parameters as the mock router sees them
    pub fn to_params(&self) -> Value {
        match self {
            Payload::Json(Value::Null) => json!({}),
            Payload::Json(value) => value.clone(),
            Payload::Multipart(form) => form.to_params(),
        }
    }
}

/// How a logical operation should be sent
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    pub payload: Payload,
    pub requires_auth: bool,
}

impl RequestOptions {
    pub fn post(body: Value) -> Self {
        Self {
            method: Method::POST,
            payload: Payload::Json(body),
            requires_auth: false,
        }
    }

    pub fn get() -> Self {
        Self {
            method: Method::GET,
            payload: Payload::Json(json!({})),
            requires_auth: false,
        }
    }

    pub fn multipart(form: MultipartPayload) -> Self {
        Self {
            method: Method::POST,
            payload: Payload::Multipart(form),
            requires_auth: false,
        }
    }

    /// Attach the current session's bearer credential
    pub fn authenticated(mut self) -> Self {
        self.requires_auth = true;
        self
    }
}

fn is_empty_body(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Network transport talking to the real backend
#[derive(Debug, Clone)]
pub struct LiveTransport {
    client: Client,
    base_url: String,
}

impl LiveTransport {
    pub fn new(config: &TransportConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("ragdesk/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, &config.base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Perform one exchange and decode the envelope.
    ///
    /// The body is decoded whatever the HTTP status is, since the backend
    /// reports 401/403/500 inside the envelope as well.
    pub async fn exchange(
        &self,
        endpoint: &str,
        options: RequestOptions,
        bearer: Option<&str>,
    ) -> ApiResult<Envelope> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut request = self.client.request(options.method.clone(), &url);

        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        request = match options.payload {
            Payload::Json(body) => {
                if options.method == Method::GET || is_empty_body(&body) {
                    request
                } else {
                    request.json(&body)
                }
            }
            Payload::Multipart(form) => request.multipart(form.into_form()?),
        };

        let response = request.send().await.map_err(|e| {
            warn!(%url, "Request failed: {}", e);
            ApiError::network("Network request failed, please check your connection")
        })?;

        let status = response.status();
        let envelope = response.json::<Envelope>().await.map_err(|e| {
            warn!(%url, %status, "Malformed response: {}", e);
            ApiError::network("Malformed response from server")
        })?;

        debug!(%url, %status, code = envelope.status_code, "Envelope received");
        Ok(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multipart_params_summarize_files() {
        let form = MultipartPayload::new()
            .text("knowledgeBaseId", "kb_001")
            .file("file", "guide.pdf", Some("application/pdf"), vec![0u8; 42]);

        let params = Payload::Multipart(form).to_params();
        assert_eq!(params["knowledgeBaseId"], "kb_001");
        assert_eq!(params["files"][0]["fileName"], "guide.pdf");
        assert_eq!(params["files"][0]["size"], 42);
    }

    #[test]
    fn test_builder_defaults() {
        let options = RequestOptions::get();
        assert_eq!(options.method, Method::GET);
        assert!(!options.requires_auth);

        let options = RequestOptions::post(json!({"a": 1})).authenticated();
        assert!(options.requires_auth);
        assert_eq!(options.payload.to_params()["a"], 1);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let live = LiveTransport::with_client(Client::new(), "http://localhost:8000/");
        assert_eq!(live.base_url(), "http://localhost:8000");
    }
}
