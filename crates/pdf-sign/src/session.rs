//! Backend session: login state, upload and document fetch
//!
//! All calls block; async callers run them on `spawn_blocking`.

use crate::constants::*;
use crate::types::*;
use serde::Deserialize;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Where the document being signed lives
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocumentRef {
    /// URL of a document stored by the backend
    Remote(String),
    /// Local file, viewable but not signable until uploaded
    Local(PathBuf),
}

impl DocumentRef {
    pub fn remote_url(&self) -> Option<&str> {
        match self {
            DocumentRef::Remote(url) => Some(url),
            DocumentRef::Local(_) => None,
        }
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentRef::Remote(url) => f.write_str(url),
            DocumentRef::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    LoggedOut,
    LoggedIn { email: String },
}

#[derive(Deserialize)]
struct AuthEnvelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    file_path: String,
}

/// Explicit session with the signing backend. Cookies set by the backend at
/// login are kept by the agent and sent with every later request.
#[derive(Clone)]
pub struct Session {
    base_url: String,
    agent: ureq::Agent,
    state: SessionState,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url)
            .field("state", &self.state)
            .finish()
    }
}

impl Session {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let agent = ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build();
        Self {
            base_url,
            agent,
            state: SessionState::LoggedOut,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self.state, SessionState::LoggedIn { .. })
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn agent(&self) -> &ureq::Agent {
        &self.agent
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<()> {
        let response = self
            .agent
            .post(&self.endpoint(LOGIN_ENDPOINT))
            .send_json(serde_json::json!({ "email": email, "password": password }))
            .map_err(|e| SignError::Auth(describe(e)))?;
        let envelope: AuthEnvelope = response
            .into_json()
            .map_err(|e| SignError::Auth(format!("unreadable response: {e}")))?;

        if !envelope.success {
            return Err(SignError::Auth(
                envelope.message.unwrap_or_else(|| "login rejected".to_string()),
            ));
        }
        log::info!("Logged in as {}", email);
        self.state = SessionState::LoggedIn {
            email: email.to_string(),
        };
        Ok(())
    }

    /// End the session. The local state is logged out even if the backend
    /// cannot be reached.
    pub fn logout(&mut self) {
        if let Err(e) = self.agent.post(&self.endpoint(LOGOUT_ENDPOINT)).call() {
            log::warn!("Logout request failed: {}", describe(e));
        }
        self.state = SessionState::LoggedOut;
    }

    /// Upload a PDF and return the backend's reference to it
    pub fn upload(&self, path: &Path) -> Result<DocumentRef> {
        if !self.is_logged_in() {
            return Err(SignError::NotLoggedIn);
        }
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document.pdf");

        let boundary = format!("pdf-sign-{}", uuid::Uuid::new_v4().simple());
        let body = multipart_body(&boundary, UPLOAD_FIELD, file_name, &bytes);
        let response = self
            .agent
            .post(&self.endpoint(UPLOAD_ENDPOINT))
            .set(
                "Content-Type",
                &format!("multipart/form-data; boundary={boundary}"),
            )
            .send_bytes(&body)
            .map_err(|e| SignError::Upload(describe(e)))?;
        let uploaded: UploadResponse = response
            .into_json()
            .map_err(|e| SignError::Upload(format!("unreadable response: {e}")))?;

        log::info!("Uploaded {} as {}", path.display(), uploaded.file_path);
        Ok(DocumentRef::Remote(self.endpoint(&uploaded.file_path)))
    }

    /// Download (or read) the document bytes
    pub fn fetch_document(&self, doc: &DocumentRef) -> Result<Vec<u8>> {
        match doc {
            DocumentRef::Local(path) => std::fs::read(path)
                .map_err(|e| SignError::DocumentLoad(format!("{}: {e}", path.display()))),
            DocumentRef::Remote(url) => {
                let response = self
                    .agent
                    .get(url)
                    .call()
                    .map_err(|e| SignError::DocumentLoad(describe(e)))?;
                let mut bytes = Vec::new();
                response
                    .into_reader()
                    .read_to_end(&mut bytes)
                    .map_err(|e| SignError::DocumentLoad(e.to_string()))?;
                Ok(bytes)
            }
        }
    }
}

pub(crate) fn describe(error: ureq::Error) -> String {
    match error {
        ureq::Error::Status(code, response) => {
            format!("server responded {} {}", code, response.status_text())
        }
        ureq::Error::Transport(transport) => transport.to_string(),
    }
}

/// Percent-encode the characters that would end a quoted header parameter,
/// as browsers do for multipart file names
fn quote_file_name(name: &str) -> String {
    let mut quoted = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '"' => quoted.push_str("%22"),
            '\r' => quoted.push_str("%0D"),
            '\n' => quoted.push_str("%0A"),
            c => quoted.push(c),
        }
    }
    quoted
}

fn multipart_body(boundary: &str, field: &str, file_name: &str, bytes: &[u8]) -> Vec<u8> {
    let file_name = quote_file_name(file_name);
    let mut body = Vec::with_capacity(bytes.len() + 256);
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: application/pdf\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multipart_wraps_file_in_boundaries() {
        let body = multipart_body("xyz", "pdf", "a.pdf", b"%PDF-1.4");
        let text = String::from_utf8(body).unwrap();
        assert!(text.starts_with("--xyz\r\n"));
        assert!(text.contains("name=\"pdf\"; filename=\"a.pdf\""));
        assert!(text.contains("\r\n\r\n%PDF-1.4\r\n"));
        assert!(text.ends_with("--xyz--\r\n"));
    }

    #[test]
    fn multipart_file_name_cannot_break_header() {
        let body = multipart_body("xyz", "pdf", "a\"b\r\nX-Extra: 1.pdf", b"%PDF");
        let text = String::from_utf8(body).unwrap();
        assert!(text.contains("filename=\"a%22b%0D%0AX-Extra: 1.pdf\"\r\n"));
        assert!(!text.contains("\r\nX-Extra"));
    }

    #[test]
    fn upload_requires_login() {
        let session = Session::new("http://127.0.0.1:9");
        assert!(matches!(
            session.upload(Path::new("missing.pdf")),
            Err(SignError::NotLoggedIn)
        ));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let session = Session::new("http://localhost:4000/");
        assert_eq!(session.endpoint(SIGN_ENDPOINT), "http://localhost:4000/api/sign-pdf");
    }
}
