use super::error::{excerpt, PortalError, EXCERPT_CHARS};
use super::types::{
    Envelope, HomeworkListBody, HomeworkSummary, LoginBody, LoginOutcome, LoginRequest,
    SubmissionRequest, SubmitBody, SubmitReceipt,
};
use crate::config::{PortalConfig, TimeoutConfig};
use reqwest::header::COOKIE;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

/// HTTP client for the grading portal's screen API
pub struct PortalClient {
    http_client: Client,
    portal: PortalConfig,
    timeouts: TimeoutConfig,
}

impl PortalClient {
    pub fn new(portal: &PortalConfig, timeouts: &TimeoutConfig) -> Result<Self, PortalError> {
        let http_client = Client::builder()
            .user_agent(concat!("hwsubmit/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(PortalError::Client)?;

        Ok(Self {
            http_client,
            portal: portal.clone(),
            timeouts: *timeouts,
        })
    }

    /// Exchange a screen id and password for a session token
    pub async fn login(&self, screen_id: &str, password: &str) -> Result<LoginOutcome, PortalError> {
        let url = self.endpoint(&self.portal.login_path, None)?;
        info!("Logging in screen {} at {}", screen_id, url);

        let response = self
            .http_client
            .post(url)
            .timeout(self.timeouts.login())
            .json(&LoginRequest {
                screen_id,
                password,
            })
            .send()
            .await
            .map_err(|e| PortalError::from_send(e, self.timeouts.login_secs))?;

        // The portal may only hand the token out as a cookie
        let cookie_token = cookie_value(&response, &self.portal.login_cookie);
        let (status, envelope) =
            read_envelope::<LoginBody>(response, self.timeouts.login_secs).await?;
        let envelope = accept(status, envelope)?;

        let token = envelope
            .body
            .token
            .filter(|t| !t.is_empty())
            .or(cookie_token);
        match &token {
            Some(t) => debug!("Login returned token {}", token_preview(t)),
            None => warn!("Login succeeded but no session token was issued"),
        }

        Ok(LoginOutcome { token })
    }

    /// Fetch the homework currently open for submission
    pub async fn list_homeworks(&self, token: &str) -> Result<Vec<HomeworkSummary>, PortalError> {
        let url = self.endpoint(&self.portal.homework_path, Some(&self.portal.list_action))?;
        info!("Fetching homework list from {}", url);
        debug!("Session token: {}", token_preview(token));

        let response = self
            .http_client
            .get(url)
            .timeout(self.timeouts.list())
            .header(COOKIE, self.session_cookie(token))
            .send()
            .await
            .map_err(|e| PortalError::from_send(e, self.timeouts.list_secs))?;

        let (status, envelope) =
            read_envelope::<HomeworkListBody>(response, self.timeouts.list_secs).await?;
        let homeworks = accept(status, envelope)?.body.into_homeworks();
        info!("Portal returned {} homework(s)", homeworks.len());
        Ok(homeworks)
    }

    /// Upload one submission as a multipart form
    pub async fn submit_homework(
        &self,
        token: &str,
        request: &SubmissionRequest,
    ) -> Result<SubmitReceipt, PortalError> {
        let url = self.endpoint(&self.portal.homework_path, Some(&self.portal.submit_action))?;

        let bytes = tokio::fs::read(&request.file)
            .await
            .map_err(|source| PortalError::File {
                path: request.file.display().to_string(),
                source,
            })?;
        let file_name = request
            .file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "submission".to_string());
        let content_type = self.portal.content_type.content_type_for(&request.file);

        info!(
            "Submitting {} ({} bytes, {}) for homework {} student {}",
            file_name,
            bytes.len(),
            content_type,
            request.homework_id,
            request.student_id
        );

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(content_type)
            .map_err(PortalError::Transport)?;
        let form = Form::new()
            .text("student_id", request.student_id.clone())
            .text("homework_id", request.homework_id.clone())
            .text("screen_id", request.screen_id.clone())
            .part("submission_file", part);

        let response = self
            .http_client
            .post(url)
            .timeout(self.timeouts.submit())
            .header(COOKIE, self.session_cookie(token))
            .multipart(form)
            .send()
            .await
            .map_err(|e| PortalError::from_send(e, self.timeouts.submit_secs))?;

        let (status, envelope) =
            read_envelope::<SubmitBody>(response, self.timeouts.submit_secs).await?;
        let envelope = accept(status, envelope)?;

        Ok(SubmitReceipt {
            message: envelope.message,
            submitted_at: chrono::Local::now(),
        })
    }

    fn session_cookie(&self, token: &str) -> String {
        format!("{}={}", self.portal.token_cookie, token)
    }

    fn endpoint(&self, path: &str, action: Option<&str>) -> Result<Url, PortalError> {
        let raw = format!(
            "{}/{}",
            self.portal.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let mut url = Url::parse(&raw).map_err(|e| PortalError::Url {
            url: raw.clone(),
            reason: e.to_string(),
        })?;
        if let Some(action) = action {
            url.query_pairs_mut().append_pair("action", action);
        }
        Ok(url)
    }
}

/// Read the body and decode the envelope. A body that isn't JSON at all is
/// reported with a short excerpt so HTML error pages stay readable.
async fn read_envelope<T: DeserializeOwned>(
    response: Response,
    timeout_secs: u64,
) -> Result<(StatusCode, Envelope<T>), PortalError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| PortalError::from_send(e, timeout_secs))?;

    let value: serde_json::Value = match serde_json::from_str(&body) {
        Ok(value) => value,
        Err(err) => {
            warn!("Non-JSON response ({}): {}", status, err);
            return Err(PortalError::NonJson {
                status,
                excerpt: excerpt(&body, EXCERPT_CHARS),
            });
        }
    };
    let envelope = serde_json::from_value(value)?;
    Ok((status, envelope))
}

/// Success needs both HTTP 200 and `status: "success"`.
fn accept<T>(status: StatusCode, envelope: Envelope<T>) -> Result<Envelope<T>, PortalError> {
    if status == StatusCode::OK && envelope.is_success() {
        Ok(envelope)
    } else {
        warn!(
            "Portal rejected request ({}): {}",
            status,
            envelope.message.as_deref().unwrap_or("<no message>")
        );
        Err(PortalError::Rejected {
            status,
            message: envelope.message,
        })
    }
}

/// Value of cookie `name` set by the response, if it isn't blank.
fn cookie_value(response: &Response, name: &str) -> Option<String> {
    response
        .cookies()
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().trim().to_string())
        .filter(|value| !value.is_empty())
}

fn token_preview(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        "***".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> PortalClient {
        let portal = PortalConfig {
            base_url: base_url.to_string(),
            ..PortalConfig::default()
        };
        PortalClient::new(&portal, &TimeoutConfig::default()).unwrap()
    }

    #[test]
    fn test_endpoint_joins_paths_and_action() {
        let client = client("http://portal.test/system/");
        let url = client.endpoint("/screen-homework.php", Some("get_homework_list")).unwrap();
        assert_eq!(
            url.as_str(),
            "http://portal.test/system/screen-homework.php?action=get_homework_list"
        );
    }

    #[test]
    fn test_endpoint_rejects_garbage_base_url() {
        let client = client("not a url");
        let err = client.endpoint("screen-login.php", None).unwrap_err();
        assert!(matches!(err, PortalError::Url { .. }));
    }

    #[test]
    fn test_session_cookie_uses_configured_name() {
        let client = client("http://portal.test");
        assert_eq!(client.session_cookie("abc"), "screen-token=abc");
    }

    #[test]
    fn test_accept_requires_200_and_success() {
        let ok: Envelope<SubmitBody> =
            serde_json::from_str(r#"{"status":"success","message":"done"}"#).unwrap();
        assert!(accept(StatusCode::OK, ok).is_ok());

        let created: Envelope<SubmitBody> =
            serde_json::from_str(r#"{"status":"success"}"#).unwrap();
        assert!(matches!(
            accept(StatusCode::CREATED, created),
            Err(PortalError::Rejected { status: StatusCode::CREATED, .. })
        ));

        let failed: Envelope<SubmitBody> =
            serde_json::from_str(r#"{"status":"error","message":"late"}"#).unwrap();
        let err = accept(StatusCode::OK, failed).unwrap_err();
        assert_eq!(err.server_message(), Some("late"));
    }

    #[test]
    fn test_token_preview_masks_short_tokens() {
        assert_eq!(token_preview("short"), "***");
        assert_eq!(token_preview("abcdefghijkl"), "abcd...ijkl");
    }
}
