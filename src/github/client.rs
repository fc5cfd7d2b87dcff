//! GitHub release API client
//!
//! Every operation is a single exchange bounded by three independent
//! deadlines. The transport's connect timeout covers TCP and TLS setup. The
//! first-byte timeout starts once the request is written and covers waiting
//! for response headers. The end-to-end timeout is raced against the whole
//! exchange including body transfer in both directions. Network
//! and protocol faults are returned as [`Failure`] values, never as errors.

use crate::core::{ReleaseError, ReleaseResult, ReleaseVersion};
use crate::di::traits::{ReleasePublisher, ReleaseSource};
use crate::github::audit::{AuditEvent, Auditor};
use crate::github::failure::{ExchangeError, Failure};
use crate::github::progress::{ConnectTracking, ExchangeProgress, TrackedBody};
use crate::github::types::{
    Artifact, CreateReleaseRequest, CreatedRelease, GitHubApiAuthority, GitHubToken,
    GitHubUploadAuthority, Headers, ReleaseId, ReleaseOutcome, ReleaseSummary,
    ReleaseVersionOutcome, Repository, UploadArtifactOutcome,
};
use crate::pki::TrustStore;
use async_trait::async_trait;
use reqwest::{header, Client as HttpClient, Method, StatusCode, Url};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_FIRST_BYTE_TIMEOUT: Duration = Duration::from_secs(2);
pub const DEFAULT_END_TO_END_TIMEOUT: Duration = Duration::from_secs(2);

pub const DEFAULT_USER_AGENT: &str = "releasekit";
const GITHUB_JSON: &str = "application/vnd.github+json";
const JSON: &str = "application/json";
const API_VERSION_HEADER: &str = "x-github-api-version";
const API_VERSION: &str = "2022-11-28";

const LATEST_RELEASE_STATUS: StatusCode = StatusCode::OK;
const CREATE_RELEASE_STATUS: StatusCode = StatusCode::CREATED;
const UPLOAD_ARTIFACT_STATUS: StatusCode = StatusCode::CREATED;

/// Independently configured deadlines for a single exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// TCP and TLS setup
    pub connect: Duration,
    /// Waiting for response headers
    pub first_byte: Duration,
    /// Hard ceiling on the whole exchange
    pub end_to_end: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect: DEFAULT_CONNECT_TIMEOUT,
            first_byte: DEFAULT_FIRST_BYTE_TIMEOUT,
            end_to_end: DEFAULT_END_TO_END_TIMEOUT,
        }
    }
}

/// Unauthenticated client: can look up the latest release
#[derive(Clone)]
pub struct GitHubHttp {
    http_client: HttpClient,
    api_authority: GitHubApiAuthority,
    repository: Repository,
    auditor: Arc<dyn Auditor>,
    timeouts: Timeouts,
    user_agent: String,
}

/// Client holding a token and upload host: can create releases and upload assets
#[derive(Clone)]
pub struct PrivilegedGitHubHttp {
    http: GitHubHttp,
    upload_authority: GitHubUploadAuthority,
    token: GitHubToken,
}

enum RequestBody {
    Empty,
    Json(CreateReleaseRequest),
    File { path: PathBuf, content_type: String },
}

/// What an exchange produced before its status and body were interpreted
struct Received {
    status: StatusCode,
    headers: Headers,
    body: String,
}

/// Why an exchange stopped before a full response was received
enum Aborted {
    Submitting(ExchangeError),
    FirstByte(tokio::time::error::Elapsed),
}

impl GitHubHttp {
    /// Create a client against `api_authority` for `repository`'s releases
    pub fn new(
        api_authority: GitHubApiAuthority,
        repository: Repository,
        trust_store: &TrustStore,
        auditor: Arc<dyn Auditor>,
        timeouts: Timeouts,
    ) -> ReleaseResult<Self> {
        let http_client = trust_store
            .client_builder()
            .connect_timeout(timeouts.connect)
            .connector_layer(ConnectTracking)
            // every exchange dials its own connection, inside its own task
            .pool_max_idle_per_host(0)
            .build()
            .map_err(ReleaseError::Http)?;

        Ok(Self {
            http_client,
            api_authority,
            repository,
            auditor,
            timeouts,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    /// Override the user-agent sent with every request
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    /// Grant this client the credentials needed for mutating operations
    pub fn privileged(
        &self,
        upload_authority: GitHubUploadAuthority,
        token: GitHubToken,
    ) -> PrivilegedGitHubHttp {
        PrivilegedGitHubHttp {
            http: self.clone(),
            upload_authority,
            token,
        }
    }

    /// The newest published release, parsed from its tag name
    pub async fn latest_release_version(&self) -> ReleaseVersionOutcome {
        let mut uri = self.releases_url(self.api_authority.url());
        uri.query_pairs_mut().append_pair("per_page", "1");

        self.execute(
            Method::GET,
            uri,
            RequestBody::Empty,
            None,
            LATEST_RELEASE_STATUS,
            |body| {
                let releases: Vec<ReleaseSummary> = serde_json::from_str(body)?;
                // per_page=1 should make this a singleton; take the max regardless
                releases
                    .iter()
                    .map(|release| ReleaseVersion::parse(&release.tag_name))
                    .collect::<Result<Vec<_>, _>>()?
                    .into_iter()
                    .max()
                    .ok_or(ExchangeError::NoReleases)
            },
        )
        .await
    }

    /// `<base>/repos/<owner>/<repo>/releases`
    fn releases_url(&self, base: &Url) -> Url {
        repository_url(base, &self.repository, &["releases"])
    }

    fn request(&self, method: Method, uri: Url) -> reqwest::RequestBuilder {
        self.http_client
            .request(method, uri)
            .header(header::ACCEPT, GITHUB_JSON)
            .header(API_VERSION_HEADER, API_VERSION)
            .header(header::USER_AGENT, self.user_agent.as_str())
    }

    /// Run one exchange, classify its outcome and audit it exactly once
    async fn execute<T>(
        &self,
        method: Method,
        uri: Url,
        body: RequestBody,
        token: Option<&GitHubToken>,
        expected: StatusCode,
        handle_body: impl FnOnce(&str) -> Result<T, ExchangeError>,
    ) -> Result<T, Failure> {
        tracing::debug!(%method, %uri, "Submitting request");

        let exchange = self.exchange(method, uri.clone(), body, token);
        let received = match tokio::time::timeout(self.timeouts.end_to_end, exchange).await {
            Ok(Ok(received)) => received,
            Ok(Err(aborted)) => return Err(self.failed(uri, aborted)),
            Err(elapsed) => {
                let cause = Arc::new(ExchangeError::Deadline(elapsed));
                self.audit_failed(&uri, &cause);
                return Err(Failure::EndToEndTimeout {
                    uri,
                    timeout: self.timeouts.end_to_end,
                    cause,
                });
            }
        };

        self.auditor.event(AuditEvent::RequestCompleted {
            uri: uri.clone(),
            status: received.status.as_u16(),
            headers: received.headers.clone(),
            body: received.body.clone(),
        });

        if received.status != expected {
            return Err(Failure::InvalidResponseCode {
                uri,
                status: received.status.as_u16(),
                expected: expected.as_u16(),
                headers: received.headers,
                body: received.body,
            });
        }

        handle_body(&received.body).map_err(|e| Failure::ResponseHandling {
            uri,
            status: received.status.as_u16(),
            headers: received.headers,
            body: received.body,
            cause: Arc::new(e),
        })
    }

    /// Send the request and drain the response.
    ///
    /// Dropping this future (when the end-to-end deadline wins the race)
    /// drops the in-flight connection with it.
    async fn exchange(
        &self,
        method: Method,
        uri: Url,
        body: RequestBody,
        token: Option<&GitHubToken>,
    ) -> Result<Received, Aborted> {
        let mut request = self.request(method, uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, token.bearer());
        }
        let payload = match body {
            RequestBody::Empty => None,
            RequestBody::Json(payload) => {
                let bytes = serde_json::to_vec(&payload)
                    .map_err(|e| Aborted::Submitting(ExchangeError::Json(e)))?;
                Some((bytes, JSON.to_string()))
            }
            RequestBody::File { path, content_type } => {
                let bytes = tokio::fs::read(&path)
                    .await
                    .map_err(|source| {
                        Aborted::Submitting(ExchangeError::Artifact {
                            path: path.clone(),
                            source,
                        })
                    })?;
                Some((bytes, content_type))
            }
        };

        let (progress, mut phase) = ExchangeProgress::start(payload.is_some());
        if let Some((bytes, content_type)) = payload {
            request = request
                .header(header::CONTENT_TYPE, content_type)
                .header(header::CONTENT_LENGTH, bytes.len())
                .body(TrackedBody::new(bytes, progress.clone()).into_body());
        }

        // The first-byte clock starts once the connection is up and the
        // request has been written; until then only the connect timeout and
        // the end-to-end deadline apply.
        let send = progress.scope(request.send());
        tokio::pin!(send);
        let sent = tokio::select! {
            biased;
            sent = &mut send => sent,
            _ = phase.request_sent() => {
                tokio::time::timeout(self.timeouts.first_byte, &mut send)
                    .await
                    .map_err(Aborted::FirstByte)?
            }
        };
        let response = sent.map_err(|e| Aborted::Submitting(ExchangeError::Transport(e)))?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response
            .text()
            .await
            .map_err(|e| Aborted::Submitting(ExchangeError::Transport(e)))?;

        Ok(Received {
            status,
            headers,
            body,
        })
    }

    /// Classify an exchange that never produced a complete response
    fn failed(&self, uri: Url, aborted: Aborted) -> Failure {
        let cause = Arc::new(match aborted {
            Aborted::Submitting(e) => e,
            Aborted::FirstByte(elapsed) => ExchangeError::Deadline(elapsed),
        });
        self.audit_failed(&uri, &cause);

        let connect_timeout = matches!(
            cause.as_ref(),
            ExchangeError::Transport(e) if e.is_connect() && e.is_timeout()
        );
        let first_byte_timeout = matches!(
            cause.as_ref(),
            ExchangeError::Transport(e) if e.is_timeout()
        ) || matches!(cause.as_ref(), ExchangeError::Deadline(_));

        if connect_timeout {
            Failure::ConnectTimeout {
                uri,
                timeout: self.timeouts.connect,
                cause,
            }
        } else if first_byte_timeout {
            Failure::FirstByteTimeout {
                uri,
                timeout: self.timeouts.first_byte,
                cause,
            }
        } else {
            Failure::RequestSubmitting { uri, cause }
        }
    }

    fn audit_failed(&self, uri: &Url, cause: &Arc<ExchangeError>) {
        self.auditor.event(AuditEvent::RequestFailed {
            uri: uri.clone(),
            cause: Arc::clone(cause),
        });
    }
}

/// `<base>/repos/<owner>/<repo>/<tail...>`; authorities are validated as base URLs
fn repository_url(base: &Url, repository: &Repository, tail: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments
            .pop_if_empty()
            .extend(["repos", repository.owner.as_str(), repository.name.as_str()])
            .extend(tail);
    }
    url
}

impl PrivilegedGitHubHttp {
    /// Create a release tagged with `version`
    pub async fn create_release(&self, version: &ReleaseVersion) -> ReleaseOutcome {
        let uri = self.http.releases_url(self.http.api_authority.url());
        let payload = CreateReleaseRequest {
            tag_name: version.to_string(),
        };

        self.http
            .execute(
                Method::POST,
                uri,
                RequestBody::Json(payload),
                Some(&self.token),
                CREATE_RELEASE_STATUS,
                |body| {
                    let created: CreatedRelease = serde_json::from_str(body)?;
                    Ok(ReleaseId(created.id.to_string()))
                },
            )
            .await
    }

    /// Attach the artifact's bytes to release `release_id`
    pub async fn upload_artifact(
        &self,
        release_id: &ReleaseId,
        artifact: &Artifact,
    ) -> UploadArtifactOutcome {
        let mut uri = repository_url(
            self.upload_authority.url(),
            &self.http.repository,
            &["releases", release_id.0.as_str(), "assets"],
        );
        uri.query_pairs_mut()
            .append_pair("name", &artifact.name)
            .append_pair("label", &artifact.label);

        self.http
            .execute(
                Method::POST,
                uri,
                RequestBody::File {
                    path: artifact.path.clone(),
                    content_type: artifact.content_type.clone(),
                },
                Some(&self.token),
                UPLOAD_ARTIFACT_STATUS,
                |_| Ok(()),
            )
            .await
    }
}

#[async_trait]
impl ReleaseSource for GitHubHttp {
    async fn latest_release_version(&self) -> ReleaseVersionOutcome {
        Self::latest_release_version(self).await
    }
}

#[async_trait]
impl ReleaseSource for PrivilegedGitHubHttp {
    async fn latest_release_version(&self) -> ReleaseVersionOutcome {
        self.http.latest_release_version().await
    }
}

#[async_trait]
impl ReleasePublisher for PrivilegedGitHubHttp {
    async fn create_release(&self, version: &ReleaseVersion) -> ReleaseOutcome {
        Self::create_release(self, version).await
    }

    async fn upload_artifact(
        &self,
        release_id: &ReleaseId,
        artifact: &Artifact,
    ) -> UploadArtifactOutcome {
        Self::upload_artifact(self, release_id, artifact).await
    }
}
