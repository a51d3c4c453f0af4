//! Beey XAPI v2 client.
//!
//! One method per API operation. Every method sends exactly one request to
//! the service (URL relay adds one download), requires status 200, and maps
//! any failure to [`Error`] tagged with the operation name.

use std::path::Path;

use bytes::Bytes;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Body, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio_util::io::ReaderStream;

use super::error::{Error, ErrorKind};
use super::export::{ExportFormat, SubtitleVariant};
use super::params::{self, Options};
use super::project::{self, Project};
use super::relay::RelayBody;
use super::transport;
use crate::config::ApiConfig;

const DEFAULT_EXPORT_FORMAT: &str = "txt";

/// Typed access to a Beey server.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct TranscriberClient {
    http: reqwest::Client,
    /// Used for relay downloads so the Beey key never reaches third-party hosts
    downloader: Option<reqwest::Client>,
    base_url: String,
}

/// Request body for project creation
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct NewProjectRequest<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_path: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scheduled_start: Option<String>,
}

impl TranscriberClient {
    /// Wraps an already configured transport.
    ///
    /// `base_url` points at the API root, e.g. `https://www.beey.io/XAPI/v2`.
    /// Relay downloads use a default client without timeouts unless one is set
    /// through [`with_downloader`](Self::with_downloader).
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            downloader: None,
            base_url,
        }
    }

    /// Builds both transports from configuration and wraps them.
    pub fn from_config(config: &ApiConfig) -> Result<Self, Error> {
        let http = transport::build_http_client(config)?;
        let downloader = transport::build_download_client(config)?;
        Ok(Self::new(http, config.base_uri.clone()).with_downloader(downloader))
    }

    /// Replaces the client used to fetch media for [`upload_media_file_from_url`](Self::upload_media_file_from_url).
    pub fn with_downloader(mut self, downloader: reqwest::Client) -> Self {
        self.downloader = Some(downloader);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Creates a project. Absent optional fields are left out of the payload.
    pub async fn add_project(
        &self,
        name: &str,
        custom_path: Option<&str>,
        scheduled_start: Option<DateTime<Utc>>,
    ) -> Result<Project, Error> {
        const OP: &str = "add_project";

        let payload = NewProjectRequest {
            name,
            custom_path,
            scheduled_start: scheduled_start.map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
        };
        let project = self
            .project(OP, self.request(Method::POST, "projects").json(&payload))
            .await?;
        tracing::info!("Created project {} '{name}'", project.id);
        Ok(project)
    }

    /// Fetches a project. A 404 is reported as `Ok(None)`.
    pub async fn get_project(&self, id: i64) -> Result<Option<Project>, Error> {
        const OP: &str = "get_project";

        let response = self
            .send(OP, self.request(Method::GET, &format!("projects/{id}")))
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!("Project {id} not found");
            return Ok(None);
        }
        let response = expect_ok(OP, response).await?;
        let payload = read_json(OP, response).await?;
        Project::from_response(payload)
            .map(Some)
            .map_err(|e| Error::new(OP, e))
    }

    /// Deletes a project and returns it as the service last reported it.
    pub async fn delete_project(&self, id: i64) -> Result<Project, Error> {
        let project = self
            .project(
                "delete_project",
                self.request(Method::DELETE, &format!("projects/{id}")),
            )
            .await?;
        tracing::info!("Deleted project {id}");
        Ok(project)
    }

    /// Streams a local media file into the project.
    ///
    /// The file is opened and measured before any request is made.
    ///
    /// # Errors
    /// - If the file cannot be opened or is not a regular file
    /// - If the upload request fails or the service rejects it
    pub async fn upload_media_file(&self, id: i64, path: &Path) -> Result<Project, Error> {
        const OP: &str = "upload_media_file";

        let local_error = |source: std::io::Error| {
            Error::new(
                OP,
                ErrorKind::LocalFile {
                    path: path.to_path_buf(),
                    source,
                },
            )
        };

        let file = tokio::fs::File::open(path).await.map_err(local_error)?;
        let metadata = file.metadata().await.map_err(local_error)?;
        if !metadata.is_file() {
            return Err(local_error(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "not a regular file",
            )));
        }
        let size = metadata.len();

        tracing::info!(
            "Uploading {} ({size} bytes) to project {id}",
            path.display()
        );
        let body = Body::wrap_stream(RelayBody::new(ReaderStream::new(file), size));
        self.upload(OP, id, size, body).await
    }

    /// Relays media from `source_url` into the project without storing it locally.
    ///
    /// # Errors
    /// - If the download fails or answers with a non-success status
    /// - If the download does not declare a content length
    /// - If the upload request fails or the service rejects it
    pub async fn upload_media_file_from_url(
        &self,
        id: i64,
        source_url: &str,
    ) -> Result<Project, Error> {
        const OP: &str = "upload_media_file_from_url";

        let downloader = match &self.downloader {
            Some(downloader) => downloader.clone(),
            None => reqwest::Client::builder()
                .build()
                .map_err(|e| Error::new(OP, e))?,
        };

        tracing::debug!("Fetching media from {source_url}");
        let source = downloader
            .get(source_url)
            .send()
            .await
            .map_err(|e| Error::new(OP, e))?;

        if !source.status().is_success() {
            return Err(Error::new(
                OP,
                ErrorKind::SourceStatus {
                    url: source_url.to_string(),
                    status: source.status().as_u16(),
                },
            ));
        }

        let size = source.content_length().ok_or_else(|| {
            Error::new(
                OP,
                ErrorKind::MissingContentLength {
                    url: source_url.to_string(),
                },
            )
        })?;

        tracing::info!("Relaying {source_url} ({size} bytes) to project {id}");
        let body = Body::wrap_stream(RelayBody::new(Box::pin(source.bytes_stream()), size));
        self.upload(OP, id, size, body).await
    }

    /// Starts transcription. `overrides` are merged over [`params::enqueue_defaults`].
    pub async fn enqueue_project(&self, id: i64, overrides: Options) -> Result<Project, Error> {
        let query = params::to_query(&params::merge(params::enqueue_defaults(), overrides));
        let project = self
            .project(
                "enqueue_project",
                self.request(Method::GET, &format!("projects/{id}/enqueue"))
                    .query(&query),
            )
            .await?;
        tracing::info!(
            "Enqueued project {id}, state {}",
            project.processing_state.id()
        );
        Ok(project)
    }

    pub async fn get_project_media_file(&self, id: i64) -> Result<Bytes, Error> {
        self.bytes(
            "get_project_media_file",
            self.request(Method::GET, &format!("projects/{id}/files/mediafile")),
        )
        .await
    }

    /// Downloads the project's transcript document in the service's native TRSX format.
    pub async fn get_trsx(&self, id: i64) -> Result<Bytes, Error> {
        self.bytes(
            "get_trsx",
            self.request(Method::GET, &format!("projects/{id}/files/trsx")),
        )
        .await
    }

    pub async fn get_subtitle_export_formats(&self) -> Result<Vec<ExportFormat>, Error> {
        self.list(
            "get_subtitle_export_formats",
            self.request(Method::GET, "projects/export/subtitles/fileformats"),
        )
        .await
    }

    pub async fn get_subtitle_export_variants(&self) -> Result<Vec<SubtitleVariant>, Error> {
        self.list(
            "get_subtitle_export_variants",
            self.request(Method::GET, "projects/export/subtitles/variants"),
        )
        .await
    }

    pub async fn get_export_project_formats(&self) -> Result<Vec<ExportFormat>, Error> {
        self.list(
            "get_export_project_formats",
            self.request(Method::GET, "projects/export/formats"),
        )
        .await
    }

    /// Exports the transcript as text. `format_id` defaults to `txt`.
    pub async fn export_project(&self, id: i64, format_id: Option<&str>) -> Result<String, Error> {
        let mut query = params::project_export_defaults();
        query.insert(
            "FormatId".into(),
            Value::String(format_id.unwrap_or(DEFAULT_EXPORT_FORMAT).to_string()),
        );
        self.text(
            "export_project",
            self.request(Method::GET, &format!("projects/{id}/export"))
                .query(&params::to_query(&query)),
        )
        .await
    }

    /// Exports subtitles. `overrides` are merged over [`params::subtitle_defaults`].
    pub async fn export_subtitles(
        &self,
        id: i64,
        file_format_id: &str,
        overrides: Options,
    ) -> Result<String, Error> {
        let mut query = params::merge(params::subtitle_defaults(), overrides);
        query.insert(
            "FileFormatId".into(),
            Value::String(file_format_id.to_string()),
        );
        self.text(
            "export_subtitles",
            self.request(Method::GET, &format!("projects/{id}/export/subtitles"))
                .query(&params::to_query(&query)),
        )
        .await
    }

    pub async fn add_tag(&self, id: i64, tag: &str, access_token: i64) -> Result<Project, Error> {
        self.project("add_tag", self.tag_request(Method::POST, id, tag, access_token))
            .await
    }

    pub async fn delete_tag(
        &self,
        id: i64,
        tag: &str,
        access_token: i64,
    ) -> Result<Project, Error> {
        self.project(
            "delete_tag",
            self.tag_request(Method::DELETE, id, tag, access_token),
        )
        .await
    }

    pub async fn get_tags(&self, id: i64) -> Result<Vec<String>, Error> {
        let tags: Vec<String> = self
            .list(
                "get_tags",
                self.request(Method::GET, &format!("projects/{id}/tags")),
            )
            .await?;
        Ok(project::dedupe(tags))
    }

    fn tag_request(&self, method: Method, id: i64, tag: &str, access_token: i64) -> RequestBuilder {
        self.request(method, &format!("projects/{id}/tags"))
            .query(&[("accessToken", access_token)])
            .json(tag)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!("Beey API call: {method} {path}");
        self.http
            .request(method, format!("{}/{path}", self.base_url))
    }

    async fn upload(
        &self,
        operation: &'static str,
        id: i64,
        size: u64,
        body: Body,
    ) -> Result<Project, Error> {
        let builder = self
            .request(
                Method::POST,
                &format!("projects/{id}/files/uploadmediafile"),
            )
            .query(&[("FileSize", size)])
            .header(CONTENT_TYPE, "application/octet-stream")
            .header(CONTENT_LENGTH, size)
            .body(body);
        let project = self.project(operation, builder).await?;
        tracing::info!("Upload to project {id} finished");
        Ok(project)
    }

    async fn send(&self, operation: &'static str, builder: RequestBuilder) -> Result<Response, Error> {
        builder.send().await.map_err(|e| {
            tracing::warn!("Beey {operation} transport failure: {e}");
            Error::new(operation, e)
        })
    }

    async fn call(&self, operation: &'static str, builder: RequestBuilder) -> Result<Response, Error> {
        let response = self.send(operation, builder).await?;
        expect_ok(operation, response).await
    }

    async fn project(&self, operation: &'static str, builder: RequestBuilder) -> Result<Project, Error> {
        let response = self.call(operation, builder).await?;
        let payload = read_json(operation, response).await?;
        Project::from_response(payload).map_err(|e| Error::new(operation, e))
    }

    async fn list<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        builder: RequestBuilder,
    ) -> Result<Vec<T>, Error> {
        let response = self.call(operation, builder).await?;
        let payload = read_json(operation, response).await?;
        serde_json::from_value(project::unwrap_data(payload)).map_err(|e| Error::new(operation, e))
    }

    async fn bytes(&self, operation: &'static str, builder: RequestBuilder) -> Result<Bytes, Error> {
        let response = self.call(operation, builder).await?;
        let bytes = response.bytes().await.map_err(|e| Error::new(operation, e))?;
        tracing::debug!("Beey {operation} returned {} bytes", bytes.len());
        Ok(bytes)
    }

    async fn text(&self, operation: &'static str, builder: RequestBuilder) -> Result<String, Error> {
        let response = self.call(operation, builder).await?;
        let body = response.text().await.map_err(|e| Error::new(operation, e))?;
        Ok(export_text(body))
    }
}

/// Anything but 200 is a failure; the body is kept for the error message.
async fn expect_ok(operation: &'static str, response: Response) -> Result<Response, Error> {
    let status = response.status();
    if status == StatusCode::OK {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    tracing::warn!("Beey {operation} answered with status {status}");
    Err(Error::new(
        operation,
        ErrorKind::Status {
            status: status.as_u16(),
            body,
        },
    ))
}

async fn read_json(operation: &'static str, response: Response) -> Result<Value, Error> {
    let bytes = response.bytes().await.map_err(|e| Error::new(operation, e))?;
    serde_json::from_slice(&bytes).map_err(|e| Error::new(operation, e))
}

/// Export endpoints answer either with the document itself or with `{"Data": "<document>"}`.
fn export_text(body: String) -> String {
    match serde_json::from_str::<Value>(&body) {
        Ok(Value::Object(mut map)) => match map.remove("Data") {
            Some(Value::String(text)) => text,
            _ => body,
        },
        _ => body,
    }
}
