//! Artifacts API: upload and download binary samples.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::Response;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::common::{RefView, ShareLevels};
use crate::connector::Connector;
use crate::error::Result;

const ARTIFACTS_PATH: &str = "/enrichment/artifacts";

/// Artifact types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtifactTypes {
    /// A file to be analyzed (malware sample, document and so on).
    FileSample,
    /// An archive with files inside.
    Archive,
    /// Captured network traffic.
    PCAPFile,
    /// Archived analysis report of an external system.
    ReportArchive,
}

impl ArtifactTypes {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactTypes::FileSample => "FileSample",
            ArtifactTypes::Archive => "Archive",
            ArtifactTypes::PCAPFile => "PCAPFile",
            ArtifactTypes::ReportArchive => "ReportArchive",
        }
    }
}

impl std::fmt::Display for ArtifactTypes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server-side packaging of artifact content downloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtifactContentDownloadCompressionTypes {
    /// Package the content into a ZIP archive (optionally protected with a
    /// password) so that live samples do not trip AV on the way down.
    #[serde(rename = "ZIP")]
    Zip,
}

impl ArtifactContentDownloadCompressionTypes {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactContentDownloadCompressionTypes::Zip => "ZIP",
        }
    }
}

/// Artifacts API.
///
/// Obtained through
/// [`CybsiClient::artifacts`](crate::CybsiClient::artifacts).
#[derive(Debug, Clone)]
pub struct ArtifactsAPI {
    connector: Connector,
}

impl ArtifactsAPI {
    pub(crate) fn new(connector: Connector) -> Self {
        Self { connector }
    }

    /// Upload an artifact.
    ///
    /// Calls `POST /enrichment/artifacts` with a multipart body. `content`
    /// is anything convertible into a request body: `Vec<u8>`, `String`,
    /// a `'static` byte slice or a stream.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use cybsi::{CybsiClient, artifact::ArtifactTypes};
    /// # async fn example(client: CybsiClient) -> cybsi::Result<()> {
    /// let artifact_ref = client
    ///     .artifacts()
    ///     .upload("example.txt", "artifact content", Some(ArtifactTypes::FileSample), None)
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    #[tracing::instrument(skip(self, content))]
    pub async fn upload(
        &self,
        filename: &str,
        content: impl Into<reqwest::Body>,
        artifact_type: Option<ArtifactTypes>,
        share_level: Option<ShareLevels>,
    ) -> Result<RefView> {
        let file = Part::stream(content.into()).file_name(filename.to_string());
        let mut form = Form::new().part("file", file);
        if let Some(artifact_type) = artifact_type {
            form = form.text("type", artifact_type.as_str());
        }
        if let Some(share_level) = share_level {
            form = form.text("shareLevel", share_level.as_str());
        }

        let response = self.connector.do_post_multipart(ARTIFACTS_PATH, form).await?;
        Ok(response.json().await?)
    }

    /// Get an artifact view.
    ///
    /// Calls `GET /enrichment/artifacts/{artifact_uuid}`.
    #[tracing::instrument(skip(self))]
    pub async fn view(&self, artifact_uuid: Uuid) -> Result<ArtifactView> {
        let path = format!("{ARTIFACTS_PATH}/{artifact_uuid}");
        let response = self.connector.do_get(&path, &[]).await?;
        Ok(response.json().await?)
    }

    /// Download artifact content.
    ///
    /// Calls `GET /enrichment/artifacts/{artifact_uuid}/content`. The
    /// returned handle streams the body; nothing is buffered until one of
    /// its read methods is called.
    ///
    /// # Arguments
    ///
    /// * `archive` - Ask the server to package the content.
    /// * `archive_password` - Protect the archive with a password.
    #[tracing::instrument(skip(self, archive_password))]
    pub async fn get_content(
        &self,
        artifact_uuid: Uuid,
        archive: Option<ArtifactContentDownloadCompressionTypes>,
        archive_password: Option<&str>,
    ) -> Result<ArtifactContent> {
        let mut params: Vec<(String, String)> = Vec::new();
        if let Some(archive) = archive {
            params.push(("archive".to_string(), archive.as_str().to_string()));
        }
        if let Some(password) = archive_password {
            params.push(("archivePassword".to_string(), password.to_string()));
        }

        let path = format!("{ARTIFACTS_PATH}/{artifact_uuid}/content");
        let response = self.connector.do_get(&path, &params).await?;
        Ok(ArtifactContent::new(response))
    }
}

/// Artifact view.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactView {
    /// Artifact identifier.
    pub uuid: Uuid,
    /// Artifact type.
    #[serde(rename = "type")]
    pub artifact_type: ArtifactTypes,
    /// Data source which registered the artifact.
    pub data_source: RefView,
    /// Share level of the artifact.
    pub share_level: ShareLevels,
    /// File names the artifact was uploaded under.
    #[serde(default)]
    pub file_names: Vec<String>,
    /// Content descriptor.
    pub content: ArtifactContentView,
}

/// Artifact content descriptor.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactContentView {
    /// MD5 hash of the content.
    pub md5_hash: String,
    /// SHA1 hash of the content.
    pub sha1_hash: String,
    /// SHA256 hash of the content.
    pub sha256_hash: String,
    /// Content size, bytes.
    pub size: u64,
    /// Detected format, free-form.
    #[serde(default)]
    pub format_description: Option<String>,
}

/// Streaming artifact content download.
pub struct ArtifactContent {
    filename: Option<String>,
    response: Response,
}

impl ArtifactContent {
    fn new(response: Response) -> Self {
        let filename = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_attachment_filename);
        Self { filename, response }
    }

    /// File name from the `Content-Disposition` header, if present.
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Next chunk of the content, or `None` when the stream ends.
    pub async fn chunk(&mut self) -> Result<Option<Vec<u8>>> {
        Ok(self.response.chunk().await?.map(|bytes| bytes.to_vec()))
    }

    /// Buffer the whole content in memory.
    pub async fn read_to_end(self) -> Result<Vec<u8>> {
        Ok(self.response.bytes().await?.to_vec())
    }

    /// Stream the content into a local file. Returns the number of bytes
    /// written.
    pub async fn save_to(mut self, path: impl AsRef<Path>) -> Result<u64> {
        let mut file = tokio::fs::File::create(path).await?;
        let mut written: u64 = 0;
        while let Some(chunk) = self.response.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        Ok(written)
    }
}

impl std::fmt::Debug for ArtifactContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactContent")
            .field("filename", &self.filename)
            .finish_non_exhaustive()
    }
}

/// Pull `filename="..."` out of a `Content-Disposition: attachment` value.
fn parse_attachment_filename(value: &str) -> Option<String> {
    let (_, after) = value.split_once("filename=")?;
    let name = after.split(';').next()?.trim().trim_matches('"');
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_view_deserializes() {
        let json = serde_json::json!({
            "uuid": "0f04b5fc-cf16-4b2c-9e26-c12ba4257306",
            "type": "FileSample",
            "dataSource": {"uuid": "d3c53120-cb7b-4a8b-94a9-6b1f2c6a2ea3"},
            "shareLevel": "Green",
            "fileNames": ["example.txt"],
            "content": {
                "md5Hash": "6e34f33f9deb9a4ecbbd9b09282ba0c4",
                "sha1Hash": "f572d396fae9206628714fb2ce00f72e94f2258f",
                "sha256Hash": "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9",
                "size": 16,
                "formatDescription": "ASCII text"
            }
        });
        let view: ArtifactView = serde_json::from_value(json).unwrap();
        assert_eq!(view.artifact_type, ArtifactTypes::FileSample);
        assert_eq!(view.file_names, ["example.txt"]);
        assert_eq!(view.content.size, 16);
    }

    #[test]
    fn attachment_filename_parses() {
        assert_eq!(
            parse_attachment_filename("attachment; filename=\"sample.bin\""),
            Some("sample.bin".to_string())
        );
        assert_eq!(
            parse_attachment_filename("attachment; filename=sample.bin; size=12"),
            Some("sample.bin".to_string())
        );
        assert_eq!(parse_attachment_filename("attachment"), None);
    }

    #[test]
    fn compression_type_wire_name() {
        assert_eq!(
            serde_json::to_string(&ArtifactContentDownloadCompressionTypes::Zip).unwrap(),
            "\"ZIP\""
        );
    }
}
