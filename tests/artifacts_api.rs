//! Artifacts API tests: multipart upload and streaming download.

use cybsi::artifact::{ArtifactContentDownloadCompressionTypes, ArtifactTypes};
use cybsi::{Config, CybsiClient};
use wiremock::matchers::{header_regex, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARTIFACT_UUID: &str = "0f04b5fc-cf16-4b2c-9e26-c12ba4257306";

fn client(server: &MockServer) -> CybsiClient {
    CybsiClient::new(&Config::new(server.uri(), "test-key")).unwrap()
}

#[tokio::test]
async fn upload_posts_multipart() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/enrichment/artifacts"))
        .and(header_regex("content-type", "multipart/form-data.*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "uuid": ARTIFACT_UUID
        })))
        .expect(1)
        .mount(&server)
        .await;

    let artifact_ref = client(&server)
        .artifacts()
        .upload(
            "example.txt",
            "artifact content",
            Some(ArtifactTypes::FileSample),
            None,
        )
        .await
        .unwrap();
    assert_eq!(artifact_ref.uuid.to_string(), ARTIFACT_UUID);
}

#[tokio::test]
async fn view_parses_content_descriptor() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/enrichment/artifacts/{ARTIFACT_UUID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "uuid": ARTIFACT_UUID,
            "type": "FileSample",
            "dataSource": {"uuid": "d3c53120-cb7b-4a8b-94a9-6b1f2c6a2ea3"},
            "shareLevel": "Green",
            "fileNames": ["example.txt"],
            "content": {
                "md5Hash": "6e34f33f9deb9a4ecbbd9b09282ba0c4",
                "sha1Hash": "f572d396fae9206628714fb2ce00f72e94f2258f",
                "sha256Hash": "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9",
                "size": 16
            }
        })))
        .mount(&server)
        .await;

    let view = client(&server)
        .artifacts()
        .view(ARTIFACT_UUID.parse().unwrap())
        .await
        .unwrap();
    assert_eq!(view.artifact_type, ArtifactTypes::FileSample);
    assert_eq!(view.content.size, 16);
    assert!(view.content.format_description.is_none());
}

#[tokio::test]
async fn download_streams_plain_content() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/enrichment/artifacts/{ARTIFACT_UUID}/content")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"artifact content".to_vec())
                .insert_header("Content-Disposition", "attachment; filename=\"example.txt\""),
        )
        .mount(&server)
        .await;

    let content = client(&server)
        .artifacts()
        .get_content(ARTIFACT_UUID.parse().unwrap(), None, None)
        .await
        .unwrap();
    assert_eq!(content.filename(), Some("example.txt"));
    let data = content.read_to_end().await.unwrap();
    assert_eq!(data, b"artifact content");
}

#[tokio::test]
async fn download_requests_zip_packaging() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/enrichment/artifacts/{ARTIFACT_UUID}/content")))
        .and(query_param("archive", "ZIP"))
        .and(query_param("archivePassword", "p@ss"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PK\x03\x04zipdata".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let mut content = client(&server)
        .artifacts()
        .get_content(
            ARTIFACT_UUID.parse().unwrap(),
            Some(ArtifactContentDownloadCompressionTypes::Zip),
            Some("p@ss"),
        )
        .await
        .unwrap();

    // chunked read path
    let mut data = Vec::new();
    while let Some(chunk) = content.chunk().await.unwrap() {
        data.extend_from_slice(&chunk);
    }
    assert!(data.starts_with(b"PK"));
}

#[tokio::test]
async fn download_saves_to_file() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/enrichment/artifacts/{ARTIFACT_UUID}/content")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"saved bytes".to_vec()))
        .mount(&server)
        .await;

    let dir = std::env::temp_dir().join(format!("cybsi-test-{}", uuid::Uuid::new_v4()));
    tokio::fs::create_dir_all(&dir).await.unwrap();
    let target = dir.join("artifact.bin");

    let content = client(&server)
        .artifacts()
        .get_content(ARTIFACT_UUID.parse().unwrap(), None, None)
        .await
        .unwrap();
    let written = content.save_to(&target).await.unwrap();

    assert_eq!(written, 11);
    assert_eq!(tokio::fs::read(&target).await.unwrap(), b"saved bytes");
    tokio::fs::remove_dir_all(&dir).await.unwrap();
}
