//! Upload an artifact, then download its content both plain and packaged
//! into a password-protected ZIP archive.
//!
//! Run with:
//! ```
//! CYBSI_API_URL=https://cybsi.example.com/api CYBSI_API_KEY=your-key \
//!     cargo run --example upload_download_artifact
//! ```

use cybsi::artifact::{ArtifactContentDownloadCompressionTypes, ArtifactTypes};
use cybsi::CybsiClient;

const ARCHIVE_PASSWORD: &str = "p@ss";

#[tokio::main]
async fn main() -> cybsi::Result<()> {
    tracing_subscriber::fmt::init();

    let client = CybsiClient::from_env()?;
    let artifacts = client.artifacts();

    let artifact_ref = artifacts
        .upload(
            "example.txt",
            "artifact content",
            Some(ArtifactTypes::FileSample),
            None,
        )
        .await?;
    println!("uploaded artifact {}", artifact_ref.uuid);

    let view = artifacts.view(artifact_ref.uuid).await?;
    println!(
        "sha256 {}, {} bytes, file names {:?}",
        view.content.sha256_hash, view.content.size, view.file_names
    );

    // Entire plain content into memory.
    let content = artifacts.get_content(artifact_ref.uuid, None, None).await?;
    let plain = content.read_to_end().await?;
    println!("plain artifact content: {}", String::from_utf8_lossy(&plain));

    // Packaged content streamed to a local file.
    let archive = artifacts
        .get_content(
            artifact_ref.uuid,
            Some(ArtifactContentDownloadCompressionTypes::Zip),
            Some(ARCHIVE_PASSWORD),
        )
        .await?;
    let file_name = archive.filename().unwrap_or("artifact.zip").to_string();
    let written = archive.save_to(&file_name).await?;
    println!("saved {written} archive bytes to {file_name} (password: {ARCHIVE_PASSWORD})");

    Ok(())
}
