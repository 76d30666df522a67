use anyhow::{Context, Result};
use std::path::Path;
use uuid::Uuid;

/// Build a collision-free stored filename, keeping a sanitized extension
/// from the client-provided name.
pub fn stored_filename(original: &str) -> String {
    let ext: Option<String> = Path::new(original)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            e.chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
                .to_ascii_lowercase()
        })
        .filter(|e| !e.is_empty());

    match ext {
        Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
        None => Uuid::new_v4().to_string(),
    }
}

/// Persist uploaded bytes under the upload directory and return the
/// site-relative path stored in the database.
pub async fn save_upload(upload_dir: &Path, original_name: &str, bytes: &[u8]) -> Result<String> {
    let filename = stored_filename(original_name);
    let dest = upload_dir.join(&filename);

    tokio::fs::create_dir_all(upload_dir)
        .await
        .with_context(|| format!("Failed to create upload dir {:?}", upload_dir))?;
    tokio::fs::write(&dest, bytes)
        .await
        .with_context(|| format!("Failed to write upload {:?}", dest))?;

    Ok(format!("/uploads/{}", filename))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_sanitized_extension() {
        let name = stored_filename("rally photo.JPG");
        assert!(name.ends_with(".jpg"));

        let name = stored_filename("../../etc/passwd");
        assert!(!name.contains('/'));
        assert!(!name.contains(".."));
    }

    #[test]
    fn handles_missing_extension() {
        let name = stored_filename("README");
        assert!(!name.contains('.'));
    }

    #[tokio::test]
    async fn writes_file_and_returns_relative_path() {
        let dir = std::env::temp_dir().join(format!("prarthi-test-{}", Uuid::new_v4()));
        let url = save_upload(&dir, "photo.png", b"fake-png").await.unwrap();
        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with(".png"));

        let stored = dir.join(url.trim_start_matches("/uploads/"));
        assert_eq!(tokio::fs::read(&stored).await.unwrap(), b"fake-png");
        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
