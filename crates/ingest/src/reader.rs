use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;
use walkdir::WalkDir;

const SUPPORTED_EXTENSIONS: [&str; 2] = ["txt", "md"];

pub struct FileReader;

impl FileReader {
    pub fn is_supported(path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
    }

    pub async fn read_file(path: &Path) -> Result<String> {
        if !Self::is_supported(path) {
            let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            anyhow::bail!("Unsupported file format: {}", extension);
        }

        fs::read_to_string(path)
            .await
            .context(format!("Failed to read file: {:?}", path))
    }

    /// Read every supported file below `dir`, sorted by path.
    pub async fn read_directory(dir: &Path) -> Result<Vec<(String, String)>> {
        let mut paths = Vec::new();

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.context(format!("Failed to walk directory: {:?}", dir))?;
            let path = entry.path();

            if entry.file_type().is_file() && Self::is_supported(path) {
                paths.push(path.to_path_buf());
            }
        }

        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            let content = Self::read_file(&path).await?;
            files.push((path.to_string_lossy().to_string(), content));
        }

        Ok(files)
    }
}
