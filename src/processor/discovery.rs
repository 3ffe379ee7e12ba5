//! File discovery module for dataset descriptions
//!
//! Finds the files to convert: either a single file, or every file with the
//! input format's extension (`*.isf`, `*.arff`) directly inside an input
//! directory.

use crate::error::{IsfError, Result};
use crate::models::InputFormat;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// File discovery component for dataset inputs
#[derive(Debug)]
pub struct FileDiscovery {
    input_path: PathBuf,
    format: InputFormat,
}

impl FileDiscovery {
    pub fn new(input_path: PathBuf) -> Self {
        Self {
            input_path,
            format: InputFormat::default(),
        }
    }

    pub fn with_format(mut self, format: InputFormat) -> Self {
        self.format = format;
        self
    }

    /// Discover input files, sorted by file name
    pub async fn discover_files(&self) -> Result<Vec<PathBuf>> {
        let metadata = fs::metadata(&self.input_path)
            .await
            .map_err(|_| IsfError::DatasetNotFound {
                path: self.input_path.clone(),
            })?;

        if metadata.is_file() {
            return Ok(vec![self.input_path.clone()]);
        }

        debug!(
            "Searching for {} files in: {}",
            self.format.label(),
            self.input_path.display()
        );

        let mut files = Vec::new();
        let mut dir = fs::read_dir(&self.input_path).await?;

        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            if !has_extension(&path, self.format.extension()) {
                continue;
            }
            // Follows symlinks; dangling links are skipped
            match fs::metadata(&path).await {
                Ok(metadata) if metadata.is_file() => files.push(path),
                Ok(_) => {}
                Err(e) => debug!("Skipping {}: {}", path.display(), e),
            }
        }

        files.sort();
        debug!("Found {} {} files", files.len(), self.format.label());

        Ok(files)
    }
}

/// Check if a path has the given extension, compared case-sensitively
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|ext| ext == extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_discover_isf_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("car.isf"), "**END").unwrap();
        fs::write(temp_dir.path().join("bank.isf"), "**END").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "ignored").unwrap();
        fs::create_dir_all(temp_dir.path().join("nested.isf")).unwrap();

        let discovery = FileDiscovery::new(temp_dir.path().to_path_buf());
        let files = discovery.discover_files().await.unwrap();

        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["bank.isf", "car.isf"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinked_isf_files_included() {
        let temp_dir = TempDir::new().unwrap();
        let source_dir = temp_dir.path().join("source");
        let input_dir = temp_dir.path().join("input");
        fs::create_dir_all(&source_dir).unwrap();
        fs::create_dir_all(&input_dir).unwrap();
        fs::write(source_dir.join("car.isf"), "**END").unwrap();
        fs::write(input_dir.join("bank.isf"), "**END").unwrap();

        std::os::unix::fs::symlink(source_dir.join("car.isf"), input_dir.join("car.isf")).unwrap();
        std::os::unix::fs::symlink(source_dir.join("gone.isf"), input_dir.join("gone.isf"))
            .unwrap();

        let discovery = FileDiscovery::new(input_dir.clone());
        let files = discovery.discover_files().await.unwrap();
        assert_eq!(files, vec![input_dir.join("bank.isf"), input_dir.join("car.isf")]);
    }

    #[tokio::test]
    async fn test_single_file_input() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("single.isf");
        fs::write(&file_path, "**END").unwrap();

        let discovery = FileDiscovery::new(file_path.clone());
        let files = discovery.discover_files().await.unwrap();
        assert_eq!(files, vec![file_path]);
    }

    #[tokio::test]
    async fn test_missing_input() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");

        let discovery = FileDiscovery::new(missing.clone());
        match discovery.discover_files().await.unwrap_err() {
            IsfError::DatasetNotFound { path } => assert_eq!(path, missing),
            other => panic!("Expected DatasetNotFound error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_discover_arff_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("gen.arff"), "@data").unwrap();
        fs::write(temp_dir.path().join("car.isf"), "**END").unwrap();

        let discovery =
            FileDiscovery::new(temp_dir.path().to_path_buf()).with_format(InputFormat::Arff);
        let files = discovery.discover_files().await.unwrap();
        assert_eq!(files, vec![temp_dir.path().join("gen.arff")]);
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension(Path::new("car.isf"), "isf"));
        assert!(has_extension(Path::new("/data/isf/ERA_n.isf"), "isf"));
        assert!(has_extension(Path::new("gen.arff"), "arff"));
        assert!(!has_extension(Path::new("car.csv"), "isf"));
        assert!(!has_extension(Path::new("isf"), "isf"));
        assert!(!has_extension(Path::new("car.ISF"), "isf"));
    }
}
