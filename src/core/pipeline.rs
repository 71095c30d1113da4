use crate::core::combine::{append_records, derive_label, finish, record_writer};
use crate::core::{CombineResult, ConfigProvider, Pipeline, SourceFile, SourceSummary, Storage};
use crate::utils::error::Result;

pub struct CombinePipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> CombinePipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CombinePipeline<S, C> {
    async fn extract(&self) -> Result<Vec<SourceFile>> {
        let extension = self.config.extension();
        let output_file = self.config.output_file();

        let mut names = self.storage.list_files().await?;
        names.sort();

        // Names that are not UTF-8 still match; the label is derived lossily.
        let mut matching = Vec::new();
        for name in names {
            let display = name.to_string_lossy().into_owned();
            let Some(label) = derive_label(&display, extension).map(str::to_string) else {
                continue;
            };
            if self.storage.is_same_file(output_file, &name).await {
                let skipped = &display;
                tracing::debug!("Skipping {}: it is the output file", skipped);
                continue;
            }
            matching.push((name, display, label));
        }

        tracing::info!(
            "Found {} files matching *.{} in {}",
            matching.len(),
            extension,
            self.config.input_dir()
        );

        let total = matching.len();
        let mut sources = Vec::with_capacity(total);
        for (index, (name, file_name, label)) in matching.into_iter().enumerate() {
            tracing::info!("Reading source {}/{}: {}", index + 1, total, file_name);
            let content = self.storage.read_file(&name).await?;
            tracing::debug!("Read {} ({} bytes)", file_name, content.len());

            sources.push(SourceFile {
                file_name,
                label,
                content,
            });
        }

        Ok(sources)
    }

    async fn transform(&self, sources: Vec<SourceFile>) -> Result<CombineResult> {
        let mut writer = record_writer(Vec::new());
        let mut summaries = Vec::with_capacity(sources.len());
        let mut total_records = 0;

        for source in sources {
            let records = append_records(&mut writer, &source.label, &source.content)?;
            tracing::debug!(
                "{} -> {} records with label '{}'",
                source.file_name,
                records,
                source.label
            );
            total_records += records;
            summaries.push(SourceSummary {
                file_name: source.file_name,
                label: source.label,
                records,
            });
        }

        Ok(CombineResult {
            sources: summaries,
            total_records,
            output: finish(writer)?,
        })
    }

    async fn load(&self, result: &CombineResult) -> Result<String> {
        let output_file = self.config.output_file();

        tracing::debug!(
            "Writing {} bytes to {}",
            result.output.len(),
            self.output_location()
        );
        self.storage.write_file(output_file, &result.output).await?;

        Ok(self.output_location())
    }

    fn output_location(&self) -> String {
        self.storage.location(self.config.output_file())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::CombineConfig;
    use crate::core::combine::normalize_path;
    use crate::utils::error::CombineError;
    use std::collections::BTreeMap;
    use std::ffi::{OsStr, OsString};
    use std::path::Path;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    pub(crate) struct MockStorage {
        files: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
        unreadable: Arc<Mutex<Vec<String>>>,
    }

    impl MockStorage {
        pub(crate) async fn with_files(files: &[(&str, &str)]) -> Self {
            let storage = Self::default();
            {
                let mut map = storage.files.lock().await;
                for (name, content) in files {
                    map.insert(name.to_string(), content.as_bytes().to_vec());
                }
            }
            storage
        }

        pub(crate) async fn deny_read(&self, name: &str) {
            self.unreadable.lock().await.push(name.to_string());
        }

        pub(crate) async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            self.files.lock().await.get(&key(path)).cloned()
        }
    }

    fn key(path: impl AsRef<Path>) -> String {
        normalize_path(path.as_ref()).to_string_lossy().into_owned()
    }

    impl Storage for MockStorage {
        async fn list_files(&self) -> Result<Vec<OsString>> {
            // Reverse order so callers cannot rely on listing order.
            Ok(self.files.lock().await.keys().rev().map(OsString::from).collect())
        }

        async fn read_file(&self, name: &OsStr) -> Result<Vec<u8>> {
            let path = key(name);
            let path = path.as_str();
            if self.unreadable.lock().await.iter().any(|name| name == path) {
                return Err(CombineError::ReadSourceError {
                    file: path.to_string(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::PermissionDenied,
                        "permission denied",
                    ),
                });
            }

            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| CombineError::ReadSourceError {
                file: path.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(key(path), data.to_vec());
            Ok(())
        }

        fn location(&self, path: &str) -> String {
            format!("mock://{}", path)
        }

        async fn is_same_file(&self, path: &str, name: &OsStr) -> bool {
            key(path) == key(name)
        }
    }

    fn pipeline(storage: MockStorage) -> CombinePipeline<MockStorage, CombineConfig> {
        CombinePipeline::new(storage, CombineConfig::default())
    }

    #[tokio::test]
    async fn test_extract_sorts_and_filters() {
        let storage = MockStorage::with_files(&[
            ("b.txt", "h\nb1\n"),
            ("notes.md", "h\nx\n"),
            ("a.txt", "h\na1\n"),
            ("a.txt.bak", "h\nz\n"),
        ])
        .await;

        let sources = pipeline(storage).extract().await.unwrap();
        let names: Vec<_> = sources.iter().map(|s| s.file_name.as_str()).collect();
        let labels: Vec<_> = sources.iter().map(|s| s.label.as_str()).collect();

        assert_eq!(names, vec!["a.txt", "b.txt"]);
        assert_eq!(labels, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_transform_counts_records() {
        let storage = MockStorage::with_files(&[
            ("a.txt", "h\n1\n2\n"),
            ("b.txt", "h\n"),
            ("c.txt", ""),
            ("d.txt", "h\n3"),
        ])
        .await;
        let pipeline = pipeline(storage);

        let sources = pipeline.extract().await.unwrap();
        let result = pipeline.transform(sources).await.unwrap();

        assert_eq!(result.total_records, 3);
        let counts: Vec<_> = result.sources.iter().map(|s| s.records).collect();
        assert_eq!(counts, vec![2, 0, 0, 1]);
        assert_eq!(String::from_utf8(result.output).unwrap(), "a,1\na,2\nd,3\n");
    }

    #[tokio::test]
    async fn test_load_writes_output() {
        let storage = MockStorage::with_files(&[("a.txt", "h\n1\n")]).await;
        let pipeline = pipeline(storage.clone());

        let sources = pipeline.extract().await.unwrap();
        let result = pipeline.transform(sources).await.unwrap();
        let location = pipeline.load(&result).await.unwrap();

        assert_eq!(location, "mock://combined.csv");
        assert_eq!(storage.get_file("combined.csv").await.unwrap(), b"a,1\n");
    }

    #[tokio::test]
    async fn test_output_with_input_extension_is_not_an_input() {
        let storage = MockStorage::with_files(&[
            ("a.txt", "h\n1\n"),
            ("merged.txt", "stale\nold,row\n"),
        ])
        .await;
        let config = CombineConfig {
            output_file: "merged.txt".to_string(),
            ..Default::default()
        };

        let sources = CombinePipeline::new(storage, config).extract().await.unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].file_name, "a.txt");
    }

    #[tokio::test]
    async fn test_output_spelled_with_dot_prefix_is_not_an_input() {
        let storage = MockStorage::with_files(&[
            ("a.txt", "h\n1\n"),
            ("merged.txt", "stale\nold,row\n"),
        ])
        .await;
        let config = CombineConfig {
            output_file: "./merged.txt".to_string(),
            ..Default::default()
        };

        let sources = CombinePipeline::new(storage, config).extract().await.unwrap();
        let names: Vec<_> = sources.iter().map(|s| s.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.txt"]);
    }

    #[tokio::test]
    async fn test_unreadable_source_fails_extract() {
        let storage = MockStorage::with_files(&[("a.txt", "h\n1\n"), ("b.txt", "h\n2\n")]).await;
        storage.deny_read("b.txt").await;

        let err = pipeline(storage).extract().await.unwrap_err();
        match err {
            CombineError::ReadSourceError { file, .. } => assert_eq!(file, "b.txt"),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
