use crate::domain::model::{CombineResult, SourceFile};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::ffi::{OsStr, OsString};

pub trait Storage: Send + Sync {
    /// Names of the entries directly inside the storage root that may be
    /// files, unsorted. Only entries known to be something else (such as a
    /// directory) are left out.
    fn list_files(&self) -> impl std::future::Future<Output = Result<Vec<OsString>>> + Send;
    fn read_file(
        &self,
        name: &OsStr,
    ) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Display path of `path` inside the storage root.
    fn location(&self, path: &str) -> String;
    /// Whether `path` (relative to the root, or absolute) names the listed
    /// entry `name`, however it is spelled.
    fn is_same_file(
        &self,
        path: &str,
        name: &OsStr,
    ) -> impl std::future::Future<Output = bool> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_dir(&self) -> &str;
    fn extension(&self) -> &str;
    fn output_file(&self) -> &str;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<SourceFile>>;
    async fn transform(&self, sources: Vec<SourceFile>) -> Result<CombineResult>;
    async fn load(&self, result: &CombineResult) -> Result<String>;
    /// Where `load` would write, without writing.
    fn output_location(&self) -> String;
}
