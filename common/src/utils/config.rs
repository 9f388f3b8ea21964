use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Clone, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Local,
    Memory,
}

fn default_storage_kind() -> StorageKind {
    StorageKind::Local
}

#[derive(Clone, Deserialize, Debug)]
pub struct AppConfig {
    pub surrealdb_address: String,
    pub surrealdb_username: String,
    pub surrealdb_password: String,
    pub surrealdb_namespace: String,
    pub surrealdb_database: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    pub http_port: u16,
    #[serde(default = "default_storage_kind")]
    pub storage: StorageKind,
    /// Author attributed to every post created by ingestion.
    #[serde(default = "default_blog_author")]
    pub blog_author: String,
    /// Bucket prefix that uploaded blog source files land in.
    #[serde(default = "default_blog_files_prefix")]
    pub blog_files_prefix: String,
    #[serde(default = "default_upload_max_body_bytes")]
    pub upload_max_body_bytes: usize,
}

fn default_data_dir() -> String {
    "./data".to_string()
}

fn default_blog_author() -> String {
    "Catherine Mwangi".to_string()
}

fn default_blog_files_prefix() -> String {
    "blog-files".to_string()
}

fn default_upload_max_body_bytes() -> usize {
    10 * 1024 * 1024
}

pub fn get_config() -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::with_name("config").required(false))
        .add_source(Environment::default())
        .build()?;

    config.try_deserialize()
}
