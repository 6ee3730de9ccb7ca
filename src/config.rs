//! 配置模块，负责从JSON文件加载词汇表（运算符描述、引号字段、日期字段）

use crate::condition::{Field, Operator};
use crate::vocabulary::Vocabulary;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// 未指定路径时尝试加载的配置文件
pub const DEFAULT_VOCABULARY_FILE: &str = "jql_vocabulary.json";

/// 词汇表配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {0}")]
    NotFound(String),

    #[error("无法读取配置文件 {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("无法解析JSON配置文件 {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("缺少运算符描述: {0}")]
    MissingDescriptions(String),
}

/// 词汇表配置文件结构，每一项都是可选的，缺省时使用内置表
///
/// ```json
/// {
///   "operator_descriptions": { "~": "mentions" },
///   "quoted_fields": ["project", "status"],
///   "date_fields": ["created"]
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VocabularyConfig {
    /// 覆盖部分运算符的描述，其余运算符沿用内置描述
    #[serde(default)]
    pub operator_descriptions: BTreeMap<Operator, String>,
    /// 整体替换需要加引号的字段集合
    #[serde(default)]
    pub quoted_fields: Option<BTreeSet<Field>>,
    /// 整体替换日期字段集合
    #[serde(default)]
    pub date_fields: Option<BTreeSet<Field>>,
}

impl VocabularyConfig {
    /// 从JSON文件加载词汇表配置
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();

        if !path_ref.exists() {
            return Err(ConfigError::NotFound(path_ref.display().to_string()));
        }

        let content = fs::read_to_string(path_ref).map_err(|source| ConfigError::Read {
            path: path_ref.display().to_string(),
            source,
        })?;

        let config = Self::from_json_str(&content).map_err(|source| ConfigError::Parse {
            path: path_ref.display().to_string(),
            source,
        })?;

        debug!(
            path = %path_ref.display(),
            overrides = config.operator_descriptions.len(),
            "loaded vocabulary config"
        );
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// 将配置合并到内置词汇表上并校验
    pub fn into_vocabulary(self) -> Result<Vocabulary, ConfigError> {
        let standard = Vocabulary::standard();

        let mut descriptions = standard.descriptions().clone();
        descriptions.extend(self.operator_descriptions);

        let quoted_fields = self
            .quoted_fields
            .unwrap_or_else(|| standard.quoted_fields().clone());
        let date_fields = self
            .date_fields
            .unwrap_or_else(|| standard.date_fields().clone());

        Vocabulary::new(descriptions, quoted_fields, date_fields)
    }
}

/// 从文件加载并合并出完整的词汇表
pub fn load_vocabulary<P: AsRef<Path>>(path: P) -> Result<Vocabulary, ConfigError> {
    VocabularyConfig::from_json_file(path)?.into_vocabulary()
}
