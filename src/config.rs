use crate::error::{ConfigError, RequestError};
use crate::models::{ClassLevel, ExamRequest, Paper, Subject};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

/// 默认配置文件
pub const DEFAULT_CONFIG_FILE: &str = "zecoed.toml";
/// 指定配置文件路径的环境变量
pub const CONFIG_PATH_VAR: &str = "ZECOED_CONFIG";

/// 生成服务类型
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// RapidAPI 上的 ChatGPT 代理
    RapidApi,
    /// 兼容 OpenAI 的 chat completion 接口
    OpenAi,
}

impl Provider {
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.trim().to_lowercase().as_str() {
            "rapidapi" => Ok(Provider::RapidApi),
            "openai" => Ok(Provider::OpenAi),
            _ => Err(ConfigError::UnknownProvider(s.to_string())),
        }
    }

    pub fn default_api_url(self) -> &'static str {
        match self {
            Provider::RapidApi => "https://chatgpt-api8.p.rapidapi.com/",
            Provider::OpenAi => "https://api.openai.com/v1",
        }
    }
}

/// 出卷参数（字符串形式，由 `Config::exam_request` 解析）
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExamSettings {
    pub class_level: String,
    pub subject: String,
    pub paper: Option<String>,
    pub num_questions: u32,
    pub time_limit_minutes: u32,
}

impl Default for ExamSettings {
    fn default() -> Self {
        Self {
            class_level: "Form 1".to_string(),
            subject: "Mathematics".to_string(),
            paper: None,
            num_questions: crate::models::exam::DEFAULT_QUESTIONS,
            time_limit_minutes: crate::models::exam::DEFAULT_TIME_LIMIT,
        }
    }
}

/// 读取并解析单个变量，解析失败视为未设置
fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    lookup(name).and_then(|v| v.trim().parse().ok())
}

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- 生成服务配置 ---
    pub generation_provider: Provider,
    /// 为空时使用 provider 的默认地址
    pub generation_api_url: Option<String>,
    pub generation_api_key: String,
    /// RapidAPI 的 x-rapidapi-host
    pub generation_api_host: String,
    pub generation_model: String,
    /// 单次请求超时（秒）
    pub generation_timeout_secs: u64,
    /// 最多尝试次数
    pub generation_max_retries: usize,
    // --- 输出配置 ---
    /// PDF 输出目录
    pub output_dir: String,
    /// 离线模式：直接读取该文件作为生成结果
    pub raw_text_file: Option<String>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 发起人（仅用于日志）
    pub requested_by: Option<String>,
    pub exam: ExamSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generation_provider: Provider::RapidApi,
            generation_api_url: None,
            generation_api_key: String::new(),
            generation_api_host: "chatgpt-api8.p.rapidapi.com".to_string(),
            generation_model: "gpt-4o-mini".to_string(),
            generation_timeout_secs: 60,
            generation_max_retries: 3,
            output_dir: "output_pdf".to_string(),
            raw_text_file: None,
            verbose_logging: false,
            requested_by: None,
            exam: ExamSettings::default(),
        }
    }
}

impl Config {
    /// 加载配置：默认值 → TOML 文件（如果存在）→ 环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_VAR).ok();
        let explicit = path.is_some();
        let path = path.unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());

        let base = if explicit || Path::new(&path).exists() {
            Self::from_toml_file(&path)?
        } else {
            debug!("未找到配置文件 {}，使用默认配置", path);
            Self::default()
        };

        Ok(base.with_env())
    }

    /// 从 TOML 文件读取，缺省字段使用默认值
    pub fn from_toml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 只使用默认值和环境变量
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// 用进程环境变量覆盖
    pub fn with_env(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// 用任意来源覆盖配置，无法解析的值保持原值
    pub fn with_overrides(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let provider = lookup("GENERATION_PROVIDER").and_then(|v| match Provider::parse(&v) {
            Ok(p) => Some(p),
            Err(e) => {
                warn!("忽略环境变量 GENERATION_PROVIDER: {}", e);
                None
            }
        });

        Self {
            generation_provider: provider.unwrap_or(self.generation_provider),
            generation_api_url: lookup("GENERATION_API_URL").or(self.generation_api_url),
            generation_api_key: lookup("GENERATION_API_KEY").unwrap_or(self.generation_api_key),
            generation_api_host: lookup("GENERATION_API_HOST").unwrap_or(self.generation_api_host),
            generation_model: lookup("GENERATION_MODEL").unwrap_or(self.generation_model),
            generation_timeout_secs: parse_var(&lookup, "GENERATION_TIMEOUT_SECS")
                .unwrap_or(self.generation_timeout_secs),
            generation_max_retries: parse_var(&lookup, "GENERATION_MAX_RETRIES")
                .unwrap_or(self.generation_max_retries),
            output_dir: lookup("OUTPUT_DIR").unwrap_or(self.output_dir),
            raw_text_file: lookup("RAW_TEXT_FILE").or(self.raw_text_file),
            verbose_logging: parse_var(&lookup, "VERBOSE_LOGGING").unwrap_or(self.verbose_logging),
            requested_by: lookup("REQUESTED_BY").or(self.requested_by),
            exam: ExamSettings {
                class_level: lookup("EXAM_CLASS").unwrap_or(self.exam.class_level),
                subject: lookup("EXAM_SUBJECT").unwrap_or(self.exam.subject),
                paper: lookup("EXAM_PAPER").or(self.exam.paper),
                num_questions: parse_var(&lookup, "EXAM_NUM_QUESTIONS")
                    .unwrap_or(self.exam.num_questions),
                time_limit_minutes: parse_var(&lookup, "EXAM_TIME_LIMIT")
                    .unwrap_or(self.exam.time_limit_minutes),
            },
        }
    }

    /// 实际使用的生成服务地址
    pub fn api_url(&self) -> &str {
        self.generation_api_url
            .as_deref()
            .unwrap_or_else(|| self.generation_provider.default_api_url())
    }

    /// 把出卷参数解析成请求（不做范围校验）
    pub fn exam_request(&self) -> Result<ExamRequest, RequestError> {
        let class_level = ClassLevel::parse(&self.exam.class_level)?;
        let subject = Subject::find(&self.exam.subject)
            .ok_or_else(|| RequestError::UnknownSubject(self.exam.subject.clone()))?;
        let paper = match self.exam.paper.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(p) => Some(Paper::parse(p)?),
        };

        Ok(ExamRequest {
            class_level,
            subject,
            paper,
            num_questions: self.exam.num_questions,
            time_limit_minutes: self.exam.time_limit_minutes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_toml_overrides_defaults() {
        let config = Config::from_toml_str(
            r#"
            generation_provider = "openai"
            generation_model = "gpt-4o"
            output_dir = "papers"

            [exam]
            class_level = "Form 4"
            subject = "Chemistry"
            paper = "Paper 2"
            "#,
        )
        .unwrap();

        assert_eq!(config.generation_provider, Provider::OpenAi);
        assert_eq!(config.generation_model, "gpt-4o");
        assert_eq!(config.api_url(), "https://api.openai.com/v1");
        assert_eq!(config.output_dir, "papers");
        // 未出现的字段保持默认
        assert_eq!(config.generation_max_retries, 3);
        assert_eq!(config.exam.num_questions, 10);

        let request = config.exam_request().unwrap();
        assert_eq!(request.class_level, ClassLevel::Form4);
        assert_eq!(request.subject, Subject::Chemistry);
        assert_eq!(request.paper, Some(Paper::Two));
    }

    #[test]
    fn test_env_overrides_and_bad_values_fall_back() {
        let vars: HashMap<&str, &str> = [
            ("GENERATION_TIMEOUT_SECS", "15"),
            ("GENERATION_MAX_RETRIES", "not-a-number"),
            ("GENERATION_PROVIDER", "carrier-pigeon"),
            ("EXAM_SUBJECT", "biology"),
            ("EXAM_NUM_QUESTIONS", "25"),
            ("VERBOSE_LOGGING", "true"),
        ]
        .into_iter()
        .collect();

        let config =
            Config::default().with_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.generation_timeout_secs, 15);
        assert_eq!(config.generation_max_retries, 3);
        assert_eq!(config.generation_provider, Provider::RapidApi);
        assert!(config.verbose_logging);
        assert_eq!(config.api_url(), "https://chatgpt-api8.p.rapidapi.com/");

        let request = config.exam_request().unwrap();
        assert_eq!(request.subject, Subject::Biology);
        assert_eq!(request.num_questions, 25);
        assert_eq!(request.paper, None);
    }

    #[test]
    fn test_exam_request_rejects_unknown_subject() {
        let mut config = Config::default();
        config.exam.subject = "Alchemy".to_string();
        assert_eq!(
            config.exam_request(),
            Err(RequestError::UnknownSubject("Alchemy".to_string()))
        );
    }
}
