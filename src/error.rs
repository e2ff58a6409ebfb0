use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 试卷请求参数错误
    #[error("请求错误: {0}")]
    Request(#[from] RequestError),
    /// 题目生成服务错误
    #[error("生成服务错误: {0}")]
    Generation(#[from] GenerationError),
    /// 文本切分错误
    #[error("切分错误: {0}")]
    Segment(#[from] SegmentError),
    /// PDF 渲染错误
    #[error("渲染错误: {0}")]
    Render(#[from] RenderError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文件操作错误
    #[error("文件错误 ({path}): {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 后台任务异常退出
    #[error("后台任务失败: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// 文本切分错误
///
/// 只在可失败的入口中出现，不可失败的入口会把它降级为占位文本
#[derive(Debug, Error)]
pub enum SegmentError {
    /// 输入不是合法的 UTF-8
    #[error("输入文本编码无效 (字节偏移 {offset})")]
    InvalidEncoding { offset: usize },
}

/// PDF 渲染错误，属于致命错误，必须向上传递
#[derive(Debug, Error)]
pub enum RenderError {
    /// 内置字体无法编码的字符
    #[error("{location} 包含无法编码的字符 {ch:?}")]
    UnsupportedCharacter { location: String, ch: char },
    /// printpdf 内部错误
    #[error("PDF 生成失败: {0}")]
    Pdf(String),
}

/// 题目生成服务错误
#[derive(Debug, Error)]
pub enum GenerationError {
    /// 网络请求失败
    #[error("请求失败 ({endpoint}): {message}")]
    RequestFailed { endpoint: String, message: String },
    /// 服务返回非成功状态
    #[error("服务返回错误状态 ({endpoint}): {status}")]
    BadStatus { endpoint: String, status: u16 },
    /// 响应格式不符合预期
    #[error("响应格式错误 ({endpoint}): {message}")]
    MalformedResponse { endpoint: String, message: String },
    /// 响应内容为空
    #[error("服务返回空内容 ({endpoint})")]
    EmptyResponse { endpoint: String },
    /// 单次请求超时
    #[error("请求超时 ({endpoint}), 超过 {secs} 秒")]
    Timeout { endpoint: String, secs: u64 },
}

/// 试卷请求参数错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    /// 无法识别的年级
    #[error("无法识别的年级: {0}")]
    UnknownClass(String),
    /// 无法识别的科目
    #[error("无法识别的科目: {0}")]
    UnknownSubject(String),
    /// 无法识别的试卷编号
    #[error("无法识别的试卷: {0}")]
    UnknownPaper(String),
    /// 该年级/科目组合不分卷
    #[error("{class} {subject} 不支持选择试卷")]
    PaperNotOffered { class: String, subject: String },
    /// 题目数量超出范围
    #[error("题目数量 {value} 超出范围 [{min}, {max}]")]
    QuestionCountOutOfRange { value: u32, min: u32, max: u32 },
    /// 考试时长超出范围
    #[error("考试时长 {value} 分钟超出范围 [{min}, {max}]")]
    TimeLimitOutOfRange { value: u32, min: u32, max: u32 },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件读取失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 未知的生成服务类型
    #[error("未知的生成服务: {0}")]
    UnknownProvider(String),
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件操作错误
    pub fn file(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File {
            path: path.into(),
            source,
        }
    }
}

impl GenerationError {
    /// 创建网络请求失败错误
    pub fn request_failed(endpoint: impl Into<String>, message: impl ToString) -> Self {
        GenerationError::RequestFailed {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }

    /// 创建响应格式错误
    pub fn malformed(endpoint: impl Into<String>, message: impl ToString) -> Self {
        GenerationError::MalformedResponse {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }

    /// 是否值得重试
    ///
    /// 格式错误说明服务行为稳定地不符合预期，重试没有意义
    pub fn is_retryable(&self) -> bool {
        !matches!(self, GenerationError::MalformedResponse { .. })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
