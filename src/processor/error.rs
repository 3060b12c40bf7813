//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载处理链路中的所有错误来源，避免字符串拼接式错误处理。
//! 通过 `thiserror` 保持人类可读错误，同时让调用侧可按分支匹配。
//!
//! 远程失败按 HTTP 状态分类为独立变体（429 / 402 / 无结果 / 其他），
//! 编排器据此进入 Failed 状态并携带 `FailureKind` 分类。

/// 处理链路统一错误类型。
///
/// 编排器边界会将其转换为 Failed 状态；二进制入口层上转为 `AppError`。
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("加载错误：{0}")]
    Load(String),

    #[error("解码错误：{0}")]
    Decode(String),

    #[error("编码错误：{0}")]
    Encode(String),

    #[error("格式错误：{0}")]
    InvalidFormat(String),

    #[error("文件错误：{0}")]
    FileSystem(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),

    #[error("远程服务限流（HTTP 429），请稍后再试")]
    RemoteRateLimited,

    #[error("远程服务余额不足（HTTP 402），请先充值")]
    RemotePaymentRequired,

    #[error("远程服务未返回上色结果")]
    RemoteNoResult,

    #[error("远程服务错误：{0}")]
    RemoteUnknown(String),

    #[error("正在处理其他图片，请稍后再试")]
    Busy,

    #[error("当前状态不允许该操作：{0}")]
    InvalidState(String),
}

/// 失败分类（Failed 状态所携带的语义）。
///
/// 与 `ProcessError` 一一对应，但可 `Copy`，便于状态机内保存与断言。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Load,
    Decode,
    Encode,
    InvalidFormat,
    FileSystem,
    ResourceLimit,
    RemoteRateLimited,
    RemotePaymentRequired,
    RemoteNoResult,
    RemoteUnknown,
    Busy,
    InvalidState,
}

impl ProcessError {
    /// 稳定错误码，供表现层做分支展示与日志聚合。
    pub fn code(&self) -> &'static str {
        match self {
            Self::Load(_) => "E_LOAD",
            Self::Decode(_) => "E_DECODE",
            Self::Encode(_) => "E_ENCODE",
            Self::InvalidFormat(_) => "E_INVALID_FORMAT",
            Self::FileSystem(_) => "E_FILESYSTEM",
            Self::ResourceLimit(_) => "E_RESOURCE_LIMIT",
            Self::RemoteRateLimited => "E_REMOTE_RATE_LIMITED",
            Self::RemotePaymentRequired => "E_REMOTE_PAYMENT_REQUIRED",
            Self::RemoteNoResult => "E_REMOTE_NO_RESULT",
            Self::RemoteUnknown(_) => "E_REMOTE_UNKNOWN",
            Self::Busy => "E_BUSY",
            Self::InvalidState(_) => "E_INVALID_STATE",
        }
    }

    /// 错误发生的处理阶段（用于诊断日志）。
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Load(_) | Self::InvalidFormat(_) | Self::FileSystem(_) | Self::ResourceLimit(_) => "load",
            Self::Decode(_) => "decode",
            Self::Encode(_) => "encode",
            Self::RemoteRateLimited
            | Self::RemotePaymentRequired
            | Self::RemoteNoResult
            | Self::RemoteUnknown(_) => "remote",
            Self::Busy | Self::InvalidState(_) => "orchestrate",
        }
    }

    /// 映射为可保存的失败分类。
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Load(_) => FailureKind::Load,
            Self::Decode(_) => FailureKind::Decode,
            Self::Encode(_) => FailureKind::Encode,
            Self::InvalidFormat(_) => FailureKind::InvalidFormat,
            Self::FileSystem(_) => FailureKind::FileSystem,
            Self::ResourceLimit(_) => FailureKind::ResourceLimit,
            Self::RemoteRateLimited => FailureKind::RemoteRateLimited,
            Self::RemotePaymentRequired => FailureKind::RemotePaymentRequired,
            Self::RemoteNoResult => FailureKind::RemoteNoResult,
            Self::RemoteUnknown(_) => FailureKind::RemoteUnknown,
            Self::Busy => FailureKind::Busy,
            Self::InvalidState(_) => FailureKind::InvalidState,
        }
    }
}

impl From<ProcessError> for String {
    /// 兼容部分仍使用字符串错误的调用点。
    fn from(error: ProcessError) -> Self {
        error.to_string()
    }
}
