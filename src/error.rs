//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义二进制入口层的 `AppError`，替代分散的
//! `.map_err(|e| e.to_string())`、`format!(...)`、`expect()` 等不一致模式。
//! 处理链路内部使用 `ProcessError`，在入口层通过 `From` 上转，无需手动 map。

use crate::processor::ProcessError;

/// 应用级统一错误类型。
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 图片处理链路错误（加载 / 解码 / 变换 / 远程上色）
    #[error("{0}")]
    Process(#[from] ProcessError),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),

    /// 命令行用法错误
    #[error("用法错误: {0}")]
    Usage(String),

    /// 处理链路进入 Failed 终态（失败详情已由编排器记录）
    #[error("图片处理失败: {0}")]
    Failed(String),
}
