//! # 图片上色 / 灰度转换核心 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │              表现层（CLI / GUI / 服务端接入）              │
//! │                                                          │
//! │   上传入口 ── 模式切换 ── 对比展示 ── 下载导出             │
//! └───────┼──────────────────────────────────────────────────┘
//!         ↕ Result<T, AppError> / Notifier 通知
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕              核心（Rust）                         │
//! │                                                          │
//! │  ┌─ error ────────── AppError (入口层统一错误)             │
//! │  │                                                       │
//! │  └─ processor ────── 处理核心                             │
//! │      ├─ orchestrator  状态机 Idle→Loading→Processing→…   │
//! │      ├─ loader        文件/字节/Base64 加载 + 签名校验     │
//! │      ├─ codec         解码 / PNG 编码（能力接口）          │
//! │      ├─ grayscale     BT.601 亮度加权灰度（纯函数）        │
//! │      ├─ remote        远程上色客户端（能力接口）           │
//! │      └─ notify        单次成功/失败通知（能力接口）        │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 入口层统一错误类型 `AppError` |
//! | [`processor`] | 上传→处理→展示→重置状态机、灰度变换、编解码与远程上色 |

pub mod error;
pub mod processor;
