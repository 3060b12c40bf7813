//! # 图片处理模块（processor）
//!
//! ## 设计思路
//!
//! 该模块将“上传加载 → 解码 → 灰度变换 / 远程上色 → 编码 → 产物管理”
//! 按职责拆分为多个子模块，避免单文件膨胀与耦合。
//!
//! - `orchestrator`：状态机，编排整条处理链路
//! - `loader`：负责文件 / 字节 / Base64 加载与签名校验
//! - `codec`：编解码能力接口与 `image` crate 实现
//! - `grayscale`：纯函数灰度变换
//! - `remote`：远程上色能力接口与 reqwest 实现
//! - `notify`：通知能力接口（表现层边界）
//! - `config / error / artifact`：配置、错误、数据模型
//!
//! ## 新同事快速上手
//!
//! 可以按下面顺序理解调用链：
//!
//! ```text
//! select_image(input)
//!    ↓
//! loader.rs（来源加载 + 签名校验）→ Original 产物
//!    ↓
//! orchestrator.rs（状态机：Loading → Processing）
//!    ├─ 灰度：codec.decode → grayscale → codec.encode
//!    └─ 上色：to_data_uri → remote.colorize → from_data_uri
//!    ↓
//! Succeeded（Processed 产物）/ Failed（FailureKind 分类）
//!    ↓
//! notify.rs（单次成功 / 失败通知）
//! ```

mod artifact;
mod codec;
mod config;
mod error;
mod grayscale;
mod loader;
mod notify;
mod orchestrator;
mod remote;

pub use artifact::{
    ArtifactRole, EncodedImage, ImageArtifact, ImageInput, Mode, PixelBuffer, ProcessingState,
};
pub use codec::{ImageCodec, RasterCodec};
pub use config::ProcessorConfig;
pub use error::{FailureKind, ProcessError};
pub use grayscale::{grayscale, grayscale_in_place};
pub use notify::{LogNotifier, Notifier};
pub use orchestrator::Orchestrator;
pub use remote::{HttpRemoteColorizer, RemoteColorizer};
