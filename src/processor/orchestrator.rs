//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `Orchestrator` 是“上传 → 处理 → 展示 → 重置”的状态机，独占持有
//! 当前模式、原图 / 结果图产物与处理状态：
//!
//! ```text
//! Idle → Loading → Processing → {Succeeded, Failed}
//!   ↑                               │
//!   └──────── reset() ──────────────┘（或新上传回到 Loading）
//! ```
//!
//! 处理失败不向调用方抛出：统一在编排器边界转换为 Failed 状态并携带
//! `FailureKind` 分类，同时保留原图，用户可直接重试而无需重新上传。
//! 方法返回 `Err` 仅表示“调用本身被拒绝”（忙碌中 / 状态不允许），
//! 此时状态不发生任何变化。
//!
//! ## 实现思路
//!
//! - 每个实例单逻辑流：处理中拒绝一切新的 `select_image` / `set_mode` / `reset`。
//! - 远程调用是唯一的挂起点；结果交付绑定发起时的 epoch，
//!   状态机若已前进则丢弃过期结果。
//! - 记录 decode / transform / encode / remote 阶段耗时，便于性能诊断。

use std::path::{Path, PathBuf};
use std::time::Instant;

use super::codec::ImageCodec;
use super::grayscale::grayscale_in_place;
use super::loader;
use super::notify::Notifier;
use super::remote::RemoteColorizer;
use super::{
    ArtifactRole, EncodedImage, FailureKind, ImageArtifact, ImageInput, Mode, ProcessError,
    ProcessingState, ProcessorConfig,
};

/// 图片处理编排器。
///
/// 对编解码、远程上色与通知均只依赖能力接口，便于按平台替换与测试注入。
pub struct Orchestrator<C, R, N> {
    config: ProcessorConfig,
    codec: C,
    remote: R,
    notifier: N,
    mode: Mode,
    state: ProcessingState,
    original: Option<ImageArtifact>,
    processed: Option<ImageArtifact>,
    last_failure: Option<FailureKind>,
    epoch: u64,
}

impl<C, R, N> Orchestrator<C, R, N>
where
    C: ImageCodec,
    R: RemoteColorizer,
    N: Notifier,
{
    /// 根据配置创建编排器，初始状态 Idle、默认模式 Colorize（与原始应用一致）。
    pub fn new(
        config: ProcessorConfig,
        codec: C,
        remote: R,
        notifier: N,
    ) -> Result<Self, ProcessError> {
        config.validate()?;

        Ok(Self {
            config,
            codec,
            remote,
            notifier,
            mode: Mode::Colorize,
            state: ProcessingState::Idle,
            original: None,
            processed: None,
            last_failure: None,
            epoch: 0,
        })
    }

    pub fn state(&self) -> ProcessingState {
        self.state
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn original(&self) -> Option<&ImageArtifact> {
        self.original.as_ref()
    }

    pub fn processed(&self) -> Option<&ImageArtifact> {
        self.processed.as_ref()
    }

    /// 最近一次失败的分类；仅在 Failed 状态下为 `Some`。
    pub fn last_failure(&self) -> Option<FailureKind> {
        self.last_failure
    }

    /// 上传新图片并按当前模式处理。
    ///
    /// 处理中调用返回 `Err(Busy)`，状态不变；加载 / 处理失败落入 Failed 状态，
    /// 本方法仍返回 `Ok(())`。
    pub async fn select_image(&mut self, input: ImageInput) -> Result<(), ProcessError> {
        if self.state.is_busy() {
            return Err(ProcessError::Busy);
        }

        self.state = ProcessingState::Loading;
        // 新一轮上传：结果图立即作废，Failed 状态绝不暴露部分结果
        self.processed = None;
        self.last_failure = None;
        log::info!("📥 开始加载上传图片");

        let image = match loader::load_input(input, &self.config) {
            Ok(image) => image,
            Err(err) => {
                // 新图尚未就位：上一张原图保留，用户无需重新上传
                self.fail(err);
                return Ok(());
            }
        };

        self.original = Some(ImageArtifact {
            image,
            role: ArtifactRole::Original,
        });

        self.run_current_mode().await;
        Ok(())
    }

    /// 切换处理模式。不会自动触发重新处理：模式在下一次
    /// `select_image` 或显式 `reprocess` 时生效。
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), ProcessError> {
        if self.state.is_busy() {
            return Err(ProcessError::Busy);
        }

        self.mode = mode;
        log::info!("⚙️ 已切换处理模式：{}", mode.as_str());
        Ok(())
    }

    /// 以当前模式重新处理已上传的原图（失败后重试无需重新上传）。
    pub async fn reprocess(&mut self) -> Result<(), ProcessError> {
        if self.state.is_busy() {
            return Err(ProcessError::Busy);
        }
        if self.original.is_none() {
            return Err(ProcessError::InvalidState("没有可处理的原图".to_string()));
        }

        self.processed = None;
        self.last_failure = None;
        self.run_current_mode().await;
        Ok(())
    }

    /// 清空产物并回到 Idle。处理中调用返回 `Err(Busy)`。
    pub fn reset(&mut self) -> Result<(), ProcessError> {
        if self.state.is_busy() {
            return Err(ProcessError::Busy);
        }

        self.original = None;
        self.processed = None;
        self.last_failure = None;
        self.state = ProcessingState::Idle;
        log::info!("🧹 已重置编排器状态");
        Ok(())
    }

    /// 结果图导出文件名：`processed-<mode>-<毫秒时间戳>.png`。
    pub fn export_file_name(&self) -> Option<String> {
        self.processed.as_ref()?;
        Some(format!(
            "processed-{}-{}.png",
            self.mode.as_str(),
            chrono::Utc::now().timestamp_millis()
        ))
    }

    /// 将结果图写入目标目录，返回完整路径。
    pub fn export_processed(&self, dir: &Path) -> Result<PathBuf, ProcessError> {
        let processed = self
            .processed
            .as_ref()
            .ok_or_else(|| ProcessError::InvalidState("没有可导出的处理结果".to_string()))?;
        let file_name = self
            .export_file_name()
            .ok_or_else(|| ProcessError::InvalidState("没有可导出的处理结果".to_string()))?;

        std::fs::create_dir_all(dir)
            .map_err(|e| ProcessError::FileSystem(format!("无法创建导出目录：{}", e)))?;

        let path = dir.join(file_name);
        std::fs::write(&path, processed.image.as_bytes())
            .map_err(|e| ProcessError::FileSystem(format!("无法写入导出文件：{}", e)))?;

        log::info!("💾 已导出处理结果 - 路径: {}", path.display());
        Ok(path)
    }

    /// 按当前模式执行处理流水线并落入终态。
    async fn run_current_mode(&mut self) {
        self.state = ProcessingState::Processing;
        self.epoch += 1;
        let issued_epoch = self.epoch;

        let total_start = Instant::now();
        let outcome = match self.mode {
            Mode::Grayscale => self.run_grayscale(),
            Mode::Colorize => self.run_colorize().await,
        };

        // 结果交付绑定发起时的状态：状态机若已前进，丢弃过期结果
        if self.state != ProcessingState::Processing || self.epoch != issued_epoch {
            log::warn!("⚠️ 丢弃过期处理结果（epoch {}）", issued_epoch);
            return;
        }

        match outcome {
            Ok(image) => {
                self.processed = Some(ImageArtifact {
                    image,
                    role: ArtifactRole::Processed,
                });
                self.state = ProcessingState::Succeeded;

                log::info!(
                    "✅ 图片处理完成 - mode={} total={}ms",
                    self.mode.as_str(),
                    total_start.elapsed().as_millis()
                );
                self.notifier.success(match self.mode {
                    Mode::Grayscale => "图片已转换为灰度！",
                    Mode::Colorize => "图片上色成功！",
                });
            }
            Err(err) => self.fail(err),
        }
    }

    /// 灰度链路：解码 → 变换 → PNG 编码，全程本地同步执行。
    fn run_grayscale(&self) -> Result<EncodedImage, ProcessError> {
        let original = self
            .original
            .as_ref()
            .ok_or_else(|| ProcessError::InvalidState("没有可处理的原图".to_string()))?;

        let decode_start = Instant::now();
        let mut pixels = self.codec.decode(&original.image)?;
        let decode_elapsed = decode_start.elapsed();

        let transform_start = Instant::now();
        grayscale_in_place(&mut pixels);
        let transform_elapsed = transform_start.elapsed();

        let encode_start = Instant::now();
        let encoded = self.codec.encode(&pixels)?;
        let encode_elapsed = encode_start.elapsed();

        log::info!(
            "🎞️ 灰度链路完成 - decode={}ms transform={}ms encode={}ms",
            decode_elapsed.as_millis(),
            transform_elapsed.as_millis(),
            encode_elapsed.as_millis()
        );

        Ok(encoded)
    }

    /// 上色链路：原图编码为 data URI，调用远程服务并校验返回产物。
    async fn run_colorize(&self) -> Result<EncodedImage, ProcessError> {
        let original = self
            .original
            .as_ref()
            .ok_or_else(|| ProcessError::InvalidState("没有可处理的原图".to_string()))?;

        let payload = original.image.to_data_uri();

        let remote_start = Instant::now();
        let colorized = self.remote.colorize(&payload).await?;
        let remote_elapsed = remote_start.elapsed();

        log::info!("🌈 远程上色返回 - remote={}ms", remote_elapsed.as_millis());

        EncodedImage::from_data_uri(&colorized, self.config.max_file_size).map_err(|err| {
            log::warn!("⚠️ 远程返回的图片数据无法解析：{}", err);
            ProcessError::RemoteNoResult
        })
    }

    /// 统一失败入口：记录分类、进入 Failed、发出单次通知。原图保持不变。
    fn fail(&mut self, err: ProcessError) {
        log::error!(
            "❌ 图片处理失败 - stage={} code={} {}",
            err.stage(),
            err.code(),
            err
        );

        self.last_failure = Some(err.kind());
        self.state = ProcessingState::Failed;
        self.notifier.error(&err.to_string());
    }
}
