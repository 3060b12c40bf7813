//! # 图片上色 / 灰度转换 — 命令行入口
//!
//! 本文件仅负责日志初始化、参数解析与编排器装配。
//! 业务逻辑分布在各子模块中，详见 `lib.rs` 架构文档。
//!
//! 用法：
//!
//! ```text
//! image-colorizer <colorize|grayscale> <图片路径> [输出目录]
//! ```
//!
//! 上色模式通过 `COLORIZE_ENDPOINT` 环境变量指定远程服务地址。

use std::path::PathBuf;

use image_colorizer::error::AppError;
use image_colorizer::processor::{
    HttpRemoteColorizer, ImageInput, LogNotifier, Mode, Orchestrator, ProcessingState,
    ProcessorConfig, RasterCodec,
};

const USAGE: &str = "用法：image-colorizer <colorize|grayscale> <图片路径> [输出目录]";

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run().await {
        log::error!("运行失败: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let mode_arg = args.first().ok_or_else(|| AppError::Usage(USAGE.to_string()))?;
    let input_path = args.get(1).ok_or_else(|| AppError::Usage(USAGE.to_string()))?;
    let out_dir = match args.get(2) {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir()?,
    };

    let mode = Mode::from_str(mode_arg)?;

    let mut config = ProcessorConfig::default();
    if mode == Mode::Colorize {
        config.remote_endpoint = std::env::var("COLORIZE_ENDPOINT").map_err(|_| {
            AppError::Usage("上色模式需要设置 COLORIZE_ENDPOINT 环境变量".to_string())
        })?;
    }

    let codec = RasterCodec::new(&config);
    let remote = HttpRemoteColorizer::new(&config)?;
    let mut orchestrator = Orchestrator::new(config, codec, remote, LogNotifier)?;

    orchestrator.set_mode(mode)?;
    orchestrator
        .select_image(ImageInput::FilePath(input_path.clone()))
        .await?;

    match orchestrator.state() {
        ProcessingState::Succeeded => {
            let path = orchestrator.export_processed(&out_dir)?;
            log::info!("🎉 处理完成 - 输出文件: {}", path.display());
            Ok(())
        }
        // 失败详情已由编排器记录并通知，这里只决定退出码
        _ => Err(AppError::Failed(format!(
            "终态 {:?}，分类 {:?}",
            orchestrator.state(),
            orchestrator.last_failure()
        ))),
    }
}
