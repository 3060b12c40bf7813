//! # 通知能力模块
//!
//! 状态机自身不关心表现层（toast / 弹窗 / 终端），只在进入终态时
//! 调用注入的 `Notifier` 发出一次人类可读通知。默认实现走日志。

/// 通知能力接口：每次处理结束（成功或失败）恰好触发一次。
pub trait Notifier {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// 基于 `log` 的默认通知器。
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, message: &str) {
        log::info!("✅ {}", message);
    }

    fn error(&self, message: &str) {
        log::error!("❌ {}", message);
    }
}
