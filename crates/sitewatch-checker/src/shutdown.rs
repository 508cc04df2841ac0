use anyhow::Result;
use tokio::signal;
use tracing::info;

/// 关闭信号类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    /// SIGTERM - 优雅关闭
    Term,

    /// SIGINT - Ctrl+C
    Interrupt,
}

/// 等待系统信号
#[cfg(unix)]
pub async fn wait_for_signal() -> Result<ShutdownSignal> {
    use signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    let received = tokio::select! {
        _ = sigterm.recv() => ShutdownSignal::Term,
        _ = sigint.recv() => ShutdownSignal::Interrupt,
    };

    info!(signal = ?received, "Received shutdown signal");
    Ok(received)
}

/// 等待系统信号（Windows 版本）
#[cfg(not(unix))]
pub async fn wait_for_signal() -> Result<ShutdownSignal> {
    signal::ctrl_c().await?;
    info!("Received Ctrl+C");
    Ok(ShutdownSignal::Interrupt)
}
