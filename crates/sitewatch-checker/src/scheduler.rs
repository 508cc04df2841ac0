use futures::FutureExt;
use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use sitewatch_config::CheckerConfig;
use sitewatch_store::{ObservationStore, SiteDirectory, StoreError};
use sitewatch_types::{Observation, Site, SiteStatus};

use crate::aggregator::AlertBatch;
use crate::dispatch::AlertDispatcher;
use crate::error::CheckerError;
use crate::probe::Prober;
use crate::tracker::{MemoryTracker, TransitionTracker};

/// 调度器所处阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Idle,
    EnumeratingSites,
    /// 正在处理第 i 个站点
    ProbingSite(usize),
    Aggregating,
    Notifying,
    Sleeping,
}

/// 调度参数
#[derive(Debug, Clone)]
pub struct SchedulerSettings {
    /// 两轮之间的休眠
    pub interval: Duration,
    /// 每个站点之后的间隔
    pub pacing: Duration,
    /// 单次日志写入的超时
    pub write_timeout: Duration,
    pub seed_from_history: bool,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self::from(&CheckerConfig::default())
    }
}

impl From<&CheckerConfig> for SchedulerSettings {
    fn from(config: &CheckerConfig) -> Self {
        Self {
            interval: config.interval(),
            pacing: config.pacing(),
            write_timeout: config.write_timeout(),
            seed_from_history: config.seed_from_history,
        }
    }
}

/// 单轮扫描统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub sites_checked: usize,
    pub observations_written: usize,
    pub write_failures: usize,
    /// 新的 在线→离线 转变
    pub transitions: usize,
    pub alerts_sent: usize,
    pub alerts_failed: usize,
    /// 收到停止请求，剩余站点未探测，本轮不发送告警
    pub interrupted: bool,
}

/// 可用性检查调度器
///
/// 单个 worker 顺序执行：枚举站点 → 逐个探测并记录 → 按用户聚合 → 发送告警 → 休眠。
/// 任何一轮的失败都在轮次边界被吞掉，循环继续。
pub struct Scheduler {
    directory: Arc<dyn SiteDirectory>,
    store: Arc<dyn ObservationStore>,
    prober: Arc<dyn Prober>,
    dispatcher: AlertDispatcher,
    tracker: Box<dyn TransitionTracker>,
    settings: SchedulerSettings,
    phase: watch::Sender<CyclePhase>,
    shutdown: Option<watch::Receiver<bool>>,
}

pub struct SchedulerHandle {
    shutdown_tx: watch::Sender<bool>,
    phase_rx: watch::Receiver<CyclePhase>,
    join_handle: JoinHandle<()>,
}

impl SchedulerHandle {
    /// 当前阶段
    pub fn phase(&self) -> CyclePhase {
        *self.phase_rx.borrow()
    }

    /// 请求停止：正在探测的站点处理完即退出
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.join_handle.await {
            error!("Scheduler task ended abnormally: {}", e);
        }
    }

    pub fn abort(self) {
        self.join_handle.abort();
    }
}

impl Scheduler {
    pub fn new(
        directory: Arc<dyn SiteDirectory>,
        store: Arc<dyn ObservationStore>,
        prober: Arc<dyn Prober>,
        dispatcher: AlertDispatcher,
        settings: SchedulerSettings,
    ) -> Self {
        let (phase, _) = watch::channel(CyclePhase::Idle);
        Self {
            directory,
            store,
            prober,
            dispatcher,
            tracker: Box::new(MemoryTracker::new()),
            settings,
            phase,
            shutdown: None,
        }
    }

    /// 替换状态表实现
    pub fn with_tracker(mut self, tracker: Box<dyn TransitionTracker>) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn phase(&self) -> CyclePhase {
        *self.phase.borrow()
    }

    pub fn subscribe_phase(&self) -> watch::Receiver<CyclePhase> {
        self.phase.subscribe()
    }

    pub fn tracker(&self) -> &dyn TransitionTracker {
        self.tracker.as_ref()
    }

    fn stop_requested(&self) -> bool {
        self.shutdown.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// 站点间隔；收到停止请求时提前结束
    async fn pace(&mut self) {
        let pacing = self.settings.pacing;
        match self.shutdown.as_mut() {
            Some(rx) => {
                tokio::select! {
                    _ = sleep(pacing) => {}
                    Ok(()) = rx.changed() => {}
                }
            }
            None => sleep(pacing).await,
        }
    }

    fn set_phase(&self, phase: CyclePhase) {
        debug!(?phase, "Scheduler phase");
        self.phase.send_replace(phase);
    }

    /// 用每个站点最近一条日志初始化状态表
    ///
    /// 重启前已报告过的宕机不会被当作新的转变再次告警。失败只记录日志。
    pub async fn seed_from_history(&mut self) -> usize {
        let sites = match self.directory.list_sites().await {
            Ok(sites) => sites,
            Err(e) => {
                warn!(error = %e, "Could not list sites for state seeding, starting empty");
                return 0;
            }
        };

        let mut seeded = 0;
        for site in &sites {
            let latest = timeout(self.settings.write_timeout, self.store.latest(&site.id))
                .await
                .unwrap_or(Err(StoreError::Timeout));
            match latest {
                Ok(Some(observation)) => {
                    self.tracker.seed(&site.id, observation.status);
                    seeded += 1;
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(site_id = %site.id, error = %e, "Could not read latest observation");
                }
            }
        }

        info!(seeded, sites = sites.len(), "Seeded transition state from history");
        seeded
    }

    /// 执行一轮扫描
    pub async fn run_cycle(&mut self) -> Result<CycleReport, CheckerError> {
        let mut report = CycleReport::default();

        self.set_phase(CyclePhase::EnumeratingSites);
        let sites = self
            .directory
            .list_sites()
            .await
            .map_err(CheckerError::ListSites)?;

        if sites.is_empty() {
            info!("No registered sites");
            return Ok(report);
        }

        let emails = self
            .directory
            .list_user_emails()
            .await
            .map_err(CheckerError::ListUsers)?;

        let live: HashSet<&str> = sites.iter().map(|s| s.id.as_str()).collect();
        self.tracker.retain(&live);

        let mut batch = AlertBatch::new();
        for (index, site) in sites.iter().enumerate() {
            if self.stop_requested() {
                info!(
                    checked = report.sites_checked,
                    remaining = sites.len() - index,
                    "Stop requested, abandoning check cycle"
                );
                report.interrupted = true;
                return Ok(report);
            }

            self.set_phase(CyclePhase::ProbingSite(index));
            self.check_site(site, &emails, &mut batch, &mut report).await;

            if !self.settings.pacing.is_zero() {
                self.pace().await;
            }
        }

        self.set_phase(CyclePhase::Aggregating);
        let alerts = batch.into_alerts();
        debug!(users = alerts.len(), "Aggregated outage alerts");

        self.set_phase(CyclePhase::Notifying);
        for alert in alerts {
            info!(
                user_id = %alert.user_id,
                recipient = %alert.email,
                sites = ?alert.urls,
                "Sending outage alert"
            );
            if self.dispatcher.notify(&alert.email, &alert.urls).await {
                report.alerts_sent += 1;
            } else {
                report.alerts_failed += 1;
            }
        }

        Ok(report)
    }

    async fn check_site(
        &mut self,
        site: &Site,
        emails: &HashMap<String, String>,
        batch: &mut AlertBatch,
        report: &mut CycleReport,
    ) {
        let result = self.prober.probe(&site.url).await;
        report.sites_checked += 1;

        debug!(
            site_id = %site.id,
            url = %site.url,
            status = %result.status,
            latency_ms = result.latency_ms,
            "Probe finished"
        );

        // 探测失败也要写日志；写入失败不影响后续判断
        let observation = Observation::new(site.id.clone(), result);
        let written = timeout(self.settings.write_timeout, self.store.record(&observation))
            .await
            .unwrap_or(Err(StoreError::Timeout));
        match written {
            Ok(()) => report.observations_written += 1,
            Err(e) => {
                report.write_failures += 1;
                warn!(site_id = %site.id, error = %e, "Failed to record observation");
            }
        }

        let previous = self.tracker.last_status(&site.id);
        let went_offline = self.tracker.update(&site.id, result.status);

        if previous == Some(SiteStatus::Offline) && result.status == SiteStatus::Online {
            info!(site_id = %site.id, url = %site.url, "Site recovered");
        }

        if !went_offline {
            return;
        }

        report.transitions += 1;
        warn!(site_id = %site.id, url = %site.url, name = %site.display_name(), "Site went offline");

        let owner = site
            .user_id
            .as_ref()
            .and_then(|user_id| emails.get(user_id).map(|email| (user_id, email)));

        match owner {
            Some((user_id, email)) => batch.push(user_id, email, &site.url),
            None => {
                info!(
                    site_id = %site.id,
                    user_id = ?site.user_id,
                    "Site owner has no contact address, alert skipped"
                );
            }
        }
    }

    /// 在轮次边界捕获错误和 panic
    pub async fn run_guarded_cycle(&mut self) -> Result<CycleReport, CheckerError> {
        match AssertUnwindSafe(self.run_cycle()).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => Err(CheckerError::Panicked(panic_message(panic.as_ref()))),
        }
    }

    /// 无限循环，直到收到停止信号
    pub async fn run(mut self, mut shutdown_rx: watch::Receiver<bool>) {
        info!(interval = ?self.settings.interval, "Starting uptime checker");
        self.shutdown = Some(shutdown_rx.clone());

        if self.settings.seed_from_history {
            self.seed_from_history().await;
        }

        loop {
            if *shutdown_rx.borrow() {
                break;
            }

            match self.run_guarded_cycle().await {
                Ok(report) => {
                    info!(
                        sites = report.sites_checked,
                        written = report.observations_written,
                        write_failures = report.write_failures,
                        transitions = report.transitions,
                        alerts_sent = report.alerts_sent,
                        alerts_failed = report.alerts_failed,
                        interrupted = report.interrupted,
                        "Check cycle completed"
                    );
                }
                Err(e) => {
                    error!(error = %e, "Check cycle failed");
                }
            }

            if *shutdown_rx.borrow() {
                break;
            }

            self.set_phase(CyclePhase::Sleeping);
            tokio::select! {
                _ = sleep(self.settings.interval) => {}
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        self.set_phase(CyclePhase::Idle);
        info!("Uptime checker stopped");
    }

    pub fn spawn(self) -> SchedulerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let phase_rx = self.subscribe_phase();
        let join_handle = tokio::spawn(self.run(shutdown_rx));

        SchedulerHandle {
            shutdown_tx,
            phase_rx,
            join_handle,
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
