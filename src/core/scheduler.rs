use crate::config::Settings;
use crate::domain::model::JobReport;
use crate::domain::ports::ScheduledJob;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// 30 年後，時間溢位時當成「永遠不會到」
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

fn due_after(interval: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(interval)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

/// Stops a running [`Scheduler`] from another task. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SchedulerHandle {
    shutdown: Arc<watch::Sender<bool>>,
}

impl SchedulerHandle {
    /// A run in flight is finished first; the loop exits at the next poll.
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    pub fn is_shutdown(&self) -> bool {
        *self.shutdown.borrow()
    }
}

/// Fixed-interval scheduler driven by a polling loop.
///
/// Runs are awaited inside the loop, so at most one is ever in flight and a
/// slow run pushes back the following ones. The next due time is counted
/// from the end of the previous run.
pub struct Scheduler<J: ScheduledJob> {
    job: J,
    interval: Duration,
    poll_interval: Duration,
    next_run: Instant,
    runs: u64,
    shutdown: Arc<watch::Sender<bool>>,
}

impl<J: ScheduledJob> Scheduler<J> {
    pub fn new(job: J, interval: Duration, poll_interval: Duration) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            job,
            interval,
            poll_interval,
            next_run: due_after(interval),
            runs: 0,
            shutdown: Arc::new(shutdown),
        }
    }

    pub fn from_settings(job: J, settings: &Settings) -> Self {
        Self::new(job, settings.interval(), settings.poll_interval())
    }

    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            shutdown: Arc::clone(&self.shutdown),
        }
    }

    pub fn next_run(&self) -> Instant {
        self.next_run
    }

    pub fn runs(&self) -> u64 {
        self.runs
    }

    pub fn is_due(&self) -> bool {
        Instant::now() >= self.next_run
    }

    /// Runs the job right away and schedules the next run one interval later.
    pub async fn start(&mut self) -> JobReport {
        self.run_now().await
    }

    /// One poll cycle: runs the job if it is due.
    pub async fn run_pending(&mut self) -> Option<JobReport> {
        if !self.is_due() {
            return None;
        }
        Some(self.run_now().await)
    }

    async fn run_now(&mut self) -> JobReport {
        let report = self.job.run_job().await;
        self.runs += 1;
        self.next_run = due_after(self.interval);
        tracing::debug!(
            "Run {} finished ({}), next run in {:?}",
            self.runs,
            report.run_id,
            self.interval
        );
        report
    }

    /// Loops until [`SchedulerHandle::shutdown`] is called. Returns the
    /// number of runs performed.
    pub async fn run_forever(mut self, run_immediately: bool) -> u64 {
        let mut shutdown = self.shutdown.subscribe();

        if run_immediately && !*shutdown.borrow() {
            self.start().await;
        }

        tracing::info!(
            "⏰ Scheduler started. Next posts will run every {} minutes...",
            self.interval.as_secs() / 60
        );

        loop {
            if *shutdown.borrow_and_update() {
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {
                    self.run_pending().await;
                }
                _ = shutdown.changed() => {}
            }
        }

        tracing::info!("🛑 Scheduler stopped after {} runs", self.runs);
        self.runs
    }
}
