use crate::core::poller::PassReport;
use crate::{Error, Result};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

static START_TIME: OnceLock<i64> = OnceLock::new();

static PASSES_TOTAL: AtomicU64 = AtomicU64::new(0);
static NOTIFICATIONS_SENT_TOTAL: AtomicU64 = AtomicU64::new(0);
static NOTIFICATIONS_SUPPRESSED_TOTAL: AtomicU64 = AtomicU64::new(0);
static SYMBOL_FAILURES_TOTAL: AtomicU64 = AtomicU64::new(0);
static LAST_PASS_TIMESTAMP: AtomicU64 = AtomicU64::new(0);

pub fn init_start_time() {
    let _ = START_TIME.set(now_epoch());
}

pub fn record_pass(report: &PassReport) {
    PASSES_TOTAL.fetch_add(1, Ordering::Relaxed);
    NOTIFICATIONS_SENT_TOTAL.fetch_add(report.notified() as u64, Ordering::Relaxed);
    NOTIFICATIONS_SUPPRESSED_TOTAL.fetch_add(report.suppressed() as u64, Ordering::Relaxed);
    SYMBOL_FAILURES_TOTAL.fetch_add(report.failed() as u64, Ordering::Relaxed);
    LAST_PASS_TIMESTAMP.store(now_epoch() as u64, Ordering::Relaxed);
}

pub fn write_if_configured() -> Result<()> {
    let path = match std::env::var("TICKWATCH_METRICS_PATH") {
        Ok(value) if !value.trim().is_empty() => value,
        _ => return Ok(()),
    };
    write_metrics(&path)
}

pub fn write_metrics(path: &str) -> Result<()> {
    let content = render();
    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| Error::io(format!("metrics dir create failed: {err}")))?;
    }
    fs::write(path, content).map_err(|err| Error::io(format!("metrics write failed: {err}")))
}

pub fn render() -> String {
    let mut output = String::new();
    push_line(&mut output, "# HELP tickwatch_up Tickwatch process up");
    push_line(&mut output, "# TYPE tickwatch_up gauge");
    push_line(&mut output, "tickwatch_up 1");
    push_line(
        &mut output,
        "# HELP tickwatch_uptime_seconds Process uptime in seconds",
    );
    push_line(&mut output, "# TYPE tickwatch_uptime_seconds gauge");
    push_line(
        &mut output,
        &format!("tickwatch_uptime_seconds {}", uptime_seconds()),
    );
    push_line(&mut output, "# HELP tickwatch_passes_total Total poll passes");
    push_line(&mut output, "# TYPE tickwatch_passes_total counter");
    push_line(
        &mut output,
        &format!(
            "tickwatch_passes_total {}",
            PASSES_TOTAL.load(Ordering::Relaxed)
        ),
    );
    push_line(
        &mut output,
        "# HELP tickwatch_notifications_sent_total Notifications delivered",
    );
    push_line(&mut output, "# TYPE tickwatch_notifications_sent_total counter");
    push_line(
        &mut output,
        &format!(
            "tickwatch_notifications_sent_total {}",
            NOTIFICATIONS_SENT_TOTAL.load(Ordering::Relaxed)
        ),
    );
    push_line(
        &mut output,
        "# HELP tickwatch_notifications_suppressed_total Unchanged signals not re-sent",
    );
    push_line(
        &mut output,
        "# TYPE tickwatch_notifications_suppressed_total counter",
    );
    push_line(
        &mut output,
        &format!(
            "tickwatch_notifications_suppressed_total {}",
            NOTIFICATIONS_SUPPRESSED_TOTAL.load(Ordering::Relaxed)
        ),
    );
    push_line(
        &mut output,
        "# HELP tickwatch_symbol_failures_total Per-symbol evaluation failures",
    );
    push_line(&mut output, "# TYPE tickwatch_symbol_failures_total counter");
    push_line(
        &mut output,
        &format!(
            "tickwatch_symbol_failures_total {}",
            SYMBOL_FAILURES_TOTAL.load(Ordering::Relaxed)
        ),
    );
    push_line(
        &mut output,
        "# HELP tickwatch_last_pass_timestamp Last pass timestamp (epoch seconds)",
    );
    push_line(&mut output, "# TYPE tickwatch_last_pass_timestamp gauge");
    push_line(
        &mut output,
        &format!(
            "tickwatch_last_pass_timestamp {}",
            LAST_PASS_TIMESTAMP.load(Ordering::Relaxed)
        ),
    );
    output
}

fn now_epoch() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_secs() as i64)
        .unwrap_or(0)
}

fn uptime_seconds() -> i64 {
    let start = START_TIME.get().copied().unwrap_or_else(now_epoch);
    now_epoch().saturating_sub(start)
}

fn push_line(target: &mut String, line: &str) {
    target.push_str(line);
    target.push('\n');
}
