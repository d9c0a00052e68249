use praxis_store::Store;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// Host-side schedule for the retention sweep. The engine does not run a
/// timer itself; the host's scheduler calls [`crate::Engine::sweep`] on
/// this cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Cron expression. Default: midnight on the first of each month.
    #[serde(default = "default_schedule")]
    pub schedule: String,
}

fn default_enabled() -> bool {
    true
}

fn default_schedule() -> String {
    "0 0 1 * *".to_string()
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            schedule: default_schedule(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub scanned: usize,
    pub deleted: usize,
    pub failed: usize,
}

impl<S: Store> crate::Engine<S> {
    /// Erase every inactive client whose grace period has elapsed. One
    /// client's failure is logged and counted, never lets it abort the
    /// rest; a failed scan is logged and reported as an empty sweep rather
    /// than surfacing to the scheduler.
    pub fn sweep(&self) -> SweepReport {
        let now = self.now();
        let due = match self.store.clients_due_for_deletion(now) {
            Ok(due) => due,
            Err(err) => {
                error!(error = %err, "retention scan failed");
                return SweepReport::default();
            }
        };

        let mut report = SweepReport {
            scanned: due.len(),
            ..Default::default()
        };
        for client in due {
            match self.delete_by_email(&client.email) {
                Ok(()) => {
                    report.deleted += 1;
                    info!(client = %client.id, "retention sweep erased client");
                }
                Err(err) => {
                    report.failed += 1;
                    warn!(client = %client.id, error = %err, "retention sweep skipped client after failure");
                }
            }
        }
        if report.scanned > 0 {
            info!(
                scanned = report.scanned,
                deleted = report.deleted,
                failed = report.failed,
                "retention sweep finished"
            );
        }
        report
    }
}
