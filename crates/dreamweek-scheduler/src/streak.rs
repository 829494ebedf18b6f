use tracing::debug;

use dreamweek_core::WeekId;
use dreamweek_core::calendar::{WeekLog, compute_streak};
use dreamweek_core::models::week::WeekStats;

use crate::Scheduler;
use crate::error::SchedulerError;

impl Scheduler {
    /// Consecutive successful weeks ending at `current`, counted from the
    /// stored week documents.
    pub async fn streak(
        &self,
        user_id: &str,
        start_date: jiff::civil::Date,
        current: WeekId,
    ) -> Result<u32, SchedulerError> {
        let first = WeekId::of(start_date);
        let mut log = WeekLog::new();

        for week_id in self.store().list_weeks(user_id).await? {
            if week_id < first || week_id > current {
                continue;
            }
            let Some(doc) = self.store().get_week(user_id, week_id).await? else {
                continue;
            };
            let stats = doc
                .stats
                .unwrap_or_else(|| WeekStats::from_goals(&doc.goals));
            log.insert(week_id, stats.is_successful());
        }

        let streak = compute_streak(&log, start_date, current);
        debug!(user_id, weeks = log.len(), streak, "streak computed");
        Ok(streak)
    }
}
