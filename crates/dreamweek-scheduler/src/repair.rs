//! One-time repair for legacy templates written before templates carried a
//! back-reference to their dream.
//!
//! Not part of the instantiation path: until repaired, such templates are
//! treated as orphaned and produce no instances.

use serde::Serialize;
use tracing::{info, warn};

use dreamweek_core::models::dream::DreamDocument;

use crate::Scheduler;
use crate::error::SchedulerError;
use crate::events::Topic;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepairReport {
    /// Template ids that got a dream assigned.
    pub repaired: Vec<String>,
    /// Template ids with no matching dream.
    pub unresolved: Vec<String>,
}

impl RepairReport {
    pub fn is_noop(&self) -> bool {
        self.repaired.is_empty()
    }
}

/// Back-fill `dream_id` / `dream_title` on templates missing them.
///
/// A template is matched to the dream owning a goal with the template's id
/// (or `goal_id`); failing that, to the one dream holding a goal with the
/// same title. Templates that already name a dream only get a missing title
/// filled in.
pub fn repair_templates(doc: &mut DreamDocument) -> RepairReport {
    let mut report = RepairReport::default();

    for i in 0..doc.templates.len() {
        let template = &doc.templates[i];

        if let Some(dream_id) = template.dream_id.clone() {
            if template.dream_title.is_none() {
                let title = doc.dream(&dream_id).map(|d| d.title.clone());
                if title.is_some() {
                    doc.templates[i].dream_title = title;
                    report.repaired.push(doc.templates[i].id.clone());
                }
            }
            continue;
        }

        let by_id = [Some(template.id.as_str()), template.goal_id.as_deref()]
            .into_iter()
            .flatten()
            .find_map(|id| doc.locate_goal(id).map(|(d, _)| d));

        let owner = by_id.or_else(|| {
            let mut owners = doc
                .dreams
                .iter()
                .enumerate()
                .filter(|(_, dream)| dream.goals.iter().any(|g| g.title == template.title))
                .map(|(d, _)| d);
            match (owners.next(), owners.next()) {
                (Some(d), None) => Some(d),
                _ => None,
            }
        });

        match owner {
            Some(d) => {
                let (id, title) = (doc.dreams[d].id.clone(), doc.dreams[d].title.clone());
                let template = &mut doc.templates[i];
                template.dream_id = Some(id);
                template.dream_title = Some(title);
                report.repaired.push(template.id.clone());
            }
            None => report.unresolved.push(template.id.clone()),
        }
    }

    report
}

impl Scheduler {
    /// Run [`repair_templates`] against the stored dream document. Writes
    /// only when something was repaired.
    pub async fn repair_legacy_templates(&self, user_id: &str) -> Result<RepairReport, SchedulerError> {
        let mut doc = self.store().get_dreams(user_id).await?;
        let report = repair_templates(&mut doc);

        for template_id in &report.unresolved {
            warn!(user_id, template_id = %template_id, "template has no resolvable dream");
        }
        if report.is_noop() {
            return Ok(report);
        }

        self.store()
            .save_dreams(user_id, doc.dreams, doc.templates)
            .await?;
        info!(user_id, repaired = report.repaired.len(), "legacy templates repaired");
        self.bus().publish(Topic::DreamsUpdated);
        Ok(report)
    }
}
