//! Visibility gating for meter windows
//!
//! `is_visible` is a pure predicate over a rule set and a [`VisibilityContext`]
//! captured once per frame from the game environment. Rules are checked in a
//! fixed order and the first matching hide rule wins, so `always_hide`
//! dominates everything else.

use lmeter_types::{
    ConnectionStatus, Job, JobType, VisibilityRules, VisibilitySettings,
    parse_job_list,
};
use thiserror::Error;
use tracing::debug;

/// Read-only queries against the game client
pub trait GameEnvironment {
    fn in_combat(&self) -> bool;
    fn in_duty(&self) -> bool;
    fn is_performing(&self) -> bool;
    fn in_pvp(&self) -> bool;
    fn in_golden_saucer(&self) -> bool;
    fn in_field_operation(&self) -> bool;
    /// Name of the logged in character, if any
    fn local_player_name(&self) -> Option<String>;
    fn job(&self) -> Job;
}

/// Environment state captured for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibilityContext {
    pub in_combat: bool,
    pub in_duty: bool,
    pub performing: bool,
    pub in_pvp: bool,
    pub in_golden_saucer: bool,
    pub in_field_operation: bool,
    pub connection: ConnectionStatus,
    pub job: Job,
}

impl VisibilityContext {
    pub fn capture(env: &dyn GameEnvironment, connection: ConnectionStatus) -> Self {
        Self {
            in_combat: env.in_combat(),
            in_duty: env.in_duty(),
            performing: env.is_performing(),
            in_pvp: env.in_pvp(),
            in_golden_saucer: env.in_golden_saucer(),
            in_field_operation: env.in_field_operation(),
            connection,
            job: env.job(),
        }
    }
}

/// Evaluate one rule set
pub fn is_visible(rules: &VisibilityRules, ctx: &VisibilityContext) -> bool {
    if rules.always_hide {
        return false;
    }
    if rules.hide_in_combat && ctx.in_combat {
        return false;
    }
    if rules.hide_outside_combat && !ctx.in_combat {
        return false;
    }
    if rules.hide_outside_duty && !ctx.in_duty {
        return false;
    }
    if rules.hide_while_performing && ctx.performing {
        return false;
    }
    if rules.hide_in_pvp && ctx.in_pvp {
        return false;
    }
    if rules.hide_in_golden_saucer && ctx.in_golden_saucer {
        return false;
    }
    if rules.hide_in_field_operations && ctx.in_field_operation {
        return false;
    }
    if rules.hide_if_not_connected && ctx.connection != ConnectionStatus::Connected {
        return false;
    }

    is_job_type(ctx.job, rules.show_for_job_types, &rules.custom_job_list)
}

/// Job filter: everything passes `All`, nothing passes `None`
pub fn is_job_type(job: Job, job_type: JobType, custom_jobs: &[Job]) -> bool {
    match job_type {
        JobType::All => true,
        JobType::Custom => custom_jobs.contains(&job),
        JobType::None => false,
    }
}

/// Evaluate the current-format page: every option must allow the window
pub fn settings_visible(settings: &VisibilitySettings, ctx: &VisibilityContext) -> bool {
    settings
        .options
        .iter()
        .all(|option| is_visible(&option.rules, ctx))
}

// ─────────────────────────────────────────────────────────────────────────────
// Custom Job List Editing
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum JobListError {
    #[error("unknown job '{token}' in custom job list")]
    UnknownJob { token: String },
}

/// Pending text of a custom job list edit.
///
/// Commits are all-or-nothing: a single bad token discards the pending text
/// and leaves the stored list untouched.
#[derive(Debug, Clone, Default)]
pub struct CustomJobEditor {
    pending: String,
}

impl CustomJobEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the pending text from the stored string if nothing is being edited
    pub fn begin(&mut self, rules: &VisibilityRules) {
        if self.pending.is_empty() {
            self.pending = rules.custom_job_string.to_uppercase();
        }
    }

    pub fn pending(&self) -> &str {
        &self.pending
    }

    pub fn set_pending(&mut self, text: impl Into<String>) {
        self.pending = text.into();
    }

    pub fn commit(&mut self, rules: &mut VisibilityRules) -> Result<(), JobListError> {
        let jobs = match parse_job_list(&self.pending) {
            Ok(jobs) => jobs,
            Err(e) => {
                debug!(input = %self.pending, token = %e.token, "Discarding custom job list edit");
                self.pending.clear();
                return Err(JobListError::UnknownJob { token: e.token });
            }
        };

        self.pending = self.pending.to_uppercase();
        rules.custom_job_string = self.pending.clone();
        rules.custom_job_list = jobs;
        Ok(())
    }
}
