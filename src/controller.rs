use crate::config::TimeoutsConfig;
use crate::error::{Error, Result};
use crate::powercfg::{ActivePlan, PowerCfg};
use crate::profile::{PowerProfile, TimeoutSetting, TimeoutTable};
use tracing::{info, warn};

/// Outcome of one `change-timeout` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeoutResult {
    pub setting: TimeoutSetting,
    pub minutes: u32,
    pub error: Option<String>,
}

/// What an apply actually changed, once activation has succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyReport {
    pub profile: PowerProfile,
    pub timestamp: String,
    pub timeouts: Vec<TimeoutResult>,
}

impl ApplyReport {
    /// True when every timeout setting was accepted.
    pub fn is_complete(&self) -> bool {
        self.timeouts.iter().all(|t| t.error.is_none())
    }

    pub fn failures(&self) -> impl Iterator<Item = &TimeoutResult> {
        self.timeouts.iter().filter(|t| t.error.is_some())
    }
}

/// Progress reported while a profile is being applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyStatus {
    Applying(PowerProfile),
    Applied(ApplyReport),
    Failed {
        profile: PowerProfile,
        reason: String,
    },
}

impl ApplyStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ApplyStatus::Applying(_))
    }

    /// Reason the apply should count as failed, if any. Timeout failures
    /// only count when `strict` is set.
    pub fn exit_error(&self, strict: bool) -> Option<String> {
        match self {
            ApplyStatus::Failed { reason, .. } => Some(reason.clone()),
            ApplyStatus::Applied(report) if strict && !report.is_complete() => Some(format!(
                "{} of {} timeout settings could not be applied",
                report.failures().count(),
                report.timeouts.len()
            )),
            _ => None,
        }
    }
}

impl std::fmt::Display for ApplyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApplyStatus::Applying(profile) => write!(f, "Applying {}...", profile),
            ApplyStatus::Applied(report) if report.is_complete() => {
                write!(f, "{} applied successfully", report.profile)
            }
            ApplyStatus::Applied(report) => {
                let failed: Vec<&str> = report
                    .failures()
                    .map(|t| t.setting.setting_name())
                    .collect();
                write!(
                    f,
                    "{} activated, but {} of {} timeout settings failed: {}",
                    report.profile,
                    failed.len(),
                    report.timeouts.len(),
                    failed.join(", ")
                )
            }
            ApplyStatus::Failed { reason, .. } => write!(f, "Error: {}", reason),
        }
    }
}

/// Queries and switches power plans through a [`PowerCfg`] backend.
#[derive(Debug)]
pub struct PlanController<P> {
    powercfg: P,
    timeouts: TimeoutsConfig,
}

impl<P: PowerCfg> PlanController<P> {
    pub fn new(powercfg: P) -> Self {
        Self {
            powercfg,
            timeouts: TimeoutsConfig::default(),
        }
    }

    pub fn with_timeouts(mut self, timeouts: TimeoutsConfig) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn powercfg(&self) -> &P {
        &self.powercfg
    }

    pub fn timeouts_for(&self, profile: PowerProfile) -> TimeoutTable {
        self.timeouts.table(profile)
    }

    /// Ask the platform which plan is active. Never retries.
    pub fn query(&mut self) -> ActivePlan {
        match self.powercfg.get_active_scheme() {
            Ok(text) => ActivePlan::identify(&text),
            Err(e) => {
                warn!("active scheme query failed: {}", e);
                ActivePlan::Error(e.to_string())
            }
        }
    }

    pub fn apply(&mut self, profile: PowerProfile) -> Result<ApplyReport> {
        self.apply_with_progress(profile, |_| {})
    }

    /// Activate `profile`, then set its six timeouts.
    ///
    /// `progress` sees exactly two events: `Applying`, then either `Applied`
    /// or `Failed`. Timeouts are only touched after activation succeeds; each
    /// timeout failure is recorded in the report without stopping the rest.
    pub fn apply_with_progress<F>(
        &mut self,
        profile: PowerProfile,
        mut progress: F,
    ) -> Result<ApplyReport>
    where
        F: FnMut(ApplyStatus),
    {
        progress(ApplyStatus::Applying(profile));
        info!(profile = %profile, "applying power plan");

        if let Err(source) = self.powercfg.set_active_scheme(profile.scheme_guid()) {
            let err = Error::Activation {
                profile,
                source: Box::new(source),
            };
            warn!("{}", err);
            progress(ApplyStatus::Failed {
                profile,
                reason: err.to_string(),
            });
            return Err(err);
        }

        let table = self.timeouts_for(profile);
        let mut timeouts = Vec::with_capacity(6);
        for (setting, minutes) in table.entries() {
            let error = match self.powercfg.change_timeout(setting, minutes) {
                Ok(()) => None,
                Err(e) => {
                    warn!(setting = %setting, minutes, "timeout setting failed: {}", e);
                    Some(e.to_string())
                }
            };
            timeouts.push(TimeoutResult {
                setting,
                minutes,
                error,
            });
        }

        let report = ApplyReport {
            profile,
            timestamp: chrono::Utc::now().to_rfc3339(),
            timeouts,
        };
        info!(
            profile = %profile,
            complete = report.is_complete(),
            "power plan applied"
        );
        progress(ApplyStatus::Applied(report.clone()));
        Ok(report)
    }
}
