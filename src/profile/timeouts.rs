use serde::{Deserialize, Serialize};

/// One of the six timeout fields set alongside a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeoutSetting {
    MonitorAc,
    MonitorDc,
    StandbyAc,
    StandbyDc,
    HibernateAc,
    HibernateDc,
}

impl TimeoutSetting {
    /// Order in which the settings are issued.
    pub const ALL: [TimeoutSetting; 6] = [
        TimeoutSetting::MonitorAc,
        TimeoutSetting::MonitorDc,
        TimeoutSetting::StandbyAc,
        TimeoutSetting::StandbyDc,
        TimeoutSetting::HibernateAc,
        TimeoutSetting::HibernateDc,
    ];

    /// Setting name as understood by `powercfg /change`.
    pub fn setting_name(&self) -> &'static str {
        match self {
            TimeoutSetting::MonitorAc => "monitor-timeout-ac",
            TimeoutSetting::MonitorDc => "monitor-timeout-dc",
            TimeoutSetting::StandbyAc => "standby-timeout-ac",
            TimeoutSetting::StandbyDc => "standby-timeout-dc",
            TimeoutSetting::HibernateAc => "hibernate-timeout-ac",
            TimeoutSetting::HibernateDc => "hibernate-timeout-dc",
        }
    }
}

impl std::fmt::Display for TimeoutSetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.setting_name())
    }
}

/// Timeouts in minutes; 0 disables the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeoutTable {
    pub monitor_ac: u32,
    pub monitor_dc: u32,
    pub standby_ac: u32,
    pub standby_dc: u32,
    pub hibernate_ac: u32,
    pub hibernate_dc: u32,
}

impl TimeoutTable {
    pub fn get(&self, setting: TimeoutSetting) -> u32 {
        match setting {
            TimeoutSetting::MonitorAc => self.monitor_ac,
            TimeoutSetting::MonitorDc => self.monitor_dc,
            TimeoutSetting::StandbyAc => self.standby_ac,
            TimeoutSetting::StandbyDc => self.standby_dc,
            TimeoutSetting::HibernateAc => self.hibernate_ac,
            TimeoutSetting::HibernateDc => self.hibernate_dc,
        }
    }

    /// All six (setting, minutes) pairs in issue order.
    pub fn entries(&self) -> [(TimeoutSetting, u32); 6] {
        TimeoutSetting::ALL.map(|setting| (setting, self.get(setting)))
    }

    /// Replace the fields the override sets, keep the rest.
    pub fn with_overrides(mut self, overrides: &TimeoutOverride) -> Self {
        if let Some(v) = overrides.monitor_ac {
            self.monitor_ac = v;
        }
        if let Some(v) = overrides.monitor_dc {
            self.monitor_dc = v;
        }
        if let Some(v) = overrides.standby_ac {
            self.standby_ac = v;
        }
        if let Some(v) = overrides.standby_dc {
            self.standby_dc = v;
        }
        if let Some(v) = overrides.hibernate_ac {
            self.hibernate_ac = v;
        }
        if let Some(v) = overrides.hibernate_dc {
            self.hibernate_dc = v;
        }
        self
    }
}

/// Partial timeout table from the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimeoutOverride {
    pub monitor_ac: Option<u32>,
    pub monitor_dc: Option<u32>,
    pub standby_ac: Option<u32>,
    pub standby_dc: Option<u32>,
    pub hibernate_ac: Option<u32>,
    pub hibernate_dc: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TimeoutTable {
        TimeoutTable {
            monitor_ac: 1,
            monitor_dc: 2,
            standby_ac: 3,
            standby_dc: 4,
            hibernate_ac: 5,
            hibernate_dc: 6,
        }
    }

    #[test]
    fn test_entries_follow_issue_order() {
        let entries = table().entries();
        let names: Vec<&str> = entries.iter().map(|(s, _)| s.setting_name()).collect();
        assert_eq!(
            names,
            vec![
                "monitor-timeout-ac",
                "monitor-timeout-dc",
                "standby-timeout-ac",
                "standby-timeout-dc",
                "hibernate-timeout-ac",
                "hibernate-timeout-dc",
            ]
        );
        let minutes: Vec<u32> = entries.iter().map(|(_, m)| *m).collect();
        assert_eq!(minutes, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_with_overrides_replaces_only_set_fields() {
        let overrides = TimeoutOverride {
            monitor_dc: Some(20),
            hibernate_ac: Some(0),
            ..Default::default()
        };
        let merged = table().with_overrides(&overrides);
        assert_eq!(merged.monitor_ac, 1);
        assert_eq!(merged.monitor_dc, 20);
        assert_eq!(merged.hibernate_ac, 0);
        assert_eq!(merged.hibernate_dc, 6);
    }

    #[test]
    fn test_empty_override_is_identity() {
        assert_eq!(table().with_overrides(&TimeoutOverride::default()), table());
    }
}
