pub mod timeouts;

use crate::error::{Error, Result};
use std::str::FromStr;

pub use timeouts::{TimeoutOverride, TimeoutSetting, TimeoutTable};

/// A named power plan known to the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerProfile {
    HighPerformance,
    Balanced,
    PowerSaver,
}

impl PowerProfile {
    /// All profiles in lookup order. Active-plan detection scans GUIDs in this order.
    pub const ALL: [PowerProfile; 3] = [
        PowerProfile::HighPerformance,
        PowerProfile::Balanced,
        PowerProfile::PowerSaver,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PowerProfile::HighPerformance => "High Performance",
            PowerProfile::Balanced => "Balanced",
            PowerProfile::PowerSaver => "Power Saver",
        }
    }

    /// Built-in scheme GUID registered by the platform for this plan.
    pub fn scheme_guid(&self) -> &'static str {
        match self {
            PowerProfile::HighPerformance => "8c5e7fda-e8bf-4a96-9a85-a6e23a8c635c",
            PowerProfile::Balanced => "381b4222-f694-41f0-9685-ff5bb260df2e",
            PowerProfile::PowerSaver => "a1841308-3541-4fab-bc81-f71556f20b4a",
        }
    }

    /// Default timeouts applied alongside the plan, in minutes (0 = never).
    pub fn timeouts(&self) -> TimeoutTable {
        match self {
            PowerProfile::HighPerformance => TimeoutTable {
                monitor_ac: 15,
                monitor_dc: 10,
                standby_ac: 45,
                standby_dc: 30,
                hibernate_ac: 0,
                hibernate_dc: 120,
            },
            PowerProfile::Balanced => TimeoutTable {
                monitor_ac: 10,
                monitor_dc: 5,
                standby_ac: 30,
                standby_dc: 15,
                hibernate_ac: 0,
                hibernate_dc: 60,
            },
            PowerProfile::PowerSaver => TimeoutTable {
                monitor_ac: 5,
                monitor_dc: 3,
                standby_ac: 15,
                standby_dc: 10,
                hibernate_ac: 0,
                hibernate_dc: 30,
            },
        }
    }

    pub fn from_scheme_guid(guid: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.scheme_guid().eq_ignore_ascii_case(guid))
    }
}

impl std::fmt::Display for PowerProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PowerProfile {
    type Err = Error;

    /// Accepts display names ("Power Saver") and CLI names ("power-saver").
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().replace(['-', '_'], " ");
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| Error::UnknownProfile(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_scheme_guids_are_unique() {
        let guids: HashSet<&str> = PowerProfile::ALL.iter().map(|p| p.scheme_guid()).collect();
        assert_eq!(guids.len(), PowerProfile::ALL.len());
    }

    #[test]
    fn test_from_str_accepts_display_and_cli_names() {
        assert_eq!(
            "High Performance".parse::<PowerProfile>().unwrap(),
            PowerProfile::HighPerformance
        );
        assert_eq!(
            "power-saver".parse::<PowerProfile>().unwrap(),
            PowerProfile::PowerSaver
        );
        assert_eq!(
            "BALANCED".parse::<PowerProfile>().unwrap(),
            PowerProfile::Balanced
        );
    }

    #[test]
    fn test_from_str_rejects_unknown_name() {
        let err = "Ultimate Performance".parse::<PowerProfile>().unwrap_err();
        assert!(matches!(err, Error::UnknownProfile(ref name) if name == "Ultimate Performance"));
    }

    #[test]
    fn test_from_scheme_guid_ignores_case() {
        assert_eq!(
            PowerProfile::from_scheme_guid("381B4222-F694-41F0-9685-FF5BB260DF2E"),
            Some(PowerProfile::Balanced)
        );
        assert_eq!(PowerProfile::from_scheme_guid("not-a-guid"), None);
    }

    #[test]
    fn test_default_timeouts() {
        let hp = PowerProfile::HighPerformance.timeouts();
        assert_eq!(hp.monitor_ac, 15);
        assert_eq!(hp.hibernate_dc, 120);

        let saver = PowerProfile::PowerSaver.timeouts();
        assert_eq!(saver.monitor_dc, 3);
        assert_eq!(saver.standby_ac, 15);

        for profile in PowerProfile::ALL {
            assert_eq!(profile.timeouts().hibernate_ac, 0);
        }
    }
}
