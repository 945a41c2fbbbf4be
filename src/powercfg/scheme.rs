use crate::profile::PowerProfile;
use serde::Serialize;

const GUID_MARKER: &str = "GUID:";

/// Structured form of a `Power Scheme GUID: <guid>  (<name>)` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveScheme {
    pub guid: String,
    pub name: Option<String>,
}

impl ActiveScheme {
    pub fn parse(text: &str) -> Option<Self> {
        text.lines().find_map(|line| {
            let (_, rest) = line.split_once(GUID_MARKER)?;
            let rest = rest.trim();
            let guid = rest.split_whitespace().next()?.to_string();
            let name = rest
                .split_once('(')
                .and_then(|(_, tail)| tail.rsplit_once(')'))
                .map(|(name, _)| name.trim().to_string())
                .filter(|name| !name.is_empty());
            Some(Self { guid, name })
        })
    }
}

/// Result of asking the platform which plan is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivePlan {
    Known(PowerProfile),
    /// The output named none of the known plans.
    Unknown { scheme: Option<ActiveScheme> },
    /// The platform call itself failed.
    Error(String),
}

impl ActivePlan {
    /// Identify the active plan from `get-active-scheme` output.
    ///
    /// A parsed scheme GUID is matched exactly first; otherwise the whole
    /// text is searched for each known GUID in profile order.
    pub fn identify(text: &str) -> Self {
        let scheme = ActiveScheme::parse(text);

        if let Some(profile) = scheme
            .as_ref()
            .and_then(|s| PowerProfile::from_scheme_guid(&s.guid))
        {
            return ActivePlan::Known(profile);
        }

        let lowered = text.to_ascii_lowercase();
        match PowerProfile::ALL
            .into_iter()
            .find(|p| lowered.contains(p.scheme_guid()))
        {
            Some(profile) => ActivePlan::Known(profile),
            None => ActivePlan::Unknown { scheme },
        }
    }

    pub fn profile(&self) -> Option<PowerProfile> {
        match self {
            ActivePlan::Known(profile) => Some(*profile),
            _ => None,
        }
    }
}

impl std::fmt::Display for ActivePlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivePlan::Known(profile) => write!(f, "{}", profile),
            ActivePlan::Unknown { .. } => f.write_str("Unknown"),
            ActivePlan::Error(_) => f.write_str("Error"),
        }
    }
}
