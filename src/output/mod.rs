use crate::controller::{ApplyReport, ApplyStatus};
use crate::powercfg::ActivePlan;
use crate::profile::{PowerProfile, TimeoutTable};
use colored::Colorize;
use serde_json::{Value, json};

const LABEL_W: usize = 18;

pub fn print_active_plan(plan: &ActivePlan) {
    let label = format!("{:<w$}", "Current plan", w = LABEL_W);
    match plan {
        ActivePlan::Known(profile) => {
            println!("  {} {}", label.dimmed(), profile.name().green().bold());
        }
        ActivePlan::Unknown { scheme } => {
            let detail = scheme
                .as_ref()
                .map(|s| match &s.name {
                    Some(name) => format!(" ({} {})", name, s.guid),
                    None => format!(" ({})", s.guid),
                })
                .unwrap_or_default();
            println!("  {} {}{}", label.dimmed(), "Unknown".yellow().bold(), detail.dimmed());
        }
        ActivePlan::Error(reason) => {
            println!("  {} {}", label.dimmed(), "Error".red().bold());
            println!("  {}", reason.dimmed());
        }
    }
}

pub fn active_plan_json(plan: &ActivePlan) -> Value {
    match plan {
        ActivePlan::Known(profile) => json!({
            "state": "known",
            "profile": profile.name(),
            "guid": profile.scheme_guid(),
        }),
        ActivePlan::Unknown { scheme } => json!({
            "state": "unknown",
            "scheme": scheme,
        }),
        ActivePlan::Error(reason) => json!({
            "state": "error",
            "error": reason,
        }),
    }
}

pub fn print_active_plan_json(plan: &ActivePlan) {
    print_json(&active_plan_json(plan));
}

/// Print a terminal apply status. `Applying` is shown by the caller's spinner.
pub fn print_apply_status(status: &ApplyStatus) {
    match status {
        ApplyStatus::Applying(_) => println!("  {}", status.to_string().cyan()),
        ApplyStatus::Applied(report) if report.is_complete() => {
            println!("  {} {}", "✓".green().bold(), status.to_string().green());
        }
        ApplyStatus::Applied(report) => {
            println!("  {} {}", "!".yellow().bold(), status.to_string().yellow());
            for failure in report.failures() {
                println!(
                    "       {} = {}  ·  {}",
                    failure.setting,
                    failure.minutes,
                    failure.error.as_deref().unwrap_or_default().dimmed()
                );
            }
        }
        ApplyStatus::Failed { .. } => {
            println!("  {} {}", "✗".red().bold(), status.to_string().red());
        }
    }
}

pub fn apply_json(status: &ApplyStatus, plan: Option<&ActivePlan>) -> Value {
    let mut value = match status {
        ApplyStatus::Applying(profile) => json!({
            "profile": profile.name(),
            "status": "applying",
        }),
        ApplyStatus::Applied(report) => report_json(report),
        ApplyStatus::Failed { profile, reason } => json!({
            "profile": profile.name(),
            "status": "failed",
            "error": reason,
        }),
    };
    if let (Some(plan), Some(object)) = (plan, value.as_object_mut()) {
        object.insert("active_plan".to_string(), active_plan_json(plan));
    }
    value
}

fn report_json(report: &ApplyReport) -> Value {
    let status = if report.is_complete() {
        "applied"
    } else {
        "partial"
    };
    json!({
        "profile": report.profile.name(),
        "status": status,
        "timestamp": report.timestamp,
        "timeouts": report.timeouts.iter().map(|t| json!({
            "setting": t.setting.setting_name(),
            "minutes": t.minutes,
            "error": t.error,
        })).collect::<Vec<_>>(),
    })
}

pub fn print_apply_json(status: &ApplyStatus, plan: Option<&ActivePlan>) {
    print_json(&apply_json(status, plan));
}

fn minutes(value: u32) -> String {
    if value == 0 {
        "never".to_string()
    } else {
        format!("{} min", value)
    }
}

pub fn print_profiles(rows: &[(PowerProfile, TimeoutTable)], active: Option<PowerProfile>) {
    for (profile, table) in rows {
        let marker = if Some(*profile) == active {
            "●".green().bold()
        } else {
            "○".dimmed()
        };
        println!("{} {}  {}", marker, profile.name().bold(), profile.scheme_guid().dimmed());
        for (setting, value) in table.entries() {
            let padded = format!("{:<w$}", setting.setting_name(), w = LABEL_W + 4);
            println!("    {} {}", padded.dimmed(), minutes(value));
        }
        println!();
    }
}

pub fn profiles_json(rows: &[(PowerProfile, TimeoutTable)], active: Option<PowerProfile>) -> Value {
    Value::Array(
        rows.iter()
            .map(|(profile, table)| {
                json!({
                    "profile": profile.name(),
                    "guid": profile.scheme_guid(),
                    "active": Some(*profile) == active,
                    "timeouts": table,
                })
            })
            .collect(),
    )
}

pub fn print_profiles_json(rows: &[(PowerProfile, TimeoutTable)], active: Option<PowerProfile>) {
    print_json(&profiles_json(rows, active));
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => tracing::error!("failed to render JSON output: {}", e),
    }
}
