//! Drives `SystemPowerCfg` against a shell script that imitates powercfg.
#![cfg(unix)]

use powerplan::controller::PlanController;
use powerplan::error::Error;
use powerplan::powercfg::{ActivePlan, PowerCfg, SystemPowerCfg};
use powerplan::profile::{PowerProfile, TimeoutSetting};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const FAKE_POWERCFG: &str = r#"
dir="$(dirname "$0")"
case "$1" in
  /getactivescheme)
    if [ -f "$dir/query-fails" ]; then
      echo "Unable to perform operation. An unexpected error (0x5) has occurred."
      exit 1
    fi
    if [ -f "$dir/garbled" ]; then
      printf '\377\376 381b4222-f694-41f0-9685-ff5bb260df2e\n'
      exit 0
    fi
    if [ -f "$dir/active" ]; then
      echo "Power Scheme GUID: $(cat "$dir/active")  (Current)"
    else
      echo "Power Scheme GUID: 00000000-0000-0000-0000-000000000000  (Custom)"
    fi
    ;;
  /setactive)
    if [ -f "$dir/deny" ]; then
      echo "Access is denied."
      exit 1
    fi
    echo "$2" > "$dir/active"
    ;;
  /change)
    if [ -f "$dir/deny-$2" ]; then
      echo "Invalid Parameters -- try \"/?\" for help" >&2
      exit 1
    fi
    echo "$2 $3" >> "$dir/changes"
    ;;
  *)
    echo "Invalid Parameters" >&2
    exit 1
    ;;
esac
"#;

fn fake_tool(dir: &Path) -> SystemPowerCfg {
    let script = dir.join("powercfg.sh");
    fs::write(&script, FAKE_POWERCFG).unwrap();
    SystemPowerCfg::from_command(&["sh".to_string(), script.to_string_lossy().into_owned()])
        .unwrap()
}

fn changes(dir: &Path) -> Vec<String> {
    fs::read_to_string(dir.join("changes"))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_apply_then_query_through_external_tool() {
    let tmp = TempDir::new().unwrap();
    let mut controller = PlanController::new(fake_tool(tmp.path()));

    assert!(matches!(controller.query(), ActivePlan::Unknown { .. }));

    let report = controller.apply(PowerProfile::Balanced).unwrap();
    assert!(report.is_complete());
    assert_eq!(controller.query(), ActivePlan::Known(PowerProfile::Balanced));
    assert_eq!(
        changes(tmp.path()),
        vec![
            "monitor-timeout-ac 10",
            "monitor-timeout-dc 5",
            "standby-timeout-ac 30",
            "standby-timeout-dc 15",
            "hibernate-timeout-ac 0",
            "hibernate-timeout-dc 60",
        ]
    );
}

#[test]
fn test_activation_failure_reports_tool_output() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("deny"), "").unwrap();
    let mut controller = PlanController::new(fake_tool(tmp.path()));

    let err = controller.apply(PowerProfile::HighPerformance).unwrap_err();
    assert!(err.to_string().contains("Access is denied."), "{}", err);
    assert!(changes(tmp.path()).is_empty());
}

#[test]
fn test_failed_timeout_is_recorded_and_others_still_run() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("deny-standby-timeout-dc"), "").unwrap();
    let mut controller = PlanController::new(fake_tool(tmp.path()));

    let report = controller.apply(PowerProfile::PowerSaver).unwrap();
    let failed: Vec<_> = report.failures().collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].setting, TimeoutSetting::StandbyDc);
    assert!(
        failed[0]
            .error
            .as_deref()
            .is_some_and(|e| e.contains("Invalid Parameters"))
    );
    assert_eq!(changes(tmp.path()).len(), 5);
}

#[test]
fn test_non_zero_exit_is_command_failed() {
    let tmp = TempDir::new().unwrap();
    let mut tool = fake_tool(tmp.path());
    fs::write(tmp.path().join("deny"), "").unwrap();

    match tool.set_active_scheme("abc") {
        Err(Error::CommandFailed { code, output, .. }) => {
            assert_eq!(code, Some(1));
            assert_eq!(output, "Access is denied.");
        }
        other => panic!("expected CommandFailed, got {:?}", other),
    }
}

#[test]
fn test_query_non_zero_exit_is_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("query-fails"), "").unwrap();
    let mut controller = PlanController::new(fake_tool(tmp.path()));

    match controller.query() {
        ActivePlan::Error(reason) => {
            assert!(reason.contains("exit code 1"), "{}", reason);
            assert!(reason.contains("unexpected error (0x5)"), "{}", reason);
        }
        other => panic!("expected Error, got {:?}", other),
    }
}

#[test]
fn test_query_non_utf8_output_is_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("garbled"), "").unwrap();
    let mut controller = PlanController::new(fake_tool(tmp.path()));

    match controller.query() {
        ActivePlan::Error(reason) => {
            assert!(reason.contains("unreadable output"), "{}", reason);
        }
        other => panic!("expected Error, got {:?}", other),
    }
}
