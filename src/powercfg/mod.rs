pub mod scheme;

use crate::error::{Error, Result};
use crate::profile::TimeoutSetting;
use std::process::{Command, Output};
use tracing::debug;

pub use scheme::{ActivePlan, ActiveScheme};

const DEFAULT_PROGRAM: &str = "powercfg";

/// The three platform commands the controller depends on.
pub trait PowerCfg {
    /// Raw output of the "get active scheme" command.
    fn get_active_scheme(&mut self) -> Result<String>;

    fn set_active_scheme(&mut self, guid: &str) -> Result<()>;

    fn change_timeout(&mut self, setting: TimeoutSetting, minutes: u32) -> Result<()>;
}

/// Runs the real `powercfg` tool (or a configured stand-in).
#[derive(Debug, Clone)]
pub struct SystemPowerCfg {
    program: String,
    leading_args: Vec<String>,
}

impl Default for SystemPowerCfg {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            leading_args: Vec::new(),
        }
    }
}

impl SystemPowerCfg {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a command line such as `["powercfg"]` or `["sh", "fake.sh"]`.
    /// Words after the first are passed before the tool arguments.
    pub fn from_command(command: &[String]) -> Result<Self> {
        let (program, leading) = command
            .split_first()
            .ok_or_else(|| Error::Config("powercfg.command must not be empty".to_string()))?;
        if program.trim().is_empty() {
            return Err(Error::Config(
                "powercfg.command program must not be blank".to_string(),
            ));
        }
        Ok(Self {
            program: program.clone(),
            leading_args: leading.to_vec(),
        })
    }

    fn render(&self, args: &[&str]) -> String {
        let mut words = vec![self.program.as_str()];
        words.extend(self.leading_args.iter().map(String::as_str));
        words.extend_from_slice(args);
        words.join(" ")
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let rendered = self.render(args);
        debug!(command = %rendered, "running power configuration command");

        let output = Command::new(&self.program)
            .args(&self.leading_args)
            .args(args)
            .output()
            .map_err(|source| Error::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(Error::CommandFailed {
                command: rendered,
                code: output.status.code(),
                output: failure_text(&output),
            });
        }

        String::from_utf8(output.stdout).map_err(|source| Error::Unreadable {
            command: rendered,
            source,
        })
    }
}

/// powercfg reports most errors on stdout, so fall back to it when stderr is empty.
fn failure_text(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_string();
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stdout = stdout.trim();
    if stdout.is_empty() {
        "no output".to_string()
    } else {
        stdout.to_string()
    }
}

impl PowerCfg for SystemPowerCfg {
    fn get_active_scheme(&mut self) -> Result<String> {
        self.run(&["/getactivescheme"])
    }

    fn set_active_scheme(&mut self, guid: &str) -> Result<()> {
        self.run(&["/setactive", guid]).map(|_| ())
    }

    fn change_timeout(&mut self, setting: TimeoutSetting, minutes: u32) -> Result<()> {
        let minutes = minutes.to_string();
        self.run(&["/change", setting.setting_name(), &minutes])
            .map(|_| ())
    }
}
