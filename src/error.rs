use crate::profile::PowerProfile;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("{command} failed ({}): {output}", exit_label(.code))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        output: String,
    },

    #[error("unreadable output from {command}: {source}")]
    Unreadable {
        command: String,
        source: std::string::FromUtf8Error,
    },

    #[error("unknown power profile: {0}")]
    UnknownProfile(String),

    #[error("could not activate {profile}: {source}")]
    Activation {
        profile: PowerProfile,
        source: Box<Error>,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("power plan worker is no longer running")]
    WorkerGone,

    #[error("{0}")]
    Other(String),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, Error>;
