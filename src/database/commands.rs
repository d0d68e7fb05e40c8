use crate::model::statement::{Statement, StatementResult};

/// Commands are how the outside layers interact with the dataset. The
/// majority of interactions are statements (add, remove, enrol, find, etc),
/// the rest control the database itself (save, reset, shutdown).
#[derive(Debug)]
pub enum RegistryCommand {
    /// Runs a single data statement against the registry
    Statement(Statement),

    /// Commands that control the database
    Control(Control),
}

#[derive(Debug)]
pub enum Control {
    /// Writes the current dataset to disk
    Save,

    /// Drops every entity, resets the views and persists the empty dataset
    Reset,

    /// Asks the application to exit; the dataset is already on disk because
    /// every mutation is followed by a save
    Shutdown,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CommandResponse {
    /// The statement ran, returns its typed result
    Statement(StatementResult),

    /// A control command ran; `exit` asks the application to stop
    Control { message: String, exit: bool },

    /// The command failed, returns a message for the user
    Error(String),
}

impl CommandResponse {
    pub fn control_success(message: &str) -> Self {
        CommandResponse::Control {
            message: message.to_string(),
            exit: false,
        }
    }

    pub fn control_exit(message: &str) -> Self {
        CommandResponse::Control {
            message: message.to_string(),
            exit: true,
        }
    }

    pub fn error(message: &str) -> Self {
        CommandResponse::Error(message.to_string())
    }

    pub fn exit_application(&self) -> bool {
        matches!(self, CommandResponse::Control { exit: true, .. })
    }

    /// Used to help with testing, unwraps a statement response
    pub fn statement_result(self) -> StatementResult {
        match self {
            CommandResponse::Statement(result) => result,
            other => panic!("Command response is not a statement result: {:?}", other),
        }
    }
}
