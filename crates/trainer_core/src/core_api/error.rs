use crate::lexer::ParseError;
use crate::roster::RosterError;
use crate::trainer_table::DanglingReference;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreErrorCode {
    Io,
    Parse,
    MissingReference,
    DanglingReference,
    DuplicateIdentifier,
    NotFound,
    InvalidValue,
    SaveInProgress,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code:?}: {message}")]
pub struct CoreError {
    pub code: CoreErrorCode,
    pub message: String,
}

impl CoreError {
    pub fn new(code: CoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<ParseError> for CoreError {
    fn from(err: ParseError) -> Self {
        let code = match err {
            ParseError::MissingReference { .. } => CoreErrorCode::MissingReference,
            ParseError::Duplicate { .. } => CoreErrorCode::DuplicateIdentifier,
            ParseError::Syntax { .. } | ParseError::UnexpectedEof { .. } => CoreErrorCode::Parse,
        };
        Self::new(code, err.to_string())
    }
}

impl From<RosterError> for CoreError {
    fn from(err: RosterError) -> Self {
        let code = match err {
            RosterError::DuplicateIdentifier(_) => CoreErrorCode::DuplicateIdentifier,
            RosterError::UnknownTrainer(_) | RosterError::UnknownParty(_) => {
                CoreErrorCode::NotFound
            }
            RosterError::Sentinel => CoreErrorCode::InvalidValue,
        };
        Self::new(code, err.to_string())
    }
}

impl From<DanglingReference> for CoreError {
    fn from(err: DanglingReference) -> Self {
        Self::new(CoreErrorCode::DanglingReference, err.to_string())
    }
}
