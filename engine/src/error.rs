use super::identifiers::AgentId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    Validation(String),
    BoardFull,
    GameOver,
    UnknownAgent(AgentId),
}

impl std::fmt::Display for BoardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoardError::Validation(message) => write!(f, "Invalid board settings: {}", message),
            BoardError::BoardFull => write!(f, "No free cell left on the board"),
            BoardError::GameOver => write!(f, "Game is already over"),
            BoardError::UnknownAgent(id) => write!(f, "Unknown agent: {}", id),
        }
    }
}

impl std::error::Error for BoardError {}
