use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    NotStarted,
    InProgress,
    Completed,
    Deviation,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Deviation => "deviation",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "not_started" => Some(Self::NotStarted),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "deviation" => Some(Self::Deviation),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Deviation)
    }

    /// The transition table. Terminal states have no outgoing edges;
    /// a task may reach a terminal state without an in_progress step.
    pub fn can_transition_to(&self, to: TaskStatus) -> bool {
        matches!(
            (self, to),
            (Self::NotStarted, Self::InProgress)
                | (Self::NotStarted, Self::Completed)
                | (Self::NotStarted, Self::Deviation)
                | (Self::InProgress, Self::Completed)
                | (Self::InProgress, Self::Deviation)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub client_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    /// Present iff status is terminal, together with `completed_at`.
    pub completed_by: Option<String>,
    pub completed_at: Option<String>,
    pub documentation_url: Option<String>,
    /// Only ever set when the task entered `deviation`.
    pub ai_comment: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Which task records a snapshot covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    All,
    Client(String),
}

impl Scope {
    pub fn from_flag(client: Option<&str>) -> Self {
        match client {
            Some(c) => Self::Client(c.to_string()),
            None => Self::All,
        }
    }
}
