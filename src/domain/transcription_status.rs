use std::fmt;
use std::str::FromStr;

/// Lifecycle of a job on the transcription service. Transitions are
/// observed, never induced: `queued -> processing -> completed | error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranscriptionStatus {
    Queued,
    Processing,
    Completed,
    Error,
}

impl TranscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranscriptionStatus::Queued => "queued",
            TranscriptionStatus::Processing => "processing",
            TranscriptionStatus::Completed => "completed",
            TranscriptionStatus::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TranscriptionStatus::Completed | TranscriptionStatus::Error
        )
    }
}

impl FromStr for TranscriptionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(TranscriptionStatus::Queued),
            "processing" => Ok(TranscriptionStatus::Processing),
            "completed" => Ok(TranscriptionStatus::Completed),
            "error" => Ok(TranscriptionStatus::Error),
            _ => Err(format!("Invalid transcription status: {}", s)),
        }
    }
}

impl fmt::Display for TranscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
