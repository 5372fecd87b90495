/// Capture session state machine.
///
/// State transitions:
/// ```text
/// idle → armed → finalizing → idle
/// ```
///
/// `start` is only legal from `Idle`, so a second start while a session is
/// armed or finalizing is rejected before any device is touched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionState {
    Idle,
    Armed { duration_secs: f64 },
    Finalizing,
}

impl SessionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_armed(&self) -> bool {
        matches!(self, Self::Armed { .. })
    }

    /// Elapsed capture time while armed.
    pub fn duration(&self) -> Option<f64> {
        match self {
            Self::Armed { duration_secs } => Some(*duration_secs),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Armed { .. } => "armed",
            Self::Finalizing => "finalizing",
        }
    }
}
