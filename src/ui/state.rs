/// Why the whole widget is out of sight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HiddenReason {
    AlreadySubscribed,
    Dismissed,
}

/// What the host page should show. Exactly one of these is on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiState {
    FormVisible,
    /// Client-side validation failure; the form stays up under the error.
    InlineError(String),
    ErrorVisible(String),
    SuccessVisible(String),
    Hidden(HiddenReason),
}

impl UiState {
    /// Decision made once per page view from the stored flags.
    pub fn initial(subscribed_this_session: bool, permanently_dismissed: bool) -> Self {
        if permanently_dismissed {
            UiState::Hidden(HiddenReason::Dismissed)
        } else if subscribed_this_session {
            UiState::Hidden(HiddenReason::AlreadySubscribed)
        } else {
            UiState::FormVisible
        }
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self, UiState::Hidden(_))
    }

    /// Where a timed message lands once its display time is up, if it is
    /// a timed message at all.
    pub fn after_display(&self) -> Option<UiState> {
        match self {
            UiState::SuccessVisible(_) => Some(UiState::Hidden(HiddenReason::AlreadySubscribed)),
            UiState::ErrorVisible(_) | UiState::InlineError(_) => Some(UiState::FormVisible),
            UiState::FormVisible | UiState::Hidden(_) => None,
        }
    }
}
