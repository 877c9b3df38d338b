/// Lifecycle of a read or write wrapper.
///
/// `Idle -> Loading -> Success | Error`, and back to `Idle` on reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl FetchState {
    pub fn is_loading(self) -> bool {
        self == FetchState::Loading
    }

    /// Whether a request has completed, successfully or not.
    pub fn is_settled(self) -> bool {
        matches!(self, FetchState::Success | FetchState::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_finished_states_are_settled() {
        assert!(FetchState::default() == FetchState::Idle);
        assert!(FetchState::Loading.is_loading());
        assert!(!FetchState::Loading.is_settled());
        assert!(FetchState::Success.is_settled());
        assert!(FetchState::Error.is_settled());
        assert!(!FetchState::Idle.is_settled());
    }
}
