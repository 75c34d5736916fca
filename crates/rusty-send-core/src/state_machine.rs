use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowStatus {
    #[default]
    Disconnected,
    Connected,
    Loading,
    Error,
    Success,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowAction {
    /// Session picked up silently at start-up.
    Restore,
    Begin,
    ConnectSucceeded,
    SubmitSucceeded,
    Fail,
    /// Input rejected before any wallet or network call.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTransition {
    pub from: FlowStatus,
    pub to: FlowStatus,
    pub action: FlowAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("illegal flow transition: {from:?} --{action:?}-->")]
pub struct TransitionError {
    pub from: FlowStatus,
    pub action: FlowAction,
}

pub fn flow_transition(
    status: FlowStatus,
    action: FlowAction,
) -> Result<(FlowStatus, StateTransition), TransitionError> {
    use FlowAction as A;
    use FlowStatus as S;

    let next = match (status, action) {
        (S::Disconnected, A::Restore) => S::Connected,
        (S::Loading, A::ConnectSucceeded) => S::Connected,
        (S::Loading, A::SubmitSucceeded) => S::Success,
        (S::Loading, A::Fail) => S::Error,
        (S::Loading, _) => return Err(TransitionError { from: status, action }),
        (_, A::Begin) => S::Loading,
        (_, A::Reject) => S::Error,
        _ => return Err(TransitionError { from: status, action }),
    };
    Ok((
        next,
        StateTransition {
            from: status,
            to: next,
            action,
        },
    ))
}
