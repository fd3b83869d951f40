use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use super::{
    error::{LocationError, PollError, RequestError},
    location::Position,
};

/// Stage of one poll-and-request cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollStage {
    #[default]
    Idle,
    AwaitingLocation,
    Requesting,
    Done,
    Cancelled,
}

impl PollStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AwaitingLocation => "awaiting_location",
            Self::Requesting => "requesting",
            Self::Done => "done",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::AwaitingLocation | Self::Requesting)
    }
}

impl Display for PollStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlState {
    #[default]
    Idle,
    Polling,
}

impl ControlState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Polling => "polling",
        }
    }
}

impl Display for ControlState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollEvent {
    Start,
    LocationFound(Position),
    LocationFailed(LocationError),
    RequestSucceeded(String),
    RequestFailed(RequestError),
    Cancel,
}

/// Side effect the poller must carry out after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    LookupLocation,
    IssueRequest(Position),
    MarkAvailable(String),
    ReportError(PollError),
    AbortRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub next: PollStage,
    pub effect: Effect,
}

impl Transition {
    fn to(next: PollStage, effect: Effect) -> Self {
        Self { next, effect }
    }

    fn stay(stage: PollStage) -> Self {
        Self::to(stage, Effect::None)
    }
}

/// Dispatch table for a poll session keyed by `(stage, event)`.
///
/// Events that do not apply to the current stage leave it untouched, which is
/// how late callbacks from an abandoned lookup or request are ignored.
pub fn transition(stage: PollStage, event: &PollEvent) -> Transition {
    match (stage, event) {
        (_, PollEvent::Start) => Transition::to(PollStage::AwaitingLocation, Effect::LookupLocation),
        (PollStage::AwaitingLocation, PollEvent::LocationFound(position)) => {
            Transition::to(PollStage::Requesting, Effect::IssueRequest(*position))
        }
        (PollStage::AwaitingLocation, PollEvent::LocationFailed(err)) => Transition::to(
            PollStage::Cancelled,
            Effect::ReportError(PollError::Location(err.clone())),
        ),
        (PollStage::Requesting, PollEvent::RequestSucceeded(body)) => {
            Transition::to(PollStage::Done, Effect::MarkAvailable(body.clone()))
        }
        (PollStage::Requesting, PollEvent::RequestFailed(err)) => Transition::to(
            PollStage::Cancelled,
            Effect::ReportError(PollError::Request(err.clone())),
        ),
        (PollStage::AwaitingLocation | PollStage::Requesting, PollEvent::Cancel) => {
            Transition::to(PollStage::Cancelled, Effect::AbortRequest)
        }
        (_, PollEvent::Cancel) => Transition::to(stage, Effect::AbortRequest),
        _ => Transition::stay(stage),
    }
}
