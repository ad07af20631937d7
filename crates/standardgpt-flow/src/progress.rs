//! Progress events streamed to the caller.

use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;

use standardgpt_core::errors::{FailureKind, StandardGptError};
use standardgpt_core::models::{AuditRecord, RouteDecision};

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Routing,
    Optimizing,
    Retrieving,
    Generating,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::Routing,
        Stage::Optimizing,
        Stage::Retrieving,
        Stage::Generating,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Routing => "routing",
            Self::Optimizing => "optimizing",
            Self::Retrieving => "retrieving",
            Self::Generating => "generating",
        }
    }

    /// Human-readable label shown while the stage runs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Routing => "Analyserer spørsmålet",
            Self::Optimizing => "Optimaliserer søket",
            Self::Retrieving => "Søker i standardene",
            Self::Generating => "Genererer svar",
        }
    }

    pub fn percent(&self) -> u8 {
        match self {
            Self::Routing => 10,
            Self::Optimizing => 30,
            Self::Retrieving => 55,
            Self::Generating => 80,
        }
    }
}

/// Final answer with its audit trail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub request_id: String,
    pub text: String,
    /// Route the router chose.
    pub route: RouteDecision,
    /// Route retrieval actually used; differs from `route` only after demotion.
    pub effective_route: RouteDecision,
    pub demoted: bool,
    pub references: Vec<String>,
    pub fragment_count: usize,
    pub latency: Duration,
    pub audits: Vec<AuditRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    Stage {
        stage: Stage,
        label: String,
        percent: u8,
    },
    /// Answer text as it is generated; always before the final answer.
    Token {
        text: String,
    },
    FinalAnswer(Answer),
    Error {
        kind: FailureKind,
        message: String,
    },
}

impl ProgressEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Stage { .. } | Self::Token { .. })
    }
}

/// Sending half of one request's event stream.
pub(crate) struct ProgressEmitter {
    tx: mpsc::Sender<ProgressEvent>,
}

impl ProgressEmitter {
    pub(crate) fn new(tx: mpsc::Sender<ProgressEvent>) -> Self {
        Self { tx }
    }

    /// Announce `stage`. A closed receiver means the caller left.
    pub(crate) async fn stage(&self, stage: Stage) -> Result<(), StandardGptError> {
        self.tx
            .send(ProgressEvent::Stage {
                stage,
                label: stage.label().to_string(),
                percent: stage.percent(),
            })
            .await
            .map_err(|_| StandardGptError::Cancelled)
    }

    pub(crate) async fn token(&self, text: String) -> Result<(), StandardGptError> {
        self.tx
            .send(ProgressEvent::Token { text })
            .await
            .map_err(|_| StandardGptError::Cancelled)
    }

    /// Send the terminal event. False when nobody is listening any more.
    pub(crate) async fn finish(&self, event: ProgressEvent) -> bool {
        self.tx.send(event).await.is_ok()
    }

    /// Resolves once the receiver is dropped.
    pub(crate) async fn closed(&self) {
        self.tx.closed().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_percentages_increase() {
        let percents: Vec<u8> = Stage::ALL.iter().map(Stage::percent).collect();
        assert!(percents.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let ev = ProgressEvent::Stage {
            stage: Stage::Routing,
            label: Stage::Routing.label().to_string(),
            percent: 10,
        };
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["type"], "stage");
        assert_eq!(json["stage"], "routing");
        assert!(!ev.is_terminal());
    }

    #[test]
    fn tokens_are_not_terminal() {
        let ev = ProgressEvent::Token {
            text: "Isolasjon ".to_string(),
        };
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["type"], "token");
        assert_eq!(json["text"], "Isolasjon ");
        assert!(!ev.is_terminal());
    }
}
