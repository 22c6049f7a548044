//! Per-delivery and per-run result types.

/// Result of one webhook delivery attempt for one identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Payload accepted with HTTP 200; URL marked seen
    Sent,
    /// URL already present in the seen set; no POST issued
    SkippedDuplicate,
    /// Fetch failed upstream; nothing to deliver
    SkippedError,
    /// Webhook responded with a non-200 status
    FailedHttp(u16),
    /// Webhook request failed before a response arrived
    FailedException,
}

impl DeliveryOutcome {
    /// Whether this outcome counts toward the run's error total.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::SkippedError | Self::FailedHttp(_) | Self::FailedException
        )
    }

    /// Short status label for logs and CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::SkippedDuplicate => "skipped-duplicate",
            Self::SkippedError => "skipped-error",
            Self::FailedHttp(_) => "failed-http",
            Self::FailedException => "failed-exception",
        }
    }
}

/// Outcome for a single identity within a run.
#[derive(Debug, Clone)]
pub struct SourceOutcome {
    pub identity: String,
    pub outcome: DeliveryOutcome,
}

/// Aggregate counts for one check-and-deliver run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub sent: usize,
    pub skipped_duplicate: usize,
    pub errors: usize,
    pub outcomes: Vec<SourceOutcome>,
}

impl RunSummary {
    /// Record one identity's outcome and bump the matching counter.
    pub fn record(&mut self, identity: &str, outcome: DeliveryOutcome) {
        match outcome {
            DeliveryOutcome::Sent => self.sent += 1,
            DeliveryOutcome::SkippedDuplicate => self.skipped_duplicate += 1,
            _ if outcome.is_error() => self.errors += 1,
            _ => {}
        }
        self.outcomes.push(SourceOutcome {
            identity: identity.to_string(),
            outcome,
        });
    }
}
