//! Refresh orchestration
//!
//! A refresh reads the filters, issues one fetch and later renders whatever
//! comes back. Pushes and fetches race, so every render source takes a
//! [`RequestToken`]: fetches when they are issued, pushes when they arrive.
//! A fetch that completes after a newer source was already applied is
//! dropped.

use std::collections::BTreeMap;

use pulse_core::FilterState;

use crate::document::{Document, ElementId, Instruction, LOADING_CLASS};

/// Shown when a fetch fails
pub const REFRESH_ERROR_MESSAGE: &str = "Erro ao atualizar dados. Tente novamente.";

/// What started a refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    Startup,
    Timer,
    FilterChanged,
    Manual,
}

impl RefreshTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefreshTrigger::Startup => "startup",
            RefreshTrigger::Timer => "timer",
            RefreshTrigger::FilterChanged => "filter_changed",
            RefreshTrigger::Manual => "manual",
        }
    }
}

/// Ordering ticket for anything that may render a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RequestToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.value())
    }
}

/// Hands out increasing tokens and remembers the newest one applied
#[derive(Debug, Clone, Default)]
pub struct TokenSequencer {
    issued: u64,
    last_applied: Option<RequestToken>,
}

impl TokenSequencer {
    pub fn issue(&mut self) -> RequestToken {
        self.issued += 1;
        RequestToken(self.issued)
    }

    /// Mark `token` as applied unless something newer already was
    pub fn try_apply(&mut self, token: RequestToken) -> bool {
        if self.last_applied.is_some_and(|last| last > token) {
            return false;
        }
        self.last_applied = Some(token);
        true
    }

    pub fn last_applied(&self) -> Option<RequestToken> {
        self.last_applied
    }
}

/// Fetches in flight and the token order shared with pushes
#[derive(Debug, Default)]
pub struct RefreshOrchestrator {
    sequencer: TokenSequencer,
    in_flight: BTreeMap<RequestToken, FilterState>,
}

/// A fetch about to be issued
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshRequest {
    pub token: RequestToken,
    pub filters: FilterState,
    /// Loading indicators to switch on
    pub instructions: Vec<Instruction>,
}

impl RefreshOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a refresh: read the filters and take a token
    pub fn begin(&mut self, trigger: RefreshTrigger, document: &Document) -> RefreshRequest {
        let token = self.sequencer.issue();
        let filters = document.filters();
        tracing::info!(
            %token,
            trigger = trigger.as_str(),
            grupo = %filters.grupo,
            collaborator = %filters.collaborator,
            status = %filters.status,
            data = %filters.date,
            "Refreshing metrics"
        );
        self.in_flight.insert(token, filters.clone());

        RefreshRequest {
            token,
            filters,
            instructions: refresh_loading(true),
        }
    }

    /// Forget a finished fetch, returning the filters it was issued with
    pub fn finish(&mut self, token: RequestToken) -> Option<FilterState> {
        self.in_flight.remove(&token)
    }

    /// Take a token for a push and apply it immediately
    pub fn accept_push(&mut self) -> RequestToken {
        let token = self.sequencer.issue();
        self.sequencer.try_apply(token);
        token
    }

    /// Whether a completed fetch may still be rendered
    pub fn try_apply(&mut self, token: RequestToken) -> bool {
        self.sequencer.try_apply(token)
    }

    pub fn last_applied(&self) -> Option<RequestToken> {
        self.sequencer.last_applied()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}

/// Loading indicator on the dashboard container only
pub fn container_loading(enabled: bool) -> Instruction {
    Instruction::SetClass {
        target: ElementId::DashboardContainer,
        class: LOADING_CLASS.to_string(),
        enabled,
    }
}

/// Loading indicator on the container and the refresh button
pub fn refresh_loading(enabled: bool) -> Vec<Instruction> {
    vec![
        container_loading(enabled),
        Instruction::SetClass {
            target: ElementId::RefreshBtn,
            class: LOADING_CLASS.to_string(),
            enabled,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::RenderSink;

    #[test]
    fn test_tokens_increase() {
        let mut sequencer = TokenSequencer::default();
        let a = sequencer.issue();
        let b = sequencer.issue();
        assert!(b > a);
        assert_eq!(b.value(), a.value() + 1);
        assert_eq!(b.to_string(), format!("#{}", b.value()));
    }

    #[test]
    fn test_older_token_rejected_after_newer_applied() {
        let mut sequencer = TokenSequencer::default();
        let fetch = sequencer.issue();
        let push = sequencer.issue();
        assert!(sequencer.try_apply(push));
        assert!(!sequencer.try_apply(fetch));
        assert_eq!(sequencer.last_applied(), Some(push));
    }

    #[test]
    fn test_in_order_completions_apply() {
        let mut sequencer = TokenSequencer::default();
        let first = sequencer.issue();
        let second = sequencer.issue();
        assert!(sequencer.try_apply(first));
        assert!(sequencer.try_apply(second));
    }

    #[test]
    fn test_begin_reads_filters_and_sets_loading() {
        let mut document = Document::standard();
        document.apply(Instruction::SetValue {
            target: ElementId::GrupoFilter,
            value: "JULIO".into(),
        });

        let mut orchestrator = RefreshOrchestrator::new();
        let request = orchestrator.begin(RefreshTrigger::Manual, &document);
        assert_eq!(request.filters.grupo, "JULIO");
        assert_eq!(orchestrator.in_flight(), 1);

        document.apply_all(request.instructions);
        assert!(document.is_loading());
        assert!(document.get(ElementId::RefreshBtn).unwrap().has_class(LOADING_CLASS));

        let filters = orchestrator.finish(request.token).unwrap();
        assert_eq!(filters.grupo, "JULIO");
        assert_eq!(orchestrator.in_flight(), 0);
    }

    #[test]
    fn test_push_supersedes_pending_fetch() {
        let document = Document::standard();
        let mut orchestrator = RefreshOrchestrator::new();
        let request = orchestrator.begin(RefreshTrigger::Timer, &document);
        orchestrator.accept_push();
        assert!(!orchestrator.try_apply(request.token));
    }
}
