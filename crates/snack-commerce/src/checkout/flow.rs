//! Checkout reliability analysis state machine.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cart::CartStore;
use crate::checkout::notify::{NoticeLevel, Notifier};
use crate::checkout::warning;
use crate::checkout::{ReliabilityScore, ReliabilityScorer};
use crate::ids::{CheckoutId, ProductId};
use crate::CommerceError;

/// Steps of a checkout session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckoutStep {
    /// Checkout not entered yet.
    Idle,
    /// Waiting for reliability scores.
    Analyzing,
    /// Analysis finished (or skipped for an empty cart).
    Complete,
    /// Scoring failed; checkout continues unscored.
    Error,
}

impl CheckoutStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStep::Idle => "idle",
            CheckoutStep::Analyzing => "analyzing",
            CheckoutStep::Complete => "complete",
            CheckoutStep::Error => "error",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CheckoutStep::Idle => "Not started",
            CheckoutStep::Analyzing => "Analyzing Product Reliability...",
            CheckoutStep::Complete => "Analysis complete",
            CheckoutStep::Error => "Analysis unavailable",
        }
    }

    /// Check if no further transition can happen.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CheckoutStep::Complete | CheckoutStep::Error)
    }

    fn can_transition_to(&self, next: CheckoutStep) -> bool {
        matches!(
            (self, next),
            (CheckoutStep::Idle, CheckoutStep::Analyzing)
                | (CheckoutStep::Idle, CheckoutStep::Complete)
                | (CheckoutStep::Analyzing, CheckoutStep::Complete)
                | (CheckoutStep::Analyzing, CheckoutStep::Error)
        )
    }
}

/// Permission to run the single scoring request of a session.
///
/// Records the cart's clear epoch so results can be recognised as stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringTicket {
    product_ids: Vec<ProductId>,
    cart_epoch: u64,
}

impl ScoringTicket {
    /// Products to score, in cart order.
    pub fn product_ids(&self) -> &[ProductId] {
        &self.product_ids
    }
}

/// Result of entering checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutEntry {
    /// First entry with a non-empty cart: score these products.
    Score(ScoringTicket),
    /// The cart was empty; the session went straight to complete.
    SkippedEmpty,
    /// The session was already entered; nothing to do.
    AlreadyEntered,
}

/// One checkout session.
///
/// Entry is guarded so that a session issues at most one scoring request no
/// matter how often it is entered. Scoring failures are fail-open: the
/// session ends in [`CheckoutStep::Error`] and payment stays available.
#[derive(Debug, Clone)]
pub struct CheckoutFlow {
    id: CheckoutId,
    step: CheckoutStep,
    entered: bool,
    failure: Option<String>,
    discarded_stale: bool,
}

impl CheckoutFlow {
    /// Create a session in the idle step.
    pub fn new() -> Self {
        Self {
            id: CheckoutId::generate(),
            step: CheckoutStep::Idle,
            entered: false,
            failure: None,
            discarded_stale: false,
        }
    }

    /// Enter checkout.
    ///
    /// Only the first call has an effect. An empty cart completes the session
    /// immediately with zero warnings; otherwise the session moves to
    /// analyzing and the caller receives the ticket for the scoring request.
    pub fn enter(&mut self, cart: &CartStore) -> CheckoutEntry {
        if self.entered {
            debug!(checkout_id = %self.id, "checkout already entered");
            return CheckoutEntry::AlreadyEntered;
        }
        self.entered = true;

        if cart.is_empty() {
            self.set_step(CheckoutStep::Complete);
            info!(checkout_id = %self.id, "empty cart, skipping reliability analysis");
            return CheckoutEntry::SkippedEmpty;
        }

        self.set_step(CheckoutStep::Analyzing);
        let ticket = ScoringTicket {
            product_ids: cart.product_ids(),
            cart_epoch: cart.epoch(),
        };
        info!(
            checkout_id = %self.id,
            products = ticket.product_ids.len(),
            "analyzing product reliability"
        );
        CheckoutEntry::Score(ticket)
    }

    /// Apply the outcome of the scoring request.
    ///
    /// On success the warnings are merged into the cart, unless the cart was
    /// emptied while the request was in flight. On failure the user is
    /// notified and the session ends unscored.
    pub fn resolve(
        &mut self,
        ticket: ScoringTicket,
        outcome: Result<Vec<ReliabilityScore>, CommerceError>,
        cart: &mut CartStore,
        notifier: &dyn Notifier,
    ) -> Result<CheckoutStep, CommerceError> {
        if self.step != CheckoutStep::Analyzing {
            return Err(CommerceError::InvalidCheckoutTransition {
                from: self.step.as_str().to_string(),
                to: CheckoutStep::Complete.as_str().to_string(),
            });
        }

        let scores = match outcome {
            Ok(scores) => scores,
            Err(e) => {
                warn!(checkout_id = %self.id, error = %e, "reliability analysis failed");
                self.failure = Some(e.to_string());
                self.set_step(CheckoutStep::Error);
                notifier.notify(NoticeLevel::Error, "Failed to analyze product reliability");
                return Ok(self.step);
            }
        };

        if cart.epoch() != ticket.cart_epoch {
            warn!(
                checkout_id = %self.id,
                "cart emptied during analysis, discarding reliability results"
            );
            self.discarded_stale = true;
            self.set_step(CheckoutStep::Complete);
            return Ok(self.step);
        }

        let unscored = ticket
            .product_ids
            .iter()
            .filter(|id| !scores.iter().any(|s| s.product_id == **id))
            .count();
        if unscored > 0 {
            debug!(checkout_id = %self.id, unscored, "some products came back without a score");
        }

        let warnings: HashMap<_, _> = warning::classify_all(&scores)
            .into_iter()
            .map(|w| (w.product_id, w))
            .collect();
        cart.update_warnings(&warnings);
        self.set_step(CheckoutStep::Complete);

        let warning_count = cart.warning_count();
        if warning_count > 0 {
            let plural = if warning_count > 1 { "s" } else { "" };
            notifier.notify(
                NoticeLevel::Warning,
                &format!(
                    "Found {} product reliability concern{}",
                    warning_count, plural
                ),
            );
        } else {
            notifier.notify(NoticeLevel::Success, "All products passed reliability check");
        }

        Ok(self.step)
    }

    /// Enter checkout and, if needed, run the scoring round-trip to completion.
    pub async fn run<S>(
        &mut self,
        cart: &mut CartStore,
        scorer: &S,
        notifier: &dyn Notifier,
    ) -> CheckoutStep
    where
        S: ReliabilityScorer + ?Sized,
    {
        let ticket = match self.enter(cart) {
            CheckoutEntry::Score(ticket) => ticket,
            CheckoutEntry::SkippedEmpty | CheckoutEntry::AlreadyEntered => return self.step,
        };

        let outcome = scorer.predict(ticket.product_ids()).await;
        match self.resolve(ticket, outcome, cart, notifier) {
            Ok(step) => step,
            Err(e) => {
                warn!(checkout_id = %self.id, error = %e, "could not apply reliability results");
                self.step
            }
        }
    }

    pub fn id(&self) -> &CheckoutId {
        &self.id
    }

    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    pub fn is_analyzing(&self) -> bool {
        self.step == CheckoutStep::Analyzing
    }

    /// Payment is blocked only while analysis is running. Warnings are
    /// advisory.
    pub fn can_proceed_to_payment(&self) -> bool {
        !self.is_analyzing()
    }

    /// Why scoring failed, if it did.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Whether results were dropped because the cart was emptied meanwhile.
    pub fn discarded_stale_results(&self) -> bool {
        self.discarded_stale
    }

    /// Summary banner text once analysis has completed, driven by the
    /// warnings currently in `cart`.
    pub fn banner(&self, cart: &CartStore) -> Option<String> {
        let warning_count = cart.warning_count();
        if self.step != CheckoutStep::Complete || warning_count == 0 {
            return None;
        }
        let (noun, verb) = if warning_count == 1 {
            ("Product", "Needs")
        } else {
            ("Products", "Need")
        };
        Some(format!(
            "{} {} {} Your Attention",
            warning_count, noun, verb
        ))
    }

    fn set_step(&mut self, next: CheckoutStep) {
        debug_assert!(
            self.step.can_transition_to(next),
            "invalid checkout transition {} -> {}",
            self.step.as_str(),
            next.as_str()
        );
        debug!(
            checkout_id = %self.id,
            from = self.step.as_str(),
            to = next.as_str(),
            "checkout transition"
        );
        self.step = next;
    }
}

impl Default for CheckoutFlow {
    fn default() -> Self {
        Self::new()
    }
}
