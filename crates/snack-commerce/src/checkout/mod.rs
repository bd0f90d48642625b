//! Checkout module.
//!
//! Contains reliability scoring, warning classification, notifications, and
//! the checkout flow that ties them to the cart.

mod flow;
mod notify;
mod scoring;
pub mod warning;

pub use flow::{CheckoutEntry, CheckoutFlow, CheckoutStep, ScoringTicket};
pub use notify::{NoticeLevel, Notifier, RecordingNotifier};
pub use scoring::{PredictionRequest, PredictionResponse, ReliabilityScore, ReliabilityScorer};
pub use warning::{ProductWarning, Severity, CRITICAL_THRESHOLD, WARNING_THRESHOLD};
