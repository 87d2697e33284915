//! Guarded switching between simple and tiered pricing
//!
//! The coordinator only decides whether a switch may happen and what it would
//! throw away. Clearing the abandoned data is the caller's job, driven by the
//! returned [`ModeTransition`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{AppError, ErrorCode};
use crate::models::PricingMode;

/// Data a transition discards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscardedData {
    Nothing,
    /// `price` / `discounted_price` of simple mode
    SimplePrice,
    /// The product's whole tier set
    Tiers,
}

/// An approved switch, ready for teardown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeTransition {
    pub from: PricingMode,
    pub to: PricingMode,
    pub discards: DiscardedData,
}

/// Acknowledgement handed out when a switch would lose data.
///
/// Only [`PricingModeCoordinator`] can create one, and it is consumed by
/// [`PricingModeCoordinator::confirm`] or [`PricingModeCoordinator::cancel`].
#[derive(Debug, PartialEq, Eq)]
pub struct ModeChangeConfirmation {
    id: u64,
    transition: ModeTransition,
}

impl ModeChangeConfirmation {
    pub fn transition(&self) -> ModeTransition {
        self.transition
    }

    pub fn discards(&self) -> DiscardedData {
        self.transition.discards
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ModeChangeDecision {
    /// Already in the requested mode
    Unchanged,
    /// Nothing would be lost; the coordinator has moved to the new mode
    Apply(ModeTransition),
    /// Data would be lost; confirm or cancel the token
    RequiresConfirmation(ModeChangeConfirmation),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ModeChangeError {
    #[error("Mode change confirmation is no longer valid")]
    StaleConfirmation,
}

impl From<ModeChangeError> for AppError {
    fn from(err: ModeChangeError) -> Self {
        AppError::with_message(ErrorCode::PricingModeMismatch, err.to_string())
    }
}

/// Pricing mode state of one product being edited
#[derive(Debug, Clone)]
pub struct PricingModeCoordinator {
    mode: PricingMode,
    pending: Option<u64>,
    next_id: u64,
}

impl PricingModeCoordinator {
    pub fn new(mode: PricingMode) -> Self {
        Self {
            mode,
            pending: None,
            next_id: 1,
        }
    }

    pub fn mode(&self) -> PricingMode {
        self.mode
    }

    pub fn has_pending_confirmation(&self) -> bool {
        self.pending.is_some()
    }

    /// Ask to move to `target`.
    ///
    /// `has_simple_data` / `has_tiered_data` describe what currently exists;
    /// only the data of the mode being left matters. A new request
    /// invalidates any confirmation issued earlier.
    pub fn request_mode_change(
        &mut self,
        target: PricingMode,
        has_simple_data: bool,
        has_tiered_data: bool,
    ) -> ModeChangeDecision {
        self.pending = None;

        if target == self.mode {
            return ModeChangeDecision::Unchanged;
        }

        let (would_lose, discards) = match target {
            PricingMode::Tiered => (has_simple_data, DiscardedData::SimplePrice),
            PricingMode::Simple => (has_tiered_data, DiscardedData::Tiers),
        };

        if !would_lose {
            let transition = ModeTransition {
                from: self.mode,
                to: target,
                discards: DiscardedData::Nothing,
            };
            self.mode = target;
            return ModeChangeDecision::Apply(transition);
        }

        let id = self.next_id;
        self.next_id += 1;
        self.pending = Some(id);

        ModeChangeDecision::RequiresConfirmation(ModeChangeConfirmation {
            id,
            transition: ModeTransition {
                from: self.mode,
                to: target,
                discards,
            },
        })
    }

    /// Accept the data loss and move to the confirmed mode
    pub fn confirm(
        &mut self,
        confirmation: ModeChangeConfirmation,
    ) -> Result<ModeTransition, ModeChangeError> {
        if self.pending != Some(confirmation.id) || confirmation.transition.from != self.mode {
            return Err(ModeChangeError::StaleConfirmation);
        }
        self.pending = None;
        self.mode = confirmation.transition.to;
        Ok(confirmation.transition)
    }

    /// Drop the request; mode and data stay as they are
    pub fn cancel(&mut self, confirmation: ModeChangeConfirmation) {
        if self.pending == Some(confirmation.id) {
            self.pending = None;
        }
    }
}
