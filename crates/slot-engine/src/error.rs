//! Error types for slot-engine operations.
//!
//! Booking rejections (slot full, outside opening hours, closed day) are not
//! errors; they are returned as validation values. Errors here cover malformed
//! input and illegal state changes only.

use thiserror::Error;

use crate::model::{AppointmentStatus, StaffAction};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid time '{0}': expected HH:MM or HH:MM:SS")]
    InvalidTime(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Cannot {action} an appointment that is {from}")]
    InvalidTransition {
        from: AppointmentStatus,
        action: StaffAction,
    },

    #[error("Payment tenders sum to {tendered} but the total is {total}")]
    PaymentMismatch { total: u64, tendered: u64 },

    #[error("Commission rate {0} bps is above 100 %")]
    InvalidRate(u32),

    #[error("Payment amounts overflow")]
    AmountOverflow,

    #[error("Invalid split: {0}")]
    InvalidSplit(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout slot-engine.
pub type Result<T> = std::result::Result<T, EngineError>;
