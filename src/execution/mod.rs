//! Execution venue module
//!
//! Account equity and order submission

mod paper;
mod types;

pub use paper::PaperVenue;
pub use types::{Fill, OrderAck, OrderId, OrderRequest, OrderType};

use crate::error::VenueError;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Trait for execution venue implementations
///
/// Submission returns once the venue has accepted the order; fills are the
/// venue's business.
#[async_trait]
pub trait ExecutionVenue: Send + Sync {
    /// Current total account equity
    async fn equity(&self) -> Result<Decimal, VenueError>;
    /// Submit a bracketed order
    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderAck, VenueError>;
}
