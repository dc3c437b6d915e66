//! Ledger Boundary
//!
//! Everything that talks to the remote crowdfunding contract lives here.
//! [`LedgerGateway`] is the sole seam for network I/O; the rest of the crate
//! consumes raw records through it and never issues calls of its own.

mod client;
mod gateway;

pub use client::{HttpLedgerGateway, LedgerConfig};
pub use gateway::{CreateRequest, GatewayError, LedgerGateway, RawCampaign, TransactionReceipt};
