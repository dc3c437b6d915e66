//! Normalized Campaign Model
//!
//! The presentation-facing campaign snapshot: every amount a canonical
//! decimal string, the deadline an ISO-8601 UTC instant, the image always
//! present. Built from raw ledger records, never mutated in place; a write
//! triggers a full re-fetch instead of a local patch.

use crate::amount::{self, AmountError, AmountSource};
use crate::deadline::{self, DeadlineError, DeadlineSource, TimeRemaining};
use crate::ledger::RawCampaign;
use crate::progress;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Placeholder images assigned when a campaign has no image URL. The last
/// entry repeats; the list length is part of the title-to-image mapping and
/// must not change.
const PLACEHOLDER_IMAGES: [&str; 6] = [
    "https://images.unsplash.com/photo-1551434678-e076c223a692?w=400&h=300&fit=crop",
    "https://images.unsplash.com/photo-1460925895917-afdab827c52f?w=400&h=300&fit=crop",
    "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=400&h=300&fit=crop",
    "https://images.unsplash.com/photo-1554224155-6726b3ff858f?w=400&h=300&fit=crop",
    "https://images.unsplash.com/photo-1559136555-9303baea8ebd?w=400&h=300&fit=crop",
    "https://images.unsplash.com/photo-1559136555-9303baea8ebd?w=400&h=300&fit=crop",
];

/// An immutable campaign snapshot in canonical units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub owner: String,
    pub title: String,
    pub description: String,
    /// Funding goal, canonical decimal string in display units.
    pub target: String,
    /// ISO-8601 UTC instant, fixed at creation.
    pub deadline: String,
    /// Running donated total, canonical decimal string in display units.
    /// Reported by the ledger independently of the donation list; the two
    /// are not reconciled locally.
    pub amount_collected: String,
    pub image: String,
    /// One entry per donation, in donation order; duplicates allowed.
    pub donors: Vec<String>,
    /// Canonical decimal strings, index-aligned 1:1 with `donors`.
    pub donation_amounts: Vec<String>,
}

/// Presentation status derived from expiry and progress. Expiry wins over
/// funding: an over-funded campaign past its deadline shows as expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CampaignStatus {
    Active,
    Funded,
    Expired,
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CampaignStatus::Active => "Active",
            CampaignStatus::Funded => "Funded",
            CampaignStatus::Expired => "Expired",
        };
        write!(f, "{}", label)
    }
}

/// Errors normalizing a raw ledger record
#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error(transparent)]
    Amount(#[from] AmountError),

    #[error(transparent)]
    Deadline(#[from] DeadlineError),

    #[error("donor list length {donors} does not match donation list length {amounts}")]
    DonationMismatch { donors: usize, amounts: usize },
}

impl Campaign {
    /// Normalize a raw ledger record into canonical units.
    pub fn from_raw(raw: &RawCampaign, decimals: u32) -> Result<Self, NormalizeError> {
        if raw.donators.len() != raw.donation_amounts.len() {
            return Err(NormalizeError::DonationMismatch {
                donors: raw.donators.len(),
                amounts: raw.donation_amounts.len(),
            });
        }

        let target = canonical_from_base_str(&raw.target, decimals)?;
        let amount_collected = canonical_from_base_str(&raw.amount_collected, decimals)?;

        let deadline_at = deadline::parse_deadline(&DeadlineSource::EpochSeconds(raw.deadline))?;
        let deadline = deadline_at.to_rfc3339_opts(SecondsFormat::Secs, true);

        let mut donation_amounts = Vec::with_capacity(raw.donation_amounts.len());
        for raw_amount in &raw.donation_amounts {
            donation_amounts.push(canonical_from_base_str(raw_amount, decimals)?);
        }

        let image = if raw.image.trim().is_empty() {
            placeholder_image(&raw.title).to_string()
        } else {
            raw.image.clone()
        };

        Ok(Self {
            owner: raw.owner.clone(),
            title: raw.title.clone(),
            description: raw.description.clone(),
            target,
            deadline,
            amount_collected,
            image,
            donors: raw.donators.clone(),
            donation_amounts,
        })
    }

    /// Funding progress in `[0, 100]`.
    pub fn progress(&self) -> f64 {
        progress::progress(&self.amount_collected, &self.target)
    }

    /// The deadline as an instant.
    pub fn deadline_instant(&self) -> Result<DateTime<Utc>, DeadlineError> {
        deadline::parse_deadline(&DeadlineSource::Iso(self.deadline.clone()))
    }

    /// Time left until the deadline as of `now`.
    pub fn time_remaining(&self, now: DateTime<Utc>) -> Result<TimeRemaining, DeadlineError> {
        Ok(deadline::time_remaining(self.deadline_instant()?, now))
    }

    /// Presentation status as of `now`.
    pub fn status(&self, now: DateTime<Utc>) -> Result<CampaignStatus, DeadlineError> {
        if self.time_remaining(now)?.is_expired {
            Ok(CampaignStatus::Expired)
        } else if self.progress() >= 100.0 {
            Ok(CampaignStatus::Funded)
        } else {
            Ok(CampaignStatus::Active)
        }
    }
}

fn canonical_from_base_str(value: &str, decimals: u32) -> Result<String, NormalizeError> {
    let base = amount::base_units_from_str(value)?;
    Ok(amount::to_canonical(&AmountSource::BaseUnits(base), decimals)?)
}

/// Deterministic placeholder selection: a 31-based rolling hash of the title
/// picks the same image for the same title on every fetch.
pub fn placeholder_image(title: &str) -> &'static str {
    let mut hash: i32 = 0;
    for c in title.chars() {
        hash = hash.wrapping_shl(5).wrapping_sub(hash).wrapping_add(c as i32);
    }
    PLACEHOLDER_IMAGES[hash.unsigned_abs() as usize % PLACEHOLDER_IMAGES.len()]
}

/// Display-format a canonical decimal amount: more precision the smaller
/// the value. Whole numbers above a thousand, three decimals down to one,
/// six below.
pub fn format_display_amount(amount: &str) -> String {
    let value: f64 = match amount.trim().parse() {
        Ok(value) => value,
        Err(_) => return "0.000".to_string(),
    };
    if !value.is_finite() {
        return "0.000".to_string();
    }

    if value >= 1000.0 {
        format!("{:.0}", value)
    } else if value >= 1.0 {
        format!("{:.3}", value)
    } else {
        format!("{:.6}", value)
    }
}

/// Shorten an account address for display: first 6 and last 4 characters.
pub fn short_address(address: &str) -> String {
    if address.len() <= 10 || !address.is_ascii() {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}
