//! Application controller: the operations behind the three tabs.
//!
//! Each function handles one user action to completion within the frame that
//! triggered it. Repository failures propagate; there is no retry.

pub mod reports;

use crate::db::models::{Donation, DonationStatus, Donor, NewDonation};
use crate::db::{self, DbPool};
use crate::fields;
use crate::forms::{InventoryView, RegistrationForm};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    Registered { donor_id: i64, donation_id: i64 },
    /// A required field was empty or malformed; nothing was written.
    MissingFields,
}

/// Submit the registration form.
///
/// Requires a non-empty name and canonically formatted phone and date. The
/// donor is matched by exact phone equality and only inserted when no match
/// exists. On success the form is reset to its defaults.
pub fn register_donation(
    pool: &DbPool,
    form: &mut RegistrationForm,
) -> anyhow::Result<RegisterOutcome> {
    if form.name.is_empty()
        || !fields::is_valid_phone(form.phone.as_str())
        || !fields::is_valid_date(form.date.as_str())
    {
        form.missing_fields_notice = true;
        return Ok(RegisterOutcome::MissingFields);
    }

    let donor_id = match db::find_donors_by_phone(pool, form.phone.as_str())?
        .into_iter()
        .next()
    {
        Some(existing) => existing.id,
        None => db::insert_donor(pool, form.name.as_str(), form.phone.as_str())?,
    };

    // If this insert fails the donor row above stays behind; the two writes
    // are not wrapped in a transaction.
    let donation_id = db::insert_donation(
        pool,
        &NewDonation {
            date: form.date.as_str().to_string(),
            size: form.size,
            condition: form.condition,
            status: DonationStatus::Available,
            description: form.description.as_str().to_string(),
            donor_id: Some(donor_id),
        },
    )?;

    form.reset();
    Ok(RegisterOutcome::Registered {
        donor_id,
        donation_id,
    })
}

/// Re-fetch the donation and overwrite only its status. Returns false when
/// the row no longer exists.
pub fn set_donation_status(pool: &DbPool, id: i64, status: DonationStatus) -> anyhow::Result<bool> {
    let Some(mut donation) = db::get_donation(pool, id)? else {
        return Ok(false);
    };
    donation.status = status;
    db::update_donation(pool, &donation)
}

/// Arm the two-phase delete. No row is touched until [`confirm_delete`].
pub fn request_delete(view: &mut InventoryView, id: i64) {
    view.pending_delete = Some(id);
}

/// Drop the pending delete without mutating anything.
pub fn cancel_delete(view: &mut InventoryView) {
    view.pending_delete = None;
}

/// Permanently remove the donation armed by [`request_delete`].
pub fn confirm_delete(pool: &DbPool, view: &mut InventoryView) -> anyhow::Result<bool> {
    let Some(id) = view.pending_delete.take() else {
        return Ok(false);
    };
    db::delete_donation(pool, id)
}

/// Donations not yet handed out, the inventory tab's default view.
pub fn available_donations(pool: &DbPool) -> anyhow::Result<Vec<Donation>> {
    let donations = db::list_donations(pool)?
        .into_iter()
        .filter(|d| d.status == DonationStatus::Available)
        .collect();
    Ok(donations)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonorSummary {
    pub donor: Donor,
    pub donations: i64,
}

/// Every donor with the count of donations referencing them. Recomputed on
/// each call; nothing is cached between renders.
pub fn donor_summaries(pool: &DbPool) -> anyhow::Result<Vec<DonorSummary>> {
    let mut summaries = Vec::new();
    for donor in db::list_donors(pool)? {
        let donations = db::count_donations_by_donor(pool, donor.id)?;
        summaries.push(DonorSummary { donor, donations });
    }
    Ok(summaries)
}
