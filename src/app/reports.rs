//! CSV import and export for the stored records.

use crate::db::models::{Condition, DonationStatus, NewDonation, Size};
use crate::db::{self, DbPool};
use crate::fields;

fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        let escaped = s.replace('"', "\"\"");
        format!("\"{}\"", escaped)
    } else {
        s.to_string()
    }
}

/// All donations as CSV, one row per record.
pub fn export_donations_csv(pool: &DbPool) -> anyhow::Result<String> {
    let mut w = String::new();
    w.push_str("id,date,size,condition,status,description,donor_id\n");
    for d in db::list_donations(pool)? {
        let donor_id = d.donor_id.map(|id| id.to_string()).unwrap_or_default();
        w.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            d.id,
            csv_escape(&d.date),
            d.size,
            d.condition,
            d.status,
            csv_escape(&d.description),
            donor_id,
        ));
    }
    Ok(w)
}

/// Donors with their donation counts as CSV.
pub fn export_donor_summary_csv(pool: &DbPool) -> anyhow::Result<String> {
    let mut w = String::new();
    w.push_str("id,name,phone,donations\n");
    for summary in super::donor_summaries(pool)? {
        w.push_str(&format!(
            "{},{},{},{}\n",
            summary.donor.id,
            csv_escape(&summary.donor.name),
            csv_escape(&summary.donor.phone),
            summary.donations,
        ));
    }
    Ok(w)
}

/// Import donations from a CSV payload (expects a header row).
///
/// Columns: donor_name, donor_phone, date, size, condition, description
/// and optionally status. Phone and date go through the same normalization
/// pipeline as the form; rows that fail it are skipped, not fatal. Returns
/// how many rows were imported.
pub fn import_donations_csv(pool: &DbPool, text: &str) -> anyhow::Result<usize> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut imported = 0usize;

    for record in reader.records() {
        let rec = match record {
            Ok(rec) => rec,
            Err(e) => {
                tracing::error!("CSV parse error: {}", e);
                continue;
            }
        };

        let name = rec.get(0).unwrap_or("").trim().to_string();
        let phone_raw = rec.get(1).unwrap_or("");
        let date_raw = rec.get(2).unwrap_or("");
        let size = rec
            .get(3)
            .and_then(|s| Size::from_label(s.trim()))
            .unwrap_or(Size::M);
        let condition = rec
            .get(4)
            .and_then(|s| Condition::from_label(s.trim()))
            .unwrap_or(Condition::New);
        let description = rec.get(5).unwrap_or("").to_string();
        let status = rec
            .get(6)
            .and_then(|s| DonationStatus::from_label(s.trim()))
            .unwrap_or(DonationStatus::Available);

        if name.is_empty() {
            tracing::error!("Import: empty donor name, skipping row");
            continue;
        }
        let phone = match fields::normalize_phone(phone_raw) {
            Ok(phone) => phone,
            Err(e) => {
                tracing::error!("Import: bad phone {:?}: {}", phone_raw, e);
                continue;
            }
        };
        let date = match fields::normalize_date(date_raw) {
            Ok(date) => date,
            Err(e) => {
                tracing::error!("Import: bad date {:?}: {}", date_raw, e);
                continue;
            }
        };

        let donor_id = match db::find_donors_by_phone(pool, &phone) {
            Ok(donors) => match donors.into_iter().next() {
                Some(existing) => existing.id,
                None => match db::insert_donor(pool, &name, &phone) {
                    Ok(id) => id,
                    Err(e) => {
                        tracing::error!("Import donor create failed: {}", e);
                        continue;
                    }
                },
            },
            Err(e) => {
                tracing::error!("Import donor lookup failed: {}", e);
                continue;
            }
        };

        let donation = NewDonation {
            date,
            size,
            condition,
            status,
            description,
            donor_id: Some(donor_id),
        };
        if let Err(e) = db::insert_donation(pool, &donation) {
            tracing::error!("Import donation insert failed: {}", e);
        } else {
            imported += 1;
        }
    }

    Ok(imported)
}
