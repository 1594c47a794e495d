//! The seam between the controller and the immediate-mode toolkit.
//!
//! The toolkit adapter implements [`Widgets`] and calls [`App::frame`] once
//! per display refresh. Everything the adapter needs to draw is passed
//! through the trait; the adapter owns the window and the event loop.

use crate::app::{self, RegisterOutcome};
use crate::db::models::{Condition, DonationStatus, Size};
use crate::db::{self, DbPool};
use crate::fields;
use crate::forms::{BoundedText, InventoryView, RegistrationForm};

/// Per-character input filter attached to a text input.
pub type CharFilter = fn(char) -> bool;

/// Outcome of a modal confirmation this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirm {
    /// Still showing; the user has not decided.
    Open,
    Accepted,
    Dismissed,
}

/// Widget primitives supplied by the toolkit adapter.
///
/// Ids are stable across frames and unique within one; row widgets suffix
/// the record id.
pub trait Widgets {
    /// Draw the tab bar and return the active tab index.
    fn tab_bar(&mut self, tabs: &[&str]) -> usize;

    fn heading(&mut self, text: &str);

    fn separator(&mut self);

    fn label(&mut self, text: &str);

    /// Draw a text input bound to `value`. Returns true when the user
    /// commits the field this frame (e.g. presses Enter).
    fn text_input(
        &mut self,
        id: &str,
        hint: &str,
        value: &mut BoundedText,
        filter: Option<CharFilter>,
    ) -> bool;

    /// Single-choice dropdown. Returns the picked index when the selection
    /// changes this frame.
    fn dropdown(&mut self, id: &str, current: &str, options: &[&str]) -> Option<usize>;

    fn button(&mut self, id: &str, label: &str) -> bool;

    /// Returns true when the user toggles the box this frame.
    fn checkbox(&mut self, id: &str, label: &str, checked: &mut bool) -> bool;

    /// Modal confirmation dialog shown while a destructive action is armed.
    fn confirm_modal(&mut self, id: &str, prompt: &str) -> Confirm;

    /// Inline notice with a dismiss action. Returns true when dismissed.
    fn notice(&mut self, id: &str, text: &str) -> bool;
}

/// The application: owns the pool and the transient view state, renders one
/// frame at a time.
pub struct App {
    pool: DbPool,
    pub form: RegistrationForm,
    pub inventory: InventoryView,
}

impl App {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            form: RegistrationForm::new(),
            inventory: InventoryView::new(),
        }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Frame-render entry point; call once per display refresh.
    pub fn frame(&mut self, ui: &mut dyn Widgets) -> anyhow::Result<()> {
        match ui.tab_bar(&["Register", "Donations", "Donors"]) {
            0 => self.register_tab(ui),
            1 => self.donations_tab(ui),
            _ => self.donors_tab(ui),
        }
    }

    fn register_tab(&mut self, ui: &mut dyn Widgets) -> anyhow::Result<()> {
        ui.heading("Donor details");
        ui.separator();

        ui.text_input("name", "Name*", &mut self.form.name, None);
        if ui.text_input(
            "phone",
            "(__) _____-____",
            &mut self.form.phone,
            Some(fields::is_phone_char),
        ) {
            self.form.commit_phone();
        }

        ui.heading("Item details");
        ui.separator();

        if ui.text_input(
            "date",
            "__/__/____",
            &mut self.form.date,
            Some(fields::is_date_char),
        ) {
            self.form.commit_date();
        }
        if let Some(i) = ui.dropdown("size", self.form.size.as_str(), &Size::LABELS) {
            self.form.size = Size::ALL[i];
        }
        if let Some(i) = ui.dropdown("condition", self.form.condition.as_str(), &Condition::LABELS)
        {
            self.form.condition = Condition::ALL[i];
        }
        ui.text_input("description", "Description", &mut self.form.description, None);

        if self.form.missing_fields_notice
            && ui.notice("required-fields", "Fields marked with * are required")
        {
            self.form.missing_fields_notice = false;
        }

        if ui.button("register", "Register donation") {
            match app::register_donation(&self.pool, &mut self.form)? {
                RegisterOutcome::Registered {
                    donor_id,
                    donation_id,
                } => {
                    tracing::info!(donor_id, donation_id, "registered donation");
                }
                RegisterOutcome::MissingFields => {}
            }
        }

        Ok(())
    }

    fn donations_tab(&mut self, ui: &mut dyn Widgets) -> anyhow::Result<()> {
        ui.checkbox(
            "only-available",
            "Only available",
            &mut self.inventory.only_available,
        );
        ui.separator();

        let rows = if self.inventory.only_available {
            app::available_donations(&self.pool)?
        } else {
            db::list_donations(&self.pool)?
        };

        for donation in rows {
            let id = donation.id;
            ui.label(&donation.date);
            ui.label(donation.size.as_str());
            ui.label(donation.condition.as_str());
            if donation.description.is_empty() {
                ui.label("No description");
            } else {
                ui.label(&donation.description);
            }

            if let Some(i) = ui.dropdown(
                &format!("status-{id}"),
                donation.status.as_str(),
                &DonationStatus::LABELS,
            ) {
                app::set_donation_status(&self.pool, id, DonationStatus::ALL[i])?;
            }
            if ui.button(&format!("delete-{id}"), "Delete") {
                app::request_delete(&mut self.inventory, id);
            }
        }

        if self.inventory.pending_delete.is_some() {
            match ui.confirm_modal("confirm-delete", "Permanently delete this donation?") {
                Confirm::Accepted => {
                    app::confirm_delete(&self.pool, &mut self.inventory)?;
                }
                Confirm::Dismissed => app::cancel_delete(&mut self.inventory),
                Confirm::Open => {}
            }
        }

        Ok(())
    }

    fn donors_tab(&mut self, ui: &mut dyn Widgets) -> anyhow::Result<()> {
        ui.heading("Donors");
        ui.separator();

        for summary in app::donor_summaries(&self.pool)? {
            ui.label(&summary.donor.name);
            ui.label(&summary.donor.phone);
            ui.label(&summary.donations.to_string());
        }

        Ok(())
    }
}
