use clothing_drive::app::{self, reports, RegisterOutcome};
use clothing_drive::db::models::{Condition, DonationStatus, NewDonation, Size};
use clothing_drive::db::{self, DbPool};
use clothing_drive::forms::{InventoryView, RegistrationForm};

fn test_pool() -> (tempfile::TempDir, DbPool) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("clothing_drive_test.sqlite");
    let pool = db::init_pool_at(path.to_str().expect("utf-8 path")).expect("init pool");
    (dir, pool)
}

fn filled_form(name: &str, phone_raw: &str, date_raw: &str) -> RegistrationForm {
    let mut form = RegistrationForm::new();
    form.name.set(name);
    form.phone.set(phone_raw);
    form.commit_phone();
    form.date.set(date_raw);
    form.commit_date();
    form
}

#[test]
fn registering_creates_donor_and_donation() {
    let (_dir, pool) = test_pool();

    let mut form = filled_form("Maria Silva", "11 98765-4321", "31122024");
    form.description.set("wool coat");

    let outcome = app::register_donation(&pool, &mut form).expect("register");
    let RegisterOutcome::Registered {
        donor_id,
        donation_id,
    } = outcome
    else {
        panic!("expected successful registration, got {:?}", outcome);
    };

    let donor = db::get_donor(&pool, donor_id)
        .expect("get_donor")
        .expect("donor exists");
    assert_eq!(donor.name, "Maria Silva");
    assert_eq!(donor.phone, "(11) 98765-4321");

    let donation = db::get_donation(&pool, donation_id)
        .expect("get_donation")
        .expect("donation exists");
    assert_eq!(donation.date, "31/12/2024");
    assert_eq!(donation.status, DonationStatus::Available);
    assert_eq!(donation.description, "wool coat");
    assert_eq!(donation.donor_id, Some(donor_id));

    // Successful submission resets the form to its defaults.
    assert!(form.name.is_empty());
    assert!(form.phone.is_empty());
    assert_eq!(form.size, Size::M);
    assert_eq!(form.condition, Condition::New);
}

#[test]
fn matching_phone_reuses_the_donor() {
    let (_dir, pool) = test_pool();

    let mut first = filled_form("Maria Silva", "11987654321", "01012025");
    let RegisterOutcome::Registered { donor_id, .. } =
        app::register_donation(&pool, &mut first).expect("first register")
    else {
        panic!("first registration rejected");
    };

    // Same phone, different name: no second donor row.
    let mut second = filled_form("M. Silva", "(11) 98765-4321", "02012025");
    let RegisterOutcome::Registered {
        donor_id: second_donor_id,
        ..
    } = app::register_donation(&pool, &mut second).expect("second register")
    else {
        panic!("second registration rejected");
    };

    assert_eq!(second_donor_id, donor_id);
    assert_eq!(db::list_donors(&pool).expect("list_donors").len(), 1);
    assert_eq!(
        db::count_donations_by_donor(&pool, donor_id).expect("count"),
        2
    );
}

#[test]
fn new_phone_creates_exactly_one_donor_and_donation() {
    let (_dir, pool) = test_pool();

    let mut form = filled_form("Ana", "21912345678", "05062025");
    app::register_donation(&pool, &mut form).expect("register");

    let donors = db::list_donors(&pool).expect("list_donors");
    let donations = db::list_donations(&pool).expect("list_donations");
    assert_eq!(donors.len(), 1);
    assert_eq!(donations.len(), 1);
    assert_eq!(donations[0].donor_id, Some(donors[0].id));
}

#[test]
fn missing_fields_block_submission() {
    let (_dir, pool) = test_pool();

    let mut form = filled_form("", "11987654321", "31122024");
    let outcome = app::register_donation(&pool, &mut form).expect("register");
    assert_eq!(outcome, RegisterOutcome::MissingFields);
    assert!(form.missing_fields_notice);
    assert!(db::list_donors(&pool).expect("list_donors").is_empty());
    assert!(db::list_donations(&pool).expect("list_donations").is_empty());

    // Rejection keeps what the user typed.
    assert_eq!(form.phone.as_str(), "(11) 98765-4321");
}

#[test]
fn ten_digit_phone_does_not_validate() {
    let (_dir, pool) = test_pool();

    // Normalization accepts ten digits, the validator only the eleven-digit
    // form, so this submission is rejected.
    let mut form = filled_form("Carlos", "1187654321", "31122024");
    assert_eq!(form.phone.as_str(), "(11) 8765-4321");

    let outcome = app::register_donation(&pool, &mut form).expect("register");
    assert_eq!(outcome, RegisterOutcome::MissingFields);
    assert!(db::list_donations(&pool).expect("list_donations").is_empty());
}

#[test]
fn status_update_is_persisted_and_filtered() {
    let (_dir, pool) = test_pool();

    let mut form = filled_form("Maria", "11987654321", "31122024");
    let RegisterOutcome::Registered { donation_id, .. } =
        app::register_donation(&pool, &mut form).expect("register")
    else {
        panic!("registration rejected");
    };

    assert!(app::set_donation_status(&pool, donation_id, DonationStatus::Donated).expect("set"));

    let donation = db::get_donation(&pool, donation_id)
        .expect("get_donation")
        .expect("donation exists");
    assert_eq!(donation.status, DonationStatus::Donated);

    assert!(app::available_donations(&pool)
        .expect("available")
        .is_empty());
    assert_eq!(db::list_donations(&pool).expect("all").len(), 1);

    // Updating a row that is gone reports false.
    assert!(!app::set_donation_status(&pool, 9999, DonationStatus::Donated).expect("set missing"));
}

#[test]
fn delete_requires_the_confirmation_gesture() {
    let (_dir, pool) = test_pool();

    let mut form = filled_form("Maria", "11987654321", "31122024");
    let RegisterOutcome::Registered { donation_id, .. } =
        app::register_donation(&pool, &mut form).expect("register")
    else {
        panic!("registration rejected");
    };

    let mut view = InventoryView::new();

    // Canceling the confirmation leaves the row unchanged.
    app::request_delete(&mut view, donation_id);
    app::cancel_delete(&mut view);
    assert!(view.pending_delete.is_none());
    assert_eq!(db::list_donations(&pool).expect("list").len(), 1);

    // Confirming removes it.
    app::request_delete(&mut view, donation_id);
    assert!(app::confirm_delete(&pool, &mut view).expect("confirm"));
    assert!(db::list_donations(&pool).expect("list").is_empty());

    // Nothing armed, nothing deleted.
    assert!(!app::confirm_delete(&pool, &mut view).expect("confirm idle"));
}

#[test]
fn donor_summaries_count_per_donor() {
    let (_dir, pool) = test_pool();

    let mut a1 = filled_form("Maria", "11987654321", "01012025");
    app::register_donation(&pool, &mut a1).expect("register");
    let mut a2 = filled_form("Maria", "11987654321", "02012025");
    app::register_donation(&pool, &mut a2).expect("register");
    let mut b = filled_form("Ana", "21912345678", "03012025");
    app::register_donation(&pool, &mut b).expect("register");

    let summaries = app::donor_summaries(&pool).expect("summaries");
    assert_eq!(summaries.len(), 2);

    let by_name = |name: &str| {
        summaries
            .iter()
            .find(|s| s.donor.name == name)
            .unwrap_or_else(|| panic!("missing summary for {name}"))
    };
    assert_eq!(by_name("Maria").donations, 2);
    assert_eq!(by_name("Ana").donations, 1);
}

#[test]
fn csv_export_includes_registered_rows() {
    let (_dir, pool) = test_pool();

    let mut form = filled_form("Maria", "11987654321", "31122024");
    form.description.set("jacket, with hood");
    app::register_donation(&pool, &mut form).expect("register");

    let csv = reports::export_donations_csv(&pool).expect("export");
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("id,date,size,condition,status,description,donor_id")
    );
    let row = lines.next().expect("one data row");
    assert!(row.contains("31/12/2024"));
    assert!(row.contains("Available"));
    // Comma in the description forces quoting.
    assert!(row.contains("\"jacket, with hood\""));

    let donors = reports::export_donor_summary_csv(&pool).expect("export donors");
    assert!(donors.contains("Maria,(11) 98765-4321,1"));
}

#[test]
fn csv_import_reuses_donors_and_skips_bad_rows() {
    let (_dir, pool) = test_pool();

    let mut form = filled_form("Maria", "11987654321", "01012025");
    app::register_donation(&pool, &mut form).expect("register");

    let payload = "\
donor_name,donor_phone,date,size,condition,description,status
Maria,11987654321,02012025,G,Used,flannel shirt,Available
Ana,21912345678,03012025,P,Semi-new,,Donated
Bad Phone,123,04012025,M,New,skipped row,
,11911112222,05012025,M,New,no name,
";
    let imported = reports::import_donations_csv(&pool, payload).expect("import");
    assert_eq!(imported, 2);

    // Maria was matched by phone; only Ana is new.
    let donors = db::list_donors(&pool).expect("list_donors");
    assert_eq!(donors.len(), 2);

    let donations = db::list_donations(&pool).expect("list_donations");
    assert_eq!(donations.len(), 3);

    let imported_statuses: Vec<DonationStatus> =
        donations.iter().skip(1).map(|d| d.status).collect();
    assert_eq!(
        imported_statuses,
        vec![DonationStatus::Available, DonationStatus::Donated]
    );
}

#[test]
fn schema_sync_is_idempotent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("clothing_drive_test.sqlite");
    let path = path.to_str().expect("utf-8 path");

    let pool = db::init_pool_at(path).expect("first open");
    db::sync_schema(&pool).expect("second sync");

    db::insert_donation(
        &pool,
        &NewDonation {
            date: "31/12/2024".to_string(),
            size: Size::GG,
            condition: Condition::SemiNew,
            status: DonationStatus::Available,
            description: String::new(),
            donor_id: None,
        },
    )
    .expect("insert");
    drop(pool);

    // Reopening the same file keeps the data and tolerates the re-sync.
    let reopened = db::init_pool_at(path).expect("reopen");
    let donations = db::list_donations(&reopened).expect("list");
    assert_eq!(donations.len(), 1);
    assert_eq!(donations[0].size, Size::GG);
    assert_eq!(donations[0].donor_id, None);
}
