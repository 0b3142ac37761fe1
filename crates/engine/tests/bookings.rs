use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{
    BookingStatus, CreateBookingCmd, DeliverableInput, Engine, EngineError, Money,
    NewDeliverableCmd, NewExpenseCmd, NewShootCmd, NewTaskCmd, ParticipantInput, ShootInput,
    UpdateBookingCmd, UpdateShootCmd, UpdateTaskCmd,
};
use migration::MigratorTrait;

const ORG_A: &str = "org-a";
const ORG_B: &str = "org-b";

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for (id, name) in [(ORG_A, "Aperture Studio"), (ORG_B, "Fjord Films")] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO organizations (id, name) VALUES (?, ?)",
            vec![id.into(), name.into()],
        ))
        .await
        .unwrap();
    }
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn seed_crew(db: &DatabaseConnection, organization_id: &str, name: &str) -> Uuid {
    let id = Uuid::new_v4();
    db.execute(Statement::from_sql_and_values(
        db.get_database_backend(),
        "INSERT INTO crew (id, organization_id, name, role) VALUES (?, ?, ?, ?)",
        vec![
            id.to_string().into(),
            organization_id.into(),
            name.into(),
            "photographer".into(),
        ],
    ))
    .await
    .unwrap();
    id
}

async fn count_rows(db: &DatabaseConnection, table: &str) -> i64 {
    let row = db
        .query_one(Statement::from_string(
            db.get_database_backend(),
            format!("SELECT COUNT(*) AS cnt FROM {table}"),
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get("", "cnt").unwrap()
}

/// `(assignment_id, crew_id, assigned_at)` rows for one shoot, ordered by
/// crew id so runs are comparable.
async fn shoot_assignment_rows(
    db: &DatabaseConnection,
    shoot_id: Uuid,
) -> Vec<(String, String, String)> {
    let rows = db
        .query_all(Statement::from_sql_and_values(
            db.get_database_backend(),
            "SELECT id, crew_id, assigned_at FROM shoot_assignments \
             WHERE entity_id = ? ORDER BY crew_id",
            vec![shoot_id.to_string().into()],
        ))
        .await
        .unwrap();
    rows.into_iter()
        .map(|row| {
            (
                row.try_get("", "id").unwrap(),
                row.try_get("", "crew_id").unwrap(),
                row.try_get("", "assigned_at").unwrap(),
            )
        })
        .collect()
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn sharma_wedding() -> CreateBookingCmd {
    CreateBookingCmd::new(ORG_A, "Sharma Wedding", "100000")
        .booking_type("wedding")
        .package_type("premium")
        .participant(ParticipantInput::new("Asha Sharma", "bride").email("asha@example.com"))
        .received_payment("40000", date("2026-06-01"))
        .scheduled_payment("60000", "balance before delivery", date("2026-09-01"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Booking aggregate: create
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_booking_at_exact_cost_boundary_succeeds() {
    let (engine, _db) = engine_with_db().await;

    // sum(received) + sum(scheduled) == package cost, boundary must pass
    let receipt = engine.create_booking(sharma_wedding()).await.unwrap();

    assert_eq!(receipt.client_ids.len(), 1);
    assert_eq!(receipt.participant_ids.len(), 1);
    assert_eq!(receipt.received_payment_ids.len(), 1);
    assert_eq!(receipt.scheduled_payment_ids.len(), 1);

    let snapshot = engine
        .booking_snapshot(ORG_A, receipt.booking_id)
        .await
        .unwrap();
    assert_eq!(snapshot.booking.name, "Sharma Wedding");
    assert_eq!(snapshot.booking.package_cost, "100000".parse::<Money>().unwrap());
    assert_eq!(snapshot.booking.status, BookingStatus::New);
    assert_eq!(snapshot.participants.len(), 1);
    assert_eq!(snapshot.received_payments.len(), 1);
    assert_eq!(
        snapshot.received_payments[0].amount,
        "40000".parse::<Money>().unwrap()
    );
    assert_eq!(snapshot.scheduled_payments.len(), 1);
}

#[tokio::test]
async fn create_booking_one_cent_over_cost_fails() {
    let (engine, db) = engine_with_db().await;

    let cmd = CreateBookingCmd::new(ORG_A, "Sharma Wedding", "100000")
        .received_payment("40000", date("2026-06-01"))
        .scheduled_payment("60000.01", "balance", date("2026-09-01"));

    let err = engine.create_booking(cmd).await.unwrap_err();
    assert!(matches!(err, EngineError::PaymentsExceedPackageCost(_)));

    assert_eq!(count_rows(&db, "bookings").await, 0);
    assert_eq!(count_rows(&db, "received_payments").await, 0);
    assert_eq!(count_rows(&db, "scheduled_payments").await, 0);
}

#[tokio::test]
async fn create_booking_duplicate_name_is_rejected_case_insensitively() {
    let (engine, db) = engine_with_db().await;

    engine.create_booking(sharma_wedding()).await.unwrap();
    let err = engine
        .create_booking(CreateBookingCmd::new(ORG_A, "sharma wedding", "5000"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::DuplicateBookingName("sharma wedding".to_string())
    );
    assert_eq!(count_rows(&db, "bookings").await, 1);
}

#[tokio::test]
async fn same_name_is_allowed_across_organizations() {
    let (engine, _db) = engine_with_db().await;

    engine.create_booking(sharma_wedding()).await.unwrap();
    engine
        .create_booking(CreateBookingCmd::new(ORG_B, "Sharma Wedding", "5000"))
        .await
        .unwrap();
}

#[tokio::test]
async fn create_booking_with_bad_crew_leaves_no_rows_behind() {
    let (engine, db) = engine_with_db().await;
    let valid_crew = seed_crew(&db, ORG_A, "Priya").await;
    let bogus_crew = Uuid::new_v4();

    let cmd = sharma_wedding()
        .shoot(ShootInput::new("Ceremony").crew(vec![valid_crew, bogus_crew]))
        .deliverable(DeliverableInput::new("Album", "2000").quantity(2));

    let err = engine.create_booking(cmd).await.unwrap_err();
    assert_eq!(err, EngineError::InvalidCrewReferences(vec![bogus_crew]));

    // the whole aggregate must be absent, not just the bad shoot
    for table in [
        "bookings",
        "clients",
        "participants",
        "shoots",
        "deliverables",
        "received_payments",
        "scheduled_payments",
        "shoot_assignments",
    ] {
        assert_eq!(count_rows(&db, table).await, 0, "{table} not empty");
    }
}

#[tokio::test]
async fn create_booking_with_crewed_shoots_inserts_assignments() {
    let (engine, db) = engine_with_db().await;
    let lead = seed_crew(&db, ORG_A, "Priya").await;
    let second = seed_crew(&db, ORG_A, "Marco").await;

    let cmd = sharma_wedding()
        .shoot(ShootInput::new("Ceremony").crew(vec![lead, second]))
        .shoot(ShootInput::new("Reception").crew(vec![lead]));

    let receipt = engine.create_booking(cmd).await.unwrap();
    assert_eq!(receipt.shoot_ids.len(), 2);
    assert_eq!(receipt.assignment_ids.len(), 3);
    assert_eq!(count_rows(&db, "shoot_assignments").await, 3);

    let snapshot = engine
        .booking_snapshot(ORG_A, receipt.booking_id)
        .await
        .unwrap();
    let ceremony = snapshot
        .shoots
        .iter()
        .find(|s| s.title == "Ceremony")
        .unwrap();
    assert_eq!(ceremony.crew.len(), 2);
}

#[tokio::test]
async fn blank_or_unknown_organization_is_unscoped() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .create_booking(CreateBookingCmd::new("", "Sharma Wedding", "100"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Unscoped(_)));

    let err = engine
        .create_booking(CreateBookingCmd::new("org-zz", "Sharma Wedding", "100"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Unscoped(_)));
}

// ─────────────────────────────────────────────────────────────────────────────
// Booking aggregate: update
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_booking_is_invisible_across_tenants() {
    let (engine, _db) = engine_with_db().await;
    let receipt = engine.create_booking(sharma_wedding()).await.unwrap();

    let err = engine
        .update_booking(UpdateBookingCmd::new(ORG_B, receipt.booking_id).name("Hijacked"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("booking".to_string()));
}

#[tokio::test]
async fn rename_to_taken_name_fails_and_rename_to_own_name_passes() {
    let (engine, _db) = engine_with_db().await;
    engine.create_booking(sharma_wedding()).await.unwrap();
    let other = engine
        .create_booking(CreateBookingCmd::new(ORG_A, "Verma Reception", "5000"))
        .await
        .unwrap();

    let err = engine
        .update_booking(UpdateBookingCmd::new(ORG_A, other.booking_id).name("Sharma Wedding"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::DuplicateBookingName("Sharma Wedding".to_string())
    );

    // the uniqueness check excludes the booking itself
    engine
        .update_booking(UpdateBookingCmd::new(ORG_A, other.booking_id).name("VERMA Reception"))
        .await
        .unwrap();
}

#[tokio::test]
async fn cost_reduction_below_committed_payments_is_blocked() {
    let (engine, _db) = engine_with_db().await;
    let receipt = engine
        .create_booking(
            CreateBookingCmd::new(ORG_A, "Sharma Wedding", "100000")
                .received_payment("90000", date("2026-06-01")),
        )
        .await
        .unwrap();

    let err = engine
        .update_booking(UpdateBookingCmd::new(ORG_A, receipt.booking_id).package_cost("80000"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::CostBelowCommittedPayments(_)));

    // storage unchanged on rejection
    let snapshot = engine
        .booking_snapshot(ORG_A, receipt.booking_id)
        .await
        .unwrap();
    assert_eq!(
        snapshot.booking.package_cost,
        "100000".parse::<Money>().unwrap()
    );

    engine
        .update_booking(UpdateBookingCmd::new(ORG_A, receipt.booking_id).package_cost("95000"))
        .await
        .unwrap();
    let snapshot = engine
        .booking_snapshot(ORG_A, receipt.booking_id)
        .await
        .unwrap();
    assert_eq!(
        snapshot.booking.package_cost,
        "95000".parse::<Money>().unwrap()
    );
}

#[tokio::test]
async fn status_walks_the_full_lifecycle() {
    let (engine, _db) = engine_with_db().await;
    let receipt = engine.create_booking(sharma_wedding()).await.unwrap();

    for status in [
        BookingStatus::Preparation,
        BookingStatus::Shooting,
        BookingStatus::Delivery,
        BookingStatus::Completed,
    ] {
        engine
            .update_booking(UpdateBookingCmd::new(ORG_A, receipt.booking_id).status(status))
            .await
            .unwrap();
        let snapshot = engine
            .booking_snapshot(ORG_A, receipt.booking_id)
            .await
            .unwrap();
        assert_eq!(snapshot.booking.status, status);
    }
}

#[tokio::test]
async fn invalid_transitions_are_rejected() {
    let (engine, _db) = engine_with_db().await;
    let receipt = engine.create_booking(sharma_wedding()).await.unwrap();

    // skipping a stage
    let err = engine
        .update_booking(
            UpdateBookingCmd::new(ORG_A, receipt.booking_id).status(BookingStatus::Delivery),
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidTransition {
            from: BookingStatus::New,
            to: BookingStatus::Delivery,
        }
    );

    // terminal states accept nothing
    engine
        .update_booking(
            UpdateBookingCmd::new(ORG_A, receipt.booking_id).status(BookingStatus::Cancelled),
        )
        .await
        .unwrap();
    let err = engine
        .update_booking(
            UpdateBookingCmd::new(ORG_A, receipt.booking_id).status(BookingStatus::Preparation),
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidTransition {
            from: BookingStatus::Cancelled,
            to: BookingStatus::Preparation,
        }
    );
}

#[tokio::test]
async fn same_status_update_is_a_noop_not_an_error() {
    let (engine, _db) = engine_with_db().await;
    let receipt = engine.create_booking(sharma_wedding()).await.unwrap();

    engine
        .update_booking(
            UpdateBookingCmd::new(ORG_A, receipt.booking_id)
                .status(BookingStatus::New)
                .note("still new"),
        )
        .await
        .unwrap();

    let snapshot = engine
        .booking_snapshot(ORG_A, receipt.booking_id)
        .await
        .unwrap();
    assert_eq!(snapshot.booking.status, BookingStatus::New);
    assert_eq!(snapshot.booking.note.as_deref(), Some("still new"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Assignment reconciliation
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn reconciliation_diffs_instead_of_rewriting() {
    let (engine, db) = engine_with_db().await;
    let c1 = seed_crew(&db, ORG_A, "One").await;
    let c2 = seed_crew(&db, ORG_A, "Two").await;
    let c3 = seed_crew(&db, ORG_A, "Three").await;
    let c4 = seed_crew(&db, ORG_A, "Four").await;

    let booking = engine.create_booking(sharma_wedding()).await.unwrap();
    let shoot = engine
        .new_shoot(
            NewShootCmd::new(ORG_A, booking.booking_id, "Ceremony").crew(vec![c1, c2, c3]),
        )
        .await
        .unwrap();
    assert_eq!(shoot.assignment_ids.len(), 3);

    let before = shoot_assignment_rows(&db, shoot.entity_id).await;
    assert_eq!(before.len(), 3);

    // existing {1,2,3} -> target {2,3,4}: delete 1, add 4, keep 2 and 3
    let updated = engine
        .update_shoot(UpdateShootCmd::new(ORG_A, shoot.entity_id).crew(vec![c2, c3, c4]))
        .await
        .unwrap();
    assert_eq!(updated.assignment_ids.len(), 1);

    let after = shoot_assignment_rows(&db, shoot.entity_id).await;
    assert_eq!(after.len(), 3);
    let crew_after: Vec<&str> = after.iter().map(|(_, crew_id, _)| crew_id.as_str()).collect();
    assert!(!crew_after.contains(&c1.to_string().as_str()));
    assert!(crew_after.contains(&c4.to_string().as_str()));

    // untouched members keep their row id and assigned_at
    for crew_id in [c2, c3] {
        let old = before
            .iter()
            .find(|(_, c, _)| *c == crew_id.to_string())
            .unwrap();
        let new = after
            .iter()
            .find(|(_, c, _)| *c == crew_id.to_string())
            .unwrap();
        assert_eq!(old.0, new.0, "assignment id changed for kept member");
        assert_eq!(old.2, new.2, "assigned_at changed for kept member");
    }
}

#[tokio::test]
async fn reconciliation_is_idempotent() {
    let (engine, db) = engine_with_db().await;
    let c1 = seed_crew(&db, ORG_A, "One").await;
    let c2 = seed_crew(&db, ORG_A, "Two").await;

    let booking = engine.create_booking(sharma_wedding()).await.unwrap();
    let shoot = engine
        .new_shoot(NewShootCmd::new(ORG_A, booking.booking_id, "Ceremony").crew(vec![c1, c2]))
        .await
        .unwrap();

    let first = shoot_assignment_rows(&db, shoot.entity_id).await;

    let repeat = engine
        .update_shoot(UpdateShootCmd::new(ORG_A, shoot.entity_id).crew(vec![c1, c2]))
        .await
        .unwrap();
    assert!(repeat.assignment_ids.is_empty());

    let second = shoot_assignment_rows(&db, shoot.entity_id).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn duplicate_target_ids_collapse_to_one_row() {
    let (engine, db) = engine_with_db().await;
    let c1 = seed_crew(&db, ORG_A, "One").await;

    let booking = engine.create_booking(sharma_wedding()).await.unwrap();
    let shoot = engine
        .new_shoot(NewShootCmd::new(ORG_A, booking.booking_id, "Ceremony").crew(vec![c1, c1, c1]))
        .await
        .unwrap();

    assert_eq!(shoot.assignment_ids.len(), 1);
    assert_eq!(count_rows(&db, "shoot_assignments").await, 1);
}

#[tokio::test]
async fn empty_target_set_removes_all_assignments() {
    let (engine, db) = engine_with_db().await;
    let c1 = seed_crew(&db, ORG_A, "One").await;
    let c2 = seed_crew(&db, ORG_A, "Two").await;

    let booking = engine.create_booking(sharma_wedding()).await.unwrap();
    let shoot = engine
        .new_shoot(NewShootCmd::new(ORG_A, booking.booking_id, "Ceremony").crew(vec![c1, c2]))
        .await
        .unwrap();

    engine
        .update_shoot(UpdateShootCmd::new(ORG_A, shoot.entity_id).crew(Vec::new()))
        .await
        .unwrap();
    assert_eq!(count_rows(&db, "shoot_assignments").await, 0);
}

#[tokio::test]
async fn crew_of_another_organization_cannot_be_assigned() {
    let (engine, db) = engine_with_db().await;
    let foreign = seed_crew(&db, ORG_B, "Smuggled").await;

    let booking = engine.create_booking(sharma_wedding()).await.unwrap();
    let err = engine
        .new_shoot(NewShootCmd::new(ORG_A, booking.booking_id, "Ceremony").crew(vec![foreign]))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::InvalidCrewReferences(vec![foreign]));
    assert_eq!(count_rows(&db, "shoot_assignments").await, 0);
    // the shoot insert rolled back with the failed assignment
    assert_eq!(count_rows(&db, "shoots").await, 0);
}

#[tokio::test]
async fn all_four_entity_kinds_reconcile_crew() {
    let (engine, db) = engine_with_db().await;
    let crew = seed_crew(&db, ORG_A, "Everywhere").await;

    let booking = engine.create_booking(sharma_wedding()).await.unwrap();

    let shoot = engine
        .new_shoot(NewShootCmd::new(ORG_A, booking.booking_id, "Ceremony").crew(vec![crew]))
        .await
        .unwrap();
    let deliverable = engine
        .new_deliverable(
            NewDeliverableCmd::new(ORG_A, booking.booking_id, "Album", "2000").crew(vec![crew]),
        )
        .await
        .unwrap();
    let task = engine
        .new_task(NewTaskCmd::new(ORG_A, booking.booking_id, "Cull photos").crew(vec![crew]))
        .await
        .unwrap();
    let expense = engine
        .new_expense(
            NewExpenseCmd::new(ORG_A, booking.booking_id, "Travel", "150").crew(vec![crew]),
        )
        .await
        .unwrap();

    for receipt in [&shoot, &deliverable, &task, &expense] {
        assert_eq!(receipt.assignment_ids.len(), 1);
    }
    for table in [
        "shoot_assignments",
        "deliverable_assignments",
        "task_assignments",
        "expense_assignments",
    ] {
        assert_eq!(count_rows(&db, table).await, 1, "{table}");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Assignable entities: ownership and references
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn task_may_only_reference_a_deliverable_of_its_own_booking() {
    let (engine, _db) = engine_with_db().await;

    let booking = engine.create_booking(sharma_wedding()).await.unwrap();
    let other_booking = engine
        .create_booking(CreateBookingCmd::new(ORG_A, "Verma Reception", "5000"))
        .await
        .unwrap();
    let foreign_deliverable = engine
        .new_deliverable(NewDeliverableCmd::new(
            ORG_A,
            other_booking.booking_id,
            "Album",
            "2000",
        ))
        .await
        .unwrap();

    let err = engine
        .new_task(
            NewTaskCmd::new(ORG_A, booking.booking_id, "Design album")
                .deliverable_id(foreign_deliverable.entity_id),
        )
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("deliverable".to_string()));

    // attaching to the booking's own deliverable works
    let own_deliverable = engine
        .new_deliverable(NewDeliverableCmd::new(
            ORG_A,
            booking.booking_id,
            "Album",
            "2000",
        ))
        .await
        .unwrap();
    let task = engine
        .new_task(
            NewTaskCmd::new(ORG_A, booking.booking_id, "Design album")
                .deliverable_id(own_deliverable.entity_id),
        )
        .await
        .unwrap();
    engine
        .update_task(UpdateTaskCmd::new(ORG_A, task.entity_id).completed(true))
        .await
        .unwrap();
}

#[tokio::test]
async fn entity_mutation_stamps_parent_booking() {
    let (engine, _db) = engine_with_db().await;
    let booking = engine.create_booking(sharma_wedding()).await.unwrap();
    let shoot = engine
        .new_shoot(NewShootCmd::new(ORG_A, booking.booking_id, "Ceremony"))
        .await
        .unwrap();

    let before = engine
        .booking_snapshot(ORG_A, booking.booking_id)
        .await
        .unwrap()
        .booking
        .updated_at;

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    engine
        .update_shoot(UpdateShootCmd::new(ORG_A, shoot.entity_id).title("Ceremony (moved)"))
        .await
        .unwrap();

    let after = engine
        .booking_snapshot(ORG_A, booking.booking_id)
        .await
        .unwrap()
        .booking
        .updated_at;
    assert!(after > before);
}

#[tokio::test]
async fn entities_are_invisible_across_tenants() {
    let (engine, _db) = engine_with_db().await;
    let booking = engine.create_booking(sharma_wedding()).await.unwrap();
    let shoot = engine
        .new_shoot(NewShootCmd::new(ORG_A, booking.booking_id, "Ceremony"))
        .await
        .unwrap();

    let err = engine
        .update_shoot(UpdateShootCmd::new(ORG_B, shoot.entity_id).title("Hijacked"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("shoot".to_string()));

    let err = engine
        .new_shoot(NewShootCmd::new(ORG_B, booking.booking_id, "Ceremony"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("booking".to_string()));
}

// ─────────────────────────────────────────────────────────────────────────────
// Payments against an existing booking
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn payments_can_fill_the_package_exactly_but_not_beyond() {
    let (engine, _db) = engine_with_db().await;
    let booking = engine
        .create_booking(CreateBookingCmd::new(ORG_A, "Sharma Wedding", "100000"))
        .await
        .unwrap();

    engine
        .record_received_payment(
            ORG_A,
            booking.booking_id,
            "40000",
            Some("advance"),
            date("2026-06-01"),
        )
        .await
        .unwrap();
    engine
        .schedule_payment(
            ORG_A,
            booking.booking_id,
            "60000",
            "balance before delivery",
            date("2026-09-01"),
        )
        .await
        .unwrap();

    // package is exactly full now
    let err = engine
        .record_received_payment(ORG_A, booking.booking_id, "0.01", None, date("2026-09-02"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::PaymentsExceedPackageCost(_)));

    let snapshot = engine
        .booking_snapshot(ORG_A, booking.booking_id)
        .await
        .unwrap();
    assert_eq!(snapshot.received_payments.len(), 1);
    assert_eq!(snapshot.scheduled_payments.len(), 1);
}

#[tokio::test]
async fn payments_are_tenant_scoped() {
    let (engine, _db) = engine_with_db().await;
    let booking = engine.create_booking(sharma_wedding()).await.unwrap();

    let err = engine
        .record_received_payment(ORG_B, booking.booking_id, "10", None, date("2026-06-01"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("booking".to_string()));
}

#[tokio::test]
async fn malformed_amounts_are_rejected_before_any_write() {
    let (engine, db) = engine_with_db().await;

    let err = engine
        .create_booking(CreateBookingCmd::new(ORG_A, "Sharma Wedding", "12.345"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let err = engine
        .create_booking(
            CreateBookingCmd::new(ORG_A, "Sharma Wedding", "1000")
                .received_payment("-5", date("2026-06-01")),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    assert_eq!(count_rows(&db, "bookings").await, 0);
}
