//! Initial schema migration - creates all tables from scratch.
//!
//! The complete schema for the studio operations core:
//!
//! - `organizations`: tenant roots
//! - `clients`: people the studio works for
//! - `crew`: tenant-scoped workers, linked to entities via assignment tables
//! - `bookings`: aggregate roots with name, package cost and status
//! - `participants`: client↔booking role joins
//! - `shoots`, `deliverables`, `tasks`, `expenses`: booking-owned assignable
//!   entities
//! - `received_payments`, `scheduled_payments`: money collected / expected
//! - `shoot_assignments`, `deliverable_assignments`, `task_assignments`,
//!   `expense_assignments`: crew↔entity joins, unique per
//!   `(entity_id, crew_id)`
//!
//! The unique index on `bookings (organization_id, name_norm)` is the
//! storage-level backstop for the application's duplicate-name check.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Organizations {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum Clients {
    Table,
    Id,
    OrganizationId,
    Name,
    Email,
    Phone,
}

#[derive(Iden)]
enum Crew {
    Table,
    Id,
    OrganizationId,
    Name,
    Role,
}

#[derive(Iden)]
enum Bookings {
    Table,
    Id,
    OrganizationId,
    Name,
    NameNorm,
    BookingType,
    PackageType,
    PackageCostMinor,
    Status,
    Note,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Participants {
    Table,
    Id,
    BookingId,
    ClientId,
    OrganizationId,
    Role,
}

#[derive(Iden)]
enum Shoots {
    Table,
    Id,
    BookingId,
    OrganizationId,
    Title,
    Location,
    ScheduledOn,
    CreatedAt,
}

#[derive(Iden)]
enum Deliverables {
    Table,
    Id,
    BookingId,
    OrganizationId,
    Title,
    PackageIncluded,
    CostMinor,
    Quantity,
    DueOn,
    CreatedAt,
}

#[derive(Iden)]
enum Tasks {
    Table,
    Id,
    BookingId,
    OrganizationId,
    DeliverableId,
    Title,
    DueOn,
    Completed,
    CreatedAt,
}

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    BookingId,
    OrganizationId,
    Description,
    AmountMinor,
    SpentOn,
    CreatedAt,
}

#[derive(Iden)]
enum ReceivedPayments {
    Table,
    Id,
    BookingId,
    OrganizationId,
    AmountMinor,
    Description,
    PaidOn,
}

#[derive(Iden)]
enum ScheduledPayments {
    Table,
    Id,
    BookingId,
    OrganizationId,
    AmountMinor,
    Description,
    DueOn,
}

/// Column set shared by the four assignment join tables.
#[derive(Iden)]
enum Assignments {
    Id,
    EntityId,
    CrewId,
    OrganizationId,
    IsLead,
    AssignedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

/// Creates one crew↔entity assignment table with the shared shape: FK to the
/// parent entity, FK to crew, and a unique index on `(entity_id, crew_id)`.
async fn create_assignment_table(
    manager: &SchemaManager<'_>,
    table: &str,
    parent_table: &str,
) -> Result<(), DbErr> {
    let fk_entity = format!("fk-{table}-entity_id");
    let fk_crew = format!("fk-{table}-crew_id");
    let idx_unique = format!("idx-{table}-entity_id-crew_id-unique");
    let idx_crew = format!("idx-{table}-crew_id");

    manager
        .create_table(
            Table::create()
                .table(Alias::new(table))
                .if_not_exists()
                .col(
                    ColumnDef::new(Assignments::Id)
                        .string()
                        .not_null()
                        .primary_key(),
                )
                .col(ColumnDef::new(Assignments::EntityId).string().not_null())
                .col(ColumnDef::new(Assignments::CrewId).string().not_null())
                .col(
                    ColumnDef::new(Assignments::OrganizationId)
                        .string()
                        .not_null(),
                )
                .col(
                    ColumnDef::new(Assignments::IsLead)
                        .boolean()
                        .not_null()
                        .default(false),
                )
                .col(
                    ColumnDef::new(Assignments::AssignedAt)
                        .timestamp()
                        .not_null(),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name(fk_entity.as_str())
                        .from(Alias::new(table), Assignments::EntityId)
                        .to(Alias::new(parent_table), Alias::new("id"))
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name(fk_crew.as_str())
                        .from(Alias::new(table), Assignments::CrewId)
                        .to(Crew::Table, Crew::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .to_owned(),
        )
        .await?;

    manager
        .create_index(
            Index::create()
                .name(idx_unique.as_str())
                .table(Alias::new(table))
                .col(Assignments::EntityId)
                .col(Assignments::CrewId)
                .unique()
                .to_owned(),
        )
        .await?;

    manager
        .create_index(
            Index::create()
                .name(idx_crew.as_str())
                .table(Alias::new(table))
                .col(Assignments::CrewId)
                .to_owned(),
        )
        .await?;

    Ok(())
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Organizations
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Organizations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Organizations::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Organizations::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Clients
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Clients::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Clients::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Clients::OrganizationId).string().not_null())
                    .col(ColumnDef::new(Clients::Name).string().not_null())
                    .col(ColumnDef::new(Clients::Email).string())
                    .col(ColumnDef::new(Clients::Phone).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-clients-organization_id")
                            .from(Clients::Table, Clients::OrganizationId)
                            .to(Organizations::Table, Organizations::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-clients-organization_id")
                    .table(Clients::Table)
                    .col(Clients::OrganizationId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Crew
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Crew::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Crew::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Crew::OrganizationId).string().not_null())
                    .col(ColumnDef::new(Crew::Name).string().not_null())
                    .col(ColumnDef::new(Crew::Role).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-crew-organization_id")
                            .from(Crew::Table, Crew::OrganizationId)
                            .to(Organizations::Table, Organizations::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-crew-organization_id")
                    .table(Crew::Table)
                    .col(Crew::OrganizationId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Bookings
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bookings::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bookings::OrganizationId).string().not_null())
                    .col(ColumnDef::new(Bookings::Name).string().not_null())
                    .col(ColumnDef::new(Bookings::NameNorm).string().not_null())
                    .col(ColumnDef::new(Bookings::BookingType).string())
                    .col(ColumnDef::new(Bookings::PackageType).string())
                    .col(
                        ColumnDef::new(Bookings::PackageCostMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bookings::Status).string().not_null())
                    .col(ColumnDef::new(Bookings::Note).string())
                    .col(ColumnDef::new(Bookings::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Bookings::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bookings-organization_id")
                            .from(Bookings::Table, Bookings::OrganizationId)
                            .to(Organizations::Table, Organizations::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // The authoritative duplicate-name backstop under concurrent writers.
        manager
            .create_index(
                Index::create()
                    .name("idx-bookings-organization_id-name_norm-unique")
                    .table(Bookings::Table)
                    .col(Bookings::OrganizationId)
                    .col(Bookings::NameNorm)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Participants
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Participants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Participants::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Participants::BookingId).string().not_null())
                    .col(ColumnDef::new(Participants::ClientId).string().not_null())
                    .col(
                        ColumnDef::new(Participants::OrganizationId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Participants::Role).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-participants-booking_id")
                            .from(Participants::Table, Participants::BookingId)
                            .to(Bookings::Table, Bookings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-participants-client_id")
                            .from(Participants::Table, Participants::ClientId)
                            .to(Clients::Table, Clients::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-participants-booking_id")
                    .table(Participants::Table)
                    .col(Participants::BookingId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Shoots
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Shoots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Shoots::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Shoots::BookingId).string().not_null())
                    .col(ColumnDef::new(Shoots::OrganizationId).string().not_null())
                    .col(ColumnDef::new(Shoots::Title).string().not_null())
                    .col(ColumnDef::new(Shoots::Location).string())
                    .col(ColumnDef::new(Shoots::ScheduledOn).date())
                    .col(ColumnDef::new(Shoots::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-shoots-booking_id")
                            .from(Shoots::Table, Shoots::BookingId)
                            .to(Bookings::Table, Bookings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-shoots-booking_id")
                    .table(Shoots::Table)
                    .col(Shoots::BookingId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Deliverables
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Deliverables::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Deliverables::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Deliverables::BookingId).string().not_null())
                    .col(
                        ColumnDef::new(Deliverables::OrganizationId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Deliverables::Title).string().not_null())
                    .col(
                        ColumnDef::new(Deliverables::PackageIncluded)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Deliverables::CostMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Deliverables::Quantity).integer().not_null())
                    .col(ColumnDef::new(Deliverables::DueOn).date())
                    .col(
                        ColumnDef::new(Deliverables::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-deliverables-booking_id")
                            .from(Deliverables::Table, Deliverables::BookingId)
                            .to(Bookings::Table, Bookings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-deliverables-booking_id")
                    .table(Deliverables::Table)
                    .col(Deliverables::BookingId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 8. Tasks
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Tasks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tasks::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Tasks::BookingId).string().not_null())
                    .col(ColumnDef::new(Tasks::OrganizationId).string().not_null())
                    .col(ColumnDef::new(Tasks::DeliverableId).string())
                    .col(ColumnDef::new(Tasks::Title).string().not_null())
                    .col(ColumnDef::new(Tasks::DueOn).date())
                    .col(
                        ColumnDef::new(Tasks::Completed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Tasks::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-tasks-booking_id")
                            .from(Tasks::Table, Tasks::BookingId)
                            .to(Bookings::Table, Bookings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-tasks-deliverable_id")
                            .from(Tasks::Table, Tasks::DeliverableId)
                            .to(Deliverables::Table, Deliverables::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-tasks-booking_id")
                    .table(Tasks::Table)
                    .col(Tasks::BookingId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 9. Expenses
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::BookingId).string().not_null())
                    .col(ColumnDef::new(Expenses::OrganizationId).string().not_null())
                    .col(ColumnDef::new(Expenses::Description).string().not_null())
                    .col(
                        ColumnDef::new(Expenses::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Expenses::SpentOn).date())
                    .col(ColumnDef::new(Expenses::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-booking_id")
                            .from(Expenses::Table, Expenses::BookingId)
                            .to(Bookings::Table, Bookings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-booking_id")
                    .table(Expenses::Table)
                    .col(Expenses::BookingId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 10. Received Payments
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(ReceivedPayments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReceivedPayments::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ReceivedPayments::BookingId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReceivedPayments::OrganizationId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReceivedPayments::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ReceivedPayments::Description).string())
                    .col(ColumnDef::new(ReceivedPayments::PaidOn).date().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-received_payments-booking_id")
                            .from(ReceivedPayments::Table, ReceivedPayments::BookingId)
                            .to(Bookings::Table, Bookings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-received_payments-booking_id")
                    .table(ReceivedPayments::Table)
                    .col(ReceivedPayments::BookingId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 11. Scheduled Payments
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(ScheduledPayments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScheduledPayments::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ScheduledPayments::BookingId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduledPayments::OrganizationId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduledPayments::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduledPayments::Description)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ScheduledPayments::DueOn).date().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-scheduled_payments-booking_id")
                            .from(ScheduledPayments::Table, ScheduledPayments::BookingId)
                            .to(Bookings::Table, Bookings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-scheduled_payments-booking_id")
                    .table(ScheduledPayments::Table)
                    .col(ScheduledPayments::BookingId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 12. Assignment join tables
        // ───────────────────────────────────────────────────────────────────
        create_assignment_table(manager, "shoot_assignments", "shoots").await?;
        create_assignment_table(manager, "deliverable_assignments", "deliverables").await?;
        create_assignment_table(manager, "task_assignments", "tasks").await?;
        create_assignment_table(manager, "expense_assignments", "expenses").await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        for table in [
            "expense_assignments",
            "task_assignments",
            "deliverable_assignments",
            "shoot_assignments",
        ] {
            manager
                .drop_table(Table::drop().table(Alias::new(table)).to_owned())
                .await?;
        }
        manager
            .drop_table(Table::drop().table(ScheduledPayments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ReceivedPayments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tasks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Deliverables::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Shoots::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Participants::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Crew::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Clients::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Organizations::Table).to_owned())
            .await?;
        Ok(())
    }
}
