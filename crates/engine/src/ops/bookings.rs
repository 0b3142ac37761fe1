//! Booking aggregate operations.
//!
//! `create_booking` is the unit of work that brings a booking and all of its
//! initial children into existence atomically; `update_booking` mutates the
//! booking's own fields under the financial and state-machine invariants.
//! Partial aggregates are never observable: any failure rolls the whole
//! transaction back.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Booking, BookingStatus, CreateBookingCmd, CreatedBooking, Deliverable, EngineError, Expense,
    Money, Participant, ReceivedPayment, ScheduledPayment, Shoot, Task, UpdateBookingCmd,
    assignments::{
        AssignmentTable, DeliverableAssignments, ExpenseAssignments, ShootAssignments,
        TaskAssignments,
    },
    bookings, clients, deliverables, expenses, participants, received_payments,
    scheduled_payments, shoots, tasks,
    util::name_key,
};

use super::{
    Engine, finance, normalize_optional_text, normalize_required_name, parse_amount,
    parse_positive_amount, with_tx,
};

/// A booking with every child collection, read in one tenant-scoped
/// transaction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BookingSnapshot {
    pub booking: Booking,
    pub participants: Vec<Participant>,
    pub shoots: Vec<Shoot>,
    pub deliverables: Vec<Deliverable>,
    pub tasks: Vec<Task>,
    pub expenses: Vec<Expense>,
    pub received_payments: Vec<ReceivedPayment>,
    pub scheduled_payments: Vec<ScheduledPayment>,
}

/// Crew ids per entity id for one assignment table.
async fn crew_by_entity<T: AssignmentTable>(
    db_tx: &DatabaseTransaction,
    entity_ids: &[String],
) -> Result<HashMap<String, Vec<Uuid>>, EngineError> {
    let mut map: HashMap<String, Vec<Uuid>> = HashMap::new();
    for (entity_id, crew_id) in T::for_entities(db_tx, entity_ids).await? {
        map.entry(entity_id).or_default().push(crew_id);
    }
    Ok(map)
}

impl Engine {
    /// Create a booking together with its participants, shoots,
    /// deliverables and payments, as one atomic unit.
    ///
    /// Validation order: payload shape (names, amounts) before the
    /// transaction; name uniqueness, financial invariant and crew
    /// references inside it, before any insert. The storage-level unique
    /// index on `(organization_id, name_norm)` backs the uniqueness check
    /// under races.
    #[tracing::instrument(skip_all, fields(organization_id = %cmd.organization_id, name = %cmd.name))]
    pub async fn create_booking(&self, cmd: CreateBookingCmd) -> crate::ResultEngine<CreatedBooking> {
        let now = Utc::now();
        let name = normalize_required_name(&cmd.name, "booking")?;
        let package_cost = parse_amount(&cmd.package_cost, "package cost")?;

        // Parse every monetary field up front so malformed payloads fail
        // before the transaction even opens.
        let received: Vec<Money> = cmd
            .received_payments
            .iter()
            .map(|p| parse_positive_amount(&p.amount, "received payment amount"))
            .collect::<Result<_, _>>()?;
        let scheduled: Vec<Money> = cmd
            .scheduled_payments
            .iter()
            .map(|p| parse_positive_amount(&p.amount, "scheduled payment amount"))
            .collect::<Result<_, _>>()?;
        let deliverable_costs: Vec<Money> = cmd
            .deliverables
            .iter()
            .map(|d| parse_amount(&d.cost, "deliverable cost"))
            .collect::<Result<_, _>>()?;

        let committed = finance::sum_amounts(received.iter().chain(&scheduled).copied())?;
        finance::ensure_payments_within_cost(package_cost, committed)?;

        let declared_crew: Vec<Uuid> = cmd
            .shoots
            .iter()
            .flat_map(|shoot| shoot.crew.iter().copied())
            .collect();

        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, &cmd.organization_id).await?;
            self.require_booking_name_free(&db_tx, &cmd.organization_id, &name, None)
                .await?;
            // One batch check before any insert: a single bad crew id
            // aborts the whole aggregate.
            self.require_crew_refs(&db_tx, &cmd.organization_id, &declared_crew)
                .await?;

            let mut booking = Booking::new(&cmd.organization_id, name.clone(), package_cost, now);
            booking.booking_type = normalize_optional_text(cmd.booking_type.as_deref());
            booking.package_type = normalize_optional_text(cmd.package_type.as_deref());
            booking.note = normalize_optional_text(cmd.note.as_deref());
            bookings::ActiveModel::from(&booking).insert(&db_tx).await?;

            let mut receipt = CreatedBooking {
                booking_id: booking.id,
                client_ids: Vec::new(),
                participant_ids: Vec::new(),
                shoot_ids: Vec::new(),
                deliverable_ids: Vec::new(),
                received_payment_ids: Vec::new(),
                scheduled_payment_ids: Vec::new(),
                assignment_ids: Vec::new(),
            };
            let booking_id = booking.id.to_string();

            for participant in &cmd.participants {
                let client_name =
                    normalize_required_name(&participant.client_name, "client")?;
                let client_id = Uuid::new_v4();
                let client = clients::ActiveModel {
                    id: ActiveValue::Set(client_id.to_string()),
                    organization_id: ActiveValue::Set(cmd.organization_id.clone()),
                    name: ActiveValue::Set(client_name),
                    email: ActiveValue::Set(normalize_optional_text(
                        participant.email.as_deref(),
                    )),
                    phone: ActiveValue::Set(normalize_optional_text(
                        participant.phone.as_deref(),
                    )),
                };
                client.insert(&db_tx).await?;

                let participant_id = Uuid::new_v4();
                let row = participants::ActiveModel {
                    id: ActiveValue::Set(participant_id.to_string()),
                    booking_id: ActiveValue::Set(booking_id.clone()),
                    client_id: ActiveValue::Set(client_id.to_string()),
                    organization_id: ActiveValue::Set(cmd.organization_id.clone()),
                    role: ActiveValue::Set(participant.role.clone()),
                };
                row.insert(&db_tx).await?;

                receipt.client_ids.push(client_id);
                receipt.participant_ids.push(participant_id);
            }

            for shoot in &cmd.shoots {
                let title = normalize_required_name(&shoot.title, "shoot")?;
                let shoot_id = Uuid::new_v4();
                let row = shoots::ActiveModel {
                    id: ActiveValue::Set(shoot_id.to_string()),
                    booking_id: ActiveValue::Set(booking_id.clone()),
                    organization_id: ActiveValue::Set(cmd.organization_id.clone()),
                    title: ActiveValue::Set(title),
                    location: ActiveValue::Set(normalize_optional_text(
                        shoot.location.as_deref(),
                    )),
                    scheduled_on: ActiveValue::Set(shoot.scheduled_on),
                    created_at: ActiveValue::Set(now),
                };
                row.insert(&db_tx).await?;

                // Pure insert case of the reconciliation engine: the
                // existing set is empty by construction.
                let inserted = self
                    .reconcile_assignments::<ShootAssignments>(
                        &db_tx,
                        &cmd.organization_id,
                        shoot_id,
                        &shoot.crew,
                        now,
                    )
                    .await?;
                receipt.assignment_ids.extend(inserted);
                receipt.shoot_ids.push(shoot_id);
            }

            for (deliverable, cost) in cmd.deliverables.iter().zip(&deliverable_costs) {
                let title = normalize_required_name(&deliverable.title, "deliverable")?;
                let deliverable_id = Uuid::new_v4();
                let row = deliverables::ActiveModel {
                    id: ActiveValue::Set(deliverable_id.to_string()),
                    booking_id: ActiveValue::Set(booking_id.clone()),
                    organization_id: ActiveValue::Set(cmd.organization_id.clone()),
                    title: ActiveValue::Set(title),
                    package_included: ActiveValue::Set(deliverable.package_included),
                    cost_minor: ActiveValue::Set(cost.minor()),
                    quantity: ActiveValue::Set(deliverable.quantity),
                    due_on: ActiveValue::Set(deliverable.due_on),
                    created_at: ActiveValue::Set(now),
                };
                row.insert(&db_tx).await?;
                receipt.deliverable_ids.push(deliverable_id);
            }

            for (payment, amount) in cmd.received_payments.iter().zip(&received) {
                let payment_id = Uuid::new_v4();
                let row = received_payments::ActiveModel {
                    id: ActiveValue::Set(payment_id.to_string()),
                    booking_id: ActiveValue::Set(booking_id.clone()),
                    organization_id: ActiveValue::Set(cmd.organization_id.clone()),
                    amount_minor: ActiveValue::Set(amount.minor()),
                    description: ActiveValue::Set(normalize_optional_text(
                        payment.description.as_deref(),
                    )),
                    paid_on: ActiveValue::Set(payment.paid_on),
                };
                row.insert(&db_tx).await?;
                receipt.received_payment_ids.push(payment_id);
            }

            for (payment, amount) in cmd.scheduled_payments.iter().zip(&scheduled) {
                let payment_id = Uuid::new_v4();
                let row = scheduled_payments::ActiveModel {
                    id: ActiveValue::Set(payment_id.to_string()),
                    booking_id: ActiveValue::Set(booking_id.clone()),
                    organization_id: ActiveValue::Set(cmd.organization_id.clone()),
                    amount_minor: ActiveValue::Set(amount.minor()),
                    description: ActiveValue::Set(payment.description.clone()),
                    due_on: ActiveValue::Set(payment.due_on),
                };
                row.insert(&db_tx).await?;
                receipt.scheduled_payment_ids.push(payment_id);
            }

            Ok(receipt)
        })
    }

    /// Update a booking's own fields.
    ///
    /// Name changes re-check uniqueness excluding the booking itself; a cost
    /// decrease re-reads the committed payment total inside the same
    /// transaction; status changes must follow the transition table (a
    /// no-op status is allowed and skips the check).
    #[tracing::instrument(skip_all, fields(organization_id = %cmd.organization_id, booking_id = %cmd.booking_id))]
    pub async fn update_booking(&self, cmd: UpdateBookingCmd) -> crate::ResultEngine<Uuid> {
        let now = Utc::now();
        let new_name = cmd
            .name
            .as_deref()
            .map(|value| normalize_required_name(value, "booking"))
            .transpose()?;
        let new_cost = cmd
            .package_cost
            .as_deref()
            .map(|value| parse_amount(value, "package cost"))
            .transpose()?;

        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, &cmd.organization_id).await?;
            let model = self
                .require_booking(&db_tx, &cmd.organization_id, cmd.booking_id)
                .await?;
            let current_status = BookingStatus::try_from(model.status.as_str())?;

            let mut active = bookings::ActiveModel {
                id: ActiveValue::Set(model.id.clone()),
                ..Default::default()
            };

            if let Some(name) = new_name {
                if name_key(&name) != model.name_norm {
                    self.require_booking_name_free(
                        &db_tx,
                        &cmd.organization_id,
                        &name,
                        Some(&model.id),
                    )
                    .await?;
                }
                active.name_norm = ActiveValue::Set(name_key(&name));
                active.name = ActiveValue::Set(name);
            }

            if let Some(new_cost) = new_cost {
                if new_cost < Money::new(model.package_cost_minor) {
                    let committed = self
                        .committed_payment_total(&db_tx, cmd.booking_id)
                        .await?;
                    finance::ensure_cost_covers_committed(new_cost, committed)?;
                }
                active.package_cost_minor = ActiveValue::Set(new_cost.minor());
            }

            if let Some(new_status) = cmd.status
                && new_status != current_status
            {
                if !current_status.can_transition_to(new_status) {
                    return Err(EngineError::InvalidTransition {
                        from: current_status,
                        to: new_status,
                    });
                }
                active.status = ActiveValue::Set(new_status.as_str().to_string());
            }

            if let Some(note) = cmd.note.as_deref() {
                active.note = ActiveValue::Set(normalize_optional_text(Some(note)));
            }

            active.updated_at = ActiveValue::Set(now);
            active.update(&db_tx).await?;
            Ok(cmd.booking_id)
        })
    }

    /// Return a booking with all of its child collections.
    pub async fn booking_snapshot(
        &self,
        organization_id: &str,
        booking_id: Uuid,
    ) -> crate::ResultEngine<BookingSnapshot> {
        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, organization_id).await?;
            let model = self
                .require_booking(&db_tx, organization_id, booking_id)
                .await?;
            let booking_key = model.id.clone();
            let booking = Booking::try_from(model)?;

            let participant_rows = participants::Entity::find()
                .filter(participants::Column::BookingId.eq(booking_key.clone()))
                .all(&db_tx)
                .await?;
            let participants = participant_rows
                .into_iter()
                .map(Participant::try_from)
                .collect::<Result<Vec<_>, _>>()?;

            let shoot_rows = shoots::Entity::find()
                .filter(shoots::Column::BookingId.eq(booking_key.clone()))
                .all(&db_tx)
                .await?;
            let shoot_ids: Vec<String> = shoot_rows.iter().map(|m| m.id.clone()).collect();
            let shoot_crew =
                crew_by_entity::<ShootAssignments>(&db_tx, &shoot_ids).await?;
            let shoots = shoot_rows
                .into_iter()
                .map(|m| {
                    let key = m.id.clone();
                    let mut shoot = Shoot::try_from(m)?;
                    shoot.crew = shoot_crew.get(&key).cloned().unwrap_or_default();
                    Ok(shoot)
                })
                .collect::<Result<Vec<_>, EngineError>>()?;

            let deliverable_rows = deliverables::Entity::find()
                .filter(deliverables::Column::BookingId.eq(booking_key.clone()))
                .all(&db_tx)
                .await?;
            let deliverable_ids: Vec<String> =
                deliverable_rows.iter().map(|m| m.id.clone()).collect();
            let deliverable_crew =
                crew_by_entity::<DeliverableAssignments>(&db_tx, &deliverable_ids).await?;
            let deliverables = deliverable_rows
                .into_iter()
                .map(|m| {
                    let key = m.id.clone();
                    let mut deliverable = Deliverable::try_from(m)?;
                    deliverable.crew =
                        deliverable_crew.get(&key).cloned().unwrap_or_default();
                    Ok(deliverable)
                })
                .collect::<Result<Vec<_>, EngineError>>()?;

            let task_rows = tasks::Entity::find()
                .filter(tasks::Column::BookingId.eq(booking_key.clone()))
                .all(&db_tx)
                .await?;
            let task_ids: Vec<String> = task_rows.iter().map(|m| m.id.clone()).collect();
            let task_crew = crew_by_entity::<TaskAssignments>(&db_tx, &task_ids).await?;
            let tasks = task_rows
                .into_iter()
                .map(|m| {
                    let key = m.id.clone();
                    let mut task = Task::try_from(m)?;
                    task.crew = task_crew.get(&key).cloned().unwrap_or_default();
                    Ok(task)
                })
                .collect::<Result<Vec<_>, EngineError>>()?;

            let expense_rows = expenses::Entity::find()
                .filter(expenses::Column::BookingId.eq(booking_key.clone()))
                .all(&db_tx)
                .await?;
            let expense_ids: Vec<String> =
                expense_rows.iter().map(|m| m.id.clone()).collect();
            let expense_crew =
                crew_by_entity::<ExpenseAssignments>(&db_tx, &expense_ids).await?;
            let expenses = expense_rows
                .into_iter()
                .map(|m| {
                    let key = m.id.clone();
                    let mut expense = Expense::try_from(m)?;
                    expense.crew = expense_crew.get(&key).cloned().unwrap_or_default();
                    Ok(expense)
                })
                .collect::<Result<Vec<_>, EngineError>>()?;

            let received_payments = received_payments::Entity::find()
                .filter(received_payments::Column::BookingId.eq(booking_key.clone()))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(ReceivedPayment::try_from)
                .collect::<Result<Vec<_>, _>>()?;

            let scheduled_payments = scheduled_payments::Entity::find()
                .filter(scheduled_payments::Column::BookingId.eq(booking_key))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(ScheduledPayment::try_from)
                .collect::<Result<Vec<_>, _>>()?;

            Ok(BookingSnapshot {
                booking,
                participants,
                shoots,
                deliverables,
                tasks,
                expenses,
                received_payments,
                scheduled_payments,
            })
        })
    }

    /// Enforce per-organization booking-name uniqueness (case and width
    /// insensitive), optionally excluding one booking id on rename.
    pub(super) async fn require_booking_name_free(
        &self,
        db_tx: &DatabaseTransaction,
        organization_id: &str,
        name: &str,
        exclude_id: Option<&str>,
    ) -> crate::ResultEngine<()> {
        let mut query = bookings::Entity::find()
            .filter(bookings::Column::OrganizationId.eq(organization_id))
            .filter(bookings::Column::NameNorm.eq(name_key(name)));
        if let Some(id) = exclude_id {
            query = query.filter(bookings::Column::Id.ne(id));
        }
        if query.one(db_tx).await?.is_some() {
            return Err(EngineError::DuplicateBookingName(name.to_string()));
        }
        Ok(())
    }

    /// Stamp the parent booking's `updated_at`; every child mutation ends
    /// here.
    pub(super) async fn touch_booking(
        &self,
        db_tx: &DatabaseTransaction,
        booking_id: &str,
        at: DateTime<Utc>,
    ) -> crate::ResultEngine<()> {
        let active = bookings::ActiveModel {
            id: ActiveValue::Set(booking_id.to_string()),
            updated_at: ActiveValue::Set(at),
            ..Default::default()
        };
        active.update(db_tx).await?;
        Ok(())
    }
}
