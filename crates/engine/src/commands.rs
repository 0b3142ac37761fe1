//! Command structs for engine operations.
//!
//! These types group parameters for write operations (booking create/update,
//! assignable-entity create/update), keeping call sites readable and
//! avoiding long argument lists. Monetary fields are exact decimal strings;
//! parsing happens inside the engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::BookingStatus;

/// A client identity plus their role in the booking.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParticipantInput {
    pub client_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: String,
}

impl ParticipantInput {
    #[must_use]
    pub fn new(client_name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            client_name: client_name.into(),
            email: None,
            phone: None,
            role: role.into(),
        }
    }

    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

/// A shoot created together with the booking, optionally with crew.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShootInput {
    pub title: String,
    pub location: Option<String>,
    pub scheduled_on: Option<NaiveDate>,
    pub crew: Vec<Uuid>,
}

impl ShootInput {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            location: None,
            scheduled_on: None,
            crew: Vec::new(),
        }
    }

    #[must_use]
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn scheduled_on(mut self, date: NaiveDate) -> Self {
        self.scheduled_on = Some(date);
        self
    }

    #[must_use]
    pub fn crew(mut self, crew: Vec<Uuid>) -> Self {
        self.crew = crew;
        self
    }
}

/// A deliverable created together with the booking.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeliverableInput {
    pub title: String,
    pub package_included: bool,
    /// Standalone price as a decimal string; ignored for package-included
    /// deliverables in invoicing, stored either way.
    pub cost: String,
    pub quantity: i32,
    pub due_on: Option<NaiveDate>,
}

impl DeliverableInput {
    #[must_use]
    pub fn new(title: impl Into<String>, cost: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            package_included: false,
            cost: cost.into(),
            quantity: 1,
            due_on: None,
        }
    }

    #[must_use]
    pub fn package_included(mut self, included: bool) -> Self {
        self.package_included = included;
        self
    }

    #[must_use]
    pub fn quantity(mut self, quantity: i32) -> Self {
        self.quantity = quantity;
        self
    }

    #[must_use]
    pub fn due_on(mut self, date: NaiveDate) -> Self {
        self.due_on = Some(date);
        self
    }
}

/// A payment already collected, recorded at booking creation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReceivedPaymentInput {
    pub amount: String,
    pub description: Option<String>,
    pub paid_on: NaiveDate,
}

/// A payment expected in the future, recorded at booking creation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScheduledPaymentInput {
    pub amount: String,
    pub description: String,
    pub due_on: NaiveDate,
}

/// Create a booking together with its child records, atomically.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateBookingCmd {
    pub organization_id: String,
    pub name: String,
    pub booking_type: Option<String>,
    pub package_type: Option<String>,
    /// Package cost as a decimal string, `>= 0`.
    pub package_cost: String,
    pub note: Option<String>,
    pub participants: Vec<ParticipantInput>,
    pub shoots: Vec<ShootInput>,
    pub deliverables: Vec<DeliverableInput>,
    pub received_payments: Vec<ReceivedPaymentInput>,
    pub scheduled_payments: Vec<ScheduledPaymentInput>,
}

impl CreateBookingCmd {
    #[must_use]
    pub fn new(
        organization_id: impl Into<String>,
        name: impl Into<String>,
        package_cost: impl Into<String>,
    ) -> Self {
        Self {
            organization_id: organization_id.into(),
            name: name.into(),
            booking_type: None,
            package_type: None,
            package_cost: package_cost.into(),
            note: None,
            participants: Vec::new(),
            shoots: Vec::new(),
            deliverables: Vec::new(),
            received_payments: Vec::new(),
            scheduled_payments: Vec::new(),
        }
    }

    #[must_use]
    pub fn booking_type(mut self, value: impl Into<String>) -> Self {
        self.booking_type = Some(value.into());
        self
    }

    #[must_use]
    pub fn package_type(mut self, value: impl Into<String>) -> Self {
        self.package_type = Some(value.into());
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn participant(mut self, participant: ParticipantInput) -> Self {
        self.participants.push(participant);
        self
    }

    #[must_use]
    pub fn shoot(mut self, shoot: ShootInput) -> Self {
        self.shoots.push(shoot);
        self
    }

    #[must_use]
    pub fn deliverable(mut self, deliverable: DeliverableInput) -> Self {
        self.deliverables.push(deliverable);
        self
    }

    #[must_use]
    pub fn received_payment(mut self, amount: impl Into<String>, paid_on: NaiveDate) -> Self {
        self.received_payments.push(ReceivedPaymentInput {
            amount: amount.into(),
            description: None,
            paid_on,
        });
        self
    }

    #[must_use]
    pub fn scheduled_payment(
        mut self,
        amount: impl Into<String>,
        description: impl Into<String>,
        due_on: NaiveDate,
    ) -> Self {
        self.scheduled_payments.push(ScheduledPaymentInput {
            amount: amount.into(),
            description: description.into(),
            due_on,
        });
        self
    }
}

/// Update a booking's own fields; absent fields are left unchanged.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdateBookingCmd {
    pub organization_id: String,
    pub booking_id: Uuid,
    pub name: Option<String>,
    pub package_cost: Option<String>,
    pub status: Option<BookingStatus>,
    pub note: Option<String>,
}

impl UpdateBookingCmd {
    #[must_use]
    pub fn new(organization_id: impl Into<String>, booking_id: Uuid) -> Self {
        Self {
            organization_id: organization_id.into(),
            booking_id,
            name: None,
            package_cost: None,
            status: None,
            note: None,
        }
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn package_cost(mut self, cost: impl Into<String>) -> Self {
        self.package_cost = Some(cost.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: BookingStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Create a shoot on an existing booking.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewShootCmd {
    pub organization_id: String,
    pub booking_id: Uuid,
    pub title: String,
    pub location: Option<String>,
    pub scheduled_on: Option<NaiveDate>,
    pub crew: Vec<Uuid>,
}

impl NewShootCmd {
    #[must_use]
    pub fn new(
        organization_id: impl Into<String>,
        booking_id: Uuid,
        title: impl Into<String>,
    ) -> Self {
        Self {
            organization_id: organization_id.into(),
            booking_id,
            title: title.into(),
            location: None,
            scheduled_on: None,
            crew: Vec::new(),
        }
    }

    #[must_use]
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn scheduled_on(mut self, date: NaiveDate) -> Self {
        self.scheduled_on = Some(date);
        self
    }

    #[must_use]
    pub fn crew(mut self, crew: Vec<Uuid>) -> Self {
        self.crew = crew;
        self
    }
}

/// Update a shoot.
///
/// `crew` is the full target set for the shoot: members not listed are
/// unassigned, members already assigned keep their original `assigned_at`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdateShootCmd {
    pub organization_id: String,
    pub shoot_id: Uuid,
    pub title: Option<String>,
    pub location: Option<String>,
    pub scheduled_on: Option<NaiveDate>,
    pub crew: Vec<Uuid>,
}

impl UpdateShootCmd {
    #[must_use]
    pub fn new(organization_id: impl Into<String>, shoot_id: Uuid) -> Self {
        Self {
            organization_id: organization_id.into(),
            shoot_id,
            title: None,
            location: None,
            scheduled_on: None,
            crew: Vec::new(),
        }
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn scheduled_on(mut self, date: NaiveDate) -> Self {
        self.scheduled_on = Some(date);
        self
    }

    #[must_use]
    pub fn crew(mut self, crew: Vec<Uuid>) -> Self {
        self.crew = crew;
        self
    }
}

/// Create a deliverable on an existing booking.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewDeliverableCmd {
    pub organization_id: String,
    pub booking_id: Uuid,
    pub title: String,
    pub package_included: bool,
    pub cost: String,
    pub quantity: i32,
    pub due_on: Option<NaiveDate>,
    pub crew: Vec<Uuid>,
}

impl NewDeliverableCmd {
    #[must_use]
    pub fn new(
        organization_id: impl Into<String>,
        booking_id: Uuid,
        title: impl Into<String>,
        cost: impl Into<String>,
    ) -> Self {
        Self {
            organization_id: organization_id.into(),
            booking_id,
            title: title.into(),
            package_included: false,
            cost: cost.into(),
            quantity: 1,
            due_on: None,
            crew: Vec::new(),
        }
    }

    #[must_use]
    pub fn package_included(mut self, included: bool) -> Self {
        self.package_included = included;
        self
    }

    #[must_use]
    pub fn quantity(mut self, quantity: i32) -> Self {
        self.quantity = quantity;
        self
    }

    #[must_use]
    pub fn due_on(mut self, date: NaiveDate) -> Self {
        self.due_on = Some(date);
        self
    }

    #[must_use]
    pub fn crew(mut self, crew: Vec<Uuid>) -> Self {
        self.crew = crew;
        self
    }
}

/// Update a deliverable; `crew` is the full target set.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdateDeliverableCmd {
    pub organization_id: String,
    pub deliverable_id: Uuid,
    pub title: Option<String>,
    pub package_included: Option<bool>,
    pub cost: Option<String>,
    pub quantity: Option<i32>,
    pub due_on: Option<NaiveDate>,
    pub crew: Vec<Uuid>,
}

impl UpdateDeliverableCmd {
    #[must_use]
    pub fn new(organization_id: impl Into<String>, deliverable_id: Uuid) -> Self {
        Self {
            organization_id: organization_id.into(),
            deliverable_id,
            title: None,
            package_included: None,
            cost: None,
            quantity: None,
            due_on: None,
            crew: Vec::new(),
        }
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn package_included(mut self, included: bool) -> Self {
        self.package_included = Some(included);
        self
    }

    #[must_use]
    pub fn cost(mut self, cost: impl Into<String>) -> Self {
        self.cost = Some(cost.into());
        self
    }

    #[must_use]
    pub fn quantity(mut self, quantity: i32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    #[must_use]
    pub fn due_on(mut self, date: NaiveDate) -> Self {
        self.due_on = Some(date);
        self
    }

    #[must_use]
    pub fn crew(mut self, crew: Vec<Uuid>) -> Self {
        self.crew = crew;
        self
    }
}

/// Create a task on an existing booking, optionally attached to one of the
/// booking's deliverables.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewTaskCmd {
    pub organization_id: String,
    pub booking_id: Uuid,
    pub title: String,
    pub deliverable_id: Option<Uuid>,
    pub due_on: Option<NaiveDate>,
    pub crew: Vec<Uuid>,
}

impl NewTaskCmd {
    #[must_use]
    pub fn new(
        organization_id: impl Into<String>,
        booking_id: Uuid,
        title: impl Into<String>,
    ) -> Self {
        Self {
            organization_id: organization_id.into(),
            booking_id,
            title: title.into(),
            deliverable_id: None,
            due_on: None,
            crew: Vec::new(),
        }
    }

    #[must_use]
    pub fn deliverable_id(mut self, deliverable_id: Uuid) -> Self {
        self.deliverable_id = Some(deliverable_id);
        self
    }

    #[must_use]
    pub fn due_on(mut self, date: NaiveDate) -> Self {
        self.due_on = Some(date);
        self
    }

    #[must_use]
    pub fn crew(mut self, crew: Vec<Uuid>) -> Self {
        self.crew = crew;
        self
    }
}

/// Update a task; `crew` is the full target set.
///
/// `deliverable_id` re-attaches the task: the referenced deliverable must
/// belong to the same booking and organization.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdateTaskCmd {
    pub organization_id: String,
    pub task_id: Uuid,
    pub title: Option<String>,
    pub deliverable_id: Option<Uuid>,
    pub due_on: Option<NaiveDate>,
    pub completed: Option<bool>,
    pub crew: Vec<Uuid>,
}

impl UpdateTaskCmd {
    #[must_use]
    pub fn new(organization_id: impl Into<String>, task_id: Uuid) -> Self {
        Self {
            organization_id: organization_id.into(),
            task_id,
            title: None,
            deliverable_id: None,
            due_on: None,
            completed: None,
            crew: Vec::new(),
        }
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn deliverable_id(mut self, deliverable_id: Uuid) -> Self {
        self.deliverable_id = Some(deliverable_id);
        self
    }

    #[must_use]
    pub fn due_on(mut self, date: NaiveDate) -> Self {
        self.due_on = Some(date);
        self
    }

    #[must_use]
    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    #[must_use]
    pub fn crew(mut self, crew: Vec<Uuid>) -> Self {
        self.crew = crew;
        self
    }
}

/// Create an expense on an existing booking.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewExpenseCmd {
    pub organization_id: String,
    pub booking_id: Uuid,
    pub description: String,
    pub amount: String,
    pub spent_on: Option<NaiveDate>,
    pub crew: Vec<Uuid>,
}

impl NewExpenseCmd {
    #[must_use]
    pub fn new(
        organization_id: impl Into<String>,
        booking_id: Uuid,
        description: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            organization_id: organization_id.into(),
            booking_id,
            description: description.into(),
            amount: amount.into(),
            spent_on: None,
            crew: Vec::new(),
        }
    }

    #[must_use]
    pub fn spent_on(mut self, date: NaiveDate) -> Self {
        self.spent_on = Some(date);
        self
    }

    #[must_use]
    pub fn crew(mut self, crew: Vec<Uuid>) -> Self {
        self.crew = crew;
        self
    }
}

/// Update an expense; `crew` is the full target set.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdateExpenseCmd {
    pub organization_id: String,
    pub expense_id: Uuid,
    pub description: Option<String>,
    pub amount: Option<String>,
    pub spent_on: Option<NaiveDate>,
    pub crew: Vec<Uuid>,
}

impl UpdateExpenseCmd {
    #[must_use]
    pub fn new(organization_id: impl Into<String>, expense_id: Uuid) -> Self {
        Self {
            organization_id: organization_id.into(),
            expense_id,
            description: None,
            amount: None,
            spent_on: None,
            crew: Vec::new(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn amount(mut self, amount: impl Into<String>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    #[must_use]
    pub fn spent_on(mut self, date: NaiveDate) -> Self {
        self.spent_on = Some(date);
        self
    }

    #[must_use]
    pub fn crew(mut self, crew: Vec<Uuid>) -> Self {
        self.crew = crew;
        self
    }
}

/// Ids generated by a successful booking creation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreatedBooking {
    pub booking_id: Uuid,
    pub client_ids: Vec<Uuid>,
    pub participant_ids: Vec<Uuid>,
    pub shoot_ids: Vec<Uuid>,
    pub deliverable_ids: Vec<Uuid>,
    pub received_payment_ids: Vec<Uuid>,
    pub scheduled_payment_ids: Vec<Uuid>,
    pub assignment_ids: Vec<Uuid>,
}

/// Result of a create/update on an assignable entity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EntityReceipt {
    pub entity_id: Uuid,
    pub booking_id: Uuid,
    /// Assignment rows inserted by this operation (unchanged rows are not
    /// listed).
    pub assignment_ids: Vec<Uuid>,
}
