//! The `Booking` is the aggregate root: it owns participants, shoots,
//! deliverables, tasks, expenses and payments, and every mutation of a child
//! stamps the booking's `updated_at`.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{BookingStatus, EngineError, Money, util::name_key, util::parse_uuid};

/// A booking with its core fields.
///
/// Monetary values are exact minor units ([`Money`]); the display name is
/// unique per organization (case/width-insensitive via `name_norm`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub organization_id: String,
    pub name: String,
    pub booking_type: Option<String>,
    pub package_type: Option<String>,
    pub package_cost: Money,
    pub status: BookingStatus,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub(crate) fn new(
        organization_id: &str,
        name: String,
        package_cost: Money,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            organization_id: organization_id.to_string(),
            name,
            booking_type: None,
            package_type: None,
            package_cost,
            status: BookingStatus::New,
            note: None,
            created_at,
            updated_at: created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub organization_id: String,
    pub name: String,
    pub name_norm: String,
    pub booking_type: Option<String>,
    pub package_type: Option<String>,
    pub package_cost_minor: i64,
    pub status: String,
    pub note: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::participants::Entity")]
    Participants,
    #[sea_orm(has_many = "super::shoots::Entity")]
    Shoots,
    #[sea_orm(has_many = "super::deliverables::Entity")]
    Deliverables,
    #[sea_orm(has_many = "super::tasks::Entity")]
    Tasks,
    #[sea_orm(has_many = "super::expenses::Entity")]
    Expenses,
    #[sea_orm(has_many = "super::received_payments::Entity")]
    ReceivedPayments,
    #[sea_orm(has_many = "super::scheduled_payments::Entity")]
    ScheduledPayments,
    #[sea_orm(
        belongs_to = "super::organizations::Entity",
        from = "Column::OrganizationId",
        to = "super::organizations::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Organizations,
}

impl Related<super::organizations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organizations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Booking> for ActiveModel {
    fn from(booking: &Booking) -> Self {
        Self {
            id: ActiveValue::Set(booking.id.to_string()),
            organization_id: ActiveValue::Set(booking.organization_id.clone()),
            name: ActiveValue::Set(booking.name.clone()),
            name_norm: ActiveValue::Set(name_key(&booking.name)),
            booking_type: ActiveValue::Set(booking.booking_type.clone()),
            package_type: ActiveValue::Set(booking.package_type.clone()),
            package_cost_minor: ActiveValue::Set(booking.package_cost.minor()),
            status: ActiveValue::Set(booking.status.as_str().to_string()),
            note: ActiveValue::Set(booking.note.clone()),
            created_at: ActiveValue::Set(booking.created_at),
            updated_at: ActiveValue::Set(booking.updated_at),
        }
    }
}

impl TryFrom<Model> for Booking {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "booking")?,
            organization_id: model.organization_id,
            name: model.name,
            booking_type: model.booking_type,
            package_type: model.package_type,
            package_cost: Money::new(model.package_cost_minor),
            status: BookingStatus::try_from(model.status.as_str())?,
            note: model.note,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
