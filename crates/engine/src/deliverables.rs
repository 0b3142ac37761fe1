//! Deliverables: contracted outputs of a booking (albums, edits, prints).

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, util::parse_uuid};

/// A deliverable with the ids of its assigned crew.
///
/// `package_included` marks deliverables covered by the package price;
/// `cost` is the standalone price otherwise.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Deliverable {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub title: String,
    pub package_included: bool,
    pub cost: Money,
    pub quantity: i32,
    pub due_on: Option<Date>,
    pub created_at: DateTime<Utc>,
    pub crew: Vec<Uuid>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "deliverables")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub booking_id: String,
    pub organization_id: String,
    pub title: String,
    pub package_included: bool,
    pub cost_minor: i64,
    pub quantity: i32,
    pub due_on: Option<Date>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bookings::Entity",
        from = "Column::BookingId",
        to = "super::bookings::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Bookings,
    #[sea_orm(has_many = "super::tasks::Entity")]
    Tasks,
}

impl Related<super::bookings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl Related<super::tasks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tasks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Deliverable {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "deliverable")?,
            booking_id: parse_uuid(&model.booking_id, "booking")?,
            title: model.title,
            package_included: model.package_included,
            cost: Money::new(model.cost_minor),
            quantity: model.quantity,
            due_on: model.due_on,
            created_at: model.created_at,
            crew: Vec::new(),
        })
    }
}
