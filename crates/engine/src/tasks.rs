//! Tasks: work items on a booking, optionally attached to a deliverable.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

/// A task with the ids of its assigned crew.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub deliverable_id: Option<Uuid>,
    pub title: String,
    pub due_on: Option<Date>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub crew: Vec<Uuid>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub booking_id: String,
    pub organization_id: String,
    pub deliverable_id: Option<String>,
    pub title: String,
    pub due_on: Option<Date>,
    pub completed: bool,
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
    #[sea_orm(
        belongs_to = "super::deliverables::Entity",
        from = "Column::DeliverableId",
        to = "super::deliverables::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Deliverables,
}

impl Related<super::bookings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl Related<super::deliverables::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Deliverables.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Task {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "task")?,
            booking_id: parse_uuid(&model.booking_id, "booking")?,
            deliverable_id: model
                .deliverable_id
                .as_deref()
                .map(|id| parse_uuid(id, "deliverable"))
                .transpose()?,
            title: model.title,
            due_on: model.due_on,
            completed: model.completed,
            created_at: model.created_at,
            crew: Vec::new(),
        })
    }
}
