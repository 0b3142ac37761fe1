//! Shoots: scheduled sessions belonging to a booking.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

/// A shoot with the ids of its assigned crew.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Shoot {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub title: String,
    pub location: Option<String>,
    pub scheduled_on: Option<Date>,
    pub created_at: DateTime<Utc>,
    pub crew: Vec<Uuid>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "shoots")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub booking_id: String,
    pub organization_id: String,
    pub title: String,
    pub location: Option<String>,
    pub scheduled_on: Option<Date>,
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
}

impl Related<super::bookings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Shoot {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "shoot")?,
            booking_id: parse_uuid(&model.booking_id, "booking")?,
            title: model.title,
            location: model.location,
            scheduled_on: model.scheduled_on,
            created_at: model.created_at,
            crew: Vec::new(),
        })
    }
}
