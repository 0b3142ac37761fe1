//! Crew assignment join tables.
//!
//! Four structurally identical tables link crew members to shoots,
//! deliverables, tasks and expenses. Each row is unique on
//! `(entity_id, crew_id)` and carries its own `assigned_at` stamp, which the
//! reconciliation diff deliberately preserves for unchanged members.
//!
//! One macro generates the entity module and the [`AssignmentTable`]
//! accessor per kind, so the reconciliation engine is written exactly once.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter,
};
use uuid::Uuid;

use crate::{ResultEngine, util::parse_uuid};

/// Storage accessor for one of the four assignment tables.
///
/// The reconciliation engine is generic over this trait; the four
/// implementations are generated together with their entity modules below.
pub(crate) trait AssignmentTable {
    /// Entity kind label, used for tracing.
    const KIND: &'static str;

    /// Crew ids currently linked to `entity_id`.
    async fn crew_ids(db: &DatabaseTransaction, entity_id: Uuid) -> ResultEngine<Vec<Uuid>>;

    /// Delete the links between `entity_id` and every crew id in `crew_ids`.
    async fn remove(
        db: &DatabaseTransaction,
        entity_id: Uuid,
        crew_ids: &[Uuid],
    ) -> ResultEngine<()>;

    /// Insert one link and return the new assignment id.
    async fn insert(
        db: &DatabaseTransaction,
        organization_id: &str,
        entity_id: Uuid,
        crew_id: Uuid,
        assigned_at: DateTime<Utc>,
    ) -> ResultEngine<Uuid>;

    /// `(entity_id, crew_id)` pairs for the given entity ids.
    async fn for_entities(
        db: &DatabaseTransaction,
        entity_ids: &[String],
    ) -> ResultEngine<Vec<(String, Uuid)>>;
}

/// Generates an assignment entity module plus its `AssignmentTable` adapter.
macro_rules! assignment_table {
    ($module:ident, $adapter:ident, $table:literal, $kind:literal) => {
        pub mod $module {
            use sea_orm::entity::prelude::*;

            #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
            #[sea_orm(table_name = $table)]
            pub struct Model {
                #[sea_orm(primary_key, auto_increment = false)]
                pub id: String,
                pub entity_id: String,
                pub crew_id: String,
                pub organization_id: String,
                pub is_lead: bool,
                pub assigned_at: DateTimeUtc,
            }

            #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
            pub enum Relation {
                #[sea_orm(
                    belongs_to = "crate::crew::Entity",
                    from = "Column::CrewId",
                    to = "crate::crew::Column::Id",
                    on_update = "NoAction",
                    on_delete = "Cascade"
                )]
                Crew,
            }

            impl Related<crate::crew::Entity> for Entity {
                fn to() -> RelationDef {
                    Relation::Crew.def()
                }
            }

            impl ActiveModelBehavior for ActiveModel {}
        }

        pub(crate) struct $adapter;

        impl AssignmentTable for $adapter {
            const KIND: &'static str = $kind;

            async fn crew_ids(
                db: &DatabaseTransaction,
                entity_id: Uuid,
            ) -> ResultEngine<Vec<Uuid>> {
                let rows = $module::Entity::find()
                    .filter($module::Column::EntityId.eq(entity_id.to_string()))
                    .all(db)
                    .await?;
                rows.iter()
                    .map(|model| parse_uuid(&model.crew_id, "crew"))
                    .collect()
            }

            async fn remove(
                db: &DatabaseTransaction,
                entity_id: Uuid,
                crew_ids: &[Uuid],
            ) -> ResultEngine<()> {
                if crew_ids.is_empty() {
                    return Ok(());
                }
                let ids: Vec<String> = crew_ids.iter().map(ToString::to_string).collect();
                $module::Entity::delete_many()
                    .filter($module::Column::EntityId.eq(entity_id.to_string()))
                    .filter($module::Column::CrewId.is_in(ids))
                    .exec(db)
                    .await?;
                Ok(())
            }

            async fn insert(
                db: &DatabaseTransaction,
                organization_id: &str,
                entity_id: Uuid,
                crew_id: Uuid,
                assigned_at: DateTime<Utc>,
            ) -> ResultEngine<Uuid> {
                let id = Uuid::new_v4();
                let active = $module::ActiveModel {
                    id: ActiveValue::Set(id.to_string()),
                    entity_id: ActiveValue::Set(entity_id.to_string()),
                    crew_id: ActiveValue::Set(crew_id.to_string()),
                    organization_id: ActiveValue::Set(organization_id.to_string()),
                    is_lead: ActiveValue::Set(false),
                    assigned_at: ActiveValue::Set(assigned_at),
                };
                active.insert(db).await?;
                Ok(id)
            }

            async fn for_entities(
                db: &DatabaseTransaction,
                entity_ids: &[String],
            ) -> ResultEngine<Vec<(String, Uuid)>> {
                if entity_ids.is_empty() {
                    return Ok(Vec::new());
                }
                let rows = $module::Entity::find()
                    .filter($module::Column::EntityId.is_in(entity_ids.to_vec()))
                    .all(db)
                    .await?;
                rows.into_iter()
                    .map(|model| {
                        let crew_id = parse_uuid(&model.crew_id, "crew")?;
                        Ok((model.entity_id, crew_id))
                    })
                    .collect()
            }
        }
    };
}

assignment_table!(
    shoot_assignments,
    ShootAssignments,
    "shoot_assignments",
    "shoot"
);
assignment_table!(
    deliverable_assignments,
    DeliverableAssignments,
    "deliverable_assignments",
    "deliverable"
);
assignment_table!(task_assignments, TaskAssignments, "task_assignments", "task");
assignment_table!(
    expense_assignments,
    ExpenseAssignments,
    "expense_assignments",
    "expense"
);
