use super::teams;
use sea_orm::{entity::prelude::*, QueryOrder};
use uuid::Uuid;

pub mod constraints {
    pub const PK_USERS: &str = "PK_users";
    pub const FK_USERS_TEAM_ID: &str = "FK_users_team_id";
}

/// A team member. The id is chosen by the caller, not generated.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub team_id: Uuid,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Team,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::Team => Entity::belongs_to(teams::Entity)
                .from(Column::TeamId)
                .to(teams::Column::Id)
                .into(),
        }
    }
}

impl Related<teams::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Team.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Entity {
    /// Roster of a team, ordered by display name.
    #[inline]
    pub fn find_in_team(team_id: Uuid) -> Select<Entity> {
        Self::find()
            .filter(Column::TeamId.eq(team_id))
            .order_by_asc(Column::Name)
            .order_by_asc(Column::Id)
    }
}
