use sea_orm::entity::prelude::*;

/// A team roster entry. `candidate_id` is NULL for the global platform
/// team shown on the main portal; otherwise the member belongs to one
/// candidate's microsite.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "team_members")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub candidate_id: Option<i32>,
    pub name: String,
    pub role: String,
    pub photo_url: Option<String>,
    pub facebook_link: Option<String>,
    pub linkedin_link: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::candidate::Entity",
        from = "Column::CandidateId",
        to = "super::candidate::Column::Id"
    )]
    Candidate,
}

impl Related<super::candidate::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Candidate.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
