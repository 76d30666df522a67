use sea_orm::entity::prelude::*;

/// Access role of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum Role {
    /// Platform operator: manages every candidate, imports, global team.
    #[sea_orm(string_value = "admin")]
    Admin,
    /// A candidate managing their own microsite.
    #[sea_orm(string_value = "candidate")]
    Candidate,
}

/// A login account. Candidate accounts are created either through
/// registration or by the bulk importer; usernames are derived from the
/// seat (`districtName` without whitespace + constituency number).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    // A candidate account owns exactly one profile.
    #[sea_orm(has_one = "super::candidate::Entity")]
    Candidate,
}

impl Related<super::candidate::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Candidate.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
