use sea_orm::entity::prelude::*;

/// An administrative division. Static reference data loaded by the seed
/// command; never written by request handlers or the importer.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "divisions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    /// Bengali name, e.g. "ঢাকা" for "Dhaka".
    pub bn_name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::district::Entity")]
    District,
    #[sea_orm(has_many = "super::candidate::Entity")]
    Candidate,
}

impl Related<super::district::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::District.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
