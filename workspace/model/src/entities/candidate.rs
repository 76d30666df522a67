use super::{district, division, user};
use sea_orm::entity::prelude::*;

/// A candidate's public profile. The natural key for reconciliation is the
/// seat `(district_id, constituency_no)`, not the owning account: the
/// district/constituency pair identifies a real-world electoral seat, and
/// the account username is kept in sync with it when a seat is relabeled.
///
/// Long-form biography fields come in English/Bengali pairs and default to
/// the empty string when a data source does not provide them.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "candidates")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub user_id: i32,
    /// Lowercased username, e.g. "dhaka5". Addresses the microsite.
    #[sea_orm(unique)]
    pub slug: String,
    pub full_name_en: String,
    pub full_name_bn: String,
    pub division_id: i32,
    pub district_id: i32,
    pub constituency_no: i32,
    pub photo_url: Option<String>,
    pub designation: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub brief_intro: String,
    #[sea_orm(column_type = "Text")]
    pub intro_bn: String,
    #[sea_orm(column_type = "Text")]
    pub political_journey: String,
    #[sea_orm(column_type = "Text")]
    pub political_journey_bn: String,
    #[sea_orm(column_type = "Text")]
    pub personal_profile: String,
    #[sea_orm(column_type = "Text")]
    pub personal_profile_bn: String,
    #[sea_orm(column_type = "Text")]
    pub vision: String,
    #[sea_orm(column_type = "Text")]
    pub vision_bn: String,
    pub facebook_link: String,
    pub responsible_person: String,
    pub email: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::division::Entity",
        from = "Column::DivisionId",
        to = "super::division::Column::Id"
    )]
    Division,
    #[sea_orm(
        belongs_to = "super::district::Entity",
        from = "Column::DistrictId",
        to = "super::district::Column::Id"
    )]
    District,
    #[sea_orm(has_many = "super::team_member::Entity")]
    TeamMember,
    #[sea_orm(has_many = "super::media_item::Entity")]
    MediaItem,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<division::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Division.def()
    }
}

impl Related<district::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::District.def()
    }
}

impl Related<super::team_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeamMember.def()
    }
}

impl Related<super::media_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MediaItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
