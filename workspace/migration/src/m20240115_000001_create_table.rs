use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Username).unique_key())
                    .col(string(Users::PasswordHash))
                    .col(string_len(Users::Role, 20))
                    .to_owned(),
            )
            .await?;

        // Create divisions table
        manager
            .create_table(
                Table::create()
                    .table(Divisions::Table)
                    .if_not_exists()
                    .col(pk_auto(Divisions::Id))
                    .col(string(Divisions::Name).unique_key())
                    .col(string(Divisions::BnName))
                    .to_owned(),
            )
            .await?;

        // Create districts table
        manager
            .create_table(
                Table::create()
                    .table(Districts::Table)
                    .if_not_exists()
                    .col(pk_auto(Districts::Id))
                    .col(integer(Districts::DivisionId))
                    .col(string(Districts::Name))
                    .col(string(Districts::BnName))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_districts_division")
                            .from(Districts::Table, Districts::DivisionId)
                            .to(Divisions::Table, Divisions::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // District names repeat across divisions, never within one.
        manager
            .create_index(
                Index::create()
                    .name("idx_districts_division_name")
                    .table(Districts::Table)
                    .col(Districts::DivisionId)
                    .col(Districts::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create candidates table
        manager
            .create_table(
                Table::create()
                    .table(Candidates::Table)
                    .if_not_exists()
                    .col(pk_auto(Candidates::Id))
                    .col(integer(Candidates::UserId).unique_key())
                    .col(string(Candidates::Slug).unique_key())
                    .col(string(Candidates::FullNameEn).default(""))
                    .col(string(Candidates::FullNameBn).default(""))
                    .col(integer(Candidates::DivisionId))
                    .col(integer(Candidates::DistrictId))
                    .col(integer(Candidates::ConstituencyNo))
                    .col(string_null(Candidates::PhotoUrl))
                    .col(string_null(Candidates::Designation))
                    .col(text(Candidates::BriefIntro).default(""))
                    .col(text(Candidates::IntroBn).default(""))
                    .col(text(Candidates::PoliticalJourney).default(""))
                    .col(text(Candidates::PoliticalJourneyBn).default(""))
                    .col(text(Candidates::PersonalProfile).default(""))
                    .col(text(Candidates::PersonalProfileBn).default(""))
                    .col(text(Candidates::Vision).default(""))
                    .col(text(Candidates::VisionBn).default(""))
                    .col(string(Candidates::FacebookLink).default(""))
                    .col(string(Candidates::ResponsiblePerson).default(""))
                    .col(string(Candidates::Email).default(""))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_candidates_user")
                            .from(Candidates::Table, Candidates::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_candidates_division")
                            .from(Candidates::Table, Candidates::DivisionId)
                            .to(Divisions::Table, Divisions::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_candidates_district")
                            .from(Candidates::Table, Candidates::DistrictId)
                            .to(Districts::Table, Districts::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // The natural seat key: one profile per (district, constituency).
        manager
            .create_index(
                Index::create()
                    .name("idx_candidates_seat")
                    .table(Candidates::Table)
                    .col(Candidates::DistrictId)
                    .col(Candidates::ConstituencyNo)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create team_members table
        manager
            .create_table(
                Table::create()
                    .table(TeamMembers::Table)
                    .if_not_exists()
                    .col(pk_auto(TeamMembers::Id))
                    .col(integer_null(TeamMembers::CandidateId))
                    .col(string(TeamMembers::Name))
                    .col(string(TeamMembers::Role))
                    .col(string_null(TeamMembers::PhotoUrl))
                    .col(string_null(TeamMembers::FacebookLink))
                    .col(string_null(TeamMembers::LinkedinLink))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_members_candidate")
                            .from(TeamMembers::Table, TeamMembers::CandidateId)
                            .to(Candidates::Table, Candidates::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create media_gallery table
        manager
            .create_table(
                Table::create()
                    .table(MediaGallery::Table)
                    .if_not_exists()
                    .col(pk_auto(MediaGallery::Id))
                    .col(integer(MediaGallery::CandidateId))
                    .col(string(MediaGallery::FileUrl))
                    .col(string_len(MediaGallery::FileType, 10))
                    .col(timestamp(MediaGallery::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_media_gallery_candidate")
                            .from(MediaGallery::Table, MediaGallery::CandidateId)
                            .to(Candidates::Table, Candidates::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MediaGallery::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TeamMembers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Candidates::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Districts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Divisions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    PasswordHash,
    Role,
}

#[derive(DeriveIden)]
enum Divisions {
    Table,
    Id,
    Name,
    BnName,
}

#[derive(DeriveIden)]
enum Districts {
    Table,
    Id,
    DivisionId,
    Name,
    BnName,
}

#[derive(DeriveIden)]
enum Candidates {
    Table,
    Id,
    UserId,
    Slug,
    FullNameEn,
    FullNameBn,
    DivisionId,
    DistrictId,
    ConstituencyNo,
    PhotoUrl,
    Designation,
    BriefIntro,
    IntroBn,
    PoliticalJourney,
    PoliticalJourneyBn,
    PersonalProfile,
    PersonalProfileBn,
    Vision,
    VisionBn,
    FacebookLink,
    ResponsiblePerson,
    Email,
}

#[derive(DeriveIden)]
enum TeamMembers {
    Table,
    Id,
    CandidateId,
    Name,
    Role,
    PhotoUrl,
    FacebookLink,
    LinkedinLink,
}

#[derive(DeriveIden)]
enum MediaGallery {
    Table,
    Id,
    CandidateId,
    FileUrl,
    FileType,
    CreatedAt,
}
