//! Bulk spreadsheet import of candidate profiles.
//!
//! The first worksheet of an uploaded workbook is converted to row maps
//! keyed by header text, then each row is validated, resolved against the
//! division/district reference set and upserted as an account + profile
//! pair. Rows reconcile on the seat key `(district_id, constituency_no)`;
//! the derived username follows the seat whenever it is relabeled.
//!
//! The whole pass runs inside one database transaction. Row-level problems
//! (missing fields, bad numbers, unknown reference names) are recorded in a
//! skip ledger and never abort the batch; any other error rolls the entire
//! batch back.

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use model::entities::prelude::{Candidate, District, Division, User};
use model::entities::{candidate, district, division, user};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, instrument};
use utoipa::ToSchema;

/// One parsed data row: cell text keyed by (trimmed) header text.
pub type SheetRow = HashMap<String, String>;

const COL_DIVISION: &str = "Division";
const COL_DISTRICT: &str = "District";
const COL_CONSTITUENCY_NO: &str = "Constituency_No";

/// Accepted header spellings for one optional column, tried in order.
/// The Bengali headers in circulating sheets are not spelled consistently,
/// so every observed variant is listed against its canonical field.
struct ColumnVariants(&'static [&'static str]);

impl ColumnVariants {
    fn read(&self, row: &SheetRow) -> String {
        self.0
            .iter()
            .filter_map(|header| row.get(*header))
            .map(|value| value.trim())
            .find(|value| !value.is_empty())
            .unwrap_or_default()
            .to_string()
    }
}

const FULL_NAME_EN: ColumnVariants = ColumnVariants(&["Candidate_Name_En", "Candidate_Name_EN"]);
const FULL_NAME_BN: ColumnVariants = ColumnVariants(&["প্রার্থির_নাম", "প্রার্থীর_নাম"]);
const BRIEF_INTRO: ColumnVariants = ColumnVariants(&["Brief_Intro"]);
const INTRO_BN: ColumnVariants = ColumnVariants(&["প্রারম্ভ", "প্রারম্ভিক"]);
const POLITICAL_JOURNEY: ColumnVariants = ColumnVariants(&["Political_Journey"]);
const POLITICAL_JOURNEY_BN: ColumnVariants =
    ColumnVariants(&["রাজনৈতিক_যাত্রা", "রাজনৈতিক_জীবন"]);
const PERSONAL_PROFILE: ColumnVariants = ColumnVariants(&["Personal_Profile"]);
const PERSONAL_PROFILE_BN: ColumnVariants =
    ColumnVariants(&["ব্যাক্তিগত_জীবন", "ব্যক্তিগত_জীবন"]);
const VISION: ColumnVariants = ColumnVariants(&["Vision"]);
const VISION_BN: ColumnVariants = ColumnVariants(&["এলাকা_নিয়ে_তার_স্বপ্ন", "এলাকা_নিয়ে_স্বপ্ন"]);
const FACEBOOK_LINK: ColumnVariants = ColumnVariants(&["Facebook_Link"]);
const RESPONSIBLE_PERSON: ColumnVariants = ColumnVariants(&["Responsible_Person"]);
const EMAIL: ColumnVariants = ColumnVariants(&["Email"]);

/// Optional biography columns of one row, trimmed, empty when absent.
/// Extraction never fails a row.
#[derive(Debug, Default)]
struct ProfileFields {
    full_name_en: String,
    full_name_bn: String,
    brief_intro: String,
    intro_bn: String,
    political_journey: String,
    political_journey_bn: String,
    personal_profile: String,
    personal_profile_bn: String,
    vision: String,
    vision_bn: String,
    facebook_link: String,
    responsible_person: String,
    email: String,
}

impl ProfileFields {
    fn from_row(row: &SheetRow) -> Self {
        Self {
            full_name_en: FULL_NAME_EN.read(row),
            full_name_bn: FULL_NAME_BN.read(row),
            brief_intro: BRIEF_INTRO.read(row),
            intro_bn: INTRO_BN.read(row),
            political_journey: POLITICAL_JOURNEY.read(row),
            political_journey_bn: POLITICAL_JOURNEY_BN.read(row),
            personal_profile: PERSONAL_PROFILE.read(row),
            personal_profile_bn: PERSONAL_PROFILE_BN.read(row),
            vision: VISION.read(row),
            vision_bn: VISION_BN.read(row),
            facebook_link: FACEBOOK_LINK.read(row),
            responsible_person: RESPONSIBLE_PERSON.read(row),
            email: EMAIL.read(row),
        }
    }
}

/// One skipped row in the ledger, with the 1-based spreadsheet row number
/// (the header is row 1, so the first data row reports as 2).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SkippedRow {
    pub row: usize,
    pub error: String,
}

/// Aggregate outcome of one import pass.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub total_rows: usize,
    pub success: usize,
    pub skipped: usize,
    pub skipped_details: Vec<SkippedRow>,
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read workbook: {0}")]
    Workbook(#[from] calamine::XlsxError),
    #[error("workbook contains no sheets")]
    NoSheet,
    #[error("password hashing failed: {0}")]
    Hash(#[from] argon2::password_hash::Error),
    #[error("database error: {0}")]
    Db(#[from] DbErr),
}

enum RowOutcome {
    Imported,
    Skipped(String),
}

/// Derive the account username for a seat: the district name with all
/// whitespace removed, followed by the constituency number. The profile
/// slug is the lowercase of this.
pub fn derive_username(district_name: &str, constituency_no: i32) -> String {
    let stripped: String = district_name
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    format!("{stripped}{constituency_no}")
}

/// Parse the first worksheet of an xlsx workbook into ordered row maps.
/// The first row is the header; empty cells become empty strings.
pub fn parse_workbook(bytes: &[u8]) -> Result<Vec<SheetRow>, ImportError> {
    let mut workbook = Xlsx::new(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ImportError::NoSheet)??;

    let mut cell_rows = range.rows();
    let headers: Vec<String> = match cell_rows.next() {
        Some(cells) => cells
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect(),
        None => return Ok(Vec::new()),
    };

    let mut rows = Vec::new();
    for cells in cell_rows {
        let mut row = SheetRow::new();
        for (header, cell) in headers.iter().zip(cells.iter()) {
            if header.is_empty() {
                continue;
            }
            let value = match cell {
                Data::Empty => String::new(),
                other => other.to_string(),
            };
            row.insert(header.clone(), value);
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Run one import pass over parsed rows.
///
/// All writes happen inside a single transaction that commits only when the
/// whole pass completes; any database error aborts and rolls back every
/// write of the batch. `default_password` is the injected initial password
/// for accounts the pass creates.
#[instrument(skip(db, rows, default_password), fields(row_count = rows.len()))]
pub async fn import_candidates(
    db: &DatabaseConnection,
    rows: Vec<SheetRow>,
    default_password: &str,
) -> Result<ImportSummary, ImportError> {
    info!("Starting candidate import of {} rows", rows.len());

    // One hash serves every account this batch creates.
    let password_hash = crate::auth::hash_password(default_password)?;

    let txn = db.begin().await?;

    let mut summary = ImportSummary {
        total_rows: rows.len(),
        success: 0,
        skipped: 0,
        skipped_details: Vec::new(),
    };

    for (idx, row) in rows.iter().enumerate() {
        let row_no = idx + 2;
        match import_row(&txn, row, &password_hash).await? {
            RowOutcome::Imported => summary.success += 1,
            RowOutcome::Skipped(reason) => {
                debug!("Row {} skipped: {}", row_no, reason);
                summary.skipped += 1;
                summary.skipped_details.push(SkippedRow {
                    row: row_no,
                    error: reason,
                });
            }
        }
    }

    txn.commit().await?;
    info!(
        "Import finished: {} imported, {} skipped of {} rows",
        summary.success, summary.skipped, summary.total_rows
    );
    Ok(summary)
}

fn mandatory(row: &SheetRow, key: &str) -> Option<String> {
    row.get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

async fn import_row(
    txn: &DatabaseTransaction,
    row: &SheetRow,
    password_hash: &str,
) -> Result<RowOutcome, DbErr> {
    let seat_columns = (
        mandatory(row, COL_DIVISION),
        mandatory(row, COL_DISTRICT),
        mandatory(row, COL_CONSTITUENCY_NO),
    );
    let (Some(division_name), Some(district_name), Some(constituency_raw)) = seat_columns else {
        return Ok(RowOutcome::Skipped(
            "missing mandatory fields (Division, District, Constituency_No)".to_string(),
        ));
    };

    let Ok(constituency_no) = constituency_raw.parse::<i32>() else {
        return Ok(RowOutcome::Skipped(format!(
            "Constituency_No '{}' must be a number",
            constituency_raw
        )));
    };

    let fields = ProfileFields::from_row(row);

    let Some(division) = Division::find()
        .filter(division::Column::Name.eq(division_name.as_str()))
        .one(txn)
        .await?
    else {
        return Ok(RowOutcome::Skipped(format!(
            "unknown division '{}'",
            division_name
        )));
    };

    // District names repeat across divisions; the lookup is scoped by the
    // resolved division rather than guessing among same-named districts.
    let Some(district) = District::find()
        .filter(district::Column::DivisionId.eq(division.id))
        .filter(district::Column::Name.eq(district_name.as_str()))
        .one(txn)
        .await?
    else {
        return Ok(RowOutcome::Skipped(format!(
            "unknown district '{}' in division '{}'",
            district_name, division_name
        )));
    };

    let username = derive_username(&district.name, constituency_no);
    let slug = username.to_lowercase();

    // Reconcile on the seat, not on the surrogate account id.
    let existing = Candidate::find()
        .filter(candidate::Column::DistrictId.eq(district.id))
        .filter(candidate::Column::ConstituencyNo.eq(constituency_no))
        .one(txn)
        .await?;

    match existing {
        None => {
            // Inconsistent data can leave an account around without a seat
            // record; reuse it rather than colliding on the username.
            let account = match User::find()
                .filter(user::Column::Username.eq(username.as_str()))
                .one(txn)
                .await?
            {
                Some(account) => account,
                None => {
                    user::ActiveModel {
                        username: Set(username.clone()),
                        password_hash: Set(password_hash.to_string()),
                        role: Set(user::Role::Candidate),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?
                }
            };

            candidate::ActiveModel {
                user_id: Set(account.id),
                slug: Set(slug),
                full_name_en: Set(fields.full_name_en),
                full_name_bn: Set(fields.full_name_bn),
                division_id: Set(division.id),
                district_id: Set(district.id),
                constituency_no: Set(constituency_no),
                photo_url: Set(None),
                designation: Set(None),
                brief_intro: Set(fields.brief_intro),
                intro_bn: Set(fields.intro_bn),
                political_journey: Set(fields.political_journey),
                political_journey_bn: Set(fields.political_journey_bn),
                personal_profile: Set(fields.personal_profile),
                personal_profile_bn: Set(fields.personal_profile_bn),
                vision: Set(fields.vision),
                vision_bn: Set(fields.vision_bn),
                facebook_link: Set(fields.facebook_link),
                responsible_person: Set(fields.responsible_person),
                email: Set(fields.email),
                ..Default::default()
            }
            .insert(txn)
            .await?;
        }
        Some(profile) => {
            let account_id = profile.user_id;

            let mut active = profile.into_active_model();
            active.slug = Set(slug);
            active.full_name_en = Set(fields.full_name_en);
            active.full_name_bn = Set(fields.full_name_bn);
            active.division_id = Set(division.id);
            active.district_id = Set(district.id);
            active.constituency_no = Set(constituency_no);
            active.brief_intro = Set(fields.brief_intro);
            active.intro_bn = Set(fields.intro_bn);
            active.political_journey = Set(fields.political_journey);
            active.political_journey_bn = Set(fields.political_journey_bn);
            active.personal_profile = Set(fields.personal_profile);
            active.personal_profile_bn = Set(fields.personal_profile_bn);
            active.vision = Set(fields.vision);
            active.vision_bn = Set(fields.vision_bn);
            active.facebook_link = Set(fields.facebook_link);
            active.responsible_person = Set(fields.responsible_person);
            active.email = Set(fields.email);
            active.update(txn).await?;

            // The seat owns the login: keep the account username in sync
            // when the seat's label changed since the profile was written.
            let Some(account) = User::find_by_id(account_id).one(txn).await? else {
                return Err(DbErr::RecordNotFound(format!(
                    "account {} owning seat {}-{} is missing",
                    account_id, district.name, constituency_no
                )));
            };
            if account.username != username {
                let mut account = account.into_active_model();
                account.username = Set(username);
                account.update(txn).await?;
            }
        }
    }

    Ok(RowOutcome::Imported)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_utils::setup_test_db;
    use sea_orm::{DatabaseConnection, PaginatorTrait};

    fn sheet_row(cells: &[(&str, &str)]) -> SheetRow {
        cells
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn dhaka5_row(vision: &str) -> SheetRow {
        sheet_row(&[
            ("Division", "Dhaka"),
            ("District", "Dhaka"),
            ("Constituency_No", "5"),
            ("Candidate_Name_En", "Rahim Uddin"),
            ("প্রার্থির_নাম", "রহিম উদ্দিন"),
            ("Vision", vision),
            ("Email", "dhaka5@example.org"),
        ])
    }

    async fn user_count(db: &DatabaseConnection) -> u64 {
        User::find().count(db).await.unwrap()
    }

    async fn candidate_count(db: &DatabaseConnection) -> u64 {
        Candidate::find().count(db).await.unwrap()
    }

    #[test]
    fn derives_username_and_slug() {
        let username = derive_username("Dhaka", 5);
        assert_eq!(username, "Dhaka5");
        assert_eq!(username.to_lowercase(), "dhaka5");

        // Whitespace inside a district name is stripped, not replaced.
        assert_eq!(derive_username("Cox's Bazar", 3), "Cox'sBazar3");
    }

    #[test]
    fn optional_headers_accept_variant_spellings() {
        let row = sheet_row(&[
            ("ব্যক্তিগত_জীবন", "বিকল্প বানান"),
            ("এলাকা_নিয়ে_স্বপ্ন", "উন্নত এলাকা"),
        ]);
        let fields = ProfileFields::from_row(&row);
        assert_eq!(fields.personal_profile_bn, "বিকল্প বানান");
        assert_eq!(fields.vision_bn, "উন্নত এলাকা");
        // Absent columns default to empty strings.
        assert_eq!(fields.brief_intro, "");
    }

    #[tokio::test]
    async fn skips_rows_missing_mandatory_fields() {
        let db = setup_test_db().await;

        let rows = vec![
            sheet_row(&[("District", "Dhaka"), ("Constituency_No", "5")]),
            sheet_row(&[("Division", "Dhaka"), ("Constituency_No", "5")]),
            sheet_row(&[("Division", "Dhaka"), ("District", "Dhaka")]),
            sheet_row(&[
                ("Division", "  "),
                ("District", "Dhaka"),
                ("Constituency_No", "5"),
            ]),
        ];

        let summary = import_candidates(&db, rows, "Initial#1").await.unwrap();
        assert_eq!(summary.total_rows, 4);
        assert_eq!(summary.success, 0);
        assert_eq!(summary.skipped, 4);
        assert_eq!(
            summary
                .skipped_details
                .iter()
                .map(|s| s.row)
                .collect::<Vec<_>>(),
            vec![2, 3, 4, 5]
        );
        for detail in &summary.skipped_details {
            assert!(detail.error.contains("missing mandatory fields"));
        }

        assert_eq!(user_count(&db).await, 0);
        assert_eq!(candidate_count(&db).await, 0);
    }

    #[tokio::test]
    async fn skips_non_numeric_constituency() {
        let db = setup_test_db().await;

        let rows = vec![sheet_row(&[
            ("Division", "Dhaka"),
            ("District", "Dhaka"),
            ("Constituency_No", "abc"),
        ])];

        let summary = import_candidates(&db, rows, "Initial#1").await.unwrap();
        assert_eq!(summary.success, 0);
        assert_eq!(summary.skipped, 1);
        assert!(summary.skipped_details[0].error.contains("must be a number"));
        assert_eq!(candidate_count(&db).await, 0);
    }

    #[tokio::test]
    async fn skips_unknown_division_and_district() {
        let db = setup_test_db().await;

        let rows = vec![
            sheet_row(&[
                ("Division", "Atlantis"),
                ("District", "Dhaka"),
                ("Constituency_No", "1"),
            ]),
            sheet_row(&[
                ("Division", "Dhaka"),
                ("District", "Narnia"),
                ("Constituency_No", "1"),
            ]),
        ];

        let summary = import_candidates(&db, rows, "Initial#1").await.unwrap();
        assert_eq!(summary.success, 0);
        assert_eq!(summary.skipped, 2);
        assert!(summary.skipped_details[0].error.contains("Atlantis"));
        assert!(summary.skipped_details[1].error.contains("Narnia"));
        assert_eq!(candidate_count(&db).await, 0);
    }

    #[tokio::test]
    async fn district_lookup_is_scoped_by_division() {
        let db = setup_test_db().await;

        // Mymensingh is a district of the Mymensingh division, not Dhaka;
        // the scoped lookup must not pick it through the wrong division.
        let rows = vec![sheet_row(&[
            ("Division", "Dhaka"),
            ("District", "Mymensingh"),
            ("Constituency_No", "1"),
        ])];

        let summary = import_candidates(&db, rows, "Initial#1").await.unwrap();
        assert_eq!(summary.success, 0);
        assert_eq!(summary.skipped, 1);
        assert!(summary.skipped_details[0]
            .error
            .contains("unknown district 'Mymensingh' in division 'Dhaka'"));
    }

    #[tokio::test]
    async fn three_row_batch_creates_updates_and_skips() {
        let db = setup_test_db().await;

        let rows = vec![
            dhaka5_row("Old vision"),
            sheet_row(&[
                ("Division", ""),
                ("District", "Dhaka"),
                ("Constituency_No", "9"),
            ]),
            dhaka5_row("New vision"),
        ];

        let summary = import_candidates(&db, rows, "Initial#1").await.unwrap();
        assert_eq!(summary.total_rows, 3);
        assert_eq!(summary.success, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.skipped_details[0].row, 3);

        // Row 4 updated the seat row 2 created: one account, one profile.
        assert_eq!(user_count(&db).await, 1);
        assert_eq!(candidate_count(&db).await, 1);

        let profile = Candidate::find().one(&db).await.unwrap().unwrap();
        assert_eq!(profile.slug, "dhaka5");
        assert_eq!(profile.vision, "New vision");
        assert_eq!(profile.full_name_en, "Rahim Uddin");

        let account = User::find().one(&db).await.unwrap().unwrap();
        assert_eq!(account.username, "Dhaka5");
        assert_eq!(account.role, user::Role::Candidate);
    }

    #[tokio::test]
    async fn reimport_is_idempotent() {
        let db = setup_test_db().await;

        let rows = vec![
            dhaka5_row("Vision A"),
            sheet_row(&[
                ("Division", "Dhaka"),
                ("District", "Gazipur"),
                ("Constituency_No", "2"),
                ("Candidate_Name_En", "Karim Mia"),
            ]),
        ];

        let first = import_candidates(&db, rows.clone(), "Initial#1")
            .await
            .unwrap();
        let second = import_candidates(&db, rows, "Initial#1").await.unwrap();

        assert_eq!(first.success, 2);
        assert_eq!(second.success, first.success);
        assert_eq!(second.skipped, 0);

        // Second pass was all updates: no duplicate accounts or profiles.
        assert_eq!(user_count(&db).await, 2);
        assert_eq!(candidate_count(&db).await, 2);
    }

    #[tokio::test]
    async fn seat_relabel_keeps_account_username_in_sync() {
        let db = setup_test_db().await;

        // A profile written under an older district spelling: the account
        // username no longer matches what the current reference data
        // derives for the seat.
        let district_model = District::find()
            .filter(district::Column::Name.eq("Chattogram"))
            .one(&db)
            .await
            .unwrap()
            .unwrap();

        let stale_account = user::ActiveModel {
            username: Set("Chittagong4".to_string()),
            password_hash: Set("$argon2id$stub".to_string()),
            role: Set(user::Role::Candidate),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        candidate::ActiveModel {
            user_id: Set(stale_account.id),
            slug: Set("chittagong4".to_string()),
            full_name_en: Set("Noor Alam".to_string()),
            full_name_bn: Set(String::new()),
            division_id: Set(district_model.division_id),
            district_id: Set(district_model.id),
            constituency_no: Set(4),
            photo_url: Set(None),
            designation: Set(None),
            brief_intro: Set(String::new()),
            intro_bn: Set(String::new()),
            political_journey: Set(String::new()),
            political_journey_bn: Set(String::new()),
            personal_profile: Set(String::new()),
            personal_profile_bn: Set(String::new()),
            vision: Set(String::new()),
            vision_bn: Set(String::new()),
            facebook_link: Set(String::new()),
            responsible_person: Set(String::new()),
            email: Set(String::new()),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        let rows = vec![sheet_row(&[
            ("Division", "Chattogram"),
            ("District", "Chattogram"),
            ("Constituency_No", "4"),
            ("Candidate_Name_En", "Noor Alam"),
        ])];

        let summary = import_candidates(&db, rows, "Initial#1").await.unwrap();
        assert_eq!(summary.success, 1);

        let account = User::find_by_id(stale_account.id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(account.username, "Chattogram4");

        let profile = Candidate::find().one(&db).await.unwrap().unwrap();
        assert_eq!(profile.slug, "chattogram4");
        assert_eq!(profile.user_id, stale_account.id);
        assert_eq!(user_count(&db).await, 1);
    }

    #[tokio::test]
    async fn reuses_orphaned_account_matching_derived_username() {
        let db = setup_test_db().await;

        // An account exists with the seat's derived username but no
        // profile row; the importer must adopt it, not collide.
        let orphan = user::ActiveModel {
            username: Set("Dhaka5".to_string()),
            password_hash: Set("$argon2id$stub".to_string()),
            role: Set(user::Role::Candidate),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        let summary = import_candidates(&db, vec![dhaka5_row("Vision")], "Initial#1")
            .await
            .unwrap();
        assert_eq!(summary.success, 1);
        assert_eq!(user_count(&db).await, 1);

        let profile = Candidate::find().one(&db).await.unwrap().unwrap();
        assert_eq!(profile.user_id, orphan.id);
    }

    #[tokio::test]
    async fn fatal_error_rolls_back_whole_batch() {
        let db = setup_test_db().await;

        // A pre-existing profile already holds the slug the third row will
        // derive, on a different seat. Inserting that row violates the
        // unique slug constraint, which is not a row-level condition.
        let squatter = user::ActiveModel {
            username: Set("Squatter".to_string()),
            password_hash: Set("$argon2id$stub".to_string()),
            role: Set(user::Role::Candidate),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        let gazipur = District::find()
            .filter(district::Column::Name.eq("Gazipur"))
            .one(&db)
            .await
            .unwrap()
            .unwrap();

        candidate::ActiveModel {
            user_id: Set(squatter.id),
            slug: Set("dhaka5".to_string()),
            full_name_en: Set(String::new()),
            full_name_bn: Set(String::new()),
            division_id: Set(gazipur.division_id),
            district_id: Set(gazipur.id),
            constituency_no: Set(1),
            photo_url: Set(None),
            designation: Set(None),
            brief_intro: Set(String::new()),
            intro_bn: Set(String::new()),
            political_journey: Set(String::new()),
            political_journey_bn: Set(String::new()),
            personal_profile: Set(String::new()),
            personal_profile_bn: Set(String::new()),
            vision: Set(String::new()),
            vision_bn: Set(String::new()),
            facebook_link: Set(String::new()),
            responsible_person: Set(String::new()),
            email: Set(String::new()),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        let rows = vec![
            sheet_row(&[
                ("Division", "Dhaka"),
                ("District", "Gazipur"),
                ("Constituency_No", "3"),
            ]),
            sheet_row(&[
                ("Division", "Dhaka"),
                ("District", "Gazipur"),
                ("Constituency_No", "4"),
            ]),
            dhaka5_row("Vision"),
        ];

        let result = import_candidates(&db, rows, "Initial#1").await;
        assert!(matches!(result, Err(ImportError::Db(_))));

        // The two successful rows rolled back with the batch: only the
        // fixture account and profile remain.
        assert_eq!(user_count(&db).await, 1);
        assert_eq!(candidate_count(&db).await, 1);
    }
}
