use anyhow::{Context, Result};
use model::entities::prelude::{Division, User};
use model::entities::{district, division, user};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};
use std::collections::HashMap;
use tracing::{debug, info, trace, warn};

/// The eight divisions, keyed by the ordinal used in the district table
/// below. Immutable reference data.
const DIVISIONS: &[(u8, &str, &str)] = &[
    (1, "Dhaka", "ঢাকা"),
    (2, "Chattogram", "চট্টগ্রাম"),
    (3, "Sylhet", "সিলেট"),
    (4, "Khulna", "খুলনা"),
    (5, "Barishal", "বরিশাল"),
    (6, "Rajshahi", "রাজশাহী"),
    (7, "Rangpur", "রংপুর"),
    (8, "Mymensingh", "ময়মনসিংহ"),
];

/// All 64 districts as `(division ordinal, name, bn_name)`.
const DISTRICTS: &[(u8, &str, &str)] = &[
    (1, "Dhaka", "ঢাকা"),
    (1, "Gazipur", "গাজীপুর"),
    (1, "Manikganj", "মানিকগঞ্জ"),
    (1, "Munshiganj", "মুন্সীগঞ্জ"),
    (1, "Narayanganj", "নারায়ণগঞ্জ"),
    (1, "Narsingdi", "নরসিংদী"),
    (1, "Faridpur", "ফরিদপুর"),
    (1, "Gopalganj", "গোপালগঞ্জ"),
    (1, "Madaripur", "মাদারীপুর"),
    (1, "Rajbari", "রাজবাড়ী"),
    (1, "Shariatpur", "শরীয়তপুর"),
    (1, "Kishoreganj", "কিশোরগঞ্জ"),
    (1, "Tangail", "টাঙ্গাইল"),
    (8, "Mymensingh", "ময়মনসিংহ"),
    (8, "Jamalpur", "জামালপুর"),
    (8, "Netrokona", "নেত্রকোণা"),
    (8, "Sherpur", "শেরপুর"),
    (2, "Chattogram", "চট্টগ্রাম"),
    (2, "Cox's Bazar", "কক্সবাজার"),
    (2, "Rangamati", "রাঙ্গামাটি"),
    (2, "Bandarban", "বান্দরবান"),
    (2, "Khagrachari", "খাগড়াছড়ি"),
    (2, "Noakhali", "নোয়াখালী"),
    (2, "Feni", "ফেনী"),
    (2, "Lakshmipur", "লক্ষ্মীপুর"),
    (2, "Cumilla", "কুমিল্লা"),
    (2, "Chandpur", "চাঁদপুর"),
    (2, "Brahmanbaria", "ব্রাহ্মণবাড়িয়া"),
    (3, "Sylhet", "সিলেট"),
    (3, "Moulivibazar", "মৌলভীবাজার"),
    (3, "Habiganj", "হবিগঞ্জ"),
    (3, "Sunamganj", "সুনামগঞ্জ"),
    (4, "Khulna", "খুলনা"),
    (4, "Bagerhat", "বাগেরহাট"),
    (4, "Satkhira", "সাতক্ষীরা"),
    (4, "Jashore", "যশোর"),
    (4, "Magura", "মাগুরা"),
    (4, "Narail", "নড়াইল"),
    (4, "Kushtia", "কুষ্টিয়া"),
    (4, "Jhenaidah", "ঝিনাইদহ"),
    (4, "Chuadanga", "চুয়াডাঙ্গা"),
    (4, "Meherpur", "মেহেরপুর"),
    (5, "Barishal", "বরিশাল"),
    (5, "Bhola", "ভোলা"),
    (5, "Patuakhali", "পটুয়াখালী"),
    (5, "Pirojpur", "পিরোজপুর"),
    (5, "Jhalokati", "ঝালকাঠি"),
    (5, "Barguna", "বরগুনা"),
    (6, "Rajshahi", "রাজশাহী"),
    (6, "Chapainawabganj", "চাঁপাইনবাবগঞ্জ"),
    (6, "Naogaon", "নওগাঁ"),
    (6, "Natore", "নাটোর"),
    (6, "Pabna", "পাবনা"),
    (6, "Sirajganj", "সিরাজগঞ্জ"),
    (6, "Bogura", "বগুড়া"),
    (6, "Joypurhat", "জয়পুরহাট"),
    (7, "Rangpur", "রংপুর"),
    (7, "Gaibandha", "গাইবান্ধা"),
    (7, "Kurigram", "কুড়িগ্রাম"),
    (7, "Nilphamari", "নীলফামারী"),
    (7, "Lalmonirhat", "লালমনিরহাট"),
    (7, "Dinajpur", "দিনাজপুর"),
    (7, "Thakurgaon", "ঠাকুরগাঁও"),
    (7, "Panchagarh", "পঞ্চগড়"),
];

/// Load the division/district reference set. Does nothing when divisions
/// are already present, so callers may re-run it freely.
pub async fn seed_reference_data<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    trace!("Entering seed_reference_data function");

    let existing = Division::find().count(db).await?;
    if existing > 0 {
        debug!("Reference data already seeded ({} divisions); skipping", existing);
        return Ok(());
    }

    info!("Seeding {} divisions", DIVISIONS.len());
    let mut division_ids: HashMap<u8, i32> = HashMap::new();
    for (ordinal, name, bn_name) in DIVISIONS {
        let inserted = division::ActiveModel {
            name: Set((*name).to_string()),
            bn_name: Set((*bn_name).to_string()),
            ..Default::default()
        }
        .insert(db)
        .await?;
        division_ids.insert(*ordinal, inserted.id);
    }

    info!("Seeding {} districts", DISTRICTS.len());
    let districts = DISTRICTS.iter().map(|(ordinal, name, bn_name)| {
        district::ActiveModel {
            division_id: Set(division_ids[ordinal]),
            name: Set((*name).to_string()),
            bn_name: Set((*bn_name).to_string()),
            ..Default::default()
        }
    });
    district::Entity::insert_many(districts).exec(db).await?;

    info!("Reference data seeded");
    Ok(())
}

/// Ensure the admin account exists. The initial password comes from
/// `SEED_ADMIN_PASSWORD`; there is no built-in default.
async fn ensure_admin_account<C: ConnectionTrait>(db: &C) -> Result<()> {
    let existing = User::find()
        .filter(user::Column::Username.eq("admin"))
        .one(db)
        .await?;
    if let Some(admin) = existing {
        debug!("Admin account already exists (id {})", admin.id);
        return Ok(());
    }

    let password = std::env::var("SEED_ADMIN_PASSWORD")
        .context("SEED_ADMIN_PASSWORD must be set to create the admin account")?;
    let password_hash = crate::auth::hash_password(&password)
        .map_err(|e| anyhow::anyhow!("Password hashing failed: {}", e))?;

    let admin = user::ActiveModel {
        username: Set("admin".to_string()),
        password_hash: Set(password_hash),
        role: Set(user::Role::Admin),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!("Admin account created (id {})", admin.id);
    Ok(())
}

pub async fn seed_database(database_url: &str) -> Result<()> {
    trace!("Entering seed_database function");
    info!("Seeding database");
    debug!("Database URL: {}", database_url);

    dotenvy::dotenv().ok();
    let db = Database::connect(database_url)
        .await
        .context("Failed to connect to database")?;

    seed_reference_data(&db).await?;

    if let Err(e) = ensure_admin_account(&db).await {
        // Reference data is still useful without the admin account; make
        // the failure loud but recoverable by re-running seed.
        warn!("Admin account not created: {}", e);
        return Err(e);
    }

    info!("Database seeding completed successfully!");
    Ok(())
}
