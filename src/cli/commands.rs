pub mod import;
pub mod initdb;
pub mod seed;
pub mod serve;

pub use import::import_file;
pub use initdb::init_database;
pub use seed::seed_database;
pub use serve::serve;
