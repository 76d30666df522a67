pub mod uploads;
pub mod urls;
