pub mod convert;
pub mod dashboard;
pub mod params;
pub mod providers;
pub mod setup;
pub mod tokens;
pub mod ui;
pub mod verify;
