//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod forecast_record_repo;
pub mod location_repo;
pub mod weather_record_repo;

pub use forecast_record_repo::ForecastRecordRepo;
pub use location_repo::LocationRepo;
pub use weather_record_repo::WeatherRecordRepo;
