pub mod dashboard;
pub mod grouping;
pub mod openweather;
