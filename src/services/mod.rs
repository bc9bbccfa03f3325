pub mod acquisition;
pub mod ndvi_api;
pub mod source;
pub mod statistics;
pub mod synthetic;
pub mod zones;
