pub mod health;
pub mod map;
pub mod ndvi;
pub mod zones;
