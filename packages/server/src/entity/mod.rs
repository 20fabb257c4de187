pub mod photo;
pub mod terrain;
pub mod user;
