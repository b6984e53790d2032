pub mod inventory;
pub mod score;
pub mod status;
pub mod validate;
