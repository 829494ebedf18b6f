pub mod dreams;
pub mod health;
pub mod streak;
pub mod week;
