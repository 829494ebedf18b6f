pub mod dream;
pub mod goal;
pub mod instance;
pub mod template;
pub mod week;
