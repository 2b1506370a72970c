pub mod appointment;
pub mod health;
pub mod patient;
pub mod slots;
