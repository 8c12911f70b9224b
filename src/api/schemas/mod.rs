pub mod callable;
pub mod feedback;
pub mod health;
