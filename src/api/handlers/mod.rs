pub mod health;
pub mod mission;
pub mod verification;
