pub mod health;
pub mod recovery;
pub mod session;
