pub mod login;
pub mod otp;
pub mod password;
pub mod recovery;
pub mod token;
