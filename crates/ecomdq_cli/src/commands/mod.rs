pub mod check;
pub mod init;
pub mod stages;
pub mod validate;
