pub mod examples;
pub mod flatten;
pub mod init;
pub mod uninit;
