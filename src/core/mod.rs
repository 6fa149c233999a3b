pub mod agent;
pub mod mail;
pub mod providers;
pub mod summary;
pub mod tools;
