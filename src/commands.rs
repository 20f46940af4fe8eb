pub mod ip;
pub mod list;
pub mod update;
