pub mod repository;
pub mod table;
