// Library for tests to access modules

pub mod config;
pub mod disk;
pub mod models;
pub mod mounts_repo;
pub mod routes;
pub mod sink;
pub mod worker;
