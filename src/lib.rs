// Library for tests to access modules

pub mod collector;
pub mod config;
pub mod docker_repo;
pub mod metrics;
pub mod models;
pub mod name_store;
pub mod routes;
pub mod runtime;
pub mod sysinfo_repo;
pub mod version;
pub mod worker;
