pub mod handler;
pub mod kpi;
pub mod layout;
pub mod model;
pub mod query;
pub mod repository;
pub mod service;
