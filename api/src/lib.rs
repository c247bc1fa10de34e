//! Org directory service: domain records, the reporting core, service
//! operations, and the HTTP surface.

pub mod domain;
pub mod reporting;
pub mod routes;
pub mod seed;
pub mod service;
