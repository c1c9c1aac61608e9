//! Public read/write operations.

mod dao;
mod service;

pub use dao::EzDao;
pub use service::EzService;
