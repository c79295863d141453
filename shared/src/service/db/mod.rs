pub mod user_db_service;

pub use user_db_service::UserDbService;
