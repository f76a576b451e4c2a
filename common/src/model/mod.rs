pub mod excel;
pub mod habit;
pub mod notification;
pub mod record;
pub mod user;
