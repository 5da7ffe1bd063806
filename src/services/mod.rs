// Service exports
pub mod assistant;
pub mod cache;
pub mod memory;
pub mod otp;
pub mod postgres;
pub mod store;

pub use assistant::{AssistantClient, AssistantError};
pub use cache::ProfileCache;
pub use memory::MemoryUserStore;
pub use otp::{OtpClient, OtpError};
pub use postgres::PgUserStore;
pub use store::{StoreError, UserStore};
