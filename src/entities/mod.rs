//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod allocation;
pub mod category;
pub mod paycheck;
pub mod profile;
pub mod transaction;

// Re-export specific types to avoid conflicts
pub use allocation::{Column as AllocationColumn, Entity as Allocation, Model as AllocationModel};
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use paycheck::{
    Column as PaycheckColumn, Entity as Paycheck, Frequency, Model as PaycheckModel,
};
pub use profile::{Column as ProfileColumn, Entity as Profile, Model as ProfileModel};
pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel,
};
