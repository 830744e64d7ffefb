// Entity Models
// Immutable value records projected from the store, one per query row.

pub mod bank;
pub mod branch;

pub use bank::Bank;
pub use branch::Branch;
