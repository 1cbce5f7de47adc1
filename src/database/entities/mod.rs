pub mod transactions;

pub use transactions::Entity as Transactions;

// Type aliases
pub type Transaction = transactions::Model;
