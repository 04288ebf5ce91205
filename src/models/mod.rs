mod aggregate;
mod category;
mod month;
mod transaction;

pub use aggregate::{AggregateRow, CategoryTotal};
pub use category::Category;
pub use month::YearMonth;
pub use transaction::{NewTransaction, Transaction, TransactionType};
