mod employee;
mod paginated;
mod transaction;

pub use employee::Employee;
pub use paginated::PaginatedResponse;
pub use transaction::Transaction;

#[cfg(test)]
mod tests;
