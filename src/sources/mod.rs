//! Data sources the view controller reads from.
//!
//! Each source owns its cached result and a loading flag. A fetch is split
//! in two: starting it yields the [`Request`](crate::api::Request) to send
//! (or nothing, when the cache already answers it), and `receive` applies
//! the outcome. `receive` always clears the loading flag, whatever the
//! result.

mod employees;
mod paginated;
mod transactions_by_employee;

pub(crate) use employees::EmployeeSource;
pub(crate) use paginated::{FetchedPage, PaginatedTransactionSource};
pub(crate) use transactions_by_employee::EmployeeTransactionSource;
