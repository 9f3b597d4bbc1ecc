//! Request layer between the view and the mock backend.
//!
//! The view never talks to storage directly: it issues [`Request`]s, a
//! [`Backend`] answers them, and the [`worker`] moves that work off the UI
//! thread.

mod cache;
mod mock;
pub(crate) mod worker;

pub(crate) use cache::CachedBackend;
pub(crate) use mock::{MockBackend, DEFAULT_PAGE_SIZE};

use thiserror::Error;

use crate::models::{Employee, PaginatedResponse, Transaction};

/// Outcome of a failed request. Every fetch resolves to either a response or one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum FetchError {
    #[error("{0}")]
    InvalidRequest(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("request worker is no longer running")]
    WorkerGone,
    #[error("unexpected response from {0}")]
    UnexpectedResponse(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Endpoint {
    Employees,
    PaginatedTransactions,
    TransactionsByEmployee,
    SetTransactionApproval,
}

impl Endpoint {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Employees => "employees",
            Self::PaginatedTransactions => "paginatedTransactions",
            Self::TransactionsByEmployee => "transactionsByEmployee",
            Self::SetTransactionApproval => "setTransactionApproval",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Request {
    Employees,
    /// `page: None` is rejected by the backend.
    PaginatedTransactions { page: Option<u32> },
    TransactionsByEmployee { employee_id: String },
    SetTransactionApproval { transaction_id: String, value: bool },
}

impl Request {
    pub(crate) fn endpoint(&self) -> Endpoint {
        match self {
            Self::Employees => Endpoint::Employees,
            Self::PaginatedTransactions { .. } => Endpoint::PaginatedTransactions,
            Self::TransactionsByEmployee { .. } => Endpoint::TransactionsByEmployee,
            Self::SetTransactionApproval { .. } => Endpoint::SetTransactionApproval,
        }
    }

    /// Reads are cacheable; writes always reach the backend.
    pub(crate) fn is_read(&self) -> bool {
        !matches!(self, Self::SetTransactionApproval { .. })
    }

    /// Endpoint plus parameters, e.g. `paginatedTransactions{"page":2}`.
    pub(crate) fn cache_key(&self) -> String {
        let params = match self {
            Self::Employees => String::new(),
            Self::PaginatedTransactions { page: Some(p) } => format!("{{\"page\":{p}}}"),
            Self::PaginatedTransactions { page: None } => "{\"page\":null}".into(),
            Self::TransactionsByEmployee { employee_id } => {
                format!("{{\"employeeId\":\"{employee_id}\"}}")
            }
            Self::SetTransactionApproval {
                transaction_id,
                value,
            } => format!("{{\"transactionId\":\"{transaction_id}\",\"value\":{value}}}"),
        };
        format!("{}{params}", self.endpoint())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Response {
    Employees(Vec<Employee>),
    TransactionsPage(PaginatedResponse<Vec<Transaction>>),
    Transactions(Vec<Transaction>),
    ApprovalSet { transaction_id: String, value: bool },
}

pub(crate) trait Backend {
    fn call(&mut self, request: &Request) -> Result<Response, FetchError>;

    /// Drop any memoized responses. Backends without a cache ignore this.
    fn clear_cache(&mut self) {}
}

#[cfg(test)]
mod tests;
