use std::time::Duration;

use super::{Backend, FetchError, Request, Response};
use crate::db::Database;
use crate::models::PaginatedResponse;

pub(crate) const DEFAULT_PAGE_SIZE: u32 = 5;

/// In-process stand-in for the transactions API, served from the local database.
pub(crate) struct MockBackend {
    db: Database,
    page_size: u32,
    latency: Duration,
}

impl MockBackend {
    pub(crate) fn new(db: Database, page_size: u32, latency: Duration) -> Self {
        Self {
            db,
            page_size: page_size.max(1),
            latency,
        }
    }

    fn employees(&self) -> Result<Response, FetchError> {
        let employees = self.db.get_employees().map_err(storage)?;
        Ok(Response::Employees(employees))
    }

    fn paginated_transactions(&self, page: Option<u32>) -> Result<Response, FetchError> {
        let Some(page) = page else {
            return Err(FetchError::InvalidRequest("Page cannot be null".into()));
        };

        let total = self.db.get_transaction_count().map_err(storage)?.max(0) as u64;
        let start = u64::from(page) * u64::from(self.page_size);
        if start > total {
            return Err(FetchError::InvalidRequest("Invalid page".into()));
        }
        let end = start + u64::from(self.page_size);

        let offset = u32::try_from(start)
            .map_err(|_| FetchError::InvalidRequest("Invalid page".into()))?;
        let data = self
            .db
            .get_transactions(Some(self.page_size), Some(offset), None)
            .map_err(storage)?;

        Ok(Response::TransactionsPage(PaginatedResponse {
            data,
            next_page: if end < total { Some(page + 1) } else { None },
        }))
    }

    fn transactions_by_employee(&self, employee_id: &str) -> Result<Response, FetchError> {
        if employee_id.is_empty() {
            return Err(FetchError::InvalidRequest(
                "Employee id cannot be empty".into(),
            ));
        }
        let txns = self
            .db
            .get_transactions(None, None, Some(employee_id))
            .map_err(storage)?;
        Ok(Response::Transactions(txns))
    }

    fn set_transaction_approval(
        &self,
        transaction_id: &str,
        value: bool,
    ) -> Result<Response, FetchError> {
        let existing = self
            .db
            .get_transaction_by_id(transaction_id)
            .map_err(storage)?;
        if existing.is_none() {
            return Err(FetchError::InvalidRequest(
                "Invalid transaction to update".into(),
            ));
        }
        self.db
            .set_transaction_approval(transaction_id, value)
            .map_err(storage)?;
        Ok(Response::ApprovalSet {
            transaction_id: transaction_id.to_string(),
            value,
        })
    }
}

impl Backend for MockBackend {
    fn call(&mut self, request: &Request) -> Result<Response, FetchError> {
        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }
        tracing::debug!(endpoint = %request.endpoint(), "mock backend request");

        match request {
            Request::Employees => self.employees(),
            Request::PaginatedTransactions { page } => self.paginated_transactions(*page),
            Request::TransactionsByEmployee { employee_id } => {
                self.transactions_by_employee(employee_id)
            }
            Request::SetTransactionApproval {
                transaction_id,
                value,
            } => self.set_transaction_approval(transaction_id, *value),
        }
    }
}

fn storage(e: anyhow::Error) -> FetchError {
    FetchError::Storage(format!("{e:#}"))
}
