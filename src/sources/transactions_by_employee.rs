use crate::api::{FetchError, Request, Response};
use crate::models::Transaction;

#[derive(Debug, Default)]
pub(crate) struct EmployeeTransactionSource {
    data: Option<Vec<Transaction>>,
    loading: bool,
}

impl EmployeeTransactionSource {
    pub(crate) fn data(&self) -> Option<&[Transaction]> {
        self.data.as_deref()
    }

    pub(crate) fn loading(&self) -> bool {
        self.loading
    }

    pub(crate) fn fetch_by_id(&mut self, employee_id: &str) -> Request {
        self.loading = true;
        Request::TransactionsByEmployee {
            employee_id: employee_id.to_string(),
        }
    }

    /// Replaces whatever was cached before.
    pub(crate) fn receive(
        &mut self,
        result: Result<Response, FetchError>,
    ) -> Result<Vec<Transaction>, FetchError> {
        self.loading = false;
        match result? {
            Response::Transactions(list) => {
                self.data = Some(list.clone());
                Ok(list)
            }
            _ => Err(FetchError::UnexpectedResponse("transactionsByEmployee")),
        }
    }

    pub(crate) fn abandon(&mut self) {
        self.loading = false;
    }

    pub(crate) fn invalidate_data(&mut self) {
        self.data = None;
        self.loading = false;
    }
}
