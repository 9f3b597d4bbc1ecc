use crate::api::{FetchError, Request, Response};
use crate::models::{PaginatedResponse, Transaction};

/// A page handed back to the controller, which decides how to merge it.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FetchedPage {
    pub(crate) page: u32,
    pub(crate) transactions: Vec<Transaction>,
}

#[derive(Debug, Default)]
pub(crate) struct PaginatedTransactionSource {
    data: Option<PaginatedResponse<Vec<Transaction>>>,
    loading: bool,
    requested_page: Option<u32>,
}

impl PaginatedTransactionSource {
    pub(crate) fn data(&self) -> Option<&PaginatedResponse<Vec<Transaction>>> {
        self.data.as_ref()
    }

    pub(crate) fn loading(&self) -> bool {
        self.loading
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.data.as_ref().is_some_and(|d| d.is_exhausted())
    }

    /// Request the page after the last one received, or the first page when
    /// nothing is cached. Returns `None` once the cursor is exhausted.
    pub(crate) fn fetch_all(&mut self) -> Option<Request> {
        let page = match &self.data {
            None => 0,
            Some(previous) => previous.next_page?,
        };
        self.loading = true;
        self.requested_page = Some(page);
        Some(Request::PaginatedTransactions { page: Some(page) })
    }

    pub(crate) fn receive(
        &mut self,
        result: Result<Response, FetchError>,
    ) -> Result<FetchedPage, FetchError> {
        self.loading = false;
        let page = self.requested_page.take().unwrap_or(0);
        match result? {
            Response::TransactionsPage(response) => {
                let transactions = response.data.clone();
                self.data = Some(response);
                Ok(FetchedPage { page, transactions })
            }
            _ => Err(FetchError::UnexpectedResponse("paginatedTransactions")),
        }
    }

    pub(crate) fn abandon(&mut self) {
        self.loading = false;
        self.requested_page = None;
    }

    /// Drop the cached page and cursor; the next fetch starts from page 0.
    pub(crate) fn invalidate_data(&mut self) {
        self.data = None;
        self.loading = false;
        self.requested_page = None;
    }
}
