use crate::api::{FetchError, Request, Response};
use crate::models::Employee;

#[derive(Debug, Default)]
pub(crate) struct EmployeeSource {
    data: Option<Vec<Employee>>,
    loading: bool,
}

impl EmployeeSource {
    pub(crate) fn data(&self) -> Option<&[Employee]> {
        self.data.as_deref()
    }

    pub(crate) fn loading(&self) -> bool {
        self.loading
    }

    /// Returns `None` when employees are already loaded; the list is fetched once.
    pub(crate) fn fetch_all(&mut self) -> Option<Request> {
        if self.data.is_some() {
            return None;
        }
        self.loading = true;
        Some(Request::Employees)
    }

    pub(crate) fn receive(
        &mut self,
        result: Result<Response, FetchError>,
    ) -> Result<&[Employee], FetchError> {
        self.loading = false;
        match result? {
            Response::Employees(list) => Ok(self.data.insert(list).as_slice()),
            _ => Err(FetchError::UnexpectedResponse("employees")),
        }
    }

    /// Forget an in-flight fetch whose answer will be ignored.
    pub(crate) fn abandon(&mut self) {
        self.loading = false;
    }

    pub(crate) fn invalidate_data(&mut self) {
        self.data = None;
        self.loading = false;
    }
}
