use std::collections::HashSet;

use crate::api::{FetchError, Request, Response};
use crate::models::{Employee, Transaction};
use crate::sources::{
    EmployeeSource, EmployeeTransactionSource, FetchedPage, PaginatedTransactionSource,
};
use crate::ui::util::ListCursor;
use crate::ui::widgets::select::{InputSelect, SelectItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Select,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Select => write!(f, "FILTER"),
        }
    }
}

/// Which source the displayed list currently mirrors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ViewMode {
    All,
    Employee(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoadOp {
    All,
    ByEmployee,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoadStep {
    Employees,
    TransactionsPage,
    TransactionsByEmployee,
}

/// Identifies what a request was for when its answer comes back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Ticket {
    Load { generation: u64, step: LoadStep },
    Approval { transaction_id: String, value: bool },
}

/// Work for the runtime to hand to the fetch worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Outbound {
    Fetch(Ticket, Request),
    ClearCache,
}

fn parse_employee(employee: &Employee) -> SelectItem {
    SelectItem {
        value: employee.id.clone(),
        label: employee.full_name(),
    }
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,

    // Data sources
    pub(crate) employees: EmployeeSource,
    pub(crate) paginated: PaginatedTransactionSource,
    pub(crate) by_employee: EmployeeTransactionSource,

    // Derived view state
    pub(crate) transactions: Option<Vec<Transaction>>,
    pub(crate) is_loading: bool,
    pub(crate) is_loading_dropdown: bool,
    pub(crate) mode: ViewMode,
    pub(crate) last_error: Option<FetchError>,

    // Widgets
    pub(crate) employee_select: InputSelect<Employee>,
    pub(crate) cursor: ListCursor,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,

    generation: u64,
    in_flight: Option<LoadOp>,
    pending_employee: Option<String>,
    pending_approvals: HashSet<String>,
    mounted: bool,
    outbox: Vec<Outbound>,
}

impl App {
    pub(crate) fn new() -> Self {
        Self {
            running: true,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,

            employees: EmployeeSource::default(),
            paginated: PaginatedTransactionSource::default(),
            by_employee: EmployeeTransactionSource::default(),

            transactions: None,
            is_loading: false,
            is_loading_dropdown: false,
            mode: ViewMode::All,
            last_error: None,

            employee_select: InputSelect::new(
                "Filter by employee",
                "Loading employees",
                Employee::empty(),
                parse_employee,
            ),
            cursor: ListCursor::default(),

            visible_rows: 20,

            generation: 0,
            in_flight: None,
            pending_employee: None,
            pending_approvals: HashSet::new(),
            mounted: false,
            outbox: Vec::new(),
        }
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    /// Drain requests queued since the last call.
    pub(crate) fn take_outbound(&mut self) -> Vec<Outbound> {
        std::mem::take(&mut self.outbox)
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn in_flight(&self) -> Option<LoadOp> {
        self.in_flight
    }

    /// "View more" is offered whenever a list is shown and nothing is loading.
    pub(crate) fn can_view_more(&self) -> bool {
        self.transactions.is_some() && !self.is_loading
    }

    // ── Operations ────────────────────────────────────────────

    /// First-frame hook: loads everything once if no employees are cached yet.
    pub(crate) fn on_mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        if self.employees.data().is_none() && !self.employees.loading() {
            self.load_all_transactions();
        }
    }

    pub(crate) fn load_all_transactions(&mut self) {
        let generation = self.begin(LoadOp::All);
        self.is_loading = true;
        self.is_loading_dropdown = true;
        self.employee_select.set_loading(true);
        self.by_employee.invalidate_data();

        match self.employees.fetch_all() {
            Some(request) => self.send(generation, LoadStep::Employees, request),
            None => {
                self.dropdown_ready();
                self.fetch_next_page(generation);
            }
        }
    }

    pub(crate) fn load_transactions_by_employee(&mut self, employee_id: &str) {
        let generation = self.begin(LoadOp::ByEmployee);
        self.is_loading = true;
        self.paginated.invalidate_data();
        let request = self.by_employee.fetch_by_id(employee_id);
        self.send(generation, LoadStep::TransactionsByEmployee, request);
    }

    /// Dropdown change handler. The sentinel employee means "show everyone".
    pub(crate) fn select_employee(&mut self, employee: Option<Employee>) {
        let Some(employee) = employee else {
            return;
        };
        if employee.is_empty() {
            self.load_all_transactions();
        } else {
            self.set_status(format!("Showing transactions for {employee}"));
            self.load_transactions_by_employee(&employee.id);
        }
    }

    pub(crate) fn view_more(&mut self) {
        if !self.can_view_more() {
            return;
        }
        self.load_all_transactions();
    }

    /// Forget every cached result and start over from the first page.
    pub(crate) fn reload(&mut self) {
        self.employees.invalidate_data();
        self.paginated.invalidate_data();
        self.by_employee.invalidate_data();
        self.transactions = None;
        self.mode = ViewMode::All;
        self.employee_select.reset();
        self.outbox.push(Outbound::ClearCache);
        self.set_status("Reloading");
        self.load_all_transactions();
    }

    /// Flip approval on the transaction under the cursor.
    pub(crate) fn toggle_selected_approval(&mut self) {
        let Some(txn) = self.selected_transaction() else {
            return;
        };
        let transaction_id = txn.id.clone();
        let value = !txn.approved;
        if self.pending_approvals.contains(&transaction_id) {
            self.set_status(format!("Approval for {transaction_id} is still pending"));
            return;
        }
        self.pending_approvals.insert(transaction_id.clone());
        tracing::info!(%transaction_id, value, "setting approval");
        self.outbox.push(Outbound::Fetch(
            Ticket::Approval {
                transaction_id: transaction_id.clone(),
                value,
            },
            Request::SetTransactionApproval {
                transaction_id,
                value,
            },
        ));
    }

    // ── Results ───────────────────────────────────────────────

    pub(crate) fn handle_delivery(&mut self, ticket: Ticket, result: Result<Response, FetchError>) {
        match ticket {
            Ticket::Approval {
                transaction_id,
                value,
            } => self.apply_approval(&transaction_id, value, result),
            Ticket::Load { generation, step } => {
                if generation != self.generation || self.in_flight.is_none() {
                    tracing::debug!(generation, current = self.generation, ?step, "dropping stale result");
                    return;
                }
                match step {
                    LoadStep::Employees => match self.employees.receive(result) {
                        Ok(list) => {
                            tracing::debug!(count = list.len(), "employees loaded");
                            self.dropdown_ready();
                            self.fetch_next_page(generation);
                        }
                        Err(e) => self.fail(e),
                    },
                    LoadStep::TransactionsPage => match self.paginated.receive(result) {
                        Ok(page) => {
                            self.apply_page(page);
                            self.finish();
                        }
                        Err(e) => self.fail(e),
                    },
                    LoadStep::TransactionsByEmployee => match self.by_employee.receive(result) {
                        Ok(list) => {
                            if let Some(employee_id) = self.pending_employee.take() {
                                self.mode = ViewMode::Employee(employee_id);
                            }
                            self.transactions = Some(list);
                            self.cursor.top();
                            self.finish();
                        }
                        Err(e) => self.fail(e),
                    },
                }
            }
        }
    }

    /// The fetch worker is gone: nothing in flight will ever be answered.
    pub(crate) fn worker_lost(&mut self, error: FetchError) {
        self.pending_approvals.clear();
        if self.in_flight.is_some() {
            self.fail(error);
        } else if self.last_error.as_ref() != Some(&error) {
            self.set_status(format!("Fetch failed: {error}"));
            self.last_error = Some(error);
        }
    }

    // ── Cursor ────────────────────────────────────────────────

    pub(crate) fn transaction_count(&self) -> usize {
        self.transactions.as_ref().map_or(0, Vec::len)
    }

    pub(crate) fn selected_transaction(&self) -> Option<&Transaction> {
        self.transactions
            .as_ref()
            .and_then(|list| list.get(self.cursor.index))
    }

    pub(crate) fn move_down(&mut self) {
        self.cursor.down(self.transaction_count(), self.visible_rows);
    }

    pub(crate) fn move_up(&mut self) {
        self.cursor.up();
    }

    pub(crate) fn goto_top(&mut self) {
        self.cursor.top();
    }

    pub(crate) fn goto_bottom(&mut self) {
        self.cursor.bottom(self.transaction_count(), self.visible_rows);
    }

    // ── Internals ─────────────────────────────────────────────

    /// Start a new load operation, superseding any that is still running.
    fn begin(&mut self, op: LoadOp) -> u64 {
        if let Some(previous) = self.in_flight.take() {
            tracing::debug!(?previous, next = ?op, "superseding in-flight load");
            self.employees.abandon();
            self.paginated.abandon();
            self.by_employee.abandon();
        }
        self.generation += 1;
        self.in_flight = Some(op);
        self.last_error = None;
        tracing::info!(generation = self.generation, ?op, "load started");
        self.generation
    }

    fn send(&mut self, generation: u64, step: LoadStep, request: Request) {
        if let Request::TransactionsByEmployee { employee_id } = &request {
            self.pending_employee = Some(employee_id.clone());
        }
        self.outbox
            .push(Outbound::Fetch(Ticket::Load { generation, step }, request));
    }

    fn fetch_next_page(&mut self, generation: u64) {
        match self.paginated.fetch_all() {
            Some(request) => self.send(generation, LoadStep::TransactionsPage, request),
            None => {
                self.set_status("All transactions loaded");
                self.finish();
            }
        }
    }

    fn dropdown_ready(&mut self) {
        self.is_loading_dropdown = false;
        self.employee_select.set_loading(false);
        let items = match self.employees.data() {
            Some(list) => std::iter::once(Employee::empty())
                .chain(list.iter().cloned())
                .collect(),
            None => Vec::new(),
        };
        self.employee_select.set_items(items);
    }

    /// Page 0 starts a fresh all-mode list; later pages extend it.
    fn apply_page(&mut self, page: FetchedPage) {
        if self.mode != ViewMode::All {
            self.employee_select.reset();
        }
        let fresh = page.page == 0 || self.mode != ViewMode::All;
        match self.transactions.as_mut() {
            Some(list) if !fresh => list.extend(page.transactions),
            _ => {
                self.transactions = Some(page.transactions);
                self.cursor.top();
            }
        }
        self.mode = ViewMode::All;
    }

    fn apply_approval(
        &mut self,
        transaction_id: &str,
        value: bool,
        result: Result<Response, FetchError>,
    ) {
        self.pending_approvals.remove(transaction_id);
        let result = result.and_then(|response| match response {
            Response::ApprovalSet {
                transaction_id,
                value,
            } => Ok((transaction_id, value)),
            _ => Err(FetchError::UnexpectedResponse("setTransactionApproval")),
        });
        match result {
            Ok((updated_id, updated_value)) => {
                if let Some(txn) = self
                    .transactions
                    .as_mut()
                    .and_then(|list| list.iter_mut().find(|t| t.id == updated_id))
                {
                    txn.approved = updated_value;
                }
                let verb = if updated_value { "Approved" } else { "Unapproved" };
                self.set_status(format!("{verb} {updated_id}"));
            }
            Err(e) => {
                tracing::error!(%transaction_id, value, error = %e, "approval update failed");
                self.set_status(format!("Approval failed: {e}"));
                self.last_error = Some(e);
            }
        }
    }

    /// Release every loading flag. Runs on success, no-op and failure alike.
    fn finish(&mut self) {
        if let Some(op) = self.in_flight.take() {
            tracing::info!(generation = self.generation, ?op, "load finished");
        }
        self.is_loading = false;
        self.is_loading_dropdown = false;
        self.employee_select.set_loading(false);
        self.pending_employee = None;
    }

    fn fail(&mut self, error: FetchError) {
        tracing::error!(generation = self.generation, error = %error, "load failed");
        self.finish();
        self.set_status(format!("Fetch failed: {error}"));
        self.last_error = Some(error);
    }
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
