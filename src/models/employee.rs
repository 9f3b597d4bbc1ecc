#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
}

impl Employee {
    pub fn new(id: String, first_name: String, last_name: String) -> Self {
        Self {
            id,
            first_name,
            last_name,
        }
    }

    /// The "no filter" option shown at the top of the employee dropdown.
    pub fn empty() -> Self {
        Self {
            id: String::new(),
            first_name: "All".into(),
            last_name: "Employees".into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Find an employee whose full name contains `query` (case-insensitive).
    pub fn find_by_name<'a>(employees: &'a [Employee], query: &str) -> Option<&'a Employee> {
        let lower = query.trim().to_lowercase();
        if lower.is_empty() {
            return None;
        }
        employees
            .iter()
            .find(|e| e.full_name().to_lowercase().contains(&lower))
    }
}

impl std::fmt::Display for Employee {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}
