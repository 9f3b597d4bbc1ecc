use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::Employee;

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub amount: Decimal,
    pub employee: Employee,
    pub merchant: String,
    pub date: NaiveDate,
    pub approved: bool,
}

impl Transaction {
    pub fn abs_amount(&self) -> Decimal {
        self.amount.abs()
    }
}
