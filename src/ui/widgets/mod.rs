pub(crate) mod instructions;
pub(crate) mod select;
pub(crate) mod transactions;

#[cfg(test)]
#[path = "select_tests.rs"]
mod select_tests;
