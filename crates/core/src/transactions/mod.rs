//! Transactions module - domain models, services, and traits.

mod transactions_model;
mod transactions_service;
mod transactions_traits;


pub use transactions_model::{
    CategoryBreakdown, NewTransaction, SummaryPeriod, SummaryRow, Transaction,
    TransactionFilters, TransactionSummary, TransactionUpdate,
};
pub use transactions_service::TransactionService;
pub use transactions_traits::{
    CategorySpend, TransactionRepositoryTrait, TransactionServiceTrait,
};
