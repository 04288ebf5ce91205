pub(crate) mod dashboard;
pub(crate) mod statistics;
pub(crate) mod transactions;
