use super::Ledger;
use crate::models::{NewTransaction, TransactionType};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ValidationError {
    #[error("amount must be positive")]
    NonPositiveAmount,
    #[error("description required")]
    EmptyDescription,
}

/// Field checks that need no storage access.
pub(crate) fn validate(txn: &NewTransaction) -> Result<(), ValidationError> {
    if txn.amount <= 0 {
        return Err(ValidationError::NonPositiveAmount);
    }
    if txn.description.trim().is_empty() {
        return Err(ValidationError::EmptyDescription);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct LimitCheck {
    pub(crate) exceeds: bool,
    pub(crate) projected_total: i64,
}

impl LimitCheck {
    /// The limit is exceeded only when the projected total is strictly greater.
    pub(crate) fn project(current_total: i64, amount: i64, limit: i64) -> Self {
        let projected_total = current_total.saturating_add(amount);
        Self {
            exceeds: projected_total > limit,
            projected_total,
        }
    }
}

/// Outcome of [`Ledger::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Submission {
    Saved,
    Invalid(ValidationError),
    Duplicate,
    /// Warning only. Resubmitting with confirmation stores the row.
    OverLimit { projected_total: i64, limit: i64 },
    StorageError(String),
}

impl Submission {
    pub(crate) fn is_saved(&self) -> bool {
        matches!(self, Self::Saved)
    }

    pub(crate) fn message(&self) -> String {
        match self {
            Self::Saved => "Transaction saved".into(),
            Self::Invalid(e) => e.to_string(),
            Self::Duplicate => {
                "An identical transaction already exists (same date, type, amount, category and description)".into()
            }
            Self::OverLimit {
                projected_total,
                limit,
            } => format!(
                "This expense takes the month to {} which is over the monthly limit of {}",
                crate::report::format_amount(*projected_total),
                crate::report::format_amount(*limit),
            ),
            Self::StorageError(msg) => msg.clone(),
        }
    }
}

impl Ledger {
    /// Run the pre-insert checks in order and store the row if they pass.
    ///
    /// 1. amount and description (no storage access)
    /// 2. exact duplicate, never overridable
    /// 3. monthly limit for expenses, overridable with `confirm_over_limit`
    ///
    /// The duplicate check and the insert are separate statements, so two
    /// concurrent submissions of the same row can both be stored.
    pub(crate) fn submit(&self, txn: &NewTransaction, confirm_over_limit: bool) -> Submission {
        if let Err(e) = validate(txn) {
            tracing::debug!("rejected transaction: {e}");
            return Submission::Invalid(e);
        }

        let duplicate = self.is_duplicate(txn);
        if let Some(msg) = duplicate.error {
            return Submission::StorageError(msg);
        }
        if duplicate.data {
            tracing::warn!(date = %txn.date, amount = txn.amount, "duplicate transaction rejected");
            return Submission::Duplicate;
        }

        if txn.kind == TransactionType::Expense {
            let check = self.check_monthly_limit(txn.date, txn.amount);
            if let Some(msg) = check.error {
                return Submission::StorageError(msg);
            }
            if check.data.exceeds {
                if !confirm_over_limit {
                    tracing::warn!(
                        projected_total = check.data.projected_total,
                        limit = self.monthly_limit(),
                        "monthly expense limit exceeded, confirmation required"
                    );
                    return Submission::OverLimit {
                        projected_total: check.data.projected_total,
                        limit: self.monthly_limit(),
                    };
                }
                tracing::info!(
                    projected_total = check.data.projected_total,
                    "monthly expense limit exceeded, confirmed by user"
                );
            }
        }

        let saved = self.insert_transaction(txn);
        match saved.error {
            Some(msg) => Submission::StorageError(msg),
            None => Submission::Saved,
        }
    }
}
