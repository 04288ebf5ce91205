use super::TransactionType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub kind: TransactionType,
}

impl Category {
    pub fn new(name: impl Into<String>, kind: TransactionType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}
