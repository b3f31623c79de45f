use rust_decimal::Decimal;
use serde::Serialize;
use typed_builder::TypedBuilder;

/// Kind of a transaction, derived from its category.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum TransactionType {
    /// The category names another account, written in brackets: `L[Savings]`.
    Transfer,
}

impl TransactionType {
    /// Derives the type implied by a category value, if any.
    pub fn from_category(category: &str) -> Option<Self> {
        if category.contains('[') && category.contains(']') {
            Some(TransactionType::Transfer)
        } else {
            None
        }
    }
}

/// Represents a single transaction of a `!Type:...` section.  Every field is optional; only the
/// fields present in the file are set.
///
/// ```text
/// !Type:Bank
/// D1/1/2024
/// T-45.10
/// PCorner Shop
/// MMilk and bread
/// C*
/// LFood:Groceries
/// ^
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, TypedBuilder)]
pub struct Transaction {
    /// The date exactly as written; QIF dates come in too many regional variants to normalize.
    #[builder(default, setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[builder(default, setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,

    #[builder(default, setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payee: Option<String>,

    #[builder(default, setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,

    /// Cleared flag (`*`, `c`, `X`, `R`, ...).
    #[builder(default, setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleared_status: Option<String>,

    #[builder(default, setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[builder(default, setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,

    #[builder(default, setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split_category: Option<String>,

    #[builder(default, setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split_memo: Option<String>,

    #[builder(default, setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split_amount: Option<Decimal>,
}

impl Transaction {
    /// Sets the category and the type it implies.  A category without brackets leaves an
    /// already derived type in place.
    pub fn set_category(&mut self, category: &str) {
        if let Some(ty) = TransactionType::from_category(category) {
            self.transaction_type = Some(ty);
        }
        self.category = Some(category.to_string());
    }
}
