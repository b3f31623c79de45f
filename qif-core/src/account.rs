use rust_decimal::Decimal;
use serde::Serialize;
use typed_builder::TypedBuilder;

use super::transaction::Transaction;

/// Represents an account declared in an `!Account` section.
///
/// ```text
/// !Account
/// NChecking
/// TBank
/// DEveryday spending
/// B1,250.00
/// ^
/// ```
///
/// The account's name is the key it is stored under in the
/// [Document](../struct.Document.html), so it is not repeated here.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, TypedBuilder)]
pub struct Account {
    /// Type of the account as written in the file (`Bank`, `CCard`, `Invst`, ...).
    #[builder(default, setter(into, strip_option))]
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,

    #[builder(default, setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Opening balance, from the `B` field.
    #[builder(default, setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_balance: Option<Decimal>,

    /// Transactions recorded against this account, in file order.
    #[builder(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub transactions: Vec<Transaction>,
}
