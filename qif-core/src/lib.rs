use indexmap::IndexMap;
use serde::Serialize;
use typed_builder::TypedBuilder;

pub use account::Account;
pub use category::Category;
pub use transaction::{Transaction, TransactionType};

pub mod account;
pub mod category;
pub mod transaction;

/// Represents a complete QIF file: every account declared in it (each owning its transactions)
/// and every category from the category list.
///
/// Accounts keep the order in which they were first declared in the file, so rendering the same
/// input twice always produces the same output.
#[derive(Clone, Debug, Default, PartialEq, Serialize, TypedBuilder)]
pub struct Document {
    /// Accounts keyed by their name.
    #[builder(default)]
    pub accounts: IndexMap<String, Account>,

    /// Categories in file order.
    #[builder(default)]
    pub categories: Vec<Category>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account(&self, name: &str) -> Option<&Account> {
        self.accounts.get(name)
    }

    /// Returns the account called `name`, creating an empty one first if it has not been seen
    /// yet.  An existing account is returned untouched.
    pub fn account_entry(&mut self, name: &str) -> &mut Account {
        self.accounts.entry(name.to_string()).or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty() && self.categories.is_empty()
    }
}
