use std::str::FromStr;

use rust_decimal::Decimal;

use qif_core as qc;

use crate::error::{ParseError, ParseResult};

/// Interpretation context for field lines, selected by the most recent header.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Section {
    /// `!Account`: fields describe the account named by the last `N` line.
    Account,
    /// `!Type:<anything but Cat>`: fields describe transactions of the current account.
    Transaction,
    /// `!Type:Cat`: fields describe entries of the category list.
    Category,
}

impl Section {
    /// Returns the section a header (without its leading `!`) switches to, or `None` for headers
    /// that leave the current section alone, such as `Option:AutoSwitch`.
    pub fn from_header(name: &str) -> Option<Section> {
        match name {
            "Account" => Some(Section::Account),
            "Type:Cat" => Some(Section::Category),
            _ if name.starts_with("Type:") => Some(Section::Transaction),
            _ => None,
        }
    }
}

/// The record being accumulated between two `^` delimiters.
///
/// Only a delimiter ends a record, so fields set before a section header are still part of the
/// record after it.  Each half stays `None` until one of its fields is set, so an empty record is
/// never committed.
#[derive(Clone, Debug, Default, PartialEq)]
struct Entry {
    transaction: Option<qc::Transaction>,
    category: Option<qc::Category>,
}

#[derive(Debug, Default)]
pub(crate) struct ParseState {
    document: qc::Document,
    section: Option<Section>,
    current_account: Option<String>,
    pending: Entry,
}

impl ParseState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn into_document(self) -> qc::Document {
        self.document
    }

    pub(crate) fn enter_section(&mut self, header: &str, line: usize) {
        let section = match Section::from_header(header) {
            Some(section) => section,
            None => {
                tracing::trace!("Ignoring header '!{}' at line {}", header, line);
                return;
            }
        };
        tracing::debug!("Entering {:?} section at line {}", section, line);

        if section == Section::Account {
            self.current_account = None;
        }
        self.section = Some(section);
    }

    /// Commits the pending entry to its owner and starts a new, empty one.
    pub(crate) fn finalize_entry(&mut self, line: usize) {
        let entry = std::mem::take(&mut self.pending);
        match self.section {
            Some(Section::Transaction) => match (entry.transaction, &self.current_account) {
                (Some(txn), Some(name)) => self.document.account_entry(name).transactions.push(txn),
                (Some(_), None) => tracing::debug!(
                    "Dropping transaction ending at line {}: no current account",
                    line
                ),
                (None, _) => {}
            },
            Some(Section::Category) => {
                if let Some(category) = entry.category {
                    self.document.categories.push(category);
                }
            }
            Some(Section::Account) | None => {}
        }
    }

    pub(crate) fn process_field(&mut self, code: char, value: &str, line: usize) -> ParseResult<()> {
        match self.section {
            Some(Section::Transaction) => self.transaction_field(code, value, line),
            Some(Section::Category) => {
                self.category_field(code, value);
                Ok(())
            }
            Some(Section::Account) => self.account_field(code, value, line),
            None => Ok(()),
        }
    }

    fn transaction_field(&mut self, code: char, value: &str, line: usize) -> ParseResult<()> {
        match code {
            'D' => self.pending_transaction().date = Some(value.to_string()),
            'T' => {
                let amount = decimal(code, value, line)?;
                self.pending_transaction().amount = Some(amount);
            }
            'P' => self.pending_transaction().payee = Some(value.to_string()),
            'M' => self.pending_transaction().memo = Some(value.to_string()),
            'C' => self.pending_transaction().cleared_status = Some(value.to_string()),
            'L' => self.pending_transaction().set_category(value),
            'S' => self.pending_transaction().split_category = Some(value.to_string()),
            'E' => self.pending_transaction().split_memo = Some(value.to_string()),
            '$' => {
                let amount = decimal(code, value, line)?;
                self.pending_transaction().split_amount = Some(amount);
            }
            _ => {}
        }
        Ok(())
    }

    fn category_field(&mut self, code: char, value: &str) {
        match code {
            'N' => self.pending_category().set_name_path(value),
            'D' => self.pending_category().description = Some(value.to_string()),
            'I' => self.pending_category().income = true,
            'E' => self.pending_category().expense = true,
            _ => {}
        }
    }

    fn account_field(&mut self, code: char, value: &str, line: usize) -> ParseResult<()> {
        match code {
            'N' => {
                self.document.account_entry(value);
                self.current_account = Some(value.to_string());
            }
            'T' => self.current_account(code, line)?.ty = Some(value.to_string()),
            'D' => self.current_account(code, line)?.description = Some(value.to_string()),
            'B' => {
                let balance = decimal(code, value, line)?;
                self.current_account(code, line)?.initial_balance = Some(balance);
            }
            _ => {}
        }
        Ok(())
    }

    fn current_account(&mut self, code: char, line: usize) -> ParseResult<&mut qc::Account> {
        let name = self
            .current_account
            .as_deref()
            .ok_or_else(|| ParseError::missing_account(code, line))?;
        Ok(self.document.account_entry(name))
    }

    fn pending_transaction(&mut self) -> &mut qc::Transaction {
        self.pending.transaction.get_or_insert_with(Default::default)
    }

    fn pending_category(&mut self) -> &mut qc::Category {
        self.pending.category.get_or_insert_with(Default::default)
    }
}

/// Parses a QIF amount.  Thousands separators are allowed (`T-1,234.56`) but only between
/// complete groups of three digits, so a decimal comma such as `12,50` is rejected rather than
/// read as `1250`.
fn decimal(code: char, value: &str, line: usize) -> ParseResult<Decimal> {
    let s = strip_thousands_separators(value).ok_or_else(|| {
        ParseError::decimal_parse_error(
            rust_decimal::Error::from("misplaced thousands separator"),
            code,
            value,
            line,
        )
    })?;
    Decimal::from_str(&s).map_err(|e| ParseError::decimal_parse_error(e, code, value, line))
}

fn strip_thousands_separators(value: &str) -> Option<String> {
    if !value.contains(',') {
        return Some(value.to_string());
    }
    let (integer, fraction) = value.split_at(value.find('.').unwrap_or(value.len()));
    if fraction.contains(',') {
        return None;
    }

    let mut groups = integer.split(',');
    let lead = groups.next()?;
    let lead_digits = lead.trim_start_matches(|c: char| c == '-' || c == '+');
    if lead_digits.is_empty()
        || lead_digits.len() > 3
        || !lead_digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let mut stripped = lead.to_string();
    for group in groups {
        if group.len() != 3 || !group.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        stripped.push_str(group);
    }
    stripped.push_str(fraction);
    Some(stripped)
}
