//! Parser for QIF (Quicken Interchange Format) files.
//!
//! QIF is line oriented: `!` lines select a section, `^` lines end a record and every other line
//! is a one-character field code followed by its value.  The input is consumed one line at a
//! time, so arbitrarily large files can be parsed from any [`BufRead`].
//!
//! ```
//! let doc = qif_parser::parse_str("!Account\nNChecking\nTBank\n^\n").unwrap();
//! assert_eq!(doc.account("Checking").unwrap().ty.as_deref(), Some("Bank"));
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use pest::Parser;
use pest_derive::Parser as PestParser;

use qif_core as qc;

use state::ParseState;

pub use error::{ParseError, ParseErrorKind, ParseResult};
pub use state::Section;

pub mod error;
mod state;

const BYTE_ORDER_MARK: char = '\u{feff}';

#[derive(PestParser)]
#[grammar = "qif.pest"]
pub struct QifParser;

/// A classified input line.
#[derive(Clone, Debug, Eq, PartialEq)]
enum Line<'i> {
    Delimiter,
    Header(&'i str),
    Field { code: char, value: &'i str },
    Blank,
}

/// Parses QIF data from `reader` into a document.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected, since QIF exports are
/// frequently written in a legacy single-byte encoding.  The first error aborts the parse.
pub fn parse<R: BufRead>(mut reader: R) -> ParseResult<qc::Document> {
    let mut state = ParseState::new();
    let mut buf = Vec::new();
    let mut line_no = 0;

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| ParseError::io_error(e, line_no + 1))?;
        if read == 0 {
            break;
        }
        line_no += 1;

        let raw = String::from_utf8_lossy(&buf);
        let mut line = raw.trim_end_matches(|c: char| c == '\n' || c == '\r');
        if line_no == 1 {
            line = line.trim_start_matches(BYTE_ORDER_MARK);
        }

        match classify(line).map_err(|e| e.with_line(line_no))? {
            Line::Delimiter => state.finalize_entry(line_no),
            Line::Header(name) => state.enter_section(name, line_no),
            Line::Field { code, value } => state.process_field(code, value, line_no)?,
            Line::Blank => {}
        }
    }

    tracing::debug!("Parsed {} lines", line_no);
    Ok(state.into_document())
}

pub fn parse_str(input: &str) -> ParseResult<qc::Document> {
    parse(input.as_bytes())
}

/// Opens and parses the QIF file at `path`.
pub fn parse_file<P: AsRef<Path>>(path: P) -> ParseResult<qc::Document> {
    let file = File::open(path.as_ref())?;
    tracing::debug!("Parsing {}", path.as_ref().display());
    parse(BufReader::new(file))
}

fn classify(input: &str) -> ParseResult<Line<'_>> {
    let pair = match QifParser::parse(Rule::line, input)?.next() {
        Some(pair) => pair,
        None => return Ok(Line::Blank),
    };
    match pair.as_rule() {
        Rule::EOI => Ok(Line::Blank),
        Rule::delimiter => Ok(Line::Delimiter),
        Rule::header => {
            let name = pair.into_inner().next().map(|p| p.as_str()).unwrap_or("");
            Ok(Line::Header(name))
        }
        Rule::field => {
            let mut inner = pair.into_inner();
            let code = inner
                .next()
                .and_then(|p| p.as_str().chars().next())
                .ok_or_else(|| ParseError::invalid_state("field code", 0))?;
            let value = inner.next().map(|p| p.as_str()).unwrap_or("").trim();
            Ok(Line::Field { code, value })
        }
        rule => Err(ParseError::invalid_state(
            format!("delimiter, header or field, found {:?}", rule),
            0,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use qif_core::{Category, Transaction, TransactionType};
    use rust_decimal_macros::dec;

    macro_rules! line_ok {
        ( $input:expr, $expected:expr ) => {
            assert_eq!(classify($input).unwrap(), $expected);
        };
    }

    #[test]
    fn classify_lines() {
        line_ok!("^", Line::Delimiter);
        line_ok!("!Account", Line::Header("Account"));
        line_ok!("!Type:Bank", Line::Header("Type:Bank"));
        line_ok!("!", Line::Header(""));
        line_ok!("", Line::Blank);
        line_ok!("D1/1/2024", Line::Field { code: 'D', value: "1/1/2024" });
        line_ok!("N  Checking  ", Line::Field { code: 'N', value: "Checking" });
        line_ok!("T", Line::Field { code: 'T', value: "" });
        line_ok!("$-12.00", Line::Field { code: '$', value: "-12.00" });
        line_ok!("^x", Line::Field { code: '^', value: "x" });
        line_ok!("^ ", Line::Field { code: '^', value: "" });
        line_ok!("Écafé", Line::Field { code: 'É', value: "café" });
    }

    #[test]
    fn account_with_transaction() {
        let doc = parse_str(indoc! {"
            !Account
            N  Checking
            T  Bank
            ^
            !Type:Bank
            D  1/1/2024
            T  100.00
            P  Employer
            L  Salary
            ^
        "})
        .unwrap();

        assert_eq!(doc.accounts.len(), 1);
        let checking = doc.account("Checking").unwrap();
        assert_eq!(checking.ty.as_deref(), Some("Bank"));
        assert_eq!(
            checking.transactions,
            vec![Transaction::builder()
                .date("1/1/2024")
                .amount(dec!(100.00))
                .payee("Employer")
                .category("Salary")
                .build()]
        );
        assert!(doc.categories.is_empty());
    }

    #[test]
    fn every_transaction_field() {
        let doc = parse_str(indoc! {"
            !Account
            NChecking
            DEveryday spending
            B1,250.75
            ^
            !Type:Bank
            D12/31/2023
            T-1,500.00
            PLandlord
            MJanuary rent
            C*
            L[Savings]
            SHousing:Rent
            ERent share
            $-750.00
            X ignored
            ^
        "})
        .unwrap();

        let checking = doc.account("Checking").unwrap();
        assert_eq!(checking.description.as_deref(), Some("Everyday spending"));
        assert_eq!(checking.initial_balance, Some(dec!(1250.75)));
        assert_eq!(
            checking.transactions,
            vec![Transaction::builder()
                .date("12/31/2023")
                .amount(dec!(-1500.00))
                .payee("Landlord")
                .memo("January rent")
                .cleared_status("*")
                .category("[Savings]")
                .transaction_type(TransactionType::Transfer)
                .split_category("Housing:Rent")
                .split_memo("Rent share")
                .split_amount(dec!(-750.00))
                .build()]
        );
    }

    #[test]
    fn transactions_keep_file_order() {
        let doc = parse_str(indoc! {"
            !Account
            NCard
            TCCard
            ^
            !Type:CCard
            T-1
            ^
            T-2
            ^
            T-3
            ^
        "})
        .unwrap();
        let amounts: Vec<_> = doc
            .account("Card")
            .unwrap()
            .transactions
            .iter()
            .map(|t| t.amount.unwrap())
            .collect();
        assert_eq!(amounts, vec![dec!(-1), dec!(-2), dec!(-3)]);
    }

    #[test]
    fn empty_entries_are_not_appended() {
        let doc = parse_str(indoc! {"
            !Account
            NChecking
            ^
            !Type:Bank
            ^
            ^
            !Type:Cat
            ^
        "})
        .unwrap();
        assert!(doc.account("Checking").unwrap().transactions.is_empty());
        assert!(doc.categories.is_empty());
    }

    #[test]
    fn transactions_without_account_are_dropped() {
        let doc = parse_str(indoc! {"
            !Type:Bank
            D1/1/2024
            T10.00
            ^
        "})
        .unwrap();
        assert!(doc.is_empty());

        // `!Account` forgets the previous account until the next `N`.
        let doc = parse_str(indoc! {"
            !Account
            NChecking
            ^
            !Account
            !Type:Bank
            T10.00
            ^
        "})
        .unwrap();
        assert!(doc.account("Checking").unwrap().transactions.is_empty());
    }

    #[test]
    fn redeclared_account_keeps_fields_and_transactions() {
        let doc = parse_str(indoc! {"
            !Account
            NChecking
            TBank
            B10
            ^
            !Type:Bank
            T5
            ^
            !Account
            NSavings
            ^
            NChecking
            ^
            !Type:Bank
            T6
            ^
        "})
        .unwrap();

        assert_eq!(
            doc.accounts.keys().collect::<Vec<_>>(),
            vec!["Checking", "Savings"]
        );
        let checking = doc.account("Checking").unwrap();
        assert_eq!(checking.ty.as_deref(), Some("Bank"));
        assert_eq!(checking.initial_balance, Some(dec!(10)));
        assert_eq!(checking.transactions.len(), 2);
        assert!(doc.account("Savings").unwrap().transactions.is_empty());
    }

    #[test]
    fn categories() {
        let doc = parse_str(indoc! {"
            !Type:Cat
            NAuto:Fuel:Premium
            DPremium gas
            E
            ^
            NSalary
            I
            ^
            NGifts
            ^
        "})
        .unwrap();

        assert_eq!(
            doc.categories,
            vec![
                Category::builder()
                    .name("Auto")
                    .sub_category("Fuel")
                    .sub_sub_category("Premium")
                    .description("Premium gas")
                    .expense(true)
                    .build(),
                Category::builder().name("Salary").income(true).build(),
                Category::builder().name("Gifts").build(),
            ]
        );
        assert!(doc.accounts.is_empty());
    }

    #[test]
    fn category_without_brackets_is_not_a_transfer() {
        let doc = parse_str(indoc! {"
            !Account
            NChecking
            !Type:Bank
            LFood:Groceries
            ^
            L[Savings
            ^
        "})
        .unwrap();
        let txns = &doc.account("Checking").unwrap().transactions;
        assert_eq!(txns.len(), 2);
        assert!(txns.iter().all(|t| t.transaction_type.is_none()));
    }

    #[test]
    fn unknown_headers_and_codes_are_ignored() {
        let doc = parse_str(indoc! {"
            !Option:AutoSwitch
            !Account
            NChecking
            XUnknown
            ^
            !Clear:AutoSwitch
            !Type:Bank
            T1.00
            Zzz
            ^
            !Type:Cat
            NAuto
            Qwhat
            ^
        "})
        .unwrap();
        assert_eq!(doc.account("Checking").unwrap().transactions.len(), 1);
        assert_eq!(doc.categories.len(), 1);
    }

    #[test]
    fn crlf_blank_lines_and_byte_order_mark() {
        let input = "\u{feff}!Account\r\nNChecking\r\n\r\n^\r\n!Type:Bank\r\nPCorner Shop\r\n^\r\n";
        let doc = parse_str(input).unwrap();
        let checking = doc.account("Checking").unwrap();
        assert_eq!(checking.transactions[0].payee.as_deref(), Some("Corner Shop"));
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let input: &[u8] = b"!Account\nNCaf\xe9\n^\n";
        let doc = parse(input).unwrap();
        assert!(doc.account("Caf\u{fffd}").is_some());
    }

    #[test]
    fn malformed_amount_aborts() {
        let err = parse_str(indoc! {"
            !Account
            NChecking
            !Type:Bank
            D1/1/2024
            Tabc
            ^
        "})
        .unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::DecimalError {
                code: 'T',
                value: "abc".to_string()
            }
        );
        assert_eq!(err.line, 5);
    }

    #[test]
    fn malformed_split_amount_and_balance_abort() {
        let err = parse_str("!Account\nNChecking\n!Type:Bank\n$twelve\n^\n").unwrap_err();
        assert_eq!(err.line, 4);
        assert!(matches!(err.kind, ParseErrorKind::DecimalError { code: '$', .. }));

        let err = parse_str("!Account\nNChecking\nB\n").unwrap_err();
        assert_eq!(err.line, 3);
        assert!(matches!(err.kind, ParseErrorKind::DecimalError { code: 'B', .. }));
    }

    #[test]
    fn account_field_before_name_is_an_error() {
        let err = parse_str("!Account\nTBank\nNChecking\n^\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingAccount { code: 'T' });
        assert_eq!(err.line, 2);
        assert_eq!(
            err.to_string(),
            "Account field 'T' appears before any account name ('N' line) at line 2"
        );
    }

    #[test]
    fn transaction_fields_survive_repeated_header() {
        let doc = parse_str(indoc! {"
            !Account
            NChecking
            !Type:Bank
            T5
            !Type:Bank
            PShop
            ^
        "})
        .unwrap();
        assert_eq!(
            doc.account("Checking").unwrap().transactions,
            vec![Transaction::builder().amount(dec!(5)).payee("Shop").build()]
        );
    }

    #[test]
    fn decimal_comma_is_rejected() {
        for (input, value) in [
            ("!Account\nNChecking\n!Type:Bank\nT-12,50\n^\n", "-12,50"),
            ("!Account\nNChecking\n!Type:Bank\n$1.250,75\n^\n", "1.250,75"),
        ] {
            let err = parse_str(input).unwrap_err();
            assert!(matches!(
                err.kind,
                ParseErrorKind::DecimalError { value: ref v, .. } if v == value
            ));
            assert_eq!(err.line, 4);
        }

        let doc = parse_str("!Account\nNChecking\nB12,345.60\n").unwrap();
        assert_eq!(
            doc.account("Checking").unwrap().initial_balance,
            Some(dec!(12345.60))
        );
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = parse_file("/nonexistent/qif/input.qif").unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::Io { .. }));
    }

    #[test]
    fn parses_run_independently() {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                std::thread::spawn(move || {
                    parse_str(&format!("!Account\nNAccount {}\n!Type:Bank\nT{}\n^\n", i, i))
                })
            })
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            let doc = handle.join().unwrap().unwrap();
            let account = doc.account(&format!("Account {}", i)).unwrap();
            assert_eq!(account.transactions[0].amount, Some(i.into()));
        }
    }
}
