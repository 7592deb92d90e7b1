//! Turns the text lines of a statement into transactions
//!
//! Every statement layout is described by a [`Layout`]: which lines open a section (and whether
//! amounts listed in it are debits or credits), which lines close it, what a transaction row looks
//! like and which lines are page furniture. A single [`TransactionScanner`] walks the lines of a
//! statement with the layout of its [`StatementVariant`].
//!
//! Within a section, a line which is neither a transaction, a header, a terminator nor page noise
//! continues the description of the transaction just above it:
//!
//! ```text
//! ATM & DEBIT CARD WITHDRAWALS
//! 01/15 Card Purchase 01/14 Coffee Shop Brooklyn NY 4.50
//! Card 1234
//! Total ATM & Debit Card Withdrawals $4.50
//! ```
//!
//! yields a single transaction described as `Card Purchase 01/14 Coffee Shop Brooklyn NY Card 1234`.
//! A line which starts with a date never continues a description: unless it is a
//! well-formed row, it is a [`Error::MalformedTransactionLine`]. Terminators are subtotal lines,
//! `Total` followed by an amount, so a merchant such as `TOTAL WINE & MORE` wrapped onto its own
//! line stays a continuation.

mod amex;
mod checking;
mod credit_card;
mod savings;

use chrono::{Datelike, NaiveDate};
use regex::{Captures, Regex};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::error::Error;
use crate::model::{Section, StatementMetadata, Transaction};

/// The statement layouts we know how to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementVariant {
    Checking,
    Savings,
    CreditCard,
    Amex,
}

impl StatementVariant {
    pub fn name(self) -> &'static str {
        self.layout().name
    }

    fn layout(self) -> &'static Layout {
        match self {
            StatementVariant::Checking => &checking::LAYOUT,
            StatementVariant::Savings => &savings::LAYOUT,
            StatementVariant::CreditCard => &credit_card::LAYOUT,
            StatementVariant::Amex => &amex::LAYOUT,
        }
    }

    /// Extracts every transaction of a statement, or the first error encountered
    pub fn extract<'a>(
        self,
        lines: impl IntoIterator<Item = &'a str>,
        metadata: &StatementMetadata,
    ) -> Result<Vec<Transaction>, Error> {
        lines.into_iter().transactions(self, metadata).collect()
    }
}

/// How the amounts listed in a section are signed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignRule {
    /// Money leaving the account, always negative
    Debit,
    /// Money coming in, always positive
    Credit,
    /// The statement prints the sign itself
    AsPrinted,
}

impl SignRule {
    fn apply(self, amount: Decimal) -> Decimal {
        match self {
            SignRule::Debit => -amount.abs(),
            SignRule::Credit => amount.abs(),
            SignRule::AsPrinted => amount,
        }
    }
}

/// Everything the scanner needs to know about one statement layout
///
/// Regular expressions are matched against trimmed lines. Row patterns name their groups `month`,
/// `day`, optionally `year` (two digits), `description`, `amount`, and optionally `balance` and
/// `check`. Balance and account patterns capture `balance` and `account` respectively.
struct Layout {
    name: &'static str,
    sections: Vec<SectionRule>,
    row: RowPattern,
    terminator: Regex,
    noise: Vec<Regex>,
    opening_balance: Option<Regex>,
    closing_balance: Option<Regex>,
    account: Option<Regex>,
}

impl Layout {
    fn section_for(&self, text: &str) -> Option<&SectionRule> {
        self.sections.iter().find(|rule| rule.header.is_match(text))
    }

    fn is_noise(&self, text: &str) -> bool {
        self.noise.iter().any(|noise| noise.is_match(text))
    }
}

struct SectionRule {
    header: Regex,
    section: Section,
    sign: SignRule,
    /// Overrides the layout's row pattern in this section
    row: Option<RowPattern>,
}

impl SectionRule {
    fn new(title: &str, section: Section, sign: SignRule) -> Self {
        let title = regex::escape(title).replace(' ', r"\s+");
        Self {
            header: pattern(&format!(r"(?i)^{title}(?:\s*\(continued\))?$")),
            section,
            sign,
            row: None,
        }
    }

    /// Parses an amount as printed in this section and gives it the section's sign
    fn signed_amount(&self, raw: &str) -> Result<Decimal, String> {
        parse_amount(raw).map(|amount| self.sign.apply(amount))
    }

    fn with_row(self, row: RowPattern) -> Self {
        Self {
            row: Some(row),
            ..self
        }
    }
}

struct RowPattern {
    regex: Regex,
    /// Loose shape of a row; a line which has it but does not match `regex` is malformed
    lead: Regex,
    description: RowDescription,
}

enum RowDescription {
    Text,
    /// `CHECK #<check>`, followed by the description if there is one
    CheckNumber,
}

impl RowPattern {
    /// A row starting with its date, such as `01/15 COFFEE SHOP 4.50`
    fn text(source: &str) -> Self {
        Self {
            regex: pattern(source),
            lead: pattern(r"^\d{1,2}/\d{1,2}(?:/\d{2,4})?\*?(?:\s|$)"),
            description: RowDescription::Text,
        }
    }

    /// A row starting with a check number, such as `1042 ^ 01/09 125.00`
    fn check(source: &str) -> Self {
        Self {
            regex: pattern(source),
            lead: pattern(r"^\d+\s+(?:\^\s+)?(?:.+?\s+)?\d{1,2}/\d{1,2}\s+\S+$"),
            description: RowDescription::CheckNumber,
        }
    }

    fn describe(&self, captures: &Captures<'_>) -> String {
        let text = captures
            .name("description")
            .map(|m| m.as_str().trim())
            .filter(|text| !text.is_empty());
        match self.description {
            RowDescription::Text => text.unwrap_or_default().to_owned(),
            RowDescription::CheckNumber => {
                let number = captures.name("check").map_or("", |m| m.as_str());
                match text {
                    Some(text) => format!("CHECK #{number} {text}"),
                    None => format!("CHECK #{number}"),
                }
            }
        }
    }
}

fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("regex")
}

/// Page furniture shared by every layout
fn page_noise() -> Vec<Regex> {
    vec![
        pattern(r"(?i)^page\s+\d+\s+of\s+\d+$"),
        pattern(r"(?i)^\*(?:start|end)\*"),
    ]
}

/// Parses an amount such as `1,234.56`, `$4.50`, `-$12.00`, `$-12.00`, `12.00-` or `(12.00)`
pub(crate) fn parse_amount(raw: &str) -> Result<Decimal, String> {
    let mut text = raw.trim();
    let mut negative = false;
    if let Some(inner) = text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        negative = true;
        text = inner;
    }
    if let Some(rest) = text.strip_suffix('-') {
        negative = true;
        text = rest;
    }
    if let Some(rest) = text.strip_prefix('-') {
        negative = true;
        text = rest;
    }
    if let Some(rest) = text.strip_prefix('$') {
        text = rest;
    }
    if let Some(rest) = text.strip_prefix('-') {
        negative = true;
        text = rest;
    }

    let (int_part, fract_part) = text
        .split_once('.')
        .ok_or_else(|| format!("amount '{raw}' has no decimal point"))?;
    if fract_part.len() != 2 || !is_digits(fract_part) {
        return Err(format!("amount '{raw}' does not have two decimal places"));
    }
    if !has_valid_grouping(int_part) {
        return Err(format!("amount '{raw}' is not a valid number"));
    }
    let int_part = match int_part.replace(',', "") {
        digits if digits.is_empty() => "0".to_owned(),
        digits => digits,
    };
    let value: Decimal = format!("{int_part}.{fract_part}")
        .parse()
        .map_err(|err| format!("could not parse amount '{raw}': {err}"))?;
    Ok(if negative { -value } else { value })
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

/// Thousands separators, if any, must split the integer part in groups of three
fn has_valid_grouping(int_part: &str) -> bool {
    if !int_part.contains(',') {
        return is_digits(int_part);
    }
    let mut groups = int_part.split(',');
    let leading = groups.next().unwrap_or_default();
    !leading.is_empty()
        && leading.len() <= 3
        && is_digits(leading)
        && groups.all(|group| group.len() == 3 && is_digits(group))
}

/// Two-digit years pivot the way `strptime`'s `%y` does
fn expand_year(year: i32) -> i32 {
    if year < 69 {
        2000 + year
    } else {
        1900 + year
    }
}

/// Builds the date of a transaction and checks that it falls in the statement period
///
/// Without a year, the year is the one which puts the date in the statement period. Should several
/// years qualify, the first one which keeps transactions in chronological order is picked.
pub(crate) fn resolve_date(
    month: u32,
    day: u32,
    year: Option<i32>,
    metadata: &StatementMetadata,
    previous: Option<NaiveDate>,
) -> Result<NaiveDate, String> {
    let date = match year {
        Some(year) => NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            format!("could not build a valid date from year={year}, month={month}, day={day}")
        })?,
        None => {
            let candidates: Vec<NaiveDate> = (metadata.start.year()..=metadata.end.year())
                .filter_map(|year| NaiveDate::from_ymd_opt(year, month, day))
                .filter(|date| metadata.contains(*date))
                .collect();
            match candidates.as_slice() {
                [] => {
                    return Err(format!(
                        "{month:02}/{day:02} is not a date between {} and {}",
                        metadata.start, metadata.end
                    ))
                }
                [only] => *only,
                [earliest, ..] => previous
                    .and_then(|previous| candidates.iter().copied().find(|d| *d >= previous))
                    .unwrap_or(*earliest),
            }
        }
    };
    if metadata.contains(date) {
        Ok(date)
    } else {
        Err(format!(
            "{date} is outside of the statement period {} to {}",
            metadata.start, metadata.end
        ))
    }
}

#[derive(Clone, Copy)]
enum ScanState {
    NoSection,
    InSection(&'static SectionRule),
}

/// Iterator which extracts transactions from the text lines of a statement
///
/// A transaction is only yielded once the line after it shows that its description is complete.
/// Iteration stops after the first error.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct TransactionScanner<'m, I> {
    iter: I,
    layout: &'static Layout,
    metadata: &'m StatementMetadata,
    state: ScanState,
    line_number: usize,
    fatal_error_seen: bool,
    account_seen: bool,
    open_transaction: Option<Transaction>,
    pending_description: Vec<String>,
    previous_date: Option<NaiveDate>,
    previous_balance: Option<Decimal>,
}

impl<'m, I> TransactionScanner<'m, I> {
    fn new(iter: I, variant: StatementVariant, metadata: &'m StatementMetadata) -> Self {
        Self {
            iter,
            layout: variant.layout(),
            metadata,
            state: ScanState::NoSection,
            line_number: 0,
            fatal_error_seen: false,
            account_seen: false,
            open_transaction: None,
            pending_description: Vec::new(),
            previous_date: None,
            previous_balance: None,
        }
    }

    fn current_section(&self) -> Option<Section> {
        match self.state {
            ScanState::NoSection => None,
            ScanState::InSection(rule) => Some(rule.section),
        }
    }

    fn scan_line(&mut self, line: &str) -> Result<Option<Transaction>, Error> {
        let text = line.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let layout = self.layout;
        if let Some(rule) = layout.section_for(text) {
            let flushed = self.flush();
            if self.current_section() != Some(rule.section) {
                self.previous_balance = None;
            }
            debug!(line_number = self.line_number, section = %rule.section, "entering section");
            self.state = ScanState::InSection(rule);
            return Ok(flushed);
        }

        if let Some(captures) = layout
            .closing_balance
            .as_ref()
            .and_then(|closing| closing.captures(text))
        {
            let closing = self.parse_balance(&captures, line)?;
            if let Some(expected) = self.previous_balance {
                if expected != closing {
                    return Err(self.balance_mismatch(expected, closing));
                }
            }
            return Ok(self.leave_section());
        }

        if layout.terminator.is_match(text) {
            return Ok(self.leave_section());
        }

        if layout.is_noise(text) {
            return Ok(None);
        }

        let ScanState::InSection(rule) = self.state else {
            self.note_account(text);
            return Ok(None);
        };

        if let Some(captures) = layout
            .opening_balance
            .as_ref()
            .and_then(|opening| opening.captures(text))
        {
            self.previous_balance = Some(self.parse_balance(&captures, line)?);
            return Ok(None);
        }

        let row = rule.row.as_ref().unwrap_or(&layout.row);
        if let Some(captures) = row.regex.captures(text) {
            let transaction = self.parse_transaction(rule, row, &captures, line)?;
            let flushed = self.flush();
            self.open_transaction = Some(transaction);
            return Ok(flushed);
        }
        if row.lead.is_match(text) {
            return Err(self.malformed(
                line,
                "line starts like a transaction but does not match the transaction layout"
                    .to_owned(),
            ));
        }

        if self.open_transaction.is_some() {
            self.pending_description.push(text.to_owned());
        } else {
            debug!(
                line_number = self.line_number,
                line,
                "ignoring line before the first transaction of the section"
            );
        }
        Ok(None)
    }

    fn parse_transaction(
        &mut self,
        rule: &SectionRule,
        row: &RowPattern,
        captures: &Captures<'_>,
        line: &str,
    ) -> Result<Transaction, Error> {
        let date = self
            .parse_date(captures)
            .map_err(|reason| self.malformed(line, reason))?;
        let amount = rule
            .signed_amount(&captures["amount"])
            .map_err(|reason| self.malformed(line, reason))?;
        let running_balance = captures
            .name("balance")
            .map(|balance| parse_amount(balance.as_str()))
            .transpose()
            .map_err(|reason| self.malformed(line, reason))?;

        if let (Some(previous), Some(balance)) = (self.previous_balance, running_balance) {
            let expected = previous
                .checked_add(amount)
                .ok_or_else(|| self.malformed(line, "running balance overflow".to_owned()))?;
            if expected != balance {
                return Err(self.balance_mismatch(expected, balance));
            }
        }
        self.previous_balance = running_balance;
        self.previous_date = Some(date);

        Ok(Transaction {
            date,
            description: row.describe(captures),
            amount,
            running_balance,
            source_section: rule.section,
        })
    }

    fn parse_date(&self, captures: &Captures<'_>) -> Result<NaiveDate, String> {
        let month: u32 = parse_integer_field("month", captures)?;
        let day: u32 = parse_integer_field("day", captures)?;
        let year = match captures.name("year") {
            Some(_) => Some(expand_year(parse_integer_field("year", captures)?)),
            None => None,
        };
        resolve_date(month, day, year, self.metadata, self.previous_date)
    }

    fn parse_balance(&self, captures: &Captures<'_>, line: &str) -> Result<Decimal, Error> {
        parse_amount(&captures["balance"]).map_err(|reason| self.malformed(line, reason))
    }

    fn malformed(&self, line: &str, reason: String) -> Error {
        Error::MalformedTransactionLine {
            variant: self.layout.name,
            line_number: self.line_number,
            line: line.to_owned(),
            reason,
        }
    }

    fn balance_mismatch(&self, expected: Decimal, actual: Decimal) -> Error {
        Error::BalanceMismatch {
            variant: self.layout.name,
            line_number: self.line_number,
            expected,
            actual,
        }
    }

    fn leave_section(&mut self) -> Option<Transaction> {
        let flushed = self.flush();
        if let Some(section) = self.current_section() {
            debug!(line_number = self.line_number, %section, "leaving section");
        }
        self.state = ScanState::NoSection;
        self.previous_balance = None;
        flushed
    }

    /// Closes the open transaction, appending the continuation lines seen since to its description
    fn flush(&mut self) -> Option<Transaction> {
        let transaction = self.open_transaction.take()?;
        if self.pending_description.is_empty() {
            return Some(transaction);
        }
        let description = std::iter::once(transaction.description.as_str())
            .chain(self.pending_description.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");
        self.pending_description.clear();
        Some(Transaction {
            description,
            ..transaction
        })
    }

    fn note_account(&mut self, text: &str) {
        if self.account_seen {
            return;
        }
        let Some(captures) = self
            .layout
            .account
            .as_ref()
            .and_then(|account| account.captures(text))
        else {
            return;
        };
        self.account_seen = true;
        let digits: String = captures["account"]
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        match &self.metadata.account {
            Some(expected) if !digits.ends_with(expected.as_str()) => warn!(
                line_number = self.line_number,
                found = %digits,
                %expected,
                "account number in the statement does not match the file name"
            ),
            _ => info!(account = %digits, "statement account"),
        }
    }
}

fn parse_integer_field<T: std::str::FromStr>(
    key: &str,
    captures: &Captures<'_>,
) -> Result<T, String> {
    captures[key]
        .parse::<T>()
        .map_err(|_| format!("could not parse {key} '{}'", &captures[key]))
}

impl<'a, I: Iterator<Item = &'a str>> Iterator for TransactionScanner<'_, I> {
    type Item = Result<Transaction, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.fatal_error_seen {
            return None;
        }
        while let Some(line) = self.iter.next() {
            self.line_number += 1;
            match self.scan_line(line) {
                Ok(Some(transaction)) => return Some(Ok(transaction)),
                Ok(None) => continue,
                Err(err) => {
                    self.fatal_error_seen = true;
                    return Some(Err(err));
                }
            }
        }
        self.flush().map(Ok)
    }
}

pub trait IteratorExt {
    fn transactions(
        self,
        variant: StatementVariant,
        metadata: &StatementMetadata,
    ) -> TransactionScanner<'_, Self>
    where
        Self: Sized;
}

impl<'a, I: Iterator<Item = &'a str>> IteratorExt for I {
    fn transactions(
        self,
        variant: StatementVariant,
        metadata: &StatementMetadata,
    ) -> TransactionScanner<'_, I> {
        TransactionScanner::new(self, variant, metadata)
    }
}
