use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// A single line of account activity, in the order it appears on the statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    /// Negative when money leaves the account
    pub amount: Decimal,
    pub running_balance: Option<Decimal>,
    pub source_section: Section,
}

/// Sum of the amounts of `transactions`, or `None` when it does not fit a `Decimal`
pub fn net_total(transactions: &[Transaction]) -> Option<Decimal> {
    transactions
        .iter()
        .try_fold(Decimal::ZERO, |total, transaction| {
            total.checked_add(transaction.amount)
        })
}

/// The statement section a transaction was listed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Deposits,
    ChecksPaid,
    CardPurchases,
    AtmAndDebitCardWithdrawals,
    ElectronicWithdrawals,
    OtherWithdrawals,
    Fees,
    TransactionDetail,
    Payments,
    Credits,
    Purchases,
    CashAdvances,
    BalanceTransfers,
    Interest,
    NewCharges,
}

impl Section {
    pub fn as_str(self) -> &'static str {
        match self {
            Section::Deposits => "deposits",
            Section::ChecksPaid => "checks paid",
            Section::CardPurchases => "card purchases",
            Section::AtmAndDebitCardWithdrawals => "atm & debit card withdrawals",
            Section::ElectronicWithdrawals => "electronic withdrawals",
            Section::OtherWithdrawals => "other withdrawals",
            Section::Fees => "fees",
            Section::TransactionDetail => "transaction detail",
            Section::Payments => "payments",
            Section::Credits => "credits",
            Section::Purchases => "purchases",
            Section::CashAdvances => "cash advances",
            Section::BalanceTransfers => "balance transfers",
            Section::Interest => "interest charged",
            Section::NewCharges => "new charges",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the file name tells us about a statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementMetadata {
    /// Trailing digits of the account number, when the file name carries them
    pub account: Option<String>,
    pub start: NaiveDate,
    /// Inclusive
    pub end: NaiveDate,
}

impl StatementMetadata {
    pub fn new(account: Option<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            account,
            start,
            end,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for StatementMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)?;
        if let Some(account) = &self.account {
            write!(f, " (account ending {account})")?;
        }
        Ok(())
    }
}
