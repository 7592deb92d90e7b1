//! Chase savings account statements
//!
//! A single section lists signed amounts along with the running balance:
//!
//! ```text
//! TRANSACTION DETAIL
//! DATE DESCRIPTION AMOUNT BALANCE
//! Beginning Balance $5,000.00
//! 01/05 Deposit 500.00 5,500.00
//! 01/19 Transfer To Chk Xxxxx1234 -200.00 5,300.00
//! Ending Balance $5,300.00
//! ```

use std::sync::LazyLock;

use super::{page_noise, pattern, Layout, RowPattern, SectionRule, SignRule};
use crate::model::Section;

pub(super) static LAYOUT: LazyLock<Layout> = LazyLock::new(|| Layout {
    name: "savings",
    sections: vec![SectionRule::new(
        "TRANSACTION DETAIL",
        Section::TransactionDetail,
        SignRule::AsPrinted,
    )],
    row: RowPattern::text(
        r"^(?P<month>\d{2})/(?P<day>\d{2})\s+(?P<description>.+?)\s+(?P<amount>-?[\d,]*\.\d{2})\s+(?P<balance>-?[\d,]*\.\d{2})$",
    ),
    terminator: pattern(r"(?i)^total\b.*\d\.\d{2}$"),
    noise: page_noise()
        .into_iter()
        .chain([pattern(r"(?i)^date\s+description\s+amount\s+balance$")])
        .collect(),
    opening_balance: Some(pattern(
        r"(?i)^beginning\s+balance\s+(?P<balance>-?\$?-?[\d,]*\.\d{2})$",
    )),
    closing_balance: Some(pattern(
        r"(?i)^ending\s+balance\s+(?P<balance>-?\$?-?[\d,]*\.\d{2})$",
    )),
    account: Some(pattern(r"(?i)^account\s+number:\s*(?P<account>[\dX\s]+)$")),
});

#[cfg(test)]
mod test {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::error::Error;
    use crate::extractor::test::helpers::*;
    use crate::extractor::StatementVariant;
    use crate::model::{Section, Transaction};

    use helpers::*;

    #[test]
    fn should_chain_running_balances() {
        let transactions = StatementVariant::Savings
            .extract(
                [
                    "SAVINGS SUMMARY",
                    "Beginning Balance $5,000.00",
                    "Ending Balance $5,290.00",
                    "TRANSACTION DETAIL",
                    "DATE DESCRIPTION AMOUNT BALANCE",
                    "Beginning Balance $5,000.00",
                    "01/05 Deposit 500.00 5,500.00",
                    "01/19 Transfer To Chk Xxxxx1234 -200.00 5,300.00",
                    "Page 1 of 2",
                    "TRANSACTION DETAIL (continued)",
                    "01/25 Monthly Service Fee -10.00 5,290.00",
                    "Ending Balance $5,290.00",
                ],
                &january_2018(),
            )
            .expect("transactions");
        assert_eq!(
            vec![
                detail(date(2018, 1, 5), "Deposit", dec!(500.00), dec!(5_500.00)),
                detail(
                    date(2018, 1, 19),
                    "Transfer To Chk Xxxxx1234",
                    dec!(-200.00),
                    dec!(5_300.00)
                ),
                detail(
                    date(2018, 1, 25),
                    "Monthly Service Fee",
                    dec!(-10.00),
                    dec!(5_290.00)
                ),
            ],
            transactions
        );
    }

    #[test]
    fn should_fail_on_a_corrupted_balance() {
        let err = StatementVariant::Savings
            .extract(
                [
                    "TRANSACTION DETAIL",
                    "01/05 Deposit 500.00 5,500.00",
                    "01/19 Transfer To Chk Xxxxx1234 -200.00 5,350.00",
                ],
                &january_2018(),
            )
            .expect_err("balance mismatch");
        match err {
            Error::BalanceMismatch {
                variant,
                line_number,
                expected,
                actual,
            } => {
                assert_eq!("savings", variant);
                assert_eq!(3, line_number);
                assert_eq!(dec!(5_300.00), expected);
                assert_eq!(dec!(5_350.00), actual);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn should_check_the_first_transaction_against_the_beginning_balance() {
        let result = StatementVariant::Savings.extract(
            [
                "TRANSACTION DETAIL",
                "Beginning Balance $5,000.00",
                "01/05 Deposit 500.00 5,600.00",
            ],
            &january_2018(),
        );
        assert!(matches!(
            result,
            Err(Error::BalanceMismatch { line_number: 3, .. })
        ));
    }

    #[test]
    fn should_check_the_ending_balance() {
        let result = StatementVariant::Savings.extract(
            [
                "TRANSACTION DETAIL",
                "01/05 Deposit 500.00 5,500.00",
                "Ending Balance $5,400.00",
            ],
            &january_2018(),
        );
        assert!(matches!(
            result,
            Err(Error::BalanceMismatch { line_number: 3, .. })
        ));
    }

    #[test]
    fn should_extract_nothing_from_headers_and_balances() {
        let transactions = StatementVariant::Savings
            .extract(
                [
                    "TRANSACTION DETAIL",
                    "Beginning Balance $5,000.00",
                    "Ending Balance $5,000.00",
                ],
                &january_2018(),
            )
            .expect("transactions");
        assert!(transactions.is_empty());
    }

    #[test]
    fn should_reject_dated_lines_without_a_balance() {
        let err = StatementVariant::Savings
            .extract(
                [
                    "TRANSACTION DETAIL",
                    "01/05 Deposit 500.00 5,500.00",
                    "01/19 Transfer To Chk Xxxxx1234 -200.00",
                    "01/25 Monthly Service Fee -10.00 5,290.00",
                ],
                &january_2018(),
            )
            .expect_err("row without a balance");
        match err {
            Error::MalformedTransactionLine {
                variant,
                line_number,
                ..
            } => {
                assert_eq!("savings", variant);
                assert_eq!(3, line_number);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    mod helpers {
        use super::*;

        pub(super) fn detail(
            date: NaiveDate,
            description: &str,
            amount: Decimal,
            balance: Decimal,
        ) -> Transaction {
            Transaction {
                running_balance: Some(balance),
                ..transaction(date, description, amount, Section::TransactionDetail)
            }
        }
    }
}
