// Copyright (c) 2025 Moneyledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Closed set of monetary transaction kinds. Balance deltas and savings
/// bookkeeping dispatch on this tag; strings exist only at the DB and CLI
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Income,
    Expense,
    Savings,
    Withdraw,
    SelfTransfer,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "INCOME",
            TransactionKind::Expense => "EXPENSE",
            TransactionKind::Savings => "SAVINGS",
            TransactionKind::Withdraw => "WITHDRAW",
            TransactionKind::SelfTransfer => "SELF_TRANSFER",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "INCOME" => Some(TransactionKind::Income),
            "EXPENSE" => Some(TransactionKind::Expense),
            "SAVINGS" => Some(TransactionKind::Savings),
            "WITHDRAW" => Some(TransactionKind::Withdraw),
            "SELF_TRANSFER" => Some(TransactionKind::SelfTransfer),
            _ => None,
        }
    }

    /// Signed effect of a transaction of this kind on the account it is
    /// recorded against. A SELF_TRANSFER row here is the outgoing (source)
    /// leg; the incoming mirror leg is handled by
    /// [`Transaction::signed_effect`].
    pub fn source_effect(&self, amount: Decimal) -> Decimal {
        match self {
            TransactionKind::Income | TransactionKind::Withdraw => amount,
            TransactionKind::Expense | TransactionKind::Savings | TransactionKind::SelfTransfer => {
                -amount
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Active,
    Inactive,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Active => "ACTIVE",
            Status::Inactive => "INACTIVE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ACTIVE" => Some(Status::Active),
            "INACTIVE" => Some(Status::Inactive),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccountKind {
    Bank,
    Cash,
    Wallet,
    CreditCard,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Bank => "bank",
            AccountKind::Cash => "cash",
            AccountKind::Wallet => "wallet",
            AccountKind::CreditCard => "credit-card",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "bank" => Some(AccountKind::Bank),
            "cash" => Some(AccountKind::Cash),
            "wallet" => Some(AccountKind::Wallet),
            "credit-card" => Some(AccountKind::CreditCard),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub kind: AccountKind,
    pub balance: Decimal,
    pub status: Status,
}

/// Cross-links between the two legs of a self-transfer, stored as a JSON
/// column on each leg. The source leg carries `transfer_to`, the mirror leg
/// `transfer_from`; `peer` is the other leg's transaction id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransferMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_to: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_from: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peer: Option<i64>,
}

/// Summary of the saving linked to a SAVINGS transaction, populated by a
/// read-side join when listing. Savings and transactions are independent
/// rows joined by `transaction_id`, never a live object graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingSummary {
    pub id: i64,
    pub status: Status,
    pub amount: Decimal,
    pub current_value: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub account_id: i64,
    #[serde(default)]
    pub account_name: String,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub category: String,
    pub description: String,
    pub transaction_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub withdraw_from: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TransferMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saving: Option<SavingSummary>,
}

impl Transaction {
    /// True when this row is the incoming leg of a self-transfer.
    pub fn is_mirror_leg(&self) -> bool {
        self.kind == TransactionKind::SelfTransfer
            && self
                .metadata
                .as_ref()
                .is_some_and(|m| m.transfer_from.is_some())
    }

    /// Signed effect this row has on its own account.
    pub fn signed_effect(&self) -> Decimal {
        if self.is_mirror_leg() {
            self.amount
        } else {
            self.kind.source_effect(self.amount)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Saving {
    pub id: i64,
    pub user_id: i64,
    pub transaction_id: i64,
    pub category: String,
    pub amount: Decimal,
    /// Mark-to-market value; zero means "unset, use `amount`".
    pub current_value: Decimal,
    pub withdrawn_amount: Decimal,
    pub status: Status,
    pub start_date: NaiveDate,
    pub maturity_date: Option<NaiveDate>,
    pub description: String,
}

impl Saving {
    /// The ceiling withdrawals are checked against.
    pub fn effective_value(&self) -> Decimal {
        if self.current_value.is_zero() {
            self.amount
        } else {
            self.current_value
        }
    }

    pub fn remaining(&self) -> Decimal {
        self.effective_value() - self.withdrawn_amount
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "frequency", content = "customDays", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Custom(i64),
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Monthly => "MONTHLY",
            Frequency::Custom(_) => "CUSTOM",
        }
    }

    pub fn custom_days(&self) -> i64 {
        match self {
            Frequency::Custom(d) => *d,
            _ => 0,
        }
    }

    pub fn from_parts(s: &str, custom_days: i64) -> Option<Self> {
        match s {
            "DAILY" => Some(Frequency::Daily),
            "WEEKLY" => Some(Frequency::Weekly),
            "MONTHLY" => Some(Frequency::Monthly),
            "CUSTOM" => Some(Frequency::Custom(custom_days)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringTransaction {
    pub id: i64,
    pub user_id: i64,
    pub account_id: i64,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub category: String,
    pub description: String,
    pub frequency: Frequency,
    pub start_date: NaiveDateTime,
    pub end_date: Option<NaiveDateTime>,
    pub last_run: Option<NaiveDateTime>,
    pub next_run: NaiveDateTime,
}

/// Caller-supplied fields for creating or updating a ledger transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionInput {
    pub account_id: i64,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub category: String,
    pub description: String,
    pub transaction_date: NaiveDate,
    /// Id of the SAVINGS transaction being drawn down; required for WITHDRAW.
    pub withdraw_from: Option<i64>,
    /// Destination account; required for SELF_TRANSFER.
    pub transfer_to: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringInput {
    pub account_id: i64,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub category: String,
    pub description: String,
    pub frequency: Frequency,
    pub start_date: NaiveDateTime,
    pub end_date: Option<NaiveDateTime>,
}
