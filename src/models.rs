// Copyright (c) 2025 Assetbook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::LedgerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountKind {
    Asset,
    Liability,
    Expense,
    Revenue,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Asset => "ASSET",
            AccountKind::Liability => "LIABILITY",
            AccountKind::Expense => "EXPENSE",
            AccountKind::Revenue => "REVENUE",
        }
    }

    /// Accounts that hold money: valid credit side of an expense,
    /// valid debit side of an income.
    pub fn holds_funds(&self) -> bool {
        matches!(self, AccountKind::Asset | AccountKind::Liability)
    }
}

impl FromStr for AccountKind {
    type Err = LedgerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ASSET" => Ok(AccountKind::Asset),
            "LIABILITY" => Ok(AccountKind::Liability),
            "EXPENSE" => Ok(AccountKind::Expense),
            "REVENUE" => Ok(AccountKind::Revenue),
            _ => Err(LedgerError::Validation(format!(
                "Invalid account kind '{}' (use asset|liability|expense|revenue)",
                s
            ))),
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "INCOME",
            TransactionKind::Expense => "EXPENSE",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = LedgerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "INCOME" => Ok(TransactionKind::Income),
            "EXPENSE" => Ok(TransactionKind::Expense),
            _ => Err(LedgerError::Validation(format!(
                "Invalid transaction kind '{}' (use income|expense)",
                s
            ))),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetCategory {
    Cash,
    Stock,
    Pension,
    RealEstate,
    Loan,
    Eso,
    Rental,
}

impl AssetCategory {
    pub const ALL: [AssetCategory; 7] = [
        AssetCategory::Cash,
        AssetCategory::Stock,
        AssetCategory::Pension,
        AssetCategory::RealEstate,
        AssetCategory::Loan,
        AssetCategory::Eso,
        AssetCategory::Rental,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetCategory::Cash => "CASH",
            AssetCategory::Stock => "STOCK",
            AssetCategory::Pension => "PENSION",
            AssetCategory::RealEstate => "REAL_ESTATE",
            AssetCategory::Loan => "LOAN",
            AssetCategory::Eso => "ESO",
            AssetCategory::Rental => "RENTAL",
        }
    }

    /// LOAN is the sole liability category; every other category counts
    /// toward assets in net-worth computation.
    pub fn is_liability(&self) -> bool {
        matches!(self, AssetCategory::Loan)
    }
}

impl FromStr for AssetCategory {
    type Err = LedgerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CASH" => Ok(AssetCategory::Cash),
            "STOCK" => Ok(AssetCategory::Stock),
            "PENSION" => Ok(AssetCategory::Pension),
            "REAL_ESTATE" => Ok(AssetCategory::RealEstate),
            "LOAN" => Ok(AssetCategory::Loan),
            "ESO" => Ok(AssetCategory::Eso),
            "RENTAL" => Ok(AssetCategory::Rental),
            _ => Err(LedgerError::Validation(format!(
                "Invalid asset category '{}' (use cash|stock|pension|real_estate|loan|eso|rental)",
                s
            ))),
        }
    }
}

impl fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A calendar month key. Valuation snapshots are keyed by (year, month)
/// computed once at write time; lookups compare keys, never raw timestamps,
/// so a stray time-of-day component cannot drop a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| MonthKey { year, month })
    }

    pub fn from_date(d: NaiveDate) -> Self {
        MonthKey {
            year: d.year(),
            month: d.month(),
        }
    }

    pub fn prev(self) -> Self {
        if self.month == 1 {
            MonthKey {
                year: self.year - 1,
                month: 12,
            }
        } else {
            MonthKey {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            MonthKey {
                year: self.year + 1,
                month: 1,
            }
        } else {
            MonthKey {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// The month marker: first day of the calendar month.
    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .expect("MonthKey holds a valid year/month pair")
    }

    /// Whole months from `start` to `self`, negative if before.
    pub fn months_since(self, start: MonthKey) -> i64 {
        (self.year as i64 - start.year as i64) * 12 + self.month as i64 - start.month as i64
    }
}

impl FromStr for MonthKey {
    type Err = LedgerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid =
            || LedgerError::Validation(format!("Invalid month '{}', expected YYYY-MM", s));
        let (y, m) = s.split_once('-').ok_or_else(invalid)?;
        let year: i32 = y.parse().map_err(|_| invalid())?;
        let month: u32 = m.parse().map_err(|_| invalid())?;
        MonthKey::new(year, month).ok_or_else(invalid)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub kind: AccountKind,
    pub owner_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Asset {
    pub id: i64,
    pub name: String,
    pub category: AssetCategory,
    pub owner_id: i64,
}