// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod expense;
pub mod market;
pub mod news;
pub mod profile;

pub use expense::{ExpenseItem, ExpenseList, ExpenseSummary};
pub use market::{PricePoint, StockQuote};
pub use news::NewsItem;
pub use profile::{ProfileUpdate, UserProfile};
