// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod expenses;
pub mod identity;
pub mod market;
pub mod news;
pub mod session;

pub use expenses::ExpenseService;
pub use identity::{AuthFailure, IdentityClient};
pub use market::MarketDataService;
pub use news::NewsService;
pub use session::SessionService;
