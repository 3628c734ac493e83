//! AirShop storefront library.
//!
//! Client-side state and backend glue for the AirShop perfume shop:
//!
//! - [`cart`] - persistent shopping cart with change notifications
//! - [`catalog`] - filtering, sorting, facets and search history
//! - [`checkout`] - form validation, order totals and the order/payment flow
//! - [`api`] - REST client for the public and admin endpoints
//! - [`session`] - stored admin credentials
//! - [`storage`] - key-value persistence behind all of the above

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod session;
pub mod storage;

pub use error::{Result, StorefrontError};
