//! Data transformations that prepare model inputs.
//!
//! # Example
//!
//! ```
//! use market_analytics::transform::{share_weighted, ShareAxis};
//!
//! let volume = vec![vec![1.0, 1.0], vec![3.0, 1.0]];
//! let price = vec![vec![2.0, 4.0], vec![2.0, 6.0]];
//! let out = share_weighted(&volume, &[price], ShareAxis::Row).unwrap();
//! assert_eq!(out.predictors[0], vec![3.0, 3.0]);
//! ```

pub mod share;

pub use share::{share_weighted, ShareAxis, ShareWeighted};
