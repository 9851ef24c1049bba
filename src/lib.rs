//! An arena-backed binary search tree with full rebalancing.
//!
//! This crate provides [`Tree`], a binary search tree over unique, totally
//! ordered keys. A tree built from a collection starts out height-balanced;
//! insertions and deletions are plain BST operations that never restructure,
//! and [`Tree::rebalance`] rebuilds a skewed tree into minimal height.
//!
//! # Example
//!
//! ```
//! use rebal_tree::{Rebalance, Tree};
//!
//! // Duplicates are dropped and the keys sorted before building.
//! let mut tree = Tree::from([5, 3, 8, 1, 4, 7, 9, 3]);
//! assert_eq!(tree.len(), 7);
//!
//! // Four traversal orders, all lazy.
//! assert!(tree.in_order().copied().eq([1, 3, 4, 5, 7, 8, 9]));
//! assert!(tree.level_order().copied().eq([5, 3, 8, 1, 4, 7, 9]));
//! assert!(tree.pre_order().copied().eq([5, 3, 1, 4, 8, 7, 9]));
//! assert!(tree.post_order().copied().eq([1, 4, 3, 7, 9, 8, 5]));
//!
//! // Structural queries by key.
//! assert_eq!(tree.depth(&4), Ok(2));
//! assert_eq!(tree.is_leaf(&4), Ok(true));
//!
//! // Deleting a node with two children promotes its in-order successor.
//! tree.delete(&5);
//! assert_eq!(tree.root().map(|node| *node.value()), Some(7));
//!
//! // Rebuild once insertion has skewed the tree.
//! tree.extend(10..16);
//! assert!(!tree.is_balanced());
//! assert_eq!(tree.rebalance(), Rebalance::Rebuilt { len: 12 });
//! assert!(tree.is_balanced());
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`; the default `std`
//!   feature just forwards to `tracing` and `thiserror`
//! - **No deep recursion** - Nodes live in an index arena and every walk uses
//!   an explicit stack or queue, so degenerate trees are safe to traverse
//! - **Typed failures** - Key-relative metrics return [`TreeError::KeyNotFound`]
//!   instead of misbehaving on absent keys
//!
//! # Logging
//!
//! Mutations emit `tracing` events at `trace` level and builds/rebuilds at
//! `debug` level. No subscriber is installed by this crate.

#![no_std]
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod raw;

pub mod tree;

pub use error::{Result, TreeError};
pub use tree::{NodeRef, Rebalance, Tree};
