//! Protocol module

#![allow(missing_docs)]

pub mod voice;
