//! Core markup primitives
//!
//! The building blocks the container reader is made of:
//! - Tokenizer: lenient pull tokenizer using memchr for delimiter search
//! - Attributes: attribute parsing from tag content
//! - Entities: entity decoding and output escaping (Cow, zero-copy when possible)

pub mod attributes;
pub mod entities;
pub mod tokenizer;
