// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Errors that can occur while building keys or running a cipher.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid key: {0}")]
    KeyValidation(String),

    #[error("Required parameter is missing: {0}")]
    NullParameter(&'static str),

    #[error("{cipher} cannot be initialised with a {key} key")]
    InvalidKeyType { cipher: String, key: &'static str },

    #[error("{cipher} does not accept a {shape} parameter")]
    InvalidParameterShape { cipher: String, shape: &'static str },

    #[error("Data length error: {0}")]
    DataLength(String),

    #[error("Illegal state: {0}")]
    IllegalState(&'static str),

    #[error("Padding error: {0}")]
    Padding(String),

    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    #[error("Illegal argument: {0}")]
    IllegalArgument(String),

    #[error("Malformed key encoding: {0}")]
    MalformedEncoding(String),

    #[error("No cipher registered under {0:?}")]
    UnknownAlgorithm(String),

    #[error("Product ciphertext segments decrypt to different plaintexts")]
    InconsistentSegments,
}

pub type Result<T> = std::result::Result<T, Error>;
