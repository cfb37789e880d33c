// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Command/register protocol spoken with the coprocessor.

pub mod command;
pub mod mailbox;

pub use command::{
    CommandEncoding, CommandId, CommandWord, ParameterWord, BUFFER_LAYOUT_DEFAULT,
    BUFFER_LENGTH_WORDS, PERIOD_MAX,
};
pub use mailbox::{Mailbox, ResponseSnapshot};
