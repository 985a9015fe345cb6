// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Block collection productions.
//!
//! ```text
//! block_sequence ::= BLOCK-SEQUENCE-START (BLOCK-ENTRY block_node?)* BLOCK-END
//! indentless_sequence ::= (BLOCK-ENTRY block_node?)+
//! block_mapping ::= BLOCK-MAPPING-START
//!                   ((KEY block_node_or_indentless_sequence?)?
//!                    (VALUE block_node_or_indentless_sequence?)?)*
//!                   BLOCK-END
//! ```

use super::{Parser, Production, empty_scalar};
use crate::error::Result;
use crate::event::{Event, EventKind};
use crate::token::TokenId;

impl Parser {
    pub(super) fn parse_block_sequence_entry(&mut self, first: bool) -> Result<Event> {
        if first {
            let token = self.next_token()?;
            self.marks.push(token.start);
            self.stash_comments()?;
        }

        if self.check_token(&[TokenId::BlockEntry])? {
            let token = self.next_token()?;
            self.stash_comments()?;
            if self.check_token(&[TokenId::BlockEntry, TokenId::BlockEnd])? {
                self.state = Production::BlockSequenceEntry;
                Ok(empty_scalar(token.end))
            } else {
                self.states.push(Production::BlockSequenceEntry);
                self.parse_node(true, false)
            }
        } else if self.check_token(&[TokenId::BlockEnd])? {
            let token = self.next_token()?;
            self.state = self.pop_state()?;
            self.pop_mark()?;
            Ok(Event::new(
                EventKind::SequenceEnd,
                Some(token.start),
                Some(token.end),
            ))
        } else {
            let mark = self.pop_mark()?;
            Err(self.unexpected("while parsing a block collection", Some(mark), "<block end>")?)
        }
    }

    pub(super) fn parse_indentless_sequence_entry(&mut self) -> Result<Event> {
        if self.check_token(&[TokenId::BlockEntry])? {
            let token = self.next_token()?;
            self.stash_comments()?;
            if self.check_token(&[
                TokenId::BlockEntry,
                TokenId::Key,
                TokenId::Value,
                TokenId::BlockEnd,
            ])? {
                self.state = Production::IndentlessSequenceEntry;
                Ok(empty_scalar(token.end))
            } else {
                self.states.push(Production::IndentlessSequenceEntry);
                self.parse_node(true, false)
            }
        } else {
            // The sequence ends where the enclosing mapping continues, no
            // token is consumed.
            let mark = self.peek_start_mark()?;
            self.state = self.pop_state()?;
            Ok(Event::new(
                EventKind::SequenceEnd,
                Some(mark.clone()),
                Some(mark),
            ))
        }
    }

    pub(super) fn parse_block_mapping_key(&mut self, first: bool) -> Result<Event> {
        if first {
            let token = self.next_token()?;
            self.marks.push(token.start);
            self.stash_comments()?;
        }

        if self.check_token(&[TokenId::Key])? {
            let token = self.next_token()?;
            self.stash_comments()?;
            if self.check_token(&[TokenId::Key, TokenId::Value, TokenId::BlockEnd])? {
                self.state = Production::BlockMappingValue;
                Ok(empty_scalar(token.end))
            } else {
                self.states.push(Production::BlockMappingValue);
                self.parse_node(true, true)
            }
        } else if self.check_token(&[TokenId::BlockEnd])? {
            let token = self.next_token()?;
            self.state = self.pop_state()?;
            self.pop_mark()?;
            Ok(Event::new(
                EventKind::MappingEnd,
                Some(token.start),
                Some(token.end),
            ))
        } else {
            let mark = self.pop_mark()?;
            Err(self.unexpected("while parsing a block mapping", Some(mark), "<block end>")?)
        }
    }

    pub(super) fn parse_block_mapping_value(&mut self) -> Result<Event> {
        if self.check_token(&[TokenId::Value])? {
            let token = self.next_token()?;
            self.stash_comments()?;
            if self.check_token(&[TokenId::Key, TokenId::Value, TokenId::BlockEnd])? {
                self.state = Production::BlockMappingKey;
                Ok(empty_scalar(token.end))
            } else {
                self.states.push(Production::BlockMappingKey);
                self.parse_node(true, true)
            }
        } else {
            let mark = self.peek_start_mark()?;
            self.state = Production::BlockMappingKey;
            Ok(empty_scalar(mark))
        }
    }
}
