// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Flow collection productions.
//!
//! ```text
//! flow_sequence ::= FLOW-SEQUENCE-START
//!                   (flow_sequence_entry FLOW-ENTRY)* flow_sequence_entry?
//!                   FLOW-SEQUENCE-END
//! flow_sequence_entry ::= flow_node | KEY flow_node? (VALUE flow_node?)?
//! flow_mapping ::= FLOW-MAPPING-START
//!                  (flow_mapping_entry FLOW-ENTRY)* flow_mapping_entry?
//!                  FLOW-MAPPING-END
//! flow_mapping_entry ::= flow_node | KEY flow_node? (VALUE flow_node?)?
//! ```
//!
//! A `KEY` inside a sequence opens a single-pair mapping.

use super::{Parser, Production, empty_scalar};
use crate::error::Result;
use crate::event::{Event, EventKind, FlowStyle};
use crate::token::TokenId;

impl Parser {
    pub(super) fn parse_flow_sequence_entry(&mut self, first: bool) -> Result<Event> {
        if first {
            let token = self.next_token()?;
            self.marks.push(token.start);
            self.stash_comments()?;
        }

        if !self.check_token(&[TokenId::FlowSequenceEnd])? {
            if !first {
                if self.check_token(&[TokenId::FlowEntry])? {
                    self.next_token()?;
                    self.stash_comments()?;
                } else {
                    let mark = self.pop_mark()?;
                    return Err(self.unexpected(
                        "while parsing a flow sequence",
                        Some(mark),
                        "',' or ']'",
                    )?);
                }
            }

            if self.check_token(&[TokenId::Key])? {
                let token = self.next_token()?;
                self.state = Production::FlowSequenceEntryMappingKey;
                return Ok(Event::new(
                    EventKind::MappingStart {
                        anchor: None,
                        tag: None,
                        implicit: true,
                        flow_style: FlowStyle::Flow,
                    },
                    Some(token.start),
                    Some(token.end),
                ));
            }
            if !self.check_token(&[TokenId::FlowSequenceEnd])? {
                self.states.push(Production::FlowSequenceEntry);
                return self.parse_node(false, false);
            }
        }

        let token = self.next_token()?;
        self.state = self.pop_state()?;
        self.pop_mark()?;
        Ok(Event::new(
            EventKind::SequenceEnd,
            Some(token.start),
            Some(token.end),
        ))
    }

    pub(super) fn parse_flow_sequence_entry_mapping_key(&mut self) -> Result<Event> {
        if self.check_token(&[
            TokenId::Value,
            TokenId::FlowEntry,
            TokenId::FlowSequenceEnd,
        ])? {
            let mark = self.peek_start_mark()?;
            self.state = Production::FlowSequenceEntryMappingValue;
            Ok(empty_scalar(mark))
        } else {
            self.states.push(Production::FlowSequenceEntryMappingValue);
            self.parse_node(false, false)
        }
    }

    pub(super) fn parse_flow_sequence_entry_mapping_value(&mut self) -> Result<Event> {
        if self.check_token(&[TokenId::Value])? {
            self.next_token()?;
            self.stash_comments()?;
            if !self.check_token(&[TokenId::FlowEntry, TokenId::FlowSequenceEnd])? {
                self.states.push(Production::FlowSequenceEntryMappingEnd);
                return self.parse_node(false, false);
            }
        }
        let mark = self.peek_start_mark()?;
        self.state = Production::FlowSequenceEntryMappingEnd;
        Ok(empty_scalar(mark))
    }

    pub(super) fn parse_flow_sequence_entry_mapping_end(&mut self) -> Result<Event> {
        let mark = self.peek_start_mark()?;
        self.state = Production::FlowSequenceEntry;
        Ok(Event::new(
            EventKind::MappingEnd,
            Some(mark.clone()),
            Some(mark),
        ))
    }

    pub(super) fn parse_flow_mapping_key(&mut self, first: bool) -> Result<Event> {
        if first {
            let token = self.next_token()?;
            self.marks.push(token.start);
            self.stash_comments()?;
        }

        if !self.check_token(&[TokenId::FlowMappingEnd])? {
            if !first {
                if self.check_token(&[TokenId::FlowEntry])? {
                    self.next_token()?;
                    self.stash_comments()?;
                } else {
                    let mark = self.pop_mark()?;
                    return Err(self.unexpected(
                        "while parsing a flow mapping",
                        Some(mark),
                        "',' or '}'",
                    )?);
                }
            }

            if self.check_token(&[TokenId::Key])? {
                self.next_token()?;
                self.stash_comments()?;
                if self.check_token(&[
                    TokenId::Value,
                    TokenId::FlowEntry,
                    TokenId::FlowMappingEnd,
                ])? {
                    let mark = self.peek_start_mark()?;
                    self.state = Production::FlowMappingValue;
                    return Ok(empty_scalar(mark));
                }
                self.states.push(Production::FlowMappingValue);
                return self.parse_node(false, false);
            }
            if !self.check_token(&[TokenId::FlowMappingEnd])? {
                self.states.push(Production::FlowMappingEmptyValue);
                return self.parse_node(false, false);
            }
        }

        let token = self.next_token()?;
        self.state = self.pop_state()?;
        self.pop_mark()?;
        Ok(Event::new(
            EventKind::MappingEnd,
            Some(token.start),
            Some(token.end),
        ))
    }

    /// `empty` is set for entries without a `:`, whose value is always empty.
    pub(super) fn parse_flow_mapping_value(&mut self, empty: bool) -> Result<Event> {
        if empty {
            let mark = self.peek_start_mark()?;
            self.state = Production::FlowMappingKey;
            return Ok(empty_scalar(mark));
        }
        if self.check_token(&[TokenId::Value])? {
            self.next_token()?;
            self.stash_comments()?;
            if !self.check_token(&[TokenId::FlowEntry, TokenId::FlowMappingEnd])? {
                self.states.push(Production::FlowMappingKey);
                return self.parse_node(false, false);
            }
        }
        let mark = self.peek_start_mark()?;
        self.state = Production::FlowMappingKey;
        Ok(empty_scalar(mark))
    }
}
