//! Semantic validation of agent input.
//!
//! Validation is independent of how the value was produced: the same
//! rules apply after a wire decode, a document decode, or programmatic
//! construction. It is pure, never mutates the input, and fails fast on
//! the first violation rather than aggregating a report.

use crate::error::{InputError, Result};
use crate::types::{AgentInput, ContentBlock, ContentType, MediaContent, Message};

/// Validate an agent input against the per-shape invariants.
pub fn validate(input: &AgentInput) -> Result<()> {
    match input {
        AgentInput::Text(text) => validate_text(text),
        AgentInput::ContentBlocks(blocks) => validate_content_blocks(blocks),
        AgentInput::Messages(messages) => validate_messages(messages),
    }
}

/// Validate an input and, for conversations, require the final message to
/// come from the user (compared case-insensitively).
pub fn validate_conversation(input: &AgentInput) -> Result<()> {
    validate(input)?;
    if let AgentInput::Messages(messages) = input {
        let last_is_user = messages
            .last()
            .is_some_and(|m| m.role.eq_ignore_ascii_case("user"));
        if !last_is_user {
            return Err(InputError::validation("Last message must be from role 'user'"));
        }
    }
    Ok(())
}

fn validate_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(InputError::validation("Text input cannot be null or empty"));
    }
    Ok(())
}

/// Validate a content-block list: non-empty, every block well-formed.
pub fn validate_content_blocks(blocks: &[ContentBlock]) -> Result<()> {
    if blocks.is_empty() {
        return Err(InputError::validation(
            "Content blocks cannot be null or empty",
        ));
    }
    for (index, block) in blocks.iter().enumerate() {
        validate_content_block(block).map_err(|e| {
            InputError::validation(format!(
                "Content block at index {index} is invalid: {}",
                e.message()
            ))
        })?;
    }
    Ok(())
}

/// Validate a single content block: the payload matching its declared
/// type must be populated and internally well-formed.
pub fn validate_content_block(block: &ContentBlock) -> Result<()> {
    match block.block_type {
        ContentType::Text => match block.text.as_deref() {
            Some(text) if !text.trim().is_empty() => Ok(()),
            _ => Err(InputError::validation(
                "Text content block cannot have null or empty text",
            )),
        },
        ContentType::Image => match &block.image {
            Some(image) => validate_media(image, "Image"),
            None => Err(InputError::validation(
                "Image content block must have image data",
            )),
        },
        ContentType::Video => match &block.video {
            Some(video) => validate_media(video, "Video"),
            None => Err(InputError::validation(
                "Video content block must have video data",
            )),
        },
        ContentType::Document => match &block.document {
            Some(document) => validate_media(document, "Document"),
            None => Err(InputError::validation(
                "Document content block must have document data",
            )),
        },
    }
}

fn validate_media(media: &MediaContent, kind: &str) -> Result<()> {
    if media.format.trim().is_empty() {
        return Err(InputError::validation(format!("{kind} format is required")));
    }
    if media.data.trim().is_empty() {
        return Err(InputError::validation(format!("{kind} data is required")));
    }
    Ok(())
}

/// Validate a message list: non-empty, every message carrying a role and
/// content, with each message's content recursively validated as blocks.
pub fn validate_messages(messages: &[Message]) -> Result<()> {
    if messages.is_empty() {
        return Err(InputError::validation("Messages cannot be null or empty"));
    }
    for (index, message) in messages.iter().enumerate() {
        validate_message(message).map_err(|e| {
            InputError::validation(format!(
                "Message at index {index} is invalid: {}",
                e.message()
            ))
        })?;
    }
    Ok(())
}

fn validate_message(message: &Message) -> Result<()> {
    if message.role.trim().is_empty() {
        return Err(InputError::validation("Message role cannot be null or empty"));
    }
    if message.content.is_empty() {
        return Err(InputError::validation(
            "Message content cannot be null or empty",
        ));
    }
    validate_content_blocks(&message.content)
}
