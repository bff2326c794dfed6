//! Deriving a prompt-ready question string from agent input.

use crate::error::Result;
use crate::types::{AgentInput, ContentBlock, ContentType, Message};
use crate::validate::validate;

/// Extract the question text used for prompt-template substitution.
///
/// The input is re-validated first; validation failures propagate. Plain
/// text is returned verbatim. For content blocks, every text block
/// contributes its trimmed text followed by a newline, in order; media
/// blocks are skipped with no placeholder. For conversations, only the
/// last message's content is considered: the derived value answers "what
/// is the latest ask", not "what was said so far".
pub fn extract_question_text(input: &AgentInput) -> Result<String> {
    validate(input)?;
    Ok(match input {
        AgentInput::Text(text) => text.clone(),
        AgentInput::ContentBlocks(blocks) => collect_text(blocks),
        AgentInput::Messages(messages) => messages
            .last()
            .map(|message| collect_text(&message.content))
            .unwrap_or_default(),
    })
}

/// The trailing run of user-authored messages.
///
/// Walks backwards from the end of the conversation and keeps every
/// message whose role is "user" (case-insensitive), stopping at the
/// first message that is not. Order is preserved.
pub fn filter_trailing_user_messages(messages: &[Message]) -> Vec<Message> {
    let mut trailing: Vec<Message> = messages
        .iter()
        .rev()
        .take_while(|message| message.role.eq_ignore_ascii_case("user"))
        .cloned()
        .collect();
    trailing.reverse();
    trailing
}

fn collect_text(blocks: &[ContentBlock]) -> String {
    let mut out = String::new();
    for block in blocks {
        if block.block_type == ContentType::Text {
            if let Some(text) = &block.text {
                out.push_str(text.trim());
                out.push('\n');
            }
        }
    }
    out
}
