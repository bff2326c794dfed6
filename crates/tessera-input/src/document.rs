//! Document codec for agent input.
//!
//! The document form has no explicit kind discriminator: a scalar string
//! is plain text, and an array is either messages or content blocks,
//! decided by field presence. Each array item is materialized as a full
//! field map first and only then classified (`role` selects a message,
//! `type` a content block), so field order in the source document is
//! irrelevant. The generic dynamic value in between is
//! [`serde_json::Value`]; anything the model does not understand stays a
//! `Value` and is dropped rather than rejected, which keeps old decoders
//! safe against new fields.
//!
//! Encoding is sparse: absent optional fields are omitted from the
//! emitted document, never written as `null`.

use std::str::FromStr;

use log::debug;
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{InputError, Result};
use crate::types::{
    AgentInput, ContentBlock, ContentType, MediaContent, Message, SourceType, ToolCall,
    ToolFunction,
};

/// A classified array item: a message or a content block.
enum ArrayItem {
    Message(Message),
    Block(ContentBlock),
}

impl ArrayItem {
    fn kind_name(&self) -> &'static str {
        match self {
            ArrayItem::Message(_) => "Message",
            ArrayItem::Block(_) => "ContentBlock",
        }
    }
}

impl AgentInput {
    /// Decode an agent input from a document value.
    ///
    /// A string decodes to [`AgentInput::Text`]; an array decodes to
    /// content blocks or messages by inspecting its items. An empty array
    /// decodes successfully with no determinable shape (it yields an
    /// empty content-block payload); rejecting emptiness is the
    /// validator's job, not the decoder's.
    pub fn from_document(value: &Value) -> Result<Self> {
        match value {
            Value::String(text) => Ok(AgentInput::Text(text.clone())),
            Value::Array(items) => decode_array(items),
            other => Err(InputError::parse(format!(
                "Invalid input format. Expected string or array, found {}.",
                json_kind(other)
            ))),
        }
    }

    /// Encode this agent input as a document value.
    pub fn to_document(&self) -> Value {
        match self {
            AgentInput::Text(text) => Value::String(text.clone()),
            AgentInput::ContentBlocks(blocks) => {
                Value::Array(blocks.iter().map(block_to_value).collect())
            }
            AgentInput::Messages(messages) => {
                Value::Array(messages.iter().map(message_to_value).collect())
            }
        }
    }
}

impl Serialize for AgentInput {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_document().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AgentInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        AgentInput::from_document(&value).map_err(de::Error::custom)
    }
}

fn decode_array(items: &[Value]) -> Result<AgentInput> {
    let mut parsed = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let fields = item.as_object().ok_or_else(|| {
            InputError::parse(format!(
                "Array item at index {index} must be an object, found {}",
                json_kind(item)
            ))
        })?;
        parsed.push(parse_array_item(fields)?);
    }
    debug!("decoded document array with {} item(s)", parsed.len());

    // The first item decides the array's shape; every later item must
    // match it. An empty array carries no shape information at all.
    let first_is_message = match parsed.first() {
        None => return Ok(AgentInput::ContentBlocks(Vec::new())),
        Some(item) => matches!(item, ArrayItem::Message(_)),
    };
    if first_is_message {
        let mut messages = Vec::with_capacity(parsed.len());
        for (index, item) in parsed.into_iter().enumerate() {
            match item {
                ArrayItem::Message(message) => messages.push(message),
                other => {
                    return Err(InputError::parse(format!(
                        "Mixed array types detected. Expected all items to be Messages, \
                         but item at index {index} is a {}",
                        other.kind_name()
                    )))
                }
            }
        }
        Ok(AgentInput::Messages(messages))
    } else {
        let mut blocks = Vec::with_capacity(parsed.len());
        for (index, item) in parsed.into_iter().enumerate() {
            match item {
                ArrayItem::Block(block) => blocks.push(block),
                other => {
                    return Err(InputError::parse(format!(
                        "Mixed array types detected. Expected all items to be ContentBlocks, \
                         but item at index {index} is a {}",
                        other.kind_name()
                    )))
                }
            }
        }
        Ok(AgentInput::ContentBlocks(blocks))
    }
}

/// Classify one harvested array item as a message or a content block.
///
/// The check runs against the complete field map, so a `role` appearing
/// after other fields still wins.
fn parse_array_item(fields: &Map<String, Value>) -> Result<ArrayItem> {
    if fields.contains_key("role") {
        return Ok(ArrayItem::Message(parse_message(fields)?));
    }
    if fields.contains_key("type") {
        return Ok(ArrayItem::Block(parse_content_block(fields)?));
    }
    Err(InputError::parse(
        "Invalid item format. Must have 'role' (for messages) or 'type' (for content blocks).",
    ))
}

fn parse_message(fields: &Map<String, Value>) -> Result<Message> {
    let role = string_field(fields, "role")?
        .ok_or_else(|| InputError::parse("Message must have a 'role' field"))?;

    let content = match fields.get("content") {
        Some(Value::Array(items)) => parse_content_array(items)?,
        Some(other) => {
            return Err(InputError::parse(format!(
                "Field 'content' must be an array, found {}",
                json_kind(other)
            )))
        }
        None => return Err(InputError::parse("Message must have a 'content' array")),
    };

    let tool_calls = match fields.get("toolCalls") {
        Some(Value::Array(items)) => Some(parse_tool_calls_array(items)?),
        Some(other) => {
            return Err(InputError::parse(format!(
                "Field 'toolCalls' must be an array, found {}",
                json_kind(other)
            )))
        }
        None => None,
    };

    let tool_call_id = string_field(fields, "toolCallId")?;

    Ok(Message {
        role: role.to_string(),
        content,
        tool_calls,
        tool_call_id: tool_call_id.map(str::to_string),
    })
}

fn parse_content_array(items: &[Value]) -> Result<Vec<ContentBlock>> {
    let mut blocks = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let fields = item.as_object().ok_or_else(|| {
            InputError::parse(format!(
                "Content array item at index {index} must be an object, found {}",
                json_kind(item)
            ))
        })?;
        match parse_array_item(fields)? {
            ArrayItem::Block(block) => blocks.push(block),
            other => {
                return Err(InputError::parse(format!(
                    "Invalid content array. Expected ContentBlock at index {index} but found {}",
                    other.kind_name()
                )))
            }
        }
    }
    Ok(blocks)
}

fn parse_content_block(fields: &Map<String, Value>) -> Result<ContentBlock> {
    let type_name = string_field(fields, "type")?
        .ok_or_else(|| InputError::parse("Content block must have a 'type' field"))?;
    let block_type = ContentType::from_str(type_name)?;

    match block_type {
        ContentType::Text => {
            let text = string_field(fields, "text")?.unwrap_or_default();
            if text.trim().is_empty() {
                return Err(InputError::parse(
                    "Text content block must have non-empty text",
                ));
            }
            Ok(ContentBlock::new_text(text.to_string()))
        }
        ContentType::Image => Ok(ContentBlock::new_image(parse_source(fields, "Image")?)),
        ContentType::Video => Ok(ContentBlock::new_video(parse_source(fields, "Video")?)),
        ContentType::Document => Ok(ContentBlock::new_document(parse_source(fields, "Document")?)),
    }
}

/// Reconstruct a media payload from a block's `source` object.
///
/// `kind` names the block type in error messages ("Image", "Video",
/// "Document"); each missing or blank field fails with its own wording.
fn parse_source(fields: &Map<String, Value>, kind: &str) -> Result<MediaContent> {
    let source = match fields.get("source") {
        Some(Value::Object(source)) => source,
        Some(Value::Null) | None => {
            return Err(InputError::parse(format!("{kind} source cannot be null")))
        }
        Some(other) => {
            return Err(InputError::parse(format!(
                "{kind} source must be an object, found {}",
                json_kind(other)
            )))
        }
    };

    let format = string_field(source, "format")?.unwrap_or_default();
    if format.trim().is_empty() {
        return Err(InputError::parse(format!("{kind} format is required")));
    }

    let source_type = string_field(source, "type")?.unwrap_or_default();
    if source_type.trim().is_empty() {
        return Err(InputError::parse(format!("{kind} source type is required")));
    }
    let source_type = SourceType::from_str(source_type)?;

    let data = string_field(source, "data")?.unwrap_or_default();
    if data.trim().is_empty() {
        return Err(InputError::parse(format!("{kind} data is required")));
    }

    Ok(MediaContent::new(
        source_type,
        format.to_string(),
        data.to_string(),
    ))
}

fn parse_tool_calls_array(items: &[Value]) -> Result<Vec<ToolCall>> {
    let mut tool_calls = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let fields = item.as_object().ok_or_else(|| {
            InputError::parse(format!(
                "Tool call at index {index} must be an object, found {}",
                json_kind(item)
            ))
        })?;
        tool_calls.push(parse_tool_call(fields)?);
    }
    Ok(tool_calls)
}

/// Parse a single tool-call object. `type` defaults to "function" when
/// absent; unknown fields are skipped, not stored.
fn parse_tool_call(fields: &Map<String, Value>) -> Result<ToolCall> {
    let id = string_field(fields, "id")?;
    let call_type = string_field(fields, "type")?.unwrap_or("function");
    let function = match fields.get("function") {
        Some(Value::Object(function)) => Some(parse_tool_function(function)?),
        Some(other) => {
            return Err(InputError::parse(format!(
                "Field 'function' must be an object, found {}",
                json_kind(other)
            )))
        }
        None => None,
    };

    match (id, function) {
        (Some(id), Some(function)) => Ok(ToolCall {
            id: id.to_string(),
            call_type: call_type.to_string(),
            function,
        }),
        _ => Err(InputError::parse(
            "ToolCall must have 'id' and 'function' fields",
        )),
    }
}

fn parse_tool_function(fields: &Map<String, Value>) -> Result<ToolFunction> {
    let name = string_field(fields, "name")?;
    let arguments = string_field(fields, "arguments")?;
    match (name, arguments) {
        (Some(name), Some(arguments)) => {
            Ok(ToolFunction::new(name.to_string(), arguments.to_string()))
        }
        _ => Err(InputError::parse(
            "ToolFunction must have 'name' and 'arguments' fields",
        )),
    }
}

fn block_to_value(block: &ContentBlock) -> Value {
    let mut fields = Map::new();
    fields.insert(
        "type".to_string(),
        Value::String(block.block_type.as_str().to_ascii_lowercase()),
    );
    if let Some(text) = &block.text {
        fields.insert("text".to_string(), Value::String(text.clone()));
    }
    let media = match block.block_type {
        ContentType::Text => None,
        ContentType::Image => block.image.as_ref(),
        ContentType::Video => block.video.as_ref(),
        ContentType::Document => block.document.as_ref(),
    };
    if let Some(media) = media {
        fields.insert("source".to_string(), media_to_value(media));
    }
    Value::Object(fields)
}

fn media_to_value(media: &MediaContent) -> Value {
    let mut fields = Map::new();
    fields.insert(
        "type".to_string(),
        Value::String(media.source_type.as_str().to_ascii_lowercase()),
    );
    fields.insert("format".to_string(), Value::String(media.format.clone()));
    fields.insert("data".to_string(), Value::String(media.data.clone()));
    Value::Object(fields)
}

fn message_to_value(message: &Message) -> Value {
    let mut fields = Map::new();
    fields.insert("role".to_string(), Value::String(message.role.clone()));
    fields.insert(
        "content".to_string(),
        Value::Array(message.content.iter().map(block_to_value).collect()),
    );
    if let Some(tool_calls) = &message.tool_calls {
        fields.insert(
            "toolCalls".to_string(),
            Value::Array(tool_calls.iter().map(tool_call_to_value).collect()),
        );
    }
    if let Some(tool_call_id) = &message.tool_call_id {
        fields.insert("toolCallId".to_string(), Value::String(tool_call_id.clone()));
    }
    Value::Object(fields)
}

fn tool_call_to_value(tool_call: &ToolCall) -> Value {
    let mut function = Map::new();
    function.insert(
        "name".to_string(),
        Value::String(tool_call.function.name.clone()),
    );
    function.insert(
        "arguments".to_string(),
        Value::String(tool_call.function.arguments.clone()),
    );

    let mut fields = Map::new();
    fields.insert("id".to_string(), Value::String(tool_call.id.clone()));
    fields.insert("type".to_string(), Value::String(tool_call.call_type.clone()));
    fields.insert("function".to_string(), Value::Object(function));
    Value::Object(fields)
}

/// A string field that, when present and non-null, must hold a string.
fn string_field<'a>(fields: &'a Map<String, Value>, name: &str) -> Result<Option<&'a str>> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value)),
        Some(other) => Err(InputError::parse(format!(
            "Field '{name}' must be a string, found {}",
            json_kind(other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_decodes_to_text() {
        let input = AgentInput::from_document(&json!("hi does this work")).unwrap();
        assert_eq!(input, AgentInput::Text("hi does this work".to_string()));
    }

    #[test]
    fn scalar_non_string_is_rejected() {
        let err = AgentInput::from_document(&json!(42)).unwrap_err();
        assert!(err
            .to_string()
            .contains("Invalid input format. Expected string or array"));
    }

    #[test]
    fn content_block_array_decodes() {
        let input = AgentInput::from_document(&json!([
            {"type": "text", "text": "describe this image"},
            {"type": "image", "source": {"type": "url", "format": "jpeg", "data": "https://example.com/i.jpg"}}
        ]))
        .unwrap();
        match input {
            AgentInput::ContentBlocks(blocks) => {
                assert_eq!(blocks.len(), 2);
                assert_eq!(blocks[0].text.as_deref(), Some("describe this image"));
                let image = blocks[1].image.as_ref().unwrap();
                assert_eq!(image.source_type, SourceType::Url);
                assert_eq!(image.format, "jpeg");
            }
            other => panic!("expected content blocks, got {other:?}"),
        }
    }

    #[test]
    fn message_array_decodes_regardless_of_field_order() {
        // "role" appears last; classification still picks Message.
        let input = AgentInput::from_document(&json!([
            {"content": [{"type": "text", "text": "hello"}], "role": "user"}
        ]))
        .unwrap();
        match input {
            AgentInput::Messages(messages) => {
                assert_eq!(messages[0].role, "user");
                assert_eq!(messages[0].content.len(), 1);
            }
            other => panic!("expected messages, got {other:?}"),
        }
    }

    #[test]
    fn mixed_array_fails_citing_the_offending_index() {
        let err = AgentInput::from_document(&json!([
            {"role": "user", "content": [{"type": "text", "text": "hi"}]},
            {"type": "text", "text": "hi"}
        ]))
        .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Mixed array types detected"));
        assert!(message.contains("index 1"));
        assert!(message.contains("ContentBlock"));
    }

    #[test]
    fn item_with_neither_role_nor_type_fails() {
        let err = AgentInput::from_document(&json!([{"text": "hi"}])).unwrap_err();
        assert!(err.to_string().contains(
            "Must have 'role' (for messages) or 'type' (for content blocks)"
        ));
    }

    #[test]
    fn non_object_array_item_fails_with_its_kind() {
        let err = AgentInput::from_document(&json!(["hi"])).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("index 0"));
        assert!(message.contains("found string"));
    }

    #[test]
    fn empty_array_decodes_without_error() {
        let input = AgentInput::from_document(&json!([])).unwrap();
        assert_eq!(input, AgentInput::ContentBlocks(Vec::new()));
    }

    #[test]
    fn unknown_fields_are_tolerated_and_dropped() {
        let input = AgentInput::from_document(&json!([
            {
                "role": "user",
                "content": [{"type": "text", "text": "hi", "cacheHint": {"ttl": 60}}],
                "metadata": {"trace": ["a", "b"], "priority": 1, "flag": true, "note": null}
            }
        ]))
        .unwrap();
        match input {
            AgentInput::Messages(messages) => {
                assert_eq!(messages[0].content[0].text.as_deref(), Some("hi"))
            }
            other => panic!("expected messages, got {other:?}"),
        }
    }

    #[test]
    fn message_tool_fields_decode() {
        let input = AgentInput::from_document(&json!([
            {
                "role": "assistant",
                "content": [{"type": "text", "text": "on it"}],
                "toolCalls": [
                    {"id": "call_1", "function": {"name": "lookup", "arguments": "{}"}}
                ]
            },
            {
                "role": "tool",
                "content": [{"type": "text", "text": "result"}],
                "toolCallId": "call_1"
            }
        ]))
        .unwrap();
        match input {
            AgentInput::Messages(messages) => {
                let calls = messages[0].tool_calls.as_ref().unwrap();
                assert_eq!(calls[0].id, "call_1");
                assert_eq!(messages[1].tool_call_id.as_deref(), Some("call_1"));
            }
            other => panic!("expected messages, got {other:?}"),
        }
    }

    #[test]
    fn tool_call_type_defaults_to_function() {
        let input = AgentInput::from_document(&json!([
            {
                "role": "assistant",
                "content": [{"type": "text", "text": "on it"}],
                "toolCalls": [
                    {"id": "call_1", "function": {"name": "lookup", "arguments": "{}"}, "extra": 1}
                ]
            }
        ]))
        .unwrap();
        match input {
            AgentInput::Messages(messages) => {
                let call = &messages[0].tool_calls.as_ref().unwrap()[0];
                assert_eq!(call.call_type, "function");
            }
            other => panic!("expected messages, got {other:?}"),
        }
    }

    #[test]
    fn tool_call_without_id_or_function_fails() {
        let err = AgentInput::from_document(&json!([
            {
                "role": "assistant",
                "content": [{"type": "text", "text": "on it"}],
                "toolCalls": [{"function": {"name": "lookup", "arguments": "{}"}}]
            }
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("ToolCall must have 'id' and 'function' fields"));
    }

    #[test]
    fn tool_function_requires_name_and_arguments() {
        let err = AgentInput::from_document(&json!([
            {
                "role": "assistant",
                "content": [{"type": "text", "text": "on it"}],
                "toolCalls": [{"id": "call_1", "function": {"name": "lookup"}}]
            }
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("ToolFunction must have 'name' and 'arguments' fields"));
    }

    #[test]
    fn message_content_containing_a_message_fails() {
        let err = AgentInput::from_document(&json!([
            {
                "role": "user",
                "content": [{"role": "user", "content": []}]
            }
        ]))
        .unwrap_err();
        assert!(err
            .to_string()
            .contains("Expected ContentBlock at index 0 but found Message"));
    }

    #[test]
    fn media_source_errors_are_specific() {
        let missing_source = AgentInput::from_document(&json!([{"type": "image"}])).unwrap_err();
        assert!(missing_source.to_string().contains("Image source cannot be null"));

        let blank_format = AgentInput::from_document(&json!([
            {"type": "image", "source": {"type": "url", "format": "  ", "data": "https://e.com/i.jpg"}}
        ]))
        .unwrap_err();
        assert!(blank_format.to_string().contains("Image format is required"));

        let bad_source_type = AgentInput::from_document(&json!([
            {"type": "video", "source": {"type": "ftp", "format": "mp4", "data": "x"}}
        ]))
        .unwrap_err();
        assert!(bad_source_type
            .to_string()
            .contains("Invalid source type. Supported types: BYTES, URL"));

        let missing_data = AgentInput::from_document(&json!([
            {"type": "document", "source": {"type": "url", "format": "pdf"}}
        ]))
        .unwrap_err();
        assert!(missing_data.to_string().contains("Document data is required"));
    }

    #[test]
    fn unknown_content_type_is_rejected() {
        let err = AgentInput::from_document(&json!([{"type": "audio", "text": "x"}])).unwrap_err();
        assert!(err.to_string().contains("Invalid content type 'AUDIO'"));
    }

    #[test]
    fn encode_omits_absent_optional_fields() {
        let input = AgentInput::Messages(vec![Message::new(
            "user".to_string(),
            vec![ContentBlock::new_text("hi".to_string())],
        )]);
        let doc = input.to_document();
        let message = &doc.as_array().unwrap()[0];
        assert!(message.get("toolCalls").is_none());
        assert!(message.get("toolCallId").is_none());
        let block = &message["content"].as_array().unwrap()[0];
        assert!(block.get("source").is_none());
        assert_eq!(block["type"], json!("text"));
    }

    #[test]
    fn serde_round_trip_through_json_string() {
        let input = AgentInput::Messages(vec![Message::with_tool_calls(
            "assistant".to_string(),
            vec![ContentBlock::new_text("working".to_string())],
            vec![ToolCall::new(
                "call_9".to_string(),
                ToolFunction::new("search".to_string(), r#"{"q":"rust"}"#.to_string()),
            )],
        )]);
        let encoded = serde_json::to_string(&input).unwrap();
        let decoded: AgentInput = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, input);
    }

    #[test]
    fn media_block_document_round_trip() {
        let input = AgentInput::ContentBlocks(vec![ContentBlock::new_image(MediaContent::new(
            SourceType::Bytes,
            "png".to_string(),
            "aGVsbG8=".to_string(),
        ))]);
        let decoded = AgentInput::from_document(&input.to_document()).unwrap();
        assert_eq!(decoded, input);
    }
}
