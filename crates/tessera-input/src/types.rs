//! Core types for standardized agent input.

use std::fmt;
use std::str::FromStr;

use crate::error::InputError;

/// The kind of content carried by a single content block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    /// Plain text content.
    Text,
    /// An image payload.
    Image,
    /// A video payload.
    Video,
    /// A document payload.
    Document,
}

impl ContentType {
    /// The wire discriminator for this content type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Text => "TEXT",
            ContentType::Image => "IMAGE",
            ContentType::Video => "VIDEO",
            ContentType::Document => "DOCUMENT",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TEXT" => Ok(ContentType::Text),
            "IMAGE" => Ok(ContentType::Image),
            "VIDEO" => Ok(ContentType::Video),
            "DOCUMENT" => Ok(ContentType::Document),
            other => Err(InputError::parse(format!(
                "Invalid content type '{other}'. Supported types: TEXT, IMAGE, VIDEO, DOCUMENT"
            ))),
        }
    }
}

/// How a media payload is sourced: inline bytes or a URL reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    /// Inline (typically base64-encoded) bytes.
    Bytes,
    /// A URL pointing at the media.
    Url,
}

impl SourceType {
    /// The wire discriminator for this source type.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Bytes => "BYTES",
            SourceType::Url => "URL",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BYTES" => Ok(SourceType::Bytes),
            "URL" => Ok(SourceType::Url),
            _ => Err(InputError::parse(
                "Invalid source type. Supported types: BYTES, URL",
            )),
        }
    }
}

/// A media payload shared by image, video, and document blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaContent {
    /// How the payload is sourced.
    pub source_type: SourceType,
    /// Format tag for the payload (e.g. "jpeg", "mp4", "pdf").
    pub format: String,
    /// The payload itself: a URL or encoded bytes, per `source_type`.
    pub data: String,
}

impl MediaContent {
    /// Create a new media payload.
    pub fn new(source_type: SourceType, format: String, data: String) -> Self {
        Self {
            source_type,
            format,
            data,
        }
    }
}

/// One unit of multi-modal content.
///
/// Exactly one of the payload fields is expected to be populated, and it
/// must be the one matching `block_type`. That invariant is checked by
/// [`crate::validate::validate`], not at construction time, so staged
/// construction during decode stays possible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBlock {
    /// The declared kind of this block.
    pub block_type: ContentType,
    /// Text payload, for text blocks.
    pub text: Option<String>,
    /// Image payload, for image blocks.
    pub image: Option<MediaContent>,
    /// Video payload, for video blocks.
    pub video: Option<MediaContent>,
    /// Document payload, for document blocks.
    pub document: Option<MediaContent>,
}

impl ContentBlock {
    /// Create a new text content block.
    pub fn new_text(text: String) -> Self {
        Self {
            block_type: ContentType::Text,
            text: Some(text),
            image: None,
            video: None,
            document: None,
        }
    }

    /// Create a new image content block.
    pub fn new_image(image: MediaContent) -> Self {
        Self {
            block_type: ContentType::Image,
            text: None,
            image: Some(image),
            video: None,
            document: None,
        }
    }

    /// Create a new video content block.
    pub fn new_video(video: MediaContent) -> Self {
        Self {
            block_type: ContentType::Video,
            text: None,
            image: None,
            video: Some(video),
            document: None,
        }
    }

    /// Create a new document content block.
    pub fn new_document(document: MediaContent) -> Self {
        Self {
            block_type: ContentType::Document,
            text: None,
            image: None,
            video: None,
            document: Some(document),
        }
    }
}

/// A function invocation requested by an assistant message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolFunction {
    /// The name of the function to call.
    pub name: String,
    /// The arguments to pass, as an opaque (typically JSON) string.
    pub arguments: String,
}

impl ToolFunction {
    /// Create a new tool function.
    pub fn new(name: String, arguments: String) -> Self {
        Self { name, arguments }
    }
}

/// A tool call, modeled after OpenAI tool calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCall {
    /// Unique identifier for the tool call.
    pub id: String,
    /// The type of tool call. Defaults to "function" in document form.
    pub call_type: String,
    /// The function call details.
    pub function: ToolFunction,
}

impl ToolCall {
    /// Create a new tool call of type "function".
    pub fn new(id: String, function: ToolFunction) -> Self {
        Self {
            id,
            call_type: "function".to_string(),
            function,
        }
    }
}

/// A message in a conversation.
///
/// `role` is an open string: any value is structurally legal, and the
/// semantic meaning of roles like "assistant" or "tool" is a consumer
/// concern. `tool_calls` and `tool_call_id` are independently optional
/// regardless of role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// The role of the message author (e.g. "user", "assistant", "tool").
    pub role: String,
    /// The content blocks making up the message body.
    pub content: Vec<ContentBlock>,
    /// Tool calls requested by this message, if any.
    pub tool_calls: Option<Vec<ToolCall>>,
    /// The tool call this message is a result of, if any.
    pub tool_call_id: Option<String>,
}

impl Message {
    /// Create a new message with the given role and content.
    pub fn new(role: String, content: Vec<ContentBlock>) -> Self {
        Self {
            role,
            content,
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Create a new message carrying tool calls.
    pub fn with_tool_calls(role: String, content: Vec<ContentBlock>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role,
            content,
            tool_calls: Some(tool_calls),
            tool_call_id: None,
        }
    }

    /// Create a new tool-result message.
    pub fn with_tool_call_id(role: String, content: Vec<ContentBlock>, tool_call_id: String) -> Self {
        Self {
            role,
            content,
            tool_calls: None,
            tool_call_id: Some(tool_call_id),
        }
    }
}

/// The three mutually exclusive shapes an agent input can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Plain text input.
    Text,
    /// A standalone array of content blocks.
    ContentBlocks,
    /// A message-based conversation.
    Messages,
}

impl InputKind {
    /// The wire discriminator for this input kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Text => "TEXT",
            InputKind::ContentBlocks => "CONTENT_BLOCKS",
            InputKind::Messages => "MESSAGES",
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputKind {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TEXT" => Ok(InputKind::Text),
            "CONTENT_BLOCKS" => Ok(InputKind::ContentBlocks),
            "MESSAGES" => Ok(InputKind::Messages),
            other => Err(InputError::InvalidInputType {
                found: other.to_string(),
            }),
        }
    }
}

/// Standardized agent input.
///
/// Wraps exactly one payload in one of three shapes: plain text,
/// multi-modal content blocks, or a message-based conversation. The shape
/// is carried by the variant itself, so consumers dispatch with an
/// exhaustive `match` instead of inspecting element types at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentInput {
    /// Plain text input.
    Text(String),
    /// Multi-modal content blocks.
    ContentBlocks(Vec<ContentBlock>),
    /// A message-based conversation.
    Messages(Vec<Message>),
}

impl AgentInput {
    /// Create a plain-text input.
    pub fn text(text: impl Into<String>) -> Self {
        AgentInput::Text(text.into())
    }

    /// The kind of this input.
    pub fn kind(&self) -> InputKind {
        match self {
            AgentInput::Text(_) => InputKind::Text,
            AgentInput::ContentBlocks(_) => InputKind::ContentBlocks,
            AgentInput::Messages(_) => InputKind::Messages,
        }
    }
}
