//! Binary wire codec for agent input.
//!
//! The wire form is used for internal node-to-node transport: a kind
//! discriminator string first, then the shape-specific payload. Optional
//! message fields are encoded behind explicit presence flags, so `None`
//! and `Some("")` stay distinguishable. The caller owns the underlying
//! stream and supplies it already positioned; this module never opens or
//! closes the transport.

use std::io::{Read, Write};
use std::str::FromStr;

use log::trace;

use crate::error::{InputError, Result};
use crate::types::{
    AgentInput, ContentBlock, ContentType, InputKind, MediaContent, Message, SourceType, ToolCall,
    ToolFunction,
};

/// Writer of the wire primitives: length-prefixed UTF-8 strings,
/// big-endian signed 32-bit integers, and single-byte booleans.
pub struct WireWriter<W: Write> {
    sink: W,
}

impl<W: Write> WireWriter<W> {
    /// Wrap a caller-supplied sink.
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    /// Write a signed 32-bit integer, big-endian.
    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.sink.write_all(&value.to_be_bytes())?;
        Ok(())
    }

    /// Write a boolean as a single 0/1 byte.
    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.sink.write_all(&[u8::from(value)])?;
        Ok(())
    }

    /// Write a string as an i32 byte length followed by UTF-8 bytes.
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        let len = i32::try_from(value.len())
            .map_err(|_| InputError::wire("String too long for wire encoding"))?;
        self.write_i32(len)?;
        self.sink.write_all(value.as_bytes())?;
        Ok(())
    }
}

/// Reader of the wire primitives written by [`WireWriter`].
pub struct WireReader<R: Read> {
    source: R,
}

impl<R: Read> WireReader<R> {
    /// Wrap a caller-supplied source.
    pub fn new(source: R) -> Self {
        Self { source }
    }

    /// Read a signed 32-bit integer, big-endian.
    pub fn read_i32(&mut self) -> Result<i32> {
        let mut buf = [0u8; 4];
        self.source.read_exact(&mut buf)?;
        Ok(i32::from_be_bytes(buf))
    }

    /// Read a boolean; any byte other than 0 or 1 is a decode error.
    pub fn read_bool(&mut self) -> Result<bool> {
        let mut buf = [0u8; 1];
        self.source.read_exact(&mut buf)?;
        match buf[0] {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(InputError::wire(format!(
                "Invalid boolean byte on wire: {other}"
            ))),
        }
    }

    /// Read a length-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_i32()?;
        if len < 0 {
            return Err(InputError::wire(format!(
                "Negative string length on wire: {len}"
            )));
        }
        let mut buf = vec![0u8; len as usize];
        self.source.read_exact(&mut buf)?;
        String::from_utf8(buf)
            .map_err(|e| InputError::wire(format!("Invalid UTF-8 string on wire: {e}")))
    }
}

/// Encode an agent input onto a caller-supplied sink.
pub fn encode<W: Write>(input: &AgentInput, sink: W) -> Result<()> {
    let mut out = WireWriter::new(sink);
    out.write_string(input.kind().as_str())?;
    match input {
        AgentInput::Text(text) => out.write_string(text),
        AgentInput::ContentBlocks(blocks) => write_content_blocks(&mut out, blocks),
        AgentInput::Messages(messages) => write_messages(&mut out, messages),
    }
}

/// Decode an agent input from a caller-supplied source.
///
/// The kind discriminator is read first and drives dispatch; a truncated
/// or malformed stream fails without a partially-built value becoming
/// observable.
pub fn decode<R: Read>(source: R) -> Result<AgentInput> {
    let mut input = WireReader::new(source);
    let kind = InputKind::from_str(&input.read_string()?)?;
    trace!("decoding wire input of kind {kind}");
    match kind {
        InputKind::Text => Ok(AgentInput::Text(input.read_string()?)),
        InputKind::ContentBlocks => Ok(AgentInput::ContentBlocks(read_content_blocks(&mut input)?)),
        InputKind::Messages => Ok(AgentInput::Messages(read_messages(&mut input)?)),
    }
}

fn write_content_blocks<W: Write>(out: &mut WireWriter<W>, blocks: &[ContentBlock]) -> Result<()> {
    out.write_i32(list_len(blocks.len())?)?;
    for block in blocks {
        write_content_block(out, block)?;
    }
    Ok(())
}

fn write_content_block<W: Write>(out: &mut WireWriter<W>, block: &ContentBlock) -> Result<()> {
    out.write_string(block.block_type.as_str())?;
    match block.block_type {
        ContentType::Text => {
            let text = block.text.as_deref().ok_or_else(|| {
                InputError::validation("Text content block cannot have null or empty text")
            })?;
            out.write_string(text)
        }
        ContentType::Image => {
            let image = block.image.as_ref().ok_or_else(|| {
                InputError::validation("Image content block must have image data")
            })?;
            write_media(out, image)
        }
        ContentType::Video => {
            let video = block.video.as_ref().ok_or_else(|| {
                InputError::validation("Video content block must have video data")
            })?;
            write_media(out, video)
        }
        ContentType::Document => {
            let document = block.document.as_ref().ok_or_else(|| {
                InputError::validation("Document content block must have document data")
            })?;
            write_media(out, document)
        }
    }
}

fn write_media<W: Write>(out: &mut WireWriter<W>, media: &MediaContent) -> Result<()> {
    out.write_string(media.source_type.as_str())?;
    out.write_string(&media.format)?;
    out.write_string(&media.data)
}

fn write_messages<W: Write>(out: &mut WireWriter<W>, messages: &[Message]) -> Result<()> {
    out.write_i32(list_len(messages.len())?)?;
    for message in messages {
        write_message(out, message)?;
    }
    Ok(())
}

fn write_message<W: Write>(out: &mut WireWriter<W>, message: &Message) -> Result<()> {
    out.write_string(&message.role)?;
    write_content_blocks(out, &message.content)?;

    match &message.tool_calls {
        Some(tool_calls) => {
            out.write_bool(true)?;
            out.write_i32(list_len(tool_calls.len())?)?;
            for tool_call in tool_calls {
                write_tool_call(out, tool_call)?;
            }
        }
        None => out.write_bool(false)?,
    }

    match &message.tool_call_id {
        Some(tool_call_id) => {
            out.write_bool(true)?;
            out.write_string(tool_call_id)?;
        }
        None => out.write_bool(false)?,
    }
    Ok(())
}

fn write_tool_call<W: Write>(out: &mut WireWriter<W>, tool_call: &ToolCall) -> Result<()> {
    out.write_string(&tool_call.id)?;
    out.write_string(&tool_call.call_type)?;
    out.write_string(&tool_call.function.name)?;
    out.write_string(&tool_call.function.arguments)
}

fn read_content_blocks<R: Read>(input: &mut WireReader<R>) -> Result<Vec<ContentBlock>> {
    let size = read_list_len(input)?;
    let mut blocks = Vec::with_capacity(size);
    for _ in 0..size {
        blocks.push(read_content_block(input)?);
    }
    Ok(blocks)
}

fn read_content_block<R: Read>(input: &mut WireReader<R>) -> Result<ContentBlock> {
    let block_type = ContentType::from_str(&input.read_string()?)?;
    match block_type {
        ContentType::Text => Ok(ContentBlock::new_text(input.read_string()?)),
        ContentType::Image => Ok(ContentBlock::new_image(read_media(input)?)),
        ContentType::Video => Ok(ContentBlock::new_video(read_media(input)?)),
        ContentType::Document => Ok(ContentBlock::new_document(read_media(input)?)),
    }
}

fn read_media<R: Read>(input: &mut WireReader<R>) -> Result<MediaContent> {
    let source_type = SourceType::from_str(&input.read_string()?)?;
    let format = input.read_string()?;
    let data = input.read_string()?;
    Ok(MediaContent::new(source_type, format, data))
}

fn read_messages<R: Read>(input: &mut WireReader<R>) -> Result<Vec<Message>> {
    let size = read_list_len(input)?;
    let mut messages = Vec::with_capacity(size);
    for _ in 0..size {
        messages.push(read_message(input)?);
    }
    Ok(messages)
}

fn read_message<R: Read>(input: &mut WireReader<R>) -> Result<Message> {
    let role = input.read_string()?;
    let content = read_content_blocks(input)?;
    let mut message = Message::new(role, content);

    if input.read_bool()? {
        let size = read_list_len(input)?;
        let mut tool_calls = Vec::with_capacity(size);
        for _ in 0..size {
            tool_calls.push(read_tool_call(input)?);
        }
        message.tool_calls = Some(tool_calls);
    }

    if input.read_bool()? {
        message.tool_call_id = Some(input.read_string()?);
    }
    Ok(message)
}

fn read_tool_call<R: Read>(input: &mut WireReader<R>) -> Result<ToolCall> {
    let id = input.read_string()?;
    let call_type = input.read_string()?;
    let name = input.read_string()?;
    let arguments = input.read_string()?;
    Ok(ToolCall {
        id,
        call_type,
        function: ToolFunction::new(name, arguments),
    })
}

fn list_len(len: usize) -> Result<i32> {
    i32::try_from(len).map_err(|_| InputError::wire("List too long for wire encoding"))
}

fn read_list_len<R: Read>(input: &mut WireReader<R>) -> Result<usize> {
    let size = input.read_i32()?;
    if size < 0 {
        return Err(InputError::wire(format!(
            "Negative list length on wire: {size}"
        )));
    }
    Ok(size as usize)
}
