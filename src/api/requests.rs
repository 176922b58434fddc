// src/api/requests.rs
//! Request bodies for the Notion write endpoints.

use super::types::{NewBlock, PropertyUpdate, PropertyUpdates};
use crate::model::{Block, BlockKind, TextBlockContent};
use crate::types::{Annotations, BlockId, MentionData, RichTextItem, RichTextType};
use serde_json::{json, Map, Value};

/// Encodes spans in order, preserving annotations and link targets.
pub fn rich_text_json(items: &[RichTextItem]) -> Value {
    Value::Array(items.iter().map(span_json).collect())
}

fn span_json(item: &RichTextItem) -> Value {
    let annotations = annotations_json(&item.annotations);
    match &item.text_type {
        RichTextType::Text { content, link } => json!({
            "type": "text",
            "text": {
                "content": content,
                "link": link.as_ref().map(|l| json!({ "url": l.url })),
            },
            "annotations": annotations,
        }),
        RichTextType::Mention(mention) => match mention_json(mention) {
            Some(mention) => json!({
                "type": "mention",
                "mention": mention,
                "annotations": annotations,
            }),
            // No writable form: keep the visible text and its link.
            None => json!({
                "type": "text",
                "text": {
                    "content": item.plain_text,
                    "link": item.href.as_ref().map(|url| json!({ "url": url })),
                },
                "annotations": annotations,
            }),
        },
        RichTextType::Equation { expression } => json!({
            "type": "equation",
            "equation": { "expression": expression },
            "annotations": annotations,
        }),
    }
}

fn mention_json(mention: &MentionData) -> Option<Value> {
    let value = match mention {
        MentionData::User { id } => json!({ "type": "user", "user": { "id": id } }),
        MentionData::Page { id } => json!({ "type": "page", "page": { "id": id } }),
        MentionData::Database { id } => {
            json!({ "type": "database", "database": { "id": id } })
        }
        MentionData::Date { start, end } => json!({
            "type": "date",
            "date": {
                "start": start.format("%Y-%m-%d").to_string(),
                "end": end.map(|d| d.format("%Y-%m-%d").to_string()),
            }
        }),
        MentionData::LinkPreview { .. } | MentionData::Other => return None,
    };
    Some(value)
}

fn annotations_json(annotations: &Annotations) -> Value {
    json!({
        "bold": annotations.bold,
        "italic": annotations.italic,
        "strikethrough": annotations.strikethrough,
        "underline": annotations.underline,
        "code": annotations.code,
        "color": annotations.color.as_str(),
    })
}

/// The typed payload object for a text-bearing block.
fn text_payload(content: &TextBlockContent) -> Map<String, Value> {
    let mut payload = Map::new();
    payload.insert("rich_text".to_string(), rich_text_json(&content.rich_text));
    payload.insert(
        "color".to_string(),
        Value::String(content.color.as_str().to_string()),
    );
    payload
}

fn new_block_json(block: &NewBlock) -> Value {
    let mut payload = text_payload(block.content());
    match block.kind() {
        BlockKind::ToDo => {
            payload.insert("checked".to_string(), Value::Bool(false));
        }
        BlockKind::Code => {
            payload.remove("color");
            payload.insert("language".to_string(), json!("plain text"));
        }
        _ => {}
    }
    let kind = block.kind().as_str();
    let mut body = Map::new();
    body.insert("object".to_string(), json!("block"));
    body.insert("type".to_string(), json!(kind));
    body.insert(kind.to_string(), Value::Object(payload));
    Value::Object(body)
}

/// Body for `PATCH blocks/{parent}/children`.
pub fn append_children_body(children: &[NewBlock], after: Option<&BlockId>) -> Value {
    let mut body = json!({
        "children": children.iter().map(new_block_json).collect::<Vec<_>>(),
    });
    if let Some(after) = after {
        body["after"] = json!(after.to_dashed());
    }
    body
}

/// Body for `PATCH blocks/{id}`, rewriting the block's text payload in place.
///
/// Returns `None` for blocks whose payload is not rich text.
pub fn update_block_body(block: &Block) -> Option<Value> {
    let mut payload = text_payload(block.text()?);
    match block {
        Block::ToDo(todo) => {
            payload.insert("checked".to_string(), Value::Bool(todo.checked));
        }
        Block::Code(code) => {
            payload.remove("color");
            payload.insert("language".to_string(), json!(code.language));
        }
        _ => {}
    }
    let mut body = Map::new();
    body.insert(block.block_type().to_string(), Value::Object(payload));
    Some(Value::Object(body))
}

/// Body for `PATCH pages/{id}`.
pub fn property_updates_body(updates: &PropertyUpdates) -> Value {
    let properties: Map<String, Value> = updates
        .iter()
        .map(|(name, update)| {
            let value = match update {
                PropertyUpdate::Url(url) => json!({ "url": url }),
                PropertyUpdate::RichTextChunks(chunks) => json!({
                    "rich_text": chunks
                        .iter()
                        .map(|chunk| json!({ "type": "text", "text": { "content": chunk } }))
                        .collect::<Vec<_>>(),
                }),
            };
            (name.clone(), value)
        })
        .collect();
    json!({ "properties": properties })
}

/// Body for `POST search`, restricted to pages.
pub fn search_pages_body(page_size: usize, cursor: Option<&str>) -> Value {
    let mut body = json!({
        "filter": { "property": "object", "value": "page" },
        "page_size": page_size,
    });
    if let Some(cursor) = cursor {
        body["start_cursor"] = json!(cursor);
    }
    body
}

/// Body for `POST databases/{id}/query`.
pub fn query_body(page_size: usize, cursor: Option<&str>) -> Value {
    let mut body = json!({ "page_size": page_size });
    if let Some(cursor) = cursor {
        body["start_cursor"] = json!(cursor);
    }
    body
}
