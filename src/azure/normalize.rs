use crate::azure::models::{Comment, CommentRecord, IdentityRef, WorkItem, WorkItemResource};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

// Text cleanup patterns, compiled once
static RE_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r" +").unwrap());
static RE_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n+").unwrap());
static RE_LEADING_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ ]+").unwrap());
static RE_TRAILING_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ ]+\n").unwrap());
static RE_IMAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\[image\]").unwrap());

/// Fields requested from the batch endpoint; everything `normalize_work_item` reads.
pub const WORK_ITEM_FIELDS: [&str; 13] = [
    "System.Id",
    "System.Title",
    "System.WorkItemType",
    "System.State",
    "System.AssignedTo",
    "System.AreaPath",
    "System.IterationPath",
    "System.Description",
    "System.CreatedDate",
    "System.ChangedDate",
    "System.Tags",
    "Microsoft.VSTS.Common.Priority",
    "Microsoft.VSTS.Scheduling.StoryPoints",
];

pub fn work_item_fields() -> Vec<String> {
    WORK_ITEM_FIELDS.iter().map(|f| f.to_string()).collect()
}

pub fn normalize_work_item(resource: WorkItemResource) -> WorkItem {
    let fields = &resource.fields;
    let text = |name: &str| fields.get(name).and_then(display_value);

    WorkItem {
        id: resource.id,
        title: text("System.Title").unwrap_or_default(),
        work_item_type: text("System.WorkItemType").unwrap_or_default(),
        state: text("System.State").unwrap_or_default(),
        assigned_to: text("System.AssignedTo"),
        area_path: text("System.AreaPath"),
        iteration_path: text("System.IterationPath"),
        description: text("System.Description")
            .map(|html| html_to_text(&html))
            .filter(|d| !d.is_empty()),
        created_date: text("System.CreatedDate"),
        changed_date: text("System.ChangedDate"),
        tags: text("System.Tags")
            .map(|tags| tags.replace("; ", ";"))
            .filter(|t| !t.is_empty()),
        priority: fields
            .get("Microsoft.VSTS.Common.Priority")
            .and_then(Value::as_i64),
        story_points: fields
            .get("Microsoft.VSTS.Scheduling.StoryPoints")
            .and_then(Value::as_f64),
    }
}

pub fn normalize_comment(comment: Comment) -> CommentRecord {
    CommentRecord {
        id: comment.id,
        work_item_id: comment.work_item_id,
        text: html_to_text(&comment.text),
        created_by: comment.created_by.as_ref().and_then(identity_display),
        created_date: comment.created_date,
    }
}

/// Renders a field value as text. Identity objects become
/// `Display Name <unique name>`.
fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Object(_) => serde_json::from_value::<IdentityRef>(value.clone())
            .ok()
            .as_ref()
            .and_then(identity_display),
        _ => None,
    }
}

fn identity_display(identity: &IdentityRef) -> Option<String> {
    let name = identity.display_name.as_deref()?;
    match identity.unique_name.as_deref() {
        Some(unique) if !unique.is_empty() && unique != name => {
            Some(format!("{} <{}>", name, unique))
        }
        _ => Some(name.to_string()),
    }
}

/// Converts rich-text HTML to compact plain text.
pub fn html_to_text(html: &str) -> String {
    let Ok(mut plain_text) = html2text::from_read(html.as_bytes(), usize::MAX) else {
        return html.trim().to_string();
    };

    plain_text = plain_text.replace('\r', "\n");
    plain_text = plain_text.replace('\t', " ");
    plain_text = RE_SPACES.replace_all(&plain_text, " ").to_string();
    plain_text = RE_NEWLINES.replace_all(&plain_text, "\n").to_string();
    plain_text = RE_LEADING_WS.replace_all(&plain_text, "\n").to_string();
    plain_text = RE_TRAILING_WS.replace_all(&plain_text, "\n").to_string();
    plain_text = RE_IMAGE.replace_all(&plain_text, "").to_string();

    plain_text.trim().to_string()
}
