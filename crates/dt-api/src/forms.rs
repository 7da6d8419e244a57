//! Form decoding: multipart payloads of the category/spot overlays, the
//! button that was pressed, and the urlencoded moderation/quest forms.

use std::collections::HashMap;
use std::str::FromStr;

use actix_multipart::Multipart;
use bytes::BytesMut;
use dt_core::drafts::{CategoryDraft, ModerationDraft, QuestDraft, SpotDraft};
use dt_core::error::{AppError, Result, ValidationError};
use dt_core::models::{Attachment, MajorType, SubType};
use futures_util::TryStreamExt;
use serde::Deserialize;

/// Upper bound for one uploaded file.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Which overlay button submitted the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOp {
    /// Re-render with the typed values (e.g. after changing the major type)
    Refresh,
    Submit,
    Cancel,
    AddTag,
    RemoveTag(String),
    Search,
    Pick(i64),
    Unpick(i64),
}

impl FormOp {
    /// Unknown or missing values (Enter pressed in a text box) refresh.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else { return FormOp::Refresh };
        match raw.split_once(':') {
            Some(("untag", tag)) => FormOp::RemoveTag(tag.to_string()),
            Some(("pick", id)) => id.parse().map(FormOp::Pick).unwrap_or(FormOp::Refresh),
            Some(("unpick", id)) => id.parse().map(FormOp::Unpick).unwrap_or(FormOp::Refresh),
            _ => match raw {
                "submit" => FormOp::Submit,
                "cancel" => FormOp::Cancel,
                "tag" => FormOp::AddTag,
                "search" => FormOp::Search,
                _ => FormOp::Refresh,
            },
        }
    }
}

/// A fully buffered multipart form.
#[derive(Debug, Default)]
pub struct MultipartFields {
    text: HashMap<String, String>,
    files: Vec<(String, Attachment)>,
}

impl MultipartFields {
    pub async fn read(mut payload: Multipart) -> Result<Self> {
        let mut fields = Self::default();
        while let Some(mut field) = payload.try_next().await.map_err(malformed)? {
            let disposition = field.content_disposition().clone();
            let name = disposition.get_name().unwrap_or_default().to_string();
            let file_name = disposition.get_filename().map(str::to_string);
            let content_type = field.content_type().map(|m| m.essence_str().to_string());

            let mut buf = BytesMut::new();
            while let Some(chunk) = field.try_next().await.map_err(malformed)? {
                if buf.len() + chunk.len() > MAX_UPLOAD_BYTES {
                    return Err(AppError::Conflict(format!(
                        "{name} exceeds {} MiB",
                        MAX_UPLOAD_BYTES / 1024 / 1024
                    )));
                }
                buf.extend_from_slice(&chunk);
            }

            match file_name {
                // Browsers send an empty part for an untouched file input.
                Some(file_name) if file_name.is_empty() || buf.is_empty() => {}
                Some(file_name) => {
                    let attachment = Attachment::new(file_name, content_type.as_deref(), buf.freeze());
                    fields.files.push((name, attachment));
                }
                None => {
                    fields.text.insert(name, String::from_utf8_lossy(&buf).into_owned());
                }
            }
        }
        Ok(fields)
    }

    pub fn with_text(mut self, name: &str, value: &str) -> Self {
        self.text.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_file(mut self, name: &str, attachment: Attachment) -> Self {
        self.files.push((name.to_string(), attachment));
        self
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.text.get(name).map(String::as_str)
    }

    pub fn op(&self) -> FormOp {
        FormOp::parse(self.text("op"))
    }

    pub fn file(&self, name: &str) -> Option<&Attachment> {
        self.files.iter().find(|(n, _)| n == name).map(|(_, a)| a)
    }

    pub fn files<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Attachment> + 'a {
        self.files.iter().filter(move |(n, _)| n == name).map(|(_, a)| a)
    }

    /// Copies the plain fields of the category form into the draft.
    pub fn apply_to_category(&self, draft: &mut CategoryDraft) {
        if let Some(name) = self.text("name") {
            draft.name = name.to_string();
        }
        if let Some(major) = self.text("major").and_then(MajorType::from_code) {
            draft.set_major(major);
        }
        // A sub type left over from the previous major is ignored.
        if let Some(sub) = self.text("sub").and_then(SubType::from_code) {
            if sub.major() == draft.major {
                draft.sub = sub;
            }
        }
        if let Some(image) = self.file("image") {
            draft.image = Some(image.clone());
        }
    }

    pub fn apply_to_spot(&self, draft: &mut SpotDraft) -> Result<()> {
        if let Some(name) = self.text("name") {
            draft.name = name.to_string();
        }
        if let Some(address) = self.text("address") {
            draft.address = address.to_string();
        }
        if let Some(raw) = self.text("point_x") {
            draft.point_x = parse_number(raw, "longitude")?;
        }
        if let Some(raw) = self.text("point_y") {
            draft.point_y = parse_number(raw, "latitude")?;
        }
        if let Some(image) = self.file("image") {
            draft.image = Some(image.clone());
        }
        let stills: Vec<Attachment> = self.files("images").cloned().collect();
        if !stills.is_empty() {
            draft.still_cuts = stills;
        }
        Ok(())
    }
}

fn malformed(e: actix_multipart::MultipartError) -> AppError {
    AppError::Conflict(format!("malformed upload: {e}"))
}

/// Blank input counts as zero.
pub fn parse_number<T: FromStr + Default>(raw: &str, field: &'static str) -> Result<T> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(T::default());
    }
    raw.parse().map_err(|_| ValidationError::InvalidNumber(field).into())
}

/// Suspension overlay (members and reports). Checkboxes are absent when
/// unchecked.
#[derive(Debug, Deserialize)]
pub struct ModerationForm {
    #[serde(default)]
    pub op: Option<String>,
    #[serde(default)]
    pub should_delete_content: bool,
    #[serde(default)]
    pub should_permanently_ban: bool,
    #[serde(default)]
    pub suspension_days: String,
}

impl ModerationForm {
    pub fn op(&self) -> FormOp {
        FormOp::parse(self.op.as_deref())
    }

    pub fn apply(&self, draft: &mut ModerationDraft) -> Result<()> {
        draft.should_delete_content = self.should_delete_content;
        draft.should_permanently_ban = self.should_permanently_ban;
        draft.suspension_days = parse_number(&self.suspension_days, "suspension days")?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct QuestForm {
    #[serde(default)]
    pub op: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub action_type: String,
    #[serde(default)]
    pub condition_count: String,
    #[serde(default)]
    pub reward_exp: String,
    #[serde(default)]
    pub reward_id: String,
}

impl QuestForm {
    pub fn op(&self) -> FormOp {
        FormOp::parse(self.op.as_deref())
    }

    pub fn apply(&self, draft: &mut QuestDraft) -> Result<()> {
        draft.title = self.title.clone();
        draft.body = self.body.clone();
        draft.action_type = self.action_type.clone();
        draft.condition_count = parse_number(&self.condition_count, "condition count")?;
        draft.reward_exp = parse_number(&self.reward_exp, "reward EXP")?;
        draft.reward_id = match self.reward_id.trim() {
            "" => None,
            raw => Some(parse_number(raw, "reward id")?),
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn ops_parse() {
        assert_eq!(FormOp::parse(Some("submit")), FormOp::Submit);
        assert_eq!(FormOp::parse(Some("pick:42")), FormOp::Pick(42));
        assert_eq!(FormOp::parse(Some("unpick:7")), FormOp::Unpick(7));
        assert_eq!(FormOp::parse(Some("untag:seoul:night")), FormOp::RemoveTag("seoul:night".into()));
        assert_eq!(FormOp::parse(Some("pick:x")), FormOp::Refresh);
        assert_eq!(FormOp::parse(None), FormOp::Refresh);
    }

    #[test]
    fn category_fields_ignore_mismatched_sub() {
        let mut draft = CategoryDraft::default();
        MultipartFields::default()
            .with_text("name", "Parasite")
            .with_text("major", "CONTENT")
            .with_text("sub", "PERSON_SINGER")
            .apply_to_category(&mut draft);
        assert_eq!(draft.name, "Parasite");
        assert_eq!(draft.major, MajorType::Content);
        assert_eq!(draft.sub.major(), MajorType::Content);
    }

    #[test]
    fn spot_fields_collect_still_cuts() {
        let mut draft = SpotDraft::default();
        MultipartFields::default()
            .with_text("name", "Namsan Tower")
            .with_text("point_x", "126.98")
            .with_text("point_y", "")
            .with_file("image", Attachment::new("main.jpg", None, Bytes::from_static(b"1")))
            .with_file("images", Attachment::new("a.png", None, Bytes::from_static(b"2")))
            .with_file("images", Attachment::new("b.png", None, Bytes::from_static(b"3")))
            .apply_to_spot(&mut draft)
            .unwrap();
        assert_eq!(draft.point_x, 126.98);
        assert_eq!(draft.point_y, 0.0);
        assert_eq!(draft.image.as_ref().map(|a| a.file_name.as_str()), Some("main.jpg"));
        assert_eq!(draft.still_cuts.len(), 2);
    }

    #[test]
    fn bad_numbers_are_validation_errors() {
        let mut draft = SpotDraft::default();
        let err = MultipartFields::default()
            .with_text("point_x", "east")
            .apply_to_spot(&mut draft)
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn moderation_form_reads_checkboxes() {
        let form = ModerationForm {
            op: Some("submit".into()),
            should_delete_content: false,
            should_permanently_ban: true,
            suspension_days: "30".into(),
        };
        let mut draft = ModerationDraft::default();
        form.apply(&mut draft).unwrap();
        assert_eq!(form.op(), FormOp::Submit);
        assert_eq!(draft.to_action(9).suspension_days, 0);
    }

    #[test]
    fn quest_reward_id_is_optional() {
        let form = QuestForm {
            op: None,
            title: "Visit".into(),
            body: "Visit three spots".into(),
            action_type: "VISIT".into(),
            condition_count: "3".into(),
            reward_exp: "".into(),
            reward_id: " ".into(),
        };
        let mut draft = QuestDraft::default();
        form.apply(&mut draft).unwrap();
        assert_eq!(draft.condition_count, 3);
        assert_eq!(draft.reward_exp, 0);
        assert_eq!(draft.reward_id, None);
    }
}
