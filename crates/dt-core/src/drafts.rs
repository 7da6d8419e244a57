//! # Drafts
//!
//! Transient form state for create/edit/suspend overlays. A draft lives only
//! while its overlay is open and mirrors the server's request payload.

use serde::Serialize;

use crate::error::{Result, ValidationError};
use crate::models::{Attachment, Category, MajorType, MultipartSubmission, Spot, SubType};
use crate::selection::{SelectionSet, TagList};

/// Form state that can be checked before it is submitted.
pub trait Draft {
    /// Required-field checks only; everything else is the server's call.
    fn validate(&self) -> std::result::Result<(), ValidationError>;
}

fn require(value: &str, field: &'static str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(())
    }
}

// ---------- Moderation ----------

/// Suspension/ban request for a member or the author of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationAction {
    #[serde(skip)]
    pub target_id: i64,
    pub should_delete_content: bool,
    pub should_permanently_ban: bool,
    pub suspension_days: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModerationDraft {
    pub should_delete_content: bool,
    pub should_permanently_ban: bool,
    pub suspension_days: u32,
}

impl ModerationDraft {
    /// A permanent ban always goes out with zero suspension days.
    pub fn to_action(&self, target_id: i64) -> ModerationAction {
        ModerationAction {
            target_id,
            should_delete_content: self.should_delete_content,
            should_permanently_ban: self.should_permanently_ban,
            suspension_days: if self.should_permanently_ban { 0 } else { self.suspension_days },
        }
    }
}

impl Draft for ModerationDraft {
    fn validate(&self) -> std::result::Result<(), ValidationError> {
        Ok(())
    }
}

// ---------- Categories ----------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySaveReq {
    pub name: String,
    pub category_major_type: MajorType,
    pub category_sub_type: SubType,
    pub hashtag_names: Vec<String>,
    pub spot_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDraft {
    pub name: String,
    pub major: MajorType,
    pub sub: SubType,
    pub tags: TagList,
    pub spots: SelectionSet<Spot>,
    pub image: Option<Attachment>,
}

impl Default for CategoryDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            major: MajorType::Person,
            sub: SubType::PersonSinger,
            tags: TagList::new(),
            spots: SelectionSet::new(),
            image: None,
        }
    }
}

impl CategoryDraft {
    /// Pre-fills an edit form from the selected row.
    pub fn from_category(category: &Category) -> Self {
        let defaults = Self::default();
        let sub = category.sub_type.unwrap_or(defaults.sub);
        let major = category.major_type.unwrap_or_else(|| sub.major());
        Self {
            name: category.name.clone(),
            major,
            sub,
            tags: TagList::from_prefill(&category.hashtags),
            spots: SelectionSet::from_items(category.spot_list.iter().cloned()),
            image: None,
        }
    }

    /// Switching the major type resets a sub type that no longer fits.
    pub fn set_major(&mut self, major: MajorType) {
        self.major = major;
        if self.sub.major() != major {
            self.sub = major.sub_types()[0];
        }
    }

    pub fn save_req(&self) -> CategorySaveReq {
        CategorySaveReq {
            name: self.name.trim().to_string(),
            category_major_type: self.major,
            category_sub_type: self.sub,
            hashtag_names: self.tags.to_vec(),
            spot_ids: self.spots.keys(),
        }
    }

    pub fn to_submission(&self) -> Result<MultipartSubmission> {
        let mut submission = MultipartSubmission::new(&self.save_req())?;
        if let Some(image) = &self.image {
            submission = submission.with_file("image", image.clone());
        }
        Ok(submission)
    }
}

impl Draft for CategoryDraft {
    fn validate(&self) -> std::result::Result<(), ValidationError> {
        require(&self.name, "name")?;
        if self.sub.major() != self.major {
            return Err(ValidationError::SubTypeMismatch);
        }
        Ok(())
    }
}

// ---------- Spots ----------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotSaveReq {
    pub name: String,
    pub address: String,
    pub point_x: f64,
    pub point_y: f64,
    pub category_ids: Vec<i64>,
    pub hashtag_names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpotDraft {
    pub name: String,
    pub address: String,
    pub point_x: f64,
    pub point_y: f64,
    pub categories: SelectionSet<Category>,
    pub tags: TagList,
    /// Representative image
    pub image: Option<Attachment>,
    /// Still cuts, sent as repeated `images` parts
    pub still_cuts: Vec<Attachment>,
}

impl SpotDraft {
    pub fn save_req(&self) -> SpotSaveReq {
        SpotSaveReq {
            name: self.name.trim().to_string(),
            address: self.address.trim().to_string(),
            point_x: self.point_x,
            point_y: self.point_y,
            category_ids: self.categories.keys(),
            hashtag_names: self.tags.to_vec(),
        }
    }

    pub fn to_submission(&self) -> Result<MultipartSubmission> {
        let mut submission = MultipartSubmission::new(&self.save_req())?;
        if let Some(image) = &self.image {
            submission = submission.with_file("image", image.clone());
        }
        for still in &self.still_cuts {
            submission = submission.with_file("images", still.clone());
        }
        Ok(submission)
    }
}

impl Draft for SpotDraft {
    fn validate(&self) -> std::result::Result<(), ValidationError> {
        require(&self.name, "name")?;
        require(&self.address, "address")
    }
}

// ---------- Quests ----------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestSaveReq {
    pub title: String,
    pub body: String,
    pub condition_count: u32,
    pub quest_action_type: String,
    pub reward_exp: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestDraft {
    pub title: String,
    pub body: String,
    pub condition_count: u32,
    pub action_type: String,
    pub reward_exp: u32,
    pub reward_id: Option<i64>,
}

impl QuestDraft {
    pub fn save_req(&self) -> QuestSaveReq {
        QuestSaveReq {
            title: self.title.trim().to_string(),
            body: self.body.trim().to_string(),
            condition_count: self.condition_count,
            quest_action_type: self.action_type.trim().to_string(),
            reward_exp: self.reward_exp,
            reward_id: self.reward_id,
        }
    }
}

impl Draft for QuestDraft {
    fn validate(&self) -> std::result::Result<(), ValidationError> {
        require(&self.title, "title")?;
        require(&self.body, "body")?;
        require(&self.action_type, "action type")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn spot(id: i64) -> Spot {
        serde_json::from_value(serde_json::json!({ "spotId": id, "name": format!("spot {id}") })).unwrap()
    }

    #[test]
    fn permanent_ban_forces_zero_days() {
        let draft = ModerationDraft {
            should_delete_content: true,
            should_permanently_ban: true,
            suspension_days: 30,
        };
        let action = draft.to_action(5);
        assert_eq!(action.suspension_days, 0);
        assert_eq!(
            serde_json::to_value(&action).unwrap(),
            serde_json::json!({
                "shouldDeleteContent": true,
                "shouldPermanentlyBan": true,
                "suspensionDays": 0
            })
        );

        let temporary = ModerationDraft { suspension_days: 7, ..Default::default() }.to_action(5);
        assert_eq!(temporary.suspension_days, 7);
    }

    #[test]
    fn category_submission_has_json_and_image_parts() {
        let mut draft = CategoryDraft { name: " IU ".into(), ..Default::default() };
        draft.tags.add("singer").unwrap();
        draft.spots.insert(spot(3)).unwrap();
        draft.image = Some(Attachment::new("iu.png", None, Bytes::from_static(b"png")));

        let submission = draft.to_submission().unwrap();
        assert_eq!(
            submission.save_req,
            serde_json::json!({
                "name": "IU",
                "categoryMajorType": "PERSON",
                "categorySubType": "PERSON_SINGER",
                "hashtagNames": ["singer"],
                "spotIds": [3]
            })
        );
        assert_eq!(submission.files.len(), 1);
        assert_eq!(submission.files[0].field, "image");
    }

    #[test]
    fn changing_major_resets_foreign_sub_type() {
        let mut draft = CategoryDraft::default();
        draft.set_major(MajorType::Content);
        assert_eq!(draft.sub, SubType::ContentMovie);
        draft.sub = SubType::ContentDrama;
        draft.set_major(MajorType::Content);
        assert_eq!(draft.sub, SubType::ContentDrama);

        draft.name = "Squid Game".into();
        draft.sub = SubType::PersonActor;
        assert_eq!(draft.validate(), Err(ValidationError::SubTypeMismatch));
    }

    #[test]
    fn edit_prefill_copies_row() {
        let category: Category = serde_json::from_value(serde_json::json!({
            "categoryId": 8,
            "name": "Goblin",
            "hashtags": ["drama", "drama", "tvn"],
            "spotList": [{ "spotId": 1, "name": "Quebec" }],
            "majorType": "CONTENT",
            "subType": "CONTENT_DRAMA"
        }))
        .unwrap();
        let draft = CategoryDraft::from_category(&category);
        assert_eq!(draft.name, "Goblin");
        assert_eq!(draft.major, MajorType::Content);
        assert_eq!(draft.tags.as_slice(), ["drama", "tvn"]);
        assert_eq!(draft.spots.keys(), vec![1]);
    }

    #[test]
    fn spot_still_cuts_repeat_images_part() {
        let draft = SpotDraft {
            name: "Jumunjin".into(),
            address: "Gangneung".into(),
            still_cuts: vec![
                Attachment::new("a.jpg", None, Bytes::new()),
                Attachment::new("b.jpg", None, Bytes::new()),
            ],
            ..Default::default()
        };
        assert!(draft.validate().is_ok());
        let submission = draft.to_submission().unwrap();
        let fields: Vec<_> = submission.files.iter().map(|f| f.field).collect();
        assert_eq!(fields, ["images", "images"]);
        assert_eq!(submission.save_req["pointX"], serde_json::json!(0.0));
    }

    #[test]
    fn required_fields_are_checked() {
        assert_eq!(
            SpotDraft { name: "x".into(), ..Default::default() }.validate(),
            Err(ValidationError::MissingField("address"))
        );
        assert_eq!(QuestDraft::default().validate(), Err(ValidationError::MissingField("title")));
    }
}
