//! Post authoring form: editable fields, their labels and validation.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Group, Post};

/// Language used for labels, help texts and error messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ru,
    En,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lang = s.trim().to_lowercase();
        match lang.split(['-', '_']).next() {
            Some("ru") => Ok(Self::Ru),
            Some("en") => Ok(Self::En),
            _ => Err(format!("unsupported language code: {s}")),
        }
    }
}

/// How a field is presented for input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Widget {
    Textarea,
    Select,
}

/// Static description of one form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
    pub widget: Widget,
    label_ru: &'static str,
    label_en: &'static str,
    help_ru: &'static str,
    help_en: &'static str,
}

impl FieldSpec {
    pub fn label(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::Ru => self.label_ru,
            Locale::En => self.label_en,
        }
    }

    pub fn help_text(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::Ru => self.help_ru,
            Locale::En => self.help_en,
        }
    }
}

pub const TEXT_FIELD: FieldSpec = FieldSpec {
    name: "text",
    required: true,
    widget: Widget::Textarea,
    label_ru: "Текст",
    label_en: "Text",
    help_ru: "Введите текст поста",
    help_en: "Enter post text",
};

pub const GROUP_FIELD: FieldSpec = FieldSpec {
    name: "group",
    required: false,
    widget: Widget::Select,
    label_ru: "Группа",
    label_en: "Group",
    help_ru: "Выберите группу по желанию",
    help_en: "Choose a group if you wish",
};

/// A single validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldError {
    Required,
    InvalidChoice,
}

impl FieldError {
    pub fn message(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::Required, Locale::Ru) => "Обязательное поле.",
            (Self::Required, Locale::En) => "This field is required.",
            (Self::InvalidChoice, Locale::Ru) => {
                "Выберите корректный вариант. Вашего варианта нет среди допустимых значений."
            }
            (Self::InvalidChoice, Locale::En) => {
                "Select a valid choice. That choice is not one of the available choices."
            }
        }
    }
}

/// Validation failures keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormErrors(BTreeMap<String, Vec<FieldError>>);

impl FormErrors {
    pub fn add(&mut self, field: &FieldSpec, error: FieldError) {
        self.0.entry(field.name.to_string()).or_default().push(error);
    }

    pub fn for_field(&self, name: &str) -> &[FieldError] {
        self.0.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Submitted (or prefilled) values of the post form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostForm {
    pub text: String,
    pub group: Option<Uuid>,
    /// Set when the submitted group value is not an id at all.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unparsed_group: bool,
}

/// Values that passed validation and may be written to a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedPost {
    pub text: String,
    pub group_id: Option<Uuid>,
}

impl PostForm {
    /// The only fields a user may edit; `author` and `pub_date` are
    /// always assigned by the system.
    pub const FIELDS: [FieldSpec; 2] = [TEXT_FIELD, GROUP_FIELD];

    pub fn new(text: impl Into<String>, group: Option<Uuid>) -> Self {
        Self {
            text: text.into(),
            group,
            unparsed_group: false,
        }
    }

    /// Form from raw submitted values. A blank group means no group; any
    /// other value that is not an id fails validation as an invalid choice.
    pub fn from_submission(text: impl Into<String>, group: Option<&str>) -> Self {
        let group = group.map(str::trim).filter(|raw| !raw.is_empty());
        match group.map(Uuid::parse_str) {
            None => Self::new(text, None),
            Some(Ok(id)) => Self::new(text, Some(id)),
            Some(Err(_)) => Self {
                unparsed_group: true,
                ..Self::new(text, None)
            },
        }
    }

    /// Form prefilled from an existing post.
    pub fn from_post(post: &Post) -> Self {
        Self {
            text: post.text.clone(),
            group: post.group_id,
            unparsed_group: false,
        }
    }

    /// Validate the submission.
    ///
    /// `selected_group` is the group looked up for `self.group`, if any;
    /// a selection that did not resolve is an invalid choice.
    pub fn clean(&self, selected_group: Option<&Group>) -> Result<CleanedPost, FormErrors> {
        let mut errors = FormErrors::default();

        let text = self.text.trim();
        if text.is_empty() {
            errors.add(&TEXT_FIELD, FieldError::Required);
        }

        let group_id = match (self.group, selected_group) {
            (None, _) if self.unparsed_group => {
                errors.add(&GROUP_FIELD, FieldError::InvalidChoice);
                None
            }
            (None, _) => None,
            (Some(id), Some(group)) if group.id == id => Some(id),
            (Some(_), _) => {
                errors.add(&GROUP_FIELD, FieldError::InvalidChoice);
                None
            }
        };

        if errors.is_empty() {
            Ok(CleanedPost {
                text: text.to_string(),
                group_id,
            })
        } else {
            Err(errors)
        }
    }
}

/// Everything needed to present the post form: values, errors and the
/// group choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorForm {
    pub form: PostForm,
    pub errors: FormErrors,
    pub groups: Vec<Group>,
    pub is_edit: bool,
    pub post_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group() -> Group {
        Group::new(
            "Тестовая группа".to_string(),
            "test_slug".to_string(),
            "Тестовое описание".to_string(),
        )
    }

    #[test]
    fn test_exposes_text_and_group_only() {
        let names: Vec<&str> = PostForm::FIELDS.iter().map(|f| f.name).collect();
        assert_eq!(names, ["text", "group"]);
        assert!(TEXT_FIELD.required);
        assert!(!GROUP_FIELD.required);
        assert_eq!(TEXT_FIELD.widget, Widget::Textarea);
        assert_eq!(GROUP_FIELD.widget, Widget::Select);
    }

    #[test]
    fn test_labels_and_help_texts() {
        assert_eq!(TEXT_FIELD.label(Locale::Ru), "Текст");
        assert_eq!(TEXT_FIELD.label(Locale::En), "Text");
        assert_eq!(TEXT_FIELD.help_text(Locale::Ru), "Введите текст поста");
        assert_eq!(TEXT_FIELD.help_text(Locale::En), "Enter post text");
        assert_eq!(GROUP_FIELD.label(Locale::Ru), "Группа");
        assert_eq!(GROUP_FIELD.label(Locale::En), "Group");
        assert_eq!(GROUP_FIELD.help_text(Locale::Ru), "Выберите группу по желанию");
        assert_eq!(GROUP_FIELD.help_text(Locale::En), "Choose a group if you wish");
    }

    #[test]
    fn test_locale_from_language_code() {
        assert_eq!("ru".parse::<Locale>(), Ok(Locale::Ru));
        assert_eq!("en-us".parse::<Locale>(), Ok(Locale::En));
        assert_eq!("EN_GB".parse::<Locale>(), Ok(Locale::En));
        assert!("de".parse::<Locale>().is_err());
    }

    #[test]
    fn test_clean_accepts_text_without_group() {
        let cleaned = PostForm::new("  Текст поста \n", None).clean(None).unwrap();
        assert_eq!(cleaned.text, "Текст поста");
        assert_eq!(cleaned.group_id, None);
    }

    #[test]
    fn test_clean_accepts_existing_group() {
        let group = group();
        let cleaned = PostForm::new("Пост", Some(group.id))
            .clean(Some(&group))
            .unwrap();
        assert_eq!(cleaned.group_id, Some(group.id));
    }

    #[test]
    fn test_clean_rejects_blank_text() {
        for text in ["", "   ", "\n\t"] {
            let errors = PostForm::new(text, None).clean(None).unwrap_err();
            assert_eq!(errors.for_field("text"), &[FieldError::Required]);
            assert!(errors.for_field("group").is_empty());
        }
    }

    #[test]
    fn test_clean_rejects_unknown_group() {
        let errors = PostForm::new("Пост", Some(Uuid::new_v4()))
            .clean(None)
            .unwrap_err();
        assert_eq!(errors.for_field("group"), &[FieldError::InvalidChoice]);

        let other = group();
        let errors = PostForm::new("Пост", Some(Uuid::new_v4()))
            .clean(Some(&other))
            .unwrap_err();
        assert_eq!(errors.for_field("group"), &[FieldError::InvalidChoice]);
    }

    #[test]
    fn test_submission_with_malformed_group_keeps_text() {
        let form = PostForm::from_submission("Настоящий текст", Some("not-a-uuid"));
        assert_eq!(form.text, "Настоящий текст");
        assert_eq!(form.group, None);

        let errors = form.clean(None).unwrap_err();
        assert_eq!(errors.for_field("group"), &[FieldError::InvalidChoice]);
        assert!(errors.for_field("text").is_empty());
    }

    #[test]
    fn test_submission_with_blank_or_valid_group() {
        let form = PostForm::from_submission("Пост", Some(" "));
        assert_eq!(form, PostForm::new("Пост", None));
        assert!(form.clean(None).is_ok());

        let group = group();
        let form = PostForm::from_submission("Пост", Some(&group.id.to_string()));
        assert_eq!(form.group, Some(group.id));
        assert!(form.clean(Some(&group)).is_ok());
    }

    #[test]
    fn test_unbounded_text_is_accepted() {
        let text = "x".repeat(100_000);
        let cleaned = PostForm::new(text.clone(), None).clean(None).unwrap();
        assert_eq!(cleaned.text, text);
    }

    #[test]
    fn test_error_messages_are_localized() {
        assert_eq!(FieldError::Required.message(Locale::Ru), "Обязательное поле.");
        assert_eq!(
            FieldError::Required.message(Locale::En),
            "This field is required."
        );
    }
}
