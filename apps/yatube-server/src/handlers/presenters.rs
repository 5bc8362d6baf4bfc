//! Conversion of domain values into response bodies.

use serde_json::Value;

use yatube_core::domain::{Author, Group, PostView};
use yatube_core::forms::{EditorForm, Locale, PostForm, Widget};
use yatube_core::pagination::Page;
use yatube_shared::dto::{
    AuthorResponse, ChoiceResponse, FormContext, FormFieldResponse, FormResponse, GroupResponse,
    PageObj, PostResponse,
};

pub fn group(group: &Group) -> GroupResponse {
    GroupResponse {
        id: group.id,
        title: group.title.clone(),
        slug: group.slug.clone(),
        description: group.description.clone(),
    }
}

pub fn author(author: &Author) -> AuthorResponse {
    AuthorResponse {
        id: author.id,
        username: author.username.clone(),
    }
}

pub fn post(view: &PostView) -> PostResponse {
    PostResponse {
        id: view.post.id,
        text: view.post.text.clone(),
        label: view.post.short_label(),
        pub_date: view.post.pub_date,
        author: author(&view.author),
        group: view.group.as_ref().map(group),
    }
}

pub fn page_obj(page: Page<PostView>) -> PageObj<PostResponse> {
    PageObj {
        number: page.number(),
        num_pages: page.num_pages(),
        count: page.total_count(),
        has_next: page.has_next(),
        has_previous: page.has_previous(),
        next_page_number: page.next_page_number(),
        previous_page_number: page.previous_page_number(),
        object_list: page.items().iter().map(post).collect(),
    }
}

/// The post editor: every field with its label, help text, current value,
/// errors and, for the group, the available choices.
pub fn form_context(editor: &EditorForm, locale: Locale) -> FormContext {
    let fields = PostForm::FIELDS
        .iter()
        .map(|spec| {
            let (value, choices) = match spec.widget {
                Widget::Textarea => (Value::from(editor.form.text.as_str()), None),
                Widget::Select => {
                    let value = editor
                        .form
                        .group
                        .map_or(Value::Null, |id| Value::from(id.to_string()));
                    let choices = editor
                        .groups
                        .iter()
                        .map(|g| ChoiceResponse {
                            value: g.id,
                            label: g.to_string(),
                        })
                        .collect();
                    (value, Some(choices))
                }
            };

            FormFieldResponse {
                name: spec.name.to_string(),
                label: spec.label(locale).to_string(),
                help_text: spec.help_text(locale).to_string(),
                required: spec.required,
                widget: widget_name(spec.widget).to_string(),
                value,
                errors: editor
                    .errors
                    .for_field(spec.name)
                    .iter()
                    .map(|e| e.message(locale).to_string())
                    .collect(),
                choices,
            }
        })
        .collect();

    FormContext {
        form: FormResponse {
            fields,
            is_valid: editor.errors.is_empty(),
        },
        is_edit: editor.is_edit,
        post_id: editor.post_id,
    }
}

fn widget_name(widget: Widget) -> &'static str {
    match widget {
        Widget::Textarea => "textarea",
        Widget::Select => "select",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yatube_core::forms::{FieldError, FormErrors, GROUP_FIELD, TEXT_FIELD};

    fn editor(errors: FormErrors) -> EditorForm {
        let group = Group::new(
            "Котики".to_string(),
            "cats".to_string(),
            "Всё о котиках".to_string(),
        );
        EditorForm {
            form: PostForm::new("", None),
            errors,
            groups: vec![group],
            is_edit: false,
            post_id: None,
        }
    }

    #[test]
    fn test_form_fields_in_russian() {
        let ctx = form_context(&editor(FormErrors::default()), Locale::Ru);

        let names: Vec<_> = ctx.form.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["text", "group"]);

        let text = &ctx.form.fields[0];
        assert_eq!(text.label, "Текст");
        assert_eq!(text.help_text, "Введите текст поста");
        assert_eq!(text.widget, "textarea");
        assert!(text.required);

        let group = &ctx.form.fields[1];
        assert_eq!(group.label, "Группа");
        assert_eq!(group.help_text, "Выберите группу по желанию");
        assert!(!group.required);
        assert_eq!(group.value, Value::Null);
        let choices = group.choices.as_ref().unwrap();
        assert_eq!(choices[0].label, "Котики");
        assert!(ctx.form.is_valid);
    }

    #[test]
    fn test_form_errors_in_english() {
        let mut errors = FormErrors::default();
        errors.add(&TEXT_FIELD, FieldError::Required);
        errors.add(&GROUP_FIELD, FieldError::InvalidChoice);

        let ctx = form_context(&editor(errors), Locale::En);

        assert!(!ctx.form.is_valid);
        assert_eq!(ctx.form.fields[0].label, "Text");
        assert_eq!(ctx.form.fields[0].errors, ["This field is required."]);
        assert_eq!(ctx.form.fields[1].errors.len(), 1);
    }
}
