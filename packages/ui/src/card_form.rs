use api::CardInput;
use dioxus::prelude::*;

fn optional(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Contact fields of a personal card, bound to `fields`.
#[component]
pub fn CardFields(mut fields: Signal<CardInput>) -> Element {
    let current = fields();
    let text = |value: &Option<String>| value.clone().unwrap_or_default();

    rsx! {
        div {
            class: "flex flex-col gap-3",

            label { class: "field-label", "Full name" }
            input {
                class: "input",
                r#type: "text",
                required: true,
                value: "{current.full_name}",
                oninput: move |evt: FormEvent| fields.write().full_name = evt.value(),
            }

            label { class: "field-label", "Job title" }
            input {
                class: "input",
                r#type: "text",
                value: text(&current.job_title),
                oninput: move |evt: FormEvent| fields.write().job_title = optional(evt.value()),
            }

            label { class: "field-label", "Company" }
            input {
                class: "input",
                r#type: "text",
                value: text(&current.company_name),
                oninput: move |evt: FormEvent| fields.write().company_name = optional(evt.value()),
            }

            label { class: "field-label", "Email" }
            input {
                class: "input",
                r#type: "email",
                value: text(&current.email),
                oninput: move |evt: FormEvent| fields.write().email = optional(evt.value()),
            }

            label { class: "field-label", "Phone" }
            input {
                class: "input",
                r#type: "tel",
                value: text(&current.phone),
                oninput: move |evt: FormEvent| fields.write().phone = optional(evt.value()),
            }

            label { class: "field-label", "Website" }
            input {
                class: "input",
                r#type: "url",
                value: text(&current.company_website),
                oninput: move |evt: FormEvent| fields.write().company_website = optional(evt.value()),
            }

            label { class: "field-label", "Address" }
            input {
                class: "input",
                r#type: "text",
                value: text(&current.address),
                oninput: move |evt: FormEvent| fields.write().address = optional(evt.value()),
            }

            label { class: "field-label", "Bio" }
            textarea {
                class: "input",
                rows: 3,
                value: text(&current.bio),
                oninput: move |evt: FormEvent| fields.write().bio = optional(evt.value()),
            }
        }
    }
}

/// Human-readable form of a failed request.
pub fn describe(error: &api::ClientError) -> String {
    match error {
        api::ClientError::Http(_) => "Could not reach the server. Please try again.".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_blanks() {
        assert_eq!(optional("  ".to_string()), None);
        assert_eq!(optional("x".to_string()), Some("x".to_string()));
    }
}
