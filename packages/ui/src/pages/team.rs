use api::{MemberInput, MembersUpload, TeamInput, TeamView};
use dioxus::prelude::*;

use crate::auth::{use_auth, SignInPrompt};
use crate::card_face::{kind_for, CardFace, FaceData};
use crate::card_form::describe;
use crate::links;
use crate::storage::make_client;
use crate::upload::first_file;

/// Parse the member upload box. JSON (an array of members or a
/// `{"members": [...]}` object) is accepted as is; anything else is read as
/// `name,email,phone,title` lines.
pub fn parse_members(text: &str) -> Result<MembersUpload, String> {
    let trimmed = text.trim();
    if trimmed.starts_with('[') {
        serde_json::from_str::<Vec<MemberInput>>(trimmed)
            .map(|members| MembersUpload { members })
            .map_err(|e| format!("Invalid JSON: {e}"))
    } else if trimmed.starts_with('{') {
        serde_json::from_str::<MembersUpload>(trimmed).map_err(|e| format!("Invalid JSON: {e}"))
    } else {
        Ok(MembersUpload::from_lines(trimmed))
    }
}

/// Team branding, member upload and member QR codes.
#[component]
pub fn TeamPage(id: i64) -> Element {
    let auth = use_auth();
    let mut team = use_signal(|| Option::<TeamView>::None);
    let mut company = use_signal(String::new);
    let mut members_text = use_signal(String::new);
    let mut status = use_signal(|| Option::<Result<String, String>>::None);
    let mut busy = use_signal(|| false);

    let templates = use_resource(move || async move {
        make_client(None).templates().await.unwrap_or_default()
    });

    let _ = use_resource(move || async move {
        match auth().client().team(id).await {
            Ok(view) => {
                company.set(view.company_name.clone());
                team.set(Some(view));
            }
            Err(e) => status.set(Some(Err(describe(&e)))),
        }
    });

    let handle_rename = move |evt: FormEvent| {
        evt.prevent_default();
        if busy() {
            return;
        }
        busy.set(true);
        spawn(async move {
            let input = TeamInput {
                company_name: company(),
                ..Default::default()
            };
            match auth().client().update_team(id, &input).await {
                Ok(view) => {
                    team.set(Some(view));
                    status.set(Some(Ok("Saved".to_string())));
                }
                Err(e) => status.set(Some(Err(describe(&e)))),
            }
            busy.set(false);
        });
    };

    let handle_upload = move |evt: FormEvent| {
        evt.prevent_default();
        if busy() {
            return;
        }
        let upload = match parse_members(&members_text()) {
            Ok(upload) => upload,
            Err(message) => {
                status.set(Some(Err(message)));
                return;
            }
        };
        busy.set(true);
        spawn(async move {
            let count = upload.members.len();
            match auth().client().replace_members(id, &upload).await {
                Ok(members) => {
                    if let Some(view) = team.write().as_mut() {
                        view.members = members;
                    }
                    members_text.set(String::new());
                    status.set(Some(Ok(format!("Uploaded {count} members"))));
                }
                Err(e) => status.set(Some(Err(describe(&e)))),
            }
            busy.set(false);
        });
    };

    let handle_logo = move |evt: FormEvent| async move {
        let Some(upload) = first_file(&evt).await else {
            return;
        };
        busy.set(true);
        match auth().client().upload_team_logo(id, upload).await {
            Ok(view) => team.set(Some(view)),
            Err(e) => status.set(Some(Err(describe(&e)))),
        }
        busy.set(false);
    };

    let handle_qr = move |_| async move {
        busy.set(true);
        match auth().client().regenerate_member_qr(id).await {
            Ok(members) => {
                if let Some(view) = team.write().as_mut() {
                    view.members = members;
                }
                status.set(Some(Ok("QR codes regenerated".to_string())));
            }
            Err(e) => status.set(Some(Err(describe(&e)))),
        }
        busy.set(false);
    };

    if auth().loading {
        return rsx! { p { class: "view-page", "Loading..." } };
    }
    if !auth().signed_in() {
        return rsx! { div { class: "view-page", SignInPrompt {} } };
    }

    let Some(view) = team() else {
        return rsx! {
            div {
                class: "view-page",
                if let Some(Err(message)) = status() {
                    p { class: "text-red-600", "{message}" }
                } else {
                    p { "Loading team..." }
                }
            }
        };
    };

    let kind = kind_for(templates.read().as_deref().unwrap_or(&[]), view.template_id);
    let face = FaceData::from_team(&view);
    let banner = match status() {
        Some(Ok(message)) => rsx! { p { class: "text-green-700", "{message}" } },
        Some(Err(message)) => rsx! { p { class: "text-red-600", "{message}" } },
        None => rsx! {},
    };
    let rows: Vec<_> = view
        .members
        .iter()
        .map(|m| {
            (
                m.id,
                m.full_name.clone(),
                m.job_title.clone().unwrap_or_default(),
                m.email.clone().unwrap_or_default(),
                m.qr_code.clone(),
            )
        })
        .collect();
    let heading = view.company_name.clone();
    let member_count = rows.len();

    rsx! {
        div {
            class: "view-page max-w-5xl mx-auto w-full",

            h1 { class: "view-title", "{heading}" }
            {banner}

            div {
                class: "grid grid-cols-2 gap-8",

                div {
                    class: "flex flex-col gap-4",
                    form {
                        onsubmit: handle_rename,
                        class: "flex gap-2",
                        input {
                            class: "input flex-1",
                            r#type: "text",
                            value: company(),
                            oninput: move |evt: FormEvent| company.set(evt.value()),
                        }
                        button { class: "btn", r#type: "submit", disabled: busy(), "Rename" }
                    }
                    label {
                        class: "field-label",
                        "Logo "
                        input { r#type: "file", accept: "image/*", disabled: busy(), onchange: handle_logo }
                    }
                }

                CardFace { face, kind }
            }

            h2 { class: "view-section-title", "Upload members" }
            p {
                class: "text-sm text-neutral-600",
                "One member per line as name,email,phone,title, or a JSON array. "
                "Uploading replaces every current member."
            }
            form {
                onsubmit: handle_upload,
                class: "flex flex-col gap-2",
                textarea {
                    class: "input",
                    rows: 6,
                    placeholder: "name,email,phone,title\nAda Lovelace,ada@example.com,+44 20 0000,Analyst",
                    value: members_text(),
                    oninput: move |evt: FormEvent| members_text.set(evt.value()),
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: busy() || members_text().trim().is_empty(),
                    if busy() { "Uploading..." } else { "Replace members" }
                }
            }

            div {
                class: "flex justify-between items-center",
                h2 { class: "view-section-title", "Members ({member_count})" }
                button { class: "btn", disabled: busy() || member_count == 0, onclick: handle_qr, "Regenerate QR codes" }
            }

            for (member_id, name, title, email, qr) in rows {
                div {
                    key: "{member_id}",
                    class: "list-row",
                    div {
                        Link { to: links::public_member(id, member_id), strong { "{name}" } }
                        span { class: "ml-2 text-neutral-600", "{title}" }
                        div { class: "text-sm text-neutral-600", "{email}" }
                    }
                    if let Some(src) = qr {
                        img { src: "{src}", alt: "QR code for {name}", style: "width: 72px; height: 72px;" }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_members_json_array() {
        let upload = parse_members(
            r#"[{"full_name": "Ada", "email": "ada@example.com"}, {"full_name": "Grace"}]"#,
        )
        .unwrap();
        assert_eq!(upload.members.len(), 2);
        assert_eq!(upload.members[0].email.as_deref(), Some("ada@example.com"));
        assert_eq!(upload.members[1].phone, None);
    }

    #[test]
    fn test_parse_members_object_and_lines() {
        let upload = parse_members(r#"{"members": [{"full_name": "Ada"}]}"#).unwrap();
        assert_eq!(upload.members.len(), 1);

        let upload = parse_members("name,email\nAda,ada@example.com\nGrace").unwrap();
        assert_eq!(upload.members.len(), 2);
        assert_eq!(upload.members[1].full_name, "Grace");
    }

    #[test]
    fn test_parse_members_bad_json() {
        let err = parse_members("[{").unwrap_err();
        assert!(err.starts_with("Invalid JSON"));
    }
}
