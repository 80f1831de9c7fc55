use super::helpers::placeholder_hint;
use super::{InviteSenderComponent, Msg};
use common::dispatch::DispatchState;
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

pub fn view(component: &InviteSenderComponent, ctx: &Context<InviteSenderComponent>) -> Html {
    let link = ctx.link();
    let session = &component.session;
    let generating = session.is_generating();

    html! {
        <div class="invite-root">
            <h2>{ "Bulk invite links" }</h2>

            <label class="field">
                <span class="field-label">{ "Recipients (comma or newline separated)" }</span>
                <textarea
                    rows="6"
                    placeholder="+91 98765 43210, 14155550100"
                    value={session.recipients_text().to_string()}
                    oninput={link.callback(|e: InputEvent| {
                        let input: HtmlTextAreaElement = e.target_unchecked_into();
                        Msg::UpdateRecipients(input.value())
                    })}
                />
            </label>

            { attachment_field(component, ctx) }

            <label class="field">
                <span class="field-label">{ "Message (use placeholders like {{name}})" }</span>
                <textarea
                    rows="4"
                    value={session.message().as_str().to_string()}
                    oninput={link.callback(|e: InputEvent| {
                        let input: HtmlTextAreaElement = e.target_unchecked_into();
                        Msg::UpdateMessage(input.value())
                    })}
                />
                <p class="hint">{ placeholder_hint(&session.message().placeholders()) }</p>
            </label>

            <div class="actions">
                <button class="btn btn-primary" disabled={generating} onclick={link.callback(|_| Msg::Generate)}>
                    { if generating { "Generating..." } else { "Generate links" } }
                </button>
                <button class="btn" onclick={link.callback(|_| Msg::Reset)}>{ "Reset" }</button>
            </div>

            { links_section(component, ctx) }
        </div>
    }
}

fn attachment_field(component: &InviteSenderComponent, ctx: &Context<InviteSenderComponent>) -> Html {
    let link = ctx.link();
    let session = &component.session;

    html! {
        <label class="field">
            <span class="field-label">{ "Invitation image (optional)" }</span>
            <input
                type="file"
                accept="image/*"
                ref={component.file_input_ref.clone()}
                onchange={link.batch_callback(|e: Event| {
                    let input: HtmlInputElement = e.target_unchecked_into();
                    input.files().and_then(|files| files.get(0)).map(Msg::FileSelected)
                })}
            />
            {
                if let Some(attachment) = session.attachment() {
                    html! {
                        <p class="hint">
                            { format!("Selected: {} ", attachment.file_name) }
                            <button class="btn" onclick={link.callback(|_| Msg::ClearAttachment)}>{ "Remove" }</button>
                        </p>
                    }
                } else {
                    html! {}
                }
            }
            if session.is_uploading() {
                <p class="hint">{ "Uploading..." }</p>
            }
        </label>
    }
}

fn links_section(component: &InviteSenderComponent, ctx: &Context<InviteSenderComponent>) -> Html {
    let link = ctx.link();
    let Some(batch) = component.session.batch() else {
        return html! {};
    };

    let dispatch_button = match component.session.dispatch_state() {
        DispatchState::Idle => html! {
            <button class="btn" onclick={link.callback(|_| Msg::OpenSequentially)}>
                { "Open sequentially" }
            </button>
        },
        DispatchState::Dispatching { index, total } => html! {
            <button class="btn" onclick={link.callback(|_| Msg::CancelDispatch)}>
                { format!("Stop ({}/{})", index, total) }
            </button>
        },
    };

    html! {
        <div class="field">
            <div class="actions">
                <span class="field-label">{ format!("Links ({})", batch.len()) }</span>
                <button class="btn" onclick={link.callback(|_| Msg::CopyAll)}>{ "Copy all" }</button>
                <button class="btn" onclick={link.callback(|_| Msg::Download)}>{ "Download" }</button>
                { dispatch_button }
                <button class="btn" onclick={link.callback(|_| Msg::OpenOnHost)}>{ "Open on this computer" }</button>
            </div>
            <div class="links-list">
                { for batch.links().iter().map(|generated| html! {
                    <div>
                        <a href={generated.as_str().to_string()} target="_blank" rel="noreferrer">
                            { generated.as_str() }
                        </a>
                    </div>
                }) }
            </div>
            <p class="hint">
                { "Opening many tabs is best-effort: allow pop-ups for this page, and expect some links to be blocked." }
            </p>
        </div>
    }
}
