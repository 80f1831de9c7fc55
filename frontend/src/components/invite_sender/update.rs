use super::browser::{copy_to_clipboard, download, WindowOpener};
use super::helpers::show_toast;
use super::services::{start_host_dispatch, HttpServices};
use super::{InviteSenderComponent, Msg};
use common::model::attachment::Attachment;
use common::model::link::GeneratedLink;
use common::session::run_generation;
use gloo_console::{error, log, warn};
use gloo_file::futures::read_as_bytes;
use gloo_timers::callback::Timeout;
use web_sys::HtmlInputElement;
use yew::platform::spawn_local;
use yew::prelude::*;

pub fn update(
    component: &mut InviteSenderComponent,
    ctx: &Context<InviteSenderComponent>,
    msg: Msg,
) -> bool {
    match msg {
        Msg::ConfigLoaded(config) => {
            component.session.set_open_delay(config.open_delay());
            component.config = config;
            false
        }
        Msg::UpdateRecipients(text) => {
            component.session.set_recipients_text(text);
            true
        }
        Msg::UpdateMessage(text) => {
            component.session.set_message(text);
            true
        }
        Msg::FileSelected(file) => {
            let link = ctx.link().clone();
            spawn_local(async move {
                let file = gloo_file::File::from(file);
                match read_as_bytes(&file).await {
                    Ok(bytes) => match Attachment::image(file.name(), file.raw_mime_type(), bytes) {
                        Ok(attachment) => link.send_message(Msg::AttachmentLoaded(attachment)),
                        Err(err) => {
                            link.send_message(Msg::ClearAttachment);
                            show_toast(&err.to_string());
                        }
                    },
                    Err(err) => {
                        error!(format!("cannot read {}: {}", file.name(), err));
                        show_toast("Could not read the selected image.");
                    }
                }
            });
            false
        }
        Msg::AttachmentLoaded(attachment) => {
            component.session.select_attachment(attachment);
            true
        }
        Msg::ClearAttachment => {
            component.session.clear_attachment();
            if let Some(input) = component.file_input_ref.cast::<HtmlInputElement>() {
                input.set_value("");
            }
            true
        }
        Msg::Generate => {
            match component.session.begin_generation() {
                Ok(ticket) => {
                    let services = HttpServices::new(component.config.clone());
                    let link = ctx.link().clone();
                    spawn_local(async move {
                        let outcome = run_generation(ticket, &services, &services).await;
                        link.send_message(Msg::GenerationFinished(outcome));
                    });
                }
                Err(err) => show_toast(&err.to_string()),
            }
            true
        }
        Msg::GenerationFinished(outcome) => {
            match component.session.finish_generation(outcome) {
                Ok(true) => {
                    component.dispatch_timer = None;
                    log!(format!("generated {} links", component.link_count()));
                }
                Ok(false) => {}
                Err(err) => {
                    error!(err.to_string());
                    show_toast(&err.to_string());
                }
            }
            true
        }
        Msg::Reset => {
            component.session.reset();
            component.dispatch_timer = None;
            true
        }
        Msg::CopyAll => {
            if let Some(text) = component.session.clipboard_text() {
                let link = ctx.link().clone();
                spawn_local(async move {
                    let result = copy_to_clipboard(&text).await;
                    link.send_message(Msg::CopyFinished(result));
                });
            }
            false
        }
        Msg::CopyFinished(result) => {
            match result {
                Ok(()) => show_toast("All links copied to clipboard"),
                Err(err) => {
                    warn!(err.to_string());
                    show_toast(&err.to_string());
                }
            }
            false
        }
        Msg::Download => {
            if let Some(artifact) = component.session.export_artifact() {
                download(&artifact);
            }
            false
        }
        Msg::OpenSequentially => {
            match component.session.start_dispatch() {
                // The first tab opens inside the click handler so the browser
                // still sees a user gesture.
                Ok(()) => step_dispatch(component, ctx),
                Err(err) => show_toast(&err.to_string()),
            }
            true
        }
        Msg::DispatchTick => {
            step_dispatch(component, ctx);
            true
        }
        Msg::CancelDispatch => {
            component.session.cancel_dispatch();
            component.dispatch_timer = None;
            true
        }
        Msg::OpenOnHost => {
            let Some(batch) = component.session.batch() else {
                return false;
            };
            let links: Vec<String> = batch
                .links()
                .iter()
                .map(GeneratedLink::as_str)
                .map(str::to_string)
                .collect();
            let total = links.len();
            let delay_ms = component.config.open_delay_ms;
            spawn_local(async move {
                match start_host_dispatch(links, delay_ms).await {
                    Ok(job_id) => {
                        log!(format!("host dispatch job {}", job_id));
                        show_toast(&format!("Opening {} links on this computer.", total));
                    }
                    Err(err) => {
                        warn!(format!("host dispatch refused: {}", err));
                        show_toast(&err);
                    }
                }
            });
            false
        }
    }
}

/// Opens the next link and arms the timer for the one after it.
fn step_dispatch(component: &mut InviteSenderComponent, ctx: &Context<InviteSenderComponent>) {
    component.dispatch_timer = component
        .session
        .step_dispatch(&WindowOpener)
        .map(|wait| {
            let link = ctx.link().clone();
            let millis = u32::try_from(wait.as_millis()).unwrap_or(u32::MAX);
            Timeout::new(millis, move || link.send_message(Msg::DispatchTick))
        });
}
