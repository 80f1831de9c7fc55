//! Invite sender: root module wiring the Yew `Component` implementation with
//! submodules for state, update logic, view rendering, HTTP services and
//! browser helpers.
//!
//! Responsibilities
//! - Re-export `Msg` and `InviteSenderComponent`.
//! - Provide the `Component` implementation that delegates to `update::update` and `view::view`.
//! - On first render, fetch the client configuration from the backend, falling
//!   back to the built-in defaults when it is unreachable.

use yew::platform::spawn_local;
use yew::prelude::*;

mod browser;
mod helpers;
mod messages;
mod services;
mod state;
mod update;
mod view;

use common::config::ClientConfig;
use helpers::show_toast;
pub use messages::Msg;
pub use state::InviteSenderComponent;

impl Component for InviteSenderComponent {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        InviteSenderComponent::new()
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render && !self.loaded {
            self.loaded = true;

            let link = ctx.link().clone();
            spawn_local(async move {
                match services::fetch_client_config().await {
                    Ok(config) => link.send_message(Msg::ConfigLoaded(config)),
                    Err(err) => {
                        gloo_console::warn!(format!("using default configuration: {}", err));
                        link.send_message(Msg::ConfigLoaded(ClientConfig::default()));
                        show_toast("Server configuration unavailable, using defaults.");
                    }
                }
            });
        }
    }
}
