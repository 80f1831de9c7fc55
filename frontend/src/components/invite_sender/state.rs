use common::config::ClientConfig;
use common::session::InviteSession;
use common::upload::UploadCachePolicy;
use gloo_timers::callback::Timeout;
use yew::NodeRef;

pub struct InviteSenderComponent {
    pub session: InviteSession,
    pub config: ClientConfig,
    /// Pending tick of the sequential dispatch. Dropping it cancels the tick.
    pub dispatch_timer: Option<Timeout>,
    pub file_input_ref: NodeRef,
    pub loaded: bool,
}

impl InviteSenderComponent {
    pub fn new() -> Self {
        let config = ClientConfig::default();
        Self {
            session: InviteSession::new(config.open_delay(), UploadCachePolicy::default()),
            config,
            dispatch_timer: None,
            file_input_ref: NodeRef::default(),
            loaded: false,
        }
    }

    pub fn link_count(&self) -> usize {
        self.session.batch().map(|batch| batch.len()).unwrap_or(0)
    }
}
