//! Browser-only services shared through Leptos context.
//!
//! SYSTEM CONTEXT
//! ==============
//! `HostedClient` and `AuthBroadcaster` are single-threaded (`Rc` inside), so
//! they are stored with `StoredValue::new_local` and only exist in the
//! hydrated app. During server rendering no services are provided and
//! [`use_services`] returns `None`.
//!
//! Components read the handle once in their body and move the `Copy` value
//! into event handlers and tasks, which run outside the reactive owner.

use leptos::prelude::*;

use crate::net::hosted::HostedClient;
use crate::state::auth::AuthBroadcaster;

#[derive(Clone, Copy)]
pub struct Services {
    client: StoredValue<HostedClient, LocalStorage>,
    auth: StoredValue<AuthBroadcaster, LocalStorage>,
}

impl Services {
    pub fn provide(client: HostedClient, auth: AuthBroadcaster) -> Self {
        let services = Self { client: StoredValue::new_local(client), auth: StoredValue::new_local(auth) };
        provide_context(services);
        services
    }

    pub fn client(self) -> Option<HostedClient> {
        self.client.try_get_value()
    }

    pub fn broadcaster(self) -> Option<AuthBroadcaster> {
        self.auth.try_get_value()
    }

    /// Stop auth broadcasting for good.
    pub fn shutdown(self) {
        if let Some(auth) = self.broadcaster() {
            auth.shutdown();
        }
    }
}

pub fn use_services() -> Option<Services> {
    use_context::<Services>()
}

/// The backend client from `services`, if any.
pub fn client_of(services: Option<Services>) -> Option<HostedClient> {
    services.and_then(Services::client)
}
