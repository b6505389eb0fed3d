use tandem_core::{ClientEvent, ConnectionId, JoinRequest, Member, ServerEvent};

/// What the relay does with one client event.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    /// Hand over to the room registry.
    Join { request: JoinRequest, member: Member },

    /// Send `event` to exactly one connection.
    Forward { to: ConnectionId, event: ServerEvent },
}

/// Maps a client event from `from` onto its relay action.
///
/// Payloads are moved across untouched. Every negotiation event except
/// `peer:candidate` gains the sender's id as `from`.
pub fn route(from: &ConnectionId, event: ClientEvent) -> Route {
    match event {
        ClientEvent::RoomJoin(request) => Route::Join {
            member: Member::new(request.email.clone(), from.clone()),
            request,
        },

        ClientEvent::UserCall { to_user, offer } => Route::Forward {
            to: to_user,
            event: ServerEvent::IncomingCall {
                from: from.clone(),
                offer,
            },
        },

        ClientEvent::CallAccepted { to, ans } => Route::Forward {
            to,
            event: ServerEvent::CallAccepted {
                from: from.clone(),
                ans,
            },
        },

        ClientEvent::PeerCandidate { candidate, to } => Route::Forward {
            to,
            event: ServerEvent::PeerCandidate { candidate },
        },

        ClientEvent::PeerNegotiation { to, offer } => Route::Forward {
            to,
            event: ServerEvent::PeerNegotiation {
                from: from.clone(),
                offer,
            },
        },

        ClientEvent::PeerNegoDone { to, ans } => Route::Forward {
            to,
            event: ServerEvent::PeerNegoFinal {
                from: from.clone(),
                ans,
            },
        },
    }
}
