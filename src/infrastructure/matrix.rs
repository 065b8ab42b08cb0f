//! # Matrix Service Adapter
//!
//! Bridges the Matrix SDK to the bot core. It implements `ChatTransport` and
//! `IdentityService`, and turns the SDK's sync loop into a stream of
//! `TransportEvent`s for the event loop to consume.

use async_trait::async_trait;
use matrix_sdk::config::SyncSettings;
use matrix_sdk::room::Room;
use matrix_sdk::ruma::api::client::error::ErrorKind;
use matrix_sdk::ruma::events::presence::PresenceEvent;
use matrix_sdk::ruma::events::room::member::{MembershipState, StrippedRoomMemberEvent};
use matrix_sdk::ruma::events::room::message::{
    MessageType, OriginalSyncRoomMessageEvent, RoomMessageEventContent,
};
use matrix_sdk::ruma::{RoomId, UserId};
use matrix_sdk::Client;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::domain::config::MatrixConfig;
use crate::domain::traits::{ChatTransport, IdentityService};
use crate::domain::types::{Message, TransportEvent};

const EVENT_BUFFER: usize = 64;
const SYNC_TIMEOUT: Duration = Duration::from_secs(30);
const RETRY_DELAY: Duration = Duration::from_secs(5);
const LATENCY_PROBE_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct MatrixService {
    client: Client,
    config: MatrixConfig,
}

impl MatrixService {
    pub async fn new(config: &MatrixConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .homeserver_url(&config.homeserver)
            .build()
            .await?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn operating_room(&self) -> Result<Room, String> {
        let room_id = RoomId::parse(&self.config.room).map_err(|e| e.to_string())?;
        self.client
            .get_room(&room_id)
            .ok_or_else(|| format!("not joined to {}", self.config.room))
    }

    /// Logs in, installs the event handlers and starts syncing in the
    /// background. The stream ends when the sync task exits, which happens on
    /// rejected credentials or when the receiver is dropped.
    pub fn start(&self) -> ReceiverStream<TransportEvent> {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        // Handlers live as long as the client, so they only hold weak senders
        self.install_handlers(tx.downgrade());

        let client = self.client.clone();
        let config = self.config.clone();
        tokio::spawn(async move {
            sync_loop(client, config, tx).await;
        });

        ReceiverStream::new(rx)
    }

    fn install_handlers(&self, tx: mpsc::WeakSender<TransportEvent>) {
        let start_time = SystemTime::now();
        let room_filter = self.config.room.clone();

        let message_tx = tx.clone();
        self.client
            .add_event_handler(move |ev: OriginalSyncRoomMessageEvent, room: Room| {
                let tx = message_tx.clone();
                let room_filter = room_filter.clone();
                async move {
                    let Some(tx) = tx.upgrade() else {
                        return;
                    };
                    if room.room_id().as_str() != room_filter {
                        return;
                    }
                    if ev.sender == room.own_user_id() {
                        return;
                    }

                    // Ignore history replayed by the first sync
                    let ts = u64::from(ev.origin_server_ts.get());
                    if UNIX_EPOCH + Duration::from_millis(ts) < start_time {
                        return;
                    }

                    let MessageType::Text(text) = &ev.content.msgtype else {
                        forward(&tx, TransportEvent::Other(ev.content.msgtype.msgtype().to_string())).await;
                        return;
                    };

                    let message = Message::new(text.body.clone(), ev.sender.to_string()).with_raw(
                        serde_json::json!({
                            "event_id": ev.event_id.to_string(),
                            "room_id": room.room_id().to_string(),
                            "origin_server_ts": ts,
                        }),
                    );
                    forward(&tx, TransportEvent::Message(message)).await;
                }
            });

        let presence_tx = tx.clone();
        self.client.add_event_handler(move |ev: PresenceEvent| {
            let tx = presence_tx.clone();
            async move {
                let Some(tx) = tx.upgrade() else {
                    return;
                };
                forward(
                    &tx,
                    TransportEvent::PresenceChange {
                        user_id: ev.sender.to_string(),
                        presence: ev.content.presence.as_str().to_string(),
                    },
                )
                .await;
            }
        });

        let invite_room = self.config.room.clone();
        self.client
            .add_event_handler(move |ev: StrippedRoomMemberEvent, room: Room| {
                let tx = tx.clone();
                let invite_room = invite_room.clone();
                async move {
                    if !accepts_invite(
                        &ev.content.membership,
                        &ev.state_key,
                        room.own_user_id(),
                        room.room_id(),
                        &invite_room,
                    ) {
                        return;
                    }
                    let Some(tx) = tx.upgrade() else {
                        return;
                    };
                    if let Err(e) = room.join().await {
                        forward(&tx, TransportEvent::TransportError(e.to_string())).await;
                    } else {
                        forward(&tx, TransportEvent::Other(format!("joined {invite_room}"))).await;
                    }
                }
            });
    }
}

/// Only invites addressed to the bot, for the operating room, are joined.
fn accepts_invite(
    membership: &MembershipState,
    invitee: &UserId,
    own_user: &UserId,
    room_id: &RoomId,
    operating_room: &str,
) -> bool {
    *membership == MembershipState::Invite && invitee == own_user && room_id.as_str() == operating_room
}

async fn forward(tx: &mpsc::Sender<TransportEvent>, event: TransportEvent) {
    if let Err(e) = tx.send(event).await {
        tracing::debug!("{}", crate::strings::logs::event_channel_closed(&format!("{:?}", e.0)));
    }
}

fn is_auth_error(kind: Option<&ErrorKind>) -> bool {
    matches!(
        kind,
        Some(ErrorKind::Forbidden { .. } | ErrorKind::UnknownToken { .. } | ErrorKind::MissingToken)
    )
}

#[derive(Debug)]
enum LoginFailure {
    Rejected,
    Unavailable(String),
}

/// Keeps attempting to log in until it succeeds, the homeserver rejects the
/// credentials, or nobody is listening anymore. Returns whether we are logged in.
async fn login_with_retry<F, Fut>(
    tx: &mpsc::Sender<TransportEvent>,
    delay: Duration,
    mut attempt: F,
) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), LoginFailure>>,
{
    while !tx.is_closed() {
        match attempt().await {
            Ok(()) => return true,
            Err(LoginFailure::Rejected) => {
                forward(tx, TransportEvent::InvalidCredentials).await;
                return false;
            }
            Err(LoginFailure::Unavailable(e)) => {
                tracing::warn!("{}", crate::strings::logs::login_failed(&e));
                forward(tx, TransportEvent::TransportError(e)).await;
                tokio::time::sleep(delay).await;
            }
        }
    }
    false
}

async fn sync_loop(client: Client, config: MatrixConfig, tx: mpsc::Sender<TransportEvent>) {
    let logged_in = login_with_retry(&tx, RETRY_DELAY, || {
        let auth = client.matrix_auth();
        let username = config.username.clone();
        let password = config.password.clone();
        async move {
            auth.login_username(&username, &password)
                .initial_device_display_name("puddle")
                .send()
                .await
                .map(|_| ())
                .map_err(|e| {
                    if is_auth_error(e.client_api_error_kind()) {
                        LoginFailure::Rejected
                    } else {
                        LoginFailure::Unavailable(e.to_string())
                    }
                })
        }
    })
    .await;
    if !logged_in {
        return;
    }
    tracing::info!("{}", crate::strings::logs::logged_in(&config.username));
    tracing::info!("{}", crate::strings::logs::SYNC_LOOP_START);

    let mut settings = SyncSettings::default();
    let mut connected = false;
    let mut last_probe: Option<Instant> = None;

    while !tx.is_closed() {
        match client.sync_once(settings.clone()).await {
            Ok(response) => {
                settings = SyncSettings::default()
                    .token(response.next_batch)
                    .timeout(SYNC_TIMEOUT);
                if !connected {
                    connected = true;
                    forward(&tx, TransportEvent::Connected).await;
                }
            }
            Err(e) => {
                if is_auth_error(e.client_api_error_kind()) {
                    forward(&tx, TransportEvent::InvalidCredentials).await;
                    return;
                }
                tracing::warn!("{}", crate::strings::logs::sync_failed(&e.to_string()));
                forward(&tx, TransportEvent::TransportError(e.to_string())).await;
                tokio::time::sleep(RETRY_DELAY).await;
                continue;
            }
        }

        if last_probe.is_none_or(|at| at.elapsed() >= LATENCY_PROBE_INTERVAL) {
            let started = Instant::now();
            match client.whoami().await {
                Ok(_) => forward(&tx, TransportEvent::LatencyReport(started.elapsed())).await,
                Err(e) if is_auth_error(e.client_api_error_kind()) => {
                    forward(&tx, TransportEvent::InvalidCredentials).await;
                    return;
                }
                Err(e) => forward(&tx, TransportEvent::TransportError(e.to_string())).await,
            }
            last_probe = Some(Instant::now());
        }
    }
}

#[async_trait]
impl ChatTransport for MatrixService {
    async fn send_text(&self, channel: &str, content: &str) -> Result<(), String> {
        let room_id = RoomId::parse(channel).map_err(|e| e.to_string())?;
        let room = self
            .client
            .get_room(&room_id)
            .ok_or_else(|| format!("not joined to {channel}"))?;

        room.send(RoomMessageEventContent::text_markdown(content))
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

#[async_trait]
impl IdentityService for MatrixService {
    async fn display_name(&self, sender_id: &str) -> Result<String, String> {
        let user_id = UserId::parse(sender_id).map_err(|e| e.to_string())?;
        let room = self.operating_room()?;

        match room.get_member(&user_id).await.map_err(|e| e.to_string())? {
            Some(member) => Ok(member.name().to_string()),
            None => Err(format!("{sender_id} is not a member of {}", self.config.room)),
        }
    }
}
