//! Conversation controller: the admin panel's menu navigation and
//! free-text capture state machine.
//!
//! Button presses edit the pressed menu message in place. Free text is only
//! interpreted while the chat's session is in a capture state; a completed
//! capture returns the session to idle and schedules a delayed refresh of the
//! menu message.

use std::{sync::Arc, time::Duration};

use crate::{
    config::Config,
    domain::{ChatId, MessageRef},
    formatting::format_date_ru,
    input::{parse_concert_id, parse_concert_input},
    menu::{render, MenuAction, MenuScreen},
    messaging::{
        port::MessagingPort,
        types::{CallbackQuery, IncomingUpdate, Screen, StartCommand, TextMessage},
    },
    refresh::MenuRefresher,
    session::{CaptureState, SessionStore},
    store::ConcertStore,
    utils::{AuditEvent, AuditLogger},
    Result,
};

const SAVE_FAILED: &str = "❌ Ошибка при сохранении концерта. Попробуйте еще раз.";
const DELETE_FAILED: &str = "❌ Ошибка при удалении концерта. Попробуйте еще раз.";
const LOAD_FAILED: &str = "❌ Ошибка при загрузке списка концертов";
const NOTHING_TO_DELETE: &str = "❌ Нет концертов для удаления";
const CONCERT_NOT_FOUND: &str = "❌ Концерт с таким ID не найден";
const EDIT_IN_PROGRESS: &str = "⚠️ Функция редактирования в разработке";

/// How long a completed capture waits before re-rendering the menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefreshDelays {
    pub concerts: Duration,
    pub music: Duration,
}

impl Default for RefreshDelays {
    fn default() -> Self {
        Self {
            concerts: Duration::from_secs(3),
            music: Duration::from_secs(2),
        }
    }
}

impl RefreshDelays {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            concerts: cfg.concert_refresh_delay,
            music: cfg.music_refresh_delay,
        }
    }
}

/// Result of a button press.
///
/// `enter` is only applied when the menu was redrawn; navigation buttons leave
/// the capture state as it is.
struct Pressed {
    shown: bool,
    enter: Option<CaptureState>,
    notice: Option<&'static str>,
}

impl Pressed {
    fn notice(notice: Option<&'static str>) -> Self {
        Self {
            shown: false,
            enter: None,
            notice,
        }
    }
}

/// A finished capture: what to show on the menu message, and when.
struct Completed {
    screen: Screen,
    delay: Duration,
}

pub struct ConversationController {
    store: Arc<dyn ConcertStore>,
    sessions: Arc<dyn SessionStore>,
    messenger: Arc<dyn MessagingPort>,
    refresher: MenuRefresher,
    audit: AuditLogger,
    delays: RefreshDelays,
}

impl ConversationController {
    pub fn new(
        store: Arc<dyn ConcertStore>,
        sessions: Arc<dyn SessionStore>,
        messenger: Arc<dyn MessagingPort>,
        refresher: MenuRefresher,
        audit: AuditLogger,
        delays: RefreshDelays,
    ) -> Self {
        Self {
            store,
            sessions,
            messenger,
            refresher,
            audit,
            delays,
        }
    }

    pub async fn handle(&self, update: IncomingUpdate) -> Result<()> {
        match update {
            IncomingUpdate::Start(cmd) => self.on_start(cmd).await,
            IncomingUpdate::Callback(q) => self.on_button(q).await,
            IncomingUpdate::Text(msg) => self.on_text(msg).await,
        }
    }

    /// Send a fresh main menu and make it the chat's menu message. A pending
    /// capture survives.
    pub async fn on_start(&self, cmd: StartCommand) -> Result<()> {
        let menu = match self
            .messenger
            .send_screen(cmd.chat_id, &render(MenuScreen::Main))
            .await
        {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!(chat_id = cmd.chat_id.0, "failed to send main menu: {e}");
                return Ok(());
            }
        };

        let mut session = self.sessions.load(cmd.chat_id).await?;
        session.menu = Some(menu);
        self.sessions.save(cmd.chat_id, session).await
    }

    pub async fn on_button(&self, q: CallbackQuery) -> Result<()> {
        let action = MenuAction::parse(&q.data);
        let Some(target) = q.message else {
            self.answer(&q.callback_id, None).await;
            return Ok(());
        };

        let pressed = self.press(&action, target).await;
        if pressed.shown {
            let mut session = self.sessions.load(q.chat_id).await?;
            session.menu = Some(target);
            if let Some(next) = pressed.enter {
                if session.waiting_for != next {
                    tracing::debug!(
                        chat_id = q.chat_id.0,
                        from = session.waiting_for.waiting_for(),
                        to = next.waiting_for(),
                        action = action.as_str(),
                        "capture state changed"
                    );
                }
                session.waiting_for = next;
            }
            self.sessions.save(q.chat_id, session).await?;
        }

        self.answer(&q.callback_id, pressed.notice).await;
        Ok(())
    }

    async fn press(&self, action: &MenuAction, target: MessageRef) -> Pressed {
        match action {
            MenuAction::MainMenu => self.go(target, MenuScreen::Main, None).await,
            MenuAction::Concerts => self.go(target, MenuScreen::Concerts, None).await,
            MenuAction::Music => self.go(target, MenuScreen::Music, None).await,
            MenuAction::ListMusic => self.go(target, MenuScreen::ListMusic, None).await,
            MenuAction::AddConcert => {
                self.go(
                    target,
                    MenuScreen::AddConcertPrompt,
                    Some(CaptureState::AwaitingConcertData),
                )
                .await
            }
            MenuAction::AddMusic => {
                self.go(
                    target,
                    MenuScreen::AddMusicPrompt,
                    Some(CaptureState::AwaitingMusicName),
                )
                .await
            }
            MenuAction::ListConcerts => match self.store.list_by_date().await {
                Ok(concerts) => {
                    self.go(target, MenuScreen::ListConcerts(&concerts), None)
                        .await
                }
                Err(e) => {
                    tracing::error!(chat_id = target.chat_id.0, "failed to load concerts: {e}");
                    Pressed::notice(Some(LOAD_FAILED))
                }
            },
            MenuAction::DeleteConcert => match self.store.list_by_date().await {
                Ok(concerts) if concerts.is_empty() => Pressed::notice(Some(NOTHING_TO_DELETE)),
                Ok(concerts) => {
                    self.go(
                        target,
                        MenuScreen::DeleteConcertPrompt(&concerts),
                        Some(CaptureState::AwaitingDeleteId),
                    )
                    .await
                }
                Err(e) => {
                    tracing::error!(
                        chat_id = target.chat_id.0,
                        "failed to load concerts for deletion: {e}"
                    );
                    Pressed::notice(Some(LOAD_FAILED))
                }
            },
            MenuAction::Edit(_) => Pressed::notice(Some(EDIT_IN_PROGRESS)),
            MenuAction::DeleteMusic | MenuAction::Unknown(_) => {
                tracing::debug!(action = action.as_str(), "ignoring unhandled menu action");
                Pressed::notice(None)
            }
        }
    }

    async fn go(
        &self,
        target: MessageRef,
        screen: MenuScreen<'_>,
        enter: Option<CaptureState>,
    ) -> Pressed {
        Pressed {
            shown: self.show(target, render(screen)).await,
            enter,
            notice: None,
        }
    }

    pub async fn on_text(&self, msg: TextMessage) -> Result<()> {
        let mut session = self.sessions.load(msg.chat_id).await?;

        tracing::debug!(
            chat_id = msg.chat_id.0,
            waiting_for = session.waiting_for.waiting_for(),
            "text received"
        );
        let completed = match session.waiting_for {
            CaptureState::Idle => return Ok(()),
            CaptureState::AwaitingConcertData => self.capture_concert(&msg).await,
            CaptureState::AwaitingDeleteId => self.capture_delete(&msg).await,
            CaptureState::AwaitingMusicName => self.capture_music(&msg).await,
        };
        let Some(Completed { screen, delay }) = completed else {
            return Ok(());
        };

        session.waiting_for = CaptureState::Idle;
        let menu = session.menu;
        self.sessions.save(msg.chat_id, session).await?;

        match menu {
            Some(target) => self.refresher.schedule(target, screen, delay),
            None => tracing::debug!(chat_id = msg.chat_id.0, "no menu message to refresh"),
        }
        Ok(())
    }

    async fn capture_concert(&self, msg: &TextMessage) -> Option<Completed> {
        let new = match parse_concert_input(&msg.text) {
            Ok(c) => c,
            Err(e) => {
                self.reply(msg.chat_id, &e.to_string()).await;
                return None;
            }
        };

        let concert = match self.store.create(new).await {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(chat_id = msg.chat_id.0, "failed to save concert: {e}");
                self.record(AuditEvent::error(
                    msg.user_id.0,
                    msg.chat_id.0,
                    &e.to_string(),
                    "create_concert",
                    Some(&msg.text),
                ));
                self.reply(msg.chat_id, SAVE_FAILED).await;
                return None;
            }
        };

        tracing::info!(
            chat_id = msg.chat_id.0,
            concert_id = concert.concert_id.0,
            "concert created"
        );
        self.record(AuditEvent::concert_created(
            msg.user_id.0,
            msg.chat_id.0,
            &concert,
        ));
        self.reply(
            msg.chat_id,
            &format!(
                "✅ Концерт успешно добавлен!\n\n📅 Дата: {}\n🏙️ Город: {}\n🏛️ Учреждение: {}\n🆔 ID: {}",
                format_date_ru(concert.planned_to),
                concert.city_on,
                concert.institution_on,
                concert.concert_id
            ),
        )
        .await;

        Some(Completed {
            screen: render(MenuScreen::Concerts),
            delay: self.delays.concerts,
        })
    }

    async fn capture_delete(&self, msg: &TextMessage) -> Option<Completed> {
        let concert_id = match parse_concert_id(&msg.text) {
            Ok(id) => id,
            Err(e) => {
                self.reply(msg.chat_id, &e.to_string()).await;
                return None;
            }
        };

        let deleted = match self.store.delete(concert_id).await {
            Ok(Some(c)) => c,
            Ok(None) => {
                self.reply(msg.chat_id, CONCERT_NOT_FOUND).await;
                return None;
            }
            Err(e) => {
                tracing::error!(
                    chat_id = msg.chat_id.0,
                    concert_id = concert_id.0,
                    "failed to delete concert: {e}"
                );
                self.record(AuditEvent::error(
                    msg.user_id.0,
                    msg.chat_id.0,
                    &e.to_string(),
                    "delete_concert",
                    Some(&msg.text),
                ));
                self.reply(msg.chat_id, DELETE_FAILED).await;
                return None;
            }
        };

        tracing::info!(
            chat_id = msg.chat_id.0,
            concert_id = deleted.concert_id.0,
            "concert deleted"
        );
        self.record(AuditEvent::concert_deleted(
            msg.user_id.0,
            msg.chat_id.0,
            &deleted,
        ));
        self.reply(
            msg.chat_id,
            &format!(
                "✅ Концерт удален!\n\n🆔 ID: {}\n📅 Дата: {}\n🏙️ Город: {}",
                deleted.concert_id,
                format_date_ru(deleted.planned_to),
                deleted.city_on
            ),
        )
        .await;

        Some(Completed {
            screen: render(MenuScreen::Concerts),
            delay: self.delays.concerts,
        })
    }

    /// Music is a placeholder: any title is acknowledged but not stored.
    async fn capture_music(&self, msg: &TextMessage) -> Option<Completed> {
        let title = msg.text.trim();
        self.reply(msg.chat_id, &format!("✅ Музыка \"{title}\" добавлена!"))
            .await;

        Some(Completed {
            screen: render(MenuScreen::Music),
            delay: self.delays.music,
        })
    }

    async fn show(&self, target: MessageRef, screen: Screen) -> bool {
        match self.messenger.edit_screen(target, &screen).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    chat_id = target.chat_id.0,
                    message_id = target.message_id.0,
                    "failed to edit menu: {e}"
                );
                false
            }
        }
    }

    async fn reply(&self, chat_id: ChatId, text: &str) {
        if let Err(e) = self.messenger.send_text(chat_id, text).await {
            tracing::warn!(chat_id = chat_id.0, "failed to send reply: {e}");
        }
    }

    async fn answer(&self, callback_id: &str, notice: Option<&str>) {
        if let Err(e) = self.messenger.answer_callback_query(callback_id, notice).await {
            tracing::warn!("failed to answer callback query: {e}");
        }
    }

    fn record(&self, event: AuditEvent) {
        if let Err(e) = self.audit.write(event) {
            tracing::warn!("failed to write audit event: {e}");
        }
    }
}
