//! Menu screens of the admin panel.
//!
//! Rendering is pure: a [`MenuScreen`] (optionally carrying the current
//! concert list) maps to Telegram HTML plus an inline keyboard.

use crate::{
    domain::Concert,
    formatting::{escape_html, format_date_ru},
    messaging::types::{InlineButton, InlineKeyboard, Screen},
};

/// Callback actions carried by menu buttons.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Concerts,
    Music,
    MainMenu,
    AddConcert,
    ListConcerts,
    DeleteConcert,
    AddMusic,
    ListMusic,
    DeleteMusic,
    /// Any `edit_*` action. Editing is not implemented.
    Edit(String),
    Unknown(String),
}

impl MenuAction {
    pub fn parse(data: &str) -> Self {
        match data {
            "concerts" => Self::Concerts,
            "music" => Self::Music,
            "main_menu" => Self::MainMenu,
            "add_concert" => Self::AddConcert,
            "list_concerts" => Self::ListConcerts,
            "delete_concert" => Self::DeleteConcert,
            "add_music" => Self::AddMusic,
            "list_music" => Self::ListMusic,
            "delete_music" => Self::DeleteMusic,
            other if other.contains("edit_") => Self::Edit(other.to_string()),
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Concerts => "concerts",
            Self::Music => "music",
            Self::MainMenu => "main_menu",
            Self::AddConcert => "add_concert",
            Self::ListConcerts => "list_concerts",
            Self::DeleteConcert => "delete_concert",
            Self::AddMusic => "add_music",
            Self::ListMusic => "list_music",
            Self::DeleteMusic => "delete_music",
            Self::Edit(raw) | Self::Unknown(raw) => raw,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum MenuScreen<'a> {
    Main,
    Concerts,
    Music,
    AddConcertPrompt,
    AddMusicPrompt,
    ListConcerts(&'a [Concert]),
    ListMusic,
    DeleteConcertPrompt(&'a [Concert]),
}

fn button(label: &str, action: MenuAction) -> InlineButton {
    InlineButton::new(label, action.as_str())
}

fn back_to_concerts() -> InlineButton {
    button("🔙 Назад к концертам", MenuAction::Concerts)
}

fn back_to_music() -> InlineButton {
    button("🔙 Назад к музыке", MenuAction::Music)
}

fn back_to_main() -> InlineButton {
    button("🔙 Назад в главное меню", MenuAction::MainMenu)
}

pub fn render(screen: MenuScreen<'_>) -> Screen {
    match screen {
        MenuScreen::Main => Screen {
            html: "🎵 <b>BAKR LANDING</b> 🎵\n\n\
                   🔧 <b>Админка для управления данными</b>\n\n\
                   Добро пожаловать в панель администратора!\n\
                   Выберите раздел для управления:"
                .to_string(),
            keyboard: InlineKeyboard::one_per_row([
                button("🎤 Концерты", MenuAction::Concerts),
                button("🎶 Музыки", MenuAction::Music),
            ]),
        },
        MenuScreen::Concerts => Screen {
            html: "🎤 <b>Управление концертами</b>\n\nВыберите действие:".to_string(),
            keyboard: InlineKeyboard::one_per_row([
                button("➕ Добавить концерт", MenuAction::AddConcert),
                button("📋 Список концертов", MenuAction::ListConcerts),
                button("✏️ Редактировать", MenuAction::Edit("edit_concert".to_string())),
                button("🗑 Удалить", MenuAction::DeleteConcert),
                back_to_main(),
            ]),
        },
        MenuScreen::Music => Screen {
            html: "🎶 <b>Управление музыкой</b>\n\nВыберите действие:".to_string(),
            keyboard: InlineKeyboard::one_per_row([
                button("➕ Добавить музыку", MenuAction::AddMusic),
                button("📋 Список музыки", MenuAction::ListMusic),
                button("✏️ Редактировать", MenuAction::Edit("edit_music".to_string())),
                button("🗑 Удалить", MenuAction::DeleteMusic),
                back_to_main(),
            ]),
        },
        MenuScreen::AddConcertPrompt => Screen {
            html: "🎤 <b>Добавить новый концерт</b>\n\n\
                   Введите данные в следующем формате:\n\
                   📅 Дата (ГГГГ-ММ-ДД)\n\
                   🏙️ Город\n\
                   🏛️ Учреждение\n\
                   🔗 Ссылка\n\n\
                   Пример:\n\
                   <code>2024-12-25\n\
                   Бишкек\n\
                   Филармония\n\
                   https://example.com/tickets</code>"
                .to_string(),
            keyboard: InlineKeyboard::one_per_row([back_to_concerts()]),
        },
        MenuScreen::AddMusicPrompt => Screen {
            html: "🎶 <b>Добавить новую музыку</b>\n\nВведите название композиции:".to_string(),
            keyboard: InlineKeyboard::one_per_row([back_to_music()]),
        },
        MenuScreen::ListConcerts(concerts) => Screen {
            html: render_concert_list(concerts),
            keyboard: InlineKeyboard::one_per_row([
                button("🔄 Обновить список", MenuAction::ListConcerts),
                back_to_concerts(),
            ]),
        },
        MenuScreen::ListMusic => Screen {
            html: "🎶 <b>Список музыки</b>\n\n\
                   (Пока список пуст)\n\n\
                   Здесь будут отображаться все добавленные композиции."
                .to_string(),
            keyboard: InlineKeyboard::one_per_row([back_to_music()]),
        },
        MenuScreen::DeleteConcertPrompt(concerts) => {
            let mut html = String::from(
                "🗑 <b>Удаление концерта</b>\n\nВведите ID концерта для удаления:\n\n",
            );
            for c in concerts {
                html.push_str(&format!(
                    "🆔 <b>{}</b> - {} в {}\n",
                    c.concert_id,
                    format_date_ru(c.planned_to),
                    escape_html(&c.city_on)
                ));
            }
            Screen {
                html,
                keyboard: InlineKeyboard::one_per_row([back_to_concerts()]),
            }
        }
    }
}

fn render_concert_list(concerts: &[Concert]) -> String {
    let mut html = String::from("🎤 <b>Список концертов</b>\n\n");
    if concerts.is_empty() {
        html.push_str("(Пока список пуст)\n\nЗдесь будут отображаться все добавленные концерты.");
        return html;
    }

    for (idx, c) in concerts.iter().enumerate() {
        html.push_str(&format!(
            "{}. <b>ID:</b> {}\n\
             📅 <b>Дата:</b> {}\n\
             🏙️ <b>Город:</b> {}\n\
             🏛️ <b>Учреждение:</b> {}\n\
             🔗 <a href=\"{}\">Ссылка</a>\n\n",
            idx + 1,
            c.concert_id,
            format_date_ru(c.planned_to),
            escape_html(&c.city_on),
            escape_html(&c.institution_on),
            escape_html(&c.link_to),
        ));
    }
    html
}
