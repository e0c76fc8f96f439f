use fluent_i18n::t;
use gtk4::{prelude::*, Label, Orientation};
use std::cell::RefCell;
use std::rc::Rc;

use crate::destroyable::Destroyable;
use crate::events::{EventObserver, Unsubscriber};
use crate::model::{GameEngineEvent, LeaderboardEntry};

/// Recent results, newest first. Hidden while a game is running.
pub struct LeaderboardUI {
    pub container: gtk4::Box,
    rows: gtk4::Box,
    game_engine_subscription: Option<Unsubscriber<GameEngineEvent>>,
}

impl Destroyable for LeaderboardUI {
    fn destroy(&mut self) {
        if let Some(subscription) = self.game_engine_subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl LeaderboardUI {
    pub fn new(game_engine_observer: EventObserver<GameEngineEvent>) -> Rc<RefCell<Self>> {
        let container = gtk4::Box::builder()
            .name("leaderboard")
            .orientation(Orientation::Vertical)
            .spacing(8)
            .margin_top(16)
            .width_request(400)
            .halign(gtk4::Align::Center)
            .build();
        let title = Label::builder()
            .label(&t!("leaderboard-title"))
            .css_classes(["leaderboard-title"])
            .build();
        let rows = gtk4::Box::builder()
            .orientation(Orientation::Vertical)
            .spacing(6)
            .css_classes(["leaderboard"])
            .build();
        container.append(&title);
        container.append(&rows);

        let leaderboard_ui = Rc::new(RefCell::new(Self {
            container,
            rows,
            game_engine_subscription: None,
        }));

        let subscription = {
            let leaderboard_ui = leaderboard_ui.clone();
            game_engine_observer.subscribe(move |event| match event {
                GameEngineEvent::LeaderboardChanged(entries) => {
                    leaderboard_ui.borrow().show_entries(entries);
                }
                GameEngineEvent::PhaseChanged(phase) => {
                    leaderboard_ui
                        .borrow()
                        .container
                        .set_visible(!phase.is_playing());
                }
                _ => {}
            })
        };
        leaderboard_ui.borrow_mut().game_engine_subscription = Some(subscription);
        leaderboard_ui
    }

    fn show_entries(&self, entries: &[LeaderboardEntry]) {
        while let Some(child) = self.rows.first_child() {
            self.rows.remove(&child);
        }

        if entries.is_empty() {
            let placeholder = Label::builder()
                .label(&t!("leaderboard-empty"))
                .css_classes(["leaderboard-date"])
                .build();
            self.rows.append(&placeholder);
            return;
        }

        for (index, entry) in entries.iter().enumerate() {
            let row = Label::builder().halign(gtk4::Align::Start).build();
            row.set_markup(&entry_markup(index, entry));
            self.rows.append(&row);
        }
    }
}

fn entry_markup(index: usize, entry: &LeaderboardEntry) -> String {
    format!(
        "{}. <b>{}</b> {} · <b>{}s</b> ({}) · <span foreground=\"#6b7280\">{}</span>",
        index + 1,
        entry.score,
        t!("leaderboard-clicks"),
        entry.elapsed_seconds,
        entry.level.display_name(),
        glib::markup_escape_text(&entry.date)
    )
}
