use crate::destroyable::Destroyable;
use crate::events::{Channel, EventEmitter, EventObserver, Unsubscriber};
use crate::game::{
    Celebration, FileStore, GameEngine, GlibScheduler, KeyValueStore, Leaderboard, Scheduler,
    Settings,
};
use crate::model::{GameEngineCommand, GameEngineEvent};
use fluent_i18n::t;
use gio::SimpleAction;
use gtk4::gdk::Display;
use gtk4::{
    prelude::*, Application, ApplicationWindow, CssProvider, Label, Orientation, Overlay,
    STYLE_PROVIDER_PRIORITY_APPLICATION,
};
use std::cell::RefCell;
use std::rc::Rc;

use super::celebration_ui::CelebrationUI;
use super::controls_ui::ControlsUI;
use super::difficulty_picker_ui::DifficultyPickerUI;
use super::game_info_ui::GameInfoUI;
use super::leaderboard_ui::LeaderboardUI;
use super::play_area_ui::PlayAreaUI;
use super::result_ui::ResultUI;

const APP_VERSION: &str = env!("APP_VERSION");

/// Persist the picked difficulty so the next launch starts with it.
fn remember_difficulty(
    settings: &Rc<RefCell<Settings>>,
    game_engine_observer: &EventObserver<GameEngineEvent>,
) -> Unsubscriber<GameEngineEvent> {
    let settings = Rc::clone(settings);
    game_engine_observer.subscribe(move |event| {
        if let GameEngineEvent::DifficultyChanged { difficulty, .. } = event {
            let mut settings = settings.borrow_mut();
            if settings.difficulty != *difficulty {
                settings.difficulty = *difficulty;
                if let Err(err) = settings.save() {
                    log::error!(target: "window", "Failed to save settings: {}", err);
                }
            }
        }
    })
}

fn new_game_action(game_engine_command_emitter: EventEmitter<GameEngineCommand>) -> SimpleAction {
    let action = SimpleAction::new("new-game", None);
    action.connect_activate(move |_, _| {
        log::trace!(target: "window", "New game requested from shortcut");
        game_engine_command_emitter.emit(GameEngineCommand::StartGame);
    });
    action
}

pub fn build_ui(app: &Application) {
    let (game_engine_command_emitter, game_engine_command_observer) =
        Channel::<GameEngineCommand>::new();
    let (game_engine_event_emitter, game_engine_event_observer) =
        Channel::<GameEngineEvent>::new();

    let settings = Rc::new(RefCell::new(Settings::load()));
    let store: Rc<dyn KeyValueStore> = Rc::new(FileStore::new(Settings::data_dir()));
    let scheduler: Rc<dyn Scheduler> = Rc::new(GlibScheduler);
    let celebration_ui = CelebrationUI::new();
    let celebration: Rc<dyn Celebration> = celebration_ui.clone();

    let game_engine = GameEngine::new(
        game_engine_command_observer.clone(),
        game_engine_event_emitter.clone(),
        settings.borrow().difficulty,
        Settings::seed_from_env(),
        scheduler,
        celebration,
        Leaderboard::new(store),
    );

    let title = if Settings::is_debug_mode() {
        format!("{} (seed {})", t!("app-title"), game_engine.borrow().seed())
    } else {
        t!("app-title")
    };
    let window = ApplicationWindow::builder()
        .application(app)
        .title(title)
        .resizable(true)
        .default_width(640)
        .default_height(820)
        .build();

    let heading = Label::builder()
        .label(&format!("🎯 {}", t!("app-title")))
        .css_classes(["title"])
        .build();

    let game_info_ui = GameInfoUI::new(game_engine_event_observer.clone());
    let difficulty_picker_ui = DifficultyPickerUI::new(
        game_engine_command_emitter.clone(),
        game_engine_event_observer.clone(),
    );
    let controls_ui = ControlsUI::new(
        game_engine_command_emitter.clone(),
        game_engine_event_observer.clone(),
    );
    let play_area_ui = PlayAreaUI::new(
        game_engine_command_emitter.clone(),
        game_engine_event_observer.clone(),
    );
    let result_ui = ResultUI::new(game_engine_event_observer.clone());
    let leaderboard_ui = LeaderboardUI::new(game_engine_event_observer.clone());
    let settings_subscription = RefCell::new(Some(remember_difficulty(
        &settings,
        &game_engine_event_observer,
    )));

    let top_level_box = gtk4::Box::builder()
        .name("top-level-box")
        .orientation(Orientation::Vertical)
        .spacing(8)
        .margin_top(16)
        .margin_bottom(16)
        .margin_start(16)
        .margin_end(16)
        .halign(gtk4::Align::Fill)
        .valign(gtk4::Align::Start)
        .build();

    top_level_box.append(&heading);
    top_level_box.append(&game_info_ui.borrow().instructions_label);
    top_level_box.append(&difficulty_picker_ui.borrow().container);
    top_level_box.append(&game_info_ui.borrow().timer_label);
    top_level_box.append(&game_info_ui.borrow().score_label);
    top_level_box.append(&controls_ui.borrow().container);
    top_level_box.append(&play_area_ui.borrow().frame);
    top_level_box.append(&result_ui.borrow().container);
    top_level_box.append(&leaderboard_ui.borrow().container);

    let scrolled_window = gtk4::ScrolledWindow::builder()
        .hexpand(true)
        .vexpand(true)
        .child(&top_level_box)
        .build();

    let overlay = Overlay::builder()
        .css_classes(["app-background"])
        .child(&scrolled_window)
        .build();
    overlay.add_overlay(&celebration_ui.drawing_area);
    window.set_child(Some(&overlay));

    let provider = CssProvider::new();
    provider.load_from_resource("/org/clicktarget/style.css");
    gtk4::style_context_add_provider_for_display(
        &Display::default().expect("Could not connect to a display."),
        &provider,
        STYLE_PROVIDER_PRIORITY_APPLICATION,
    );

    app.set_accels_for_action("win.new-game", &["<Control>n"]);
    window.add_action(&new_game_action(game_engine_command_emitter.clone()));

    log::info!(target: "window", "Click the Target {} ready", APP_VERSION);
    game_engine_command_emitter.emit(GameEngineCommand::InitDisplay);
    window.present();

    window.connect_close_request(move |_| {
        log::trace!(target: "window", "Destroying window");
        if let Some(subscription) = settings_subscription.borrow_mut().take() {
            subscription.unsubscribe();
        }
        game_engine.borrow_mut().destroy();
        celebration_ui.stop();
        game_info_ui.borrow_mut().destroy();
        difficulty_picker_ui.borrow_mut().destroy();
        controls_ui.borrow_mut().destroy();
        play_area_ui.borrow_mut().destroy();
        result_ui.borrow_mut().destroy();
        leaderboard_ui.borrow_mut().destroy();
        glib::signal::Propagation::Proceed
    });
}
