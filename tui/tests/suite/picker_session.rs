#![expect(clippy::expect_used)]

use appsel_engine::ApplicationDescriptor;
use appsel_engine::JsonFileSource;
use appsel_engine::SelectorConfig;
use appsel_engine::StaticSource;
use appsel_tui::AppPicker;
use appsel_tui::Focus;
use appsel_tui::PickerOutcome;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;
use pretty_assertions::assert_eq;
use ratatui::Terminal;
use ratatui::backend::TestBackend;

const WIDTH: u16 = 120;
const HEIGHT: u16 = 20;

fn mock_apps() -> Vec<ApplicationDescriptor> {
    vec![
        ApplicationDescriptor::new("single", "unknown", "unknown"),
        ApplicationDescriptor::new("double.cpu", "rbspy", "unknown"),
        ApplicationDescriptor::new("double.space", "gospy", "unknown"),
        ApplicationDescriptor::new("triple.app.cpu", "javaspy", "unknown"),
        ApplicationDescriptor::new("triple.app.objects", "javaspy", "unknown"),
        ApplicationDescriptor::new("singlesingle", "rbspy", "unknown"),
    ]
}

fn screen(picker: &AppPicker) -> String {
    let mut terminal = Terminal::new(TestBackend::new(WIDTH, HEIGHT)).expect("terminal");
    terminal
        .draw(|frame| frame.render_widget_ref(picker, frame.area()))
        .expect("draw");
    let buffer = terminal.backend().buffer();
    (0..HEIGHT)
        .map(|y| {
            (0..WIDTH)
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn press(picker: &mut AppPicker, code: KeyCode) {
    picker.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
}

fn press_until(picker: &mut AppPicker, code: KeyCode, target: &str) {
    for _ in 0..32 {
        if picker.highlighted_name() == Some(target) {
            return;
        }
        press(picker, code);
    }
    panic!("never reached {target}");
}

#[test]
fn picks_a_grouped_variant() {
    let mut picker = AppPicker::new(
        Box::new(StaticSource::new(mock_apps())),
        &SelectorConfig::default(),
    );
    picker.refresh();

    press(&mut picker, KeyCode::Down);
    assert_eq!(picker.focus(), Focus::List);
    press_until(&mut picker, KeyCode::Down, "triple.app");
    press(&mut picker, KeyCode::Enter);

    let rendered = screen(&picker);
    assert!(rendered.contains("▾ triple.app/ (2)"), "{rendered}");
    assert!(rendered.contains("▸ double/ (2)"), "{rendered}");
    assert!(rendered.contains("triple.app.objects"), "{rendered}");

    press(&mut picker, KeyCode::Down);
    press(&mut picker, KeyCode::Down);
    press(&mut picker, KeyCode::Enter);

    assert_eq!(
        picker.outcome(),
        Some(&PickerOutcome::Selected("triple.app.objects".to_string()))
    );
    assert!(screen(&picker).contains("Applications   triple.app.objects"));
}

#[test]
fn current_app_label_is_shown_before_picking() {
    let picker = AppPicker::new(
        Box::new(StaticSource::new(mock_apps())),
        &SelectorConfig::default(),
    )
    .with_current_app(Some("double.cpu".to_string()));

    let rendered = screen(&picker);
    assert!(rendered.contains("Applications   double.cpu"), "{rendered}");
    assert!(rendered.contains("No applications loaded yet"), "{rendered}");
}

#[test]
fn config_seeds_filters_and_expansion() {
    let config = SelectorConfig::from_toml_str(
        r#"
query = "app"
expand_all = true
"#,
    )
    .expect("config");
    let mut picker = AppPicker::new(Box::new(StaticSource::new(mock_apps())), &config);
    picker.refresh();

    assert_eq!(
        picker.visible_names(),
        vec!["triple.app", "triple.app.cpu", "triple.app.objects"]
    );
    assert!(screen(&picker).contains("Search  app"));
}

#[test]
fn refresh_reads_the_file_again() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("apps.json");
    std::fs::write(&path, r#"[{"name":"single","spyName":"unknown"}]"#).expect("write");

    let mut picker = AppPicker::new(
        Box::new(JsonFileSource::new(&path)),
        &SelectorConfig::default(),
    );
    picker.refresh();
    assert_eq!(picker.visible_names(), vec!["single"]);

    std::fs::write(
        &path,
        r#"[{"name":"single","spyName":"unknown"},{"name":"myapp","spyName":"dotnetspy"}]"#,
    )
    .expect("rewrite");
    picker.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL));
    assert!(screen(&picker).contains("loading…"));
    assert!(picker.take_refresh_request());
    picker.complete_refresh();

    assert_eq!(picker.visible_names(), vec!["single", "myapp"]);
    assert!(screen(&picker).contains("Loaded 2 applications"));
}

#[test]
fn missing_file_reports_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut picker = AppPicker::new(
        Box::new(JsonFileSource::new(dir.path().join("missing.json"))),
        &SelectorConfig::default(),
    );
    picker.refresh();

    let rendered = screen(&picker);
    assert!(rendered.contains("No applications (refresh failed)"), "{rendered}");
    assert!(rendered.contains("missing.json"), "{rendered}");
}
