use super::App;
use crate::ui;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use signal_hook::consts::SIGTERM;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Longest the loop waits for input before running background work.
const INPUT_POLL: Duration = Duration::from_millis(50);

pub fn run_tui(mut app: App) -> Result<()> {
    // A second launch toggles this one off with SIGTERM; leave through the
    // normal path so the terminal is restored.
    let terminate = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(SIGTERM, Arc::clone(&terminate))?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, &terminate);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    terminate: &AtomicBool,
) -> Result<()> {
    let mut needs_redraw = true;

    loop {
        if needs_redraw {
            terminal.draw(|f| ui::draw(f, app))?;
            needs_redraw = false;
        }

        if terminate.load(Ordering::Relaxed) {
            tracing::info!("terminated by signal");
            return Ok(());
        }

        // Queued thumbnails: check input without blocking, then do one.
        let timeout = if app.scheduler.is_idle() {
            INPUT_POLL
        } else {
            Duration::ZERO
        };
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key(app, key);
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    app.previews.reset();
                    needs_redraw = true;
                }
                _ => {}
            }
        }

        if app.ui.should_quit {
            return Ok(());
        }

        if app.tick_background() {
            needs_redraw = true;
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.ui.should_quit = true;
        }
        KeyCode::Esc | KeyCode::Char('q') => app.ui.should_quit = true,
        KeyCode::Tab => app.toggle_view(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_wallpaper(),
        KeyCode::Right | KeyCode::Char('l') => app.next_wallpaper(),
        KeyCode::Down | KeyCode::Char('j') => app.row_down(),
        KeyCode::Up | KeyCode::Char('k') => app.row_up(),
        KeyCode::Enter => app.apply_selected(),
        KeyCode::Char('r') => app.rescan(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{Config, ViewMode};
    use crate::backend::{Transition, WallpaperBackend};
    use crate::boot_cache::BootCache;
    use crate::ui::preview::PreviewCache;
    use crate::wallpaper::WallpaperManager;
    use ratatui::backend::TestBackend;
    use ratatui_image::picker::Picker;
    use std::fs::{self, File};
    use std::path::{Path, PathBuf};
    use std::time::SystemTime;
    use tempfile::TempDir;

    struct StaticBackend;

    impl WallpaperBackend for StaticBackend {
        fn name(&self) -> &'static str {
            "static"
        }
        fn is_daemon_running(&self) -> bool {
            true
        }
        fn start_daemon(&self) {}
        fn current_wallpaper(&self) -> Option<PathBuf> {
            None
        }
        fn set_wallpaper(&self, _path: &Path, _transition: &Transition) -> bool {
            true
        }
    }

    fn app_with(tmp: &TempDir, count: usize, columns: usize) -> App {
        let mut config = Config::default();
        config.wallpaper.directory = tmp.path().join("walls");
        config.thumbnails.directory = Some(tmp.path().join("thumbs"));
        config.colors.enabled = false;
        config.ui.grid_columns = columns;
        fs::create_dir_all(&config.wallpaper.directory).unwrap();

        let base = SystemTime::now() - Duration::from_secs(3600);
        for i in 0..count {
            let file = File::create(config.wallpaper.directory.join(format!("{i}.png"))).unwrap();
            file.set_modified(base + Duration::from_secs(i as u64)).unwrap();
        }

        let manager = WallpaperManager::new(
            &config,
            Box::new(StaticBackend),
            None,
            BootCache::new(tmp.path().join("last-wallpaper")),
        )
        .unwrap();
        App::new(config, manager, PreviewCache::new(Picker::new((8, 16))))
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn carousel_moves_horizontally_and_wraps() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with(&tmp, 3, 4);
        assert_eq!(app.ui.view, ViewMode::Carousel);

        press(&mut app, KeyCode::Left);
        assert_eq!(app.selected, 2);
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.selected, 0);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn grid_rows_follow_column_count() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with(&tmp, 7, 3);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.ui.view, ViewMode::Grid);

        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.selected, 3);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected, 6);
        // Row below is out of range: stay put.
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected, 6);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected, 3);
    }

    #[test]
    fn enter_applies_and_reports() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with(&tmp, 2, 4);
        press(&mut app, KeyCode::Enter);

        let newest = app.manager.wallpapers()[0].path.clone();
        assert!(app.manager.is_current(&newest));
        assert_eq!(app.ui.status_message.as_deref(), Some("Applied 1.png"));
    }

    #[test]
    fn termination_flag_ends_the_loop() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with(&tmp, 3, 4);
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();

        run_app(&mut terminal, &mut app, &AtomicBool::new(true)).unwrap();

        let header: String = (0..80)
            .map(|x| terminal.backend().buffer()[(x, 1)].symbol().to_string())
            .collect();
        assert!(header.contains("wallpick"));
        assert!(header.contains("1/3"));
    }

    #[test]
    fn quit_keys() {
        let tmp = TempDir::new().unwrap();
        for code in [KeyCode::Esc, KeyCode::Char('q')] {
            let mut app = app_with(&tmp, 1, 4);
            press(&mut app, code);
            assert!(app.ui.should_quit);
        }
        let mut app = app_with(&tmp, 1, 4);
        handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.ui.should_quit);
    }

    #[test]
    fn background_ticks_advance_prewarm() {
        let tmp = TempDir::new().unwrap();
        // Zero-byte files cannot be decoded: every tick records a failure.
        let mut app = app_with(&tmp, 2, 4);
        assert_eq!(app.prewarm_status().as_deref(), Some("thumbnails 0/2"));

        assert!(app.tick_background());
        assert_eq!(app.prewarm_status().as_deref(), Some("thumbnails 1/2"));
        assert!(app.tick_background());
        assert!(!app.tick_background());
        assert_eq!(
            app.prewarm_status().as_deref(),
            Some("thumbnails: 0 ready, 2 failed")
        );
    }

    #[test]
    fn rescan_mid_prewarm_queues_another_pass() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with(&tmp, 2, 4);
        assert!(app.tick_background());

        let added = app.manager.wallpaper_dir().join("added.png");
        image::RgbImage::from_pixel(8, 8, image::Rgb([0, 128, 255]))
            .save(&added)
            .unwrap();
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.prewarm_status().as_deref(), Some("thumbnails 1/2"));

        // Finishing the first pass starts a second one over everything still stale.
        assert!(app.tick_background());
        assert_eq!(app.prewarm_status().as_deref(), Some("thumbnails 0/3"));

        assert_eq!(app.scheduler.run_until_idle(), 3);
        assert!(app.thumbnails.is_valid(&added));
        assert_eq!(
            app.prewarm_status().as_deref(),
            Some("thumbnails: 1 ready, 2 failed")
        );
    }

    #[test]
    fn rescan_keeps_cursor_on_same_file() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with(&tmp, 2, 4);
        press(&mut app, KeyCode::Right);
        let chosen = app.selected_wallpaper().unwrap().path.clone();

        let newer = File::create(app.manager.wallpaper_dir().join("new.png")).unwrap();
        newer.set_modified(SystemTime::now()).unwrap();
        press(&mut app, KeyCode::Char('r'));

        assert_eq!(app.selected_wallpaper().unwrap().path, chosen);
        assert_eq!(app.selected, 2);
        assert_eq!(app.ui.status_message.as_deref(), Some("Found 3 wallpapers"));
    }
}
