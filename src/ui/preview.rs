use crate::thumbnail::ThumbnailCache;
use ratatui_image::{
    picker::{Picker, ProtocolType},
    protocol::StatefulProtocol,
};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Kitty image ids are a u8 and ratatui-image never frees them, so the cache
/// is purged well before ids can wrap around.
const MAX_CACHED_PREVIEWS: usize = 200;

/// Font size assumed when the terminal does not report one.
const FALLBACK_FONT_SIZE: (u16, u16) = (8, 16);

/// Largest `w`×`h` inside `max_w`×`max_h` with the aspect of `aspect_w`×`aspect_h`.
pub fn fit_aspect(max_w: u16, max_h: u16, aspect_w: u32, aspect_h: u32) -> (u16, u16) {
    if max_w == 0 || max_h == 0 || aspect_w == 0 || aspect_h == 0 {
        return (0, 0);
    }

    let width_limited_h = u32::from(max_w) * aspect_h / aspect_w;
    if width_limited_h <= u32::from(max_h) {
        (max_w, (width_limited_h as u16).max(1))
    } else {
        let width = u32::from(max_h) * aspect_w / aspect_h;
        ((width as u16).max(1), max_h)
    }
}

/// Terminal image protocols built from on-disk thumbnails, keyed by source
/// path. Each protocol re-encodes itself when the area it is drawn in changes.
pub struct PreviewCache {
    picker: Picker,
    entries: HashMap<PathBuf, Option<Box<dyn StatefulProtocol>>>,
}

impl PreviewCache {
    pub fn new(picker: Picker) -> Self {
        Self {
            picker,
            entries: HashMap::new(),
        }
    }

    /// Query the terminal for its font size and best graphics protocol.
    pub fn detect() -> Self {
        Self::new(detect_picker())
    }

    /// Short name of the graphics protocol in use, for the header.
    pub fn protocol_label(&self) -> &'static str {
        match self.picker.protocol_type {
            ProtocolType::Halfblocks => "HB",
            ProtocolType::Sixel => "SIX",
            ProtocolType::Kitty => "KTY",
            ProtocolType::Iterm2 => "IT2",
        }
    }

    /// Preview for `source`, built from its thumbnail. Never generates a
    /// thumbnail: `None` until the pre-warm has produced one.
    pub fn get(
        &mut self,
        thumbnails: &ThumbnailCache,
        source: &Path,
    ) -> Option<&mut Box<dyn StatefulProtocol>> {
        if !self.entries.contains_key(source) {
            if !thumbnails.is_valid(source) {
                return None;
            }
            if self.entries.len() >= MAX_CACHED_PREVIEWS {
                self.clear();
            }
            let thumb = thumbnails.thumbnail_path(source);
            let protocol = match image::open(&thumb) {
                Ok(image) => Some(self.picker.new_resize_protocol(image)),
                Err(e) => {
                    tracing::debug!("preview failed for {}: {}", thumb.display(), e);
                    None
                }
            };
            self.entries.insert(source.to_path_buf(), protocol);
        }
        self.entries.get_mut(source).and_then(Option::as_mut)
    }

    /// Drop every protocol and the terminal-side images behind them.
    pub fn clear(&mut self) {
        clear_terminal_images();
        self.entries.clear();
    }

    /// After a resize: protocols were encoded for the old cell size, and the
    /// font metrics may have changed too.
    pub fn reset(&mut self) {
        self.clear();
        self.picker = detect_picker();
    }
}

fn detect_picker() -> Picker {
    Picker::from_termios()
        .map(|mut picker| {
            picker.guess_protocol();
            picker
        })
        .unwrap_or_else(|_| Picker::new(FALLBACK_FONT_SIZE))
}

fn is_kitty_terminal() -> bool {
    std::env::var("TERM")
        .map(|t| t.contains("kitty"))
        .unwrap_or(false)
        || std::env::var("KITTY_WINDOW_ID").is_ok()
}

/// `APC G a=d,d=A ST` deletes every stored Kitty image and its placements.
fn clear_terminal_images() {
    if !is_kitty_terminal() {
        return;
    }
    let mut stdout = std::io::stdout();
    let _ = stdout.write_all(b"\x1b_Ga=d,d=A\x1b\\");
    let _ = stdout.flush();
}
